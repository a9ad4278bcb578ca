//! The element store: canonical element list of the open layout.
//!
//! The store owns three pieces of state that must agree with each other:
//!
//! - the element list, in insertion order (this is what gets saved),
//! - the layer projection, rebuilt after every change to membership or
//!   z-index,
//! - the selection, cleared when its element is removed.
//!
//! Operations addressing an unknown id are no-ops and report `false` /
//! `None`.

use crate::config::DesignerConfig;
use crate::layers::LayerProjection;
use crate::selection::Selection;
use sd_core::{Element, ElementId, ElementKind, PropValue, PropertyError, Position, Size};
use std::collections::HashSet;

/// One step of `bump_z_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZStep {
    Forward,
    Backward,
}

impl ZStep {
    pub fn delta(self) -> i32 {
        match self {
            ZStep::Forward => 1,
            ZStep::Backward => -1,
        }
    }
}

/// Neighbor to trade z-index with, in insertion order: `Up` is the next
/// element in the list, `Down` the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    Up,
    Down,
}

#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Vec<Element>,
    layers: LayerProjection,
    selection: Selection,
    spawn_position: Position,
    duplicate_offset: (f64, f64),
    /// Bumped on every mutation; used for dirty tracking.
    revision: u64,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new(&DesignerConfig::default())
    }
}

impl ElementStore {
    pub fn new(config: &DesignerConfig) -> Self {
        Self {
            elements: Vec::new(),
            layers: LayerProjection::default(),
            selection: Selection::default(),
            spawn_position: config.spawn_position,
            duplicate_offset: config.duplicate_offset,
            revision: 0,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn layers(&self) -> &LayerProjection {
        &self.layers
    }

    /// Elements in layers-panel order (top-most first).
    pub fn layer_elements(&self) -> Vec<&Element> {
        self.layers
            .ids()
            .iter()
            .filter_map(|&id| self.get(id))
            .collect()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<&Element> {
        self.selection.element(&self.elements)
    }

    pub fn selected_layer(&self) -> Option<usize> {
        self.selection.layer_index(&self.layers)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Top-most visible element containing the canvas point.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ElementId> {
        self.layer_elements()
            .into_iter()
            .find(|e| e.visible && e.contains(x, y))
            .map(|e| e.id)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select an element. Unknown ids leave the selection unchanged.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selection.select(id);
        true
    }

    /// Select through the layers panel. Out-of-range rows are ignored.
    pub fn select_layer(&mut self, index: usize) -> bool {
        match self.layers.get(index) {
            Some(id) => {
                self.selection.select(id);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─── Membership ──────────────────────────────────────────────────────

    /// Add a default element of `kind` at the spawn position. The new
    /// element goes on top (`z_index = len()`) and becomes the selection.
    pub fn add(&mut self, kind: ElementKind) -> &Element {
        self.add_at(kind, self.spawn_position)
    }

    pub fn add_at(&mut self, kind: ElementKind, position: Position) -> &Element {
        let mut element = Element::new(self.fresh_id(kind), kind);
        element.name = format!("{} {}", kind.label(), self.elements.len() + 1);
        element.position = position;
        element.z_index = self.next_z();
        log::debug!("add {} {}", kind, element.id);
        self.push_selected(element)
    }

    /// Remove by identity. Clears the selection if it pointed here.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let idx = self.index_of(id)?;
        let removed = self.elements.remove(idx);
        if self.selection.is_selected(id) {
            self.selection.clear();
        }
        log::debug!("remove {id}");
        self.touch(true);
        Some(removed)
    }

    /// Copy an element under a fresh id, offset from the original and
    /// placed on top. The copy becomes the selection.
    pub fn duplicate(&mut self, id: ElementId) -> Option<&Element> {
        let original = self.get(id)?;
        let kind = original.kind();
        let mut copy = original.clone();
        copy.id = self.fresh_id(kind);
        copy.name = format!("{} (Copy)", original.name);
        copy.position = original
            .position
            .offset(self.duplicate_offset.0, self.duplicate_offset.1);
        copy.z_index = self.next_z();
        log::debug!("duplicate {id} -> {}", copy.id);
        Some(self.push_selected(copy))
    }

    /// Replace the whole element list (layout load). Repeated ids are
    /// re-issued so the list stays unique. The selection is cleared.
    /// Returns how many ids were re-issued.
    pub fn replace_all(&mut self, mut elements: Vec<Element>) -> usize {
        let mut reissued = 0;
        let mut taken: HashSet<ElementId> = elements.iter().map(|e| e.id).collect();
        let mut seen = HashSet::with_capacity(elements.len());
        for element in &mut elements {
            if !seen.insert(element.id) {
                let fresh = loop {
                    let candidate = ElementId::with_prefix(element.kind().as_str());
                    if !taken.contains(&candidate) {
                        break candidate;
                    }
                };
                log::warn!("duplicate element id {} re-issued as {fresh}", element.id);
                element.id = fresh;
                taken.insert(fresh);
                seen.insert(fresh);
                reissued += 1;
            }
        }
        self.elements = elements;
        self.selection.clear();
        self.touch(true);
        reissued
    }

    // ─── Stacking ────────────────────────────────────────────────────────

    /// Shift z-index by one. No bounds and no collision handling: the
    /// result may tie with another element, in which case the visible
    /// order may not change.
    pub fn bump_z_index(&mut self, id: ElementId, step: ZStep) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        element.z_index = element.z_index.saturating_add(step.delta());
        log::debug!("bump {id} to z={}", element.z_index);
        self.touch(true);
        true
    }

    /// Trade z-index with the insertion-order neighbor. Element positions
    /// in the list are unchanged. Returns `false` at either end.
    pub fn swap_with_neighbor(&mut self, id: ElementId, direction: SwapDirection) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let neighbor = match direction {
            SwapDirection::Up if idx + 1 < self.elements.len() => idx + 1,
            SwapDirection::Down if idx > 0 => idx - 1,
            _ => return false,
        };
        let (a, b) = (self.elements[idx].z_index, self.elements[neighbor].z_index);
        self.elements[idx].z_index = b;
        self.elements[neighbor].z_index = a;
        log::debug!(
            "swap {id} with {} ({a} <-> {b})",
            self.elements[neighbor].id
        );
        self.touch(true);
        true
    }

    pub fn set_z_index(&mut self, id: ElementId, z_index: i32) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        element.z_index = z_index;
        self.touch(true);
        true
    }

    // ─── Edits ───────────────────────────────────────────────────────────

    /// Move by a delta. Locked elements stay put.
    pub fn move_by(&mut self, id: ElementId, dx: f64, dy: f64) -> bool {
        let Some(target) = self.get(id).map(|e| e.position.offset(dx, dy)) else {
            return false;
        };
        self.move_to(id, target.x, target.y)
    }

    pub fn move_to(&mut self, id: ElementId, x: f64, y: f64) -> bool {
        if !all_finite(&[x, y]) {
            log::warn!("{id}: position ({x}, {y}) is not finite; move ignored");
            return false;
        }
        self.edit_unlocked(id, |e| e.position = Position::new(x, y))
    }

    /// Resize. Finite sizes are taken as given; locked elements are left
    /// alone.
    pub fn resize(&mut self, id: ElementId, width: f64, height: f64) -> bool {
        if !all_finite(&[width, height]) {
            log::warn!("{id}: size {width}x{height} is not finite; resize ignored");
            return false;
        }
        self.edit_unlocked(id, |e| e.size = Size::new(width, height))
    }

    pub fn rename(&mut self, id: ElementId, name: impl Into<String>) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        element.name = name.into();
        self.touch(false);
        true
    }

    /// Write one property. `Ok(false)` for an unknown element; on error
    /// the element is unchanged.
    pub fn set_property(
        &mut self,
        id: ElementId,
        key: &str,
        value: PropValue,
    ) -> Result<bool, PropertyError> {
        let Some(element) = self.get_mut(id) else {
            return Ok(false);
        };
        element.set_property(key, value)?;
        self.touch(false);
        Ok(true)
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    fn next_z(&self) -> i32 {
        i32::try_from(self.elements.len()).unwrap_or(i32::MAX)
    }

    /// A generated id not used by any element in the store.
    fn fresh_id(&self, kind: ElementKind) -> ElementId {
        loop {
            let id = ElementId::with_prefix(kind.as_str());
            if self.get(id).is_none() {
                return id;
            }
        }
    }

    fn push_selected(&mut self, element: Element) -> &Element {
        let id = element.id;
        self.elements.push(element);
        self.selection.select(id);
        self.touch(true);
        &self.elements[self.elements.len() - 1]
    }

    fn edit_unlocked(&mut self, id: ElementId, edit: impl FnOnce(&mut Element)) -> bool {
        let Some(element) = self.get_mut(id) else {
            return false;
        };
        if element.locked {
            log::debug!("{id} is locked; edit ignored");
            return false;
        }
        edit(element);
        self.touch(false);
        true
    }

    fn touch(&mut self, reorder: bool) {
        self.revision += 1;
        if reorder {
            self.layers.recompute(&self.elements);
        }
    }
}

/// Layouts are stored as JSON, which has no `inf` or `NaN`.
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}
