//! Layers panel projection: elements ordered top-most first.

use sd_core::{Element, ElementId};
use std::cmp::Reverse;

/// Elements sorted by z-index descending. The sort is stable, so elements
/// sharing a z-index keep their relative insertion order.
pub fn project(elements: &[Element]) -> Vec<&Element> {
    let mut sorted: Vec<&Element> = elements.iter().collect();
    sorted.sort_by_key(|e| Reverse(e.z_index));
    sorted
}

/// The last computed layer order, as element ids.
///
/// Only ever rebuilt wholesale from the element list; there is no way to
/// edit it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerProjection {
    order: Vec<ElementId>,
}

impl LayerProjection {
    pub fn recompute(&mut self, elements: &[Element]) {
        self.order = project(elements).into_iter().map(|e| e.id).collect();
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.order
    }

    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.order.get(index).copied()
    }

    /// Row of `id` in the layers panel.
    pub fn position_of(&self, id: ElementId) -> Option<usize> {
        self.order.iter().position(|&l| l == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
