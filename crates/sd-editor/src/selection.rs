//! Single-element selection.
//!
//! One id is the whole state. The "selected element" and "selected layer"
//! are both read from it, so they cannot drift apart and selecting through
//! one never has to push an update into the other.

use crate::layers::LayerProjection;
use sd_core::{Element, ElementId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ElementId>,
}

impl Selection {
    pub fn select(&mut self, id: ElementId) {
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn id(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    /// Selected-element view.
    pub fn element<'a>(&self, elements: &'a [Element]) -> Option<&'a Element> {
        let id = self.selected?;
        elements.iter().find(|e| e.id == id)
    }

    /// Selected-layer view: the row in the layers panel.
    pub fn layer_index(&self, layers: &LayerProjection) -> Option<usize> {
        layers.position_of(self.selected?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sd_core::ElementKind;

    #[test]
    fn both_views_follow_one_id() {
        let mut bottom = Element::new(ElementId::intern("sel_bottom"), ElementKind::Text);
        bottom.z_index = 0;
        let mut top = Element::new(ElementId::intern("sel_top"), ElementKind::Image);
        top.z_index = 1;
        let elements = vec![bottom, top];
        let mut layers = LayerProjection::default();
        layers.recompute(&elements);

        let mut selection = Selection::default();
        assert!(selection.element(&elements).is_none());
        assert!(selection.layer_index(&layers).is_none());

        selection.select(ElementId::intern("sel_bottom"));
        assert_eq!(selection.element(&elements).map(|e| e.id.as_str()), Some("sel_bottom"));
        assert_eq!(selection.layer_index(&layers), Some(1));

        selection.clear();
        assert_eq!(selection.id(), None);
    }
}
