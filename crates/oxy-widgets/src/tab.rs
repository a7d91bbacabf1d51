//! A single tab, used inside [`Tabs`](crate::tabs::Tabs).

use crate::attr::{self, ARIA_SELECTED, DISABLED, ORIENTATION, SELECTABLE, SELECTED};
use crate::keyboard::{HostActions, KeyboardController};
use crate::tabs::Orientation;
use oxy_core::{AttributeChange, Document, DomError, HostController, NodeId};
use std::rc::Rc;

/// Space (on release) and Enter (on press) activate a focused tab the same
/// way a pointer click does.
pub const TAB_ACTIONS: HostActions = HostActions::ACTIVE_DURING_SPACE
    .union(HostActions::CLICK_ON_SPACE_UP)
    .union(HostActions::CLICK_ON_ENTER_DOWN);

/// A tab element.  Selection is owned by the parent [`Tabs`](crate::tabs::Tabs),
/// which writes `selected` and `orientation` onto its children.
///
/// A tab only reacts to clicks once it is marked `selectable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tab {
    node: NodeId,
}

impl Tab {
    pub const TAG: &'static str = "oxy-tab";

    /// Create a detached, selectable tab.
    pub fn create(doc: &mut Document) -> Result<Self, DomError> {
        let node = doc.create_element(Self::TAG);
        let tab = Self::upgrade(doc, node)?;
        tab.set_selectable(doc, true);
        Ok(tab)
    }

    /// Attach tab behavior to an existing element. The element keeps
    /// whatever `selectable` marker it already has.
    pub fn upgrade(doc: &mut Document, node: NodeId) -> Result<Self, DomError> {
        doc.add_controller(node, Rc::new(TabBehavior))?;
        KeyboardController::attach(TAB_ACTIONS, doc, node)?;
        attr::render_focusable(doc, node, "tab");
        if !doc.has_attribute(node, ORIENTATION) {
            doc.set_attribute(node, ORIENTATION, Orientation::default().as_str());
        }
        attr::mirror_boolean(doc, node, SELECTED, ARIA_SELECTED);
        Ok(Self { node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_selected(&self, doc: &Document) -> bool {
        doc.has_attribute(self.node, SELECTED)
    }

    /// The orientation last written by the parent, if it is a known value.
    pub fn orientation(&self, doc: &Document) -> Option<Orientation> {
        doc.attribute(self.node, ORIENTATION)?.parse().ok()
    }

    pub fn is_selectable(&self, doc: &Document) -> bool {
        doc.has_attribute(self.node, SELECTABLE)
    }

    pub fn set_selectable(&self, doc: &mut Document, selectable: bool) {
        doc.toggle_attribute(self.node, SELECTABLE, selectable);
    }

    pub fn set_disabled(&self, doc: &mut Document, disabled: bool) {
        doc.toggle_attribute(self.node, DISABLED, disabled);
    }
}

struct TabBehavior;

impl HostController for TabBehavior {
    fn attribute_changed(&self, doc: &mut Document, host: NodeId, change: &AttributeChange<'_>) {
        match change.name {
            SELECTED => attr::mirror_boolean(doc, host, SELECTED, ARIA_SELECTED),
            DISABLED => attr::mirror_disabled(doc, host),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{ARIA_DISABLED, ROLE, TABINDEX};

    #[test]
    fn created_tab_is_selectable_and_horizontal() {
        let mut doc = Document::new();
        let tab = Tab::create(&mut doc).unwrap();
        assert!(tab.is_selectable(&doc));
        assert!(!tab.is_selected(&doc));
        assert_eq!(tab.orientation(&doc), Some(Orientation::Horizontal));
        assert_eq!(doc.attribute(tab.node(), ROLE), Some("tab"));
        assert_eq!(doc.attribute(tab.node(), TABINDEX), Some("0"));
        assert_eq!(doc.attribute(tab.node(), ARIA_SELECTED), Some("false"));
    }

    #[test]
    fn upgrade_keeps_existing_markers() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.set_attribute(node, ORIENTATION, "vertical");
        let tab = Tab::upgrade(&mut doc, node).unwrap();
        assert!(!tab.is_selectable(&doc));
        assert_eq!(tab.orientation(&doc), Some(Orientation::Vertical));
    }

    #[test]
    fn aria_mirrors_selected_and_disabled() {
        let mut doc = Document::new();
        let tab = Tab::create(&mut doc).unwrap();
        doc.toggle_attribute(tab.node(), SELECTED, true);
        assert_eq!(doc.attribute(tab.node(), ARIA_SELECTED), Some("true"));
        tab.set_disabled(&mut doc, true);
        assert_eq!(doc.attribute(tab.node(), ARIA_DISABLED), Some("true"));
    }

    #[test]
    fn unknown_orientation_reads_as_none() {
        let mut doc = Document::new();
        let tab = Tab::create(&mut doc).unwrap();
        doc.set_attribute(tab.node(), ORIENTATION, "diagonal");
        assert_eq!(tab.orientation(&doc), None);
    }
}
