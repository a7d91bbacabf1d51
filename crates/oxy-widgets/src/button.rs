//! Push button with keyboard activation.

use crate::attr::{self, ACTIVE, DISABLED};
use crate::keyboard::{HostActions, KeyboardController};
use oxy_core::{AttributeChange, Document, DomError, HostController, NodeId};
use std::cell::Cell;
use std::rc::Rc;

/// Space and Enter both show the pressed state; Enter clicks on the way
/// down, Space on the way up.
pub const BUTTON_ACTIONS: HostActions = HostActions::ACTIVE_DURING_SPACE
    .union(HostActions::ACTIVE_DURING_ENTER)
    .union(HostActions::CLICK_ON_ENTER_DOWN)
    .union(HostActions::CLICK_ON_SPACE_UP);

/// A focusable element that activates (dispatches `Click`) from the
/// keyboard as well as from the pointer.
///
/// `Button` is a handle; all state lives in attributes on its element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Button {
    node: NodeId,
}

impl Button {
    pub const TAG: &'static str = "oxy-button";

    /// Create a detached button element.
    pub fn create(doc: &mut Document) -> Result<Self, DomError> {
        let node = doc.create_element(Self::TAG);
        Self::upgrade(doc, node)
    }

    /// Attach button behavior to an existing element.
    pub fn upgrade(doc: &mut Document, node: NodeId) -> Result<Self, DomError> {
        doc.add_controller(node, Rc::new(ButtonBehavior::default()))?;
        KeyboardController::attach(BUTTON_ACTIONS, doc, node)?;
        Ok(Self { node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_disabled(&self, doc: &Document) -> bool {
        doc.has_attribute(self.node, DISABLED)
    }

    pub fn set_disabled(&self, doc: &mut Document, disabled: bool) {
        doc.toggle_attribute(self.node, DISABLED, disabled);
    }

    /// Whether an activation key is currently held on the button.
    pub fn is_active(&self, doc: &Document) -> bool {
        doc.has_attribute(self.node, ACTIVE)
    }
}

#[derive(Default)]
struct ButtonBehavior {
    rendered: Cell<bool>,
}

impl HostController for ButtonBehavior {
    fn host_connected(&self, doc: &mut Document, host: NodeId) {
        if !self.rendered.replace(true) {
            attr::render_focusable(doc, host, "button");
        }
        attr::mirror_disabled(doc, host);
    }

    fn attribute_changed(&self, doc: &mut Document, host: NodeId, change: &AttributeChange<'_>) {
        if change.name == DISABLED {
            attr::mirror_disabled(doc, host);
        }
    }
}
