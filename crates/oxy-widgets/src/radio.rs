//! Radio button.
//!
//! Only one radio in a [`RadioGroup`](crate::radio_group::RadioGroup) can be
//! checked at a time:
//!
//! ```text
//! <oxy-radio-group>
//!   <oxy-radio>Option 0</oxy-radio>
//!   <oxy-radio>Option 1</oxy-radio>
//! </oxy-radio-group>
//! ```
//!
//! A group is not required when the owner of the radios already tracks
//! which one is checked and writes `checked` itself.

use crate::attr::{self, ACTIVE, ARIA_CHECKED, CHECKED, DISABLED};
use crate::keyboard::{HostActions, KeyboardController};
use oxy_core::{
    AttributeChange, Document, DomError, Event, EventType, HostController, ListenerId, NodeId,
};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Space shows the pressed state and checks the radio on release.
pub const RADIO_ACTIONS: HostActions =
    HostActions::ACTIVE_DURING_SPACE.union(HostActions::CLICK_ON_SPACE_UP);

/// A checkable element that announces becoming checked to its ancestors.
///
/// Whenever `checked` changes the radio fires a non-bubbling
/// `Change(Some(checked))`.  When it becomes checked it additionally fires a
/// bubbling `SelectionChanged` carrying itself, which a coordinating
/// ancestor uses to uncheck the others.  Clicking a disabled radio does
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Radio {
    node: NodeId,
}

impl Radio {
    pub const TAG: &'static str = "oxy-radio";

    /// Create a detached radio element.
    pub fn create(doc: &mut Document) -> Result<Self, DomError> {
        let node = doc.create_element(Self::TAG);
        Self::upgrade(doc, node)
    }

    /// Attach radio behavior to an existing element.
    pub fn upgrade(doc: &mut Document, node: NodeId) -> Result<Self, DomError> {
        doc.add_controller(node, Rc::new(RadioBehavior::default()))?;
        KeyboardController::attach(RADIO_ACTIONS, doc, node)?;
        Ok(Self { node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn is_checked(&self, doc: &Document) -> bool {
        doc.has_attribute(self.node, CHECKED)
    }

    /// Check or uncheck the radio. Writing the current value does nothing.
    pub fn set_checked(&self, doc: &mut Document, checked: bool) {
        doc.toggle_attribute(self.node, CHECKED, checked);
    }

    pub fn is_disabled(&self, doc: &Document) -> bool {
        doc.has_attribute(self.node, DISABLED)
    }

    pub fn set_disabled(&self, doc: &mut Document, disabled: bool) {
        doc.toggle_attribute(self.node, DISABLED, disabled);
    }

    pub fn is_active(&self, doc: &Document) -> bool {
        doc.has_attribute(self.node, ACTIVE)
    }
}

#[derive(Default)]
struct RadioBehavior {
    rendered: Cell<bool>,
    click: Cell<Option<ListenerId>>,
}

impl HostController for RadioBehavior {
    fn host_connected(&self, doc: &mut Document, host: NodeId) {
        if !self.rendered.replace(true) {
            attr::render_focusable(doc, host, "radio");
        }
        attr::mirror_boolean(doc, host, CHECKED, ARIA_CHECKED);
        attr::mirror_disabled(doc, host);

        if self.click.get().is_none() {
            match doc.add_listener(host, EventType::Click, move |doc, _| on_click(doc, host)) {
                Ok(id) => self.click.set(Some(id)),
                Err(err) => debug!(%err, "radio could not listen for clicks"),
            }
        }

        // Entering a tree already checked counts as a selection; ancestors
        // connect first, so a coordinating group is already listening.
        if doc.has_attribute(host, CHECKED) {
            doc.dispatch(host, Event::selection_changed(host));
        }
    }

    fn host_disconnected(&self, doc: &mut Document, _host: NodeId) {
        if let Some(id) = self.click.take() {
            doc.remove_listener(id);
        }
    }

    fn attribute_changed(&self, doc: &mut Document, host: NodeId, change: &AttributeChange<'_>) {
        match change.name {
            CHECKED => {
                let checked = change.is_present();
                attr::mirror_boolean(doc, host, CHECKED, ARIA_CHECKED);
                doc.dispatch(host, Event::change(Some(checked)));
                if checked {
                    doc.dispatch(host, Event::selection_changed(host));
                }
            }
            DISABLED => attr::mirror_disabled(doc, host),
            _ => {}
        }
    }
}

fn on_click(doc: &mut Document, host: NodeId) {
    if doc.has_attribute(host, DISABLED) {
        debug!(?host, "ignoring click on disabled radio");
        return;
    }
    doc.toggle_attribute(host, CHECKED, true);
}
