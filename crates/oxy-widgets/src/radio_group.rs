//! Coordinator that keeps at most one radio checked across a subtree.
//!
//! The group owns no list of members.  It listens for the bubbling
//! `SelectionChanged` notification a radio fires when it becomes checked,
//! then walks its whole flat subtree (every nesting level, through every
//! slot) and unchecks every other selectable element it finds.  Keep the
//! projected content light: the walk runs on every selection.

use crate::attr::{CHECKED, ROLE};
use oxy_core::{
    Document, DomError, Event, EventKind, EventType, HostController, ListenerId, NodeId,
};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Whether `node` takes part in radio-group exclusivity.
///
/// Participation is a capability, not a type: any element carrying
/// `role="radio"` is treated as selectable.
pub fn is_selectable(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, ROLE) == Some("radio")
}

/// An element whose selectable descendants are mutually exclusive.
///
/// After each selection notification is processed the group fires a
/// non-bubbling `Change(None)` on itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadioGroup {
    node: NodeId,
}

impl RadioGroup {
    pub const TAG: &'static str = "oxy-radio-group";

    /// Create a detached group element.
    pub fn create(doc: &mut Document) -> Result<Self, DomError> {
        let node = doc.create_element(Self::TAG);
        Self::upgrade(doc, node)
    }

    /// Make an existing element coordinate the radios below it.
    pub fn upgrade(doc: &mut Document, node: NodeId) -> Result<Self, DomError> {
        doc.add_controller(node, Rc::new(RadioGroupBehavior::default()))?;
        Ok(Self { node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Selectable elements currently in the group's flat subtree.
    pub fn radios(&self, doc: &Document) -> Vec<NodeId> {
        doc.flat_descendants(self.node)
            .into_iter()
            .filter(|&n| is_selectable(doc, n))
            .collect()
    }

    /// The first checked selectable in tree order.
    pub fn checked_radio(&self, doc: &Document) -> Option<NodeId> {
        self.radios(doc)
            .into_iter()
            .find(|&n| doc.has_attribute(n, CHECKED))
    }
}

#[derive(Default)]
struct RadioGroupBehavior {
    listener: Cell<Option<ListenerId>>,
}

impl HostController for RadioGroupBehavior {
    fn host_connected(&self, doc: &mut Document, host: NodeId) {
        if self.listener.get().is_some() {
            return;
        }
        let listener = doc.add_listener(host, EventType::SelectionChanged, move |doc, event| {
            on_selection_changed(doc, host, event)
        });
        match listener {
            Ok(id) => self.listener.set(Some(id)),
            Err(err) => debug!(%err, "radio group could not listen"),
        }
    }

    fn host_disconnected(&self, doc: &mut Document, _host: NodeId) {
        if let Some(id) = self.listener.take() {
            doc.remove_listener(id);
        }
    }
}

fn on_selection_changed(doc: &mut Document, group: NodeId, event: &mut Event) {
    let EventKind::SelectionChanged(source) = event.kind else {
        return;
    };
    if !doc.has_attribute(source, CHECKED) {
        debug!(?source, "ignoring stale selection notification");
        return;
    }

    let members: Vec<NodeId> = doc
        .flat_descendants(group)
        .into_iter()
        .filter(|&n| is_selectable(doc, n))
        .collect();
    debug!(?group, ?source, members = members.len(), "resolving radio selection");
    for member in members {
        doc.toggle_attribute(member, CHECKED, member == source);
    }
    doc.dispatch(group, Event::change(None));
}
