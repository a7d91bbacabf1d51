//! Keyboard activation shared by the interactive widgets.
//!
//! A [`KeyboardController`] turns Space and Enter transitions on its host
//! into two separate effects:
//!
//! * the transient `active` attribute, present exactly while the key is
//!   held, which styling can key off for a pressed look;
//! * a synthetic [`Click`](oxy_core::EventKind::Click), indistinguishable
//!   from a pointer click, which is what drives persistent state such as
//!   `checked` or a tab group's selection.
//!
//! Which effects fire on which transitions is fixed by the [`HostActions`]
//! given at construction.

use crate::attr::{ACTIVE, DISABLED};
use bitflags::bitflags;
use crossterm::event::KeyCode;
use oxy_core::{
    Document, DomError, Event, EventKind, EventType, HostController, ListenerId, NodeId, SPACE,
};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, trace};

bitflags! {
    /// Behaviors a [`KeyboardController`] applies to its host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct HostActions: u8 {
        /// Hold `active` while Space is down.
        const ACTIVE_DURING_SPACE = 1 << 0;
        /// Hold `active` while Enter is down.
        const ACTIVE_DURING_ENTER = 1 << 1;
        /// Click when Space goes down.
        const CLICK_ON_SPACE_DOWN = 1 << 2;
        /// Click when Space comes up.
        const CLICK_ON_SPACE_UP   = 1 << 3;
        /// Click when Enter goes down.
        const CLICK_ON_ENTER_DOWN = 1 << 4;
        /// Click when Enter comes up.
        const CLICK_ON_ENTER_UP   = 1 << 5;
    }
}

/// Maps key presses and releases on a host element to its `active`
/// attribute and to synthetic clicks.
///
/// The controller listens only while its host is connected: it registers
/// one key-down and one key-up listener when the host connects and removes
/// exactly those when the host disconnects, however that happens.
///
/// The host's `disabled` attribute is read on every event.  A disabled host
/// ignores keys completely: no attribute changes, and the event keeps
/// propagating.
///
/// # Example
///
/// ```rust
/// use oxy_core::testing::{press, release};
/// use oxy_core::{Document, SPACE};
/// use oxy_widgets::keyboard::{HostActions, KeyboardController};
///
/// let mut doc = Document::new();
/// let host = doc.create_element("x-pressable");
/// let root = doc.root();
/// doc.append_child(root, host).unwrap();
/// KeyboardController::attach(HostActions::ACTIVE_DURING_SPACE, &mut doc, host).unwrap();
///
/// press(&mut doc, host, SPACE);
/// assert!(doc.has_attribute(host, "active"));
/// release(&mut doc, host, SPACE);
/// assert!(!doc.has_attribute(host, "active"));
/// ```
#[derive(Debug)]
pub struct KeyboardController {
    actions: HostActions,
    listeners: Cell<Option<(ListenerId, ListenerId)>>,
}

impl KeyboardController {
    pub fn new(actions: HostActions) -> Rc<Self> {
        Rc::new(Self {
            actions,
            listeners: Cell::new(None),
        })
    }

    /// Create a controller and register it on `host`.
    pub fn attach(
        actions: HostActions,
        doc: &mut Document,
        host: NodeId,
    ) -> Result<Rc<Self>, DomError> {
        let controller = Self::new(actions);
        doc.add_controller(host, controller.clone())?;
        Ok(controller)
    }

    /// Unregister from `host`, releasing the key listeners if they are held.
    pub fn detach(self: &Rc<Self>, doc: &mut Document, host: NodeId) -> bool {
        let controller: Rc<dyn HostController> = self.clone();
        doc.remove_controller(host, &controller)
    }

    pub fn actions(&self) -> HostActions {
        self.actions
    }

    /// Whether the key listeners are currently registered.
    pub fn is_listening(&self) -> bool {
        self.listeners.get().is_some()
    }
}

impl HostController for KeyboardController {
    fn host_connected(&self, doc: &mut Document, host: NodeId) {
        if self.is_listening() {
            return;
        }
        let actions = self.actions;
        let listeners = doc
            .add_listener(host, EventType::KeyDown, move |doc, event| {
                on_key_down(actions, doc, host, event)
            })
            .and_then(|down| {
                doc.add_listener(host, EventType::KeyUp, move |doc, event| {
                    on_key_up(actions, doc, host, event)
                })
                .map(|up| (down, up))
            });
        match listeners {
            Ok(ids) => self.listeners.set(Some(ids)),
            Err(err) => debug!(%err, "keyboard controller could not listen"),
        }
    }

    fn host_disconnected(&self, doc: &mut Document, _host: NodeId) {
        if let Some((down, up)) = self.listeners.take() {
            doc.remove_listener(down);
            doc.remove_listener(up);
        }
    }
}

fn on_key_down(actions: HostActions, doc: &mut Document, host: NodeId, event: &mut Event) {
    if doc.has_attribute(host, DISABLED) {
        return;
    }
    let EventKind::KeyDown(code) = event.kind else {
        return;
    };
    match code {
        SPACE => {
            if actions.contains(HostActions::ACTIVE_DURING_SPACE) {
                event.stop_propagation();
                set_active(doc, host, true);
            }
            if actions.contains(HostActions::CLICK_ON_SPACE_DOWN) {
                event.stop_propagation();
                click(doc, host);
            }
        }
        KeyCode::Enter => {
            if actions.contains(HostActions::ACTIVE_DURING_ENTER) {
                event.stop_propagation();
                set_active(doc, host, true);
            }
            if actions.contains(HostActions::CLICK_ON_ENTER_DOWN) {
                event.stop_propagation();
                click(doc, host);
            }
        }
        _ => {}
    }
}

fn on_key_up(actions: HostActions, doc: &mut Document, host: NodeId, event: &mut Event) {
    if doc.has_attribute(host, DISABLED) {
        return;
    }
    let EventKind::KeyUp(code) = event.kind else {
        return;
    };
    match code {
        SPACE => {
            if actions.contains(HostActions::ACTIVE_DURING_SPACE) {
                event.stop_propagation();
                set_active(doc, host, false);
            }
            if actions.contains(HostActions::CLICK_ON_SPACE_UP) {
                event.stop_propagation();
                click(doc, host);
            }
        }
        KeyCode::Enter => {
            if actions.contains(HostActions::ACTIVE_DURING_ENTER) {
                set_active(doc, host, false);
                event.stop_propagation();
            }
            if actions.contains(HostActions::CLICK_ON_ENTER_UP) {
                event.stop_propagation();
                click(doc, host);
            }
        }
        _ => {}
    }
}

fn set_active(doc: &mut Document, host: NodeId, active: bool) {
    if active {
        doc.set_attribute(host, ACTIVE, ACTIVE);
    } else {
        doc.remove_attribute(host, ACTIVE);
    }
}

fn click(doc: &mut Document, host: NodeId) {
    trace!(?host, "keyboard click");
    doc.click(host);
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxy_core::testing::{press, release, EventRecorder};

    fn setup(actions: HostActions) -> (Document, NodeId, Rc<KeyboardController>) {
        let mut doc = Document::new();
        let host = doc.create_element("x-host");
        let root = doc.root();
        doc.append_child(root, host).unwrap();
        let controller = KeyboardController::attach(actions, &mut doc, host).unwrap();
        (doc, host, controller)
    }

    #[test]
    fn active_during_space_only_never_clicks() {
        let (mut doc, host, _) = setup(HostActions::ACTIVE_DURING_SPACE);
        let clicks = EventRecorder::attach(&mut doc, host, EventType::Click).unwrap();

        let down = press(&mut doc, host, SPACE);
        assert!(down.propagation_stopped());
        assert_eq!(doc.attribute(host, ACTIVE), Some("active"));

        let up = release(&mut doc, host, SPACE);
        assert!(up.propagation_stopped());
        assert!(!doc.has_attribute(host, ACTIVE));
        assert_eq!(clicks.count(), 0);
    }

    #[test]
    fn enter_down_sets_active_and_clicks() {
        let actions = HostActions::ACTIVE_DURING_ENTER | HostActions::CLICK_ON_ENTER_DOWN;
        let (mut doc, host, _) = setup(actions);
        let clicks = EventRecorder::attach(&mut doc, host, EventType::Click).unwrap();

        press(&mut doc, host, KeyCode::Enter);
        assert!(doc.has_attribute(host, ACTIVE));
        assert_eq!(clicks.count(), 1);

        release(&mut doc, host, KeyCode::Enter);
        assert!(!doc.has_attribute(host, ACTIVE));
        assert_eq!(clicks.count(), 1);
    }

    #[test]
    fn space_up_clicks_once() {
        let (mut doc, host, _) = setup(HostActions::CLICK_ON_SPACE_UP);
        let clicks = EventRecorder::attach(&mut doc, host, EventType::Click).unwrap();

        let down = press(&mut doc, host, SPACE);
        assert!(!down.propagation_stopped());
        assert_eq!(clicks.count(), 0);
        release(&mut doc, host, SPACE);
        assert_eq!(clicks.count(), 1);
        assert!(!doc.has_attribute(host, ACTIVE));
    }

    #[test]
    fn symmetric_click_transitions() {
        let actions = HostActions::CLICK_ON_SPACE_DOWN | HostActions::CLICK_ON_ENTER_UP;
        let (mut doc, host, _) = setup(actions);
        let clicks = EventRecorder::attach(&mut doc, host, EventType::Click).unwrap();

        press(&mut doc, host, SPACE);
        release(&mut doc, host, SPACE);
        press(&mut doc, host, KeyCode::Enter);
        assert_eq!(clicks.count(), 1);
        release(&mut doc, host, KeyCode::Enter);
        assert_eq!(clicks.count(), 2);
    }

    #[test]
    fn other_keys_are_ignored() {
        let (mut doc, host, _) = setup(HostActions::all());
        let clicks = EventRecorder::attach(&mut doc, host, EventType::Click).unwrap();
        let event = press(&mut doc, host, KeyCode::Char('a'));
        release(&mut doc, host, KeyCode::Tab);
        assert!(!event.propagation_stopped());
        assert!(!doc.has_attribute(host, ACTIVE));
        assert_eq!(clicks.count(), 0);
    }

    #[test]
    fn disabled_is_checked_on_every_event() {
        let (mut doc, host, _) = setup(HostActions::all());
        let clicks = EventRecorder::attach(&mut doc, host, EventType::Click).unwrap();

        doc.toggle_attribute(host, DISABLED, true);
        let down = press(&mut doc, host, KeyCode::Enter);
        assert!(!down.propagation_stopped());
        assert!(!doc.has_attribute(host, ACTIVE));
        assert_eq!(clicks.count(), 0);

        doc.toggle_attribute(host, DISABLED, false);
        press(&mut doc, host, KeyCode::Enter);
        assert!(doc.has_attribute(host, ACTIVE));
        assert_eq!(clicks.count(), 1);
    }

    #[test]
    fn keys_bubbling_from_descendants_are_handled_at_host() {
        let (mut doc, host, _) = setup(HostActions::ACTIVE_DURING_SPACE);
        let label = doc.create_element("span");
        doc.append_child(host, label).unwrap();
        let root = doc.root();
        let at_root = EventRecorder::attach(&mut doc, root, EventType::KeyDown).unwrap();

        press(&mut doc, label, SPACE);
        assert!(doc.has_attribute(host, ACTIVE));
        assert_eq!(at_root.count(), 0);
    }

    #[test]
    fn listeners_follow_connection() {
        let mut doc = Document::new();
        let host = doc.create_element("x-host");
        let controller =
            KeyboardController::attach(HostActions::ACTIVE_DURING_SPACE, &mut doc, host).unwrap();
        assert!(!controller.is_listening());
        assert_eq!(doc.listener_count(host), 0);

        let root = doc.root();
        doc.append_child(root, host).unwrap();
        assert!(controller.is_listening());
        assert_eq!(doc.listener_count(host), 2);

        doc.detach(host).unwrap();
        assert!(!controller.is_listening());
        assert_eq!(doc.listener_count(host), 0);

        // A detached host no longer reacts.
        press(&mut doc, host, SPACE);
        assert!(!doc.has_attribute(host, ACTIVE));

        for _ in 0..3 {
            doc.append_child(root, host).unwrap();
            doc.detach(host).unwrap();
        }
        assert_eq!(doc.listener_count(host), 0);
    }

    #[test]
    fn detach_releases_listeners() {
        let (mut doc, host, controller) = setup(HostActions::ACTIVE_DURING_ENTER);
        assert!(controller.detach(&mut doc, host));
        assert_eq!(doc.listener_count(host), 0);
        assert_eq!(doc.controller_count(host), 0);
        assert!(!controller.detach(&mut doc, host));
    }

    #[test]
    fn click_handler_observes_fresh_active_state() {
        let actions = HostActions::ACTIVE_DURING_ENTER | HostActions::CLICK_ON_ENTER_DOWN;
        let (mut doc, host, _) = setup(actions);
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        doc.add_listener(host, EventType::Click, move |doc, event| {
            sink.set(Some(doc.has_attribute(event.current_target, ACTIVE)));
        })
        .unwrap();

        press(&mut doc, host, KeyCode::Enter);
        assert_eq!(seen.get(), Some(true));
    }

    #[test]
    fn reentrant_key_from_click_handler_is_consistent() {
        // A click handler that itself releases the key: the nested key-up
        // clears `active` before the outer key-down returns.
        let actions = HostActions::ACTIVE_DURING_ENTER | HostActions::CLICK_ON_ENTER_DOWN;
        let (mut doc, host, _) = setup(actions);
        doc.add_listener(host, EventType::Click, |doc, event| {
            release(doc, event.current_target, KeyCode::Enter);
        })
        .unwrap();

        press(&mut doc, host, KeyCode::Enter);
        assert!(!doc.has_attribute(host, ACTIVE));
    }
}
