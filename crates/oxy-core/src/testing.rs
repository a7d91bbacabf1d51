use crate::document::{Document, ListenerId, NodeId};
use crate::error::DomError;
use crate::event::{Event, EventKind, EventType};
use crossterm::event::KeyCode;
use std::cell::RefCell;
use std::rc::Rc;

/// Records every event of one type that reaches a node.
///
/// `EventRecorder` lets you assert on notifications in a plain `#[test]`
/// function: attach it where a consumer would listen, drive the document,
/// then inspect what arrived.
///
/// # Example
///
/// ```rust
/// use oxy_core::testing::EventRecorder;
/// use oxy_core::{Document, Event, EventType};
///
/// let mut doc = Document::new();
/// let node = doc.create_element("x-radio");
/// let changes = EventRecorder::attach(&mut doc, node, EventType::Change).unwrap();
///
/// doc.dispatch(node, Event::change(Some(true)));
/// assert_eq!(changes.count(), 1);
/// assert_eq!(changes.change_details(), vec![Some(true)]);
/// ```
pub struct EventRecorder {
    events: Rc<RefCell<Vec<Event>>>,
    listener: ListenerId,
}

impl EventRecorder {
    /// Start recording events of `event_type` arriving at `node`.
    pub fn attach(doc: &mut Document, node: NodeId, event_type: EventType) -> Result<Self, DomError> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let listener = doc.add_listener(node, event_type, move |_, event| {
            sink.borrow_mut().push(event.clone());
        })?;
        Ok(Self { events, listener })
    }

    /// A snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }

    /// Targets of the recorded events, in arrival order.
    pub fn targets(&self) -> Vec<NodeId> {
        self.events.borrow().iter().map(|e| e.target).collect()
    }

    /// Payloads of recorded `Change` events.
    pub fn change_details(&self) -> Vec<Option<bool>> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::Change(detail) => Some(detail),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Stop recording.
    pub fn detach(self, doc: &mut Document) {
        doc.remove_listener(self.listener);
    }
}

/// Dispatch a key press at `node`.
pub fn press(doc: &mut Document, node: NodeId, code: KeyCode) -> Event {
    doc.dispatch(node, Event::key_down(code))
}

/// Dispatch a key release at `node`.
pub fn release(doc: &mut Document, node: NodeId, code: KeyCode) -> Event {
    doc.dispatch(node, Event::key_up(code))
}

/// Press and release a key at `node`.
pub fn tap(doc: &mut Document, node: NodeId, code: KeyCode) {
    press(doc, node, code);
    release(doc, node, code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SPACE;

    #[test]
    fn records_only_its_event_type() {
        let mut doc = Document::new();
        let node = doc.create_element("x");
        let clicks = EventRecorder::attach(&mut doc, node, EventType::Click).unwrap();
        let keys = EventRecorder::attach(&mut doc, node, EventType::KeyUp).unwrap();

        doc.click(node);
        tap(&mut doc, node, SPACE);

        assert_eq!(clicks.count(), 1);
        assert_eq!(clicks.targets(), vec![node]);
        assert_eq!(keys.events()[0].kind, EventKind::KeyUp(SPACE));
    }

    #[test]
    fn detach_stops_recording() {
        let mut doc = Document::new();
        let node = doc.create_element("x");
        let clicks = EventRecorder::attach(&mut doc, node, EventType::Click).unwrap();
        doc.click(node);
        clicks.clear();
        assert_eq!(clicks.count(), 0);

        clicks.detach(&mut doc);
        assert_eq!(doc.listener_count(node), 0);
    }
}
