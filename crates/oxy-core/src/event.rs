use crate::document::NodeId;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// The space bar, which crossterm reports as a character.
pub const SPACE: KeyCode = KeyCode::Char(' ');

/// Discriminant used to register listeners for a family of [`EventKind`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    Click,
    Change,
    SelectionChanged,
    Focus,
    Blur,
}

/// What happened, plus the event-specific payload.
///
/// Key events carry a [`crossterm`] key code so that terminal input can be
/// forwarded without translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A key was pressed (or auto-repeated) while the target had focus.
    KeyDown(KeyCode),
    /// A key was released.
    KeyUp(KeyCode),
    /// Activation: a pointer click or a synthesized keyboard click.
    Click,
    /// Persistent state changed. Radios report their new `checked` value,
    /// group coordinators report nothing.
    Change(Option<bool>),
    /// A selectable element became checked. Carries the element itself.
    ///
    /// Internal to a selectable and its coordinating ancestor.
    SelectionChanged(NodeId),
    Focus,
    Blur,
}

impl EventKind {
    /// The listener bucket this kind is delivered to.
    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::KeyDown(_) => EventType::KeyDown,
            EventKind::KeyUp(_) => EventType::KeyUp,
            EventKind::Click => EventType::Click,
            EventKind::Change(_) => EventType::Change,
            EventKind::SelectionChanged(_) => EventType::SelectionChanged,
            EventKind::Focus => EventType::Focus,
            EventKind::Blur => EventType::Blur,
        }
    }

    /// Whether events of this kind travel up the ancestor chain by default.
    ///
    /// Input and selection notifications bubble; `Change`, `Focus` and
    /// `Blur` stay on their target.
    pub fn bubbles_by_default(&self) -> bool {
        matches!(
            self,
            EventKind::KeyDown(_)
                | EventKind::KeyUp(_)
                | EventKind::Click
                | EventKind::SelectionChanged(_)
        )
    }
}

/// An event travelling through the [`Document`](crate::Document).
///
/// `target` and `current_target` are filled in by
/// [`Document::dispatch`](crate::Document::dispatch); listeners call
/// [`stop_propagation`](Event::stop_propagation) to keep the event from
/// reaching further ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub bubbles: bool,
    pub target: NodeId,
    pub current_target: NodeId,
    propagation_stopped: bool,
}

impl Event {
    /// Create an event whose bubbling follows [`EventKind::bubbles_by_default`].
    pub fn new(kind: EventKind) -> Self {
        let bubbles = kind.bubbles_by_default();
        Self {
            kind,
            bubbles,
            target: NodeId::default(),
            current_target: NodeId::default(),
            propagation_stopped: false,
        }
    }

    /// Override whether the event bubbles.
    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn key_down(code: KeyCode) -> Self {
        Self::new(EventKind::KeyDown(code))
    }

    pub fn key_up(code: KeyCode) -> Self {
        Self::new(EventKind::KeyUp(code))
    }

    pub fn click() -> Self {
        Self::new(EventKind::Click)
    }

    pub fn change(detail: Option<bool>) -> Self {
        Self::new(EventKind::Change(detail))
    }

    pub fn selection_changed(source: NodeId) -> Self {
        Self::new(EventKind::SelectionChanged(source))
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Keep the event from reaching ancestors of the current node. Remaining
    /// listeners on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// The key code for key events, `None` otherwise.
    pub fn key_code(&self) -> Option<KeyCode> {
        match self.kind {
            EventKind::KeyDown(code) | EventKind::KeyUp(code) => Some(code),
            _ => None,
        }
    }
}

impl From<KeyEvent> for Event {
    fn from(key: KeyEvent) -> Self {
        match key.kind {
            KeyEventKind::Release => Event::key_up(key.code),
            KeyEventKind::Press | KeyEventKind::Repeat => Event::key_down(key.code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    #[test]
    fn input_events_bubble_and_change_does_not() {
        assert!(Event::click().bubbles);
        assert!(Event::key_down(KeyCode::Enter).bubbles);
        assert!(Event::selection_changed(NodeId::default()).bubbles);
        assert!(!Event::change(Some(true)).bubbles);
        assert!(!Event::new(EventKind::Focus).bubbles);
    }

    #[test]
    fn crossterm_release_maps_to_key_up() {
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        let event = Event::from(release);
        assert_eq!(event.kind, EventKind::KeyUp(KeyCode::Char(' ')));

        let press = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(Event::from(press).kind, EventKind::KeyDown(KeyCode::Enter));
    }

    #[test]
    fn stop_propagation_is_sticky() {
        let mut event = Event::click().with_bubbles(false);
        assert!(!event.bubbles);
        assert!(!event.propagation_stopped());
        event.stop_propagation();
        assert!(event.propagation_stopped());
        assert_eq!(event.key_code(), None);
    }
}
