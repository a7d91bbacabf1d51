//! Feeds terminal input into a [`Document`].
//!
//! The driver owns the document and translates `crossterm` events into
//! document events: key presses go to the focused element, `Tab`/`BackTab`
//! move focus, and left mouse clicks are resolved through a caller-supplied
//! hit test.  Rendering is left to the caller.

use crossterm::event::{
    Event as TerminalEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use futures::{Stream, StreamExt};
use oxy_core::{Document, Event, NodeId};
use std::io;
use tracing::{debug, trace};

/// Errors that can occur while running a [`Driver`] or setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// An I/O error from the terminal event source or the log file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The global tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Configuration options for a [`Driver`].
///
/// Use struct update syntax to override only the options you need:
///
/// ```rust,ignore
/// let opts = DriverOptions {
///     synthesize_key_release: false,
///     ..DriverOptions::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Follow every key press with a matching release (default: true).
    ///
    /// Most terminals never report key releases, so without this Space
    /// would never activate anything.  Turn it off when the terminal has
    /// keyboard enhancement enabled; incoming releases are dropped while it
    /// is on.
    pub synthesize_key_release: bool,
    /// Focus the nearest focusable ancestor of a clicked node (default: true).
    pub focus_on_click: bool,
    /// Stop [`Driver::run`] on `Ctrl+C` (default: true).
    pub quit_on_ctrl_c: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            synthesize_key_release: true,
            focus_on_click: true,
            quit_on_ctrl_c: true,
        }
    }
}

/// Maps a terminal cell (column, row) to the node drawn there.
pub type HitTest = Box<dyn Fn(&Document, u16, u16) -> Option<NodeId>>;

/// Owns a [`Document`] and drives it from terminal input.
pub struct Driver {
    document: Document,
    options: DriverOptions,
    hit_test: Option<HitTest>,
    pressed: Option<NodeId>,
    should_quit: bool,
}

impl Driver {
    /// Create a driver with default options.
    pub fn new(document: Document) -> Self {
        Self::with_options(document, DriverOptions::default())
    }

    pub fn with_options(document: Document, options: DriverOptions) -> Self {
        Self {
            document,
            options,
            hit_test: None,
            pressed: None,
            should_quit: false,
        }
    }

    /// Set the hit test used to resolve mouse events.  Without one, mouse
    /// input is ignored.
    pub fn with_hit_test(
        mut self,
        hit_test: impl Fn(&Document, u16, u16) -> Option<NodeId> + 'static,
    ) -> Self {
        self.hit_test = Some(Box::new(hit_test));
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    /// Whether a quit key has been seen.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Process a single terminal event.
    pub fn handle(&mut self, event: TerminalEvent) {
        match event {
            TerminalEvent::Key(key) => self.handle_key(key),
            TerminalEvent::Mouse(mouse) => self.handle_mouse(mouse),
            other => trace!(?other, "ignoring terminal event"),
        }
    }

    /// Consume events until the stream ends or a quit key is seen.
    ///
    /// Pass `crossterm::event::EventStream::new()` for live input.
    pub async fn run<S>(&mut self, mut events: S) -> Result<(), DriverError>
    where
        S: Stream<Item = io::Result<TerminalEvent>> + Unpin,
    {
        while let Some(event) = events.next().await {
            self.handle(event?);
            if self.should_quit {
                debug!("driver stopping on quit key");
                break;
            }
        }
        Ok(())
    }

    fn key_target(&self) -> NodeId {
        self.document
            .focused()
            .unwrap_or_else(|| self.document.root())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.options.quit_on_ctrl_c
            && key.code == KeyCode::Char('c')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }
        if key.kind == KeyEventKind::Release && self.options.synthesize_key_release {
            trace!(code = ?key.code, "dropping reported release");
            return;
        }

        // The synthesized release goes where the press went, even when the
        // press moved focus, so key-down and key-up pair on one element.
        let target = self.key_target();
        let dispatched = self.document.dispatch(target, Event::from(key));

        if key.kind != KeyEventKind::Release && !dispatched.propagation_stopped() {
            match key.code {
                KeyCode::Tab => {
                    self.document.focus_next();
                }
                KeyCode::BackTab => {
                    self.document.focus_prev();
                }
                _ => {}
            }
        }

        if key.kind != KeyEventKind::Release && self.options.synthesize_key_release {
            self.document.dispatch(target, Event::key_up(key.code));
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(hit_test) = &self.hit_test else {
            return;
        };
        let hit = hit_test(&self.document, mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = hit;
                if self.options.focus_on_click {
                    match hit.and_then(|node| self.focusable_ancestor(node)) {
                        Some(node) => {
                            self.document.focus(node);
                        }
                        None => self.document.blur(),
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let pressed = self.pressed.take();
                match hit {
                    Some(node) if pressed == Some(node) => {
                        self.document.click(node);
                    }
                    _ => trace!(?pressed, ?hit, "mouse released away from press"),
                }
            }
            _ => {}
        }
    }

    fn focusable_ancestor(&self, node: NodeId) -> Option<NodeId> {
        self.document
            .event_path(node)
            .into_iter()
            .find(|&n| self.document.is_focusable(n))
    }
}
