//! Core runtime for the **oxy** widgets.
//!
//! `oxy-core` is a small, synchronous stand-in for the parts of a DOM that
//! interactive widgets rely on.  Widgets keep all of their state as
//! attributes on elements and cooperate purely through events, so any
//! element that exposes the right attributes can take part.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Document`] | Arena-backed element tree: attributes, slots, listeners, dispatch, focus |
//! | [`NodeId`] | Handle to an element or text node |
//! | [`Event`] | An event in flight, with bubbling and propagation stop |
//! | [`HostController`] | Behavior attached to an element for its connected lifetime |
//! | [`DomError`] | Structural contract violations in tree operations |
//! | [`EventRecorder`](testing::EventRecorder) | Test helper that captures events at a node |
//!
//! # Event flow
//!
//! 1. **dispatch** -- [`Document::dispatch`] delivers an event to its target.
//! 2. **bubble** -- bubbling events continue through the assigned slot or
//!    parent of each node up to the root.
//! 3. **react** -- listeners receive `&mut Document` and may write
//!    attributes, which synchronously notifies the element's controllers.
//! 4. **re-enter** -- any of the above may dispatch further events; the
//!    nested dispatch finishes before the outer one resumes.
//!
//! All state lives on elements.  Nothing here is `Send`: the document is
//! meant to be driven from a single UI thread.

pub mod controller;
pub mod document;
pub mod error;
pub mod event;
pub mod focus;
pub mod testing;

pub use controller::{AttributeChange, HostController};
pub use document::{Document, Listener, ListenerId, NodeId, ROOT_TAG, SLOT_TAG};
pub use error::DomError;
pub use event::{Event, EventKind, EventType, SPACE};
