//! Keyboard focus tracking.
//!
//! The focused element is the target of keyboard input.  Only connected
//! elements carrying a `tabindex` attribute and no `disabled` attribute can
//! take focus; sequential navigation skips negative `tabindex` values.

use crate::document::{Document, NodeId};
use crate::event::{Event, EventKind};
use tracing::debug;

impl Document {
    /// The element that currently has focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Whether [`focus`](Document::focus) would accept `node`.
    pub fn is_focusable(&self, node: NodeId) -> bool {
        self.is_connected(node)
            && self.has_attribute(node, "tabindex")
            && !self.has_attribute(node, "disabled")
    }

    /// Move focus to `node`, dispatching `Blur` on the previously focused
    /// element and `Focus` on the new one.  Returns `false` and leaves focus
    /// alone if the node is not focusable.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_focusable(node) {
            debug!(?node, "ignoring focus request for unfocusable node");
            return false;
        }
        if self.focused == Some(node) {
            return true;
        }
        self.blur();
        self.focused = Some(node);
        self.dispatch(node, Event::new(EventKind::Focus));
        true
    }

    /// Clear focus, dispatching `Blur` on the element that had it.
    pub fn blur(&mut self) {
        if let Some(previous) = self.focused.take() {
            self.dispatch(previous, Event::new(EventKind::Blur));
        }
    }

    /// Focusable elements with a non-negative `tabindex`, in flat-tree order.
    pub fn focus_order(&self) -> Vec<NodeId> {
        self.flat_descendants(self.root())
            .into_iter()
            .filter(|&n| self.is_focusable(n) && self.tab_index(n).is_some_and(|i| i >= 0))
            .collect()
    }

    /// Focus the element after the focused one, wrapping around after the
    /// last.  Returns the newly focused element.
    pub fn focus_next(&mut self) -> Option<NodeId> {
        self.step_focus(true)
    }

    /// Focus the element before the focused one, wrapping around before the
    /// first.  Returns the newly focused element.
    pub fn focus_prev(&mut self) -> Option<NodeId> {
        self.step_focus(false)
    }

    fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.attribute(node, "tabindex")?.trim().parse().ok()
    }

    fn step_focus(&mut self, forward: bool) -> Option<NodeId> {
        let order = self.focus_order();
        if order.is_empty() {
            return None;
        }
        let n = order.len();
        let current = self
            .focused
            .and_then(|f| order.iter().position(|&o| o == f));
        let index = match (current, forward) {
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
            (None, true) => 0,
            (None, false) => n - 1,
        };
        let target = order[index];
        self.focus(target).then_some(target)
    }
}
