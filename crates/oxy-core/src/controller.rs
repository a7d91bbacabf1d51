use crate::document::{Document, NodeId};

/// A change to one attribute of a host element, delivered to its
/// controllers after the new value has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange<'a> {
    pub name: &'a str,
    pub old_value: Option<&'a str>,
    pub new_value: Option<&'a str>,
}

impl AttributeChange<'_> {
    /// Whether a boolean (presence) attribute is now set.
    pub fn is_present(&self) -> bool {
        self.new_value.is_some()
    }
}

/// Behavior attached to a host element for the element's lifetime.
///
/// A `HostController` is the unit of reuse between widgets: the keyboard
/// controller, the radio behavior and the tab-group coordinator are all
/// controllers.  The [`Document`] drives the lifecycle:
///
/// * [`host_connected`](HostController::host_connected) runs when the host
///   becomes reachable from the document root (or immediately on
///   registration if it already is);
/// * [`host_disconnected`](HostController::host_disconnected) runs when it
///   stops being reachable, whichever way that happens: the host or one of
///   its ancestors is detached, the node is removed from the arena, or the
///   controller itself is unregistered;
/// * [`attribute_changed`](HostController::attribute_changed) runs
///   synchronously whenever an attribute of the host takes a new value.
///
/// Every hook receives the document mutably, so a controller can register
/// listeners, write attributes and dispatch events.  Controllers are shared
/// (`Rc`) and take `&self`; mutable bookkeeping goes in `Cell`s.
///
/// # Example
///
/// ```rust
/// use oxy_core::{AttributeChange, Document, HostController, NodeId};
/// use std::rc::Rc;
///
/// struct MirrorDisabled;
///
/// impl HostController for MirrorDisabled {
///     fn attribute_changed(&self, doc: &mut Document, host: NodeId, change: &AttributeChange<'_>) {
///         if change.name == "disabled" {
///             let value = change.is_present().then_some("true");
///             match value {
///                 Some(v) => doc.set_attribute(host, "aria-disabled", v),
///                 None => doc.remove_attribute(host, "aria-disabled"),
///             };
///         }
///     }
/// }
///
/// let mut doc = Document::new();
/// let el = doc.create_element("div");
/// doc.add_controller(el, Rc::new(MirrorDisabled)).unwrap();
/// doc.set_attribute(el, "disabled", "");
/// assert_eq!(doc.attribute(el, "aria-disabled"), Some("true"));
/// ```
pub trait HostController {
    /// The host became connected.
    fn host_connected(&self, _doc: &mut Document, _host: NodeId) {}

    /// The host became disconnected. Release everything acquired in
    /// [`host_connected`](HostController::host_connected).
    fn host_disconnected(&self, _doc: &mut Document, _host: NodeId) {}

    /// An attribute of the host changed value.
    fn attribute_changed(&self, _doc: &mut Document, _host: NodeId, _change: &AttributeChange<'_>) {}
}
