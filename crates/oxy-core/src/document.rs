//! The element tree that widgets live in.

use crate::controller::{AttributeChange, HostController};
use crate::error::DomError;
use crate::event::{Event, EventType};
use slotmap::{new_key_type, SlotMap};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

new_key_type! {
    /// Handle to a node in a [`Document`].
    pub struct NodeId;

    /// Handle to a listener registered with [`Document::add_listener`].
    pub struct ListenerId;
}

/// Tag of the element created by [`Document::new`] as the tree root.
pub const ROOT_TAG: &str = "root";
/// Tag that marks an element as a content projection point.
pub const SLOT_TAG: &str = "slot";

/// An event callback. Receives the document mutably so it can react by
/// writing attributes or dispatching further events.
pub type Listener = Rc<dyn Fn(&mut Document, &mut Event)>;

enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    connected: bool,
    assigned_slot: Option<NodeId>,
    assigned: Vec<NodeId>,
    listeners: Vec<ListenerId>,
    controllers: Vec<Rc<dyn HostController>>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            connected: false,
            assigned_slot: None,
            assigned: Vec::new(),
            listeners: Vec::new(),
            controllers: Vec::new(),
        }
    }

    fn is_slot(&self) -> bool {
        matches!(&self.data, NodeData::Element { tag, .. } if tag == SLOT_TAG)
    }
}

struct ListenerEntry {
    node: NodeId,
    event_type: EventType,
    callback: Listener,
}

/// An arena-backed element tree with attributes, event dispatch and a
/// controller lifecycle.
///
/// Nodes are created detached.  A node is *connected* while it is reachable
/// from [`root`](Document::root) through parent links; connecting and
/// disconnecting drive the [`HostController`] hooks of every node in the
/// affected subtree.
///
/// All operations are synchronous.  Listeners and controller hooks receive
/// `&mut Document` and may re-enter the document (write attributes, dispatch
/// nested events) before the outer call returns.
///
/// # Example
///
/// ```rust
/// use oxy_core::{Document, Event, EventType};
///
/// let mut doc = Document::new();
/// let list = doc.create_element("ul");
/// let item = doc.create_element("li");
/// doc.append_child(doc.root(), list).unwrap();
/// doc.append_child(list, item).unwrap();
/// assert!(doc.is_connected(item));
///
/// doc.add_listener(list, EventType::Click, |doc, event| {
///     doc.set_attribute(event.current_target, "clicked", "");
/// })
/// .unwrap();
/// doc.click(item);
/// assert!(doc.has_attribute(list, "clicked"));
/// ```
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    listeners: SlotMap<ListenerId, ListenerEntry>,
    root: NodeId,
    pub(crate) focused: Option<NodeId>,
}

impl Document {
    /// Create a document containing only its connected root element.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = Node::new(NodeData::Element {
            tag: ROOT_TAG.to_string(),
            attributes: Vec::new(),
        });
        root.connected = true;
        let root = nodes.insert(root);
        Self {
            nodes,
            listeners: SlotMap::with_key(),
            root,
            focused: None,
        }
    }

    /// The always-connected root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeData::Element {
            tag: tag.into(),
            attributes: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeData::Text(text.into())))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Number of live nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.nodes.get(node), Some(n) if matches!(n.data, NodeData::Element { .. }))
    }

    pub fn is_slot(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(Node::is_slot)
    }

    /// Tag name of an element, `None` for text or unknown nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text(_) => None,
        }
    }

    /// Content of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element { .. } => None,
        }
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(|n| n.connected)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.parent
    }

    /// Light-tree children in order, text nodes included.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Light-tree children that are elements.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// Whether `ancestor` is `node` or one of its light-tree ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    // -- tree mutation -----------------------------------------------------

    /// Append `child` as the last child of `parent`, moving it from its
    /// current position if it already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or last when
    /// `reference` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.element(parent)?;
        self.node(child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyCycle { parent, child });
        }

        self.detach(child)?;

        let siblings = &mut self.nodes[parent].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child].parent = Some(parent);

        if self.nodes[parent].connected {
            self.connect_subtree(child);
        }
        Ok(())
    }

    /// Remove `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Take `node` out of its parent, if it has one. The node and its
    /// subtree stay alive and can be re-inserted.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.node(node)?.parent else {
            return Ok(());
        };
        self.nodes[parent].children.retain(|&c| c != node);
        self.nodes[node].parent = None;
        if self.nodes[node].connected {
            self.disconnect_subtree(node);
        }
        Ok(())
    }

    /// Detach `node` and drop it and its whole subtree from the arena,
    /// together with their listeners, controllers and slot assignments.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.root {
            return Err(DomError::RootRemoval);
        }
        self.detach(node)?;
        for n in self.subtree(node) {
            self.unassign(n);
            let Some(removed) = self.nodes.remove(n) else {
                continue;
            };
            for assigned in removed.assigned {
                if let Some(a) = self.nodes.get_mut(assigned) {
                    a.assigned_slot = None;
                }
            }
            for id in removed.listeners {
                self.listeners.remove(id);
            }
        }
        Ok(())
    }

    /// `node` and its light-tree descendants in tree order.
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            let Some(data) = self.nodes.get(n) else {
                continue;
            };
            out.push(n);
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    fn connect_subtree(&mut self, node: NodeId) {
        let subtree = self.subtree(node);
        for &n in &subtree {
            self.nodes[n].connected = true;
        }
        trace!(?node, count = subtree.len(), "connected subtree");
        for n in subtree {
            if !self.is_connected(n) {
                continue;
            }
            let controllers = self.nodes[n].controllers.clone();
            for controller in controllers {
                controller.host_connected(self, n);
            }
        }
    }

    fn disconnect_subtree(&mut self, node: NodeId) {
        let subtree = self.subtree(node);
        for &n in &subtree {
            self.nodes[n].connected = false;
        }
        if self.focused.is_some_and(|f| subtree.contains(&f)) {
            self.focused = None;
        }
        trace!(?node, count = subtree.len(), "disconnected subtree");
        for n in subtree {
            if self.nodes.get(n).is_none_or(|data| data.connected) {
                continue;
            }
            let controllers = self.nodes[n].controllers.clone();
            for controller in controllers {
                controller.host_disconnected(self, n);
            }
        }
    }

    // -- content projection ------------------------------------------------

    /// Project `node` into `slot`. A node is assigned to at most one slot;
    /// assigning it again moves it.
    pub fn assign_slot(&mut self, slot: NodeId, node: NodeId) -> Result<(), DomError> {
        if !self.node(slot)?.is_slot() {
            return Err(DomError::NotASlot(slot));
        }
        self.node(node)?;
        if self.is_inclusive_ancestor(node, slot) {
            return Err(DomError::HierarchyCycle {
                parent: slot,
                child: node,
            });
        }
        self.unassign(node);
        self.nodes[node].assigned_slot = Some(slot);
        self.nodes[slot].assigned.push(node);
        Ok(())
    }

    /// Remove `node` from the slot it is assigned to, if any.
    pub fn unassign(&mut self, node: NodeId) {
        let Some(slot) = self.nodes.get_mut(node).and_then(|n| n.assigned_slot.take()) else {
            return;
        };
        if let Some(slot) = self.nodes.get_mut(slot) {
            slot.assigned.retain(|&n| n != node);
        }
    }

    pub fn assigned_slot(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node)?.assigned_slot
    }

    /// Nodes assigned to `slot`.
    ///
    /// With `flatten`, assigned slots are replaced by their own flattened
    /// assignments, and a slot with nothing assigned yields its fallback
    /// children.
    pub fn assigned_nodes(&self, slot: NodeId, flatten: bool) -> Vec<NodeId> {
        let mut visited = HashSet::new();
        self.assigned_nodes_inner(slot, flatten, &mut visited)
    }

    fn assigned_nodes_inner(
        &self,
        slot: NodeId,
        flatten: bool,
        visited: &mut HashSet<NodeId>,
    ) -> Vec<NodeId> {
        let Some(data) = self.nodes.get(slot) else {
            return Vec::new();
        };
        if !flatten {
            return data.assigned.clone();
        }
        if !visited.insert(slot) {
            return Vec::new();
        }
        if data.assigned.is_empty() {
            return data.children.clone();
        }
        let mut out = Vec::new();
        for &node in &data.assigned {
            if self.is_slot(node) {
                out.extend(self.assigned_nodes_inner(node, true, visited));
            } else {
                out.push(node);
            }
        }
        out
    }

    /// Children of `node` in the flat tree: a slot shows its assigned nodes
    /// (or its own children when nothing is assigned), and nodes assigned to
    /// a slot are shown there instead of under their light parent.
    pub fn flat_children(&self, node: NodeId) -> Vec<NodeId> {
        let Some(data) = self.nodes.get(node) else {
            return Vec::new();
        };
        if data.is_slot() && !data.assigned.is_empty() {
            return data.assigned.clone();
        }
        data.children
            .iter()
            .copied()
            .filter(|&c| self.assigned_slot(c).is_none())
            .collect()
    }

    /// All flat-tree descendants of `node` in pre-order, crossing every
    /// level of slot projection. `node` itself is not included.
    pub fn flat_descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut visited = HashSet::from([node]);
        let mut stack: Vec<NodeId> = self.flat_children(node).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            if !visited.insert(n) {
                continue;
            }
            out.push(n);
            stack.extend(self.flat_children(n).into_iter().rev());
        }
        out
    }

    /// The nodes an event targeted at `node` visits when it bubbles:
    /// the node itself, then its assigned slot or parent, and so on up.
    pub fn event_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.contains(node).then_some(node);
        while let Some(n) = current {
            if path.len() > self.nodes.len() {
                break;
            }
            path.push(n);
            current = self.assigned_slot(n).or_else(|| self.parent(n));
        }
        path
    }

    // -- attributes --------------------------------------------------------

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node)?.data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeData::Text(_) => None,
        }
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// All attributes of an element in insertion order.
    pub fn attributes(&self, node: NodeId) -> impl Iterator<Item = (&str, &str)> {
        let attributes = match self.nodes.get(node).map(|n| &n.data) {
            Some(NodeData::Element { attributes, .. }) => attributes.as_slice(),
            _ => &[],
        };
        attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, returning whether its value changed.
    ///
    /// A change is reported synchronously to the element's controllers.
    /// Writes to unknown or text nodes are ignored.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        let Some(attributes) = self.attributes_mut(node) else {
            warn!(?node, name, "ignoring attribute write on a non-element");
            return false;
        };
        let old = match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) if v == value => return false,
            Some((_, v)) => Some(std::mem::replace(v, value.to_string())),
            None => {
                attributes.push((name.to_string(), value.to_string()));
                None
            }
        };
        self.notify_attribute_changed(node, name, old.as_deref(), Some(value));
        true
    }

    /// Remove an attribute, returning whether it was present.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> bool {
        let Some(attributes) = self.attributes_mut(node) else {
            warn!(?node, name, "ignoring attribute removal on a non-element");
            return false;
        };
        let Some(index) = attributes.iter().position(|(k, _)| k == name) else {
            return false;
        };
        let (_, old) = attributes.remove(index);
        self.notify_attribute_changed(node, name, Some(&old), None);
        true
    }

    /// Add (with an empty value) or remove a presence attribute, returning
    /// whether anything changed. An attribute that is already present keeps
    /// its value.
    pub fn toggle_attribute(&mut self, node: NodeId, name: &str, on: bool) -> bool {
        match (on, self.has_attribute(node, name)) {
            (true, false) => self.set_attribute(node, name, ""),
            (false, true) => self.remove_attribute(node, name),
            _ => false,
        }
    }

    fn attributes_mut(&mut self, node: NodeId) -> Option<&mut Vec<(String, String)>> {
        match &mut self.nodes.get_mut(node)?.data {
            NodeData::Element { attributes, .. } => Some(attributes),
            NodeData::Text(_) => None,
        }
    }

    fn notify_attribute_changed(
        &mut self,
        node: NodeId,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        trace!(?node, name, ?old_value, ?new_value, "attribute changed");
        let controllers = match self.nodes.get(node) {
            Some(data) => data.controllers.clone(),
            None => return,
        };
        let change = AttributeChange {
            name,
            old_value,
            new_value,
        };
        for controller in controllers {
            controller.attribute_changed(self, node, &change);
        }
    }

    // -- controllers -------------------------------------------------------

    /// Register a controller on `host`. If the host is already connected,
    /// [`HostController::host_connected`] runs before this returns.
    pub fn add_controller(
        &mut self,
        host: NodeId,
        controller: Rc<dyn HostController>,
    ) -> Result<(), DomError> {
        self.element(host)?;
        self.nodes[host].controllers.push(controller.clone());
        if self.nodes[host].connected {
            controller.host_connected(self, host);
        }
        Ok(())
    }

    /// Unregister a controller, running its disconnect hook first if the
    /// host is connected. Returns whether the controller was registered.
    pub fn remove_controller(&mut self, host: NodeId, controller: &Rc<dyn HostController>) -> bool {
        let Some(data) = self.nodes.get_mut(host) else {
            return false;
        };
        let Some(index) = data.controllers.iter().position(|c| Rc::ptr_eq(c, controller)) else {
            return false;
        };
        let removed = data.controllers.remove(index);
        if data.connected {
            removed.host_disconnected(self, host);
        }
        true
    }

    pub fn controller_count(&self, host: NodeId) -> usize {
        self.nodes.get(host).map_or(0, |n| n.controllers.len())
    }

    // -- listeners & dispatch ----------------------------------------------

    /// Listen for events of `event_type` arriving at `node`, either targeted
    /// at it or bubbling through it.
    pub fn add_listener<F>(
        &mut self,
        node: NodeId,
        event_type: EventType,
        callback: F,
    ) -> Result<ListenerId, DomError>
    where
        F: Fn(&mut Document, &mut Event) + 'static,
    {
        self.node(node)?;
        let id = self.listeners.insert(ListenerEntry {
            node,
            event_type,
            callback: Rc::new(callback),
        });
        self.nodes[node].listeners.push(id);
        Ok(id)
    }

    /// Unregister a listener. Returns whether it was still registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let Some(entry) = self.listeners.remove(id) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(entry.node) {
            node.listeners.retain(|&l| l != id);
        }
        true
    }

    /// Number of listeners currently registered on `node`.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.nodes.get(node).map_or(0, |n| n.listeners.len())
    }

    /// Deliver `event` to `target` and, if it bubbles, to every node on the
    /// [`event_path`](Document::event_path), until a listener stops
    /// propagation.  Returns the event after dispatch so callers can inspect
    /// whether it was stopped.
    ///
    /// Listeners run synchronously and may dispatch further events.  A
    /// listener removed while the event is in flight is not invoked.
    pub fn dispatch(&mut self, target: NodeId, mut event: Event) -> Event {
        if !self.contains(target) {
            debug!(?target, kind = ?event.kind, "dropping event for unknown target");
            return event;
        }
        event.target = target;
        let path = if event.bubbles {
            self.event_path(target)
        } else {
            vec![target]
        };
        trace!(?target, kind = ?event.kind, "dispatch");

        let event_type = event.event_type();
        for node in path {
            let Some(data) = self.nodes.get(node) else {
                break;
            };
            event.current_target = node;
            let listeners: Vec<(ListenerId, Listener)> = data
                .listeners
                .iter()
                .filter_map(|&id| {
                    let entry = self.listeners.get(id)?;
                    (entry.event_type == event_type).then(|| (id, entry.callback.clone()))
                })
                .collect();
            for (id, callback) in listeners {
                if !self.listeners.contains_key(id) {
                    continue;
                }
                callback(self, &mut event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event
    }

    /// Dispatch a bubbling [`Click`](crate::EventKind::Click) at `node`, the
    /// same event a pointer click produces.
    pub fn click(&mut self, node: NodeId) -> Event {
        self.dispatch(node, Event::click())
    }

    // -- helpers -----------------------------------------------------------

    fn node(&self, node: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(node).ok_or(DomError::UnknownNode(node))
    }

    fn element(&self, node: NodeId) -> Result<&Node, DomError> {
        let data = self.node(node)?;
        match data.data {
            NodeData::Element { .. } => Ok(data),
            NodeData::Text(_) => Err(DomError::NotAnElement(node)),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .field("focused", &self.focused)
            .finish()
    }
}
