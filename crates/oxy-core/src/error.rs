use crate::document::NodeId;

/// Structural errors returned by [`Document`](crate::Document) tree operations.
///
/// These signal a contract violation by the embedding application (wiring a
/// widget to a node that was never created, building a cyclic tree, ...).
/// Runtime input anomalies such as a click on a disabled element never
/// produce an error; they are ignored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The node id does not refer to a live node in this document.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    /// The operation needs an element but the node is a text node.
    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),
    /// Inserting the node would make it its own ancestor.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    HierarchyCycle { parent: NodeId, child: NodeId },
    /// Content can only be assigned to `<slot>` elements.
    #[error("node {0:?} is not a slot")]
    NotASlot(NodeId),
    /// The reference node is not a child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// The document root is permanent.
    #[error("the document root cannot be removed")]
    RootRemoval,
}
