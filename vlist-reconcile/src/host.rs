use crate::NodeKey;

/// What a node is, independent of its tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

/// The tree capabilities the reconciler needs from a UI back end.
///
/// Node handles are small copyable values (an arena index, a DOM node reference, a scene graph
/// id). Handle equality is node identity. The `from` and `to` trees handed to the reconciler must
/// live in the same host so that nodes can be moved between them.
pub trait TreeHost {
    type Node: Copy + Eq + core::fmt::Debug;
    type Key: NodeKey;

    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Tag name of an element; `None` for text and comment nodes.
    fn tag(&self, node: Self::Node) -> Option<&str>;

    fn key(&self, node: Self::Node) -> Option<Self::Key>;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Moves `child` under `parent`, before `reference` (or last when `reference` is `None`).
    ///
    /// `child` is detached from its current parent first, if it has one.
    fn insert_before(
        &mut self,
        parent: Self::Node,
        child: Self::Node,
        reference: Option<Self::Node>,
    );

    /// Unlinks `node` from its parent. The node and its subtree stay usable.
    fn detach(&mut self, node: Self::Node);

    /// Drops `node` and everything below it for good.
    ///
    /// Hosts with garbage-collected nodes can leave this as a plain detach.
    fn discard(&mut self, node: Self::Node) {
        self.detach(node);
    }

    /// Copies the text value of `to` onto `from` if it differs. Returns whether a write happened.
    fn sync_text(&mut self, from: Self::Node, to: Self::Node) -> bool;

    /// Makes the attributes of element `from` match element `to`. Returns the number of writes.
    fn sync_attributes(&mut self, from: Self::Node, to: Self::Node) -> usize;
}

/// Construction capabilities, needed by callers that build fresh subtrees (not by the
/// reconciler itself).
pub trait TreeBuilder: TreeHost {
    fn create_element(&mut self, tag: &str) -> Self::Node;
    fn create_text(&mut self, text: &str) -> Self::Node;
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    fn append_child(&mut self, parent: Self::Node, child: Self::Node) {
        self.insert_before(parent, child, None);
    }
}

/// Same node kind, and for elements the same tag (ASCII case-insensitive).
pub fn same_node_type<H: TreeHost + ?Sized>(host: &H, a: H::Node, b: H::Node) -> bool {
    if host.kind(a) != host.kind(b) {
        return false;
    }
    match (host.tag(a), host.tag(b)) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        (None, None) => true,
        _ => false,
    }
}
