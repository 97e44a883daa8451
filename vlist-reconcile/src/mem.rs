//! An in-memory arena tree implementing [`TreeHost`] and [`TreeBuilder`].
//!
//! Useful as a retained-mode back end for hosts that render rows themselves (terminal grids,
//! custom scene graphs), and as a test double: every structural mutation is counted in
//! [`MutationCounters`].

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;

use crate::{NodeKind, TreeBuilder, TreeHost};

/// Key type used by [`MemTree`] nodes.
pub type MemKey = u64;

/// Generational handle of a [`MemTree`] node.
///
/// Freed slots are reused with a bumped generation, so a stale `NodeId` never aliases a newer
/// node. Stale handles read as childless, parentless comment nodes and are ignored by mutations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

impl NodeData {
    fn kind(&self) -> NodeKind {
        match self {
            Self::Element { .. } => NodeKind::Element,
            Self::Text(_) => NodeKind::Text,
            Self::Comment(_) => NodeKind::Comment,
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    data: NodeData,
    key: Option<MemKey>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Running totals of the mutations applied to a [`MemTree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MutationCounters {
    pub created: usize,
    /// `insert_before` calls that linked a node (moves included).
    pub inserted: usize,
    /// Explicit detaches of attached nodes.
    pub detached: usize,
    /// `discard` calls on live nodes.
    pub discarded: usize,
    pub text_writes: usize,
    pub attribute_writes: usize,
}

#[derive(Clone, Debug, Default)]
pub struct MemTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    counters: MutationCounters,
}

impl MemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn is_alive(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    pub fn counters(&self) -> MutationCounters {
        self.counters
    }

    pub fn reset_counters(&mut self) {
        self.counters = MutationCounters::default();
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Comment(String::from(text)))
    }

    pub fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.get(node).map(|n| &n.data)
    }

    pub fn set_key(&mut self, node: NodeId, key: Option<MemKey>) {
        if let Some(n) = self.get_mut(node) {
            n.key = key;
        }
    }

    /// Text of a text or comment node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Text(s) | NodeData::Comment(s) => Some(s),
            NodeData::Element { .. } => None,
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(NodeData::Text(s) | NodeData::Comment(s)) = self.get_mut(node).map(|n| &mut n.data) {
            s.clear();
            s.push_str(text);
            self.counters.text_writes += 1;
        }
    }

    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        match self.data(node) {
            Some(NodeData::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attributes(node)
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(NodeData::Element { attributes, .. }) = self.get_mut(node).map(|n| &mut n.data) {
            let before = attributes.len();
            attributes.retain(|(n, _)| n != name);
            if attributes.len() != before {
                self.counters.attribute_writes += 1;
            }
        }
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.first_child(node), move |&c| self.next_sibling(c))
    }

    /// Serializes a subtree as compact HTML-like markup, for assertions and debugging.
    pub fn markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(node, &mut out);
        out
    }

    fn write_markup(&self, node: NodeId, out: &mut String) {
        match self.data(node) {
            None => {}
            Some(NodeData::Text(s)) => out.push_str(s),
            Some(NodeData::Comment(s)) => {
                let _ = write!(out, "<!--{s}-->");
            }
            Some(NodeData::Element { tag, attributes }) => {
                let _ = write!(out, "<{tag}");
                for (name, value) in attributes {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                out.push('>');
                for child in self.children(node) {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_mut())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let node = Node {
            data,
            key: None,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        };
        self.live += 1;
        self.counters.created += 1;
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            return NodeId(idx, slot.generation);
        }
        let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 1,
            node: Some(node),
        });
        NodeId(idx, 1)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }

    /// Unlinks `node` from its parent and siblings. Returns whether it was attached.
    fn unlink(&mut self, node: NodeId) -> bool {
        let Some((parent, prev, next)) = self
            .get(node)
            .and_then(|n| Some((n.parent?, n.prev_sibling, n.next_sibling)))
        else {
            return false;
        };

        match prev {
            Some(p) => {
                if let Some(p) = self.get_mut(p) {
                    p.next_sibling = next;
                }
            }
            None => {
                if let Some(parent) = self.get_mut(parent) {
                    parent.first_child = next;
                }
            }
        }
        match next {
            Some(nx) => {
                if let Some(nx) = self.get_mut(nx) {
                    nx.prev_sibling = prev;
                }
            }
            None => {
                if let Some(parent) = self.get_mut(parent) {
                    parent.last_child = prev;
                }
            }
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = None;
            n.prev_sibling = None;
            n.next_sibling = None;
        }
        true
    }
}

impl TreeHost for MemTree {
    type Node = NodeId;
    type Key = MemKey;

    fn kind(&self, node: NodeId) -> NodeKind {
        self.data(node).map_or(NodeKind::Comment, NodeData::kind)
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match self.data(node)? {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    fn key(&self, node: NodeId) -> Option<MemKey> {
        self.get(node)?.key
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.next_sibling
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if reference == Some(child) {
            return;
        }
        if !self.is_alive(parent) || !self.is_alive(child) {
            debug_assert!(false, "insert_before on a stale node");
            return;
        }
        if self.is_ancestor_or_self(child, parent) {
            debug_assert!(false, "insert_before would create a cycle");
            return;
        }
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                debug_assert!(false, "insert_before reference is not a child of parent");
                return;
            }
        }

        self.unlink(child);
        let prev = match reference {
            Some(r) => self.get(r).and_then(|n| n.prev_sibling),
            None => self.get(parent).and_then(|n| n.last_child),
        };
        if let Some(n) = self.get_mut(child) {
            n.parent = Some(parent);
            n.prev_sibling = prev;
            n.next_sibling = reference;
        }
        match prev {
            Some(p) => {
                if let Some(p) = self.get_mut(p) {
                    p.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.first_child = Some(child);
                }
            }
        }
        match reference {
            Some(r) => {
                if let Some(r) = self.get_mut(r) {
                    r.prev_sibling = Some(child);
                }
            }
            None => {
                if let Some(p) = self.get_mut(parent) {
                    p.last_child = Some(child);
                }
            }
        }
        self.counters.inserted += 1;
    }

    fn detach(&mut self, node: NodeId) {
        if self.unlink(node) {
            self.counters.detached += 1;
        }
    }

    fn discard(&mut self, node: NodeId) {
        if !self.is_alive(node) {
            return;
        }
        self.unlink(node);
        self.counters.discarded += 1;

        let mut stack = alloc::vec![node];
        while let Some(id) = stack.pop() {
            stack.extend(self.children(id));
            let slot = &mut self.slots[id.idx()];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.0);
            self.live -= 1;
        }
    }

    fn sync_text(&mut self, from: NodeId, to: NodeId) -> bool {
        let Some(wanted) = self.text(to) else {
            return false;
        };
        if self.text(from) == Some(wanted) {
            return false;
        }
        let wanted = String::from(wanted);
        self.set_text(from, &wanted);
        true
    }

    fn sync_attributes(&mut self, from: NodeId, to: NodeId) -> usize {
        if self.attributes(from) == self.attributes(to) {
            return 0;
        }
        let wanted = self.attributes(to).to_vec();
        let Some(NodeData::Element { attributes, .. }) = self.get_mut(from).map(|n| &mut n.data)
        else {
            return 0;
        };

        let mut writes = 0;
        attributes.retain(|(name, _)| {
            let keep = wanted.iter().any(|(n, _)| n == name);
            if !keep {
                writes += 1;
            }
            keep
        });
        for (name, value) in wanted {
            match attributes.iter_mut().find(|(n, _)| *n == name) {
                Some((_, current)) if *current == value => {}
                Some((_, current)) => {
                    *current = value;
                    writes += 1;
                }
                None => {
                    attributes.push((name, value));
                    writes += 1;
                }
            }
        }
        self.counters.attribute_writes += writes;
        writes
    }
}

impl TreeBuilder for MemTree {
    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: String::from(tag),
            attributes: Vec::new(),
        })
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(String::from(text)))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(NodeData::Element { attributes, .. }) = self.get_mut(node).map(|n| &mut n.data)
        else {
            return;
        };
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, current)) if current == value => return,
            Some((_, current)) => {
                current.clear();
                current.push_str(value);
            }
            None => attributes.push((String::from(name), String::from(value))),
        }
        self.counters.attribute_writes += 1;
    }
}
