use alloc::vec::Vec;

use crate::key::KeyedNodeMap;
use crate::{NodeKind, TreeHost, same_node_type};

/// Counts of the structural and value changes a reconciliation pass made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconcileStats {
    /// Nodes taken from the `to` tree and attached to the live tree.
    pub inserted: usize,
    /// Keyed live nodes relocated to a new position.
    pub moved: usize,
    /// Live nodes discarded (subtrees count once).
    pub removed: usize,
    pub text_updates: usize,
    pub attribute_updates: usize,
    /// Children skipped because both sides were the same node.
    pub unchanged: usize,
}

impl ReconcileStats {
    /// `true` when the pass did not attach, move, or discard anything.
    pub fn is_structurally_unchanged(&self) -> bool {
        self.inserted == 0 && self.moved == 0 && self.removed == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome<N> {
    /// The live root after the pass. Differs from the input `from` only when the roots were
    /// incompatible and `to` replaced it.
    pub root: N,
    pub stats: ReconcileStats,
}

/// Mutates a live subtree in place until it matches a freshly built one.
///
/// Children are matched left to right. Nodes carrying a key keep their identity: a keyed node in
/// the new tree claims the live node with the same key wherever it currently sits, and keyed live
/// nodes that fall out of place are only discarded once the whole pass has finished without
/// anyone claiming them.
///
/// Keyed matching only looks at live nodes. A `to` child that cannot be matched is moved into
/// the live tree as a whole, without searching its subtree for keys, so a keyed live node whose
/// parent is replaced by an incompatible one (`div[K]` becoming `span[K]`) is discarded along
/// with that parent's other keyed descendants unless a later sibling claims them.
///
/// The reconciler keeps its scratch buffers between passes; reuse one instance per list.
pub struct Reconciler<H: TreeHost> {
    lookup: KeyedNodeMap<H::Key, H::Node>,
    deferred: Vec<(H::Key, H::Node)>,
    stack: Vec<H::Node>,
    stats: ReconcileStats,
}

impl<H: TreeHost> Default for Reconciler<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TreeHost> core::fmt::Debug for Reconciler<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reconciler")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<H: TreeHost> Reconciler<H> {
    pub fn new() -> Self {
        Self {
            lookup: KeyedNodeMap::new(),
            deferred: Vec::new(),
            stack: Vec::new(),
            stats: ReconcileStats::default(),
        }
    }

    /// Makes `from` match `to`.
    ///
    /// `from` is the live subtree and is mutated in place. `to` is a detached subtree describing
    /// the desired state; the only change made to it is that some of its nodes are moved into
    /// `from`. Whatever is left of `to` afterwards belongs to the caller.
    pub fn reconcile(
        &mut self,
        host: &mut H,
        from: H::Node,
        to: H::Node,
    ) -> ReconcileOutcome<H::Node> {
        self.stats = ReconcileStats::default();

        if from == to {
            self.stats.unchanged += 1;
            return ReconcileOutcome {
                root: from,
                stats: self.stats,
            };
        }

        let root = if same_node_type(host, from, to) {
            self.index_keyed_descendants(host, from);
            self.morph(host, from, to);
            self.drain_deferred(host);
            from
        } else {
            vdebug!(?from, ?to, "root type changed; replacing");
            if let Some(parent) = host.parent(from) {
                host.insert_before(parent, to, Some(from));
            }
            host.discard(from);
            self.stats.inserted += 1;
            self.stats.removed += 1;
            to
        };

        debug_assert!(self.deferred.is_empty(), "deferred removals left behind");
        self.lookup.clear();
        vtrace!(
            inserted = self.stats.inserted,
            moved = self.stats.moved,
            removed = self.stats.removed,
            text_updates = self.stats.text_updates,
            attribute_updates = self.stats.attribute_updates,
            "reconcile"
        );
        ReconcileOutcome {
            root,
            stats: self.stats,
        }
    }

    fn index_keyed_descendants(&mut self, host: &H, root: H::Node) {
        self.lookup.clear();
        self.stack.clear();
        push_children(host, root, &mut self.stack);
        while let Some(node) = self.stack.pop() {
            if let Some(key) = host.key(node) {
                if self.lookup.contains_key(&key) {
                    vwarn!(?node, "duplicate key in live tree; extra node treated as unkeyed");
                } else {
                    self.lookup.insert(key, node);
                }
            }
            push_children(host, node, &mut self.stack);
        }
    }

    // A live node takes part in keyed matching only while it is the registered holder of its
    // key. Duplicates and already claimed nodes behave like unkeyed nodes.
    fn registered_key(&self, host: &H, node: H::Node) -> Option<H::Key> {
        host.key(node)
            .filter(|key| self.lookup.get(key).is_some_and(|&n| n == node))
    }

    fn morph(&mut self, host: &mut H, from: H::Node, to: H::Node) {
        match host.kind(from) {
            NodeKind::Text | NodeKind::Comment => {
                if host.sync_text(from, to) {
                    self.stats.text_updates += 1;
                }
            }
            NodeKind::Element => {
                self.stats.attribute_updates += host.sync_attributes(from, to);
                self.morph_children(host, from, to);
            }
        }
    }

    fn morph_children(&mut self, host: &mut H, parent: H::Node, to_parent: H::Node) {
        let mut cursor = host.first_child(parent);
        let mut next_to = host.first_child(to_parent);
        while let Some(to_child) = next_to {
            // Read before `to_child` can be moved out of `to_parent`.
            next_to = host.next_sibling(to_child);
            cursor = self.place(host, parent, cursor, to_child);
        }

        while let Some(leftover) = cursor {
            cursor = host.next_sibling(leftover);
            self.remove(host, leftover);
        }
    }

    /// Puts a node matching `to_child` at `cursor` and returns the next unprocessed live child.
    fn place(
        &mut self,
        host: &mut H,
        parent: H::Node,
        mut cursor: Option<H::Node>,
        to_child: H::Node,
    ) -> Option<H::Node> {
        if cursor == Some(to_child) {
            self.stats.unchanged += 1;
            return host.next_sibling(to_child);
        }

        if let Some(key) = host.key(to_child) {
            // A keyed node whose type changed cannot be reused; `to_child` replaces it.
            let claimable = match self.lookup.get(&key).copied() {
                Some(candidate) if same_node_type(host, candidate, to_child) => Some(candidate),
                _ => None,
            };
            let placed = match claimable {
                Some(candidate) => {
                    self.lookup.remove(&key);
                    if self.only_keyed_between(host, cursor, candidate) {
                        // Leave the skipped keyed nodes in place; a later sibling may claim
                        // them, otherwise they go with the deferred removals.
                        while let Some(skipped) = cursor.filter(|&c| c != candidate) {
                            cursor = host.next_sibling(skipped);
                            self.remove(host, skipped);
                        }
                    }
                    if cursor != Some(candidate) {
                        host.insert_before(parent, candidate, cursor);
                        self.stats.moved += 1;
                    }
                    self.morph(host, candidate, to_child);
                    candidate
                }
                None => {
                    host.insert_before(parent, to_child, cursor);
                    self.stats.inserted += 1;
                    to_child
                }
            };
            // Recomputed after the morph: descendants may have claimed the old cursor.
            return host.next_sibling(placed);
        }

        while let Some(from_child) = cursor {
            if self.registered_key(host, from_child).is_none()
                && same_node_type(host, from_child, to_child)
            {
                self.morph(host, from_child, to_child);
                return host.next_sibling(from_child);
            }
            cursor = host.next_sibling(from_child);
            self.remove(host, from_child);
        }

        host.insert_before(parent, to_child, None);
        self.stats.inserted += 1;
        None
    }

    /// Whether `candidate` follows `cursor` among the same siblings with only registered keyed
    /// nodes in between. Skipping those keeps a forward-shifted window of keyed rows in place.
    fn only_keyed_between(&self, host: &H, cursor: Option<H::Node>, candidate: H::Node) -> bool {
        let mut probe = cursor;
        while let Some(node) = probe {
            if node == candidate {
                return true;
            }
            if self.registered_key(host, node).is_none() {
                return false;
            }
            probe = host.next_sibling(node);
        }
        false
    }

    /// Discards an unkeyed live node, or defers a keyed one until the end of the pass.
    ///
    /// Keyed descendants of a discarded subtree are pulled out and deferred as well, since they
    /// may still be claimed later in the pass.
    fn remove(&mut self, host: &mut H, node: H::Node) {
        if let Some(key) = self.registered_key(host, node) {
            self.deferred.push((key, node));
            return;
        }

        self.stack.clear();
        push_children(host, node, &mut self.stack);
        while let Some(descendant) = self.stack.pop() {
            match self.registered_key(host, descendant) {
                Some(key) => {
                    host.detach(descendant);
                    self.deferred.push((key, descendant));
                }
                None => push_children(host, descendant, &mut self.stack),
            }
        }

        host.discard(node);
        self.stats.removed += 1;
    }

    fn drain_deferred(&mut self, host: &mut H) {
        for (key, node) in self.deferred.drain(..) {
            if self.lookup.get(&key).is_some_and(|&n| n == node) {
                self.lookup.remove(&key);
                host.discard(node);
                self.stats.removed += 1;
            }
        }
    }
}

fn push_children<H: TreeHost>(host: &H, node: H::Node, out: &mut Vec<H::Node>) {
    let mut child = host.first_child(node);
    while let Some(c) = child {
        out.push(c);
        child = host.next_sibling(c);
    }
}
