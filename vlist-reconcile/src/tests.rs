use crate::*;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use proptest::prelude::*;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start) as u64) as usize
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_range_usize(0, i + 1);
            items.swap(i, j);
        }
    }
}

fn element(t: &mut MemTree, tag: &str, children: &[NodeId]) -> NodeId {
    let node = t.create_element(tag);
    for &child in children {
        t.append_child(node, child);
    }
    node
}

fn text_element(t: &mut MemTree, tag: &str, text: &str) -> NodeId {
    let text = t.create_text(text);
    element(t, tag, &[text])
}

fn keyed_row(t: &mut MemTree, key: MemKey, text: &str) -> NodeId {
    let row = text_element(t, "li", text);
    t.set_key(row, Some(key));
    row
}

fn list(t: &mut MemTree, rows: &[NodeId]) -> NodeId {
    element(t, "ul", rows)
}

fn children(t: &MemTree, node: NodeId) -> Vec<NodeId> {
    t.children(node).collect()
}

fn child_keys(t: &MemTree, node: NodeId) -> Vec<Option<MemKey>> {
    t.children(node).map(|c| t.key(c)).collect()
}

#[test]
fn identical_structure_needs_no_structural_changes() {
    let mut t = MemTree::new();
    let a = text_element(&mut t, "li", "a");
    let b = text_element(&mut t, "li", "b");
    let from = list(&mut t, &[a, b]);
    let a2 = text_element(&mut t, "li", "a");
    let b2 = text_element(&mut t, "li", "b");
    let to = list(&mut t, &[a2, b2]);
    t.reset_counters();

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(outcome.root, from);
    assert!(outcome.stats.is_structurally_unchanged());
    assert_eq!(outcome.stats.text_updates, 0);
    assert_eq!(children(&t, from), [a, b]);
    assert_eq!(t.counters(), MutationCounters::default());
}

#[test]
fn keyed_rotation_reuses_every_node() {
    let mut t = MemTree::new();
    let a = keyed_row(&mut t, 1, "A");
    let b = keyed_row(&mut t, 2, "B");
    let c = keyed_row(&mut t, 3, "C");
    let from = list(&mut t, &[a, b, c]);
    let c2 = keyed_row(&mut t, 3, "C");
    let a2 = keyed_row(&mut t, 1, "A");
    let b2 = keyed_row(&mut t, 2, "B");
    let to = list(&mut t, &[c2, a2, b2]);
    t.reset_counters();

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(children(&t, from), [c, a, b]);
    assert_eq!(outcome.stats.inserted, 0);
    assert_eq!(outcome.stats.removed, 0);
    assert!(outcome.stats.moved > 0);
    assert_eq!(t.counters().created, 0);
    assert_eq!(t.counters().discarded, 0);
}

#[test]
fn shifting_a_keyed_window_moves_nothing() {
    let mut t = MemTree::new();
    let rows: Vec<NodeId> = (0..10)
        .map(|k| keyed_row(&mut t, k, &format!("row {k}")))
        .collect();
    let from = list(&mut t, &rows);
    let next: Vec<NodeId> = (2..12)
        .map(|k| keyed_row(&mut t, k, &format!("row {k}")))
        .collect();
    let to = list(&mut t, &next);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(outcome.stats.moved, 0);
    assert_eq!(outcome.stats.inserted, 2);
    assert_eq!(outcome.stats.removed, 2);
    assert_eq!(
        child_keys(&t, from),
        (2..12u64).map(Some).collect::<Vec<_>>()
    );
    assert_eq!(&children(&t, from)[..8], &rows[2..]);
    assert_eq!(&children(&t, from)[8..], &next[8..]);
    assert!(!t.is_alive(rows[0]));
    assert!(!t.is_alive(rows[1]));

    // And back up again.
    let prev: Vec<NodeId> = (0..10)
        .map(|k| keyed_row(&mut t, k, &format!("row {k}")))
        .collect();
    let to = list(&mut t, &prev);
    let kept = children(&t, from);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(outcome.stats.moved, 0);
    assert_eq!(outcome.stats.inserted, 2);
    assert_eq!(outcome.stats.removed, 2);
    assert_eq!(&children(&t, from)[2..], &kept[..8]);
}

#[test]
fn text_is_patched_in_place() {
    let mut t = MemTree::new();
    let from = text_element(&mut t, "p", "old");
    let old_text = t.first_child(from).unwrap();
    let to = text_element(&mut t, "P", "new");

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(outcome.root, from);
    assert_eq!(outcome.stats.text_updates, 1);
    assert_eq!(t.first_child(from), Some(old_text));
    assert_eq!(t.text(old_text), Some("new"));
}

#[test]
fn changed_node_type_replaces_the_child() {
    let mut t = MemTree::new();
    let span = t.create_element("span");
    let comment = t.create_comment("c");
    let from = element(&mut t, "div", &[span, comment]);
    let em = t.create_element("em");
    let text = t.create_text("c");
    let to = element(&mut t, "div", &[em, text]);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(children(&t, from), [em, text]);
    assert!(!t.is_alive(span));
    assert!(!t.is_alive(comment));
    assert_eq!(outcome.stats.inserted, 2);
    assert_eq!(outcome.stats.removed, 2);
    assert_eq!(t.markup(from), "<div><em></em>c</div>");
}

#[test]
fn surplus_children_are_removed_and_missing_ones_appended() {
    let mut t = MemTree::new();
    let rows: Vec<NodeId> = ["a", "b", "c"]
        .iter()
        .map(|s| text_element(&mut t, "li", s))
        .collect();
    let from = list(&mut t, &rows);
    let one = text_element(&mut t, "li", "a");
    let to = list(&mut t, &[one]);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);
    assert_eq!(outcome.stats.removed, 2);
    assert_eq!(children(&t, from), [rows[0]]);

    let more: Vec<NodeId> = ["x", "y", "z"]
        .iter()
        .map(|s| text_element(&mut t, "li", s))
        .collect();
    let to = list(&mut t, &more);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);
    assert_eq!(outcome.stats.inserted, 2);
    assert_eq!(outcome.stats.text_updates, 1);
    assert_eq!(children(&t, from), [rows[0], more[1], more[2]]);
    assert_eq!(t.markup(from), "<ul><li>x</li><li>y</li><li>z</li></ul>");
}

#[test]
fn keyed_node_survives_removal_of_its_unkeyed_ancestor() {
    let mut t = MemTree::new();
    let item = t.create_element("li");
    t.set_key(item, Some(7));
    let section = element(&mut t, "section", &[item]);
    let p = t.create_element("p");
    let from = element(&mut t, "div", &[section, p]);

    let p2 = t.create_element("p");
    let item2 = t.create_element("li");
    t.set_key(item2, Some(7));
    let to = element(&mut t, "div", &[p2, item2]);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(children(&t, from), [p, item]);
    assert!(!t.is_alive(section));
    assert!(t.is_alive(item));
    assert_eq!(outcome.stats.removed, 1);
    assert_eq!(outcome.stats.moved, 1);
}

#[test]
fn keyed_node_under_replaced_parent_is_not_rescued_from_the_new_subtree() {
    let mut t = MemTree::new();
    let item = t.create_element("li");
    t.set_key(item, Some(3));
    let inner = element(&mut t, "div", &[item]);
    let from = element(&mut t, "div", &[inner]);

    let item2 = t.create_element("li");
    t.set_key(item2, Some(3));
    let span = element(&mut t, "span", &[item2]);
    let to = element(&mut t, "div", &[span]);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(children(&t, from), [span]);
    assert_eq!(children(&t, span), [item2]);
    assert!(!t.is_alive(item));
    assert!(!t.is_alive(inner));
    assert_eq!(outcome.stats.removed, 2);
    assert_eq!(t.markup(from), "<div><span><li></li></span></div>");
}

#[test]
fn unclaimed_keyed_nodes_are_discarded_after_the_pass() {
    let mut t = MemTree::new();
    let one = keyed_row(&mut t, 1, "one");
    let two = keyed_row(&mut t, 2, "two");
    let from = list(&mut t, &[one, two]);
    let two2 = keyed_row(&mut t, 2, "two");
    let to = list(&mut t, &[two2]);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(children(&t, from), [two]);
    assert!(!t.is_alive(one));
    assert_eq!(outcome.stats.removed, 1);
}

#[test]
fn keyed_node_with_new_tag_is_replaced() {
    let mut t = MemTree::new();
    let old = keyed_row(&mut t, 1, "x");
    let from = list(&mut t, &[old]);
    let new = t.create_element("div");
    t.set_key(new, Some(1));
    let to = list(&mut t, &[new]);

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(children(&t, from), [new]);
    assert!(!t.is_alive(old));
    assert_eq!(outcome.stats.inserted, 1);
    assert_eq!(outcome.stats.removed, 1);
}

#[test]
fn incompatible_roots_are_replaced() {
    let mut t = MemTree::new();
    let from = text_element(&mut t, "div", "a");
    let container = element(&mut t, "main", &[from]);
    let to = text_element(&mut t, "span", "a");

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(outcome.root, to);
    assert_eq!(children(&t, container), [to]);
    assert!(!t.is_alive(from));
}

#[test]
fn same_root_is_a_no_op() {
    let mut t = MemTree::new();
    let root = text_element(&mut t, "div", "a");
    t.reset_counters();
    let outcome = Reconciler::new().reconcile(&mut t, root, root);
    assert_eq!(outcome.stats.unchanged, 1);
    assert_eq!(t.counters(), MutationCounters::default());
}

#[test]
fn attributes_are_synchronised() {
    let mut t = MemTree::new();
    let from = t.create_element("div");
    t.set_attribute(from, "class", "a");
    t.set_attribute(from, "id", "x");
    let to = t.create_element("div");
    t.set_attribute(to, "class", "b");
    t.set_attribute(to, "title", "t");

    let outcome = Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(outcome.stats.attribute_updates, 3);
    assert_eq!(t.attribute(from, "class"), Some("b"));
    assert_eq!(t.attribute(from, "title"), Some("t"));
    assert_eq!(t.attribute(from, "id"), None);
}

#[test]
fn duplicate_keys_do_not_leak_nodes() {
    let mut t = MemTree::new();
    let first = keyed_row(&mut t, 1, "a");
    let second = keyed_row(&mut t, 1, "b");
    let from = list(&mut t, &[first, second]);
    let wanted = keyed_row(&mut t, 1, "c");
    let to = list(&mut t, &[wanted]);

    Reconciler::new().reconcile(&mut t, from, to);

    assert_eq!(t.markup(from), "<ul><li>c</li></ul>");
    assert_eq!(t.is_alive(first) as u8 + t.is_alive(second) as u8, 1);
}

#[test]
fn random_keyed_lists_match_and_keep_identity() {
    let mut rng = Lcg::new(1234);
    let mut reconciler = Reconciler::new();

    for round in 0..200 {
        let mut t = MemTree::new();
        let mut from_keys: Vec<MemKey> = (0..20).filter(|_| rng.gen_bool()).collect();
        let mut to_keys: Vec<MemKey> = (0..20).filter(|_| rng.gen_bool()).collect();
        rng.shuffle(&mut from_keys);
        rng.shuffle(&mut to_keys);

        let from_rows: Vec<NodeId> = from_keys
            .iter()
            .map(|&k| keyed_row(&mut t, k, &format!("old {k}")))
            .collect();
        let from = list(&mut t, &from_rows);
        let to_rows: Vec<NodeId> = to_keys
            .iter()
            .map(|&k| keyed_row(&mut t, k, &format!("new {k}")))
            .collect();
        let to = list(&mut t, &to_rows);
        let expected: String = t.markup(to);
        let created = t.counters().created;

        reconciler.reconcile(&mut t, from, to);

        assert_eq!(t.markup(from), expected, "round {round}");
        assert_eq!(t.counters().created, created);
        let live = children(&t, from);
        for (pos, key) in to_keys.iter().enumerate() {
            if let Some(old) = from_keys.iter().position(|k| k == key) {
                assert_eq!(live[pos], from_rows[old], "round {round}: key {key} lost identity");
            }
        }
        for (pos, key) in from_keys.iter().enumerate() {
            assert_eq!(t.is_alive(from_rows[pos]), to_keys.contains(key));
        }
        // Once the rest of `to` is gone: the root, plus a row and its text per key.
        t.discard(to);
        assert_eq!(t.len(), 1 + 2 * to_keys.len());
    }
}

#[test]
fn mixed_keyed_and_unkeyed_children() {
    let mut rng = Lcg::new(99);
    for round in 0..100 {
        let mut t = MemTree::new();
        let build = |t: &mut MemTree, rng: &mut Lcg, prefix: &str| {
            let n = rng.gen_range_usize(0, 8);
            let rows: Vec<NodeId> = (0..n)
                .map(|i| {
                    if rng.gen_bool() {
                        keyed_row(t, rng.gen_range_usize(0, 6) as MemKey, &format!("{prefix}{i}"))
                    } else if rng.gen_bool() {
                        t.create_text(&format!("{prefix}{i}"))
                    } else {
                        text_element(t, "li", &format!("{prefix}{i}"))
                    }
                })
                .collect();
            list(t, &rows)
        };
        let from = build(&mut t, &mut rng, "f");
        let to = build(&mut t, &mut rng, "t");
        let expected = t.markup(to);

        Reconciler::new().reconcile(&mut t, from, to);

        assert_eq!(t.markup(from), expected, "round {round}");
    }
}

proptest! {
    #[test]
    fn keyed_lists_converge(
        from_keys in prop::sample::subsequence((0..24u64).collect::<Vec<_>>(), 0..24).prop_shuffle(),
        to_keys in prop::sample::subsequence((0..24u64).collect::<Vec<_>>(), 0..24).prop_shuffle(),
    ) {
        let mut t = MemTree::new();
        let from_rows: Vec<NodeId> = from_keys
            .iter()
            .map(|&k| keyed_row(&mut t, k, "old"))
            .collect();
        let from = list(&mut t, &from_rows);
        let to_rows: Vec<NodeId> = to_keys
            .iter()
            .map(|&k| keyed_row(&mut t, k, "new"))
            .collect();
        let to = list(&mut t, &to_rows);

        let outcome = Reconciler::new().reconcile(&mut t, from, to);

        prop_assert_eq!(child_keys(&t, from), to_keys.iter().copied().map(Some).collect::<Vec<_>>());
        let reused = to_keys.iter().filter(|k| from_keys.contains(k)).count();
        prop_assert_eq!(outcome.stats.inserted, to_keys.len() - reused);
        prop_assert_eq!(outcome.stats.removed, from_keys.len() - reused);
        prop_assert_eq!(outcome.stats.text_updates, reused);
    }
}
