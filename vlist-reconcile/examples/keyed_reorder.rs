use vlist_reconcile::{MemTree, Reconciler, TreeBuilder, TreeHost};

fn row(tree: &mut MemTree, key: u64) -> vlist_reconcile::NodeId {
    let li = tree.create_element("li");
    let text = tree.create_text(&format!("row {key}"));
    tree.append_child(li, text);
    tree.set_key(li, Some(key));
    li
}

fn list(tree: &mut MemTree, keys: &[u64]) -> vlist_reconcile::NodeId {
    let ul = tree.create_element("ul");
    for &key in keys {
        let li = row(tree, key);
        tree.append_child(ul, li);
    }
    ul
}

fn main() {
    let mut tree = MemTree::new();
    let mut reconciler = Reconciler::new();

    let live = list(&mut tree, &[1, 2, 3, 4, 5]);
    println!("before: {}", tree.markup(live));

    for keys in [&[5, 1, 2, 3, 4][..], &[2, 3, 4, 5, 6], &[6, 4, 2]] {
        let next = list(&mut tree, keys);
        tree.reset_counters();
        let outcome = reconciler.reconcile(&mut tree, live, next);
        println!("after:  {}", tree.markup(outcome.root));
        println!("  stats: {:?}", outcome.stats);
        println!("  host mutations: {:?}", tree.counters());
        tree.discard(next);
    }
}
