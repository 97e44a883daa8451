use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use vlist::Align;
use vlist_adapter::{ListOptions, VirtualizedListController};
use vlist_reconcile::{MemTree, NodeId, TreeBuilder};

fn render_row(tree: &mut MemTree, index: usize) -> NodeId {
    let li = tree.create_element("li");
    let label = tree.create_text(&format!("item #{index}"));
    tree.append_child(li, label);
    tree.set_key(li, Some(index as u64));
    li
}

fn main() -> vlist::Result<()> {
    let mut tree = MemTree::new();
    let viewport = tree.create_element("section");

    // Stand-in for a host frame loop: remember whether a frame was requested.
    let frame_requested = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&frame_requested);

    let options = ListOptions::new(100_000, 24.0, render_row)
        .with_height(240.0)
        .with_overscan_count(3)
        .with_on_frame_requested(Some(move || flag.store(true, Ordering::Relaxed)))
        .with_on_rows_rendered(Some(|start, stop| println!("rendered rows {start}..={stop}")));
    let mut list = VirtualizedListController::create(&mut tree, viewport, options)?;
    println!("total height: {}px", list.total_size());

    // A burst of scroll events within one frame renders once.
    for offset in [100.0, 250.0, 480.0, 720.0] {
        list.on_scroll(offset);
    }
    if frame_requested.swap(false, Ordering::Relaxed) {
        list.on_frame(&mut tree)?;
    }

    let offset = list.scroll_to_index(50_000, Align::Center)?;
    println!("scrolled to {offset}");
    if frame_requested.swap(false, Ordering::Relaxed) {
        list.on_frame(&mut tree)?;
    }
    println!("host nodes alive: {}", tree.len());

    list.destroy(&mut tree);
    println!("after destroy: {}", tree.markup(viewport));
    Ok(())
}
