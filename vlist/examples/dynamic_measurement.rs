// Example: rows measured on demand, then invalidated after a height change.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use vlist::{ManagerOptions, SizeAndPositionManager};

fn main() -> vlist::Result<()> {
    let expanded_row_height = Arc::new(AtomicU64::new(30));
    let heights = Arc::clone(&expanded_row_height);
    let mut m = SizeAndPositionManager::new(
        ManagerOptions::per_index(100, move |i| {
            if i == 3 {
                heights.load(Ordering::Relaxed) as f64
            } else {
                20.0 + (i % 3) as f64 * 10.0
            }
        })
        .with_estimated_item_size(30.0),
    );

    println!("estimated total={}", m.total_size());
    let range = m.visible_range(120.0, 0.0, 1)?;
    println!(
        "range={range:?} measured={:?} total={}",
        m.last_measured_index(),
        m.total_size()
    );

    // Row 3 grows; everything from it onward must be measured again.
    expanded_row_height.store(200, Ordering::Relaxed);
    m.reset_from(3);
    println!(
        "after reset: measured={:?} offset(10)={}",
        m.last_measured_index(),
        m.size_and_position_for_index(10)?.offset
    );
    Ok(())
}
