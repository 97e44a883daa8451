// Example: minimal usage and scroll-to helper.
use vlist::{Align, ManagerOptions, SizeAndPositionManager};

fn main() -> vlist::Result<()> {
    let mut m = SizeAndPositionManager::new(ManagerOptions::new(1_000_000, 30.0));
    println!("total_size={}", m.total_size());

    let range = m.visible_range(300.0, 123_456.0, 2)?;
    println!("visible_range={range:?}");
    println!("measured up to {:?}", m.last_measured_index());

    let off = m.updated_offset_for_alignment(999_999, 300.0, 123_456.0, Align::End)?;
    println!("after scroll_to_index: offset={off}");
    Ok(())
}
