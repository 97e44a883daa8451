use alloc::boxed::Box;
use alloc::sync::Arc;

use vlist::{ManagerOptions, RowHeight};
use vlist_reconcile::TreeHost;

/// Builds the subtree for one row.
///
/// Receives the host tree so it can create nodes, and the row index. Give the returned root a
/// key if the row's node identity should survive window shifts.
pub type RenderRow<H> = Box<dyn FnMut(&mut H, usize) -> <H as TreeHost>::Node>;

/// Called with the new offset whenever the list's scroll position changes.
pub type OnScrollCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Called after each render with the inclusive `(start, stop)` range of rendered rows.
pub type OnRowsRenderedCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Called when a render becomes pending and the host should arrange a call to
/// `VirtualizedListController::on_frame`. Not called again until that frame has run.
pub type OnFrameRequestedCallback = Arc<dyn Fn() + Send + Sync>;

/// Configuration for [`crate::VirtualizedListController`].
pub struct ListOptions<H: TreeHost> {
    /// Row count, row sizes, and the estimate for unmeasured rows.
    pub manager: ManagerOptions,
    /// A panic here is not caught; it unwinds out of `render` and `on_frame`, leaving the live
    /// rows as they were.
    pub render_row: RenderRow<H>,
    /// Extra rows rendered above and below the visible ones.
    pub overscan_count: usize,
    /// Initial viewport extent along the list axis.
    pub height: f64,
    /// Takes precedence over `initial_index` when both are set.
    pub initial_scroll_offset: Option<f64>,
    /// Row aligned to the top of the viewport on creation.
    pub initial_index: Option<usize>,
    pub on_scroll: Option<OnScrollCallback>,
    pub on_rows_rendered: Option<OnRowsRenderedCallback>,
    pub on_frame_requested: Option<OnFrameRequestedCallback>,
}

impl<H: TreeHost> ListOptions<H> {
    /// Creates options with overscan 1, a zero-height viewport, and no callbacks.
    pub fn new(
        item_count: usize,
        row_height: impl Into<RowHeight>,
        render_row: impl FnMut(&mut H, usize) -> H::Node + 'static,
    ) -> Self {
        Self {
            manager: ManagerOptions::new(item_count, row_height),
            render_row: Box::new(render_row),
            overscan_count: 1,
            height: 0.0,
            initial_scroll_offset: None,
            initial_index: None,
            on_scroll: None,
            on_rows_rendered: None,
            on_frame_requested: None,
        }
    }

    pub fn with_estimated_item_size(mut self, estimated_item_size: f64) -> Self {
        self.manager = self.manager.with_estimated_item_size(estimated_item_size);
        self
    }

    pub fn with_overscan_count(mut self, overscan_count: usize) -> Self {
        self.overscan_count = overscan_count;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_initial_scroll_offset(mut self, offset: f64) -> Self {
        self.initial_scroll_offset = Some(offset);
        self
    }

    /// Aligns row `index` to the top of the viewport on creation.
    ///
    /// The offset is computed from `height`, so set it with [`Self::with_height`] as well: with
    /// a zero-height viewport the list starts at offset 0. `create` fails with `OutOfRange` when
    /// `index` is past the last row.
    pub fn with_initial_index(mut self, index: usize) -> Self {
        self.initial_index = Some(index);
        self
    }

    pub fn with_on_scroll(mut self, on_scroll: Option<impl Fn(f64) + Send + Sync + 'static>) -> Self {
        self.on_scroll = on_scroll.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_rows_rendered(
        mut self,
        on_rows_rendered: Option<impl Fn(usize, usize) + Send + Sync + 'static>,
    ) -> Self {
        self.on_rows_rendered = on_rows_rendered.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_frame_requested(
        mut self,
        on_frame_requested: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_frame_requested = on_frame_requested.map(|f| Arc::new(f) as _);
        self
    }
}

impl<H: TreeHost> core::fmt::Debug for ListOptions<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListOptions")
            .field("manager", &self.manager)
            .field("overscan_count", &self.overscan_count)
            .field("height", &self.height)
            .field("initial_scroll_offset", &self.initial_scroll_offset)
            .field("initial_index", &self.initial_index)
            .finish_non_exhaustive()
    }
}
