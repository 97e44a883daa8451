use alloc::format;
use alloc::string::String;

use vlist::{Align, RowHeight, SizeAndPositionManager, VisibleRange};
use vlist_reconcile::{Reconciler, TreeBuilder};

use crate::{FrameSlot, ListOptions, ViewportState};

/// A windowed list materialized into a host tree.
///
/// The controller owns the viewport state and the size cache. It never holds the host tree
/// itself: every operation that touches nodes borrows it. Under the container it builds two
/// nodes:
///
/// - an outer *sizer* whose height is the total list height, so that the host's scroll container
///   gets a scrollbar matching the full list;
/// - an inner, absolutely positioned *content* node holding only the rows in the visible range,
///   shifted down to the offset of the first of them.
///
/// Scroll, resize, and configuration changes do not render immediately. They arm a single-slot
/// frame request; the host calls [`Self::on_frame`] once per frame and all changes made since the
/// previous frame are applied in one render.
pub struct VirtualizedListController<H: TreeBuilder> {
    options: ListOptions<H>,
    manager: SizeAndPositionManager,
    reconciler: Reconciler<H>,
    state: ViewportState,
    frame: FrameSlot,
    sizer: H::Node,
    content: H::Node,
    rendered: Option<VisibleRange>,
    content_offset: f64,
    alive: bool,
}

impl<H: TreeBuilder> VirtualizedListController<H> {
    /// Builds the wrapper nodes under `container` and performs the initial render.
    ///
    /// On error nothing is left attached to `container`.
    pub fn create(
        host: &mut H,
        container: H::Node,
        options: ListOptions<H>,
    ) -> vlist::Result<Self> {
        let mut manager = SizeAndPositionManager::new(options.manager.clone());
        let height = sanitize(options.height);
        let offset = match (options.initial_scroll_offset, options.initial_index) {
            (Some(offset), _) => sanitize(offset),
            (None, Some(index)) => {
                manager.updated_offset_for_alignment(index, height, 0.0, Align::Start)?
            }
            (None, None) => 0.0,
        };

        let sizer = host.create_element("div");
        let content = host.create_element("div");
        host.append_child(sizer, content);
        host.append_child(container, sizer);

        let mut list = Self {
            options,
            manager,
            reconciler: Reconciler::new(),
            state: ViewportState { offset, height },
            frame: FrameSlot::new(),
            sizer,
            content,
            rendered: None,
            content_offset: 0.0,
            alive: true,
        };
        vdebug!(offset, height, "list created");

        if let Err(err) = list.render(host) {
            list.destroy(host);
            return Err(err);
        }
        Ok(list)
    }

    /// Renders the rows intersecting the viewport right away.
    ///
    /// Satisfies any pending frame request. Errors from the size source propagate; a panic in
    /// `render_row` unwinds through this call.
    pub fn render(&mut self, host: &mut H) -> vlist::Result<()> {
        if !self.alive {
            return Ok(());
        }
        self.frame.take();

        let range = self.manager.visible_range(
            self.state.height,
            self.state.offset,
            self.options.overscan_count,
        )?;
        let content_offset = match range {
            Some(range) => self.manager.size_and_position_for_index(range.start)?.offset,
            None => 0.0,
        };

        let next = host.create_element("div");
        host.set_attribute(next, "style", &content_style(content_offset));
        for index in range.iter().flat_map(VisibleRange::iter) {
            let row = (self.options.render_row)(host, index);
            host.append_child(next, row);
        }

        // The content node is a plain `div` on both sides, so the root is always morphed in
        // place and picks up the new offset through attribute sync.
        let outcome = self.reconciler.reconcile(host, self.content, next);
        host.discard(next);
        self.content = outcome.root;

        let total = self.manager.total_size();
        host.set_attribute(self.sizer, "style", &sizer_style(total));

        self.rendered = range;
        self.content_offset = content_offset;
        vtrace!(
            offset = self.state.offset,
            height = self.state.height,
            ?range,
            inserted = outcome.stats.inserted,
            moved = outcome.stats.moved,
            removed = outcome.stats.removed,
            "render"
        );

        if let (Some(range), Some(cb)) = (range, &self.options.on_rows_rendered) {
            cb(range.start, range.stop);
        }
        Ok(())
    }

    /// Runs the pending render, if any. Returns whether a render happened.
    pub fn on_frame(&mut self, host: &mut H) -> vlist::Result<bool> {
        if !self.frame.take() {
            return Ok(false);
        }
        if !self.alive {
            vdebug!("frame after destroy ignored");
            return Ok(false);
        }
        self.render(host)?;
        Ok(true)
    }

    /// Records a new scroll position reported by the host and schedules a render.
    pub fn on_scroll(&mut self, offset: f64) {
        if !self.alive {
            return;
        }
        if !offset.is_finite() {
            vwarn!(offset, "non-finite scroll offset treated as 0");
        }
        self.state.offset = sanitize(offset);
        if let Some(cb) = &self.options.on_scroll {
            cb(self.state.offset);
        }
        self.schedule();
    }

    pub fn resize(&mut self, height: f64) {
        self.state.height = sanitize(height);
        self.schedule();
    }

    /// Replaces the row count. Every cached measurement is dropped.
    pub fn set_row_count(&mut self, item_count: usize) {
        let options = self.manager.options().clone().with_item_count(item_count);
        self.manager = SizeAndPositionManager::new(options);
        vdebug!(item_count, "row count replaced");
        self.schedule();
    }

    /// Replaces the row size source. Every cached measurement is dropped.
    pub fn set_row_height(&mut self, row_height: impl Into<RowHeight>) {
        self.manager.set_row_height(row_height);
        self.schedule();
    }

    /// Forgets the measured sizes of `index` and every row after it, e.g. after the host changed
    /// what those rows contain.
    pub fn invalidate_from(&mut self, index: usize) {
        self.manager.reset_from(index);
        self.schedule();
    }

    /// Scrolls so that row `index` is placed according to `align`.
    ///
    /// The offset is applied as if the host had reported it through [`Self::on_scroll`], so the
    /// `on_scroll` callback sees it and can move the native scroll position. Returns the offset.
    pub fn scroll_to_index(&mut self, index: usize, align: Align) -> vlist::Result<f64> {
        let offset = self.manager.updated_offset_for_alignment(
            index,
            self.state.height,
            self.state.offset,
            align,
        )?;
        self.on_scroll(offset);
        Ok(offset)
    }

    /// Removes everything the list attached to the container.
    ///
    /// Later calls are no-ops, including a frame that was already requested.
    pub fn destroy(&mut self, host: &mut H) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.rendered = None;
        host.discard(self.sizer);
        vdebug!("list destroyed");
    }

    fn schedule(&mut self) {
        if !self.alive {
            return;
        }
        if self.frame.schedule() {
            if let Some(cb) = &self.options.on_frame_requested {
                cb();
            }
        } else {
            vtrace!("render already pending");
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_render_pending(&self) -> bool {
        self.alive && self.frame.is_pending()
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.state
    }

    /// Rows present in the content node after the last render; `None` for an empty list.
    pub fn rendered_range(&self) -> Option<VisibleRange> {
        self.rendered
    }

    /// Offset of the first rendered row, i.e. where the content node sits inside the sizer.
    pub fn content_offset(&self) -> f64 {
        self.content_offset
    }

    pub fn total_size(&self) -> f64 {
        self.manager.total_size()
    }

    pub fn item_count(&self) -> usize {
        self.manager.item_count()
    }

    pub fn manager(&self) -> &SizeAndPositionManager {
        &self.manager
    }

    pub fn sizer(&self) -> H::Node {
        self.sizer
    }

    pub fn content(&self) -> H::Node {
        self.content
    }
}

impl<H: TreeBuilder> core::fmt::Debug for VirtualizedListController<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualizedListController")
            .field("state", &self.state)
            .field("rendered", &self.rendered)
            .field("frame", &self.frame)
            .field("alive", &self.alive)
            .field("sizer", &self.sizer)
            .field("content", &self.content)
            .finish_non_exhaustive()
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn sizer_style(total: f64) -> String {
    format!("position: relative; height: {total}px")
}

fn content_style(offset: f64) -> String {
    format!("position: absolute; top: {offset}px; left: 0; right: 0")
}
