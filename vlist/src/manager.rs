use alloc::vec::Vec;

use crate::options::{ManagerOptions, RowHeight};
use crate::{Align, Error, Result, SizeAndPosition, VisibleRange};

/// Lazily computes cumulative offsets for an ordered sequence of rows.
///
/// Rows are measured on demand, front to back: asking for row `i` measures every row between the
/// current frontier and `i` exactly once and caches the result. Rows past the frontier are
/// assumed to be [`Self::estimated_item_size`] tall when computing [`Self::total_size`].
///
/// The cache is contiguous from row 0. Invalidate a changed row with [`Self::reset_from`]; every
/// row after it is re-measured on the next query.
#[derive(Clone, Debug)]
pub struct SizeAndPositionManager {
    options: ManagerOptions,
    estimated_item_size: f64,
    measured: Vec<SizeAndPosition>,
}

impl SizeAndPositionManager {
    pub fn new(options: ManagerOptions) -> Self {
        let estimated_item_size = options.resolved_estimate();
        vdebug!(
            item_count = options.item_count,
            estimated_item_size,
            "SizeAndPositionManager::new"
        );
        Self {
            options,
            estimated_item_size,
            measured: Vec::new(),
        }
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.options
    }

    pub fn item_count(&self) -> usize {
        self.options.item_count
    }

    pub fn estimated_item_size(&self) -> f64 {
        self.estimated_item_size
    }

    /// Replaces the item count and drops every cached measurement.
    pub fn set_item_count(&mut self, item_count: usize) {
        self.options.item_count = item_count;
        self.measured.clear();
    }

    /// Replaces the row size source and drops every cached measurement.
    pub fn set_row_height(&mut self, row_height: impl Into<RowHeight>) {
        self.options.row_height = row_height.into();
        self.estimated_item_size = self.options.resolved_estimate();
        self.measured.clear();
    }

    /// Index of the last row whose position is cached, or `None` if nothing was measured yet.
    pub fn last_measured_index(&self) -> Option<usize> {
        self.measured.len().checked_sub(1)
    }

    pub fn size_and_position_of_last_measured_item(&self) -> SizeAndPosition {
        self.measured.last().copied().unwrap_or_default()
    }

    /// Returns the offset and size of row `index`, measuring up to it if needed.
    pub fn size_and_position_for_index(&mut self, index: usize) -> Result<SizeAndPosition> {
        let count = self.options.item_count;
        if index >= count {
            return Err(Error::OutOfRange { index, count });
        }
        if let Some(cached) = self.measured.get(index) {
            return Ok(*cached);
        }

        let first = self.measured.len();
        let mut offset = self.size_and_position_of_last_measured_item().end();
        self.measured.reserve(index + 1 - first);
        for i in first..=index {
            let size = self.options.row_height.size_of(i).unwrap_or(f64::NAN);
            if !(size.is_finite() && size >= 0.0) {
                vwarn!(index = i, size, "invalid row size");
                return Err(Error::InvalidSize { index: i, size });
            }
            self.measured.push(SizeAndPosition { offset, size });
            offset += size;
        }
        vtrace!(from = first, to = index, "measured rows");
        Ok(self.measured[index])
    }

    /// Total extent of the list: measured rows exactly, the rest at the estimated size.
    pub fn total_size(&self) -> f64 {
        let unmeasured = self.options.item_count.saturating_sub(self.measured.len());
        self.size_and_position_of_last_measured_item().end()
            + unmeasured as f64 * self.estimated_item_size
    }

    /// Invalidates the cached position of `index` and every row after it.
    pub fn reset_from(&mut self, index: usize) {
        if index < self.measured.len() {
            vdebug!(index, measured = self.measured.len(), "reset_from");
            self.measured.truncate(index);
        }
    }

    /// Returns the largest row index whose offset is `<= target` (row 0 for targets before the
    /// first row).
    ///
    /// Inside the measured range this is a binary search. Past it, rows are probed at doubling
    /// distances from the frontier until one starts beyond `target`, and the last probed interval
    /// is binary searched. The interval starts at the previous probe rather than at the frontier,
    /// so a single call measures at most twice the distance from the frontier to the answer.
    pub fn index_at_offset(&mut self, target: f64) -> Result<usize> {
        let count = self.options.item_count;
        if count == 0 {
            return Err(Error::OutOfRange { index: 0, count });
        }
        // `max` also maps NaN to 0.
        let target = target.max(0.0);

        let last = self.size_and_position_for_index(self.measured.len().saturating_sub(1))?;
        let frontier = self.measured.len() - 1;
        if last.offset > target {
            return Ok(self.search_measured(0, frontier, target));
        }
        self.probe_unmeasured(frontier, target)
    }

    fn probe_unmeasured(&mut self, mut low: usize, target: f64) -> Result<usize> {
        let last_index = self.options.item_count - 1;
        let mut step = 1usize;
        loop {
            let probe = low.saturating_add(step).min(last_index);
            if probe == low {
                return Ok(low);
            }
            if self.size_and_position_for_index(probe)?.offset > target {
                return Ok(self.search_measured(low, probe, target));
            }
            low = probe;
            step = step.saturating_mul(2);
        }
    }

    // Every index in `low..=high` must be measured.
    fn search_measured(&self, low: usize, high: usize, target: f64) -> usize {
        let (mut lo, mut hi) = (low, high + 1);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.measured[mid].offset <= target {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.saturating_sub(1).max(low)
    }

    /// Computes the inclusive range of rows intersecting `[offset, offset + container_size)`,
    /// widened by `overscan` rows on each side.
    ///
    /// Returns `None` when the list has no extent.
    pub fn visible_range(
        &mut self,
        container_size: f64,
        offset: f64,
        overscan: usize,
    ) -> Result<Option<VisibleRange>> {
        let count = self.options.item_count;
        if count == 0 || self.total_size() <= 0.0 {
            return Ok(None);
        }

        let max_offset = offset + container_size;
        let start = self.index_at_offset(offset)?;
        let mut end = self.size_and_position_for_index(start)?.end();
        let mut stop = start;
        while end < max_offset && stop < count - 1 {
            stop += 1;
            end += self.size_and_position_for_index(stop)?.size;
        }

        Ok(Some(VisibleRange {
            start: start.saturating_sub(overscan),
            stop: stop.saturating_add(overscan).min(count - 1),
        }))
    }

    /// Returns the scroll offset that brings `target_index` into view according to `align`,
    /// clamped to `[0, total_size() - container_size]`.
    ///
    /// `current_offset` is only consulted for [`Align::Auto`]. A non-positive `container_size`
    /// yields 0 once `target_index` has been validated.
    pub fn updated_offset_for_alignment(
        &mut self,
        target_index: usize,
        container_size: f64,
        current_offset: f64,
        align: Align,
    ) -> Result<f64> {
        let datum = self.size_and_position_for_index(target_index)?;
        if container_size <= 0.0 {
            return Ok(0.0);
        }
        let max_offset = datum.offset;
        let min_offset = max_offset - container_size + datum.size;

        let ideal = match align {
            Align::Start => max_offset,
            Align::End => min_offset,
            Align::Center => max_offset - (container_size - datum.size) / 2.0,
            Align::Auto => current_offset.min(max_offset).max(min_offset),
        };

        let total = self.total_size();
        Ok(ideal.min(total - container_size).max(0.0))
    }
}
