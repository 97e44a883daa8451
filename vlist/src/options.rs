use alloc::sync::Arc;
use alloc::vec::Vec;

/// Fallback estimate for rows that have not been measured yet, used when neither an explicit
/// estimate nor a fixed row height is configured.
pub const DEFAULT_ESTIMATED_ITEM_SIZE: f64 = 50.0;

/// How the size of each row along the scroll axis is obtained.
///
/// This type is cheap to clone: per-index functions and tables are stored in `Arc`s.
#[derive(Clone)]
pub enum RowHeight {
    /// Every row has the same size.
    Fixed(f64),
    /// Size provided lazily per index. Called at most once per index between resets.
    PerIndex(Arc<dyn Fn(usize) -> f64 + Send + Sync>),
    /// Sizes looked up in a table indexed by row.
    Table(Arc<[f64]>),
}

impl RowHeight {
    pub fn per_index(f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::PerIndex(Arc::new(f))
    }

    pub fn table(sizes: impl Into<Vec<f64>>) -> Self {
        Self::Table(Arc::from(sizes.into()))
    }

    /// Returns the raw size for `index`, or `None` when a table has no entry for it.
    pub(crate) fn size_of(&self, index: usize) -> Option<f64> {
        match self {
            Self::Fixed(size) => Some(*size),
            Self::PerIndex(f) => Some(f(index)),
            Self::Table(sizes) => sizes.get(index).copied(),
        }
    }

    pub fn fixed_size(&self) -> Option<f64> {
        match self {
            Self::Fixed(size) => Some(*size),
            _ => None,
        }
    }
}

impl From<f64> for RowHeight {
    fn from(size: f64) -> Self {
        Self::Fixed(size)
    }
}

impl From<Vec<f64>> for RowHeight {
    fn from(sizes: Vec<f64>) -> Self {
        Self::table(sizes)
    }
}

impl core::fmt::Debug for RowHeight {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(size) => f.debug_tuple("Fixed").field(size).finish(),
            Self::PerIndex(_) => f.write_str("PerIndex(..)"),
            Self::Table(sizes) => f.debug_tuple("Table").field(&sizes.len()).finish(),
        }
    }
}

/// Configuration for [`crate::SizeAndPositionManager`].
#[derive(Clone, Debug)]
pub struct ManagerOptions {
    pub item_count: usize,
    pub row_height: RowHeight,
    /// Size assumed for rows beyond the measured frontier.
    ///
    /// When `None` (or not finite and positive), a fixed row height is used as its own estimate
    /// and anything else falls back to [`DEFAULT_ESTIMATED_ITEM_SIZE`].
    pub estimated_item_size: Option<f64>,
}

impl ManagerOptions {
    pub fn new(item_count: usize, row_height: impl Into<RowHeight>) -> Self {
        Self {
            item_count,
            row_height: row_height.into(),
            estimated_item_size: None,
        }
    }

    /// Shorthand for a list whose row sizes come from `f(index)`.
    pub fn per_index(item_count: usize, f: impl Fn(usize) -> f64 + Send + Sync + 'static) -> Self {
        Self::new(item_count, RowHeight::per_index(f))
    }

    pub fn with_estimated_item_size(mut self, estimated_item_size: f64) -> Self {
        self.estimated_item_size = Some(estimated_item_size);
        self
    }

    pub fn with_item_count(mut self, item_count: usize) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_row_height(mut self, row_height: impl Into<RowHeight>) -> Self {
        self.row_height = row_height.into();
        self
    }

    /// An explicit estimate must be finite and positive, a fixed row height finite and
    /// non-negative. Anything else falls through to the next source.
    pub(crate) fn resolved_estimate(&self) -> f64 {
        if let Some(estimate) = self.estimated_item_size {
            if estimate.is_finite() && estimate > 0.0 {
                return estimate;
            }
            vwarn!(estimate, "invalid estimated item size ignored");
        }
        self.row_height
            .fixed_size()
            .filter(|size| size.is_finite() && *size >= 0.0)
            .unwrap_or(DEFAULT_ESTIMATED_ITEM_SIZE)
    }
}
