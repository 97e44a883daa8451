/// Where a target item should land inside the viewport after a programmatic scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    /// The item's leading edge meets the viewport's leading edge.
    #[default]
    Start,
    /// The item's midpoint meets the viewport's midpoint.
    Center,
    /// The item's trailing edge meets the viewport's trailing edge.
    End,
    /// Keep the current offset if the item is fully visible, otherwise scroll the least amount
    /// that reveals it.
    Auto,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SizeAndPosition {
    /// Distance from the start of the list to the item's leading edge.
    pub offset: f64,
    /// Extent of the item along the scroll axis.
    pub size: f64,
}

impl SizeAndPosition {
    pub fn end(&self) -> f64 {
        self.offset + self.size
    }
}

/// Inclusive range of item indexes to materialize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start: usize,
    pub stop: usize, // inclusive
}

impl VisibleRange {
    pub fn len(&self) -> usize {
        self.stop + 1 - self.start
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.stop).contains(&index)
    }

    pub fn iter(&self) -> core::ops::RangeInclusive<usize> {
        self.start..=self.stop
    }
}
