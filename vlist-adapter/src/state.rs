/// A lightweight, serializable snapshot of a list's viewport, as seen by the current frame.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Scroll position along the list axis.
    pub offset: f64,
    /// Extent of the viewport along the list axis.
    pub height: f64,
}

impl ViewportState {
    pub fn end(&self) -> f64 {
        self.offset + self.height
    }
}
