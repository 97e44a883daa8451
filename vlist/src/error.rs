/// Configuration errors raised by [`crate::SizeAndPositionManager`].
///
/// Both variants describe programming errors on the host side; nothing here is retried.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("requested index {index} is outside of range 0..{count}")]
    OutOfRange { index: usize, count: usize },
    #[error("invalid size {size} returned for index {index}")]
    InvalidSize { index: usize, size: f64 },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
