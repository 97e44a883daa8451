//! Lazy size-and-position tracking for windowed lists.
//!
//! This crate answers the geometric questions a virtualized list needs on every frame: where
//! does row `i` start, how tall is the whole list, which row sits at a given scroll offset, and
//! which rows intersect the viewport. Row sizes may be fixed, looked up in a table, or produced by
//! a function, and are only requested when a query actually needs them.
//!
//! It is UI-agnostic. The list controller in `vlist-adapter` drives it from scroll and resize
//! events; any other host can do the same.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod manager;
mod options;
mod types;


pub use error::{Error, Result};
pub use manager::SizeAndPositionManager;
pub use options::{DEFAULT_ESTIMATED_ITEM_SIZE, ManagerOptions, RowHeight};
pub use types::{Align, SizeAndPosition, VisibleRange};
