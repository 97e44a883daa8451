//! A virtualized list controller.
//!
//! [`VirtualizedListController`] ties the pieces of the workspace together: it keeps the
//! viewport state, asks a [`vlist::SizeAndPositionManager`] which rows intersect the viewport,
//! builds those rows through a host callback, and patches them into the live tree with a
//! [`vlist_reconcile::Reconciler`].
//!
//! The controller is framework-agnostic. Any tree implementing
//! [`vlist_reconcile::TreeBuilder`] can host it; hosts forward scroll and resize events and
//! call [`VirtualizedListController::on_frame`] from their frame or timer callback.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod frame;
mod options;
mod state;


pub use controller::VirtualizedListController;
pub use frame::FrameSlot;
pub use options::{
    ListOptions, OnFrameRequestedCallback, OnRowsRenderedCallback, OnScrollCallback, RenderRow,
};
pub use state::ViewportState;
