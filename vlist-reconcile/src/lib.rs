//! Keyed, in-place tree reconciliation.
//!
//! [`Reconciler`] takes a live subtree and a freshly built one and mutates the live subtree
//! until its structure, node kinds, tags, text, and attributes match, moving as few nodes as it
//! can. Nodes carrying a key keep their identity across the pass even when they change position,
//! which is what lets a virtualized list shift its window without rebuilding the rows that stay
//! on screen.
//!
//! The reconciler only talks to the tree through [`TreeHost`]. Implement it for a browser DOM,
//! a scene graph, or a terminal cell tree; [`MemTree`] is a ready-made arena implementation.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod host;
mod key;
pub mod mem;
mod reconcile;

#[cfg(test)]
mod tests;

pub use host::{NodeKind, TreeBuilder, TreeHost, same_node_type};
pub use key::NodeKey;
pub use mem::{MemKey, MemTree, MutationCounters, NodeData, NodeId};
pub use reconcile::{ReconcileOutcome, ReconcileStats, Reconciler};
