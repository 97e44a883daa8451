#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Key → live node lookup built at the start of every reconciliation pass.
#[cfg(feature = "std")]
pub(crate) type KeyedNodeMap<K, N> = HashMap<K, N>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyedNodeMap<K, N> = BTreeMap<K, N>;

/// Bound on identity tokens attached to nodes.
///
/// `Hash + Eq` with `std`, `Ord` without it.
#[cfg(feature = "std")]
pub trait NodeKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> NodeKey for K {}

#[cfg(not(feature = "std"))]
pub trait NodeKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> NodeKey for K {}
