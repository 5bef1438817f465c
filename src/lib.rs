//! An ordered multiset implemented with an AVL tree.
//!
//! Values equal under the primary order are stored together in a bucket at a
//! single tree node. Buckets can optionally be kept sorted by a secondary order.

mod multiset;
mod node;

pub use multiset::{AvlMultiset, OrderFn};


#[cfg(test)]
mod proptests;
