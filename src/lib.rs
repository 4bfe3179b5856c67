//! A height-balanced (AVL) ordered map for Rust.
//!
//! This crate provides [`AvlMap`], an ordered key-value map whose every
//! insertion, lookup and removal runs in guaranteed O(log n) time. After each
//! mutation the tree restores the AVL invariant: at every node, the heights of
//! the two subtrees differ by at most one.
//!
//! Lookups return a [`Cursor`], a read-only handle that either points at the
//! found entry or equals [`AvlMap::end`] when the key is absent.
//!
//! # Example
//!
//! ```
//! use avl_map::AvlMap;
//!
//! let mut tree = AvlMap::new();
//! tree.insert(10, "Ten");
//! tree.insert(20, "Twenty");
//! tree.insert(30, "Thirty"); // rotates: 20 becomes the root
//!
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.height(), 2);
//!
//! let found = tree.find(&20);
//! assert_ne!(found, tree.end());
//! assert_eq!(*found, "Twenty");
//!
//! tree.erase(&20);
//! assert!(tree.find(&20).is_end());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **`tracing`** - Emits `tracing` events for rotations and teardown; off by default
//!
//! # Implementation
//!
//! Nodes live in a slot arena and refer to their children by compact handles.
//! Each child slot is the sole owner of the node it names, so the structure
//! is a strict tree with no shared or parent links. Insertion and removal
//! recurse from the root and rebalance each ancestor as the recursion unwinds.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod avl_map;

pub use avl_map::{AvlMap, Cursor};
pub use error::CursorError;
