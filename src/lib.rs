//! A variable-order B-tree dictionary for Rust.
//!
//! This crate provides [`VOBTreeMap`], an ordered map backed by a classic
//! B-tree whose branching factor (*order*) is chosen at construction time
//! rather than baked in at compile time:
//!
//! - [`insert`](VOBTreeMap::insert) - Add a pair; an existing key keeps its
//!   original value (first-writer-wins)
//! - [`get`](VOBTreeMap::get) - Point lookup in O(log n)
//! - [`remove`](VOBTreeMap::remove) - Delete a pair, rebalancing bottom-up
//! - [`is_valid`](VOBTreeMap::is_valid) - Check every structural invariant
//!
//! # Example
//!
//! ```
//! use vobi_tree::VOBTreeMap;
//!
//! let mut scores = VOBTreeMap::new(3).unwrap();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Duplicate keys keep the value from the first insertion.
//! scores.insert("Bob", 0);
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//!
//! scores.remove(&"Alice");
//! assert_eq!(scores.get(&"Alice"), None);
//! assert!(scores.is_valid());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Runtime order** - One code path serves order 3 up to disk-block-sized fan-outs
//! - **Cache-efficient** - Contiguous per-node key arrays, values stored out of line
//! - **Self-checking** - A structural validator covers every tree invariant
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to each other through compact handles, so
//! the parent back-reference needed during rebalancing is a plain non-owning
//! index rather than a shared pointer. This is a classic B-tree: key/value
//! pairs live in internal nodes as well as leaves, a lookup can terminate at
//! any depth, and deletion of an internal key substitutes its in-order
//! predecessor or successor before repairing the leaf level.

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

mod raw;

pub mod vobtree_map;

pub use vobtree_map::{OrderError, VOBTreeMap};
