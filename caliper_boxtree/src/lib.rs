// Copyright 2025 the Caliper Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A hyperoctree spatial index over continuous `R^n`.
//!
//! [`BoxTree`] accelerates intersection queries over axis-aligned boxes: each
//! node either holds its payloads directly (a leaf) or has split into `2^n`
//! children, one per hyperoctant of its boundary. Payloads whose box spans
//! more than one hyperoctant are stored under each of them, so
//! [`BoxTree::query`] may return duplicates; callers deduplicate by payload
//! identity.
//!
//! ```
//! use caliper_boxtree::BoxTree;
//! use caliper_geometry::{BoxGeom, Coordinate};
//!
//! let mut tree: BoxTree<&str> = BoxTree::new();
//! let region = BoxGeom::new(Coordinate::new(vec![0.0, 0.0]), Coordinate::new(vec![1.0, 1.0])).unwrap();
//! tree.insert(region.clone(), "payload").unwrap();
//! assert_eq!(tree.query(&region).unwrap(), vec!["payload"]);
//! ```

mod config;
mod tree;

pub use caliper_geometry::{BoxGeom, Coordinate};
pub use config::BoxTreeConfig;
pub use tree::{BoxTree, BoxTreeError};
