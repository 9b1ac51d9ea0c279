// Copyright 2025 the Caliper Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dimensional data engine: store values over disjoint regions of an
//! N-dimensional domain, indexed for both point lookup and range queries.
//!
//! [`DimensionalStore`] is the core container: it keeps the domain partitioned
//! into disjoint, value-tagged intervals and maintains them through targeted
//! mutation ([`DimensionalStore::set`], [`DimensionalStore::update`],
//! [`DimensionalStore::remove`]) rather than full rebuilds.
//!
//! ```
//! use caliper_domain::{Interval1D, IntervalN};
//! use caliper_store::{DimensionalStore, ValidData};
//!
//! let mut store: DimensionalStore<&str, i32> = DimensionalStore::with_default_config();
//! let region = IntervalN::new(vec![Interval1D::closed(0, 9)]);
//! store.set(ValidData::new(region, "Hello")).unwrap();
//! ```

mod config;
mod diff;
mod error;
mod multi;
mod store;
mod sync;
mod valid_data;

pub use caliper_boxtree::BoxTreeConfig;
pub use config::StoreConfig;
pub use diff::DiffAction;
pub use error::{Result, StoreError};
pub use multi::MultiDimensionalStore;
pub use store::DimensionalStore;
pub use sync::SyncDimensionalStore;
pub use valid_data::ValidData;
