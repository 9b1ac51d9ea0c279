// Copyright 2025 the Caliper Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A versioned overlay over [`caliper_store::DimensionalStore`]: writes under
//! [`VersionSelection::Current`] take effect immediately, writes under
//! [`VersionSelection::Unapproved`] stage until [`VersionedStore::approve`]
//! or [`VersionedStore::approve_all`] promotes them, and past versions stay
//! readable until pruned.
//!
//! ```
//! use caliper_domain::{Domain1D, DomainN, Interval1D, IntervalN};
//! use caliper_store::{StoreConfig, ValidData};
//! use caliper_versioned::{VersionSelection, VersionedStore};
//!
//! let mut vs: VersionedStore<&str, i32> = VersionedStore::new(StoreConfig::default());
//! let region = IntervalN::new(vec![Interval1D::closed(0, 9)]);
//! vs.set(ValidData::new(region, "Hello"), VersionSelection::Current).unwrap();
//!
//! let point = DomainN::new(vec![Domain1D::Point(5)]);
//! assert_eq!(vs.current().get_at(&point), Some("Hello"));
//!
//! vs.increment_current_version().unwrap();
//! assert_eq!(vs.current_version(), 1);
//! assert_eq!(vs.read(VersionSelection::At(0)).unwrap().get_at(&point), Some("Hello"));
//! ```

mod clock;
mod error;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Result, VersionError};
pub use store::{VersionSelection, VersionedStore};
