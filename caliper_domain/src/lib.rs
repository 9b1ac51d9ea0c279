// Copyright 2025 the Caliper Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Totally-ordered domain values, 1-D domain points, and their N-D lift.
//!
//! This crate is the algebraic foundation the rest of the workspace builds
//! on: a [`DomainValue`] is any totally-ordered type usable as an axis
//! coordinate, a [`Domain1D`] is a single cut along one such axis (including
//! the unbounded `Bottom`/`Top` sentinels), an [`Interval1D`] is a half-open
//! range between two cuts, and [`DomainN`]/[`IntervalN`] lift both per-axis
//! across an arbitrary number of axes.
//!
//! # Core Concepts
//!
//! Internally, every [`Interval1D`] is stored using a half-open convention in
//! cut space: `start <= Point(x) < end`. `Point(v)` is the inclusive cut at
//! `v`; `Open(v)` is the cut immediately after `v`, used for continuous
//! values that have no discrete successor to step to. The public
//! constructors (`closed`, `singleton`, `from`, `to`, `before`, `after`)
//! translate ordinary inclusive/exclusive bounds into this internal form, so
//! callers never need to reason about cuts directly.
//!
//! ```
//! use caliper_domain::Interval1D;
//!
//! let morning = Interval1D::closed(0_i32, 11);
//! let afternoon = Interval1D::closed(12_i32, 23);
//! assert!(morning.adjacent_to(&afternoon));
//! assert!(!morning.intersects(&afternoon));
//! ```

mod domain1d;
mod domain_n;
mod domain_value;
mod error;
mod interval1d;

pub use domain1d::Domain1D;
pub use domain_n::{DomainN, IntervalN};
pub use domain_value::{CalendarDay, DomainValue, Real};
pub use error::{DomainError, Result};
pub use interval1d::{Interval1D, Remainder1D};
