// Copyright 2025 the Caliper Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned box geometry over continuous `R^n`.
//!
//! This is the geometry layer the box-tree spatial index is built on:
//! [`Coordinate`] is a point in `R^n`, [`BoxGeom`] is an axis-aligned box
//! between two coordinates, and [`Capacity`] is the fixed-coordinate
//! companion of a node's boundary box that defines where it splits and how
//! it grows.

use std::fmt;

use thiserror::Error;

/// Errors raised when combining boxes/coordinates of mismatched dimension.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Two coordinates or boxes of different dimension were combined.
    #[error("dimension mismatch: {0} vs {1}")]
    DimensionMismatch(usize, usize),
}

/// A point in continuous `R^n`.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordinate(Vec<f64>);

impl Coordinate {
    /// Build a coordinate from its per-axis values.
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// An all-zero coordinate of the given dimension.
    pub fn origin(dims: usize) -> Self {
        Self(vec![0.0; dims])
    }

    /// Number of axes.
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// The coordinate's value on axis `i`.
    pub fn axis(&self, i: usize) -> f64 {
        self.0[i]
    }

    /// Per-axis values as a slice.
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

/// An axis-aligned box in `R^n`, given by its min and max corners.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxGeom {
    min: Coordinate,
    max: Coordinate,
}

impl BoxGeom {
    /// Build a box from its min/max corners. Does not validate `min <= max`;
    /// callers that need that should check [`is_empty`][Self::is_empty].
    pub fn new(min: Coordinate, max: Coordinate) -> Result<Self, GeometryError> {
        if min.dims() != max.dims() {
            return Err(GeometryError::DimensionMismatch(min.dims(), max.dims()));
        }
        Ok(Self { min, max })
    }

    /// Number of axes.
    pub fn dims(&self) -> usize {
        self.min.dims()
    }

    /// The box's minimum corner.
    pub fn min(&self) -> &Coordinate {
        &self.min
    }

    /// The box's maximum corner.
    pub fn max(&self) -> &Coordinate {
        &self.max
    }

    /// Whether every axis has `min >= max` (no interior).
    pub fn is_empty(&self) -> bool {
        (0..self.dims()).any(|i| self.min.axis(i) >= self.max.axis(i))
    }

    /// Whether `self` and `other` share any point. Boxes that touch along a
    /// face (shared edge/corner) count as overlapping, matching the
    /// tolerant, false-positive-permitting contract the box-tree relies on.
    pub fn intersects(&self, other: &Self) -> bool {
        (0..self.dims()).all(|i| {
            self.min.axis(i) <= other.max.axis(i) && other.min.axis(i) <= self.max.axis(i)
        })
    }

    /// Whether `point` falls within `self` on every axis.
    pub fn contains_point(&self, point: &Coordinate) -> bool {
        (0..self.dims()).all(|i| self.min.axis(i) <= point.axis(i) && point.axis(i) <= self.max.axis(i))
    }

    /// Whether `other` is fully enclosed by `self`.
    pub fn contains_box(&self, other: &Self) -> bool {
        (0..self.dims()).all(|i| {
            self.min.axis(i) <= other.min.axis(i) && other.max.axis(i) <= self.max.axis(i)
        })
    }
}

/// The fixed-coordinate companion of a box-tree node's boundary: a cube
/// (equal half-size on every axis) centered at `center`, used to compute
/// split midpoints and growth scaling independently of the boundary's own
/// (possibly unbounded) extent.
#[derive(Clone, Debug, PartialEq)]
pub struct Capacity {
    center: Coordinate,
    half_size: f64,
}

impl Capacity {
    /// Build a capacity centered at `center` with the given half-side length.
    pub fn new(center: Coordinate, half_size: f64) -> Self {
        debug_assert!(half_size > 0.0, "capacity half_size must be positive");
        Self { center, half_size }
    }

    /// Number of axes.
    pub fn dims(&self) -> usize {
        self.center.dims()
    }

    /// The capacity's center, which doubles as the split midpoint for its
    /// node's hyperoctants.
    pub fn midpoint(&self) -> &Coordinate {
        &self.center
    }

    /// The axis-aligned box this capacity bounds.
    pub fn bounds(&self) -> BoxGeom {
        let min = Coordinate::new(
            self.center
                .values()
                .iter()
                .map(|c| c - self.half_size)
                .collect(),
        );
        let max = Coordinate::new(
            self.center
                .values()
                .iter()
                .map(|c| c + self.half_size)
                .collect(),
        );
        BoxGeom::new(min, max).expect("min/max built from the same center have equal dims")
    }

    /// Double this capacity's side length, keeping the same center.
    ///
    /// The box-tree grows outward from the origin-centered root by repeating
    /// this until the boundary contains an out-of-range insert; because the
    /// center never moves, only the half-size doubles, the result at depth k
    /// is `2^k` times the original side length.
    pub fn doubled(&self) -> Self {
        Self {
            center: self.center.clone(),
            half_size: self.half_size * 2.0,
        }
    }

    /// The capacity of the `index`-th hyperoctant when this node splits into
    /// `2^dims()` children, numbered by treating `index`'s bits as, per axis,
    /// "upper half" (1) or "lower half" (0).
    pub fn octant(&self, index: usize) -> Self {
        let half = self.half_size / 2.0;
        let center = Coordinate::new(
            self.center
                .values()
                .iter()
                .enumerate()
                .map(|(axis, c)| {
                    if index & (1 << axis) != 0 {
                        c + half
                    } else {
                        c - half
                    }
                })
                .collect(),
        );
        Self {
            center,
            half_size: half,
        }
    }
}
