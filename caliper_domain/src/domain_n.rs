//! N-dimensional domain points and intervals: a per-axis lift of
//! [`Domain1D`]/[`Interval1D`] over a growable sequence of axes.

use core::cmp::Ordering;
use core::fmt;

use crate::domain1d::Domain1D;
use crate::domain_value::DomainValue;
use crate::error::{DomainError, Result};
use crate::interval1d::{Interval1D, Remainder1D};

/// An N-D domain point: one [`Domain1D`] cut per axis.
///
/// Represented as a `Vec` (the "general many-axis variant") rather than a
/// const-generic array, so arity mismatches are a runtime
/// [`DomainError::InvalidBoundary`] instead of a compile-time type parameter;
/// this is the representation the versioned overlay relies on to append one
/// extra axis without `N + 1` const-generic arithmetic.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainN<D> {
    axes: Vec<Domain1D<D>>,
}

impl<D: DomainValue> DomainN<D> {
    /// Build a domain point from per-axis cuts.
    pub fn new(axes: Vec<Domain1D<D>>) -> Self {
        Self { axes }
    }

    /// Number of axes.
    pub fn arity(&self) -> usize {
        self.axes.len()
    }

    /// The per-axis cuts.
    pub fn axes(&self) -> &[Domain1D<D>] {
        &self.axes
    }
}

impl<D: DomainValue> PartialOrd for DomainN<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<D: DomainValue> Ord for DomainN<D> {
    /// Lexicographic by axis. Mismatched arity compares the shared prefix
    /// first and then treats the longer point as greater, which only arises
    /// from caller error since all stored points in one store share arity.
    fn cmp(&self, other: &Self) -> Ordering {
        self.axes
            .iter()
            .zip(other.axes.iter())
            .map(|(a, b)| a.cmp(b))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or_else(|| self.axes.len().cmp(&other.axes.len()))
    }
}

/// An N-D interval: a Cartesian product of per-axis [`Interval1D`]s.
///
/// See [`DomainN`] for the rationale behind the `Vec`-based representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntervalN<D> {
    axes: Vec<Interval1D<D>>,
}

impl<D: DomainValue> IntervalN<D> {
    /// Build an N-D interval from per-axis intervals.
    pub fn new(axes: Vec<Interval1D<D>>) -> Self {
        Self { axes }
    }

    /// Number of axes.
    pub fn arity(&self) -> usize {
        self.axes.len()
    }

    /// The per-axis intervals.
    pub fn axes(&self) -> &[Interval1D<D>] {
        &self.axes
    }

    fn check_arity(&self, other: &Self) -> Result<()> {
        if self.axes.len() != other.axes.len() {
            return Err(DomainError::InvalidBoundary(format!(
                "arity mismatch: {} vs {}",
                self.axes.len(),
                other.axes.len()
            )));
        }
        Ok(())
    }

    /// The interval's lower corner, as a [`DomainN`].
    pub fn start(&self) -> DomainN<D> {
        DomainN::new(self.axes.iter().map(|iv| iv.start.clone()).collect())
    }

    /// Whether every axis is non-empty.
    pub fn is_empty(&self) -> bool {
        self.axes.iter().any(Interval1D::is_empty)
    }

    /// Whether `point` falls inside every axis interval.
    ///
    /// # Errors
    /// [`DomainError::InvalidBoundary`] if arities differ.
    pub fn contains(&self, point: &DomainN<D>) -> Result<bool> {
        if self.axes.len() != point.axes().len() {
            return Err(DomainError::InvalidBoundary(format!(
                "arity mismatch: {} vs {}",
                self.axes.len(),
                point.axes().len()
            )));
        }
        Ok(self
            .axes
            .iter()
            .zip(point.axes())
            .all(|(iv, cut)| iv.start <= *cut && *cut < iv.end))
    }

    /// Whether `self` and `other` share any point, axis-wise.
    ///
    /// # Errors
    /// [`DomainError::InvalidBoundary`] if arities differ.
    pub fn intersects(&self, other: &Self) -> Result<bool> {
        self.check_arity(other)?;
        Ok(self
            .axes
            .iter()
            .zip(other.axes.iter())
            .all(|(a, b)| a.intersects(b)))
    }

    /// The per-axis overlap of `self` and `other`, if every axis overlaps.
    ///
    /// # Errors
    /// [`DomainError::InvalidBoundary`] if arities differ.
    pub fn intersection(&self, other: &Self) -> Result<Option<Self>> {
        self.check_arity(other)?;
        let mut axes = Vec::with_capacity(self.axes.len());
        for (a, b) in self.axes.iter().zip(other.axes.iter()) {
            match a.intersection(b) {
                Some(iv) => axes.push(iv),
                None => return Ok(None),
            }
        }
        Ok(Some(Self { axes }))
    }

    /// The N-D remainder `self \ other`, computed by the brute-force
    /// `3^N`-product enumeration: take the per-axis [`Remainder1D`] plus
    /// intersection for each axis (at most 3 pieces per axis), form every
    /// combination across axes, and drop the single combination equal to the
    /// full intersection (the "excluded" piece, returned separately).
    ///
    /// Returns `(kept_pieces, excluded)`, where `excluded` is `None` when
    /// `self` and `other` do not intersect at all.
    ///
    /// # Errors
    /// [`DomainError::InvalidBoundary`] if arities differ.
    pub fn remainder(&self, other: &Self) -> Result<(Vec<Self>, Option<Self>)> {
        self.check_arity(other)?;

        if !self.intersects(other)? {
            return Ok((vec![self.clone()], None));
        }

        let mut per_axis: Vec<Vec<Piece<D>>> = Vec::with_capacity(self.axes.len());
        for (a, b) in self.axes.iter().zip(other.axes.iter()) {
            let mut pieces = Vec::with_capacity(3);
            match a.remainder(b) {
                Remainder1D::None => {}
                Remainder1D::Single(iv) => pieces.push(Piece::Kept(iv)),
                Remainder1D::Split(left, right) => {
                    pieces.push(Piece::Kept(left));
                    pieces.push(Piece::Kept(right));
                }
            }
            // The excluded (intersected) sub-interval on this axis always
            // exists here since we already confirmed full-N-D intersection.
            if let Some(overlap) = a.intersection(b) {
                pieces.push(Piece::Excluded(overlap));
            }
            per_axis.push(pieces);
        }

        let mut kept = Vec::new();
        let mut excluded_axes = Vec::with_capacity(self.axes.len());
        for pieces in &per_axis {
            match pieces
                .iter()
                .find_map(|p| match p {
                    Piece::Excluded(iv) => Some(iv.clone()),
                    Piece::Kept(_) => None,
                }) {
                Some(iv) => excluded_axes.push(iv),
                None => unreachable!("every axis carries exactly one excluded piece"),
            }
        }
        let excluded = Self {
            axes: excluded_axes,
        };

        let mut combo = Vec::with_capacity(self.axes.len());
        cartesian_product(&per_axis, &mut combo, &mut |combo| {
            let is_excluded = combo.iter().all(|p| matches!(p, Piece::Excluded(_)));
            if !is_excluded {
                let axes = combo
                    .iter()
                    .map(|p| match p {
                        Piece::Kept(iv) | Piece::Excluded(iv) => iv.clone(),
                    })
                    .collect();
                kept.push(Self { axes });
            }
        });

        Ok((kept, Some(excluded)))
    }
}

/// A per-axis candidate piece produced while carving the N-D remainder: the
/// part left over after subtraction, or the part that overlapped `other`.
#[derive(Clone)]
enum Piece<D> {
    Kept(Interval1D<D>),
    Excluded(Interval1D<D>),
}

/// Recursively enumerate the Cartesian product of per-axis piece lists,
/// invoking `visit` once per combination.
fn cartesian_product<D: Clone>(
    axes: &[Vec<Piece<D>>],
    combo: &mut Vec<Piece<D>>,
    visit: &mut dyn FnMut(&[Piece<D>]),
) {
    if combo.len() == axes.len() {
        visit(combo);
        return;
    }
    let axis_idx = combo.len();
    for piece in &axes[axis_idx] {
        combo.push(piece.clone());
        cartesian_product(axes, combo, visit);
        combo.pop();
    }
}

impl<D: DomainValue + fmt::Display> fmt::Display for IntervalN<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, iv) in self.axes.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "{iv}")?;
        }
        Ok(())
    }
}
