//! 1-D intervals over a [`Domain1D`] axis.

use core::fmt;

use crate::domain1d::Domain1D;
use crate::domain_value::DomainValue;

/// The result of subtracting one interval from another along a single axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Remainder1D<V> {
    /// `other` fully contained `self`; nothing remains.
    None,
    /// `other` clipped only one end of `self`, or did not intersect it at all.
    Single(Interval1D<V>),
    /// `other` lay strictly inside `self`, leaving two pieces.
    Split(Interval1D<V>, Interval1D<V>),
}

/// A half-open interval over domain points: `start <= Point(x) < end`.
///
/// Construction is always through the named constructors below, which
/// translate ordinary inclusive/exclusive bounds into the internal half-open
/// cut representation (see the crate-level docs for the cut convention).
/// Invariant: `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval1D<V> {
    /// Inclusive lower cut.
    pub start: Domain1D<V>,
    /// Exclusive upper cut.
    pub end: Domain1D<V>,
}

impl<V: DomainValue> Interval1D<V> {
    /// Build directly from cuts, without any translation. Callers are
    /// responsible for `start <= end` and for not placing a discrete `V`
    /// behind `Open`.
    pub fn from_cuts(start: Domain1D<V>, end: Domain1D<V>) -> Self {
        Self { start, end }
    }

    /// The closed interval `[a, b]`.
    pub fn closed(a: V, b: V) -> Self {
        let end = Domain1D::cut_after(&b);
        Self {
            start: Domain1D::Point(a),
            end,
        }
    }

    /// The single-point interval `[v, v]`.
    pub fn singleton(v: V) -> Self {
        Self::closed(v.clone(), v)
    }

    /// Unbounded above, inclusive of `v`: `[v, +inf)`.
    pub fn from(v: V) -> Self {
        Self {
            start: Domain1D::Point(v),
            end: Domain1D::Top,
        }
    }

    /// Unbounded below, inclusive of `v`: `(-inf, v]`.
    pub fn to(v: V) -> Self {
        let end = Domain1D::cut_after(&v);
        Self {
            start: Domain1D::Bottom,
            end,
        }
    }

    /// Unbounded below, exclusive of `v`: `(-inf, v)`.
    pub fn before(v: V) -> Self {
        Self {
            start: Domain1D::Bottom,
            end: Domain1D::Point(v),
        }
    }

    /// Unbounded above, exclusive of `v`: `(v, +inf)`.
    pub fn after(v: V) -> Self {
        let start = Domain1D::cut_after(&v);
        Self {
            start,
            end: Domain1D::Top,
        }
    }

    /// The entire domain: `(-inf, +inf)`.
    pub fn unbounded() -> Self {
        Self {
            start: Domain1D::Bottom,
            end: Domain1D::Top,
        }
    }

    /// The gap strictly between two disjoint intervals, `a` ending before `b`
    /// starts. Expressed purely in cut arithmetic: the gap picks up exactly
    /// where `a` leaves off and ends exactly where `b` begins.
    pub fn between(a: &Self, b: &Self) -> Self {
        Self {
            start: a.end.clone(),
            end: b.start.clone(),
        }
    }

    /// Whether this interval contains no points (`start >= end`).
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `x` falls within `[start, end)` in cut space.
    pub fn contains(&self, x: &V) -> bool {
        let p = Domain1D::Point(x.clone());
        self.start <= p && p < self.end
    }

    /// Whether this interval shares any point with `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The overlap of `self` and `other`, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.clone().max(other.start.clone());
        let end = self.end.clone().min(other.end.clone());
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// `self \ other`: the pieces of `self` left after removing `other`.
    pub fn remainder(&self, other: &Self) -> Remainder1D<V> {
        if !self.intersects(other) {
            return Remainder1D::Single(self.clone());
        }
        let clips_start = other.start <= self.start;
        let clips_end = other.end >= self.end;
        match (clips_start, clips_end) {
            (true, true) => Remainder1D::None,
            (true, false) => Remainder1D::Single(Self {
                start: other.end.clone(),
                end: self.end.clone(),
            }),
            (false, true) => Remainder1D::Single(Self {
                start: self.start.clone(),
                end: other.start.clone(),
            }),
            (false, false) => Remainder1D::Split(
                Self {
                    start: self.start.clone(),
                    end: other.start.clone(),
                },
                Self {
                    start: other.end.clone(),
                    end: self.end.clone(),
                },
            ),
        }
    }

    /// Whether `self` and `other` meet with no gap and no overlap.
    pub fn adjacent_to(&self, other: &Self) -> bool {
        self.end == other.start || other.end == self.start
    }

    /// The union of `self` and `other`, if they are adjacent or overlapping.
    pub fn union_if_adjacent(&self, other: &Self) -> Option<Self> {
        if self.adjacent_to(other) || self.intersects(other) {
            Some(Self {
                start: self.start.clone().min(other.start.clone()),
                end: self.end.clone().max(other.end.clone()),
            })
        } else {
            None
        }
    }
}

impl<V: DomainValue + fmt::Display> fmt::Display for Interval1D<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.start, &self.end) {
            (Domain1D::Bottom, Domain1D::Top) => write!(f, "(-inf..+inf)"),
            (Domain1D::Bottom, end) => write!(f, "(-inf..{})", display_end(end)),
            (start, Domain1D::Top) => write!(f, "[{}..+inf)", display_start(start)),
            (start, end) => write!(f, "[{}..{})", display_start(start), display_end(end)),
        }
    }
}

fn display_start<V: fmt::Display>(d: &Domain1D<V>) -> String {
    match d {
        Domain1D::Point(v) | Domain1D::Open(v) => format!("{v}"),
        Domain1D::Bottom => "-inf".to_string(),
        Domain1D::Top => "+inf".to_string(),
    }
}

fn display_end<V: fmt::Display>(d: &Domain1D<V>) -> String {
    display_start(d)
}
