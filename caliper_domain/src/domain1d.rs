//! 1-D domain points: `Bottom`, `Open(v)`, `Point(v)` and `Top`.

use core::cmp::Ordering;

use crate::domain_value::DomainValue;
use crate::error::{DomainError, Result};

/// A single coordinate along one axis of a domain.
///
/// `Point(v)` is the inclusive cut at `v`. `Open(v)` is the cut immediately
/// after `v`; it exists so a continuous interval can express an exclusive
/// bound without a discrete successor to step to, and is rejected for
/// discrete `V` by the checked constructor [`Domain1D::open`]. `Bottom` and
/// `Top` are the unbounded sentinels.
///
/// Ordering is: `Bottom < everything < Top`, and among `Open`/`Point` values,
/// primarily by the wrapped value with `Point(v) < Open(v)` when the wrapped
/// values are equal. This is what makes `Open(v)` behave as "just after `v`".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain1D<V> {
    /// Less than every other value, including `Open`/`Point`.
    Bottom,
    /// The cut immediately after `v`. Never valid for discrete `V`.
    Open(V),
    /// The inclusive cut at `v`.
    Point(V),
    /// Greater than every other value.
    Top,
}

impl<V: DomainValue> Domain1D<V> {
    /// Build an `Open` boundary, rejecting discrete value types.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidBoundary`] if `V::is_discrete()`.
    pub fn open(v: V) -> Result<Self> {
        if V::is_discrete() {
            return Err(DomainError::InvalidBoundary(format!(
                "Open({v:?}) is not valid for a discrete domain value"
            )));
        }
        Ok(Self::Open(v))
    }

    /// The cut immediately following this one, used to build half-open
    /// interval ends from an inclusive bound: for discrete `V` this steps to
    /// `Point(successor(v))`; for continuous `V` it becomes `Open(v)`.
    ///
    /// `Bottom` has no successor cut in this sense and is returned unchanged;
    /// `Top` likewise.
    pub(crate) fn cut_after(v: &V) -> Self {
        if V::is_discrete() {
            match v.successor() {
                Some(next) => Self::Point(next),
                None => Self::Top,
            }
        } else {
            Self::Open(v.clone())
        }
    }

    /// The cut immediately preceding this one, the mirror of
    /// [`cut_after`][Self::cut_after] used to build half-open starts from an
    /// exclusive bound.
    pub(crate) fn cut_before(v: &V) -> Self {
        if V::is_discrete() {
            match v.predecessor() {
                Some(prev) => Self::Point(prev),
                None => Self::Bottom,
            }
        } else {
            Self::Point(v.clone())
        }
    }

    /// Whether this cut is one of the unbounded sentinels.
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Bottom | Self::Top)
    }

    /// The wrapped domain value, if this is `Open` or `Point`.
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Open(v) | Self::Point(v) => Some(v),
            Self::Bottom | Self::Top => None,
        }
    }

    /// The order-preserving `f64` projection used as a spatial-index
    /// coordinate: `Bottom` maps to `-infinity`, `Top` to `+infinity`, and
    /// `Open(v)` to a strictly positive bump above `ordered_hash(v)`.
    pub fn ordered_hash(&self) -> f64 {
        match self {
            Self::Bottom => f64::NEG_INFINITY,
            Self::Top => f64::INFINITY,
            Self::Point(v) => v.ordered_hash(),
            Self::Open(v) => {
                let base = v.ordered_hash();
                // A fixed relative bump rather than `f64::EPSILON` so it stays
                // representable away from zero; I4 tolerates the rare case
                // where this lands on the next representable point.
                let bump = (base.abs() * 1e-9).max(1e-12);
                base + bump
            }
        }
    }
}

impl<V: DomainValue> PartialOrd for Domain1D<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V: DomainValue> Ord for Domain1D<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank<V>(d: &Domain1D<V>) -> u8 {
            match d {
                Domain1D::Bottom => 0,
                Domain1D::Point(_) => 1,
                Domain1D::Open(_) => 2,
                Domain1D::Top => 3,
            }
        }

        match (self, other) {
            (Self::Bottom, Self::Bottom) | (Self::Top, Self::Top) => Ordering::Equal,
            (Self::Bottom, _) | (_, Self::Top) => Ordering::Less,
            (_, Self::Bottom) | (Self::Top, _) => Ordering::Greater,
            (Self::Point(a) | Self::Open(a), Self::Point(b) | Self::Open(b)) => {
                a.cmp(b).then_with(|| rank(self).cmp(&rank(other)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_and_top_are_sentinels() {
        assert!(Domain1D::<i32>::Bottom < Domain1D::Point(i32::MIN));
        assert!(Domain1D::<i32>::Top > Domain1D::Point(i32::MAX));
        assert!(Domain1D::<i32>::Bottom < Domain1D::Top);
    }

    #[test]
    fn point_orders_before_open_at_equal_value() {
        let p = Domain1D::Point(5_i64);
        let o = Domain1D::open(5_i64);
        // i64 is discrete, so Open(5) is rejected outright.
        assert!(o.is_err());
        let _ = p;
    }

    #[test]
    fn open_sits_between_point_and_next_point_for_continuous_values() {
        use crate::domain_value::Real;
        let p = Domain1D::Point(Real(5.0));
        let o = Domain1D::open(Real(5.0)).unwrap();
        let next = Domain1D::Point(Real(6.0));
        assert!(p < o);
        assert!(o < next);
    }

    #[test]
    fn cut_after_steps_discrete_successor() {
        let cut = Domain1D::cut_after(&4_i32);
        assert_eq!(cut, Domain1D::Point(5));
    }

    #[test]
    fn cut_after_is_open_for_continuous() {
        use crate::domain_value::Real;
        let cut = Domain1D::cut_after(&Real(4.0));
        assert_eq!(cut, Domain1D::Open(Real(4.0)));
    }

    #[test]
    fn ordered_hash_respects_order() {
        let a = Domain1D::Point(3_i32);
        let b = Domain1D::Point(10_i32);
        assert!(a < b);
        assert!(a.ordered_hash() <= b.ordered_hash());
    }
}
