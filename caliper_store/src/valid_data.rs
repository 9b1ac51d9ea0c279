//! A value paired with the N-D interval it is valid over.

use caliper_domain::{DomainValue, IntervalN};

/// A value together with the interval it holds over.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidData<V, D> {
    /// The region this value is authoritative over.
    pub interval: IntervalN<D>,
    /// The value itself.
    pub value: V,
}

impl<V, D: DomainValue> ValidData<V, D> {
    /// Pair a value with the interval it holds over.
    pub fn new(interval: IntervalN<D>, value: V) -> Self {
        Self { interval, value }
    }
}
