//! Multi-valued overlay: many values may hold simultaneously over one region.

use std::collections::BTreeSet;
use std::fmt::Debug;

use caliper_domain::{DomainN, DomainValue, IntervalN};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::DimensionalStore;
use crate::valid_data::ValidData;

/// A region-tagged multimap: wraps a [`DimensionalStore`] of
/// [`BTreeSet`]s, treating the empty set as the implicit absence of any
/// value. Where [`DimensionalStore`] enforces "at most one value per point",
/// this allows any number.
pub struct MultiDimensionalStore<E, D> {
    inner: DimensionalStore<BTreeSet<E>, D>,
}

impl<E, D> MultiDimensionalStore<E, D>
where
    E: Clone + Ord + Debug,
    D: DomainValue,
{
    /// Build an empty overlay with the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            inner: DimensionalStore::new(config),
        }
    }

    /// Build an empty overlay with [`StoreConfig::default`].
    pub fn with_default_config() -> Self {
        Self::new(StoreConfig::default())
    }

    /// The members held at `point`, or the empty set if none.
    pub fn get_at(&self, point: &DomainN<D>) -> BTreeSet<E> {
        self.inner.get_at(point).unwrap_or_default()
    }

    /// Regions (and their member sets) intersecting `target`.
    pub fn get_intersecting(&self, target: &IntervalN<D>) -> Vec<ValidData<BTreeSet<E>, D>> {
        self.inner.get_intersecting(target)
    }

    /// Add `e` to the member set over every point of `interval`, creating a
    /// singleton set wherever no entry previously covered that point.
    pub fn add_one(&mut self, interval: &IntervalN<D>, e: E) -> Result<()> {
        let to_insert = e.clone();
        self.inner.update_or_remove(interval, move |set| {
            let mut next = set.clone();
            next.insert(to_insert.clone());
            Some(next)
        })?;
        let mut singleton = BTreeSet::new();
        singleton.insert(e);
        self.inner.fill(ValidData::new(interval.clone(), singleton))
    }

    /// Remove `e` from the member set over every point of `interval`,
    /// dropping the entry entirely once its set becomes empty.
    pub fn remove_one(&mut self, interval: &IntervalN<D>, e: &E) -> Result<()> {
        self.inner.update_or_remove(interval, |set| {
            let mut next = set.clone();
            next.remove(e);
            if next.is_empty() {
                None
            } else {
                Some(next)
            }
        })
    }

    /// Union this overlay's member sets with `other`'s, region by region.
    pub fn merge_one(&self, other: &Self) -> Self {
        let inner = self
            .inner
            .merge(&other.inner, |a, b| a.union(b).cloned().collect());
        Self { inner }
    }

    /// Number of distinct stored regions (not member count).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the overlay holds no regions.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate stored regions in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidData<BTreeSet<E>, D>> {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caliper_domain::Interval1D;

    fn iv(a: i32, b: i32) -> IntervalN<i32> {
        IntervalN::new(vec![Interval1D::closed(a, b)])
    }

    fn point(v: i32) -> DomainN<i32> {
        DomainN::new(vec![caliper_domain::Domain1D::Point(v)])
    }

    #[test]
    fn add_one_creates_singleton_over_uncovered_region() {
        let mut store: MultiDimensionalStore<&str, i32> = MultiDimensionalStore::with_default_config();
        store.add_one(&iv(0, 9), "alice").unwrap();
        assert_eq!(store.get_at(&point(5)), BTreeSet::from(["alice"]));
    }

    #[test]
    fn add_one_unions_into_overlapping_region() {
        let mut store: MultiDimensionalStore<&str, i32> = MultiDimensionalStore::with_default_config();
        store.add_one(&iv(0, 9), "alice").unwrap();
        store.add_one(&iv(5, 15), "bob").unwrap();

        assert_eq!(store.get_at(&point(2)), BTreeSet::from(["alice"]));
        assert_eq!(store.get_at(&point(7)), BTreeSet::from(["alice", "bob"]));
        assert_eq!(store.get_at(&point(12)), BTreeSet::from(["bob"]));
    }

    #[test]
    fn remove_one_drops_entry_once_empty() {
        let mut store: MultiDimensionalStore<&str, i32> = MultiDimensionalStore::with_default_config();
        store.add_one(&iv(0, 9), "alice").unwrap();
        store.remove_one(&iv(0, 9), &"alice").unwrap();
        assert!(store.get_at(&point(5)).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn merge_one_unions_overlapping_sets() {
        let mut a: MultiDimensionalStore<&str, i32> = MultiDimensionalStore::with_default_config();
        a.add_one(&iv(0, 9), "alice").unwrap();
        let mut b: MultiDimensionalStore<&str, i32> = MultiDimensionalStore::with_default_config();
        b.add_one(&iv(5, 15), "bob").unwrap();

        let merged = a.merge_one(&b);
        assert_eq!(merged.get_at(&point(7)), BTreeSet::from(["alice", "bob"]));
        assert_eq!(merged.get_at(&point(2)), BTreeSet::from(["alice"]));
        assert_eq!(merged.get_at(&point(12)), BTreeSet::from(["bob"]));
    }
}
