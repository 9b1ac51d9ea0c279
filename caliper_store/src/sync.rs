//! A mutex-guarded [`DimensionalStore`] for compound operations shared
//! across threads.

use std::fmt::Debug;
use std::sync::Mutex;

use caliper_domain::{DomainN, DomainValue, IntervalN};

use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::DimensionalStore;
use crate::valid_data::ValidData;

/// Wraps a [`DimensionalStore`] behind a [`Mutex`], so that compound
/// operations spanning more than one index lookup (`set`, `update`,
/// `update_or_remove`) observe and leave the store in a consistent state
/// under concurrent access.
pub struct SyncDimensionalStore<V, D> {
    inner: Mutex<DimensionalStore<V, D>>,
}

impl<V, D> SyncDimensionalStore<V, D>
where
    V: Clone + Eq + Ord + Debug,
    D: DomainValue,
{
    /// Wrap an existing store.
    pub fn new(store: DimensionalStore<V, D>) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Build an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        Self::new(DimensionalStore::new(config))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DimensionalStore<V, D>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// See [`DimensionalStore::get_at`].
    pub fn get_at(&self, point: &DomainN<D>) -> Option<V> {
        self.lock().get_at(point)
    }

    /// See [`DimensionalStore::get_intersecting`].
    pub fn get_intersecting(&self, target: &IntervalN<D>) -> Vec<ValidData<V, D>> {
        self.lock().get_intersecting(target)
    }

    /// See [`DimensionalStore::set`].
    pub fn set(&self, data: ValidData<V, D>) -> Result<()> {
        self.lock().set(data)
    }

    /// See [`DimensionalStore::update`].
    pub fn update(&self, data: ValidData<V, D>) -> Result<()> {
        self.lock().update(data)
    }

    /// See [`DimensionalStore::remove`].
    pub fn remove(&self, interval: &IntervalN<D>) -> Result<()> {
        self.lock().remove(interval)
    }

    /// See [`DimensionalStore::update_or_remove`].
    pub fn update_or_remove(&self, target: &IntervalN<D>, f: impl Fn(&V) -> Option<V>) -> Result<()> {
        self.lock().update_or_remove(target, f)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A point-in-time copy of every stored entry.
    pub fn snapshot(&self) -> Vec<ValidData<V, D>> {
        self.lock().iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caliper_domain::Interval1D;
    use std::sync::Arc;
    use std::thread;

    fn iv(a: i32, b: i32) -> IntervalN<i32> {
        IntervalN::new(vec![Interval1D::closed(a, b)])
    }

    #[test]
    fn concurrent_sets_on_disjoint_regions_both_land() {
        let store: Arc<SyncDimensionalStore<i32, i32>> =
            Arc::new(SyncDimensionalStore::with_config(StoreConfig::default()));

        let a = Arc::clone(&store);
        let b = Arc::clone(&store);
        let t1 = thread::spawn(move || a.set(ValidData::new(iv(0, 9), 1)).unwrap());
        let t2 = thread::spawn(move || b.set(ValidData::new(iv(10, 19), 2)).unwrap());
        t1.join().unwrap();
        t2.join().unwrap();

        assert_eq!(store.len(), 2);
    }
}
