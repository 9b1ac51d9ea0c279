//! Property tests over [`VersionedStore`] invariants.

use caliper_domain::{Interval1D, IntervalN};
use caliper_store::{StoreConfig, ValidData};
use caliper_versioned::{FixedClock, VersionSelection, VersionedStore};
use proptest::prelude::*;

fn iv(a: i32, b: i32) -> IntervalN<i32> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    IntervalN::new(vec![Interval1D::closed(lo, hi)])
}

fn fresh_store() -> VersionedStore<i32, i32> {
    VersionedStore::with_clock(StoreConfig::default(), Box::new(FixedClock(0)))
}

proptest! {
    /// Approving every staged write over the whole domain always leaves
    /// nothing staged, regardless of how many regions were staged.
    #[test]
    fn approve_all_always_drains_the_queue(
        regions in proptest::collection::vec((-50i32..50, -50i32..50, 0i32..10), 1..8)
    ) {
        let mut vs = fresh_store();
        for (a, b, value) in &regions {
            vs.set(ValidData::new(iv(*a, *b), *value), VersionSelection::Unapproved).unwrap();
        }
        vs.approve_all(&IntervalN::new(vec![Interval1D::unbounded()])).unwrap();
        prop_assert!(vs.unapproved().is_empty());
    }

    /// Reading `VersionSelection::At(current_version())` always matches
    /// `current()`, regardless of how many versions preceded it.
    #[test]
    fn at_current_version_matches_current(
        batches in proptest::collection::vec(
            proptest::collection::vec((-50i32..50, -50i32..50, 0i32..10), 0..4),
            0..6,
        )
    ) {
        let mut vs = fresh_store();
        for batch in &batches {
            for (a, b, value) in batch {
                vs.set(ValidData::new(iv(*a, *b), *value), VersionSelection::Current).unwrap();
            }
            vs.increment_current_version().unwrap();
        }
        let at_current = vs.read(VersionSelection::At(vs.current_version())).unwrap();
        let mut current_entries: Vec<_> = vs.current().iter().cloned().collect();
        let mut at_entries: Vec<_> = at_current.iter().cloned().collect();
        current_entries.sort_by_key(|d| d.interval.start());
        at_entries.sort_by_key(|d| d.interval.start());
        prop_assert_eq!(current_entries, at_entries);
    }

    /// Collapsing history never changes the current state or staged writes.
    #[test]
    fn collapse_never_changes_current_or_unapproved(
        batches in proptest::collection::vec(
            proptest::collection::vec((-50i32..50, -50i32..50, 0i32..10), 0..4),
            1..6,
        ),
        staged_value in 0i32..10,
    ) {
        let mut vs = fresh_store();
        for batch in &batches {
            for (a, b, value) in batch {
                vs.set(ValidData::new(iv(*a, *b), *value), VersionSelection::Current).unwrap();
            }
            vs.increment_current_version().unwrap();
        }
        vs.set(ValidData::new(iv(-100, -90), staged_value), VersionSelection::Unapproved).unwrap();

        let mut before: Vec<_> = vs.current().iter().cloned().collect();
        before.sort_by_key(|d| d.interval.start());
        let unapproved_before = vs.unapproved().len();

        vs.collapse_version_history(vs.current_version());

        let mut after: Vec<_> = vs.current().iter().cloned().collect();
        after.sort_by_key(|d| d.interval.start());
        prop_assert_eq!(before, after);
        prop_assert_eq!(vs.unapproved().len(), unapproved_before);
    }
}
