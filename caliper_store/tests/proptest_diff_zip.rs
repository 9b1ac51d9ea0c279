//! Property tests over diff round-trip and zip identity.

use caliper_domain::{Interval1D, IntervalN};
use caliper_store::{DimensionalStore, ValidData};
use proptest::prelude::*;

fn iv(a: i32, b: i32) -> IntervalN<i32> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    IntervalN::new(vec![Interval1D::closed(lo, hi)])
}

fn build(ops: &[(i32, i32, i32)]) -> DimensionalStore<i32, i32> {
    let mut store = DimensionalStore::with_default_config();
    for (a, b, value) in ops {
        store.set(ValidData::new(iv(*a, *b), *value)).unwrap();
    }
    store
}

fn sorted_entries<V: Clone + Eq + Ord + std::fmt::Debug>(
    store: &DimensionalStore<V, i32>,
) -> Vec<ValidData<V, i32>> {
    let mut entries: Vec<_> = store.iter().cloned().collect();
    entries.sort_by(|a, b| a.interval.start().cmp(&b.interval.start()));
    entries
}

proptest! {
    /// Applying `y.diff_actions_from(x)` to `x` always yields exactly `y`,
    /// whatever sequence of writes produced each (P6).
    #[test]
    fn diff_actions_round_trip(
        x_ops in proptest::collection::vec((-40i32..40, -40i32..40, 0i32..4), 0..10),
        y_ops in proptest::collection::vec((-40i32..40, -40i32..40, 0i32..4), 0..10),
    ) {
        let mut x = build(&x_ops);
        let y = build(&y_ops);

        let actions = y.diff_actions_from(&x);
        x.apply_diff_actions(&actions).unwrap();

        prop_assert_eq!(sorted_entries(&x), sorted_entries(&y));
    }

    /// Zipping a store with itself and projecting back to the first value
    /// reproduces the original store (P7).
    #[test]
    fn zip_with_self_then_project_first_is_identity(
        ops in proptest::collection::vec((-40i32..40, -40i32..40, 0i32..4), 0..10)
    ) {
        let store = build(&ops);
        let zipped = store.zip(&store);

        let mut projected: DimensionalStore<i32, i32> = DimensionalStore::with_default_config();
        for entry in zipped.iter() {
            projected
                .set(ValidData::new(entry.interval.clone(), entry.value.0))
                .unwrap();
        }

        prop_assert_eq!(sorted_entries(&projected), sorted_entries(&store));
    }
}
