//! End-to-end scenarios over [`VersionedStore`].

use caliper_domain::{Domain1D, DomainN, Interval1D, IntervalN};
use caliper_store::{StoreConfig, ValidData};
use caliper_versioned::{FixedClock, VersionSelection, VersionedStore};

fn iv(a: i32, b: i32) -> IntervalN<i32> {
    IntervalN::new(vec![Interval1D::closed(a, b)])
}

fn from(a: i32) -> IntervalN<i32> {
    IntervalN::new(vec![Interval1D::from(a)])
}

fn unbounded() -> IntervalN<i32> {
    IntervalN::new(vec![Interval1D::unbounded()])
}

fn point(v: i32) -> DomainN<i32> {
    DomainN::new(vec![Domain1D::Point(v)])
}

/// The literal versioned approve flow: a background write, two overlapping
/// overrides, a staged correction that gets approved by content, a staged
/// removal materialized by `approve_all`, and a final check of what survives
/// over a wider query range.
#[test]
fn scenario_versioned_approve_flow() {
    let mut vs: VersionedStore<&str, i32> =
        VersionedStore::with_clock(StoreConfig::default(), Box::new(FixedClock(0)));

    vs.set(ValidData::new(unbounded(), "Testing"), VersionSelection::Current)
        .unwrap();
    vs.increment_current_version().unwrap();

    vs.set(ValidData::new(iv(1, 15), "Hello"), VersionSelection::Current)
        .unwrap();
    vs.increment_current_version().unwrap();

    vs.set(ValidData::new(from(10), "World"), VersionSelection::Current)
        .unwrap();
    vs.increment_current_version().unwrap();

    let zoinks = ValidData::new(iv(-30, 0), "Zoinks!");
    vs.set(zoinks.clone(), VersionSelection::Unapproved).unwrap();

    assert_eq!(vs.current().get_at(&point(0)), Some("Testing"));
    assert_eq!(
        vs.read(VersionSelection::Unapproved).unwrap().get_at(&point(0)),
        Some("Zoinks!")
    );

    vs.increment_current_version().unwrap();
    assert_eq!(vs.approve(zoinks).unwrap(), Some(()));
    vs.remove(&iv(-5, 5), VersionSelection::Unapproved).unwrap();

    assert_eq!(vs.current().get_at(&point(0)), Some("Zoinks!"));

    vs.increment_current_version().unwrap();
    vs.approve_all(&unbounded()).unwrap();

    assert_eq!(vs.current().get_at(&point(0)), None);

    let mut hits = vs.current().get_intersecting(&iv(5, 15));
    hits.sort_by_key(|d| d.interval.start());
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].interval, iv(6, 9));
    assert_eq!(hits[0].value, "Hello");
    assert_eq!(hits[1].interval, from(10));
    assert_eq!(hits[1].value, "World");
}
