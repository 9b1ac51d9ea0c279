//! Property tests over [`IntervalN::remainder`]'s partition guarantee.

use caliper_domain::{DomainN, Interval1D, IntervalN};
use proptest::prelude::*;

fn iv2(ax: i32, ay: i32, bx: i32, by: i32) -> IntervalN<i32> {
    let (ax, bx) = if ax <= bx { (ax, bx) } else { (bx, ax) };
    let (ay, by) = if ay <= by { (ay, by) } else { (by, ay) };
    IntervalN::new(vec![Interval1D::closed(ax, bx), Interval1D::closed(ay, by)])
}

fn points_in(iv: &IntervalN<i32>, lo: i32, hi: i32) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for x in lo..=hi {
        for y in lo..=hi {
            let p = DomainN::new(vec![
                caliper_domain::Domain1D::Point(x),
                caliper_domain::Domain1D::Point(y),
            ]);
            if iv.contains(&p).unwrap() {
                out.push((x, y));
            }
        }
    }
    out
}

proptest! {
    /// `self \ other` (the `kept` pieces plus the optional `excluded` piece)
    /// exactly partitions `self`: every point of `self` appears in exactly
    /// one of those pieces, and no piece contains a point outside `self`.
    #[test]
    fn remainder_partitions_self(
        ax in -10i32..10, ay in -10i32..10, bx in -10i32..10, by in -10i32..10,
        ox in -10i32..10, oy in -10i32..10, px in -10i32..10, py in -10i32..10,
    ) {
        let a = iv2(ax, ay, bx, by);
        let b = iv2(ox, oy, px, py);
        let (kept, excluded) = a.remainder(&b).unwrap();

        let bound_lo = -12;
        let bound_hi = 12;
        let mut covered = std::collections::HashSet::new();
        for piece in &kept {
            for p in points_in(piece, bound_lo, bound_hi) {
                prop_assert!(covered.insert(p), "kept pieces overlap at {:?}", p);
            }
        }
        if let Some(excluded) = &excluded {
            for p in points_in(excluded, bound_lo, bound_hi) {
                prop_assert!(covered.insert(p), "excluded piece overlaps a kept piece at {:?}", p);
            }
        }

        let expected: std::collections::HashSet<_> =
            points_in(&a, bound_lo, bound_hi).into_iter().collect();
        prop_assert_eq!(covered, expected);
    }

    /// The excluded piece, when present, is always contained in both `self`
    /// and `other` — it is exactly the overlap.
    #[test]
    fn excluded_piece_is_the_intersection(
        ax in -10i32..10, ay in -10i32..10, bx in -10i32..10, by in -10i32..10,
        ox in -10i32..10, oy in -10i32..10, px in -10i32..10, py in -10i32..10,
    ) {
        let a = iv2(ax, ay, bx, by);
        let b = iv2(ox, oy, px, py);
        let (_, excluded) = a.remainder(&b).unwrap();
        let intersection = a.intersection(&b).unwrap();

        match (excluded, intersection) {
            (Some(e), Some(i)) => prop_assert_eq!(e, i),
            (None, None) => {}
            (e, i) => prop_assert!(false, "excluded {:?} disagreed with intersection {:?}", e, i),
        }
    }
}
