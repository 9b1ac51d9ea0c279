//! Property test over [`BoxTree::query`]'s soundness guarantee.

use caliper_boxtree::{BoxGeom, BoxTree, Coordinate};
use proptest::prelude::*;

fn b(min: [f64; 2], max: [f64; 2]) -> BoxGeom {
    let lo = [min[0].min(max[0]), min[1].min(max[1])];
    let hi = [min[0].max(max[0]), min[1].max(max[1])];
    BoxGeom::new(Coordinate::new(lo.to_vec()), Coordinate::new(hi.to_vec())).unwrap()
}

proptest! {
    /// `query`'s deduplicated hits are exactly the stored payloads whose box
    /// truly intersects the query box — no spurious misses, and no leftover
    /// false positives once duplicates are removed.
    #[test]
    fn query_matches_brute_force_intersection(
        boxes in proptest::collection::vec(
            (-50f64..50.0, -50f64..50.0, -50f64..50.0, -50f64..50.0),
            0..30,
        ),
        qx0 in -50f64..50.0, qy0 in -50f64..50.0, qx1 in -50f64..50.0, qy1 in -50f64..50.0,
    ) {
        let mut tree: BoxTree<usize> = BoxTree::new();
        let mut stored = Vec::new();
        for (i, (x0, y0, x1, y1)) in boxes.iter().enumerate() {
            let geom = b([*x0, *y0], [*x1, *y1]);
            tree.insert(geom.clone(), i).unwrap();
            stored.push(geom);
        }

        let query_box = b([qx0, qy0], [qx1, qy1]);
        let mut hits = tree.query(&query_box).unwrap();
        hits.sort_unstable();
        hits.dedup();

        let mut expected: Vec<usize> = stored
            .iter()
            .enumerate()
            .filter(|(_, geom)| geom.intersects(&query_box))
            .map(|(i, _)| i)
            .collect();
        expected.sort_unstable();

        prop_assert_eq!(hits, expected);
    }
}
