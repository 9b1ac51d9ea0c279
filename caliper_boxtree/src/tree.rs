//! The hyperoctree itself.

use caliper_geometry::{BoxGeom, Capacity, Coordinate, GeometryError};
use thiserror::Error;
use tracing::trace;

use crate::config::BoxTreeConfig;

/// Failures raised by [`BoxTree`] operations.
#[derive(Debug, Error)]
pub enum BoxTreeError {
    /// A box of different dimension than the tree's established arity was
    /// inserted or queried.
    #[error("box-tree dimension mismatch: tree is {tree_dims}-D, box is {box_dims}-D")]
    DimensionMismatch {
        /// The tree's established dimensionality.
        tree_dims: usize,
        /// The dimensionality of the offending box.
        box_dims: usize,
    },
}

impl From<GeometryError> for BoxTreeError {
    fn from(e: GeometryError) -> Self {
        match e {
            GeometryError::DimensionMismatch(a, b) => Self::DimensionMismatch {
                tree_dims: a,
                box_dims: b,
            },
        }
    }
}

#[derive(Clone)]
struct Entry<Payload> {
    aabb: BoxGeom,
    payload: Payload,
}

#[derive(Clone)]
enum Node<Payload> {
    Leaf {
        capacity: Capacity,
        boundary: BoxGeom,
        depth: u32,
        entries: Vec<Entry<Payload>>,
    },
    Branch {
        capacity: Capacity,
        boundary: BoxGeom,
        children: Vec<Node<Payload>>,
    },
}

impl<Payload: Clone> Node<Payload> {
    fn leaf(capacity: Capacity, depth: u32) -> Self {
        let boundary = capacity.bounds();
        Self::Leaf {
            capacity,
            boundary,
            depth,
            entries: Vec::new(),
        }
    }

    fn boundary(&self) -> &BoxGeom {
        match self {
            Self::Leaf { boundary, .. } | Self::Branch { boundary, .. } => boundary,
        }
    }

    fn insert(&mut self, aabb: &BoxGeom, payload: &Payload, config: &BoxTreeConfig) {
        match self {
            Self::Branch { children, .. } => {
                for child in children.iter_mut() {
                    if child.boundary().intersects(aabb) {
                        child.insert(aabb, payload, config);
                    }
                }
            }
            Self::Leaf { entries, .. } => {
                entries.push(Entry {
                    aabb: aabb.clone(),
                    payload: payload.clone(),
                });
                self.split_if_needed(config);
            }
        }
    }

    fn split_if_needed(&mut self, config: &BoxTreeConfig) {
        let should_split = match self {
            Self::Leaf {
                entries, depth, ..
            } => entries.len() > config.node_capacity && *depth < config.depth_limit,
            Self::Branch { .. } => false,
        };
        if !should_split {
            return;
        }

        let Self::Leaf {
            capacity,
            entries,
            depth,
            ..
        } = std::mem::replace(
            self,
            Self::Leaf {
                capacity: Capacity::new(Coordinate::origin(0), 1.0),
                boundary: BoxGeom::new(Coordinate::origin(0), Coordinate::origin(0)).unwrap(),
                depth: 0,
                entries: Vec::new(),
            },
        )
        else {
            unreachable!("guarded by should_split's Leaf match above");
        };

        let dims = capacity.dims();
        let octant_count = 1usize << dims;
        let mut children: Vec<Node<Payload>> = (0..octant_count)
            .map(|i| Self::leaf(capacity.octant(i), depth + 1))
            .collect();

        for entry in &entries {
            for child in children.iter_mut() {
                if child.boundary().intersects(&entry.aabb) {
                    child.insert(&entry.aabb, &entry.payload, config);
                }
            }
        }

        trace!(
            depth,
            octant_count,
            entries = entries.len(),
            "box-tree leaf split"
        );

        *self = Self::Branch {
            capacity,
            boundary: self_boundary(&children),
            children,
        };
    }

    fn query(&self, aabb: &BoxGeom, out: &mut Vec<Payload>) {
        if !self.boundary().intersects(aabb) {
            return;
        }
        match self {
            Self::Leaf { entries, .. } => {
                for entry in entries {
                    if entry.aabb.intersects(aabb) {
                        out.push(entry.payload.clone());
                    }
                }
            }
            Self::Branch { children, .. } => {
                for child in children {
                    child.query(aabb, out);
                }
            }
        }
    }

    fn remove(&mut self, aabb: &BoxGeom, payload: &Payload)
    where
        Payload: PartialEq,
    {
        if !self.boundary().intersects(aabb) {
            return;
        }
        match self {
            Self::Leaf { entries, .. } => {
                entries.retain(|e| e.payload != *payload);
            }
            Self::Branch { children, .. } => {
                for child in children.iter_mut() {
                    child.remove(aabb, payload);
                }
            }
        }
    }

    fn flatten(&self, out: &mut Vec<(BoxGeom, Payload)>) {
        match self {
            Self::Leaf { entries, .. } => {
                for entry in entries {
                    out.push((entry.aabb.clone(), entry.payload.clone()));
                }
            }
            Self::Branch { children, .. } => {
                for child in children {
                    child.flatten(out);
                }
            }
        }
    }
}

fn self_boundary<Payload>(children: &[Node<Payload>]) -> BoxGeom {
    // The branch's boundary is the union of its children's boundaries, which
    // by construction (octants partition the parent capacity) equals the
    // parent capacity's own bounds.
    let first = children.first().expect("a split always creates >= 1 child");
    let dims = first.boundary().dims();
    let mut min = first.boundary().min().values().to_vec();
    let mut max = first.boundary().max().values().to_vec();
    for child in &children[1..] {
        for i in 0..dims {
            min[i] = min[i].min(child.boundary().min().axis(i));
            max[i] = max[i].max(child.boundary().max().axis(i));
        }
    }
    BoxGeom::new(Coordinate::new(min), Coordinate::new(max)).expect("equal dims by construction")
}

/// A hyperoctree over continuous `R^n`: each node either holds up to
/// `node_capacity` leaf payloads or has split into `2^n` children, one per
/// hyperoctant of its boundary.
///
/// Dimensionality is inferred from the first inserted box and checked on
/// every subsequent operation. Duplicate hits and false positives are
/// permitted on [`query`][Self::query]: a payload whose box spans multiple
/// octants is stored under each of them, so callers must deduplicate by
/// payload identity.
#[derive(Clone)]
pub struct BoxTree<Payload> {
    config: BoxTreeConfig,
    dims: Option<usize>,
    root: Node<Payload>,
}

impl<Payload: Clone + PartialEq> BoxTree<Payload> {
    /// Build a tree with the given tunables.
    pub fn with_config(config: BoxTreeConfig) -> Self {
        let capacity = Capacity::new(Coordinate::origin(0), config.initial_capacity_size);
        Self {
            config,
            dims: None,
            root: Node::leaf(capacity, 0),
        }
    }

    /// Build a tree with default tunables (`node_capacity = 256`,
    /// `depth_limit = 32`, `initial_capacity_size = 1.0`).
    pub fn new() -> Self {
        Self::with_config(BoxTreeConfig::default())
    }

    fn check_dims(&mut self, aabb: &BoxGeom) -> Result<(), BoxTreeError> {
        match self.dims {
            None => {
                self.dims = Some(aabb.dims());
                // The placeholder root was built with 0 dimensions; rebuild
                // it now that the tree's real arity is known.
                let capacity = Capacity::new(
                    Coordinate::origin(aabb.dims()),
                    self.config.initial_capacity_size,
                );
                self.root = Node::leaf(capacity, 0);
                Ok(())
            }
            Some(d) if d == aabb.dims() => Ok(()),
            Some(d) => Err(BoxTreeError::DimensionMismatch {
                tree_dims: d,
                box_dims: aabb.dims(),
            }),
        }
    }

    /// Insert `payload` keyed by `aabb`, placing it into every hyperoctant
    /// subtree whose boundary intersects `aabb`. Grows the tree by doubling
    /// its capacity (redistributing existing payloads) until `aabb` is fully
    /// contained, if needed.
    ///
    /// # Errors
    /// [`BoxTreeError::DimensionMismatch`] if `aabb`'s dimension differs from
    /// the tree's established arity.
    pub fn insert(&mut self, aabb: BoxGeom, payload: Payload) -> Result<(), BoxTreeError> {
        self.check_dims(&aabb)?;
        self.grow_to_contain(&aabb);
        self.root.insert(&aabb, &payload, &self.config);
        Ok(())
    }

    fn grow_to_contain(&mut self, aabb: &BoxGeom) {
        if self.root.boundary().contains_box(aabb) {
            return;
        }
        let mut entries = Vec::new();
        self.root.flatten(&mut entries);

        let mut capacity = root_capacity(&self.root);
        let mut grown = 0;
        while !capacity.bounds().contains_box(aabb) {
            capacity = capacity.doubled();
            grown += 1;
        }
        trace!(grown, "box-tree root grown to contain out-of-range insert");

        self.root = Node::leaf(capacity, 0);
        for (box_, payload) in &entries {
            self.root.insert(box_, payload, &self.config);
        }
    }

    /// Query payloads whose box intersects `aabb`. Results may contain
    /// duplicates; callers deduplicate by payload identity.
    ///
    /// # Errors
    /// [`BoxTreeError::DimensionMismatch`] if `aabb`'s dimension differs from
    /// the tree's established arity.
    pub fn query(&self, aabb: &BoxGeom) -> Result<Vec<Payload>, BoxTreeError> {
        if let Some(d) = self.dims {
            if d != aabb.dims() {
                return Err(BoxTreeError::DimensionMismatch {
                    tree_dims: d,
                    box_dims: aabb.dims(),
                });
            }
        }
        let mut out = Vec::new();
        self.root.query(aabb, &mut out);
        Ok(out)
    }

    /// Remove `payload` from every subtree whose boundary intersects `aabb`.
    ///
    /// # Errors
    /// [`BoxTreeError::DimensionMismatch`] if `aabb`'s dimension differs from
    /// the tree's established arity.
    pub fn remove(&mut self, aabb: &BoxGeom, payload: &Payload) -> Result<(), BoxTreeError> {
        if let Some(d) = self.dims {
            if d != aabb.dims() {
                return Err(BoxTreeError::DimensionMismatch {
                    tree_dims: d,
                    box_dims: aabb.dims(),
                });
            }
        }
        self.root.remove(aabb, payload);
        Ok(())
    }
}

impl<Payload: Clone + PartialEq> Default for BoxTree<Payload> {
    fn default() -> Self {
        Self::new()
    }
}

fn root_capacity<Payload>(root: &Node<Payload>) -> Capacity {
    match root {
        Node::Leaf { capacity, .. } | Node::Branch { capacity, .. } => capacity.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(min: [f64; 2], max: [f64; 2]) -> BoxGeom {
        BoxGeom::new(Coordinate::new(min.to_vec()), Coordinate::new(max.to_vec())).unwrap()
    }

    #[test]
    fn insert_and_query_finds_overlapping_payload() {
        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.insert(b([-0.4, -0.4], [-0.2, -0.2]), 1).unwrap();
        let hits = tree.query(&b([-0.5, -0.5], [0.0, 0.0])).unwrap();
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn query_misses_disjoint_box() {
        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.insert(b([-0.4, -0.4], [-0.2, -0.2]), 1).unwrap();
        let hits = tree.query(&b([0.2, 0.2], [0.4, 0.4])).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn growth_by_doubling_contains_out_of_range_insert() {
        let mut tree: BoxTree<u32> = BoxTree::with_config(BoxTreeConfig {
            initial_capacity_size: 1.0,
            ..Default::default()
        });
        tree.insert(b([-0.4, -0.4], [-0.2, -0.2]), 1).unwrap();
        // Far outside the initial [-1, 1]^2 capacity; forces several doublings.
        tree.insert(b([900.0, 900.0], [901.0, 901.0]), 2).unwrap();

        let hits = tree.query(&b([899.0, 899.0], [902.0, 902.0])).unwrap();
        assert_eq!(hits, vec![2]);
        // The original payload must have survived the regrow/redistribute.
        let still_there = tree.query(&b([-0.5, -0.5], [0.0, 0.0])).unwrap();
        assert_eq!(still_there, vec![1]);
    }

    #[test]
    fn remove_deletes_payload_from_every_touched_leaf() {
        let mut tree: BoxTree<u32> = BoxTree::new();
        let region = b([-0.4, -0.4], [-0.2, -0.2]);
        tree.insert(region.clone(), 7).unwrap();
        tree.remove(&region, &7).unwrap();
        assert!(tree.query(&region).unwrap().is_empty());
    }

    #[test]
    fn splitting_past_node_capacity_still_finds_all_payloads() {
        let mut tree: BoxTree<u32> = BoxTree::with_config(BoxTreeConfig {
            node_capacity: 4,
            depth_limit: 16,
            initial_capacity_size: 100.0,
        });
        for i in 0..50u32 {
            let x = -90.0 + i as f64 * 3.0;
            tree.insert(b([x, x], [x + 1.0, x + 1.0]), i).unwrap();
        }
        let mut hits = tree.query(&b([-100.0, -100.0], [100.0, 100.0])).unwrap();
        hits.sort_unstable();
        hits.dedup();
        assert_eq!(hits.len(), 50);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut tree: BoxTree<u32> = BoxTree::new();
        tree.insert(b([0.0, 0.0], [1.0, 1.0]), 1).unwrap();
        let box_3d = BoxGeom::new(
            Coordinate::new(vec![0.0, 0.0, 0.0]),
            Coordinate::new(vec![1.0, 1.0, 1.0]),
        )
        .unwrap();
        assert!(matches!(
            tree.insert(box_3d, 2),
            Err(BoxTreeError::DimensionMismatch { .. })
        ));
    }
}
