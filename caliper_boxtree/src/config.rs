//! Construction-time tunables for [`crate::BoxTree`].

/// Tunables governing node splitting and tree growth.
///
/// Defaults match the values a caller would otherwise read from environment
/// variables one layer up, in `caliper_store::config::StoreConfig`; this
/// crate itself never touches the environment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxTreeConfig {
    /// Maximum payloads per leaf before it splits.
    pub node_capacity: usize,
    /// Hard ceiling on split depth. Leaves at this depth never split even if
    /// over capacity; required for correctness since `ordered_hash` may map
    /// distinct domain values to identical `f64` coordinates, which would
    /// otherwise force unbounded recursion.
    pub depth_limit: u32,
    /// Side length of the root's initial capacity, centered at the origin.
    pub initial_capacity_size: f64,
}

impl Default for BoxTreeConfig {
    fn default() -> Self {
        Self {
            node_capacity: 256,
            depth_limit: 32,
            initial_capacity_size: 1.0,
        }
    }
}
