//! Environment-variable configuration, captured once at store construction.

use caliper_boxtree::BoxTreeConfig;

const ENV_NODE_CAPACITY: &str = "TREE_NODE_CAPACITY";
const ENV_DEPTH_LIMIT: &str = "TREE_DEPTH_LIMIT";
const ENV_CAPACITY_SIZE: &str = "TREE_BOUNDARY_CAPACITY_SIZE";
const ENV_REQUIRE_DISJOINT: &str = "REQUIRE_DISJOINT";
const ENV_NO_SEARCH_TREE: &str = "NO_SEARCH_TREE";
const ENV_BRUTE_FORCE_UPDATE: &str = "BRUTE_FORCE_UPDATE";

/// Construction-time configuration for [`crate::DimensionalStore`].
///
/// Read once per process, at construction, and never re-read afterward — the
/// three diagnostic toggles and the spatial-index tunables are frozen into
/// this struct rather than consulted live on every call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoreConfig {
    /// Forwarded to [`BoxTreeConfig::node_capacity`].
    pub node_capacity: usize,
    /// Forwarded to [`BoxTreeConfig::depth_limit`].
    pub depth_limit: u32,
    /// Forwarded to [`BoxTreeConfig::initial_capacity_size`].
    pub initial_capacity_size: f64,
    /// When set, constructors that accept raw entries verify pairwise
    /// disjointness and fail with `NonDisjointInput` instead of trusting the
    /// caller.
    pub require_disjoint: bool,
    /// When set, the store never builds a spatial index and falls back to a
    /// linear scan of `by_start` for `get_intersecting`/`get_at`. Must
    /// produce identical observable results to the indexed path.
    pub no_search_tree: bool,
    /// When set, `update_or_remove` uses the brute-force `3^N`-product
    /// partition. This implementation only ever uses the brute-force path
    /// (see `DESIGN.md`), so this flag is parsed and stored but does not
    /// currently change behavior.
    pub brute_force_update: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let defaults = BoxTreeConfig::default();
        Self {
            node_capacity: defaults.node_capacity,
            depth_limit: defaults.depth_limit,
            initial_capacity_size: defaults.initial_capacity_size,
            require_disjoint: false,
            no_search_tree: false,
            brute_force_update: false,
        }
    }
}

impl StoreConfig {
    /// Read configuration from the environment, falling back to
    /// [`StoreConfig::default`] for any variable that is absent or fails to
    /// parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            node_capacity: env_usize(ENV_NODE_CAPACITY).unwrap_or(defaults.node_capacity),
            depth_limit: env_u32(ENV_DEPTH_LIMIT).unwrap_or(defaults.depth_limit),
            initial_capacity_size: env_f64(ENV_CAPACITY_SIZE)
                .unwrap_or(defaults.initial_capacity_size),
            require_disjoint: env_flag(ENV_REQUIRE_DISJOINT),
            no_search_tree: env_flag(ENV_NO_SEARCH_TREE),
            brute_force_update: env_flag(ENV_BRUTE_FORCE_UPDATE),
        }
    }

    pub(crate) fn box_tree_config(&self) -> BoxTreeConfig {
        BoxTreeConfig {
            node_capacity: self.node_capacity,
            depth_limit: self.depth_limit,
            initial_capacity_size: self.initial_capacity_size,
        }
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok()?.parse().ok()
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.parse().ok()
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok()?.parse().ok()
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).ok().as_deref(),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_box_tree_defaults() {
        let cfg = StoreConfig::default();
        assert_eq!(cfg.node_capacity, 256);
        assert_eq!(cfg.depth_limit, 32);
        assert!((cfg.initial_capacity_size - 1.0).abs() < f64::EPSILON);
        assert!(!cfg.require_disjoint);
        assert!(!cfg.no_search_tree);
        assert!(!cfg.brute_force_update);
    }
}
