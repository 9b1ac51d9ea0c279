//! Creation/update/deletion action streams between two stores.

use caliper_domain::DomainN;

use crate::valid_data::ValidData;

/// One step of replaying an older store's content into a newer one.
///
/// Keys are interval starts. `Create`/`Update` carry the full entry being
/// written; `Delete` carries only the start key of the entry to remove.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum DiffAction<V, D> {
    /// An entry present in the target but not the source.
    Create(ValidData<V, D>),
    /// An entry present in both, but differing.
    Update(ValidData<V, D>),
    /// An entry present only in the source, keyed by its start point.
    Delete(DomainN<D>),
}
