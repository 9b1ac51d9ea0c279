//! The versioned overlay: immediate writes under a [`VersionSelection`],
//! content-matching approval, and point-in-time reads over a
//! [`DimensionalStore`].

use std::collections::BTreeMap;
use std::fmt::Debug;

use caliper_domain::{DomainValue, IntervalN};
use caliper_store::{DimensionalStore, StoreConfig, ValidData};
use tracing::{debug, debug_span};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, VersionError};

/// Which point in a [`VersionedStore`]'s history to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSelection {
    /// The latest approved state.
    Current,
    /// The latest approved state with every staged-but-unapproved write and
    /// removal layered on top, as a preview.
    Unapproved,
    /// The approved state exactly as of a specific past version.
    At(i32),
}

/// Layers a staged overlay and an approval gate on top of a
/// [`DimensionalStore`].
///
/// Writes and removals under [`VersionSelection::Current`] take effect
/// immediately against `current`; the same operations under
/// [`VersionSelection::Unapproved`] land in a side overlay
/// (`DimensionalStore<Option<V>, D>`, where `None` marks a staged removal)
/// that is only visible when reading with `Unapproved` — it has no effect on
/// `current` until [`approve`][Self::approve] or
/// [`approve_all`][Self::approve_all] promotes it.
/// [`increment_current_version`][Self::increment_current_version] freezes
/// the outgoing version's content into a retained snapshot and mints the
/// next version number.
pub struct VersionedStore<V, D> {
    config: StoreConfig,
    current: DimensionalStore<V, D>,
    unapproved: DimensionalStore<Option<V>, D>,
    current_version: i32,
    snapshots: BTreeMap<i32, DimensionalStore<V, D>>,
    version_timestamps: BTreeMap<i32, i64>,
    notes: BTreeMap<i32, String>,
    clock: Box<dyn Clock>,
}

impl<V, D> VersionedStore<V, D>
where
    V: Clone + Eq + Ord + Debug,
    D: DomainValue,
{
    /// Build an overlay starting at version 0, timestamped by the system
    /// clock.
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Build an overlay with an explicit timestamp source, for deterministic
    /// tests.
    pub fn with_clock(config: StoreConfig, clock: Box<dyn Clock>) -> Self {
        let mut version_timestamps = BTreeMap::new();
        version_timestamps.insert(0, clock.now());
        Self {
            config,
            current: DimensionalStore::new(config),
            unapproved: DimensionalStore::new(config),
            current_version: 0,
            snapshots: BTreeMap::new(),
            version_timestamps,
            notes: BTreeMap::new(),
            clock,
        }
    }

    /// The latest approved state.
    pub fn current(&self) -> &DimensionalStore<V, D> {
        &self.current
    }

    /// The version number of the latest approved state.
    pub fn current_version(&self) -> i32 {
        self.current_version
    }

    /// Writes (`Some(v)`) and removals (`None`) staged but not yet promoted.
    pub fn unapproved(&self) -> &DimensionalStore<Option<V>, D> {
        &self.unapproved
    }

    /// Make `data` authoritative over its region under `selection`.
    ///
    /// Under [`VersionSelection::Current`] this takes effect immediately:
    /// `get_at` on [`current`][Self::current] reflects it right away (P9),
    /// and any staged overlay already covering the region is cleared, since
    /// a current write is authoritative forward through every later,
    /// still-unapproved version. Under [`VersionSelection::Unapproved`] it
    /// only lands in the staged overlay, visible via
    /// `read(VersionSelection::Unapproved)`.
    ///
    /// # Errors
    /// [`VersionError::ReadOnlyVersion`] under `VersionSelection::At`; past
    /// versions are immutable history.
    pub fn set(&mut self, data: ValidData<V, D>, selection: VersionSelection) -> Result<()> {
        match selection {
            VersionSelection::Current => {
                self.unapproved.remove(&data.interval)?;
                self.current.set(data)?;
                Ok(())
            }
            VersionSelection::Unapproved => {
                self.unapproved
                    .set(ValidData::new(data.interval, Some(data.value)))?;
                Ok(())
            }
            VersionSelection::At(version) => Err(VersionError::ReadOnlyVersion(version)),
        }
    }

    /// Remove whatever is authoritative over `interval` under `selection`.
    ///
    /// Mirrors [`set`][Self::set]'s immediacy: a `Current` removal takes
    /// effect right away and clears any staged overlay in that region; an
    /// `Unapproved` removal stages a removal marker that only shows up under
    /// `read(VersionSelection::Unapproved)` until approved.
    ///
    /// # Errors
    /// [`VersionError::ReadOnlyVersion`] under `VersionSelection::At`.
    pub fn remove(&mut self, interval: &IntervalN<D>, selection: VersionSelection) -> Result<()> {
        match selection {
            VersionSelection::Current => {
                self.unapproved.remove(interval)?;
                self.current.remove(interval)?;
                Ok(())
            }
            VersionSelection::Unapproved => {
                self.unapproved.set(ValidData::new(interval.clone(), None))?;
                Ok(())
            }
            VersionSelection::At(version) => Err(VersionError::ReadOnlyVersion(version)),
        }
    }

    /// Read the overlay as of `selection`, without mutating it.
    ///
    /// # Errors
    /// [`VersionError::VersionOutOfRange`] if `selection` names a version
    /// outside the retained history.
    pub fn read(&self, selection: VersionSelection) -> Result<DimensionalStore<V, D>> {
        match selection {
            VersionSelection::Current => Ok(self.current.clone()),
            VersionSelection::Unapproved => {
                let mut preview = self.current.clone();
                for entry in self.unapproved.iter() {
                    match &entry.value {
                        Some(v) => preview.set(ValidData::new(entry.interval.clone(), v.clone()))?,
                        None => preview.remove(&entry.interval)?,
                    }
                }
                Ok(preview)
            }
            VersionSelection::At(version) => {
                if version == self.current_version {
                    return Ok(self.current.clone());
                }
                self.snapshots
                    .get(&version)
                    .cloned()
                    .ok_or_else(|| self.out_of_range(version))
            }
        }
    }

    fn out_of_range(&self, requested: i32) -> VersionError {
        VersionError::VersionOutOfRange {
            requested,
            oldest: self.oldest_retained_version(),
            current: self.current_version,
        }
    }

    fn next_version(&self) -> Result<i32> {
        self.current_version
            .checked_add(1)
            .ok_or(VersionError::VersionExhausted(self.current_version))
    }

    /// Promote the unique staged write whose region and value exactly match
    /// `data`, writing it into [`current`][Self::current]. Returns `None` if
    /// no such entry is staged — in particular, approving `data` twice in a
    /// row returns `None` the second time, since the first call already
    /// consumed the match (P10).
    ///
    /// This only matches staged *writes*; staged removals are promoted in
    /// bulk by [`approve_all`][Self::approve_all].
    ///
    /// # Errors
    /// Propagates any [`caliper_store::StoreError`] raised while writing into
    /// `current`.
    pub fn approve(&mut self, data: ValidData<V, D>) -> Result<Option<()>> {
        let span = debug_span!("approve", version = self.current_version).entered();
        let matched = self.unapproved.iter().find_map(|entry| {
            (entry.interval == data.interval && entry.value.as_ref() == Some(&data.value))
                .then(|| entry.interval.clone())
        });

        let Some(matched) = matched else {
            debug!("no staged write matches");
            drop(span);
            return Ok(None);
        };

        self.unapproved.remove(&matched)?;
        self.current.set(data)?;
        debug!(?matched, "approved staged write");
        drop(span);
        Ok(Some(()))
    }

    /// Promote every staged write intersecting `interval` into
    /// [`current`][Self::current], then materialize every staged removal
    /// intersecting `interval` against `current` as well.
    ///
    /// # Errors
    /// Propagates any [`caliper_store::StoreError`] raised while applying
    /// the promotions.
    pub fn approve_all(&mut self, interval: &IntervalN<D>) -> Result<()> {
        let span = debug_span!("approve_all", version = self.current_version).entered();
        let hits = self.unapproved.get_intersecting(interval);

        let mut promoted = 0usize;
        for hit in &hits {
            if let Some(value) = &hit.value {
                self.current
                    .set(ValidData::new(hit.interval.clone(), value.clone()))?;
                self.unapproved.remove(&hit.interval)?;
                promoted += 1;
            }
        }
        for hit in &hits {
            if hit.value.is_none() {
                self.current.remove(&hit.interval)?;
                self.unapproved.remove(&hit.interval)?;
                promoted += 1;
            }
        }
        debug!(promoted, "approved all staged entries in range");
        drop(span);
        Ok(())
    }

    /// Mint a new version with no content change: freeze the outgoing
    /// version's content into a retained snapshot and advance the clock.
    ///
    /// # Errors
    /// [`VersionError::VersionExhausted`] if the version counter would
    /// overflow.
    pub fn increment_current_version(&mut self) -> Result<()> {
        let next = self.next_version()?;
        self.snapshots.insert(self.current_version, self.current.clone());
        self.version_timestamps.insert(next, self.clock.now());
        self.current_version = next;
        Ok(())
    }

    /// Force the version counter forward to `version`, freezing the
    /// outgoing version's content under its own number. Never moves it
    /// backward; use [`reset_to_version`][Self::reset_to_version] for that.
    ///
    /// # Errors
    /// [`VersionError::VersionOutOfRange`] if `version <= current_version`.
    pub fn set_current_version(&mut self, version: i32) -> Result<()> {
        if version <= self.current_version {
            return Err(self.out_of_range(version));
        }
        self.snapshots.insert(self.current_version, self.current.clone());
        self.version_timestamps.insert(version, self.clock.now());
        self.current_version = version;
        Ok(())
    }

    /// Roll back to exactly the state as of `version`, discarding every
    /// later version's history and every staged write or removal.
    ///
    /// # Errors
    /// [`VersionError::VersionOutOfRange`] if `version` is not retained.
    pub fn reset_to_version(&mut self, version: i32) -> Result<()> {
        let snapshot = if version == self.current_version {
            self.current.clone()
        } else {
            self.snapshots
                .get(&version)
                .cloned()
                .ok_or_else(|| self.out_of_range(version))?
        };
        self.snapshots.retain(|&v, _| v <= version);
        self.version_timestamps.retain(|&v, _| v <= version);
        self.notes.retain(|&v, _| v <= version);
        self.current = snapshot;
        self.current_version = version;
        self.unapproved = DimensionalStore::new(self.config);
        Ok(())
    }

    /// Drop retained snapshots/timestamps/notes strictly before `keep_from`,
    /// shrinking memory use without changing the current state. `keep_from`
    /// itself and every later version remain queryable.
    pub fn collapse_version_history(&mut self, keep_from: i32) {
        self.snapshots.retain(|&v, _| v >= keep_from);
        self.version_timestamps.retain(|&v, _| v >= keep_from);
        self.notes.retain(|&v, _| v >= keep_from);
    }

    /// The timestamp (seconds since the Unix epoch) a version was recorded
    /// at, if still retained.
    pub fn version_timestamp(&self, version: i32) -> Option<i64> {
        self.version_timestamps.get(&version).copied()
    }

    /// A free-text annotation attached to a version, if any.
    pub fn note(&self, version: i32) -> Option<&str> {
        self.notes.get(&version).map(String::as_str)
    }

    /// Attach or replace a free-text annotation on a version.
    pub fn set_note(&mut self, version: i32, note: String) {
        self.notes.insert(version, note);
    }

    /// The oldest version number still retained in history.
    pub fn oldest_retained_version(&self) -> i32 {
        self.snapshots
            .keys()
            .next()
            .copied()
            .unwrap_or(self.current_version)
    }
}
