//! [`DimensionalStore`]: the core container.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use caliper_boxtree::{BoxGeom, BoxTree, Coordinate};
use caliper_domain::{DomainError, DomainN, DomainValue, Interval1D, IntervalN};
use tracing::{debug, debug_span};

use crate::config::StoreConfig;
use crate::diff::DiffAction;
use crate::error::{Result, StoreError};
use crate::valid_data::ValidData;

fn interval_to_box<D: DomainValue>(interval: &IntervalN<D>) -> BoxGeom {
    let min: Vec<f64> = interval.axes().iter().map(|iv| iv.start.ordered_hash()).collect();
    let max: Vec<f64> = interval.axes().iter().map(|iv| iv.end.ordered_hash()).collect();
    BoxGeom::new(Coordinate::new(min), Coordinate::new(max))
        .expect("interval axes share one arity by construction")
}

/// Subtract every interval in `subtrahends` from `piece`, returning whatever
/// remains. Used by `fill`, `domain_complement`, `zip_all` and `merge` to
/// compute the sub-intervals of a region not covered by some other set.
fn subtract_all<D: DomainValue>(piece: &IntervalN<D>, subtrahends: &[IntervalN<D>]) -> Vec<IntervalN<D>> {
    let mut pieces = vec![piece.clone()];
    for sub in subtrahends {
        let mut next = Vec::new();
        for p in pieces {
            if p.intersects(sub).unwrap_or(false) {
                let (kept, _excluded) = p.remainder(sub).expect("arity checked by caller");
                next.extend(kept);
            } else {
                next.push(p);
            }
        }
        pieces = next;
    }
    pieces
}

/// The axis along which `a` and `b` are adjacent while identical on every
/// other axis, if such an axis exists. Two entries are mergeable in
/// [`DimensionalStore::compress`] exactly when this returns `Some`.
fn mergeable_axis<D: DomainValue>(a: &IntervalN<D>, b: &IntervalN<D>) -> Option<usize> {
    if a.arity() != b.arity() {
        return None;
    }
    let mut differing = None;
    for k in 0..a.arity() {
        let (ak, bk) = (&a.axes()[k], &b.axes()[k]);
        if ak == bk {
            continue;
        }
        if differing.is_some() {
            return None;
        }
        if !ak.adjacent_to(bk) {
            return None;
        }
        differing = Some(k);
    }
    differing
}

fn merge_on_axis<D: DomainValue>(a: &IntervalN<D>, b: &IntervalN<D>, axis: usize) -> IntervalN<D> {
    let mut axes = a.axes().to_vec();
    axes[axis] = a.axes()[axis]
        .union_if_adjacent(&b.axes()[axis])
        .expect("adjacency already confirmed by mergeable_axis");
    IntervalN::new(axes)
}

fn cartesian_atoms<D: Clone>(
    axes: &[Vec<Interval1D<D>>],
    combo: &mut Vec<Interval1D<D>>,
    visit: &mut dyn FnMut(&[Interval1D<D>]),
) {
    if combo.len() == axes.len() {
        visit(combo);
        return;
    }
    let idx = combo.len();
    for atom in &axes[idx] {
        combo.push(atom.clone());
        cartesian_atoms(axes, combo, visit);
        combo.pop();
    }
}

/// The core engine: an ordered map by interval start, a multimap by value,
/// and a spatial index, maintained in lockstep so that all three always
/// agree on the set of stored entries.
#[derive(Clone)]
pub struct DimensionalStore<V, D> {
    config: StoreConfig,
    arity: Option<usize>,
    by_start: BTreeMap<DomainN<D>, ValidData<V, D>>,
    by_value: BTreeMap<V, BTreeSet<DomainN<D>>>,
    search_tree: Option<BoxTree<DomainN<D>>>,
}

impl<V, D> DimensionalStore<V, D>
where
    V: Clone + Eq + Ord + Debug,
    D: DomainValue,
{
    /// Build an empty store with the given configuration.
    pub fn new(config: StoreConfig) -> Self {
        let search_tree = if config.no_search_tree {
            None
        } else {
            Some(BoxTree::with_config(config.box_tree_config()))
        };
        Self {
            config,
            arity: None,
            by_start: BTreeMap::new(),
            by_value: BTreeMap::new(),
            search_tree,
        }
    }

    /// Build an empty store with [`StoreConfig::default`].
    pub fn with_default_config() -> Self {
        Self::new(StoreConfig::default())
    }

    /// Build a store from raw entries, skipping the usual
    /// set/update_or_remove bookkeeping.
    ///
    /// # Errors
    /// [`StoreError::NonDisjointInput`] if `config.require_disjoint` is set
    /// and any two entries overlap.
    pub fn from_entries(config: StoreConfig, entries: Vec<ValidData<V, D>>) -> Result<Self> {
        let mut store = Self::new(config);
        if config.require_disjoint {
            for i in 0..entries.len() {
                for j in (i + 1)..entries.len() {
                    if entries[i].interval.intersects(&entries[j].interval)? {
                        return Err(StoreError::NonDisjointInput);
                    }
                }
            }
        }
        for data in entries {
            store.ensure_arity(&data.interval)?;
            store.insert_entry(data);
        }
        store.compress_all();
        Ok(store)
    }

    fn ensure_arity(&mut self, interval: &IntervalN<D>) -> Result<()> {
        match self.arity {
            None => {
                self.arity = Some(interval.arity());
                Ok(())
            }
            Some(a) if a == interval.arity() => Ok(()),
            Some(a) => Err(StoreError::InvalidBoundary(DomainError::InvalidBoundary(
                format!("store has arity {a}, entry has arity {}", interval.arity()),
            ))),
        }
    }

    fn insert_entry(&mut self, data: ValidData<V, D>) {
        let key = data.interval.start();
        if let Some(tree) = &mut self.search_tree {
            let aabb = interval_to_box(&data.interval);
            tree.insert(aabb, key.clone())
                .expect("arity already checked by ensure_arity");
        }
        self.by_value
            .entry(data.value.clone())
            .or_default()
            .insert(key.clone());
        self.by_start.insert(key, data);
    }

    fn remove_entry(&mut self, key: &DomainN<D>) -> Option<ValidData<V, D>> {
        let data = self.by_start.remove(key)?;
        if let Some(tree) = &mut self.search_tree {
            let aabb = interval_to_box(&data.interval);
            let _ = tree.remove(&aabb, key);
        }
        if let Some(set) = self.by_value.get_mut(&data.value) {
            set.remove(key);
            if set.is_empty() {
                self.by_value.remove(&data.value);
            }
        }
        Some(data)
    }

    fn candidate_keys(&self, target: &IntervalN<D>) -> BTreeSet<DomainN<D>> {
        match &self.search_tree {
            Some(tree) => {
                let aabb = interval_to_box(target);
                tree.query(&aabb)
                    .expect("arity already checked by caller")
                    .into_iter()
                    .collect()
            }
            None => self.by_start.keys().cloned().collect(),
        }
    }

    /// A value if some stored interval contains `point`. At most one can, by
    /// disjointness.
    pub fn get_at(&self, point: &DomainN<D>) -> Option<V> {
        if let Some(arity) = self.arity {
            if arity != point.arity() {
                return None;
            }
        }
        let aabb_point: IntervalN<D> = IntervalN::new(
            point
                .axes()
                .iter()
                .map(|cut| Interval1D::from_cuts(cut.clone(), cut.clone()))
                .collect(),
        );
        for key in self.candidate_keys(&aabb_point) {
            if let Some(data) = self.by_start.get(&key) {
                if data.interval.contains(point).unwrap_or(false) {
                    return Some(data.value.clone());
                }
            }
        }
        None
    }

    /// Stored entries whose interval intersects `target`, deduplicated.
    pub fn get_intersecting(&self, target: &IntervalN<D>) -> Vec<ValidData<V, D>> {
        self.candidate_keys(target)
            .into_iter()
            .filter_map(|key| self.by_start.get(&key).cloned())
            .filter(|data| data.interval.intersects(target).unwrap_or(false))
            .collect()
    }

    /// A compressed cover of all stored intervals.
    pub fn domain(&self) -> Vec<IntervalN<D>> {
        self.by_start.values().map(|d| d.interval.clone()).collect()
    }

    /// The disjoint pieces of the universe not covered by [`domain`][Self::domain].
    pub fn domain_complement(&self) -> Vec<IntervalN<D>> {
        let arity = match self.arity {
            Some(a) => a,
            None => return Vec::new(),
        };
        let universe = IntervalN::new(vec![Interval1D::unbounded(); arity]);
        let stored: Vec<IntervalN<D>> = self.domain();
        subtract_all(&universe, &stored)
    }

    /// Intervals currently holding value `v`.
    pub fn intervals(&self, v: &V) -> Vec<IntervalN<D>> {
        self.by_value
            .get(v)
            .map(|keys| keys.iter().map(|k| self.by_start[k].interval.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    /// Iterate stored entries in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidData<V, D>> {
        self.by_start.values()
    }

    /// The central mutation primitive: for every stored entry overlapping
    /// `target`, carve out the overlap, keep the remainder under the old
    /// value, and replace the overlap with `f(old_value)` (dropping it if
    /// `f` returns `None`). Total: this never fails once arity matches.
    pub fn update_or_remove(
        &mut self,
        target: &IntervalN<D>,
        f: impl Fn(&V) -> Option<V>,
    ) -> Result<()> {
        self.ensure_arity(target)?;
        let span = debug_span!("update_or_remove", arity = target.arity()).entered();

        let overlapping = self.get_intersecting(target);
        debug!(overlapping = overlapping.len(), "candidates to carve");
        let mut touched: BTreeSet<V> = BTreeSet::new();

        for data in overlapping {
            let key = data.interval.start();
            self.remove_entry(&key);

            let (kept, excluded) = data
                .interval
                .remainder(target)
                .expect("arity already matches target");
            for piece in kept {
                self.insert_entry(ValidData::new(piece, data.value.clone()));
            }
            if let Some(excluded) = excluded {
                touched.insert(data.value.clone());
                if let Some(new_value) = f(&data.value) {
                    touched.insert(new_value.clone());
                    self.insert_entry(ValidData::new(excluded, new_value));
                }
            }
        }

        for v in touched {
            self.compress(&v);
        }
        drop(span);
        Ok(())
    }

    /// Make `data.interval` authoritative over its region, overwriting
    /// anything previously stored there.
    pub fn set(&mut self, data: ValidData<V, D>) -> Result<()> {
        self.ensure_arity(&data.interval)?;
        self.update_or_remove(&data.interval, |_| None)?;
        let value = data.value.clone();
        self.insert_entry(data);
        self.compress(&value);
        Ok(())
    }

    /// Fold [`set`][Self::set] over `xs`, later entries overriding earlier.
    pub fn set_many(&mut self, xs: impl IntoIterator<Item = ValidData<V, D>>) -> Result<()> {
        for data in xs {
            self.set(data)?;
        }
        Ok(())
    }

    /// Insert `data` only if its interval does not intersect any existing
    /// entry; returns whether the insert happened.
    pub fn set_if_no_conflict(&mut self, data: ValidData<V, D>) -> Result<bool> {
        self.ensure_arity(&data.interval)?;
        if !self.get_intersecting(&data.interval).is_empty() {
            return Ok(false);
        }
        let value = data.value.clone();
        self.insert_entry(data);
        self.compress(&value);
        Ok(true)
    }

    /// For every stored entry intersecting `data.interval`, replace the
    /// intersection with `data.value`; the carved-off remainder keeps its
    /// original value.
    pub fn update(&mut self, data: ValidData<V, D>) -> Result<()> {
        self.ensure_arity(&data.interval)?;
        let value = data.value;
        self.update_or_remove(&data.interval, move |_| Some(value.clone()))
    }

    /// Remove every point of `interval` from the store.
    pub fn remove(&mut self, interval: &IntervalN<D>) -> Result<()> {
        self.update_or_remove(interval, |_| None)
    }

    /// Fold [`remove`][Self::remove] over `xs`.
    pub fn remove_many<'a>(&mut self, xs: impl IntoIterator<Item = &'a IntervalN<D>>) -> Result<()>
    where
        D: 'a,
    {
        for interval in xs {
            self.remove(interval)?;
        }
        Ok(())
    }

    /// Remove every interval currently mapped to `v`.
    pub fn remove_value(&mut self, v: &V) {
        let keys: Vec<DomainN<D>> = self
            .by_value
            .get(v)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        for key in keys {
            self.remove_entry(&key);
        }
    }

    /// Remove `old`, then add `new` as authoritative over its region.
    pub fn replace(&mut self, old: &IntervalN<D>, new: ValidData<V, D>) -> Result<()> {
        self.remove(old)?;
        self.set(new)
    }

    /// Replace the unique entry starting at `start`.
    ///
    /// # Errors
    /// [`StoreError::KeyNotFound`] if no entry starts there.
    pub fn replace_by_key(&mut self, start: &DomainN<D>, new: ValidData<V, D>) -> Result<()> {
        let old = self
            .by_start
            .get(start)
            .cloned()
            .ok_or(StoreError::KeyNotFound)?;
        self.replace(&old.interval, new)
    }

    /// Add `data.value` over every sub-interval of `data.interval` not
    /// already covered by some stored entry.
    pub fn fill(&mut self, data: ValidData<V, D>) -> Result<()> {
        self.ensure_arity(&data.interval)?;
        let covering: Vec<IntervalN<D>> = self
            .get_intersecting(&data.interval)
            .into_iter()
            .map(|d| d.interval)
            .collect();
        let value = data.value;
        for piece in subtract_all(&data.interval, &covering) {
            self.insert_entry(ValidData::new(piece, value.clone()));
        }
        self.compress(&value);
        Ok(())
    }

    /// Merge all value-equal entries adjacent along a single axis while
    /// equal on all others, iterating to a fixpoint.
    pub fn compress(&mut self, v: &V) {
        loop {
            let keys: Vec<DomainN<D>> = match self.by_value.get(v) {
                Some(set) if set.len() > 1 => set.iter().cloned().collect(),
                _ => return,
            };

            let mut merged = false;
            'search: for i in 0..keys.len() {
                for j in (i + 1)..keys.len() {
                    let a = &self.by_start[&keys[i]].interval;
                    let b = &self.by_start[&keys[j]].interval;
                    if let Some(axis) = mergeable_axis(a, b) {
                        let merged_interval = merge_on_axis(a, b, axis);
                        self.remove_entry(&keys[i]);
                        self.remove_entry(&keys[j]);
                        self.insert_entry(ValidData::new(merged_interval, v.clone()));
                        merged = true;
                        break 'search;
                    }
                }
            }
            if !merged {
                return;
            }
        }
    }

    /// [`compress`][Self::compress] every distinct value in the store.
    pub fn compress_all(&mut self) {
        let values: Vec<V> = self.by_value.keys().cloned().collect();
        for v in values {
            self.compress(&v);
        }
    }

    /// Decompress to the unique atomic partition of the cover (intersecting
    /// each stored interval with the grid of all unique per-axis cuts), then
    /// [`compress_all`][Self::compress_all]. Yields a canonical physical
    /// form for stores with the same logical content.
    pub fn recompress_all(&mut self) {
        let span = debug_span!("recompress_all").entered();
        let arity = match self.arity {
            Some(a) => a,
            None => return,
        };
        let entries: Vec<ValidData<V, D>> = self.by_start.values().cloned().collect();
        if entries.is_empty() {
            return;
        }

        let mut cuts: Vec<Vec<_>> = vec![Vec::new(); arity];
        for e in &entries {
            for (k, iv) in e.interval.axes().iter().enumerate() {
                cuts[k].push(iv.start.clone());
                cuts[k].push(iv.end.clone());
            }
        }
        for axis_cuts in &mut cuts {
            axis_cuts.sort();
            axis_cuts.dedup();
        }

        let atoms: Vec<Vec<Interval1D<D>>> = cuts
            .iter()
            .map(|c| {
                c.windows(2)
                    .map(|w| Interval1D::from_cuts(w[0].clone(), w[1].clone()))
                    .filter(|iv| !iv.is_empty())
                    .collect()
            })
            .collect();

        self.by_start.clear();
        self.by_value.clear();
        self.search_tree = if self.config.no_search_tree {
            None
        } else {
            Some(BoxTree::with_config(self.config.box_tree_config()))
        };

        for e in &entries {
            let per_axis_atoms: Vec<Vec<Interval1D<D>>> = (0..arity)
                .map(|k| {
                    atoms[k]
                        .iter()
                        .filter(|atom| atom.intersects(&e.interval.axes()[k]))
                        .cloned()
                        .collect()
                })
                .collect();
            let value = e.value.clone();
            let mut cells = Vec::new();
            let mut combo = Vec::with_capacity(arity);
            cartesian_atoms(&per_axis_atoms, &mut combo, &mut |combo| {
                cells.push(IntervalN::new(combo.to_vec()));
            });
            for cell in cells {
                self.insert_entry(ValidData::new(cell, value.clone()));
            }
        }

        self.compress_all();
        drop(span);
    }

    /// At each sub-interval of the common refinement of both stores where
    /// both have a value, emit `(v, v2)`.
    pub fn zip<V2>(&self, other: &DimensionalStore<V2, D>) -> DimensionalStore<(V, V2), D>
    where
        V2: Clone + Eq + Ord + Debug,
    {
        let mut result = DimensionalStore::new(self.config);
        for a in self.by_start.values() {
            for b in other.get_intersecting(&a.interval) {
                if let Ok(Some(overlap)) = a.interval.intersection(&b.interval) {
                    let _ = result.set(ValidData::new(overlap, (a.value.clone(), b.value.clone())));
                }
            }
        }
        result
    }

    /// Like [`zip`][Self::zip], but uses defaults where either side is
    /// absent, as long as at least one side is present.
    pub fn zip_all<V2>(
        &self,
        other: &DimensionalStore<V2, D>,
        this_default: V,
        that_default: V2,
    ) -> DimensionalStore<(V, V2), D>
    where
        V2: Clone + Eq + Ord + Debug,
    {
        let mut result = self.zip(other);
        for a in self.by_start.values() {
            let overlapping: Vec<IntervalN<D>> = other
                .get_intersecting(&a.interval)
                .into_iter()
                .map(|d| d.interval)
                .collect();
            for piece in subtract_all(&a.interval, &overlapping) {
                let _ = result.set(ValidData::new(piece, (a.value.clone(), that_default.clone())));
            }
        }
        for b in other.iter() {
            let overlapping: Vec<IntervalN<D>> = self
                .get_intersecting(&b.interval)
                .into_iter()
                .map(|d| d.interval)
                .collect();
            for piece in subtract_all(&b.interval, &overlapping) {
                let _ = result.set(ValidData::new(piece, (this_default.clone(), b.value.clone())));
            }
        }
        result
    }

    /// Union cover: where `self` and `other` overlap, resolve with
    /// `f(v_self, v_other)`; elsewhere the covering side's value is taken
    /// verbatim.
    pub fn merge(&self, other: &DimensionalStore<V, D>, f: impl Fn(&V, &V) -> V) -> DimensionalStore<V, D> {
        let mut result = DimensionalStore::new(self.config);
        for a in self.by_start.values() {
            let overlapping = other.get_intersecting(&a.interval);
            for b in &overlapping {
                if let Ok(Some(overlap)) = a.interval.intersection(&b.interval) {
                    let _ = result.set(ValidData::new(overlap, f(&a.value, &b.value)));
                }
            }
            let subtrahends: Vec<IntervalN<D>> = overlapping.into_iter().map(|d| d.interval).collect();
            for piece in subtract_all(&a.interval, &subtrahends) {
                let _ = result.set(ValidData::new(piece, a.value.clone()));
            }
        }
        for b in other.iter() {
            let overlapping = self.get_intersecting(&b.interval);
            let subtrahends: Vec<IntervalN<D>> = overlapping.into_iter().map(|d| d.interval).collect();
            for piece in subtract_all(&b.interval, &subtrahends) {
                let _ = result.set(ValidData::new(piece, b.value.clone()));
            }
        }
        result
    }

    /// Enumerate the actions that, applied in order to `old`, produce
    /// `self`. Keys are interval starts, emitted in ascending order.
    pub fn diff_actions_from(&self, old: &Self) -> Vec<DiffAction<V, D>> {
        let mut actions = Vec::new();
        let mut self_iter = self.by_start.iter().peekable();
        let mut old_iter = old.by_start.iter().peekable();

        loop {
            match (self_iter.peek(), old_iter.peek()) {
                (None, None) => break,
                (Some(_), None) => {
                    let (_, data) = self_iter.next().unwrap();
                    actions.push(DiffAction::Create(data.clone()));
                }
                (None, Some(_)) => {
                    let (key, _) = old_iter.next().unwrap();
                    actions.push(DiffAction::Delete(key.clone()));
                }
                (Some((sk, _)), Some((ok, _))) => match sk.cmp(ok) {
                    std::cmp::Ordering::Less => {
                        let (_, data) = self_iter.next().unwrap();
                        actions.push(DiffAction::Create(data.clone()));
                    }
                    std::cmp::Ordering::Greater => {
                        let (key, _) = old_iter.next().unwrap();
                        actions.push(DiffAction::Delete(key.clone()));
                    }
                    std::cmp::Ordering::Equal => {
                        let (_, new_data) = self_iter.next().unwrap();
                        let (_, old_data) = old_iter.next().unwrap();
                        if new_data != old_data {
                            actions.push(DiffAction::Update(new_data.clone()));
                        }
                    }
                },
            }
        }
        actions
    }

    /// Replay `actions` in order.
    pub fn apply_diff_actions(&mut self, actions: &[DiffAction<V, D>]) -> Result<()> {
        for action in actions {
            match action {
                DiffAction::Create(data) | DiffAction::Update(data) => {
                    self.set(data.clone())?;
                }
                DiffAction::Delete(key) => {
                    if let Some(data) = self.by_start.get(key).cloned() {
                        self.remove(&data.interval)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// `self.apply_diff_actions(other.diff_actions_from(self))`.
    pub fn sync_with(&mut self, other: &Self) -> Result<()> {
        let actions = other.diff_actions_from(self);
        self.apply_diff_actions(&actions)
    }
}
