//! Duplicate-event detection for real-data scans.
//!
//! Overlapping input files are common in distributed ntuple production, so a
//! scan keeps every `(run, event)` it has admitted and rejects repeats.
//! Simulation has no unique identifiers under this scheme; callers must only
//! consult the registry for real data.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Mutex;

use bm_core::EventIdentifier;

/// Set of admitted event identifiers, owned by one scan.
///
/// Entries are keyed by `(run, event)` in ascending order, the lumi section
/// of the first occurrence is kept alongside. A later identifier with the same
/// `(run, event)` is a duplicate whatever its lumi section.
#[derive(Debug, Default, Clone)]
pub struct DedupRegistry {
    seen: BTreeMap<(u64, u64), u64>,
}

impl DedupRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every admitted identifier.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    /// Admit `id`, returning `true` if an equal identifier was already present.
    ///
    /// The first occurrence of a `(run, event)` pair returns `false` and is
    /// stored; every later one returns `true` and leaves the registry as is.
    pub fn is_duplicate(&mut self, id: &EventIdentifier) -> bool {
        match self.seen.entry(id.equality_key()) {
            Entry::Occupied(_) => true,
            Entry::Vacant(slot) => {
                slot.insert(id.lumi_section);
                false
            }
        }
    }

    /// Whether `id` has been admitted (no insertion).
    pub fn contains(&self, id: &EventIdentifier) -> bool {
        self.seen.contains_key(&id.equality_key())
    }

    /// Number of admitted identifiers.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True if nothing has been admitted since the last reset.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Admitted identifiers in `(run, event, lumi_section)` order.
    pub fn iter(&self) -> impl Iterator<Item = EventIdentifier> + '_ {
        self.seen.iter().map(|(&(run, event), &lumi)| EventIdentifier::new(run, event, lumi))
    }
}

/// [`DedupRegistry`] behind a mutex, for scans that process events in parallel.
///
/// `is_duplicate` holds the lock across the check and the insert.
#[derive(Debug, Default)]
pub struct SharedDedupRegistry {
    inner: Mutex<DedupRegistry>,
}

impl SharedDedupRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every admitted identifier.
    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Atomic admit-or-reject; see [`DedupRegistry::is_duplicate`].
    pub fn is_duplicate(&self, id: &EventIdentifier) -> bool {
        self.lock().is_duplicate(id)
    }

    /// Number of admitted identifiers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been admitted since the last reset.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consume the wrapper, returning the plain registry.
    pub fn into_inner(self) -> DedupRegistry {
        self.inner.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DedupRegistry> {
        // The registry has no invariant a panicking holder could break.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
