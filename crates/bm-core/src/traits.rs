//! Collaborator traits for babymaker
//!
//! The event-data source and the prescale tables are supplied from outside
//! the selection code; these traits are the seams they plug into.

use crate::types::{EventIdentifier, TriggerObject};

/// Per-event trigger information exposed by an event-data source.
pub trait TriggerEvent {
    /// Identifier of the currently loaded event.
    fn id(&self) -> EventIdentifier;

    /// Names of the trigger paths that fired, in source order.
    fn fired_paths(&self) -> &[String];

    /// HLT objects recorded for `path`; empty if the path has none.
    fn trigger_objects(&self, path: &str) -> &[TriggerObject];
}

/// Prescale factors by trigger name.
pub trait PrescaleLookup {
    /// HLT prescale of a full path name (e.g. `HLT_Mu8_v3`), -1 if unknown.
    fn hlt_prescale(&self, path: &str) -> i32;

    /// L1 prescale of a seed name (e.g. `L1_SingleMu3`), -1 if unknown.
    fn l1_prescale(&self, seed: &str) -> i32;
}

impl<T: PrescaleLookup + ?Sized> PrescaleLookup for &T {
    fn hlt_prescale(&self, path: &str) -> i32 {
        (**self).hlt_prescale(path)
    }

    fn l1_prescale(&self, seed: &str) -> i32 {
        (**self).l1_prescale(seed)
    }
}
