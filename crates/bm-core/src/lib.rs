//! # bm-core
//!
//! Core types, traits, and error handling for babymaker.
//!
//! This crate provides:
//! - Common error types
//! - Four-vector kinematics (pt/eta/phi, deltaR, transverse mass)
//! - Event and trigger data structures
//! - Collaborator traits (TriggerEvent, PrescaleLookup)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod kinematics;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use kinematics::{LorentzVector, delta_phi, delta_r, transverse_mass};
pub use traits::{PrescaleLookup, TriggerEvent};
pub use types::{
    EventIdentifier, EventRecord, Lepton, LeptonFlavor, MatchQuality, TriggerMatchResult,
    TriggerObject,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
