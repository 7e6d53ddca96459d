//! # bm-select
//!
//! Event-level selection machinery for babymaker:
//! - [`DedupRegistry`]: at-most-once admission of real-data events
//! - [`TriggerFamily`]: version-suffixed HLT path families
//! - [`match_trigger_class`]: deltaR matching of a lepton to the active
//!   version of a family, with version and prescale resolution
//! - [`PrescaleTable`]: HLT/L1 prescale lookup
//! - [`catalog`]: built-in electron and muon families
//!
//! ## Example
//!
//! ```
//! use bm_core::{EventRecord, LorentzVector, TriggerObject};
//! use bm_select::{NoPrescales, TriggerFamily, TriggerMatcher};
//!
//! let mut ev = EventRecord { run: 1, event: 7, lumi: 3, ..Default::default() };
//! let obj = TriggerObject { p4: LorentzVector::from_pt_eta_phi_m(9.0, 0.1, 0.0, 0.0), pdg_id: 13 };
//! ev.trigger_names.push("HLT_Mu8_v3".into());
//! ev.trigger_objects.insert("HLT_Mu8_v3".into(), vec![obj]);
//!
//! let mu8 = TriggerFamily::new("mu8", r"HLT_Mu8_v(\d+)", 13).unwrap();
//! let lep = LorentzVector::from_pt_eta_phi_m(10.0, 0.0, 0.0, 0.0);
//! let r = TriggerMatcher::default().match_family(&ev, &lep, &mu8, &NoPrescales).unwrap();
//! assert_eq!((r.object_count, r.version), (3, 3));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod dedup;
pub mod matcher;
pub mod pattern;
pub mod prescale;

pub use dedup::{DedupRegistry, SharedDedupRegistry};
pub use matcher::{
    DEFAULT_DELTA_R_CUT, DEFAULT_EXPECTED_PDG, ObjectMatch, TriggerMatcher, active_path,
    match_objects, match_trigger_class,
};
pub use pattern::{TriggerFamily, TriggerFamilySpec, compile_families};
pub use prescale::{NoPrescales, PrescaleTable};
