//! Common data types for babymaker

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::kinematics::LorentzVector;
use crate::traits::TriggerEvent;

/// Identifier of one collision event.
///
/// Equality (and hashing) compare `(run, event)` only. `lumi_section` takes
/// part in [`EventIdentifier::ordering_key`] but two identifiers that differ
/// only in lumi section are equal: the same `(run, event)` seen in another
/// lumi section is still the same collision for duplicate detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EventIdentifier {
    /// Run number
    pub run: u64,
    /// Event number within the run
    pub event: u64,
    /// Luminosity section
    pub lumi_section: u64,
}

impl EventIdentifier {
    /// Create a new identifier.
    pub fn new(run: u64, event: u64, lumi_section: u64) -> Self {
        Self { run, event, lumi_section }
    }

    /// Lexicographic `(run, event, lumi_section)` sort key.
    pub fn ordering_key(&self) -> (u64, u64, u64) {
        (self.run, self.event, self.lumi_section)
    }

    /// The `(run, event)` pair equality is defined on.
    pub fn equality_key(&self) -> (u64, u64) {
        (self.run, self.event)
    }
}

impl PartialEq for EventIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.equality_key() == other.equality_key()
    }
}

impl Eq for EventIdentifier {}

impl Hash for EventIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.equality_key().hash(state);
    }
}

impl fmt::Display for EventIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.run, self.lumi_section, self.event)
    }
}

/// One HLT object recorded for a trigger path.
///
/// The object's index is its position in the per-path list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerObject {
    /// Online four-momentum
    pub p4: LorentzVector,
    /// Particle-type code (PDG id; sign carries charge)
    pub pdg_id: i32,
}

/// Quality of a lepton ↔ trigger-object match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    /// No path of the family fired, or the fired path recorded no objects.
    NotFound = 0,
    /// Path fired but no object within the deltaR cut.
    FiredNoObject = 1,
    /// Object within the cut, particle type not confirmed.
    Matched = 2,
    /// Object within the cut with the expected particle type.
    MatchedWithId = 3,
}

impl MatchQuality {
    /// Integer code stored in [`TriggerMatchResult::object_count`].
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Inverse of [`MatchQuality::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::NotFound),
            1 => Some(Self::FiredNoObject),
            2 => Some(Self::Matched),
            3 => Some(Self::MatchedWithId),
            _ => None,
        }
    }
}

/// Outcome of matching one lepton against one trigger family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerMatchResult {
    /// Match quality code (see [`MatchQuality`])
    pub object_count: i32,
    /// Closest deltaR over all objects examined (99.0 if none)
    pub delta_r_min: f64,
    /// Version parsed from the fired path name, -1 if unknown
    pub version: i32,
    /// HLT prescale of the fired path, -1 if unavailable
    pub hlt_prescale: i32,
    /// L1 prescale of the family's seed, -1 if unavailable
    pub l1_prescale: i32,
}

impl TriggerMatchResult {
    /// deltaR reported when nothing was examined.
    pub const NO_DELTA_R: f64 = 99.0;

    /// Result for a family with no fired path in the event.
    pub fn not_found() -> Self {
        Self {
            object_count: MatchQuality::NotFound.code(),
            delta_r_min: Self::NO_DELTA_R,
            version: -1,
            hlt_prescale: -1,
            l1_prescale: -1,
        }
    }

    /// Match quality, if `object_count` holds a known code.
    pub fn quality(&self) -> Option<MatchQuality> {
        MatchQuality::from_code(self.object_count)
    }

    /// Copy with the L1 prescale filled in.
    pub fn with_l1_prescale(mut self, l1_prescale: i32) -> Self {
        self.l1_prescale = l1_prescale;
        self
    }
}

impl Default for TriggerMatchResult {
    fn default() -> Self {
        Self::not_found()
    }
}

/// Lepton flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeptonFlavor {
    /// Electron (PDG 11)
    Electron,
    /// Muon (PDG 13)
    Muon,
}

impl LeptonFlavor {
    /// Unsigned PDG code.
    pub fn pdg_code(self) -> i32 {
        match self {
            LeptonFlavor::Electron => 11,
            LeptonFlavor::Muon => 13,
        }
    }

    /// Flavor for an (unsigned or signed) PDG code.
    pub fn from_pdg(code: i32) -> Option<Self> {
        match code.abs() {
            11 => Some(LeptonFlavor::Electron),
            13 => Some(LeptonFlavor::Muon),
            _ => None,
        }
    }
}

impl fmt::Display for LeptonFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeptonFlavor::Electron => f.write_str("electron"),
            LeptonFlavor::Muon => f.write_str("muon"),
        }
    }
}

/// Reconstructed lepton.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lepton {
    /// Four-momentum
    pub p4: LorentzVector,
    /// Electric charge (±1)
    pub charge: i32,
}

/// One event as delivered by an event source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    /// Run number
    pub run: u64,
    /// Event number
    pub event: u64,
    /// Luminosity section
    pub lumi: u64,
    /// Real collision data (as opposed to simulation)
    #[serde(default)]
    pub is_real_data: bool,
    /// Cross-section weight for simulation (per fb⁻¹)
    #[serde(default = "default_scale1fb")]
    pub scale1fb: f64,
    /// Missing transverse energy magnitude
    #[serde(default)]
    pub met: f64,
    /// Missing transverse energy azimuth
    #[serde(default)]
    pub met_phi: f64,
    /// Reconstructed electrons
    #[serde(default)]
    pub electrons: Vec<Lepton>,
    /// Reconstructed muons
    #[serde(default)]
    pub muons: Vec<Lepton>,
    /// Fired trigger path names, in source order
    #[serde(default)]
    pub trigger_names: Vec<String>,
    /// HLT objects per trigger path name
    #[serde(default)]
    pub trigger_objects: HashMap<String, Vec<TriggerObject>>,
}

fn default_scale1fb() -> f64 {
    1.0
}

impl EventRecord {
    /// Leptons of one flavor.
    pub fn leptons(&self, flavor: LeptonFlavor) -> &[Lepton] {
        match flavor {
            LeptonFlavor::Electron => &self.electrons,
            LeptonFlavor::Muon => &self.muons,
        }
    }
}

impl TriggerEvent for EventRecord {
    fn id(&self) -> EventIdentifier {
        EventIdentifier::new(self.run, self.event, self.lumi)
    }

    fn fired_paths(&self) -> &[String] {
        &self.trigger_names
    }

    fn trigger_objects(&self, path: &str) -> &[TriggerObject] {
        self.trigger_objects.get(path).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn identifier_equality_ignores_lumi() {
        let a = EventIdentifier::new(1, 100, 5);
        let b = EventIdentifier::new(1, 100, 6);
        assert_eq!(a, b);
        assert_ne!(a.ordering_key(), b.ordering_key());
        assert!(a.ordering_key() < b.ordering_key());

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn identifier_display_is_run_lumi_event() {
        assert_eq!(EventIdentifier::new(163255, 1042, 7).to_string(), "163255:7:1042");
    }

    #[test]
    fn not_found_sentinel() {
        let r = TriggerMatchResult::not_found();
        assert_eq!(r.object_count, 0);
        assert_eq!(r.delta_r_min, 99.0);
        assert_eq!(r.version, -1);
        assert_eq!(r.hlt_prescale, -1);
        assert_eq!(r.l1_prescale, -1);
        assert_eq!(r.quality(), Some(MatchQuality::NotFound));
    }

    #[test]
    fn quality_codes() {
        for q in [
            MatchQuality::NotFound,
            MatchQuality::FiredNoObject,
            MatchQuality::Matched,
            MatchQuality::MatchedWithId,
        ] {
            assert_eq!(MatchQuality::from_code(q.code()), Some(q));
        }
        assert_eq!(MatchQuality::from_code(4), None);
    }

    #[test]
    fn event_record_defaults_from_minimal_json() {
        let rec: EventRecord =
            serde_json::from_str(r#"{"run": 1, "event": 2, "lumi": 3}"#).unwrap();
        assert_eq!(rec.scale1fb, 1.0);
        assert!(!rec.is_real_data);
        assert!(rec.fired_paths().is_empty());
        assert!(rec.trigger_objects("HLT_Mu8_v1").is_empty());
        assert_eq!(rec.id(), EventIdentifier::new(1, 2, 3));
        assert_eq!(rec.id().lumi_section, 3);
    }

    #[test]
    fn flavor_from_signed_pdg() {
        assert_eq!(LeptonFlavor::from_pdg(-13), Some(LeptonFlavor::Muon));
        assert_eq!(LeptonFlavor::from_pdg(11), Some(LeptonFlavor::Electron));
        assert_eq!(LeptonFlavor::from_pdg(22), None);
    }
}
