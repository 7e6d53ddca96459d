//! Lepton ↔ HLT object matching for one trigger family.

use bm_core::{
    Error, LorentzVector, MatchQuality, PrescaleLookup, Result, TriggerEvent, TriggerMatchResult,
    delta_r,
};

use crate::pattern::TriggerFamily;

/// Default matching radius.
pub const DEFAULT_DELTA_R_CUT: f64 = 0.4;

/// Default particle-type code for identity confirmation (electron).
pub const DEFAULT_EXPECTED_PDG: i32 = 11;

/// Outcome of scanning the objects of a single fired path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectMatch {
    /// Match quality
    pub quality: MatchQuality,
    /// Closest deltaR over every object examined
    pub delta_r_min: f64,
}

/// Match a lepton against the objects of one trigger path.
///
/// `delta_r_min` tracks the closest object regardless of the cut. An object
/// is matched when `dR < dr_cut` (strict); it also confirms identity when
/// `|pdg_id| == |expected_pdg|`. A path with no recorded objects reports
/// [`MatchQuality::NotFound`] and the 99.0 sentinel.
pub fn match_objects(
    event: &impl TriggerEvent,
    path: &str,
    lepton_p4: &LorentzVector,
    expected_pdg: i32,
    dr_cut: f64,
) -> ObjectMatch {
    let objects = event.trigger_objects(path);
    let mut delta_r_min = TriggerMatchResult::NO_DELTA_R;
    if objects.is_empty() {
        return ObjectMatch { quality: MatchQuality::NotFound, delta_r_min };
    }

    let mut matched = false;
    let mut matched_with_id = false;
    for obj in objects {
        let dr = delta_r(lepton_p4, &obj.p4);
        if dr < dr_cut {
            matched = true;
            if obj.pdg_id.abs() == expected_pdg.abs() {
                matched_with_id = true;
            }
        }
        if dr < delta_r_min {
            delta_r_min = dr;
        }
    }

    let quality = if matched_with_id {
        MatchQuality::MatchedWithId
    } else if matched {
        MatchQuality::Matched
    } else {
        MatchQuality::FiredNoObject
    };
    ObjectMatch { quality, delta_r_min }
}

/// The single fired path of `family` in `event`, if any.
///
/// More than one fired path of the same family in one event is a
/// [`Error::TriggerConsistency`].
pub fn active_path<'e>(
    event: &'e impl TriggerEvent,
    family: &TriggerFamily,
) -> Result<Option<&'e str>> {
    let mut fired = event.fired_paths().iter().filter(|p| family.matches(p));
    let Some(path) = fired.next() else {
        return Ok(None);
    };
    if let Some(second) = fired.next() {
        let mut paths = vec![path.clone(), second.clone()];
        paths.extend(fired.cloned());
        return Err(Error::TriggerConsistency {
            family: family.name().to_string(),
            event: event.id(),
            paths,
        });
    }
    Ok(Some(path.as_str()))
}

/// Resolve the active version of `family` in `event` and match the lepton
/// against its HLT objects.
///
/// Returns [`TriggerMatchResult::not_found`] when no fired path belongs to the
/// family. More than one fired path of the same family in one event is a
/// [`Error::TriggerConsistency`]; callers must treat it as fatal for the scan.
///
/// `l1_prescale` is left at -1; see [`TriggerMatcher::match_family`] for the
/// variant that also resolves the family's L1 seed.
pub fn match_trigger_class(
    event: &impl TriggerEvent,
    lepton_p4: &LorentzVector,
    family: &TriggerFamily,
    prescales: &impl PrescaleLookup,
    expected_pdg: i32,
    dr_cut: f64,
) -> Result<TriggerMatchResult> {
    Ok(resolve(event, lepton_p4, family, prescales, expected_pdg, dr_cut)?
        .unwrap_or_else(TriggerMatchResult::not_found))
}

fn resolve(
    event: &impl TriggerEvent,
    lepton_p4: &LorentzVector,
    family: &TriggerFamily,
    prescales: &impl PrescaleLookup,
    expected_pdg: i32,
    dr_cut: f64,
) -> Result<Option<TriggerMatchResult>> {
    let Some(path) = active_path(event, family)? else {
        return Ok(None);
    };

    let objects = match_objects(event, path, lepton_p4, expected_pdg, dr_cut);
    let result = TriggerMatchResult {
        object_count: objects.quality.code(),
        delta_r_min: objects.delta_r_min,
        version: family.version_of(path),
        hlt_prescale: prescales.hlt_prescale(path),
        l1_prescale: -1,
    };
    tracing::trace!(
        family = family.name(),
        path,
        object_count = result.object_count,
        delta_r_min = result.delta_r_min,
        "trigger match"
    );
    Ok(Some(result))
}

/// Matching radius plus family-aware convenience wrappers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerMatcher {
    /// deltaR threshold (strict `<`)
    pub dr_cut: f64,
}

impl Default for TriggerMatcher {
    fn default() -> Self {
        Self { dr_cut: DEFAULT_DELTA_R_CUT }
    }
}

impl TriggerMatcher {
    /// Matcher with a custom radius.
    pub fn new(dr_cut: f64) -> Self {
        Self { dr_cut }
    }

    /// Match using the family's own expected particle type. A family with an
    /// L1 seed always reports that seed's prescale, fired or not.
    pub fn match_family(
        &self,
        event: &impl TriggerEvent,
        lepton_p4: &LorentzVector,
        family: &TriggerFamily,
        prescales: &impl PrescaleLookup,
    ) -> Result<TriggerMatchResult> {
        let result = match_trigger_class(
            event,
            lepton_p4,
            family,
            prescales,
            family.expected_pdg(),
            self.dr_cut,
        )?;
        Ok(match family.l1_seed() {
            Some(seed) => result.with_l1_prescale(prescales.l1_prescale(seed)),
            None => result,
        })
    }
}
