//! Trigger families: all versions of one logical HLT path.
//!
//! A family is a regular expression with one capturing group around the
//! numeric version suffix, e.g. `HLT_Mu8_v(\d+)` covers `HLT_Mu8_v1`,
//! `HLT_Mu8_v2`, ... Matching is an unanchored search over the path name.

use std::fmt;

use bm_core::{Error, LeptonFlavor, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matcher::DEFAULT_EXPECTED_PDG;

/// One named trigger family.
#[derive(Clone)]
pub struct TriggerFamily {
    name: String,
    pattern: Regex,
    expected_pdg: i32,
    l1_seed: Option<String>,
}

impl TriggerFamily {
    /// Compile a family from its version pattern.
    ///
    /// The pattern must contain at least one capturing group; group 1 is the
    /// version suffix.
    pub fn new(name: impl Into<String>, pattern: &str, expected_pdg: i32) -> Result<Self> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| {
            Error::Validation(format!("trigger family '{name}': invalid pattern: {e}"))
        })?;
        if regex.captures_len() < 2 {
            return Err(Error::Validation(format!(
                "trigger family '{name}': pattern '{pattern}' has no capturing group for the version"
            )));
        }
        Ok(Self { name, pattern: regex, expected_pdg, l1_seed: None })
    }

    /// Set the L1 seed whose prescale is reported alongside matches.
    pub fn with_l1_seed(mut self, seed: impl Into<String>) -> Self {
        self.l1_seed = Some(seed.into());
        self
    }

    /// Family name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source text of the version pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Particle-type code a matched object must carry (absolute value compared).
    pub fn expected_pdg(&self) -> i32 {
        self.expected_pdg
    }

    /// Lepton flavor implied by the expected particle type, if any.
    pub fn flavor(&self) -> Option<LeptonFlavor> {
        LeptonFlavor::from_pdg(self.expected_pdg)
    }

    /// L1 seed name, if configured.
    pub fn l1_seed(&self) -> Option<&str> {
        self.l1_seed.as_deref()
    }

    /// True if `path` belongs to this family.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// Version number encoded in `path`, or -1.
    ///
    /// -1 when the path does not match, when group 1 did not participate,
    /// when its text is not all ASCII digits, or when it overflows `i32`.
    pub fn version_of(&self, path: &str) -> i32 {
        let Some(caps) = self.pattern.captures(path) else {
            return -1;
        };
        let Some(text) = caps.get(1).map(|m| m.as_str()) else {
            return -1;
        };
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return -1;
        }
        text.parse().unwrap_or(-1)
    }

    /// Serializable description of this family.
    pub fn to_spec(&self) -> TriggerFamilySpec {
        TriggerFamilySpec {
            name: self.name.clone(),
            pattern: self.pattern.as_str().to_string(),
            expected_pdg: self.expected_pdg,
            l1_seed: self.l1_seed.clone(),
        }
    }
}

impl fmt::Debug for TriggerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerFamily")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("expected_pdg", &self.expected_pdg)
            .field("l1_seed", &self.l1_seed)
            .finish()
    }
}

/// Configuration form of a [`TriggerFamily`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerFamilySpec {
    /// Family name (used as the output key).
    pub name: String,
    /// Version pattern with one capturing group.
    pub pattern: String,
    /// Particle-type code for identity confirmation.
    #[serde(default = "default_expected_pdg")]
    pub expected_pdg: i32,
    /// L1 seed for L1 prescale lookup.
    #[serde(default)]
    pub l1_seed: Option<String>,
}

fn default_expected_pdg() -> i32 {
    DEFAULT_EXPECTED_PDG
}

impl TriggerFamilySpec {
    /// Compile into a [`TriggerFamily`].
    pub fn compile(&self) -> Result<TriggerFamily> {
        let family = TriggerFamily::new(&self.name, &self.pattern, self.expected_pdg)?;
        Ok(match &self.l1_seed {
            Some(seed) => family.with_l1_seed(seed),
            None => family,
        })
    }
}

/// Compile a list of family specs, rejecting duplicate names.
pub fn compile_families(specs: &[TriggerFamilySpec]) -> Result<Vec<TriggerFamily>> {
    let mut out: Vec<TriggerFamily> = Vec::with_capacity(specs.len());
    for spec in specs {
        if out.iter().any(|f| f.name() == spec.name) {
            return Err(Error::Validation(format!("duplicate trigger family name '{}'", spec.name)));
        }
        out.push(spec.compile()?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_from_suffix() {
        let fam = TriggerFamily::new("isomu24_eta2p1", r"HLT_IsoMu24_eta2p1_v(\d+)", 13).unwrap();
        assert!(fam.matches("HLT_IsoMu24_eta2p1_v5"));
        assert_eq!(fam.version_of("HLT_IsoMu24_eta2p1_v5"), 5);
        assert_eq!(fam.version_of("HLT_IsoMu24_eta2p1_v12"), 12);
        assert_eq!(fam.flavor(), Some(LeptonFlavor::Muon));
    }

    #[test]
    fn non_matching_path_has_no_version() {
        let fam = TriggerFamily::new("mu8", r"HLT_Mu8_v(\d+)", 13).unwrap();
        assert!(!fam.matches("HLT_Mu8_Jet40_v3"));
        assert_eq!(fam.version_of("HLT_Mu8_Jet40_v3"), -1);
        assert!(!fam.matches("HLT_Mu17_v3"));
    }

    #[test]
    fn non_numeric_capture_is_minus_one() {
        let fam = TriggerFamily::new("ele8", r"HLT_Ele8_v(\w+)", 11).unwrap();
        assert!(fam.matches("HLT_Ele8_vX2"));
        assert_eq!(fam.version_of("HLT_Ele8_vX2"), -1);
        assert_eq!(fam.version_of("HLT_Ele8_v2"), 2);
    }

    #[test]
    fn optional_group_not_participating_is_minus_one() {
        let fam = TriggerFamily::new("ele8", r"HLT_Ele8(?:_v(\d+))?$", 11).unwrap();
        assert!(fam.matches("HLT_Ele8"));
        assert_eq!(fam.version_of("HLT_Ele8"), -1);
    }

    #[test]
    fn overflowing_version_is_minus_one() {
        let fam = TriggerFamily::new("mu5", r"HLT_Mu5_v(\d+)", 13).unwrap();
        assert_eq!(fam.version_of("HLT_Mu5_v99999999999"), -1);
    }

    #[test]
    fn pattern_without_group_is_rejected() {
        let err = TriggerFamily::new("mu5", r"HLT_Mu5_v\d+", 13).unwrap_err();
        assert!(err.to_string().contains("no capturing group"), "{err}");
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let err = TriggerFamily::new("bad", r"HLT_Mu5_v(\d+", 13).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn spec_defaults_and_round_trip() {
        let spec: TriggerFamilySpec =
            serde_json::from_str(r#"{"name": "ele27_wp80", "pattern": "HLT_Ele27_WP80_v(\\d+)"}"#)
                .unwrap();
        assert_eq!(spec.expected_pdg, 11);
        assert_eq!(spec.l1_seed, None);
        let fam = spec.compile().unwrap().with_l1_seed("L1_SingleEG20");
        assert_eq!(fam.l1_seed(), Some("L1_SingleEG20"));
        assert_eq!(fam.to_spec().pattern, spec.pattern);
    }

    #[test]
    fn duplicate_family_names_are_rejected() {
        let spec = TriggerFamilySpec {
            name: "mu8".into(),
            pattern: r"HLT_Mu8_v(\d+)".into(),
            expected_pdg: 13,
            l1_seed: None,
        };
        let err = compile_families(&[spec.clone(), spec]).unwrap_err();
        assert!(err.to_string().contains("duplicate trigger family name 'mu8'"), "{err}");
    }
}
