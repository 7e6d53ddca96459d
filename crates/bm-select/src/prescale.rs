//! Prescale tables.

use std::collections::HashMap;
use std::path::Path;

use bm_core::{PrescaleLookup, Result};
use serde::{Deserialize, Serialize};

/// HLT and L1 prescales keyed by trigger name.
///
/// Loaded from JSON or YAML:
///
/// ```yaml
/// hlt:
///   HLT_Mu8_v3: 40
/// l1:
///   L1_SingleMu3: 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescaleTable {
    /// HLT prescale by full path name
    #[serde(default)]
    pub hlt: HashMap<String, i32>,
    /// L1 prescale by seed name
    #[serde(default)]
    pub l1: HashMap<String, i32>,
}

impl PrescaleTable {
    /// Read a table; `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
        let table: PrescaleTable = if ext == "json" {
            serde_json::from_slice(&bytes)?
        } else {
            serde_yaml_ng::from_slice(&bytes)?
        };
        tracing::debug!(
            path = %path.display(),
            hlt = table.hlt.len(),
            l1 = table.l1.len(),
            "loaded prescale table"
        );
        Ok(table)
    }
}

impl PrescaleLookup for PrescaleTable {
    fn hlt_prescale(&self, path: &str) -> i32 {
        self.hlt.get(path).copied().unwrap_or(-1)
    }

    fn l1_prescale(&self, seed: &str) -> i32 {
        self.l1.get(seed).copied().unwrap_or(-1)
    }
}

/// Lookup that knows no prescales.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrescales;

impl PrescaleLookup for NoPrescales {
    fn hlt_prescale(&self, _path: &str) -> i32 {
        -1
    }

    fn l1_prescale(&self, _seed: &str) -> i32 {
        -1
    }
}
