//! `babymaker scan` configuration file.

use anyhow::Result;
use bm_core::LeptonFlavor;
use bm_select::{DEFAULT_DELTA_R_CUT, TriggerFamilySpec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which lepton flavors produce candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FlavorSelection {
    /// Electrons and muons
    #[default]
    Both,
    /// Electrons only
    Electrons,
    /// Muons only
    Muons,
}

impl FlavorSelection {
    pub fn flavors(self) -> &'static [LeptonFlavor] {
        match self {
            FlavorSelection::Both => &[LeptonFlavor::Electron, LeptonFlavor::Muon],
            FlavorSelection::Electrons => &[LeptonFlavor::Electron],
            FlavorSelection::Muons => &[LeptonFlavor::Muon],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Event files (JSON lines) or directories of them, scanned in order.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,

    /// Output baby file (JSON lines). Defaults to stdout.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Treat every event as real data (`true`) or simulation (`false`).
    /// When unset, each event's own `is_real_data` flag decides.
    #[serde(default)]
    pub is_data: Option<bool>,

    #[serde(default)]
    pub flavor: FlavorSelection,

    /// Stop after this many processed (non-duplicate) events.
    #[serde(default)]
    pub max_events: Option<u64>,

    /// HLT/L1 prescale table (JSON or YAML).
    #[serde(default)]
    pub prescales: Option<PathBuf>,

    #[serde(default = "default_delta_r_cut")]
    pub delta_r_cut: f64,

    #[serde(default = "default_electron_min_pt")]
    pub electron_min_pt: f64,

    #[serde(default = "default_muon_min_pt")]
    pub muon_min_pt: f64,

    /// Drop candidates that pair with another same-flavor lepton near the Z peak.
    #[serde(default = "default_true")]
    pub z_veto: bool,

    /// Replaces the built-in trigger catalog when set.
    #[serde(default)]
    pub families: Option<Vec<TriggerFamilySpec>>,
}

fn default_delta_r_cut() -> f64 {
    DEFAULT_DELTA_R_CUT
}

fn default_electron_min_pt() -> f64 {
    10.0
}

fn default_muon_min_pt() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: None,
            is_data: None,
            flavor: FlavorSelection::default(),
            max_events: None,
            prescales: None,
            delta_r_cut: default_delta_r_cut(),
            electron_min_pt: default_electron_min_pt(),
            muon_min_pt: default_muon_min_pt(),
            z_veto: true,
            families: None,
        }
    }
}

impl ScanConfig {
    /// Reject values the driver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.delta_r_cut.is_finite() && self.delta_r_cut > 0.0) {
            anyhow::bail!("delta_r_cut must be a positive number, got {}", self.delta_r_cut);
        }
        let thresholds =
            [("electron_min_pt", self.electron_min_pt), ("muon_min_pt", self.muon_min_pt)];
        for (name, v) in thresholds {
            if !(v.is_finite() && v >= 0.0) {
                anyhow::bail!("{name} must be a non-negative number, got {v}");
            }
        }
        if self.inputs.is_empty() {
            anyhow::bail!("no input files given");
        }
        Ok(())
    }

    /// Resolve relative paths against `base` (the config file's directory).
    fn resolve_relative(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.inputs.iter_mut().for_each(join);
        if let Some(p) = self.output.as_mut() {
            join(p);
        }
        if let Some(p) = self.prescales.as_mut() {
            join(p);
        }
    }
}

pub fn read_scan_config(path: &Path) -> Result<ScanConfig> {
    let bytes = std::fs::read(path)?;
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("").to_ascii_lowercase();
    let mut cfg: ScanConfig = if ext == "json" {
        serde_json::from_slice(&bytes)?
    } else {
        // Default: YAML (serde_yaml_ng).
        serde_yaml_ng::from_slice(&bytes)?
    };
    if let Some(base) = path.parent() {
        cfg.resolve_relative(base);
    }
    Ok(cfg)
}
