//! Scan driver: files → events → lepton candidates → baby records.

use anyhow::Result;
use bm_core::{
    EventRecord, Lepton, LeptonFlavor, PrescaleLookup, TriggerEvent, transverse_mass,
};
use bm_select::{DedupRegistry, TriggerFamily, TriggerMatcher};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::baby::{BabyRecord, RecordSink};
use crate::config::{FlavorSelection, ScanConfig};
use crate::source::{EventChain, EventFileReader};

/// Z-veto lepton threshold and mass window (GeV).
const Z_PARTNER_MIN_PT: f64 = 20.0;
const Z_MASS: f64 = 91.0;
const Z_WINDOW: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub is_data: Option<bool>,
    pub flavor: FlavorSelection,
    pub max_events: Option<u64>,
    pub electron_min_pt: f64,
    pub muon_min_pt: f64,
    pub z_veto: bool,
    pub matcher: TriggerMatcher,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&ScanConfig::default())
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(cfg: &ScanConfig) -> Self {
        Self {
            is_data: cfg.is_data,
            flavor: cfg.flavor,
            max_events: cfg.max_events,
            electron_min_pt: cfg.electron_min_pt,
            muon_min_pt: cfg.muon_min_pt,
            z_veto: cfg.z_veto,
            matcher: TriggerMatcher::new(cfg.delta_r_cut),
        }
    }
}

impl ScanOptions {
    fn min_pt(&self, flavor: LeptonFlavor) -> f64 {
        match flavor {
            LeptonFlavor::Electron => self.electron_min_pt,
            LeptonFlavor::Muon => self.muon_min_pt,
        }
    }
}

/// Counters reported at the end of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files: u64,
    pub events_read: u64,
    pub events_processed: u64,
    pub duplicates: u64,
    pub candidates: u64,
    pub z_vetoed: u64,
    pub records: u64,
}

pub struct ScanDriver<P> {
    options: ScanOptions,
    electron_families: Vec<TriggerFamily>,
    muon_families: Vec<TriggerFamily>,
    prescales: P,
    dedup: DedupRegistry,
}

impl<P: PrescaleLookup> ScanDriver<P> {
    /// Families are split by the flavor their expected particle type implies;
    /// families with another particle type are matched against both flavors.
    pub fn new(options: ScanOptions, families: Vec<TriggerFamily>, prescales: P) -> Self {
        let mut electron_families = Vec::new();
        let mut muon_families = Vec::new();
        for fam in families {
            match fam.flavor() {
                Some(LeptonFlavor::Electron) => electron_families.push(fam),
                Some(LeptonFlavor::Muon) => muon_families.push(fam),
                None => {
                    electron_families.push(fam.clone());
                    muon_families.push(fam);
                }
            }
        }
        Self { options, electron_families, muon_families, prescales, dedup: DedupRegistry::new() }
    }

    fn families(&self, flavor: LeptonFlavor) -> &[TriggerFamily] {
        match flavor {
            LeptonFlavor::Electron => &self.electron_families,
            LeptonFlavor::Muon => &self.muon_families,
        }
    }

    /// Scan every file of `chain`, writing one record per selected candidate.
    ///
    /// The duplicate registry starts empty on every call. A trigger
    /// consistency violation stops the scan and is returned as the error.
    pub fn run(&mut self, chain: &EventChain, sink: &mut impl RecordSink) -> Result<ScanSummary> {
        self.dedup.reset();
        let mut summary = ScanSummary::default();

        tracing::info!(
            files = chain.files().len(),
            max_events = ?self.options.max_events,
            "starting scan"
        );

        'files: for path in chain.files() {
            if self.cap_reached(&summary) {
                break;
            }
            summary.files += 1;
            let processed_before = summary.events_processed;
            tracing::debug!(file = %path.display(), "opening");

            for event in EventFileReader::open(path)? {
                if self.cap_reached(&summary) {
                    break 'files;
                }
                let event = event?;
                summary.events_read += 1;
                self.process_event(&event, sink, &mut summary)?;
            }

            tracing::debug!(
                file = %path.display(),
                events = summary.events_processed - processed_before,
                "file done"
            );
        }

        tracing::info!(
            events_processed = summary.events_processed,
            duplicates = summary.duplicates,
            records = summary.records,
            "scan complete"
        );
        Ok(summary)
    }

    fn cap_reached(&self, summary: &ScanSummary) -> bool {
        self.options.max_events.is_some_and(|max| summary.events_processed >= max)
    }

    fn process_event(
        &mut self,
        event: &EventRecord,
        sink: &mut impl RecordSink,
        summary: &mut ScanSummary,
    ) -> Result<()> {
        let is_data = self.options.is_data.unwrap_or(event.is_real_data);
        let id = event.id();
        if is_data && self.dedup.is_duplicate(&id) {
            tracing::warn!(event = %id, "found duplicate event, skipping");
            summary.duplicates += 1;
            return Ok(());
        }
        summary.events_processed += 1;

        let n_electrons = count_above(&event.electrons, self.options.electron_min_pt);
        let n_muons = count_above(&event.muons, self.options.muon_min_pt);
        let weight = if is_data { 1.0 } else { event.scale1fb };

        for &flavor in self.options.flavor.flavors() {
            let leptons = event.leptons(flavor);
            for (i, lepton) in leptons.iter().enumerate() {
                if lepton.p4.pt() < self.options.min_pt(flavor) {
                    continue;
                }
                if self.options.z_veto && forms_z(leptons, i) {
                    summary.z_vetoed += 1;
                    continue;
                }
                summary.candidates += 1;

                let mut record = BabyRecord::new(id, is_data, flavor, lepton);
                record.weight = weight;
                record.met = event.met;
                record.met_phi = event.met_phi;
                record.mt = transverse_mass(&lepton.p4, event.met, event.met_phi);
                record.n_electrons = n_electrons;
                record.n_muons = n_muons;
                record.triggers = self.match_triggers(event, flavor, lepton)?;

                sink.write_record(&record)?;
                summary.records += 1;
            }
        }
        Ok(())
    }

    fn match_triggers(
        &self,
        event: &EventRecord,
        flavor: LeptonFlavor,
        lepton: &Lepton,
    ) -> Result<BTreeMap<String, bm_core::TriggerMatchResult>> {
        let mut out = BTreeMap::new();
        for family in self.families(flavor) {
            let result = self
                .options
                .matcher
                .match_family(event, &lepton.p4, family, &self.prescales)
                .inspect_err(|e| tracing::error!(error = %e, "aborting scan"))?;
            out.insert(family.name().to_string(), result);
        }
        Ok(out)
    }
}

fn count_above(leptons: &[Lepton], min_pt: f64) -> u32 {
    let n = leptons.iter().filter(|l| l.p4.pt() >= min_pt).count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// True if lepton `i` is above 20 GeV and pairs with another lepton of the
/// same collection with pt ≥ 20 GeV into a mass within 20 GeV of the Z.
/// Softer candidates are never vetoed.
fn forms_z(leptons: &[Lepton], i: usize) -> bool {
    let cand = leptons[i].p4;
    if cand.pt() <= Z_PARTNER_MIN_PT {
        return false;
    }
    leptons.iter().enumerate().any(|(j, other)| {
        j != i
            && other.p4.pt() >= Z_PARTNER_MIN_PT
            && ((cand + other.p4).mass() - Z_MASS).abs() <= Z_WINDOW
    })
}
