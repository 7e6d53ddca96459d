//! Built-in trigger families for the 2011 single-lepton fake-rate triggers.
//!
//! Each entry is `(name, version pattern, L1 seed)`; families without a
//! known seed report no L1 prescale.

use bm_core::{LeptonFlavor, Result};

use crate::pattern::TriggerFamily;

type FamilyRow = (&'static str, &'static str, Option<&'static str>);

const ELECTRON_FAMILIES: &[FamilyRow] = &[
    ("ele8", r"HLT_Ele8_v(\d+)", None),
    ("ele8_CaloIdL_TrkIdVL", r"HLT_Ele8_CaloIdL_TrkIdVL_v(\d+)", None),
    ("ele8_CaloIdL_CaloIsoVL", r"HLT_Ele8_CaloIdL_CaloIsoVL_v(\d+)", Some("L1_SingleEG5")),
    ("ele8_CaloIdL_CaloIsoVL_Jet40", r"HLT_Ele8_CaloIdL_CaloIsoVL_Jet40_v(\d+)", None),
    (
        "ele8_CaloIdT_TrkIdVL_CaloIsoVL_TrkIsoVL",
        r"HLT_Ele8_CaloIdT_TrkIdVL_CaloIsoVL_TrkIsoVL_v(\d+)",
        None,
    ),
    (
        "ele8_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL",
        r"HLT_Ele8_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL_v(\d+)",
        Some("L1_SingleEG7"),
    ),
    (
        "ele8_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL_Jet30",
        r"HLT_Ele8_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL_Jet30_v(\d+)",
        Some("L1_SingleEG7"),
    ),
    ("ele8_CaloIdT_TrkIdVL", r"HLT_Ele8_CaloIdT_TrkIdVL_v(\d+)", Some("L1_SingleEG5")),
    ("ele17_CaloIdL_CaloIsoVL", r"HLT_Ele17_CaloIdL_CaloIsoVL_v(\d+)", Some("L1_SingleEG12")),
    (
        "ele17_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL",
        r"HLT_Ele17_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL_v(\d+)",
        Some("L1_SingleEG12"),
    ),
    (
        "ele17_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL_Jet30",
        r"HLT_Ele17_CaloIdT_CaloIsoVL_TrkIdVL_TrkIsoVL_Jet30_v(\d+)",
        Some("L1_SingleEG12"),
    ),
    (
        "ele25_CaloIdVT_CaloIsoT_TrkIdT_TrkIsoT_CentralPFJet30",
        r"HLT_Ele25_CaloIdVT_CaloIsoT_TrkIdT_TrkIsoT_CentralPFJet30_v(\d+)",
        Some("L1_SingleEG20"),
    ),
    ("ele27_WP80", r"HLT_Ele27_WP80_v(\d+)", Some("L1_SingleEG20")),
    (
        "photon20_CaloIdVT_IsoT_Ele8_CaloIdL_CaloIsoVL",
        r"HLT_Photon20_CaloIdVT_IsoT_Ele8_CaloIdL_CaloIsoVL_v(\d+)",
        None,
    ),
];

const MUON_FAMILIES: &[FamilyRow] = &[
    ("mu3", r"HLT_Mu3_v(\d+)", None),
    ("mu5", r"HLT_Mu5_v(\d+)", Some("L1_SingleMu3")),
    ("mu8", r"HLT_Mu8_v(\d+)", Some("L1_SingleMu3")),
    ("mu12", r"HLT_Mu12_v(\d+)", Some("L1_SingleMu7")),
    ("mu15", r"HLT_Mu15_v(\d+)", None),
    ("mu17", r"HLT_Mu17_v(\d+)", Some("L1_SingleMu12")),
    ("mu20", r"HLT_Mu20_v(\d+)", None),
    ("mu24", r"HLT_Mu24_v(\d+)", None),
    ("mu30", r"HLT_Mu30_v(\d+)", None),
    ("mu15_eta2p1", r"HLT_Mu15_eta2p1_v(\d+)", Some("L1_SingleMu7")),
    ("mu24_eta2p1", r"HLT_Mu24_eta2p1_v(\d+)", Some("L1_SingleMu16_Eta2p1")),
    ("mu30_eta2p1", r"HLT_Mu30_eta2p1_v(\d+)", Some("L1_SingleMu16_Eta2p1")),
    ("mu8_Jet40", r"HLT_Mu8_Jet40_v(\d+)", None),
    ("isomu20_eta2p1", r"HLT_IsoMu20_eta2p1_v(\d+)", Some("L1_SingleMu16_Eta2p1")),
    ("isomu24_eta2p1", r"HLT_IsoMu24_eta2p1_v(\d+)", Some("L1_SingleMu16_Eta2p1")),
    ("isomu30_eta2p1", r"HLT_IsoMu30_eta2p1_v(\d+)", Some("L1_SingleMu16_Eta2p1")),
];

fn build(table: &[FamilyRow], flavor: LeptonFlavor) -> Result<Vec<TriggerFamily>> {
    table
        .iter()
        .map(|&(name, pattern, seed)| {
            let family = TriggerFamily::new(name, pattern, flavor.pdg_code())?;
            Ok(match seed {
                Some(seed) => family.with_l1_seed(seed),
                None => family,
            })
        })
        .collect()
}

/// Electron trigger families (expected particle type 11).
pub fn electron_families() -> Result<Vec<TriggerFamily>> {
    build(ELECTRON_FAMILIES, LeptonFlavor::Electron)
}

/// Muon trigger families (expected particle type 13).
pub fn muon_families() -> Result<Vec<TriggerFamily>> {
    build(MUON_FAMILIES, LeptonFlavor::Muon)
}

/// Families for one lepton flavor.
pub fn families_for(flavor: LeptonFlavor) -> Result<Vec<TriggerFamily>> {
    match flavor {
        LeptonFlavor::Electron => electron_families(),
        LeptonFlavor::Muon => muon_families(),
    }
}

/// Every built-in family, electrons first.
pub fn all_families() -> Result<Vec<TriggerFamily>> {
    let mut out = electron_families()?;
    out.extend(muon_families()?);
    Ok(out)
}
