//! Baby records: one flat row per selected lepton candidate.

use anyhow::Result;
use bm_core::{EventIdentifier, Lepton, LeptonFlavor, TriggerMatchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BabyRecord {
    pub run: u64,
    pub event: u64,
    pub lumi: u64,
    pub is_data: bool,
    /// 1 for data, `scale1fb` for simulation.
    pub weight: f64,
    /// Signed particle code, `-charge * pdg` (11 = e⁻, -13 = μ⁺).
    pub id: i32,
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    pub charge: i32,
    /// Transverse mass of the candidate and MET.
    pub mt: f64,
    pub met: f64,
    pub met_phi: f64,
    /// Electrons / muons above the candidate pt threshold in this event.
    pub n_electrons: u32,
    pub n_muons: u32,
    /// Match result per trigger family name.
    pub triggers: BTreeMap<String, TriggerMatchResult>,
}

impl BabyRecord {
    pub fn new(id: EventIdentifier, is_data: bool, flavor: LeptonFlavor, lepton: &Lepton) -> Self {
        Self {
            run: id.run,
            event: id.event,
            lumi: id.lumi_section,
            is_data,
            weight: 1.0,
            id: -lepton.charge * flavor.pdg_code(),
            pt: lepton.p4.pt(),
            eta: lepton.p4.eta(),
            phi: lepton.p4.phi(),
            charge: lepton.charge,
            mt: 0.0,
            met: 0.0,
            met_phi: 0.0,
            n_electrons: 0,
            n_muons: 0,
            triggers: BTreeMap::new(),
        }
    }
}

/// Destination for baby records.
pub trait RecordSink {
    fn write_record(&mut self, record: &BabyRecord) -> Result<()>;
}

impl RecordSink for Vec<BabyRecord> {
    fn write_record(&mut self, record: &BabyRecord) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// JSON-lines writer.
pub struct BabyWriter<W: Write> {
    out: BufWriter<W>,
    written: u64,
}

impl<W: Write> BabyWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { out: BufWriter::new(inner), written: 0 }
    }

    /// Flush buffered records; returns the number written.
    pub fn finish(mut self) -> Result<u64> {
        self.out.flush()?;
        Ok(self.written)
    }
}

impl<W: Write> RecordSink for BabyWriter<W> {
    fn write_record(&mut self, record: &BabyRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_core::LorentzVector;

    fn positive_muon() -> Lepton {
        Lepton { p4: LorentzVector::from_pt_eta_phi_m(22.0, 1.1, -0.4, 0.105), charge: 1 }
    }

    #[test]
    fn signed_id_follows_charge() {
        let id = EventIdentifier::new(1, 2, 3);
        let mu = BabyRecord::new(id, true, LeptonFlavor::Muon, &positive_muon());
        assert_eq!(mu.id, -13);
        let el = Lepton { charge: -1, ..positive_muon() };
        assert_eq!(BabyRecord::new(id, true, LeptonFlavor::Electron, &el).id, 11);
    }

    #[test]
    fn writer_emits_one_line_per_record() {
        let id = EventIdentifier::new(163255, 1042, 7);
        let mut rec = BabyRecord::new(id, false, LeptonFlavor::Muon, &positive_muon());
        rec.triggers.insert("mu8".into(), TriggerMatchResult::not_found());

        let mut buf = Vec::new();
        let mut writer = BabyWriter::new(&mut buf);
        writer.write_record(&rec).unwrap();
        writer.write_record(&rec).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: BabyRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(back, rec);
        let v: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(v["triggers"]["mu8"]["delta_r_min"], 99.0);
        assert_eq!(v["lumi"], 7);
    }
}
