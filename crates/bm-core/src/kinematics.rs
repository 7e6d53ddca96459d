//! Four-vector kinematics.
//!
//! Cartesian `(px, py, pz, E)` storage with the detector-frame accessors the
//! selection code needs: transverse momentum, pseudorapidity, azimuth.

use std::f64::consts::PI;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Pseudorapidity reported for a vector with zero transverse momentum.
const ETA_MAX: f64 = 22756.0;

/// Lorentz four-vector in Cartesian coordinates (GeV).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LorentzVector {
    /// x momentum component
    pub px: f64,
    /// y momentum component
    pub py: f64,
    /// z momentum component
    pub pz: f64,
    /// Energy
    pub e: f64,
}

impl LorentzVector {
    /// Create from Cartesian components.
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Create from transverse momentum, pseudorapidity, azimuth and mass.
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let p2 = px * px + py * py + pz * pz;
        Self { px, py, pz, e: (p2 + m * m).sqrt() }
    }

    /// Transverse momentum.
    #[inline]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Pseudorapidity.
    pub fn eta(&self) -> f64 {
        let pt = self.pt();
        if pt > 0.0 {
            (self.pz / pt).asinh()
        } else if self.pz > 0.0 {
            ETA_MAX
        } else if self.pz < 0.0 {
            -ETA_MAX
        } else {
            0.0
        }
    }

    /// Azimuthal angle in (-π, π].
    pub fn phi(&self) -> f64 {
        if self.px == 0.0 && self.py == 0.0 { 0.0 } else { self.py.atan2(self.px) }
    }

    /// Invariant mass. Negative `m²` (off-shell rounding) returns `-sqrt(-m²)`.
    pub fn mass(&self) -> f64 {
        let m2 = self.e * self.e - (self.px * self.px + self.py * self.py + self.pz * self.pz);
        if m2 >= 0.0 { m2.sqrt() } else { -(-m2).sqrt() }
    }
}

impl Add for LorentzVector {
    type Output = LorentzVector;

    fn add(self, rhs: LorentzVector) -> LorentzVector {
        LorentzVector {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

/// Azimuthal separation wrapped to [-π, π].
pub fn delta_phi(a: &LorentzVector, b: &LorentzVector) -> f64 {
    let mut dphi = b.phi() - a.phi();
    while dphi > PI {
        dphi -= 2.0 * PI;
    }
    while dphi <= -PI {
        dphi += 2.0 * PI;
    }
    dphi
}

/// Angular separation `sqrt(Δη² + Δφ²)`.
pub fn delta_r(a: &LorentzVector, b: &LorentzVector) -> f64 {
    let deta = a.eta() - b.eta();
    let dphi = delta_phi(a, b);
    deta.hypot(dphi)
}

/// Transverse mass of a lepton and missing transverse energy.
pub fn transverse_mass(p4: &LorentzVector, met: f64, met_phi: f64) -> f64 {
    let mt2 = 2.0 * met * (p4.pt() - (p4.px * met_phi.cos() + p4.py * met_phi.sin()));
    mt2.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pt_eta_phi_round_trip() {
        let v = LorentzVector::from_pt_eta_phi_m(25.0, -1.3, 2.1, 0.105);
        assert_relative_eq!(v.pt(), 25.0, epsilon = 1e-12);
        assert_relative_eq!(v.eta(), -1.3, epsilon = 1e-12);
        assert_relative_eq!(v.phi(), 2.1, epsilon = 1e-12);
        assert_relative_eq!(v.mass(), 0.105, epsilon = 1e-6);
    }

    #[test]
    fn eta_of_longitudinal_vector_is_sentinel() {
        assert_eq!(LorentzVector::new(0.0, 0.0, 5.0, 5.0).eta(), ETA_MAX);
        assert_eq!(LorentzVector::new(0.0, 0.0, -5.0, 5.0).eta(), -ETA_MAX);
        assert_eq!(LorentzVector::default().eta(), 0.0);
    }

    #[test]
    fn delta_phi_wraps_across_pi() {
        let a = LorentzVector::from_pt_eta_phi_m(10.0, 0.0, PI - 0.05, 0.0);
        let b = LorentzVector::from_pt_eta_phi_m(10.0, 0.0, -PI + 0.05, 0.0);
        assert_relative_eq!(delta_phi(&a, &b), 0.1, epsilon = 1e-9);
        assert_relative_eq!(delta_r(&a, &b), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn delta_r_combines_eta_and_phi() {
        let a = LorentzVector::from_pt_eta_phi_m(30.0, 0.5, 0.2, 0.0);
        let b = LorentzVector::from_pt_eta_phi_m(12.0, 0.8, 0.6, 0.0);
        assert_relative_eq!(delta_r(&a, &b), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn z_peak_from_back_to_back_leptons() {
        let a = LorentzVector::from_pt_eta_phi_m(45.6, 0.0, 0.0, 0.0);
        let b = LorentzVector::from_pt_eta_phi_m(45.6, 0.0, PI, 0.0);
        assert_relative_eq!((a + b).mass(), 91.2, epsilon = 1e-9);
    }

    #[test]
    fn transverse_mass_back_to_back_met() {
        let lep = LorentzVector::from_pt_eta_phi_m(40.0, 0.3, 0.0, 0.0);
        assert_relative_eq!(transverse_mass(&lep, 40.0, PI), 80.0, epsilon = 1e-9);
        assert_relative_eq!(transverse_mass(&lep, 40.0, 0.0), 0.0, epsilon = 1e-6);
    }
}
