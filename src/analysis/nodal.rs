//! Nodal corrections.
//!
//! The 18.6-year regression of the lunar node modulates each constituent's
//! amplitude by a factor `f` and shifts its phase by `u`. Two forms are used,
//! sharing only this contract:
//!
//! - **Admiralty** ([`AdmiraltyTerms`]): closed-form `f`, `u` and the
//!   equilibrium argument `V0` for the eight standard constituents, driven by
//!   the node longitude `N` (degrees).
//! - **Doodson** ([`NodalCorrection`]): `v = Σ doodson[i]·astro[i] mod 1` (cycles);
//!   `f = 1` and `u = 0` are not modeled.

use super::astronomy::{AstronomicalArguments, MeanLongitudes};
use super::constituents::Constituent;

/// Doodson-form correction. `u` and `v` are in cycles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodalCorrection {
    pub f: f64,
    pub u: f64,
    pub v: f64,
}

impl NodalCorrection {
    /// No correction.
    pub const IDENTITY: NodalCorrection = NodalCorrection {
        f: 1.0,
        u: 0.0,
        v: 0.0,
    };

    /// Correction for a constituent from its Doodson numbers.
    ///
    /// Constituents without Doodson numbers get [`NodalCorrection::IDENTITY`].
    pub fn for_constituent(constituent: &Constituent, astro: &AstronomicalArguments) -> Self {
        match &constituent.doodson {
            Some(doodson) => Self::from_doodson(doodson, astro),
            None => Self::IDENTITY,
        }
    }

    /// Correction from Doodson numbers.
    pub fn from_doodson(doodson: &[i32; 6], astro: &AstronomicalArguments) -> Self {
        let v = doodson
            .iter()
            .zip(astro.as_array())
            .map(|(&k, a)| k as f64 * a)
            .sum::<f64>()
            .rem_euclid(1.0);
        Self { f: 1.0, u: 0.0, v }
    }

    /// Total phase offset `v + u` in degrees.
    pub fn offset_degrees(&self) -> f64 {
        360.0 * (self.v + self.u)
    }
}

/// Admiralty-form terms for one standard constituent, angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdmiraltyTerms {
    /// Equilibrium argument at the reference time
    pub v0: f64,
    /// Amplitude factor
    pub f: f64,
    /// Nodal phase correction
    pub u: f64,
}

impl AdmiraltyTerms {
    /// Terms for a standard constituent, `None` for any other name.
    pub fn for_constituent(name: &str, lon: &MeanLongitudes) -> Option<Self> {
        let (sin_n, cos_n) = lon.n.to_radians().sin_cos();
        let (s, h, p) = (lon.s, lon.h, lon.p);

        let (v0, f, u) = match name {
            "M2" => (2.0 * (h - s), 1.0 - 0.037 * cos_n, -2.1 * sin_n),
            "S2" => (0.0, 1.0, 0.0),
            "N2" => (2.0 * (h - s) - p, 1.0 - 0.037 * cos_n, -2.1 * sin_n),
            "K2" => (2.0 * h, 1.0 + 0.286 * cos_n, -17.7 * sin_n),
            "K1" => (h + 90.0, 1.0 + 0.115 * cos_n, -8.9 * sin_n),
            "O1" => (h - 2.0 * s + 90.0, 1.0 + 0.189 * cos_n, 10.8 * sin_n),
            "P1" => (h - 90.0, 1.0, 0.0),
            "Q1" => (h - 2.0 * s - p + 90.0, 1.0 + 0.188 * cos_n, 10.8 * sin_n),
            _ => return None,
        };
        Some(Self { v0, f, u })
    }

    /// Total phase offset `V0 + u` in degrees.
    pub fn offset_degrees(&self) -> f64 {
        self.v0 + self.u
    }
}
