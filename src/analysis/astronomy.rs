//! Astronomical arguments for nodal corrections.
//!
//! Two parameterizations are used:
//!
//! - [`AstronomicalArguments`]: the six Doodson arguments `[tau, s, h, p, N', p']`
//!   in cycles, from polynomials in days since JD 2415020.0
//!   (1899-12-31 12:00 UT). Used by the T_TIDE strategy.
//! - [`MeanLongitudes`]: mean lunar/solar longitudes in degrees, linear in
//!   Julian centuries since 2000-01-01 00:00 UTC. Used by the Admiralty strategy.
//!
//! Timestamps are treated as UTC.

use chrono::NaiveDateTime;

/// Julian date of the Unix epoch.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Reference epoch of the Doodson argument polynomials.
pub const ASTRO_EPOCH_JD: f64 = 2_415_020.0;

/// Julian date of 2000-01-01 00:00 UTC, the Admiralty reference epoch.
pub const J2000_MIDNIGHT_JD: f64 = 2_451_544.5;

/// Label of the Admiralty reference epoch.
pub const J2000_LABEL: &str = "J2000.0 (Jan 1, 2000)";

const MS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian date of a timestamp.
pub fn julian_date(timestamp: &NaiveDateTime) -> f64 {
    timestamp.and_utc().timestamp_millis() as f64 / MS_PER_DAY + UNIX_EPOCH_JD
}

/// Midpoint between two timestamps.
pub fn midpoint(start: &NaiveDateTime, end: &NaiveDateTime) -> NaiveDateTime {
    *start + (*end - *start) / 2
}

/// Julian centuries elapsed since 2000-01-01 00:00 UTC.
pub fn centuries_since_j2000(timestamp: &NaiveDateTime) -> f64 {
    (julian_date(timestamp) - J2000_MIDNIGHT_JD) / DAYS_PER_CENTURY
}

/// Reduce an angle in degrees to a fraction of a turn in `[0, 1)`.
fn turns(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0) / 360.0
}

/// Doodson arguments, each in cycles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AstronomicalArguments {
    /// Mean lunar time, `frac(JD) + h - s` (not reduced)
    pub tau: f64,
    /// Mean longitude of the Moon
    pub s: f64,
    /// Mean longitude of the Sun
    pub h: f64,
    /// Longitude of lunar perigee
    pub p: f64,
    /// Negative longitude of the ascending node
    pub np: f64,
    /// Longitude of solar perigee
    pub pp: f64,
}

impl AstronomicalArguments {
    /// Evaluate the arguments at a Julian date.
    pub fn at(jd: f64) -> Self {
        let d = jd - ASTRO_EPOCH_JD;
        let dd = d / 10_000.0;
        let dd2 = dd * dd;
        let dd3 = dd2 * dd;

        let s = turns(270.434164 + 13.1763965268 * d - 0.0000850 * dd2 + 0.000000039 * dd3);
        let h = turns(279.696678 + 0.9856473354 * d + 0.00002267 * dd2);
        let p = turns(334.329556 + 0.1114040803 * d - 0.0007739 * dd2 - 0.00000026 * dd3);
        let np = turns(-259.183275 + 0.0529539222 * d - 0.0001557 * dd2 - 0.000000050 * dd3);
        let pp = turns(281.220844 + 0.0000470684 * d + 0.0000339 * dd2 + 0.000000070 * dd3);
        let tau = jd.rem_euclid(1.0) + h - s;

        Self {
            tau,
            s,
            h,
            p,
            np,
            pp,
        }
    }

    /// Arguments in Doodson order `[tau, s, h, p, N', p']`.
    pub fn as_array(&self) -> [f64; 6] {
        [self.tau, self.s, self.h, self.p, self.np, self.pp]
    }
}

/// Mean longitudes in degrees (not reduced).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeanLongitudes {
    /// Moon
    pub s: f64,
    /// Sun
    pub h: f64,
    /// Lunar perigee
    pub p: f64,
    /// Ascending lunar node
    pub n: f64,
    /// Solar perigee
    pub p1: f64,
}

impl MeanLongitudes {
    /// Evaluate at `t` Julian centuries since J2000.
    pub fn at_centuries(t: f64) -> Self {
        Self {
            s: 218.3164 + 481_267.8813 * t,
            h: 280.4661 + 36_000.7698 * t,
            p: 83.3535 + 4_069.0137 * t,
            n: 125.0445 - 1_934.1363 * t,
            p1: 282.9400 + 1.7192 * t,
        }
    }
}
