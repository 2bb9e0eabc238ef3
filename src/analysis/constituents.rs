//! Tidal constituent reference data.
//!
//! Two tables live here:
//!
//! - The full constituent database (146 entries, frequencies in cycles per
//!   hour) used by the T_TIDE strategy. Most entries name a comparison
//!   constituent for the Rayleigh test and carry Doodson numbers.
//! - The eight standard astronomical constituents with literature speeds in
//!   degrees per hour, used by the Simplified, Admiralty and joint
//!   least-squares strategies.
//!
//! Both tables are static. Name lookup goes through a map built on first use.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::LazyLock;

/// Name of the mean-level pseudo-constituent, excluded from harmonic fitting.
pub const MEAN_LEVEL: &str = "Z0";

/// One row of the constituent database.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constituent {
    /// Name (e.g., "M2", "2MK5")
    pub name: &'static str,
    /// Frequency in cycles per hour
    pub frequency: f64,
    /// Neighbour used for the Rayleigh resolvability test
    pub comparison: Option<&'static str>,
    /// Doodson numbers over `[tau, s, h, p, N', p']`
    pub doodson: Option<[i32; 6]>,
}

impl Constituent {
    const fn new(
        name: &'static str,
        frequency: f64,
        comparison: Option<&'static str>,
        doodson: Option<[i32; 6]>,
    ) -> Self {
        Self {
            name,
            frequency,
            comparison,
            doodson,
        }
    }

    /// Angular speed in radians per hour.
    pub fn angular_speed(&self) -> f64 {
        2.0 * PI * self.frequency
    }

    /// Speed in degrees per hour.
    pub fn speed_degrees(&self) -> f64 {
        360.0 * self.frequency
    }

    /// Period in hours, `None` for the zero-frequency mean level.
    pub fn period_hours(&self) -> Option<f64> {
        (self.frequency > 0.0).then(|| 1.0 / self.frequency)
    }
}

#[rustfmt::skip]
static DATABASE: [Constituent; 146] = [
    Constituent::new("Z0", 0.0, Some("M2"), None),
    Constituent::new("SA", 0.0001140741, Some("SSA"), Some([0, 0, 1, 0, 0, -1])),
    Constituent::new("SSA", 0.0002281591, Some("Z0"), Some([0, 0, 2, 0, 0, 0])),
    Constituent::new("MSM", 0.0013097808, Some("MM"), Some([0, 1, -2, 1, 0, 0])),
    Constituent::new("MM", 0.0015121518, Some("MSF"), Some([0, 1, 0, -1, 0, 0])),
    Constituent::new("MSF", 0.0028219327, Some("Z0"), Some([0, 2, -2, 0, 0, 0])),
    Constituent::new("MF", 0.0030500918, Some("MSF"), Some([0, 2, 0, 0, 0, 0])),
    Constituent::new("ALP1", 0.0343965699, Some("2Q1"), Some([1, -4, 2, 1, 0, 0])),
    Constituent::new("2Q1", 0.0357063507, Some("Q1"), Some([1, -3, 0, 2, 0, 0])),
    Constituent::new("SIG1", 0.0359087218, Some("2Q1"), Some([1, -3, 2, 0, 0, 0])),
    Constituent::new("Q1", 0.0372185026, Some("O1"), Some([1, -2, 0, 1, 0, 0])),
    Constituent::new("RHO1", 0.0374208736, Some("Q1"), Some([1, -2, 2, -1, 0, 0])),
    Constituent::new("O1", 0.0387306544, Some("K1"), Some([1, -1, 0, 0, 0, 0])),
    Constituent::new("TAU1", 0.0389588136, Some("O1"), Some([1, -1, 2, 0, 0, 0])),
    Constituent::new("BET1", 0.0400404353, Some("NO1"), Some([1, 0, -2, 1, 0, 0])),
    Constituent::new("NO1", 0.0402685944, Some("K1"), Some([1, 0, 0, 1, 0, 0])),
    Constituent::new("CHI1", 0.0404709654, Some("NO1"), Some([1, 0, 2, -1, 0, 0])),
    Constituent::new("PI1", 0.0414385130, Some("P1"), Some([1, 1, -3, 0, 0, 1])),
    Constituent::new("P1", 0.0415525871, Some("K1"), Some([1, 1, -2, 0, 0, 0])),
    Constituent::new("S1", 0.0416666721, Some("K1"), Some([1, 1, -1, 0, 0, 1])),
    Constituent::new("K1", 0.0417807462, Some("Z0"), Some([1, 1, 0, 0, 0, 0])),
    Constituent::new("PSI1", 0.0418948203, Some("K1"), Some([1, 1, 1, 0, 0, -1])),
    Constituent::new("PHI1", 0.0420089053, Some("K1"), Some([1, 1, 2, 0, 0, 0])),
    Constituent::new("THE1", 0.0430905270, Some("J1"), Some([1, 2, -2, 1, 0, 0])),
    Constituent::new("J1", 0.0432928981, Some("K1"), Some([1, 2, 0, -1, 0, 0])),
    Constituent::new("2PO1", 0.0443745198, None, None),
    Constituent::new("SO1", 0.0446026789, Some("OO1"), None),
    Constituent::new("OO1", 0.0448308380, Some("J1"), Some([1, 3, 0, 0, 0, 0])),
    Constituent::new("UPS1", 0.0463429898, Some("OO1"), Some([1, 4, 0, -1, 0, 0])),
    Constituent::new("ST36", 0.0733553835, None, None),
    Constituent::new("2NS2", 0.0746651643, None, None),
    Constituent::new("ST37", 0.0748675353, None, None),
    Constituent::new("ST1", 0.0748933234, None, None),
    Constituent::new("OQ2", 0.0759749451, Some("EPS2"), Some([2, -3, 0, 3, 0, 0])),
    Constituent::new("EPS2", 0.0761773161, Some("2N2"), Some([2, -3, 2, 1, 0, 0])),
    Constituent::new("ST2", 0.0764054753, None, None),
    Constituent::new("ST3", 0.0772331498, None, None),
    Constituent::new("O2", 0.0774613089, None, None),
    Constituent::new("2N2", 0.0774870970, Some("MU2"), Some([2, -2, 0, 2, 0, 0])),
    Constituent::new("MU2", 0.0776894680, Some("N2"), Some([2, -2, 2, 0, 0, 0])),
    Constituent::new("SNK2", 0.0787710897, None, None),
    Constituent::new("N2", 0.0789992488, Some("M2"), Some([2, -1, 0, 1, 0, 0])),
    Constituent::new("NU2", 0.0792016198, Some("N2"), Some([2, -1, 2, -1, 0, 0])),
    Constituent::new("ST4", 0.0794555670, None, None),
    Constituent::new("OP2", 0.0802832416, None, None),
    Constituent::new("GAM2", 0.0803090296, Some("ALP2"), Some([2, 0, -2, 2, 0, 0])),
    Constituent::new("ALP2", 0.0803973266, Some("M2"), Some([2, 0, -1, 0, 0, 1])),
    Constituent::new("M2", 0.0805114007, Some("Z0"), Some([2, 0, 0, 0, 0, 0])),
    Constituent::new("BET2", 0.0806254748, Some("M2"), Some([2, 0, 1, 0, 0, -1])),
    Constituent::new("MKS2", 0.0807395598, Some("M2"), None),
    Constituent::new("ST5", 0.0809677189, None, None),
    Constituent::new("ST6", 0.0815930224, None, None),
    Constituent::new("LDA2", 0.0818211815, Some("L2"), Some([2, 1, -2, 1, 0, 0])),
    Constituent::new("L2", 0.0820235525, Some("S2"), Some([2, 1, 0, -1, 0, 0])),
    Constituent::new("2SK2", 0.0831051742, None, None),
    Constituent::new("T2", 0.0832192592, Some("S2"), Some([2, 2, -3, 0, 0, 1])),
    Constituent::new("S2", 0.0833333333, Some("M2"), Some([2, 2, -2, 0, 0, 0])),
    Constituent::new("R2", 0.0834474074, Some("S2"), Some([2, 2, -1, 0, 0, -1])),
    Constituent::new("K2", 0.0835614924, Some("S2"), Some([2, 2, 0, 0, 0, 0])),
    Constituent::new("MSN2", 0.0848454852, Some("ETA2"), None),
    Constituent::new("ETA2", 0.0850736443, Some("K2"), Some([2, 3, 0, -1, 0, 0])),
    Constituent::new("ST7", 0.0853018034, None, None),
    Constituent::new("2SM2", 0.0861552660, None, None),
    Constituent::new("ST38", 0.0863576370, None, None),
    Constituent::new("SKM2", 0.0863834251, None, None),
    Constituent::new("2SN2", 0.0876674179, None, None),
    Constituent::new("NO3", 0.1177299033, None, None),
    Constituent::new("MO3", 0.1192420551, Some("M3"), None),
    Constituent::new("M3", 0.1207671010, Some("M2"), Some([3, 0, 0, 0, 0, 0])),
    Constituent::new("NK3", 0.1207799950, None, None),
    Constituent::new("SO3", 0.1220639878, Some("MK3"), None),
    Constituent::new("MK3", 0.1222921469, Some("M3"), None),
    Constituent::new("SP3", 0.1248859204, None, None),
    Constituent::new("SK3", 0.1251140796, Some("MK3"), None),
    Constituent::new("ST8", 0.1566887168, None, None),
    Constituent::new("N4", 0.1579984976, None, None),
    Constituent::new("3MS4", 0.1582008687, None, None),
    Constituent::new("ST39", 0.1592824904, None, None),
    Constituent::new("MN4", 0.1595106495, Some("M4"), None),
    Constituent::new("ST9", 0.1597388086, None, None),
    Constituent::new("ST40", 0.1607946422, None, None),
    Constituent::new("M4", 0.1610228013, Some("M3"), None),
    Constituent::new("ST10", 0.1612509604, None, None),
    Constituent::new("SN4", 0.1623325821, Some("M4"), None),
    Constituent::new("KN4", 0.1625607413, None, None),
    Constituent::new("MS4", 0.1638447340, Some("M4"), None),
    Constituent::new("MK4", 0.1640728931, Some("MS4"), None),
    Constituent::new("SL4", 0.1653568858, None, None),
    Constituent::new("S4", 0.1666666667, Some("MS4"), None),
    Constituent::new("SK4", 0.1668948258, Some("S4"), None),
    Constituent::new("MNO5", 0.1982413039, None, None),
    Constituent::new("2MO5", 0.1997534558, None, None),
    Constituent::new("3MP5", 0.1999816149, None, None),
    Constituent::new("MNK5", 0.2012913957, None, None),
    Constituent::new("2MP5", 0.2025753884, None, None),
    Constituent::new("2MK5", 0.2028035475, Some("M4"), None),
    Constituent::new("MSK5", 0.2056254802, None, None),
    Constituent::new("3KM5", 0.2058536393, None, None),
    Constituent::new("2SK5", 0.2084474129, Some("2MK5"), None),
    Constituent::new("ST11", 0.2372259056, None, None),
    Constituent::new("2NM6", 0.2385098983, None, None),
    Constituent::new("ST12", 0.2387380574, None, None),
    Constituent::new("2MN6", 0.2400220501, Some("M6"), None),
    Constituent::new("ST13", 0.2402502093, None, None),
    Constituent::new("ST41", 0.2413060429, None, None),
    Constituent::new("M6", 0.2415342020, Some("2MK5"), None),
    Constituent::new("MSN6", 0.2428439828, None, None),
    Constituent::new("MKN6", 0.2430721419, None, None),
    Constituent::new("ST42", 0.2441279756, None, None),
    Constituent::new("2MS6", 0.2443561347, Some("M6"), None),
    Constituent::new("2MK6", 0.2445842938, Some("2MS6"), None),
    Constituent::new("NSK6", 0.2458940746, None, None),
    Constituent::new("2SM6", 0.2471780673, Some("2MS6"), None),
    Constituent::new("MSK6", 0.2474062264, Some("2SM6"), None),
    Constituent::new("S6", 0.2500000000, None, None),
    Constituent::new("ST14", 0.2787527046, None, None),
    Constituent::new("ST15", 0.2802906445, None, None),
    Constituent::new("M7", 0.2817899023, None, None),
    Constituent::new("ST16", 0.2830867891, None, None),
    Constituent::new("3MK7", 0.2833149482, Some("M6"), None),
    Constituent::new("ST17", 0.2861368809, None, None),
    Constituent::new("ST18", 0.3190212990, None, None),
    Constituent::new("3MN8", 0.3205334508, None, None),
    Constituent::new("ST19", 0.3207616099, None, None),
    Constituent::new("M8", 0.3220456027, Some("3MK7"), None),
    Constituent::new("ST20", 0.3233553835, None, None),
    Constituent::new("ST21", 0.3235835426, None, None),
    Constituent::new("3MS8", 0.3248675353, None, None),
    Constituent::new("3MK8", 0.3250956944, None, None),
    Constituent::new("ST22", 0.3264054753, None, None),
    Constituent::new("ST23", 0.3276894680, None, None),
    Constituent::new("ST24", 0.3279176271, None, None),
    Constituent::new("ST25", 0.3608020452, None, None),
    Constituent::new("ST26", 0.3623141970, None, None),
    Constituent::new("4MK9", 0.3638263489, None, None),
    Constituent::new("ST27", 0.3666482815, None, None),
    Constituent::new("ST28", 0.4010448515, None, None),
    Constituent::new("M10", 0.4025570033, None, None),
    Constituent::new("ST29", 0.4038667841, None, None),
    Constituent::new("ST30", 0.4053789360, None, None),
    Constituent::new("ST31", 0.4069168759, None, None),
    Constituent::new("ST32", 0.4082008687, None, None),
    Constituent::new("ST33", 0.4471596822, None, None),
    Constituent::new("M12", 0.4830684040, None, None),
    Constituent::new("ST34", 0.4858903367, None, None),
    Constituent::new("ST35", 0.4874282766, None, None),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static Constituent>> =
    LazyLock::new(|| DATABASE.iter().map(|c| (c.name, c)).collect());

/// The full constituent database, in ascending frequency order.
pub fn database() -> &'static [Constituent] {
    &DATABASE
}

/// Look up a database constituent by name (case-sensitive).
pub fn lookup(name: &str) -> Option<&'static Constituent> {
    BY_NAME.get(name).copied()
}

/// One of the eight standard astronomical constituents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardConstituent {
    pub name: &'static str,
    /// Speed in degrees per hour
    pub speed: f64,
    pub description: &'static str,
}

impl StandardConstituent {
    /// Angular speed in radians per hour.
    pub fn angular_speed(&self) -> f64 {
        self.speed.to_radians()
    }

    /// Period in hours.
    pub fn period_hours(&self) -> f64 {
        360.0 / self.speed
    }
}

/// M2, S2, N2, K2, K1, O1, P1, Q1.
#[rustfmt::skip]
pub const STANDARD_CONSTITUENTS: [StandardConstituent; 8] = [
    StandardConstituent { name: "M2", speed: 28.9841042, description: "Principal lunar semidiurnal" },
    StandardConstituent { name: "S2", speed: 30.0000000, description: "Principal solar semidiurnal" },
    StandardConstituent { name: "N2", speed: 28.4397295, description: "Larger lunar elliptic semidiurnal" },
    StandardConstituent { name: "K2", speed: 30.0821373, description: "Lunisolar semidiurnal" },
    StandardConstituent { name: "K1", speed: 15.0410686, description: "Lunisolar diurnal" },
    StandardConstituent { name: "O1", speed: 13.9430356, description: "Lunar diurnal" },
    StandardConstituent { name: "P1", speed: 14.9589314, description: "Solar diurnal" },
    StandardConstituent { name: "Q1", speed: 13.3986609, description: "Larger lunar elliptic diurnal" },
];

/// Look up a standard constituent by name.
pub fn standard(name: &str) -> Option<&'static StandardConstituent> {
    STANDARD_CONSTITUENTS.iter().find(|c| c.name == name)
}

/// Human-readable description; database-only constituents are described by name.
pub fn description(name: &str) -> &str {
    standard(name).map_or(name, |c| c.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_size_and_order() {
        assert_eq!(database().len(), 146);
        assert_eq!(database()[0].name, MEAN_LEVEL);
        assert!(
            database()
                .windows(2)
                .all(|w| w[0].frequency <= w[1].frequency),
            "database should be sorted by frequency"
        );
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(BY_NAME.len(), DATABASE.len());
    }

    #[test]
    fn test_lookup() {
        let m2 = lookup("M2").unwrap();
        assert_eq!(m2.comparison, Some("Z0"));
        assert_eq!(m2.doodson, Some([2, 0, 0, 0, 0, 0]));
        assert!((m2.period_hours().unwrap() - 12.4206).abs() < 1e-3);
        assert!(lookup("m2").is_none());
        assert!(lookup("XX9").is_none());
        assert!(lookup(MEAN_LEVEL).unwrap().period_hours().is_none());
    }

    #[test]
    fn test_comparison_names_resolve() {
        for c in database() {
            if let Some(cmp) = c.comparison {
                assert!(lookup(cmp).is_some(), "{} compares against unknown {}", c.name, cmp);
            }
        }
    }

    #[test]
    fn test_standard_speeds_match_database() {
        for sc in &STANDARD_CONSTITUENTS {
            let db = lookup(sc.name).unwrap();
            assert!(
                (db.speed_degrees() - sc.speed).abs() < 1e-4,
                "{}: {} vs {}",
                sc.name,
                db.speed_degrees(),
                sc.speed
            );
        }
    }

    #[test]
    fn test_description() {
        assert_eq!(description("K1"), "Lunisolar diurnal");
        assert_eq!(description("MK3"), "MK3");
    }
}
