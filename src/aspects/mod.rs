//! Aspect detection between bodies sharing a calendar date
//!
//! Every unordered pair of distinct bodies on the same UTC day is tested
//! against all nine aspect angles independently. With a wide orb a pair can
//! match two neighbouring aspects at once (37.5 degrees is 7.5 from both the
//! semi-sextile and the semi-square); each match is reported.
//!
//! Pairing is per sample, not per body. With a sub-day step a date holds
//! several samples of each body, and every cross-body combination of them is
//! tested: two bodies sampled four times a day are compared 16 times, so one
//! aspect can appear up to 16 times on that date.

use crate::coordinates::angular_separation;
use crate::planetlib::Body;
use crate::positions::PlanetPosition;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default orb in degrees
pub const DEFAULT_ORB: f64 = 5.0;
/// Nominal duration attached to each detected aspect, in hours
pub const ASPECT_DURATION_HOURS: f64 = 24.0;

/// The nine recognised aspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AspectKind {
    Conjunction,
    SemiSextile,
    SemiSquare,
    Sextile,
    Square,
    Trine,
    Sesquiquadrate,
    Quincunx,
    Opposition,
}

impl AspectKind {
    /// All aspects in the order they are tested
    pub const ALL: [AspectKind; 9] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
        AspectKind::Quincunx,
        AspectKind::SemiSextile,
        AspectKind::SemiSquare,
        AspectKind::Sesquiquadrate,
    ];

    /// Ideal separation in degrees
    pub fn angle(&self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::SemiSextile => 30.0,
            AspectKind::SemiSquare => 45.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Sesquiquadrate => 135.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Opposition => 180.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "Conjunction",
            AspectKind::SemiSextile => "Semi-Sextile",
            AspectKind::SemiSquare => "Semi-Square",
            AspectKind::Sextile => "Sextile",
            AspectKind::Square => "Square",
            AspectKind::Trine => "Trine",
            AspectKind::Sesquiquadrate => "Sesquiquadrate",
            AspectKind::Quincunx => "Quincunx",
            AspectKind::Opposition => "Opposition",
        }
    }

    fn influence(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "Unification, new beginnings, powerful energy",
            AspectKind::SemiSextile => "Minor harmony, gentle support",
            AspectKind::SemiSquare => "Minor tension, slight friction",
            AspectKind::Sextile => "Harmony, opportunity, positive flow",
            AspectKind::Square => "Challenge, tension, growth through conflict",
            AspectKind::Trine => "Ease, harmony, natural talent",
            AspectKind::Sesquiquadrate => "Minor challenge, subtle adjustment",
            AspectKind::Quincunx => "Adjustment, fine-tuning, subtle influence",
            AspectKind::Opposition => "Awareness, balance, relationship dynamics",
        }
    }

    /// Parse a display name such as `"Semi-Square"`; case-insensitive
    pub fn from_name(name: &str) -> Option<AspectKind> {
        let wanted = name.trim();
        AspectKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How close an aspect is to exact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectStrength {
    Exact,
    Strong,
    Moderate,
    Weak,
}

impl AspectStrength {
    /// Classify an orb: exact at 0, strong up to 1, moderate up to 3 degrees
    pub fn from_orb(orb: f64) -> Self {
        if orb == 0.0 {
            AspectStrength::Exact
        } else if orb <= 1.0 {
            AspectStrength::Strong
        } else if orb <= 3.0 {
            AspectStrength::Moderate
        } else {
            AspectStrength::Weak
        }
    }

    fn modifier(&self) -> &'static str {
        match self {
            AspectStrength::Exact => "Very strong",
            AspectStrength::Strong => "Strong",
            AspectStrength::Moderate => "Moderate",
            AspectStrength::Weak => "Weak",
        }
    }
}

/// Interpretation text for an aspect at a given strength
pub fn aspect_influence(kind: AspectKind, strength: AspectStrength) -> String {
    format!("{} {}", strength.modifier(), kind.influence())
}

/// A detected aspect between two bodies on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectEvent {
    pub body1: Body,
    pub body2: Body,
    pub kind: AspectKind,
    /// Measured separation in degrees, [0, 180]
    pub angle: f64,
    /// Deviation from the ideal aspect angle in degrees
    pub orb: f64,
    pub date: DateTime<Utc>,
    pub strength: AspectStrength,
    pub influence: String,
    pub duration_hours: f64,
}

/// Find every aspect within `orb` degrees among same-day positions
///
/// Output is sorted by date; aspects on the same date keep pair order.
pub fn detect_aspects(positions: &[PlanetPosition], orb: f64) -> Vec<AspectEvent> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&PlanetPosition>> = BTreeMap::new();
    for pos in positions {
        by_date.entry(pos.date.date_naive()).or_default().push(pos);
    }

    let mut aspects = Vec::new();
    for day in by_date.values() {
        for (i, p1) in day.iter().enumerate() {
            for p2 in day.iter().skip(i + 1) {
                if p1.body == p2.body {
                    continue;
                }
                let separation = angular_separation(p1.longitude, p2.longitude);
                for kind in AspectKind::ALL.iter() {
                    let deviation = (separation - kind.angle()).abs();
                    if deviation <= orb {
                        let strength = AspectStrength::from_orb(deviation);
                        aspects.push(AspectEvent {
                            body1: p1.body,
                            body2: p2.body,
                            kind: *kind,
                            angle: separation,
                            orb: deviation,
                            date: p1.date,
                            strength,
                            influence: aspect_influence(*kind, strength),
                            duration_hours: ASPECT_DURATION_HOURS,
                        });
                    }
                }
            }
        }
    }

    aspects.sort_by_key(|a| a.date);
    aspects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::CoordinateSystem;
    use crate::positions::compute_body_position;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn at_longitude(body: Body, date: DateTime<Utc>, longitude: f64) -> PlanetPosition {
        let mut p = compute_body_position(body, date, CoordinateSystem::Geocentric);
        p.longitude = longitude;
        p
    }

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 11, 7, 0, 0, 0).unwrap() + Duration::days(n)
    }

    #[test]
    fn test_exact_square() {
        let positions = vec![
            at_longitude(Body::Mercury, day(0), 10.0),
            at_longitude(Body::Venus, day(0), 100.0),
        ];
        let aspects = detect_aspects(&positions, 5.0);
        assert_eq!(aspects.len(), 1);
        let a = &aspects[0];
        assert_eq!(a.kind, AspectKind::Square);
        assert_eq!(a.orb, 0.0);
        assert_eq!(a.strength, AspectStrength::Exact);
        assert_eq!(a.influence, "Very strong Challenge, tension, growth through conflict");
        assert_eq!((a.body1, a.body2), (Body::Mercury, Body::Venus));
        assert_eq!(a.duration_hours, 24.0);
    }

    #[test]
    fn test_separation_wraps_through_zero() {
        let positions = vec![
            at_longitude(Body::Mars, day(0), 355.0),
            at_longitude(Body::Jupiter, day(0), 2.0),
        ];
        let aspects = detect_aspects(&positions, 8.0);
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].kind, AspectKind::Conjunction);
        assert!((aspects[0].angle - 7.0).abs() < 1e-9);
        assert_eq!(aspects[0].strength, AspectStrength::Weak);
    }

    #[test]
    fn test_cross_date_pairs_are_ignored() {
        let positions = vec![
            at_longitude(Body::Mercury, day(0), 10.0),
            at_longitude(Body::Venus, day(1), 10.0),
        ];
        assert!(detect_aspects(&positions, 5.0).is_empty());
    }

    #[test]
    fn test_same_body_never_pairs() {
        let positions = vec![
            at_longitude(Body::Mercury, day(0), 10.0),
            at_longitude(Body::Mercury, day(0) + Duration::hours(6), 10.5),
        ];
        assert!(detect_aspects(&positions, 5.0).is_empty());
    }

    #[test]
    fn test_wide_orb_registers_overlapping_aspects() {
        // 37.5 degrees sits between the semi-sextile (30) and semi-square (45)
        let positions = vec![
            at_longitude(Body::Saturn, day(0), 0.0),
            at_longitude(Body::Uranus, day(0), 37.5),
        ];
        let narrow = detect_aspects(&positions, 5.0);
        assert!(narrow.is_empty());

        let wide = detect_aspects(&positions, 7.5);
        let kinds: Vec<AspectKind> = wide.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AspectKind::SemiSextile, AspectKind::SemiSquare]);
        assert!(wide.iter().all(|a| a.orb <= 7.5));
    }

    #[test]
    fn test_sub_day_samples_pair_every_combination() {
        let mut positions = Vec::new();
        for quarter in 0..4 {
            let t = day(0) + Duration::hours(6 * quarter);
            positions.push(at_longitude(Body::Mercury, t, 10.0));
            positions.push(at_longitude(Body::Venus, t, 100.0));
        }
        let aspects = detect_aspects(&positions, 5.0);
        assert_eq!(aspects.len(), 16);
        assert!(aspects.iter().all(|a| a.kind == AspectKind::Square));
        assert!(aspects.iter().all(|a| a.body1 != a.body2));
    }

    #[test]
    fn test_output_sorted_by_date() {
        let positions = vec![
            at_longitude(Body::Mercury, day(2), 0.0),
            at_longitude(Body::Venus, day(2), 180.0),
            at_longitude(Body::Mercury, day(0), 0.0),
            at_longitude(Body::Venus, day(0), 120.0),
            at_longitude(Body::Mercury, day(1), 0.0),
            at_longitude(Body::Venus, day(1), 60.0),
        ];
        let aspects = detect_aspects(&positions, 1.0);
        let kinds: Vec<AspectKind> = aspects.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![AspectKind::Trine, AspectKind::Sextile, AspectKind::Opposition]
        );
        assert!(aspects.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[rstest]
    #[case(0.0, AspectStrength::Exact)]
    #[case(0.3, AspectStrength::Strong)]
    #[case(1.0, AspectStrength::Strong)]
    #[case(1.01, AspectStrength::Moderate)]
    #[case(3.0, AspectStrength::Moderate)]
    #[case(4.9, AspectStrength::Weak)]
    fn test_strength_cutoffs(#[case] orb: f64, #[case] expected: AspectStrength) {
        assert_eq!(AspectStrength::from_orb(orb), expected);
    }

    #[test]
    fn test_aspect_names_round_trip() {
        for kind in AspectKind::ALL.iter() {
            assert_eq!(AspectKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(AspectKind::from_name("semi-square"), Some(AspectKind::SemiSquare));
        assert_eq!(AspectKind::from_name("None"), None);
    }

    #[test]
    fn test_aspect_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&AspectKind::SemiSextile).unwrap();
        assert_eq!(json, "\"semi-sextile\"");
    }
}
