//! Phenomena derived from a position series: retrogrades, stations, phases
//!
//! Each analyzer splits the input by body and walks that body's samples in
//! date order. Longitude steps are compared as signed wrapped differences, so
//! crossing 360 -> 0 reads as forward motion rather than a jump backwards.

use crate::aspects::{AspectEvent, AspectStrength};
use crate::coordinates::signed_delta;
use crate::planetlib::Body;
use crate::positions::PlanetPosition;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed interval of apparent backward motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrogradeInterval {
    pub body: Body,
    /// First sample whose longitude had decreased
    pub start: DateTime<Utc>,
    /// First sample whose longitude increased again
    pub end: DateTime<Utc>,
    /// Whole days between start and end, rounded up
    pub duration_days: i64,
}

impl RetrogradeInterval {
    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.start <= *date && *date <= self.end
    }
}

/// Direction label of a station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationKind {
    /// Local maximum: the body was moving forward into the turn
    Direct,
    /// Local minimum: the body was moving backward into the turn
    Retrograde,
}

/// A sample where longitude reaches a local extremum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub body: Body,
    pub date: DateTime<Utc>,
    pub kind: StationKind,
    pub longitude: f64,
}

/// Named illumination band for an inferior planet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseBand {
    New,
    Crescent,
    Quarter,
    Gibbous,
    Full,
}

impl PhaseBand {
    /// Band for a phase angle in degrees, `None` outside [0, 180]
    pub fn from_phase_angle(phase_angle: f64) -> Option<PhaseBand> {
        if !(0.0..=180.0).contains(&phase_angle) {
            return None;
        }
        let band = if phase_angle <= 10.0 {
            PhaseBand::New
        } else if phase_angle <= 80.0 {
            PhaseBand::Crescent
        } else if phase_angle <= 100.0 {
            PhaseBand::Quarter
        } else if phase_angle <= 170.0 {
            PhaseBand::Gibbous
        } else {
            PhaseBand::Full
        };
        Some(band)
    }

    /// Illuminated fraction associated with the band
    pub fn illumination(&self) -> f64 {
        match self {
            PhaseBand::New => 0.0,
            PhaseBand::Crescent => 0.25,
            PhaseBand::Quarter => 0.5,
            PhaseBand::Gibbous => 0.75,
            PhaseBand::Full => 1.0,
        }
    }
}

impl fmt::Display for PhaseBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseObservation {
    pub body: Body,
    pub date: DateTime<Utc>,
    pub phase: PhaseBand,
    pub phase_angle: f64,
    pub illumination: f64,
}

/// Split positions by body (first-seen order) and sort each series by date
fn series_by_body(positions: &[PlanetPosition]) -> Vec<(Body, Vec<&PlanetPosition>)> {
    let mut series: Vec<(Body, Vec<&PlanetPosition>)> = Vec::new();
    for pos in positions {
        match series.iter_mut().find(|(body, _)| *body == pos.body) {
            Some((_, samples)) => samples.push(pos),
            None => series.push((pos.body, vec![pos])),
        }
    }
    for (_, samples) in series.iter_mut() {
        samples.sort_by_key(|p| p.date);
    }
    series
}

fn ceil_days(span: Duration) -> i64 {
    let ms = span.num_milliseconds();
    let day_ms = Duration::days(1).num_milliseconds();
    (ms + day_ms - 1).div_euclid(day_ms)
}

/// Find closed retrograde intervals for every body in the series
///
/// An interval still open at the last sample is not reported.
pub fn find_retrogrades(positions: &[PlanetPosition]) -> Vec<RetrogradeInterval> {
    let mut intervals = Vec::new();
    for (body, samples) in series_by_body(positions) {
        let mut open: Option<DateTime<Utc>> = None;
        for pair in samples.windows(2) {
            let step = signed_delta(pair[0].longitude, pair[1].longitude);
            match open {
                None if step < 0.0 => open = Some(pair[1].date),
                Some(start) if step > 0.0 => {
                    intervals.push(RetrogradeInterval {
                        body,
                        start,
                        end: pair[1].date,
                        duration_days: ceil_days(pair[1].date - start),
                    });
                    open = None;
                }
                _ => {}
            }
        }
    }
    intervals
}

/// Find samples that are strict local extrema of longitude
pub fn find_stations(positions: &[PlanetPosition]) -> Vec<Station> {
    let mut stations = Vec::new();
    for (body, samples) in series_by_body(positions) {
        for triple in samples.windows(3) {
            let before = signed_delta(triple[0].longitude, triple[1].longitude);
            let after = signed_delta(triple[1].longitude, triple[2].longitude);
            let is_max = before > 0.0 && after < 0.0;
            let is_min = before < 0.0 && after > 0.0;
            if is_max || is_min {
                stations.push(Station {
                    body,
                    date: triple[1].date,
                    kind: if before > 0.0 {
                        StationKind::Direct
                    } else {
                        StationKind::Retrograde
                    },
                    longitude: triple[1].longitude,
                });
            }
        }
    }
    stations
}

/// Classify the phase of Mercury and Venus samples; other bodies are ignored
pub fn find_phases(positions: &[PlanetPosition]) -> Vec<PhaseObservation> {
    let mut phases = Vec::new();
    for body in [Body::Mercury, Body::Venus] {
        for pos in positions.iter().filter(|p| p.body == body) {
            if let Some(phase) = PhaseBand::from_phase_angle(pos.phase_angle) {
                phases.push(PhaseObservation {
                    body,
                    date: pos.date,
                    phase,
                    phase_angle: pos.phase_angle,
                    illumination: phase.illumination(),
                });
            }
        }
    }
    phases
}

/// Whether `body` is inside one of the given retrograde intervals at `date`
pub fn is_retrograde_at(intervals: &[RetrogradeInterval], body: Body, date: &DateTime<Utc>) -> bool {
    intervals.iter().any(|r| r.body == body && r.contains(date))
}

/// Severity of an [`Alert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
}

/// Kind of noteworthy condition flagged by [`critical_alerts`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    ExactAspect,
    RetrogradeWarning,
    StationWarning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub count: usize,
    pub message: String,
}

/// Look-ahead window for retrograde alerts
pub const RETROGRADE_ALERT_WINDOW_DAYS: i64 = 7;
/// Look-ahead window for station alerts
pub const STATION_ALERT_WINDOW_DAYS: i64 = 3;

/// Summarise exact aspects and events starting soon after `now`
///
/// Retrogrades and stations count when they begin no later than the look-ahead
/// window past `now`; events already in the past count as well.
pub fn critical_alerts(
    aspects: &[AspectEvent],
    retrogrades: &[RetrogradeInterval],
    stations: &[Station],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let exact = aspects
        .iter()
        .filter(|a| a.strength == AspectStrength::Exact)
        .count();
    if exact > 0 {
        alerts.push(Alert {
            kind: AlertKind::ExactAspect,
            severity: AlertSeverity::High,
            count: exact,
            message: format!("{} exact planetary aspect(s) detected", exact),
        });
    }

    let retro_horizon = now + Duration::days(RETROGRADE_ALERT_WINDOW_DAYS);
    let upcoming_retrogrades = retrogrades.iter().filter(|r| r.start < retro_horizon).count();
    if upcoming_retrogrades > 0 {
        alerts.push(Alert {
            kind: AlertKind::RetrogradeWarning,
            severity: AlertSeverity::Medium,
            count: upcoming_retrogrades,
            message: format!(
                "{} planet(s) entering retrograde soon",
                upcoming_retrogrades
            ),
        });
    }

    let station_horizon = now + Duration::days(STATION_ALERT_WINDOW_DAYS);
    let upcoming_stations = stations.iter().filter(|s| s.date < station_horizon).count();
    if upcoming_stations > 0 {
        alerts.push(Alert {
            kind: AlertKind::StationWarning,
            severity: AlertSeverity::Medium,
            count: upcoming_stations,
            message: format!("{} planet(s) changing direction soon", upcoming_stations),
        });
    }

    alerts
}

/// Look-ahead window for [`upcoming_aspects`]
pub const UPCOMING_ASPECT_WINDOW_DAYS: i64 = 7;
/// Most aspects returned by [`upcoming_aspects`]
pub const MAX_UPCOMING_ASPECTS: usize = 5;

/// The earliest aspects dated from `now` through the look-ahead window
pub fn upcoming_aspects(aspects: &[AspectEvent], now: DateTime<Utc>) -> Vec<AspectEvent> {
    let horizon = now + Duration::days(UPCOMING_ASPECT_WINDOW_DAYS);
    let mut upcoming: Vec<AspectEvent> = aspects
        .iter()
        .filter(|a| a.date >= now && a.date <= horizon)
        .cloned()
        .collect();
    upcoming.sort_by_key(|a| a.date);
    upcoming.truncate(MAX_UPCOMING_ASPECTS);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::detect_aspects;
    use crate::coordinates::CoordinateSystem;
    use crate::positions::compute_body_position;
    use chrono::TimeZone;
    use rstest::rstest;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2014, 1, 1, 0, 0, 0).unwrap()
    }

    fn series(body: Body, longitudes: &[f64]) -> Vec<PlanetPosition> {
        longitudes
            .iter()
            .enumerate()
            .map(|(i, &lon)| {
                let date = t0() + Duration::days(i as i64);
                let mut p = compute_body_position(body, date, CoordinateSystem::Geocentric);
                p.longitude = lon;
                p
            })
            .collect()
    }

    #[test]
    fn test_single_closed_retrograde() {
        let positions = series(Body::Mars, &[10.0, 11.0, 12.0, 11.5, 11.0, 10.8, 11.2, 12.0]);
        let retrogrades = find_retrogrades(&positions);
        assert_eq!(retrogrades.len(), 1);
        let r = &retrogrades[0];
        assert_eq!(r.body, Body::Mars);
        assert_eq!(r.start, t0() + Duration::days(3));
        assert_eq!(r.end, t0() + Duration::days(6));
        assert_eq!(r.duration_days, 3);
    }

    #[test]
    fn test_open_retrograde_is_dropped() {
        let positions = series(Body::Mercury, &[10.0, 11.0, 10.5, 10.0]);
        assert!(find_retrogrades(&positions).is_empty());
    }

    #[test]
    fn test_wrap_is_not_retrograde() {
        let positions = series(Body::Venus, &[358.0, 359.5, 0.8, 2.0]);
        assert!(find_retrogrades(&positions).is_empty());
        assert!(find_stations(&positions).is_empty());
    }

    #[test]
    fn test_retrogrades_sort_each_body() {
        let mut positions = series(Body::Jupiter, &[5.0, 6.0, 5.5, 6.5]);
        positions.reverse();
        positions.extend(series(Body::Saturn, &[1.0, 2.0, 3.0]));
        let retrogrades = find_retrogrades(&positions);
        assert_eq!(retrogrades.len(), 1);
        assert_eq!(retrogrades[0].body, Body::Jupiter);
        assert_eq!(retrogrades[0].start, t0() + Duration::days(2));
    }

    #[test]
    fn test_stations_label_by_incoming_motion() {
        let positions = series(Body::Mars, &[10.0, 12.0, 11.0, 10.0, 11.0]);
        let stations = find_stations(&positions);
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].kind, StationKind::Direct);
        assert_eq!(stations[0].longitude, 12.0);
        assert_eq!(stations[0].date, t0() + Duration::days(1));
        assert_eq!(stations[1].kind, StationKind::Retrograde);
        assert_eq!(stations[1].longitude, 10.0);
    }

    #[test]
    fn test_plateau_is_not_a_station() {
        let positions = series(Body::Mars, &[10.0, 12.0, 12.0, 11.0]);
        assert!(find_stations(&positions).is_empty());
    }

    #[rstest]
    #[case(0.0, PhaseBand::New, 0.0)]
    #[case(10.0, PhaseBand::New, 0.0)]
    #[case(45.0, PhaseBand::Crescent, 0.25)]
    #[case(90.0, PhaseBand::Quarter, 0.5)]
    #[case(150.0, PhaseBand::Gibbous, 0.75)]
    #[case(175.0, PhaseBand::Full, 1.0)]
    fn test_phase_bands(#[case] angle: f64, #[case] band: PhaseBand, #[case] illumination: f64) {
        let got = PhaseBand::from_phase_angle(angle).unwrap();
        assert_eq!(got, band);
        assert_eq!(got.illumination(), illumination);
    }

    #[test]
    fn test_phases_only_for_inferior_planets() {
        let mut positions = series(Body::Mercury, &[0.0, 1.0]);
        positions.extend(series(Body::Mars, &[0.0, 1.0]));
        positions.extend(series(Body::Venus, &[0.0]));
        let phases = find_phases(&positions);
        assert_eq!(phases.len(), 3);
        assert!(phases.iter().all(|p| p.body.is_inferior()));
        assert_eq!(phases[2].body, Body::Venus);
    }

    #[test]
    fn test_is_retrograde_at() {
        let positions = series(Body::Mars, &[10.0, 11.0, 10.0, 9.0, 9.5]);
        let retrogrades = find_retrogrades(&positions);
        assert!(is_retrograde_at(&retrogrades, Body::Mars, &(t0() + Duration::days(3))));
        assert!(!is_retrograde_at(&retrogrades, Body::Mars, &t0()));
        assert!(!is_retrograde_at(&retrogrades, Body::Venus, &(t0() + Duration::days(3))));
    }

    #[test]
    fn test_critical_alerts() {
        let positions = series(Body::Mars, &[10.0, 11.0, 10.0, 9.0, 9.5]);
        let retrogrades = find_retrogrades(&positions);
        let stations = find_stations(&positions);

        let alerts = critical_alerts(&[], &retrogrades, &stations, t0());
        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::RetrogradeWarning, AlertKind::StationWarning]);

        // A month earlier nothing is close enough yet
        let alerts = critical_alerts(&[], &retrogrades, &stations, t0() - Duration::days(30));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_upcoming_aspects_window_and_limit() {
        let mut positions = series(Body::Mercury, &[10.0; 12]);
        positions.extend(series(Body::Venus, &[100.0; 12]));
        let aspects = detect_aspects(&positions, 1.0);
        assert_eq!(aspects.len(), 12);

        let now = t0() + Duration::days(1);
        let upcoming = upcoming_aspects(&aspects, now);
        let dates: Vec<DateTime<Utc>> = upcoming.iter().map(|a| a.date).collect();
        let expected: Vec<DateTime<Utc>> = (1..=5).map(|d| t0() + Duration::days(d)).collect();
        assert_eq!(dates, expected);

        // Only days 9..=11 remain inside the window
        let late = upcoming_aspects(&aspects, t0() + Duration::days(9));
        assert_eq!(late.len(), 3);
        assert!(upcoming_aspects(&aspects, t0() + Duration::days(12)).is_empty());
    }
}
