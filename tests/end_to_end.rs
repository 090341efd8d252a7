use std::time::Duration as StdDuration;

use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use planetfield::almanac::{critical_alerts, find_retrogrades, find_stations, StationKind};
use planetfield::ephemeris::MAX_POSITIONS;
use planetfield::time::parse_reference_date;
use planetfield::{
    compute_body_position, detect_aspects, generate, generate_ephemeris, generate_with_timeout,
    validate, Body, CoordinateSystem, EphemerisRequest, PlanetPosition, REFERENCE_DATA,
};

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

#[test]
fn test_mercury_venus_week() {
    let eph = generate_ephemeris(
        &["Mercury", "Venus"],
        date(2013, 11, 7),
        date(2013, 11, 12),
        1.0,
        CoordinateSystem::Geocentric,
        true,
        5.0,
    );

    assert_eq!(eph.positions.len(), 12);
    assert!(!eph.limit_reached);
    assert!(eph.aspects.iter().all(|a| a.orb <= 5.0));
    assert!(eph
        .aspects
        .iter()
        .all(|a| (a.body1, a.body2) == (Body::Mercury, Body::Venus)));

    for p in &eph.positions {
        assert!((0.0..360.0).contains(&p.longitude));
        assert!((0.0..360.0).contains(&p.right_ascension));
        assert!(p.distance > 0.0);
        assert_eq!(p.coordinate_system, CoordinateSystem::Geocentric);
    }

    // Positions are a pure function of (body, instant, frame)
    let again = compute_body_position(Body::Venus, date(2013, 11, 9), CoordinateSystem::Geocentric);
    assert_eq!(eph.positions[5], again);
}

#[test]
fn test_cap_gives_exactly_max_positions() {
    let names: Vec<&str> = Body::ALL.iter().map(|b| b.name()).collect();
    let start = date(2020, 1, 1);
    let request = EphemerisRequest::new(&names, start, start + Duration::days(1000)).with_aspects(false);

    let eph = generate(&request);
    assert_eq!(eph.positions.len(), MAX_POSITIONS);
    assert!(eph.limit_reached);
}

#[test]
fn test_frames_differ_only_where_reduced() {
    let t = date(2014, 1, 20);
    let helio = compute_body_position(Body::Mars, t, CoordinateSystem::Heliocentric);
    let bary = compute_body_position(Body::Mars, t, CoordinateSystem::Barycentric);
    let geo = compute_body_position(Body::Mars, t, CoordinateSystem::Geocentric);

    assert_relative_eq!(helio.longitude, bary.longitude);
    assert_relative_eq!(helio.distance, bary.distance);
    assert_relative_eq!(
        geo.longitude,
        (helio.longitude + 180.0).rem_euclid(360.0),
        epsilon = 1e-9
    );
}

#[test]
fn test_validation_against_bundled_reference() {
    let eph = generate_ephemeris(
        &["Mercury", "Venus"],
        date(2013, 11, 7),
        date(2014, 2, 3),
        1.0,
        CoordinateSystem::Geocentric,
        false,
        5.0,
    );
    let result = validate(&eph.positions, &REFERENCE_DATA, 1.0);

    // Every reference day has a Mercury sample at its midnight
    assert_eq!(result.comparisons(), 2 * REFERENCE_DATA.len());
    assert!((0.0..=100.0).contains(&result.accuracy));
    assert!(!result.input_empty);
    assert!(!result.reference_truncated);
    assert!(result.summary.contains("Total comparisons: 22"));

    let empty = validate(&[], &REFERENCE_DATA, 1.0);
    assert_eq!(empty.accuracy, 0.0);
    assert!(empty.input_empty);
}

#[test]
fn test_perfect_reference_match() {
    let t = parse_reference_date("2013.1107").unwrap();
    let mut p = compute_body_position(Body::Mercury, t, CoordinateSystem::Geocentric);
    p.longitude = REFERENCE_DATA[0].planet1_longitude;
    p.latitude = REFERENCE_DATA[0].planet1_latitude;

    let result = validate(&[p], &REFERENCE_DATA[..1], 1.0);
    assert_eq!(result.accuracy, 100.0);
    assert!(result.discrepancies.iter().all(|d| d.difference == 0.0));
}

fn synthetic_series(longitudes: &[f64]) -> Vec<PlanetPosition> {
    longitudes
        .iter()
        .enumerate()
        .map(|(i, lon)| {
            let t = date(2014, 1, 1) + Duration::days(i as i64);
            let mut p = compute_body_position(Body::Mercury, t, CoordinateSystem::Geocentric);
            p.longitude = *lon;
            p
        })
        .collect()
}

#[test]
fn test_rise_fall_rise_series() {
    let positions = synthetic_series(&[10.0, 12.0, 11.0, 9.0, 10.0, 12.0]);

    let retrogrades = find_retrogrades(&positions);
    assert_eq!(retrogrades.len(), 1);
    assert_eq!(retrogrades[0].start, date(2014, 1, 3));
    assert_eq!(retrogrades[0].end, date(2014, 1, 5));
    assert_eq!(retrogrades[0].duration_days, 2);

    let stations = find_stations(&positions);
    let kinds: Vec<StationKind> = stations.iter().map(|s| s.kind).collect();
    assert_eq!(kinds, vec![StationKind::Direct, StationKind::Retrograde]);

    let alerts = critical_alerts(&[], &retrogrades, &stations, date(2014, 1, 1));
    assert_eq!(alerts.len(), 2);
}

#[test]
fn test_wrap_is_not_retrograde() {
    let positions = synthetic_series(&[357.0, 359.0, 1.0, 3.0]);
    assert!(find_retrogrades(&positions).is_empty());
    assert!(find_stations(&positions).is_empty());
}

#[test]
fn test_aspects_recomputed_from_positions() {
    let request = EphemerisRequest::new(&["Sun", "Mars", "Jupiter", "Saturn"], date(2020, 1, 1), date(2020, 6, 30))
        .with_orb(3.0);
    let eph = generate(&request);

    // "Sun" is not in the element table
    assert_eq!(eph.skipped.len(), 1);
    assert_eq!(eph.skipped[0].name, "Sun");
    assert_eq!(eph.positions.len(), 3 * 182);
    assert_eq!(eph.aspects, detect_aspects(&eph.positions, 3.0));
}

#[test]
fn test_worker_result_matches_direct_generation() {
    let request = EphemerisRequest::new(&["Mercury", "Venus", "Mars"], date(2020, 1, 1), date(2020, 3, 1));
    let eph = generate_with_timeout(request.clone(), StdDuration::from_secs(60)).unwrap();
    assert_eq!(eph, generate(&request));
}
