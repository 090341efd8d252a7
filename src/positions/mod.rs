//! Position engine: mean elements to apparent positions
//!
//! Positions come from a two-body Keplerian model with fixed J2000 mean
//! elements. The geocentric reduction is coarse (a longitude flip plus a
//! planar law-of-cosines distance), so every result carries
//! [`Accuracy::Medium`].

use crate::constants::{DEG2RAD, JULIAN_YEAR_DAYS};
use crate::coordinates::{
    angular_separation, ecliptic_to_equatorial, normalize_degrees, CoordinateSystem, Equatorial,
};
use crate::planetlib::{Body, OrbitalElements, PlanetError};
use crate::time::{days_since_epoch, julian_date};
use chrono::{DateTime, Utc};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Newton rounds allowed when solving Kepler's equation
pub const KEPLER_MAX_ITERATIONS: usize = 5;
/// Correction (degrees) below which the Kepler solver stops early
pub const KEPLER_TOLERANCE_DEG: f64 = 1e-4;
/// Brightness added at full phase angle (180 degrees)
const PHASE_MAGNITUDE_COEFF: f64 = 0.1;

/// Coarse quality label attached to each computed position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    High,
    Medium,
    Low,
}

/// Position of one body at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    pub body: Body,
    pub date: DateTime<Utc>,
    pub julian_date: f64,
    /// Ecliptic longitude in degrees, [0, 360)
    pub longitude: f64,
    /// Ecliptic latitude in degrees
    pub latitude: f64,
    /// Distance from the frame origin in AU
    pub distance: f64,
    /// Right ascension in degrees, [0, 360)
    pub right_ascension: f64,
    pub declination: f64,
    pub magnitude: f64,
    pub phase_angle: f64,
    pub elongation: f64,
    pub coordinate_system: CoordinateSystem,
    pub accuracy: Accuracy,
}

impl PlanetPosition {
    pub fn equatorial(&self) -> Equatorial {
        Equatorial::new(self.right_ascension, self.declination)
    }

    /// Right ascension in hours
    pub fn right_ascension_hours(&self) -> f64 {
        self.equatorial().ra_hours()
    }
}

/// Heliocentric ecliptic state of a body on its mean orbit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeliocentricState {
    /// Ecliptic longitude in degrees, [0, 360)
    pub longitude: f64,
    /// Ecliptic latitude in degrees
    pub latitude: f64,
    /// Radius vector in AU
    pub radius: f64,
}

impl HeliocentricState {
    /// Projection onto the ecliptic plane, in AU
    fn planar(&self) -> Vector2<f64> {
        let lon = self.longitude * DEG2RAD;
        Vector2::new(self.radius * lon.cos(), self.radius * lon.sin())
    }
}

/// Mean anomaly in degrees, [0, 360), `days` after J2000.0
pub fn mean_anomaly(elements: &OrbitalElements, days: f64) -> f64 {
    let mean_motion = 360.0 / (elements.period * JULIAN_YEAR_DAYS);
    normalize_degrees(elements.mean_longitude + elements.longitude_of_perihelion + mean_motion * days)
}

/// Solve the simplified Kepler iteration for the anomaly, in degrees
///
/// Starts from `M` and applies `ta += (M - ta + e sin ta) / (1 - e cos ta)`
/// with the dimensionless eccentricity, for at most
/// [`KEPLER_MAX_ITERATIONS`] rounds. The estimate is returned whether or not
/// it has converged. The result is used directly as the angle from
/// perihelion.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut anomaly = mean_anomaly;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let rad = anomaly * DEG2RAD;
        let delta =
            (mean_anomaly - anomaly + eccentricity * rad.sin()) / (1.0 - eccentricity * rad.cos());
        anomaly += delta;
        if delta.abs() < KEPLER_TOLERANCE_DEG {
            break;
        }
    }
    anomaly
}

/// Heliocentric position of `body`, `days` after J2000.0
pub fn heliocentric_state(body: Body, days: f64) -> HeliocentricState {
    let el = body.elements();
    let e = el.eccentricity;

    let m = mean_anomaly(el, days);
    let anomaly = solve_kepler(m, e);

    let radius = el.mean_distance * (1.0 - e * (anomaly * DEG2RAD).cos());
    let longitude = normalize_degrees(el.longitude_of_perihelion + anomaly);
    let latitude = el.inclination * ((longitude - el.longitude_of_perihelion) * DEG2RAD).sin();

    HeliocentricState {
        longitude,
        latitude,
        radius,
    }
}

/// Apparent magnitude from base magnitude, distance and phase angle
pub fn apparent_magnitude(elements: &OrbitalElements, distance: f64, phase_angle: f64) -> f64 {
    elements.magnitude + 5.0 * distance.log10() + PHASE_MAGNITUDE_COEFF * phase_angle / 180.0
}

/// Compute the position of a named body
///
/// Fails with [`PlanetError::UnknownBody`] if the name is not in the element
/// table.
pub fn compute_position(
    name: &str,
    date: DateTime<Utc>,
    frame: CoordinateSystem,
) -> Result<PlanetPosition, PlanetError> {
    let body = Body::from_name(name)?;
    Ok(compute_body_position(body, date, frame))
}

/// Compute the position of a body at an instant in the given frame
///
/// Barycentric and topocentric requests are answered with heliocentric
/// values; only the geocentric frame applies a reduction.
pub fn compute_body_position(
    body: Body,
    date: DateTime<Utc>,
    frame: CoordinateSystem,
) -> PlanetPosition {
    let days = days_since_epoch(&date);
    let helio = heliocentric_state(body, days);
    let earth = heliocentric_state(Body::Earth, days);

    let (longitude, distance) = if frame == CoordinateSystem::Geocentric && body != Body::Earth {
        // Coarse reduction: flip the longitude, keep the planar separation
        let distance = (helio.planar() - earth.planar()).norm();
        (normalize_degrees(helio.longitude + 180.0), distance)
    } else {
        (helio.longitude, helio.radius)
    };
    let latitude = helio.latitude;

    let phase_angle = angular_separation(helio.longitude, earth.longitude);
    let elongation = phase_angle;
    let magnitude = apparent_magnitude(body.elements(), helio.radius, phase_angle);
    let eq = ecliptic_to_equatorial(longitude, latitude);

    PlanetPosition {
        body,
        date,
        julian_date: julian_date(&date),
        longitude,
        latitude,
        distance,
        right_ascension: eq.ra,
        declination: eq.dec,
        magnitude,
        phase_angle,
        elongation,
        coordinate_system: frame,
        accuracy: Accuracy::Medium,
    }
}
