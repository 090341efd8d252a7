//! Ecliptic to equatorial conversion at a fixed obliquity

use super::normalize_degrees;
use crate::constants::{DEG2RAD, DEG_PER_HOUR, EARTH_OBLIQUITY_DEG, RAD2DEG};
use serde::{Deserialize, Serialize};

/// Equatorial coordinates (RA/Dec), both in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equatorial {
    /// Right ascension in degrees, [0, 360)
    pub ra: f64,
    /// Declination in degrees, [-90, 90]
    pub dec: f64,
}

impl Equatorial {
    pub fn new(ra: f64, dec: f64) -> Self {
        Equatorial {
            ra: normalize_degrees(ra),
            dec,
        }
    }

    /// Right ascension expressed in hours, [0, 24)
    pub fn ra_hours(&self) -> f64 {
        self.ra / DEG_PER_HOUR
    }
}

/// Rotate ecliptic longitude/latitude (degrees) into right ascension/declination
///
/// Uses the mean obliquity of J2000 without precession or nutation.
pub fn ecliptic_to_equatorial(longitude: f64, latitude: f64) -> Equatorial {
    let eps = EARTH_OBLIQUITY_DEG * DEG2RAD;
    let lon = longitude * DEG2RAD;
    let lat = latitude * DEG2RAD;

    let sin_dec = lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin();
    // Guard asin against rounding just outside [-1, 1]
    let dec = sin_dec.clamp(-1.0, 1.0).asin();

    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());

    Equatorial::new(ra * RAD2DEG, dec * RAD2DEG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_equinox_maps_to_origin() {
        let eq = ecliptic_to_equatorial(0.0, 0.0);
        assert_relative_eq!(eq.ra, 0.0, epsilon = 1e-10);
        assert_relative_eq!(eq.dec, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_solstice_declination_equals_obliquity() {
        let eq = ecliptic_to_equatorial(90.0, 0.0);
        assert_relative_eq!(eq.ra, 90.0, epsilon = 1e-9);
        assert_relative_eq!(eq.dec, EARTH_OBLIQUITY_DEG, epsilon = 1e-9);
        assert_relative_eq!(eq.ra_hours(), 6.0, epsilon = 1e-10);

        let eq = ecliptic_to_equatorial(270.0, 0.0);
        assert_relative_eq!(eq.ra, 270.0, epsilon = 1e-9);
        assert_relative_eq!(eq.dec, -EARTH_OBLIQUITY_DEG, epsilon = 1e-9);
    }

    #[test]
    fn test_ecliptic_pole() {
        // The north ecliptic pole sits at RA 18h, Dec 90 - obliquity
        let eq = ecliptic_to_equatorial(0.0, 90.0);
        assert_relative_eq!(eq.ra, 270.0, epsilon = 1e-6);
        assert_relative_eq!(eq.dec, 90.0 - EARTH_OBLIQUITY_DEG, epsilon = 1e-9);
    }

    #[test]
    fn test_ra_always_normalized() {
        for i in 0..72 {
            let eq = ecliptic_to_equatorial(i as f64 * 5.0, -3.0);
            assert!((0.0..360.0).contains(&eq.ra), "RA out of range: {}", eq.ra);
            assert!(eq.dec.abs() <= 90.0);
        }
    }
}
