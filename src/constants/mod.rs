//! Constants module for astronomical calculations

use std::f64::consts::PI;

// Astronomical distances
/// Astronomical Unit in kilometers
pub const AU_KM: f64 = 149_597_870.700;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Milliseconds in a day
pub const DAY_MS: f64 = 86_400_000.0;
/// Days in a Julian year
pub const JULIAN_YEAR_DAYS: f64 = 365.25;
/// J2000.0 epoch as Julian date
pub const J2000: f64 = 2_451_545.0;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Degrees of right ascension per hour
pub const DEG_PER_HOUR: f64 = 15.0;

// Earth constants
/// Mean obliquity of the ecliptic in degrees (fixed, no precession)
pub const EARTH_OBLIQUITY_DEG: f64 = 23.4393;
