//! Reference frames and coordinate helpers
//!
//! Angles in this crate are carried in degrees. [`ecliptic`] holds the
//! spherical conversions; this module holds the frame descriptors and small
//! angle utilities shared by the position engine and the analyzers.

pub mod ecliptic;

pub use ecliptic::{ecliptic_to_equatorial, Equatorial};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a frame id is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown coordinate system: {0}")]
pub struct UnknownFrame(pub String);

/// Reference center for reported positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    #[default]
    Geocentric,
    Heliocentric,
    Barycentric,
    Topocentric,
}

/// Human readable description of a coordinate system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinateSystemDescriptor {
    pub system: CoordinateSystem,
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub use_case: &'static str,
    pub accuracy: &'static str,
}

/// Every supported coordinate system, in presentation order
pub static COORDINATE_SYSTEMS: [CoordinateSystemDescriptor; 4] = [
    CoordinateSystemDescriptor {
        system: CoordinateSystem::Geocentric,
        id: "geocentric",
        name: "Geocentric",
        description: "Earth-centered coordinates relative to ecliptic",
        use_case: "Earth-based observations, astrology, navigation",
        accuracy: "High precision for terrestrial applications",
    },
    CoordinateSystemDescriptor {
        system: CoordinateSystem::Heliocentric,
        id: "heliocentric",
        name: "Heliocentric",
        description: "Sun-centered coordinates relative to ecliptic",
        use_case: "Solar system dynamics, orbital mechanics",
        accuracy: "Highest precision for solar system modeling",
    },
    CoordinateSystemDescriptor {
        system: CoordinateSystem::Barycentric,
        id: "barycentric",
        name: "Barycentric",
        description: "Solar system barycenter coordinates",
        use_case: "Precise astronomical calculations, JPL ephemeris",
        accuracy: "Highest precision for advanced astronomy",
    },
    CoordinateSystemDescriptor {
        system: CoordinateSystem::Topocentric,
        id: "topocentric",
        name: "Topocentric",
        description: "Observer location-based coordinates",
        use_case: "Local observations, telescope pointing",
        accuracy: "High precision for specific locations",
    },
];

impl CoordinateSystem {
    /// Lowercase identifier, e.g. `"geocentric"`
    pub fn id(&self) -> &'static str {
        self.descriptor().id
    }

    pub fn descriptor(&self) -> &'static CoordinateSystemDescriptor {
        match self {
            CoordinateSystem::Geocentric => &COORDINATE_SYSTEMS[0],
            CoordinateSystem::Heliocentric => &COORDINATE_SYSTEMS[1],
            CoordinateSystem::Barycentric => &COORDINATE_SYSTEMS[2],
            CoordinateSystem::Topocentric => &COORDINATE_SYSTEMS[3],
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CoordinateSystem {
    type Err = UnknownFrame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        COORDINATE_SYSTEMS
            .iter()
            .find(|d| d.id == wanted)
            .map(|d| d.system)
            .ok_or_else(|| UnknownFrame(s.to_string()))
    }
}

/// Reduce an angle in degrees to [0, 360)
pub fn normalize_degrees(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// Unsigned separation between two longitudes, in [0, 180]
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(360.0 - diff)
}

/// Signed shortest step from `from` to `to`, in (-180, 180]
///
/// Positive means prograde (increasing longitude) motion, including across the
/// 360/0 wrap.
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}
