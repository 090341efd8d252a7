//! Solar system bodies and their mean orbital elements
//!
//! The element table is a static, read-only set of J2000 mean elements. It is
//! good for "medium accuracy" positions only: there are no secular rates and
//! no perturbations.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for planetary lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanetError {
    #[error("Planet not found: {0}")]
    UnknownBody(String),
}

/// Enum representing the bodies carried by the element table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Moon,
}

lazy_static! {
    /// Map from lowercase body names to bodies
    static ref BODY_IDS: HashMap<String, Body> = {
        let mut m = HashMap::new();
        for body in Body::ALL.iter() {
            m.insert(body.name().to_lowercase(), *body);
        }
        m
    };
}

impl Body {
    /// Every body in the element table, in table order
    pub const ALL: [Body; 10] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Moon,
    ];

    /// Get the body's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::Moon => "Moon",
        }
    }

    /// Look up a body by name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> Result<Body, PlanetError> {
        BODY_IDS
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| PlanetError::UnknownBody(name.to_string()))
    }

    /// Inner planets show a full cycle of phases from Earth
    pub fn is_inferior(&self) -> bool {
        matches!(self, Body::Mercury | Body::Venus)
    }

    /// Mean orbital and physical elements for this body
    pub fn elements(&self) -> &'static OrbitalElements {
        match self {
            Body::Mercury => &MERCURY,
            Body::Venus => &VENUS,
            Body::Earth => &EARTH,
            Body::Mars => &MARS,
            Body::Jupiter => &JUPITER,
            Body::Saturn => &SATURN,
            Body::Uranus => &URANUS,
            Body::Neptune => &NEPTUNE,
            Body::Pluto => &PLUTO,
            Body::Moon => &MOON,
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Body::from_name(s)
    }
}

/// Mean Keplerian elements plus descriptive physical data for one body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalElements {
    pub name: &'static str,
    pub symbol: &'static str,
    /// Display color as a `#RRGGBB` hex string
    pub color: &'static str,
    /// Semi-major axis in AU
    pub mean_distance: f64,
    /// Sidereal period in Julian years
    pub period: f64,
    /// Inclination to the ecliptic in degrees
    pub inclination: f64,
    pub eccentricity: f64,
    /// Longitude of perihelion in degrees
    pub longitude_of_perihelion: f64,
    /// Mean longitude at J2000.0 in degrees
    pub mean_longitude: f64,
    /// Mass in Earth masses
    pub mass: f64,
    /// Equatorial diameter in km
    pub diameter: f64,
    pub albedo: f64,
    /// Base visual magnitude at 1 AU
    pub magnitude: f64,
    pub moons: Option<u32>,
    pub discovery_year: Option<i32>,
}

static MERCURY: OrbitalElements = OrbitalElements {
    name: "Mercury",
    symbol: "☿",
    color: "#FFA500",
    mean_distance: 0.387098,
    period: 0.240846,
    inclination: 7.00487,
    eccentricity: 0.205630,
    longitude_of_perihelion: 77.45645,
    mean_longitude: 252.25084,
    mass: 0.055,
    diameter: 4879.0,
    albedo: 0.119,
    magnitude: -0.42,
    moons: None,
    discovery_year: None,
};

static VENUS: OrbitalElements = OrbitalElements {
    name: "Venus",
    symbol: "♀",
    color: "#FFC649",
    mean_distance: 0.723332,
    period: 0.615197,
    inclination: 3.39471,
    eccentricity: 0.006773,
    longitude_of_perihelion: 131.53298,
    mean_longitude: 181.97973,
    mass: 0.815,
    diameter: 12104.0,
    albedo: 0.65,
    magnitude: -4.4,
    moons: None,
    discovery_year: None,
};

static EARTH: OrbitalElements = OrbitalElements {
    name: "Earth",
    symbol: "♁",
    color: "#6B93D6",
    mean_distance: 1.000000,
    period: 1.000000,
    inclination: 0.00000,
    eccentricity: 0.016709,
    longitude_of_perihelion: 102.94719,
    mean_longitude: 100.46435,
    mass: 1.000,
    diameter: 12742.0,
    albedo: 0.367,
    magnitude: -3.86,
    moons: Some(1),
    discovery_year: None,
};

static MARS: OrbitalElements = OrbitalElements {
    name: "Mars",
    symbol: "♂",
    color: "#CD5C5C",
    mean_distance: 1.523688,
    period: 1.880848,
    inclination: 1.85061,
    eccentricity: 0.093405,
    longitude_of_perihelion: 336.04084,
    mean_longitude: 355.45332,
    mass: 0.107,
    diameter: 6779.0,
    albedo: 0.15,
    magnitude: -2.91,
    moons: Some(2),
    discovery_year: None,
};

static JUPITER: OrbitalElements = OrbitalElements {
    name: "Jupiter",
    symbol: "♃",
    color: "#D8CA9D",
    mean_distance: 5.202561,
    period: 11.862615,
    inclination: 1.30530,
    eccentricity: 0.048498,
    longitude_of_perihelion: 14.72813,
    mean_longitude: 34.40438,
    mass: 317.8,
    diameter: 139822.0,
    albedo: 0.52,
    magnitude: -2.94,
    moons: Some(95),
    discovery_year: None,
};

static SATURN: OrbitalElements = OrbitalElements {
    name: "Saturn",
    symbol: "♄",
    color: "#FAD5A5",
    mean_distance: 9.554747,
    period: 29.447498,
    inclination: 2.48446,
    eccentricity: 0.054509,
    longitude_of_perihelion: 92.43194,
    mean_longitude: 49.94432,
    mass: 95.2,
    diameter: 116464.0,
    albedo: 0.47,
    magnitude: -0.55,
    moons: Some(146),
    discovery_year: None,
};

static URANUS: OrbitalElements = OrbitalElements {
    name: "Uranus",
    symbol: "♅",
    color: "#4FD0E7",
    mean_distance: 19.218140,
    period: 84.016846,
    inclination: 0.77446,
    eccentricity: 0.047318,
    longitude_of_perihelion: 170.96424,
    mean_longitude: 313.23218,
    mass: 14.5,
    diameter: 50724.0,
    albedo: 0.51,
    magnitude: 5.38,
    moons: Some(27),
    discovery_year: None,
};

static NEPTUNE: OrbitalElements = OrbitalElements {
    name: "Neptune",
    symbol: "♆",
    color: "#4B70DD",
    mean_distance: 30.110387,
    period: 164.79132,
    inclination: 1.77004,
    eccentricity: 0.008606,
    longitude_of_perihelion: 44.97135,
    mean_longitude: 304.88003,
    mass: 17.1,
    diameter: 49244.0,
    albedo: 0.41,
    magnitude: 7.67,
    moons: Some(16),
    discovery_year: None,
};

static PLUTO: OrbitalElements = OrbitalElements {
    name: "Pluto",
    symbol: "♇",
    color: "#A0522D",
    mean_distance: 39.481686,
    period: 248.0208,
    inclination: 17.14175,
    eccentricity: 0.248808,
    longitude_of_perihelion: 224.06676,
    mean_longitude: 238.92881,
    mass: 0.0022,
    diameter: 2376.0,
    albedo: 0.52,
    magnitude: 13.65,
    moons: Some(5),
    discovery_year: Some(1930),
};

// Geocentric lunar elements treated as if heliocentric, like every other row
static MOON: OrbitalElements = OrbitalElements {
    name: "Moon",
    symbol: "☽",
    color: "#E6E6FA",
    mean_distance: 0.00257,
    period: 0.0748,
    inclination: 5.145,
    eccentricity: 0.0549,
    longitude_of_perihelion: 318.15,
    mean_longitude: 125.08,
    mass: 0.0123,
    diameter: 3474.0,
    albedo: 0.12,
    magnitude: -12.74,
    moons: None,
    discovery_year: None,
};
