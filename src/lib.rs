//! Planetfield: Keplerian planetary ephemerides, aspects and phenomena
//!
//! This crate computes approximate positions of the major planets, Pluto and
//! the Moon from fixed J2000 mean orbital elements, walks date ranges into
//! ephemeris tables, detects angular aspects between bodies, derives
//! retrograde intervals, stations and phases, and checks results against a
//! bundled set of reference observations.

use thiserror::Error;

pub mod almanac;
pub mod aspects;
pub mod constants;
pub mod coordinates;
pub mod ephemeris;
pub mod planetlib;
pub mod positions;
pub mod time;
pub mod validation;

// Re-export commonly used types
pub use almanac::{find_phases, find_retrogrades, find_stations};
pub use aspects::{detect_aspects, AspectEvent, AspectKind};
pub use coordinates::{CoordinateSystem, COORDINATE_SYSTEMS};
pub use ephemeris::{generate, generate_ephemeris, generate_with_timeout, Ephemeris, EphemerisRequest};
pub use planetlib::{Body, OrbitalElements};
pub use positions::{compute_body_position, compute_position, PlanetPosition};
pub use validation::{validate, ValidationResult, Validator, ValidatorConfig, REFERENCE_DATA};

/// Main error type for the planetfield library
#[derive(Debug, Error)]
pub enum PlanetfieldError {
    #[error(transparent)]
    Planet(#[from] planetlib::PlanetError),

    #[error(transparent)]
    Time(#[from] time::TimeError),

    #[error(transparent)]
    Frame(#[from] coordinates::UnknownFrame),

    #[error(transparent)]
    Ephemeris(#[from] ephemeris::EphemerisError),
}

/// Result type for planetfield operations
pub type Result<T> = std::result::Result<T, PlanetfieldError>;
