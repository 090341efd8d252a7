//! Accuracy checks of calculated positions against reference observations
//!
//! Each reference row is matched to the calculated sample of the target body
//! closest in time, provided it lies strictly within the match window.
//! Longitude and latitude are compared separately, so every matched row
//! contributes two [`Discrepancy`] records.

pub mod reference;

pub use reference::{ReferenceDataPoint, REFERENCE_DATA};

use crate::planetlib::Body;
use crate::positions::PlanetPosition;
use chrono::Duration;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Default tolerance in degrees
pub const DEFAULT_TOLERANCE_DEG: f64 = 1.0;
/// Reference rows considered per run
pub const MAX_REFERENCE_POINTS: usize = 100;

/// Which coordinate a discrepancy compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Longitude,
    Latitude,
}

/// One calculated-versus-reference comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Reference date key (`YYYY.MMDD`)
    pub date: String,
    pub body: Body,
    pub quantity: Quantity,
    pub calculated: f64,
    pub reference: f64,
    pub difference: f64,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Percentage of comparisons within tolerance; 0 when nothing was compared
    pub accuracy: f64,
    pub discrepancies: Vec<Discrepancy>,
    pub summary: String,
    /// No calculated positions were supplied
    pub input_empty: bool,
    /// Reference rows beyond the configured limit were ignored
    pub reference_truncated: bool,
}

impl ValidationResult {
    pub fn comparisons(&self) -> usize {
        self.discrepancies.len()
    }

    pub fn within_tolerance(&self) -> usize {
        self.discrepancies
            .iter()
            .filter(|d| d.within_tolerance)
            .count()
    }
}

/// Validator settings
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Allowed absolute difference in degrees
    pub tolerance: f64,
    pub max_reference_points: usize,
    /// Samples must lie strictly closer than this to the reference date
    pub match_window: Duration,
    /// Body whose samples are compared with the planet-1 columns
    pub target: Body,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_DEG,
            max_reference_points: MAX_REFERENCE_POINTS,
            match_window: Duration::hours(24),
            target: Body::Mercury,
        }
    }
}

impl ValidatorConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_reference_points(mut self, max: usize) -> Self {
        self.max_reference_points = max;
        self
    }
}

/// Compares calculated positions with reference rows
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(
        &self,
        positions: &[PlanetPosition],
        reference: &[ReferenceDataPoint],
    ) -> ValidationResult {
        let cfg = &self.config;

        if positions.is_empty() {
            warn!("Validation requested with no calculated positions");
            return ValidationResult {
                accuracy: 0.0,
                discrepancies: Vec::new(),
                summary: "Validation skipped: no calculated positions to compare. \
                          Generate an ephemeris first."
                    .to_string(),
                input_empty: true,
                reference_truncated: false,
            };
        }

        let limit = reference.len().min(cfg.max_reference_points);
        let reference_truncated = limit < reference.len();
        if reference_truncated {
            warn!(
                "Validating only the first {} of {} reference points",
                limit,
                reference.len()
            );
        }

        let candidates: Vec<&PlanetPosition> =
            positions.iter().filter(|p| p.body == cfg.target).collect();
        let window_ms = cfg.match_window.num_milliseconds();

        let mut discrepancies = Vec::new();
        for row in &reference[..limit] {
            let ref_date = match row.instant() {
                Ok(t) => t,
                Err(e) => {
                    warn!("Skipping reference row: {}", e);
                    continue;
                }
            };

            let closest = candidates
                .iter()
                .map(|p| (p, (p.date - ref_date).num_milliseconds().abs()))
                .filter(|(_, diff)| *diff < window_ms)
                .min_by_key(|(_, diff)| *diff)
                .map(|(p, _)| *p);

            let Some(pos) = closest else {
                continue;
            };

            for (quantity, calculated, expected) in [
                (Quantity::Longitude, pos.longitude, row.planet1_longitude),
                (Quantity::Latitude, pos.latitude, row.planet1_latitude),
            ] {
                let difference = (calculated - expected).abs();
                discrepancies.push(Discrepancy {
                    date: row.date.clone(),
                    body: cfg.target,
                    quantity,
                    calculated,
                    reference: expected,
                    difference,
                    within_tolerance: difference <= cfg.tolerance,
                });
            }
        }

        let total = discrepancies.len();
        let within = discrepancies.iter().filter(|d| d.within_tolerance).count();
        let accuracy = if total > 0 {
            within as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        debug!(
            "Validated {} reference rows: {}/{} comparisons within {} deg",
            limit, within, total, cfg.tolerance
        );

        let mut summary = format!("Validation Results: {:.1}% accuracy\n", accuracy);
        summary.push_str(&format!("Total comparisons: {}\n", total));
        summary.push_str(&format!(
            "Within tolerance ({}°): {}\n",
            cfg.tolerance, within
        ));
        summary.push_str(&format!("Outside tolerance: {}", total - within));
        if reference_truncated {
            summary.push_str(&format!(
                "\nNote: Limited to {} comparisons for performance",
                limit
            ));
        }

        ValidationResult {
            accuracy,
            discrepancies,
            summary,
            input_empty: false,
            reference_truncated,
        }
    }
}

/// Validate positions against reference rows with the default settings and
/// the given tolerance in degrees
pub fn validate(
    positions: &[PlanetPosition],
    reference: &[ReferenceDataPoint],
    tolerance: f64,
) -> ValidationResult {
    Validator::new(ValidatorConfig::default().with_tolerance(tolerance)).validate(positions, reference)
}
