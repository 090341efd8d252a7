//! Ephemeris generation over a date range
//!
//! [`generate`] walks from the start instant to the end instant inclusive at a
//! fixed step, computing every requested body at every instant. Unknown body
//! names are dropped up front: each is warned about and recorded once in
//! [`Ephemeris::skipped`], and a request with no known body produces no
//! samples at all. Generation stops at the request's position cap and
//! reports it through [`Ephemeris::limit_reached`].

use crate::aspects::{detect_aspects, AspectEvent, DEFAULT_ORB};
use crate::constants::DAY_MS;
use crate::coordinates::CoordinateSystem;
use crate::planetlib::Body;
use crate::positions::{compute_body_position, PlanetPosition};
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

/// Hard ceiling on positions computed by one request
pub const MAX_POSITIONS: usize = 10_000;
/// Wall-clock budget used by callers that do not pick their own
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Error type for ephemeris runs
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("Ephemeris generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Ephemeris worker failed: {0}")]
    WorkerFailed(String),
}

/// Parameters of one ephemeris run
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRequest {
    /// Body names as supplied by the caller; unknown names are skipped
    pub bodies: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Step between instants in days; fractional steps are allowed
    pub step_days: f64,
    pub frame: CoordinateSystem,
    pub include_aspects: bool,
    /// Orb for aspect detection, in degrees
    pub orb: f64,
    pub max_positions: usize,
}

impl EphemerisRequest {
    /// A request with default step (1 day), frame, orb and cap
    pub fn new<S: AsRef<str>>(bodies: &[S], start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            bodies: bodies.iter().map(|b| b.as_ref().to_string()).collect(),
            start,
            end,
            step_days: 1.0,
            frame: CoordinateSystem::default(),
            include_aspects: true,
            orb: DEFAULT_ORB,
            max_positions: MAX_POSITIONS,
        }
    }

    pub fn with_step_days(mut self, step_days: f64) -> Self {
        self.step_days = step_days;
        self
    }

    pub fn with_frame(mut self, frame: CoordinateSystem) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_aspects(mut self, include_aspects: bool) -> Self {
        self.include_aspects = include_aspects;
        self
    }

    pub fn with_orb(mut self, orb: f64) -> Self {
        self.orb = orb;
        self
    }

    pub fn with_max_positions(mut self, max_positions: usize) -> Self {
        self.max_positions = max_positions;
        self
    }

    /// The step as a duration, or `None` if it is not a usable positive step
    fn step(&self) -> Option<Duration> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return None;
        }
        let ms = (self.step_days * DAY_MS).round();
        if ms < 1.0 {
            return None;
        }
        Duration::try_milliseconds(ms as i64)
    }
}

/// A requested body name that is not in the element table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBody {
    pub name: String,
    /// Start of the requested range
    pub date: DateTime<Utc>,
    pub reason: String,
}

/// Result of an ephemeris run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ephemeris {
    pub positions: Vec<PlanetPosition>,
    pub aspects: Vec<AspectEvent>,
    /// Generation stopped at the position cap before reaching the end date
    pub limit_reached: bool,
    pub skipped: Vec<SkippedBody>,
}

impl Ephemeris {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Generate positions (and optionally aspects) for a request
pub fn generate(request: &EphemerisRequest) -> Ephemeris {
    let Some(step) = request.step() else {
        warn!(
            "Invalid step of {} days; returning an empty ephemeris",
            request.step_days
        );
        return Ephemeris::default();
    };
    if request.end < request.start {
        warn!(
            "End date {} precedes start date {}; returning an empty ephemeris",
            request.end, request.start
        );
        return Ephemeris::default();
    }

    let mut ephemeris = Ephemeris::default();
    let mut bodies: Vec<Body> = Vec::with_capacity(request.bodies.len());
    for name in &request.bodies {
        match Body::from_name(name) {
            Ok(body) => bodies.push(body),
            Err(e) => {
                warn!("Failed to calculate position for {}: {}", name, e);
                ephemeris.skipped.push(SkippedBody {
                    name: name.clone(),
                    date: request.start,
                    reason: e.to_string(),
                });
            }
        }
    }
    if bodies.is_empty() {
        warn!("No known bodies requested; returning an empty ephemeris");
        return ephemeris;
    }

    let mut current = request.start;
    'dates: while current <= request.end {
        for body in &bodies {
            if ephemeris.positions.len() >= request.max_positions {
                ephemeris.limit_reached = true;
                break 'dates;
            }
            ephemeris
                .positions
                .push(compute_body_position(*body, current, request.frame));
        }
        current = match current.checked_add_signed(step) {
            Some(next) => next,
            None => break,
        };
    }

    if ephemeris.limit_reached {
        warn!(
            "Calculation limit reached ({}). Consider reducing date range or increasing step size.",
            request.max_positions
        );
    }

    if request.include_aspects {
        ephemeris.aspects = detect_aspects(&ephemeris.positions, request.orb);
    }

    debug!(
        "Generated {} positions and {} aspects ({} skipped)",
        ephemeris.positions.len(),
        ephemeris.aspects.len(),
        ephemeris.skipped.len()
    );
    ephemeris
}

/// Positional form of [`generate`]
pub fn generate_ephemeris<S: AsRef<str>>(
    bodies: &[S],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step_days: f64,
    frame: CoordinateSystem,
    include_aspects: bool,
    orb: f64,
) -> Ephemeris {
    let request = EphemerisRequest::new(bodies, start, end)
        .with_step_days(step_days)
        .with_frame(frame)
        .with_aspects(include_aspects)
        .with_orb(orb);
    generate(&request)
}

/// Run [`generate`] on a worker thread, giving up after `timeout`
///
/// On timeout the worker is left to finish on its own and its result is
/// dropped. Nothing is retried.
pub fn generate_with_timeout(
    request: EphemerisRequest,
    timeout: std::time::Duration,
) -> Result<Ephemeris, EphemerisError> {
    run_with_timeout(move || generate(&request), timeout)
}

fn run_with_timeout<F>(job: F, timeout: std::time::Duration) -> Result<Ephemeris, EphemerisError>
where
    F: FnOnce() -> Ephemeris + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("ephemeris".to_string())
        .spawn(move || {
            // The receiver is gone after a timeout
            let _ = tx.send(job());
        })
        .map_err(|e| EphemerisError::WorkerFailed(e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(ephemeris) => Ok(ephemeris),
        Err(mpsc::RecvTimeoutError::Timeout) => Err(EphemerisError::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(EphemerisError::WorkerFailed(
            "worker exited without a result".to_string(),
        )),
    }
}
