//! Ephemeris Table Tool
//!
//! Generates a Keplerian ephemeris for a set of bodies over a date range and
//! prints positions, aspects, retrogrades, stations, phases and alerts.
//! Optionally checks the Mercury samples against the bundled reference data.
//!
//! Usage:
//!   cargo run --bin ephem_table -- --bodies Mercury,Venus --start 2013-11-07 --end 2013-11-12

use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clap::{ArgAction, Parser};
use log::info;
use planetfield::almanac::{
    critical_alerts, find_phases, find_retrogrades, find_stations, is_retrograde_at,
    upcoming_aspects, Alert, PhaseObservation, RetrogradeInterval, Station,
};
use planetfield::aspects::AspectEvent;
use planetfield::constants::AU_KM;
use planetfield::ephemeris::{generate_with_timeout, Ephemeris, EphemerisRequest};
use planetfield::time::calendar;
use planetfield::validation::{ValidationResult, Validator, ValidatorConfig, REFERENCE_DATA};
use planetfield::CoordinateSystem;
use serde::Serialize;

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Ephemeris Table Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generates planetary positions, aspects and phenomena over a date range",
    long_about = None
)]
struct Args {
    /// Comma separated body names
    #[arg(short, long, value_delimiter = ',', default_value = "Mercury,Venus")]
    bodies: Vec<String>,

    /// First date (YYYY-MM-DD, midnight UTC)
    #[arg(short, long, default_value = "2013-11-07")]
    start: String,

    /// Last date, inclusive (YYYY-MM-DD, midnight UTC)
    #[arg(short, long, default_value = "2013-11-12")]
    end: String,

    /// Step between samples in days
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    /// Coordinate system: geocentric, heliocentric, barycentric or topocentric
    #[arg(short, long, default_value = "geocentric")]
    frame: CoordinateSystem,

    /// Aspect orb in degrees
    #[arg(short, long, default_value_t = planetfield::aspects::DEFAULT_ORB)]
    orb: f64,

    /// Skip aspect detection
    #[arg(long, action = ArgAction::SetTrue)]
    no_aspects: bool,

    /// Print the full report as JSON instead of tables
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Compare Mercury samples with the bundled reference observations
    #[arg(long, action = ArgAction::SetTrue)]
    validate: bool,

    /// Validation tolerance in degrees
    #[arg(long, default_value_t = planetfield::validation::DEFAULT_TOLERANCE_DEG)]
    tolerance: f64,

    /// Give up on generation after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

/// Everything the tool derives from one run
#[derive(Serialize)]
struct Report {
    ephemeris: Ephemeris,
    retrogrades: Vec<RetrogradeInterval>,
    stations: Vec<Station>,
    phases: Vec<PhaseObservation>,
    upcoming_aspects: Vec<AspectEvent>,
    alerts: Vec<Alert>,
    validation: Option<ValidationResult>,
}

/// Parse a YYYY-MM-DD argument into midnight UTC
fn parse_day(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date {:?}: {}", s, e))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date {:?}", s))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

fn display_positions(report: &Report) {
    let positions = &report.ephemeris.positions;
    print_section_header(format!("Positions ({} total)", positions.len()).as_str());
    println!(
        "{:<12} {:<9} {:>9} {:>8} {:>9} {:>8} {:>7} {:>14} {:>6}",
        "Date", "Body", "Lon", "Lat", "RA (h)", "Dec", "Dist", "Dist (km)", "Mag"
    );
    for p in positions {
        let retro = if is_retrograde_at(&report.retrogrades, p.body, &p.date) {
            " R"
        } else {
            ""
        };
        println!(
            "{:<12} {:<9} {:>9.4} {:>8.4} {:>9.4} {:>8.4} {:>7.4} {:>14.0} {:>6.2}{}",
            calendar::format_date(p.julian_date),
            p.body.name(),
            p.longitude,
            p.latitude,
            p.right_ascension_hours(),
            p.declination,
            p.distance,
            p.distance * AU_KM,
            p.magnitude,
            retro
        );
    }
}

fn display_aspects(ephemeris: &Ephemeris) {
    if ephemeris.aspects.is_empty() {
        println!("\nNo aspects found.");
        return;
    }
    print_section_header(format!("Aspects ({} total)", ephemeris.aspects.len()).as_str());
    for a in &ephemeris.aspects {
        println!(
            "{}  {} {} {}  sep {:.2} orb {:.2} ({:?})",
            a.date.format("%Y-%m-%d"),
            a.body1,
            a.kind,
            a.body2,
            a.angle,
            a.orb,
            a.strength
        );
    }
}

fn display_phenomena(report: &Report) {
    if !report.retrogrades.is_empty() {
        print_section_header("Retrograde Periods");
        for r in &report.retrogrades {
            println!(
                "{:<9} {} -> {} ({} days)",
                r.body.name(),
                r.start.format("%Y-%m-%d"),
                r.end.format("%Y-%m-%d"),
                r.duration_days
            );
        }
    }

    if !report.stations.is_empty() {
        print_section_header("Stations");
        for s in &report.stations {
            println!(
                "{:<9} {} {:?} at {:.4}",
                s.body.name(),
                s.date.format("%Y-%m-%d"),
                s.kind,
                s.longitude
            );
        }
    }

    if !report.phases.is_empty() {
        print_section_header("Phases");
        for p in &report.phases {
            println!(
                "{:<9} {} {:<9} phase angle {:>7.2} illumination {:.2}",
                p.body.name(),
                p.date.format("%Y-%m-%d"),
                p.phase.to_string(),
                p.phase_angle,
                p.illumination
            );
        }
    }

    if !report.upcoming_aspects.is_empty() {
        print_section_header("Upcoming Aspects");
        for a in &report.upcoming_aspects {
            println!("{}  {} {} {}", a.date.format("%Y-%m-%d"), a.body1, a.kind, a.body2);
        }
    }

    if !report.alerts.is_empty() {
        print_section_header("Alerts");
        for a in &report.alerts {
            println!("[{:?}] {}", a.severity, a.message);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = parse_day(&args.start)?;
    let end = parse_day(&args.end)?;

    let request = EphemerisRequest::new(&args.bodies, start, end)
        .with_step_days(args.step)
        .with_frame(args.frame)
        .with_aspects(!args.no_aspects)
        .with_orb(args.orb);

    let start_time = Instant::now();
    let ephemeris = generate_with_timeout(request, Duration::from_secs(args.timeout_secs))?;
    info!(
        "Generated {} positions in {:.2?}",
        ephemeris.positions.len(),
        start_time.elapsed()
    );

    let retrogrades = find_retrogrades(&ephemeris.positions);
    let stations = find_stations(&ephemeris.positions);
    let phases = find_phases(&ephemeris.positions);
    let now = Utc::now();
    let upcoming = upcoming_aspects(&ephemeris.aspects, now);
    let alerts = critical_alerts(&ephemeris.aspects, &retrogrades, &stations, now);
    let validation = if args.validate {
        let config = ValidatorConfig::default().with_tolerance(args.tolerance);
        Some(Validator::new(config).validate(&ephemeris.positions, &REFERENCE_DATA))
    } else {
        None
    };

    let report = Report {
        ephemeris,
        retrogrades,
        stations,
        phases,
        upcoming_aspects: upcoming,
        alerts,
        validation,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Ephemeris for {} from {} to {} ({} frame, step {} d)",
        args.bodies.join(", "),
        args.start,
        args.end,
        args.frame,
        args.step
    );
    println!("-------------------------------------------------------");

    display_positions(&report);
    display_aspects(&report.ephemeris);
    display_phenomena(&report);

    if !report.ephemeris.skipped.is_empty() {
        print_section_header("Skipped");
        for s in &report.ephemeris.skipped {
            println!("{} on {}: {}", s.name, s.date.format("%Y-%m-%d"), s.reason);
        }
    }
    if report.ephemeris.limit_reached {
        println!("\nCalculation limit reached; output truncated.");
    }

    if let Some(validation) = &report.validation {
        print_section_header("Validation");
        println!("{}", validation.summary);
    }

    Ok(())
}
