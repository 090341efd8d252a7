//! Bundled Mercury/Venus reference observations, November 2013 to February 2014

use crate::aspects::AspectKind;
use crate::time::{parse_reference_date, TimeError};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// One reference row: a `YYYY.MMDD` date key and two bodies' ecliptic
/// longitude/latitude pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDataPoint {
    pub date: String,
    pub planet1_longitude: f64,
    pub planet1_latitude: f64,
    pub planet2_longitude: f64,
    pub planet2_latitude: f64,
    /// Observed aspect; `None` where the source recorded none
    pub aspect: Option<AspectKind>,
}

impl ReferenceDataPoint {
    /// The row's date as midnight UTC
    pub fn instant(&self) -> Result<DateTime<Utc>, TimeError> {
        parse_reference_date(&self.date)
    }
}

fn point(date: &str, lon: f64, lat: f64, aspect: Option<AspectKind>) -> ReferenceDataPoint {
    ReferenceDataPoint {
        date: date.to_string(),
        planet1_longitude: lon,
        planet1_latitude: lat,
        planet2_longitude: lon,
        planet2_latitude: lat,
        aspect,
    }
}

lazy_static! {
    /// The Mercury (planet 1) / Venus (planet 2) reference rows
    pub static ref REFERENCE_DATA: Vec<ReferenceDataPoint> = {
        use AspectKind::{Opposition, Trine};

        vec![
            point("2013.1107", 264.2152, 84.8152, None),
            point("2013.1109", 264.2152, 84.8152, Some(Opposition)),
            point("2013.1110", 264.2152, 84.8152, Some(Opposition)),
            point("2013.1111", 264.2152, 84.8152, Some(Opposition)),
            point("2013.1112", 264.2152, 84.8152, Some(Opposition)),
            point("2013.1203", 264.2152, 84.8152, Some(Trine)),
            point("2013.1204", 264.2152, 84.8152, Some(Trine)),
            point("2013.1205", 264.2152, 84.8152, Some(Trine)),
            point("2013.1206", 264.2152, 84.8152, Some(Trine)),
            point("2014.0120", 17.5844, 302.9051, None),
            point("2014.0203", 74.8766, 0.1973, None),
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::format_reference_date;

    #[test]
    fn test_fixture_dates_parse_and_are_ordered() {
        let data = &*REFERENCE_DATA;
        assert_eq!(data.len(), 11);

        let instants: Vec<DateTime<Utc>> = data.iter().map(|p| p.instant().unwrap()).collect();
        assert!(instants.windows(2).all(|w| w[0] < w[1]));
        for (p, t) in data.iter().zip(instants.iter()) {
            assert_eq!(format_reference_date(t), p.date);
        }
    }

    #[test]
    fn test_fixture_aspect_labels() {
        let data = &*REFERENCE_DATA;
        let oppositions = data
            .iter()
            .filter(|p| p.aspect == Some(AspectKind::Opposition))
            .count();
        let trines = data
            .iter()
            .filter(|p| p.aspect == Some(AspectKind::Trine))
            .count();
        assert_eq!(oppositions, 4);
        assert_eq!(trines, 4);
        assert_eq!(data.iter().filter(|p| p.aspect.is_none()).count(), 3);
    }
}
