//! Qualitative bands for indoor air measurements.
//!
//! All thresholds are inclusive. A NaN level fails every comparison and so
//! lands in [`Rating::Poor`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pollutant {
    /// Relative humidity, %.
    Humidity,
    /// Carbon dioxide, ppm.
    Co2,
    /// Radon short-term average, Bq/m³.
    Radon,
    /// Volatile organic compounds, ppb.
    Voc,
    /// Fine particulate matter, µg/m³.
    Pm25,
}

impl Pollutant {
    pub fn rate(self, level: f64) -> Rating {
        match self {
            Pollutant::Humidity => humidity(level),
            Pollutant::Co2 => upper_bounds(level, 800.0, 1000.0),
            Pollutant::Radon => upper_bounds(level, 100.0, 200.0),
            Pollutant::Voc => upper_bounds(level, 250.0, 2000.0),
            Pollutant::Pm25 => upper_bounds(level, 10.0, 25.0),
        }
    }
}

// Humidity is a band, not a ceiling: too dry is as bad as too damp.
fn humidity(level: f64) -> Rating {
    if (30.0..=60.0).contains(&level) {
        Rating::Good
    } else if (25.0..=70.0).contains(&level) {
        Rating::Fair
    } else {
        Rating::Poor
    }
}

fn upper_bounds(level: f64, good_max: f64, fair_max: f64) -> Rating {
    if level <= good_max {
        Rating::Good
    } else if level <= fair_max {
        Rating::Fair
    } else {
        Rating::Poor
    }
}
