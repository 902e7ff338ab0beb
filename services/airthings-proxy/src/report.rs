//! Dashboard payloads built from vendor samples.
//!
//! Absent sensor values become `0` before rating. A missing reading and a
//! true zero therefore look the same to the dashboard. Levels are echoed in
//! the vendor's own number form, so `612` stays `612` and `21.6` stays `21.6`.

use crate::airthings::RawSample;
use crate::error::DeviceFetchError;
use crate::rating::{Pollutant, Rating};
use serde::Serialize;
use serde_json::Number;
use time::OffsetDateTime;
use time::macros::format_description;

fn level_or_zero(level: Option<&Number>) -> Number {
    level.cloned().unwrap_or_else(|| Number::from(0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedMeasurement {
    pub level: Number,
    pub rating: Rating,
}

impl RatedMeasurement {
    pub fn new(pollutant: Pollutant, level: Option<&Number>) -> Self {
        let level = level_or_zero(level);
        // as_f64 only fails for arbitrary-precision numbers, which are not enabled
        let rating = pollutant.rate(level.as_f64().unwrap_or(f64::NAN));
        Self { level, rating }
    }
}

/// A value shown without a rating (temperature, pressure).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub level: Number,
}

impl Measurement {
    pub fn new(level: Option<&Number>) -> Self {
        Self {
            level: level_or_zero(level),
        }
    }
}

/// Every sensor of a View Plus style device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReading {
    pub humidity: RatedMeasurement,
    pub co2: RatedMeasurement,
    pub radon: RatedMeasurement,
    pub voc: RatedMeasurement,
    pub pm25: RatedMeasurement,
    pub temperature: Measurement,
}

impl FullReading {
    pub fn from_sample(sample: &RawSample) -> Self {
        Self {
            humidity: RatedMeasurement::new(Pollutant::Humidity, sample.humidity.as_ref()),
            co2: RatedMeasurement::new(Pollutant::Co2, sample.co2.as_ref()),
            radon: RatedMeasurement::new(Pollutant::Radon, sample.radon_short_term_avg.as_ref()),
            voc: RatedMeasurement::new(Pollutant::Voc, sample.voc.as_ref()),
            pm25: RatedMeasurement::new(Pollutant::Pm25, sample.pm25.as_ref()),
            temperature: Measurement::new(sample.temp.as_ref()),
        }
    }
}

/// Wave Enhance style device: no radon or particulate sensors, but pressure.
// TODO: map the noise and light sensors once the vendor documents their field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedroomReading {
    pub humidity: RatedMeasurement,
    pub co2: RatedMeasurement,
    pub voc: RatedMeasurement,
    pub temperature: Measurement,
    pub pressure: Measurement,
}

impl BedroomReading {
    pub fn from_sample(sample: &RawSample) -> Self {
        Self {
            humidity: RatedMeasurement::new(Pollutant::Humidity, sample.humidity.as_ref()),
            co2: RatedMeasurement::new(Pollutant::Co2, sample.co2.as_ref()),
            voc: RatedMeasurement::new(Pollutant::Voc, sample.voc.as_ref()),
            temperature: Measurement::new(sample.temp.as_ref()),
            pressure: Measurement::new(sample.pressure.as_ref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleDeviceReport {
    #[serde(flatten)]
    pub reading: FullReading,
    pub timestamp: String,
}

impl SingleDeviceReport {
    pub fn new(sample: &RawSample, built_at: OffsetDateTime) -> Self {
        Self {
            reading: FullReading::from_sample(sample),
            timestamp: format_timestamp(built_at),
        }
    }
}

/// What happened to one device in the dual fetch. `None` means no device id
/// was configured, so nothing was requested.
pub type DeviceOutcome = Option<Result<RawSample, DeviceFetchError>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualDeviceReport {
    pub office: Option<FullReading>,
    pub bedroom: Option<BedroomReading>,
    pub timestamp: String,
}

impl DualDeviceReport {
    /// Failed devices become `null`; they never fail the report.
    pub fn assemble(
        office: DeviceOutcome,
        bedroom: DeviceOutcome,
        built_at: OffsetDateTime,
    ) -> Self {
        Self {
            office: settle("office", office).as_ref().map(FullReading::from_sample),
            bedroom: settle("bedroom", bedroom)
                .as_ref()
                .map(BedroomReading::from_sample),
            timestamp: format_timestamp(built_at),
        }
    }
}

fn settle(room: &'static str, outcome: DeviceOutcome) -> Option<RawSample> {
    match outcome {
        Some(Ok(sample)) => Some(sample),
        Some(Err(e)) => {
            tracing::warn!(room, error = %e, "device fetch failed; reporting null");
            None
        }
        None => {
            tracing::debug!(room, "no device configured");
            None
        }
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-03-05T07:08:09.123Z`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(time::UtcOffset::UTC);
    at.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))
    .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "timestamp formatting failed");
        at.unix_timestamp().to_string()
    })
}
