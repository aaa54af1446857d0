//! Daily speed-attenuation series and the workday calendar
//!
//! One multiplier per calendar day: 1.0 (or above) means traffic moves at
//! full speed, values below 1 model rain-slowed traffic. The series length
//! fixes the simulated horizon, normally one calendar year.

use crate::error::{SimError, SimResult};

/// Precomputed per-day speed multipliers for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedAttenuationSeries {
    values: Vec<f64>,
}

impl SpeedAttenuationSeries {
    /// Wrap a per-day multiplier sequence. Every value must be finite and
    /// strictly positive; the day loop divides by it.
    pub fn new(values: Vec<f64>) -> SimResult<Self> {
        if values.is_empty() {
            return Err(SimError::Validation("attenuation series is empty".into()));
        }
        for (day, &v) in values.iter().enumerate() {
            if !v.is_finite() || v <= 0.0 {
                return Err(SimError::Validation(format!(
                    "attenuation on day {day} must be finite and positive, got {v}"
                )));
            }
        }
        Ok(SpeedAttenuationSeries { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Whether a day index falls on a workday. The series starts on a weekend:
/// day indices 0 and 1 of every 7-day week are rest days.
pub fn is_workday(day_index: usize) -> bool {
    day_index % 7 > 1
}
