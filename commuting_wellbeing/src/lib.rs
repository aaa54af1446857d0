//! Rain-Commuting Well-Being Loss ABM
//!
//! Simulates the well-being loss urban commuters suffer when rainfall slows
//! traffic and forces costlier or slower travel choices.
//!
//! Key components:
//! - EconomicProfile: per-city income tiers, rent-income ratios, consumption floor
//! - HousingSelector: rent-window filtering + distance/time/rent weighted draw
//! - Daily commute decision: drive-vs-transit trade-off under speed attenuation
//! - WellbeingAccumulator: twin asset trajectories folded into a CRRA utility loss
//! - PopulationSimulator: synthetic residents per income group per workplace
//!
//! Expected outcomes:
//! - Dry years produce exactly zero losses for every resident
//! - Rainy workdays shift residents to whichever mode minimises fare-plus-time cost
//! - Reported per-resident well-being loss is floored at zero

pub mod attenuation;
pub mod city;
pub mod commute;
pub mod economy;
pub mod error;
pub mod housing;
pub mod output;
pub mod population_simulator;
pub mod wellbeing;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Days in a billing month (rent and consumption are quoted monthly).
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Paid working days in a month.
pub const WORKDAYS_PER_MONTH: f64 = 21.75;

/// Paid working hours in a day.
pub const WORK_HOURS_PER_DAY: f64 = 8.0;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Weights combining the normalized inverse distance/time/rent of each
/// candidate listing into one selection probability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelectionWeights {
    pub distance: f64,
    pub time: f64,
    pub rent: f64,
}

impl SelectionWeights {
    pub fn sum(&self) -> f64 {
        self.distance + self.time + self.rent
    }
}

/// Model configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Synthetic residents per income group per workplace
    pub people_per_group: usize,

    /// CRRA risk-aversion coefficient θ (θ = 1 is a singularity and rejected)
    pub theta: f64,

    /// Hourly wage floor used to price commute time losses
    pub wage_floor_hourly: f64,

    /// Average savings-to-income ratio
    pub saving_ratio: f64,

    /// Share of consumption spent on housing
    pub residential_share: f64,

    /// Share of consumption spent on transportation
    pub transport_share: f64,

    /// Symmetric rent-ratio widening applied per retry when no listing qualifies
    pub widen_step: f64,

    /// Widening retries before a resident is reported unhousable
    pub max_widen_rounds: usize,

    /// Housing draw weights (distance/time/rent)
    pub selection_weights: SelectionWeights,
}

impl ModelConfig {
    /// Baseline configuration from the national survey calibration
    pub fn baseline() -> Self {
        ModelConfig {
            people_per_group: 5000,
            theta: 1.5,
            wage_floor_hourly: 10.0,
            saving_ratio: 0.335,
            residential_share: 0.24,
            transport_share: 0.13,
            widen_step: 0.05,
            max_widen_rounds: 64,
            selection_weights: SelectionWeights {
                distance: 0.4,
                time: 0.4,
                rent: 0.2,
            },
        }
    }

    /// Check parameters before a run. θ = 1 makes the isoelastic utility
    /// denominator vanish and there is no log-utility branch, so it is
    /// rejected outright.
    pub fn validate(&self) -> SimResult<()> {
        if self.people_per_group == 0 {
            return Err(SimError::Config("people_per_group must be at least 1".into()));
        }
        if self.theta == 1.0 {
            return Err(SimError::Config(
                "theta = 1 is a singularity of the isoelastic utility".into(),
            ));
        }
        if !self.theta.is_finite() || self.theta <= 0.0 {
            return Err(SimError::Config(format!(
                "theta must be a positive finite number, got {}",
                self.theta
            )));
        }
        if self.wage_floor_hourly < 0.0 {
            return Err(SimError::Config("wage floor must be non-negative".into()));
        }
        if !(0.0..1.0).contains(&self.saving_ratio) {
            return Err(SimError::Config(format!(
                "saving_ratio must lie in [0, 1), got {}",
                self.saving_ratio
            )));
        }
        if self.residential_share <= 0.0 || self.transport_share < 0.0 {
            return Err(SimError::Config(
                "consumption shares must be positive".into(),
            ));
        }
        if self.residential_share + self.transport_share >= 1.0 {
            return Err(SimError::Config(
                "residential and transport shares must sum below 1".into(),
            ));
        }
        let w = &self.selection_weights;
        if w.distance < 0.0 || w.time < 0.0 || w.rent < 0.0 {
            return Err(SimError::Config("selection weights must be non-negative".into()));
        }
        if (w.sum() - 1.0).abs() > 1e-9 {
            return Err(SimError::Config(format!(
                "selection weights must sum to 1, got {}",
                w.sum()
            )));
        }
        if self.widen_step <= 0.0 {
            return Err(SimError::Config("widen_step must be positive".into()));
        }
        if self.max_widen_rounds == 0 {
            return Err(SimError::Config("max_widen_rounds must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_config_is_valid() {
        let config = ModelConfig::baseline();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_theta_one_rejected() {
        let mut config = ModelConfig::baseline();
        config.theta = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_theta_rejected() {
        let mut config = ModelConfig::baseline();
        config.theta = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_selection_weights_must_sum_to_one() {
        let mut config = ModelConfig::baseline();
        config.selection_weights.rent = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_consumption_shares_must_sum_below_one() {
        let mut config = ModelConfig::baseline();
        config.residential_share = 0.6;
        config.transport_share = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = ModelConfig::baseline();
        let text = toml::to_string(&config).unwrap();
        let parsed: ModelConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.people_per_group, config.people_per_group);
        assert_eq!(parsed.theta, config.theta);
        assert_eq!(parsed.selection_weights.rent, config.selection_weights.rent);
    }

    #[test]
    fn test_partial_toml_falls_back_to_baseline() {
        let parsed: ModelConfig = toml::from_str("theta = 2.0").unwrap();
        assert_eq!(parsed.theta, 2.0);
        assert_eq!(parsed.saving_ratio, ModelConfig::baseline().saving_ratio);
    }
}
