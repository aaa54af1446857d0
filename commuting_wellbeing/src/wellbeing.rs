//! Per-resident consumption, asset and well-being accumulation
//!
//! Folds one resident's year of daily commute outcomes into cumulative
//! state. Two consumption/asset tracks run in parallel: the actual track,
//! charged each day's commute cost and income loss, and a no-rain
//! counterfactual. The daily well-being loss is the utility gap between the
//! counterfactual and actual asset level under isoelastic (CRRA) utility;
//! the reported per-resident total is floored at zero, single days may dip
//! negative.

use crate::commute::DayOutcome;
use crate::economy::IncomeBreakdown;
use crate::{DAYS_PER_MONTH, ModelConfig};

/// Damping applied to every day's utility increment.
const UTILITY_DAMPING_EXPONENT: f64 = -0.1;

/// Everything recorded about one simulated day of one resident.
#[derive(Debug, Clone, Copy)]
pub struct DayRecord {
    pub attenuation: f64,
    pub is_workday: bool,
    pub outcome: DayOutcome,
    pub consumption_today: f64,
    pub consumption_no_rain: f64,
    pub asset_today: f64,
    pub asset_no_rain: f64,
    pub asset_loss_today: f64,
    pub wellbeing_loss_today: f64,
}

/// Totals reported for one resident after the full year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidentTotals {
    /// Utility-based loss, floored at zero
    pub wellbeing_loss: f64,
    pub asset_loss: f64,
    pub time_added: f64,
    pub distance_added: f64,
}

/// Cumulative state for one resident's simulated year.
///
/// Assumes a validated `ModelConfig` (θ ≠ 1 in particular).
pub struct WellbeingAccumulator {
    savings: f64,
    rent_per_day: f64,
    extra_consumption_per_day: f64,
    baseline_disposable: f64,
    income_per_day: f64,
    saving_ratio: f64,
    theta: f64,

    cum_consumption: f64,
    cum_consumption_no_rain: f64,
    wellbeing_loss_sum: f64,
    asset_loss_sum: f64,
    time_added_sum: f64,
    distance_added_sum: f64,
}

impl WellbeingAccumulator {
    pub fn new(
        income: &IncomeBreakdown,
        monthly_rent: f64,
        min_consumption_daily: f64,
        config: &ModelConfig,
    ) -> Self {
        let rent_per_day = monthly_rent / DAYS_PER_MONTH;
        // Rent anchors the rest of the consumption basket: everything that is
        // neither housing nor transportation scales off the housing share.
        let extra_consumption_per_day = rent_per_day / config.residential_share
            * (1.0 - config.residential_share - config.transport_share);

        WellbeingAccumulator {
            savings: 2.0 * income.annual * config.saving_ratio,
            rent_per_day,
            extra_consumption_per_day,
            baseline_disposable: income.daily.max(min_consumption_daily),
            income_per_day: income.daily,
            saving_ratio: config.saving_ratio,
            theta: config.theta,
            cum_consumption: 0.0,
            cum_consumption_no_rain: 0.0,
            wellbeing_loss_sum: 0.0,
            asset_loss_sum: 0.0,
            time_added_sum: 0.0,
            distance_added_sum: 0.0,
        }
    }

    /// Savings the resident starts the year with (two years of income at the
    /// average saving ratio).
    pub fn initial_savings(&self) -> f64 {
        self.savings
    }

    /// Discretionary consumption on a day with no commute losses: what
    /// remains of the disposable baseline after rent and the rest of the
    /// basket, floored at the saving propensity share of daily income.
    fn discretionary(&self) -> f64 {
        (self.baseline_disposable - self.rent_per_day - self.extra_consumption_per_day)
            .max(self.income_per_day * self.saving_ratio)
    }

    fn utility(&self, asset: f64) -> f64 {
        asset.powf(1.0 - self.theta) / (1.0 - self.theta) * UTILITY_DAMPING_EXPONENT.exp()
    }

    /// Fold one day's commute outcome into the twin tracks.
    pub fn record_day(
        &mut self,
        attenuation: f64,
        is_workday: bool,
        outcome: DayOutcome,
    ) -> DayRecord {
        let discretionary = self.discretionary();
        let consumption_today = discretionary - outcome.cost_added - outcome.income_lost;
        let consumption_no_rain = discretionary;

        self.cum_consumption += consumption_today;
        self.cum_consumption_no_rain += consumption_no_rain;

        let asset_today = self.savings + self.cum_consumption;
        let asset_no_rain = self.savings + self.cum_consumption_no_rain;

        let wellbeing_loss_today = self.utility(asset_no_rain) - self.utility(asset_today);
        let asset_loss_today = outcome.asset_loss();

        self.wellbeing_loss_sum += wellbeing_loss_today;
        self.asset_loss_sum += asset_loss_today;
        self.time_added_sum += outcome.time_added;
        self.distance_added_sum += outcome.distance_added;

        DayRecord {
            attenuation,
            is_workday,
            outcome,
            consumption_today,
            consumption_no_rain,
            asset_today,
            asset_no_rain,
            asset_loss_today,
            wellbeing_loss_today,
        }
    }

    /// Reduce the year to the reported totals. The well-being total is
    /// floored at zero; the per-day sum may dip below it.
    pub fn finish(self) -> ResidentTotals {
        ResidentTotals {
            wellbeing_loss: self.wellbeing_loss_sum.max(0.0),
            asset_loss: self.asset_loss_sum,
            time_added: self.time_added_sum,
            distance_added: self.distance_added_sum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_income() -> IncomeBreakdown {
        IncomeBreakdown::from_annual(48_000.0)
    }

    fn accumulator(monthly_rent: f64) -> WellbeingAccumulator {
        WellbeingAccumulator::new(&test_income(), monthly_rent, 40.0, &ModelConfig::baseline())
    }

    #[test]
    fn test_initial_savings_are_two_years_at_saving_ratio() {
        let acc = accumulator(1_200.0);
        assert!((acc.initial_savings() - 2.0 * 48_000.0 * 0.335).abs() < 1e-9);
    }

    #[test]
    fn test_lossless_days_produce_zero_wellbeing_loss() {
        let mut acc = accumulator(1_200.0);
        for day in 0..365 {
            let record = acc.record_day(1.0, day % 7 > 1, DayOutcome::default());
            assert_eq!(record.wellbeing_loss_today, 0.0);
            assert_eq!(record.consumption_today, record.consumption_no_rain);
        }
        let totals = acc.finish();
        assert_eq!(totals.wellbeing_loss, 0.0);
        assert_eq!(totals.asset_loss, 0.0);
        assert_eq!(totals.time_added, 0.0);
        assert_eq!(totals.distance_added, 0.0);
    }

    #[test]
    fn test_commute_losses_charge_consumption_and_assets() {
        let mut acc = accumulator(1_200.0);
        let outcome = DayOutcome {
            cost_added: 30.0,
            income_lost: 12.0,
            time_added: 25.0,
            distance_added: 3.0,
        };
        let record = acc.record_day(0.5, true, outcome);

        assert!((record.consumption_no_rain - record.consumption_today - 42.0).abs() < 1e-10);
        assert!((record.asset_no_rain - record.asset_today - 42.0).abs() < 1e-10);
        assert!((record.asset_loss_today - 42.0).abs() < 1e-10);
        assert!(record.wellbeing_loss_today > 0.0);

        let totals = acc.finish();
        assert!((totals.asset_loss - 42.0).abs() < 1e-10);
        assert!((totals.time_added - 25.0).abs() < 1e-10);
        assert!((totals.distance_added - 3.0).abs() < 1e-10);
        assert!(totals.wellbeing_loss > 0.0);
    }

    #[test]
    fn test_consumption_floor_binds_for_expensive_rent() {
        // Rent high enough that baseline minus basket drops under the
        // saving-propensity floor.
        let acc = accumulator(4_000.0);
        let floor = test_income().daily * 0.335;
        assert!((acc.discretionary() - floor).abs() < 1e-10);
    }

    #[test]
    fn test_consumption_floor_slack_for_cheap_rent() {
        let acc = accumulator(300.0);
        let income = test_income();
        let rent_per_day = 300.0 / 30.0;
        let extra = rent_per_day / 0.24 * (1.0 - 0.24 - 0.13);
        let unfloored = income.daily.max(40.0) - rent_per_day - extra;
        assert!(unfloored > income.daily * 0.335);
        assert!((acc.discretionary() - unfloored).abs() < 1e-10);
    }

    #[test]
    fn test_asset_trajectory_is_savings_plus_cumulative_consumption() {
        let mut acc = accumulator(1_200.0);
        let savings = acc.initial_savings();
        let mut cum = 0.0;
        for _ in 0..10 {
            let record = acc.record_day(1.0, true, DayOutcome::default());
            cum += record.consumption_today;
            assert!((record.asset_today - (savings + cum)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wellbeing_total_floored_at_zero() {
        // A day where rain nets the resident money (driving cheaper than
        // transit) pushes the actual track above the counterfactual; the
        // summed loss goes negative but the reported total cannot.
        let mut acc = accumulator(1_200.0);
        let windfall = DayOutcome {
            cost_added: -20.0,
            income_lost: 0.0,
            time_added: -5.0,
            distance_added: 2.0,
        };
        let record = acc.record_day(0.5, true, windfall);
        assert!(record.wellbeing_loss_today < 0.0);
        let totals = acc.finish();
        assert_eq!(totals.wellbeing_loss, 0.0);
        assert!((totals.asset_loss - -20.0).abs() < 1e-10);
    }

    #[test]
    fn test_identical_tracks_lose_nothing_at_theta_one_point_five() {
        let mut acc = accumulator(1_500.0);
        for day in 0..365 {
            acc.record_day(1.0, day % 7 > 1, DayOutcome::default());
        }
        assert_eq!(acc.finish().wellbeing_loss, 0.0);
    }
}
