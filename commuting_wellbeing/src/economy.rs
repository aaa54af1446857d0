//! Per-city economic facts and synthetic income draws
//!
//! A city's `EconomicProfile` carries the static facts the simulation reads:
//! the monthly consumption floor and five income tiers with average income,
//! income range, rent-income ratio and monthly disposable income. Tiers can
//! be derived from raw city facts (city average income, base rent-income
//! ratio) by scaling the national tier table to the city's income level.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::{DAYS_PER_MONTH, MONTHS_PER_YEAR, WORKDAYS_PER_MONTH, WORK_HOURS_PER_DAY};

// National calibration constants (2022 survey year).
const COUNTRY_AVERAGE_INCOME: f64 = 36_883.0;
const NATIONAL_TIER_AVERAGES: [f64; 5] = [8_601.0, 19_303.0, 30_598.0, 47_397.0, 90_116.0];
const URBAN_POPULATION_M: f64 = 897.578;
const RURAL_POPULATION_M: f64 = 514.597;
const URBAN_RURAL_INCOME_MULTIPLE: f64 = 2.45;

/// Rent-income ratio spread across tiers: poorer tiers spend a larger
/// fraction of income on rent.
const RATIO_STEP_PER_TIER: f64 = 0.01;

/// One of the five income tiers of a city's population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeGroup {
    /// Average annual income of the tier
    pub average_income: f64,
    /// Feasible annual income range [low, high] of the tier
    pub income_range: [f64; 2],
    /// Target fraction of monthly income spent on rent
    pub rent_income_ratio: f64,
    /// Monthly disposable income of the tier
    pub disposable_income_month: f64,
}

/// Per-city static economic facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicProfile {
    /// Minimum monthly consumption of a resident
    pub min_consumption_month: f64,
    /// Income tiers ordered from poorest to richest
    pub groups: Vec<IncomeGroup>,
}

impl EconomicProfile {
    /// Derive the five income tiers from raw city facts.
    ///
    /// The national tier averages are scaled twice: once by the urban/country
    /// income ratio (urban income backed out of the urban-rural split) and
    /// once by the city/country income ratio. Tier ranges are the midpoints
    /// of consecutive tier averages, fenced below by the monthly consumption
    /// floor and above by twice the top tier.
    pub fn from_city_facts(
        average_income: f64,
        min_consumption_month: f64,
        base_rent_income_ratio: f64,
    ) -> SimResult<Self> {
        if average_income <= 0.0 || min_consumption_month <= 0.0 {
            return Err(SimError::Validation(format!(
                "city facts must be positive: average_income={average_income}, \
                 min_consumption_month={min_consumption_month}"
            )));
        }

        let urban_income = ((URBAN_POPULATION_M + RURAL_POPULATION_M) * COUNTRY_AVERAGE_INCOME)
            / (URBAN_POPULATION_M + RURAL_POPULATION_M / URBAN_RURAL_INCOME_MULTIPLE);
        let scale = (average_income / COUNTRY_AVERAGE_INCOME)
            * (urban_income / COUNTRY_AVERAGE_INCOME);

        let tier_averages: Vec<f64> = NATIONAL_TIER_AVERAGES
            .iter()
            .map(|t| (scale * t).trunc())
            .collect();

        // Fence posts for the range midpoints: consumption floor below the
        // bottom tier, twice the top tier above it.
        let mut fence = Vec::with_capacity(tier_averages.len() + 2);
        fence.push(min_consumption_month);
        fence.extend(tier_averages.iter().copied());
        fence.push(2.0 * tier_averages[tier_averages.len() - 1]);

        let mut groups = Vec::with_capacity(tier_averages.len());
        for (i, &average) in tier_averages.iter().enumerate() {
            let lower = if i == 0 {
                (min_consumption_month * MONTHS_PER_YEAR).min(average / 1.2)
            } else {
                (fence[i] + fence[i + 1]) / 2.0
            };
            let upper = (fence[i + 1] + fence[i + 2]) / 2.0;
            let rent_income_ratio =
                base_rent_income_ratio + RATIO_STEP_PER_TIER * (2.0 - i as f64);
            groups.push(IncomeGroup {
                average_income: average,
                income_range: [lower, upper],
                rent_income_ratio,
                disposable_income_month: (average / MONTHS_PER_YEAR).trunc(),
            });
        }

        let profile = EconomicProfile {
            min_consumption_month,
            groups,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Daily consumption floor.
    pub fn min_consumption_daily(&self) -> f64 {
        self.min_consumption_month / DAYS_PER_MONTH
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.min_consumption_month <= 0.0 {
            return Err(SimError::Validation(
                "minimum monthly consumption must be positive".into(),
            ));
        }
        if self.groups.is_empty() {
            return Err(SimError::Validation("profile has no income groups".into()));
        }
        for (i, group) in self.groups.iter().enumerate() {
            let [low, high] = group.income_range;
            if !(low.is_finite() && high.is_finite()) || low <= 0.0 || low >= high {
                return Err(SimError::Validation(format!(
                    "income group {} has invalid range [{low}, {high}]",
                    i + 1
                )));
            }
            if group.average_income <= 0.0 {
                return Err(SimError::Validation(format!(
                    "income group {} has non-positive average income",
                    i + 1
                )));
            }
            if !(0.0..1.0).contains(&group.rent_income_ratio) || group.rent_income_ratio == 0.0 {
                return Err(SimError::Validation(format!(
                    "income group {} has rent-income ratio {} outside (0, 1)",
                    i + 1,
                    group.rent_income_ratio
                )));
            }
            if i > 0 && group.average_income <= self.groups[i - 1].average_income {
                return Err(SimError::Validation(
                    "income group averages must be strictly increasing".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Annual income broken down to the resolutions the day loop needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncomeBreakdown {
    pub annual: f64,
    pub monthly: f64,
    pub daily: f64,
    pub hourly: f64,
}

impl IncomeBreakdown {
    pub fn from_annual(annual: f64) -> Self {
        let monthly = annual / MONTHS_PER_YEAR;
        let daily = monthly / WORKDAYS_PER_MONTH;
        let hourly = daily / WORK_HOURS_PER_DAY;
        IncomeBreakdown {
            annual,
            monthly,
            daily,
            hourly,
        }
    }
}

/// Draw `count` integer-valued annual incomes whose sample mean converges on
/// `average_income`.
///
/// The draw is self-correcting: while the running mean sits above the target
/// the next income is drawn from the low band `[low, average]`, otherwise
/// from the high band `[average, high]`. The caller must supply a range with
/// `low <= average_income <= high`.
pub fn draw_incomes<R: Rng>(
    rng: &mut R,
    income_range: [f64; 2],
    average_income: f64,
    count: usize,
) -> Vec<f64> {
    let mut incomes = Vec::with_capacity(count);
    let mut running_total = 0.0;
    for n in 0..count {
        let above_target = n > 0 && running_total / n as f64 > average_income;
        let (low, high) = if above_target {
            (income_range[0], average_income)
        } else {
            (average_income, income_range[1])
        };
        let draw = rng.gen_range(low as i64..=high as i64) as f64;
        running_total += draw;
        incomes.push(draw);
    }
    incomes
}
