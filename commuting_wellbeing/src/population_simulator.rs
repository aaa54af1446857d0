//! Population orchestration
//!
//! Runs the full simulation for one city: per workplace and income group,
//! draws synthetic incomes, assigns each resident housing through the
//! rent-window draw, then folds the year of daily commute decisions into one
//! result row per resident.
//!
//! Housing assignment is sequential because the running rent-to-income ratio
//! of a group feeds back into the next resident's search window. The year
//! folds are independent per resident and fan out across threads.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::attenuation::is_workday;
use crate::city::{CityData, WorkplaceData};
use crate::commute;
use crate::economy::{draw_incomes, IncomeBreakdown, IncomeGroup};
use crate::error::{SimError, SimResult};
use crate::housing::{HousingSelector, RentalListing};
use crate::wellbeing::WellbeingAccumulator;
use crate::ModelConfig;

/// One simulated resident reduced to a results-table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidentRow {
    pub workplace: String,
    /// Income tier, 1-based
    pub income_group: usize,
    /// Resident sequence number within the tier, 1-based
    pub resident: usize,
    /// Drawn annual income
    pub income: f64,
    pub initial_savings: f64,
    pub listing: RentalListing,
    pub wellbeing_loss: f64,
    pub asset_loss: f64,
    pub time_added: f64,
    pub distance_added: f64,
}

/// A resident after housing assignment, ready for the year fold.
struct ResidentSetup {
    seq: usize,
    income: IncomeBreakdown,
    listing: RentalListing,
}

pub struct PopulationSimulator<'a> {
    config: &'a ModelConfig,
    city: &'a CityData,
}

impl<'a> PopulationSimulator<'a> {
    pub fn new(config: &'a ModelConfig, city: &'a CityData) -> SimResult<Self> {
        config.validate()?;
        city.validate()?;
        Ok(PopulationSimulator { config, city })
    }

    /// Simulate every workplace × income group of the city. Deterministic
    /// given the seed.
    pub fn run(&self, seed: u64) -> SimResult<Vec<ResidentRow>> {
        let mut rows = Vec::new();
        for (w_idx, workplace) in self.city.workplaces.iter().enumerate() {
            for (g_idx, group) in self.city.profile.groups.iter().enumerate() {
                // Each workplace/group pair gets its own derived stream so
                // groups stay reproducible in isolation.
                let group_seed = seed
                    .wrapping_add(w_idx as u64 * 1000)
                    .wrapping_add(g_idx as u64);
                let group_rows = self.run_group(workplace, g_idx, group, group_seed)?;
                log::info!(
                    "{}: workplace {} group {} simulated ({} residents)",
                    self.city.name,
                    workplace.id,
                    g_idx + 1,
                    group_rows.len()
                );
                rows.extend(group_rows);
            }
        }
        Ok(rows)
    }

    fn run_group(
        &self,
        workplace: &WorkplaceData,
        g_idx: usize,
        group: &IncomeGroup,
        seed: u64,
    ) -> SimResult<Vec<ResidentRow>> {
        let mut rng = StdRng::seed_from_u64(seed);

        // A tier whose lower bound sits above its average cannot center a
        // draw; pull the band's floor just under the average instead.
        let income_range = if group.income_range[0] > group.average_income {
            [group.average_income - 100.0, group.income_range[1]]
        } else {
            group.income_range
        };
        let incomes = draw_incomes(
            &mut rng,
            income_range,
            group.average_income,
            self.config.people_per_group,
        );

        let selector = HousingSelector::new(&workplace.listings, self.config);
        let mut running_ratio = 0.0;
        let mut setups = Vec::with_capacity(incomes.len());

        for (p, &annual_income) in incomes.iter().enumerate() {
            let income = IncomeBreakdown::from_annual(annual_income);

            // Steer the group's realized rent burden toward its target: when
            // the running average undershoots, search above the target ratio,
            // otherwise below it.
            let window = if running_ratio < group.rent_income_ratio {
                [group.rent_income_ratio, 1.0]
            } else {
                [0.0, group.rent_income_ratio]
            };

            let listing = match selector.select(&mut rng, annual_income, window) {
                Ok(ix) => workplace.listings[ix].clone(),
                Err(SimError::NoEligibleHousing { rounds, .. }) => {
                    log::warn!(
                        "{}: no eligible housing at workplace {} for income {:.0} \
                         after {} widening rounds, resident skipped",
                        self.city.name,
                        workplace.id,
                        annual_income,
                        rounds
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            running_ratio = (running_ratio * p as f64 + listing.monthly_rent / income.monthly)
                / (p as f64 + 1.0);

            setups.push(ResidentSetup {
                seq: p + 1,
                income,
                listing,
            });
        }

        // The year folds carry no randomness and no cross-resident state.
        Ok(setups
            .into_par_iter()
            .map(|setup| self.simulate_year(&workplace.id, g_idx, setup))
            .collect())
    }

    /// Fold one resident's year of commute decisions into a result row.
    fn simulate_year(&self, workplace_id: &str, g_idx: usize, setup: ResidentSetup) -> ResidentRow {
        let mut accumulator = WellbeingAccumulator::new(
            &setup.income,
            setup.listing.monthly_rent,
            self.city.profile.min_consumption_daily(),
            self.config,
        );
        let initial_savings = accumulator.initial_savings();

        for (day, &attenuation) in self.city.attenuation.values().iter().enumerate() {
            let workday = is_workday(day);
            let outcome = commute::decide(
                attenuation,
                workday,
                &setup.listing,
                setup.income.hourly,
                self.config.wage_floor_hourly,
            );
            accumulator.record_day(attenuation, workday, outcome);
        }

        let totals = accumulator.finish();
        ResidentRow {
            workplace: workplace_id.to_string(),
            income_group: g_idx + 1,
            resident: setup.seq,
            income: setup.income.annual,
            initial_savings,
            listing: setup.listing,
            wellbeing_loss: totals.wellbeing_loss,
            asset_loss: totals.asset_loss,
            time_added: totals.time_added,
            distance_added: totals.distance_added,
        }
    }
}
