//! Core projection engine for yearly household cash flow projections

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assumptions::Assumptions;
use crate::household::{SimulationParameters, REFERENCE_START_YEAR};
use crate::MAN_YEN;

use super::portfolio::{BufferPolicy, GrowthRates};
use super::records::{ProjectionResult, YearRecord};
use super::schedule::expenses_for;
use super::state::ProjectionState;
use super::timeline::Timeline;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// First simulated calendar year
    pub start_year: i32,

    /// Years simulated past the start year at minimum
    pub min_horizon_years: i32,

    /// Age at which a child's costs end; the horizon covers every child's
    pub graduation_age: i32,

    /// Inclusive child ages during which a boarding child gets the allowance
    pub boarding_ages: (i32, i32),

    /// Retirement contributions stop at this head age
    pub contribution_end_age: i32,

    /// Extra months of mortgage payments assumed before the start year
    pub origination_offset_months: i32,

    /// Seed for the rate path; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            start_year: REFERENCE_START_YEAR,
            min_horizon_years: 45,
            graduation_age: 23,
            boarding_ages: (18, 21),
            contribution_end_age: 60,
            origination_offset_months: 3,
            seed: None,
        }
    }
}

impl ProjectionConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    pub fn timeline(&self, params: &SimulationParameters) -> Timeline {
        Timeline::build(
            &params.household,
            self.config.start_year,
            self.config.min_horizon_years,
            self.config.graduation_age,
        )
    }

    /// Run a projection, seeding the rate path from the config
    pub fn project(&self, params: &SimulationParameters) -> ProjectionResult {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.project_with_rng(params, &mut rng)
    }

    /// Run a projection drawing rate moves from `rng`
    pub fn project_with_rng<R: Rng + ?Sized>(&self, params: &SimulationParameters, rng: &mut R) -> ProjectionResult {
        let timeline = self.timeline(params);
        info!(
            "Projecting {}-{} ({} years), rate scenario {}",
            timeline.start_year,
            timeline.end_year,
            timeline.len(),
            params.mortgage.rate_scenario.label()
        );

        let mut result = ProjectionResult::new(timeline.start_year, params.assets.buffer_target);
        let mut state = ProjectionState::from_parameters(
            params,
            timeline.start_year,
            self.config.origination_offset_months,
        );

        for year in timeline.years() {
            debug_assert_eq!(state.year, year);
            let record = self.calculate_year(params, &mut state, rng);
            result.add_record(record);
            state.advance_year();
        }

        result.insolvency_year = state.insolvency_year;
        result.min_assets_year = state.min_assets_year;
        result.min_assets_value = state.min_assets / MAN_YEN;

        let summary = result.summary();
        info!(
            "Projection complete: worst year {} ({:.0} man-yen), final net assets {:.0} man-yen",
            summary.min_assets_year, summary.min_assets_value, summary.final_net_assets
        );
        result
    }

    /// Simulate one year and advance the carry-state's balances
    fn calculate_year<R: Rng + ?Sized>(
        &self,
        params: &SimulationParameters,
        state: &mut ProjectionState,
        rng: &mut R,
    ) -> YearRecord {
        let mut record = YearRecord::new(state.year, state.elapsed);
        record.head_age = state.head_age;
        record.child_ages = params
            .household
            .children
            .iter()
            .map(|c| c.age_in(state.year))
            .collect();

        // Income and non-mortgage spending (man-yen)
        let income = state.income.income_for(&params.income, state.head_age, state.elapsed);
        let expenses = expenses_for(
            &self.assumptions.costs,
            &params.household,
            &params.living,
            self.config.boarding_ages,
            state.year,
            state.elapsed,
        );

        // Retirement account first: contribution plus mid-year growth
        let rates = GrowthRates::from_assets(&params.assets);
        let contribution = if state.head_age < self.config.contribution_end_age {
            params.assets.retirement_monthly_contribution * 12.0 * MAN_YEN
        } else {
            0.0
        };
        state
            .portfolio
            .contribute_retirement(contribution, rates.retirement_savings());

        // Mortgage year; the first year keeps the opening rate
        let mortgage = state
            .mortgage
            .advance_year(&params.mortgage, state.year, state.elapsed > 0, rng);

        let net_cash_flow =
            income.total() * MAN_YEN - (expenses.total() * MAN_YEN + mortgage.payment) - contribution;

        state.portfolio.apply_growth(&rates);
        state.portfolio.apply_cash_flow(net_cash_flow);

        let action = state
            .portfolio
            .rebalance_buffer(&BufferPolicy::from_assets(&params.assets));
        if action.exhausted() && state.portfolio.cash < 0.0 && state.mark_insolvent() {
            warn!(
                "Cash short by {:.0} man-yen in {} with every liquidation source exhausted",
                -state.portfolio.cash / MAN_YEN,
                state.year
            );
        }

        let total_assets = state.portfolio.total();
        state.track_minimum(total_assets);

        // Fill the record (man-yen)
        record.labor_income = income.labor;
        record.partner_income = income.partner;
        record.pension = income.pension;
        record.income = income.total();

        record.education = expenses.education;
        record.rearing = expenses.rearing;
        record.boarding = expenses.boarding;
        record.living = expenses.living;
        record.non_mortgage_expense = expenses.total();

        record.mortgage_payment = mortgage.payment / MAN_YEN;
        record.mortgage_balance = mortgage.balance / MAN_YEN;
        record.applied_rate = mortgage.applied_rate;

        record.retirement_contribution = contribution / MAN_YEN;
        record.net_cash_flow = net_cash_flow / MAN_YEN;
        record.buffer_transfer = action.cash_transfer() / MAN_YEN;

        let balances = state.portfolio.in_man_yen();
        record.cash = balances.cash;
        record.domestic = balances.domestic;
        record.foreign_cash = balances.foreign_cash;
        record.foreign_bond = balances.foreign_bond;
        record.foreign_stock = balances.foreign_stock;
        record.retirement_savings = balances.retirement_savings;
        record.total_assets = balances.total();
        record.net_assets = record.total_assets - record.mortgage_balance;

        debug!(
            "{}: age {}, income {:.1}, outflow {:.1}, cash {:.1}, total {:.1}, loan {:.1}",
            record.year,
            record.head_age,
            record.income,
            record.total_outflow(),
            record.cash,
            record.total_assets,
            record.mortgage_balance
        );

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::Child;
    use crate::assumptions::EducationTrack;
    use crate::projection::RateScenario;
    use approx::assert_relative_eq;

    fn engine(seed: u64) -> ProjectionEngine {
        ProjectionEngine::new(Assumptions::reference(), ProjectionConfig::with_seed(seed))
    }

    #[test]
    fn test_reference_projection_runs() {
        let params = SimulationParameters::default();
        let result = engine(1).project(&params);

        assert_eq!(result.records.len(), 46);
        assert_eq!(result.records[0].year, 2025);
        assert_eq!(result.records[45].year, 2070);
        assert_eq!(result.records[0].head_age, 38);
        assert_eq!(result.records[0].child_ages, vec![0]);

        // Re-employment at 60 (elapsed 22)
        assert_relative_eq!(result.records[21].labor_income, 1050.0 * 1.015_f64.powi(21), max_relative = 1e-12);
        assert_eq!(result.records[22].labor_income, result.records[21].labor_income * 0.6);

        // Contributions stop at 60
        assert_eq!(result.records[21].retirement_contribution, 36.0);
        assert_eq!(result.records[22].retirement_contribution, 0.0);

        // Mortgage is paid off by its payoff year and stays paid off
        let payoff = result.record_for(2059).map(|r| r.mortgage_balance);
        assert_eq!(payoff, Some(0.0));
        assert!(result.records.iter().filter(|r| r.year > 2059).all(|r| r.mortgage_payment == 0.0));
    }

    #[test]
    fn test_totals_and_net_assets_consistent() {
        let result = engine(5).project(&SimulationParameters::default());
        for r in &result.records {
            let sum = r.cash + r.domestic + r.foreign_cash + r.foreign_bond + r.foreign_stock + r.retirement_savings;
            assert_relative_eq!(r.total_assets, sum, max_relative = 1e-12);
            assert_relative_eq!(r.net_assets, r.total_assets - r.mortgage_balance, max_relative = 1e-12, epsilon = 1e-9);
            assert!(r.domestic >= 0.0 && r.foreign_bond >= 0.0 && r.foreign_stock >= 0.0);
        }

        let min = result
            .records
            .iter()
            .map(|r| r.total_assets)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(result.min_assets_value, min, max_relative = 1e-12);
        let min_record = result.record_for(result.min_assets_year).map(|r| r.total_assets);
        assert_relative_eq!(min_record.unwrap_or(f64::NAN), min, max_relative = 1e-12);
    }

    #[test]
    fn test_cash_held_at_buffer_while_sources_remain() {
        let params = SimulationParameters::default();
        let result = engine(2).project(&params);
        for r in &result.records {
            if r.domestic + r.foreign_bond + r.foreign_stock > 0.0 {
                assert!(r.cash >= params.assets.buffer_target - 1e-6, "{}: cash {}", r.year, r.cash);
            }
        }
    }

    #[test]
    fn test_insolvency_is_sticky() {
        let mut params = SimulationParameters::default();
        params.income.base_salary = 200.0;
        params.assets.cash = 100.0;
        params.assets.domestic.balance = 0.0;
        params.assets.foreign_bond.balance = 0.0;
        params.assets.foreign_stock.balance = 100.0;

        let result = engine(3).project(&params);
        let year = result.insolvency_year.expect("household should run out of cash");

        let first_negative = result
            .records
            .iter()
            .find(|r| r.cash < 0.0)
            .map(|r| r.year);
        assert_eq!(first_negative, Some(year));
        assert!(!result.summary().is_solvent());
        assert!(!result.summary().min_above_buffer);
    }

    #[test]
    fn test_surplus_swept_to_allocation() {
        let mut params = SimulationParameters::default();
        params.assets.foreign_allocation = 0.0;
        params.income.base_salary = 5000.0;
        let result = engine(4).project(&params);

        let first = &result.records[0];
        assert_relative_eq!(first.cash, params.assets.buffer_target, max_relative = 1e-12);
        assert!(first.buffer_transfer < 0.0);
        assert_relative_eq!(first.foreign_stock, 1683.0 * 1.05 * 1.01, max_relative = 1e-12);
    }

    #[test]
    fn test_same_seed_same_stable_path() {
        let mut params = SimulationParameters::default();
        params.mortgage.rate_scenario = RateScenario::Stable;

        let a = engine(42).project(&params);
        let b = engine(42).project(&params);
        let c = engine(43).project(&params);

        let rates = |r: &ProjectionResult| r.records.iter().map(|x| x.applied_rate).collect::<Vec<_>>();
        assert_eq!(rates(&a), rates(&b));
        assert_ne!(rates(&a), rates(&c));
        assert_eq!(a.summary(), b.summary());
    }

    #[test]
    fn test_deterministic_scenarios_ignore_seed() {
        let mut params = SimulationParameters::default();
        params.mortgage.rate_scenario = RateScenario::Rising;
        let a = engine(1).project(&params).summary();
        let b = engine(999).project(&params).summary();
        assert_eq!(a, b);
    }

    #[test]
    fn test_higher_rates_cost_more() {
        let mut params = SimulationParameters::default();
        let fixed = engine(1).project(&params);
        params.mortgage.rate_scenario = RateScenario::SharpRising;
        let sharp = engine(1).project(&params);

        let paid = |r: &ProjectionResult| r.records.iter().map(|x| x.mortgage_payment).sum::<f64>();
        assert!(paid(&sharp) > paid(&fixed));
        assert!(sharp.summary().final_net_assets < fixed.summary().final_net_assets);
    }

    #[test]
    fn test_boarding_allowance_through_age_21() {
        let mut params = SimulationParameters::default();
        let mut student = Child::new(2004, 4, EducationTrack::C);
        student.boarding = true;
        params.household.children.push(student);
        params.household.boarding_cost = 150.0;
        assert!(params.validate().is_ok());

        let result = engine(1).project(&params);
        assert_eq!(result.records[0].child_ages, vec![0, 21]);
        assert_eq!(result.records[0].boarding, 150.0);
        assert_eq!(result.records[1].boarding, 0.0);
    }

    #[test]
    fn test_late_child_extends_horizon() {
        let mut params = SimulationParameters::default();
        params.household.children.push(Child::new(2055, 6, EducationTrack::A));
        assert!(params.validate().is_ok());
        let result = engine(1).project(&params);
        assert_eq!(result.records.last().map(|r| r.year), Some(2078));
        assert_eq!(result.records[0].child_ages, vec![0, -30]);
    }
}
