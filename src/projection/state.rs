//! Carry-state for a single household projection

use crate::household::SimulationParameters;
use crate::MAN_YEN;

use super::mortgage::AmortizationState;
use super::portfolio::PortfolioState;
use super::schedule::IncomeSchedule;

/// State of the household between simulated years
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Calendar year about to be simulated
    pub year: i32,

    /// Years since the start year
    pub elapsed: i32,

    /// Head of household's age this year
    pub head_age: i32,

    /// Bucket balances (yen)
    pub portfolio: PortfolioState,

    /// Mortgage balance and base rate (yen)
    pub mortgage: AmortizationState,

    /// Tracks the pre-retirement peak salary
    pub income: IncomeSchedule,

    /// Sticky once set
    pub insolvency_year: Option<i32>,

    /// Lowest total assets so far (yen) and the year it happened
    pub min_assets: f64,
    pub min_assets_year: i32,
}

impl ProjectionState {
    /// Opening state, with the mortgage already rolled forward to `start_year`
    pub fn from_parameters(params: &SimulationParameters, start_year: i32, offset_months: i32) -> Self {
        let mortgage = AmortizationState::pre_rolled(
            &params.mortgage,
            params.mortgage.principal * MAN_YEN,
            start_year,
            offset_months,
        );

        Self {
            year: start_year,
            elapsed: 0,
            head_age: params.household.head_age,
            portfolio: PortfolioState::from_assets(&params.assets),
            mortgage,
            income: IncomeSchedule::new(),
            insolvency_year: None,
            min_assets: f64::INFINITY,
            min_assets_year: start_year,
        }
    }

    /// Flag the year insolvent unless an earlier year already was
    pub fn mark_insolvent(&mut self) -> bool {
        if self.insolvency_year.is_none() {
            self.insolvency_year = Some(self.year);
            true
        } else {
            false
        }
    }

    /// Record this year's total if it is a new strict minimum
    pub fn track_minimum(&mut self, total_assets: f64) {
        if total_assets < self.min_assets {
            self.min_assets = total_assets;
            self.min_assets_year = self.year;
        }
    }

    /// Move to the next calendar year
    pub fn advance_year(&mut self) {
        self.year += 1;
        self.elapsed += 1;
        self.head_age += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_state_in_yen() {
        let params = SimulationParameters::default();
        let state = ProjectionState::from_parameters(&params, 2025, 3);

        assert_eq!(state.portfolio.cash, 3_300_000.0);
        assert_eq!(state.portfolio.total(), params.assets.opening_total() * MAN_YEN);
        assert!(state.mortgage.balance < 64_600_000.0);
        assert_eq!(state.head_age, 38);
    }

    #[test]
    fn test_insolvency_first_wins() {
        let mut state = ProjectionState::from_parameters(&SimulationParameters::default(), 2025, 3);
        state.advance_year();
        assert!(state.mark_insolvent());
        state.advance_year();
        assert!(!state.mark_insolvent());
        assert_eq!(state.insolvency_year, Some(2026));
    }

    #[test]
    fn test_minimum_keeps_first_occurrence() {
        let mut state = ProjectionState::from_parameters(&SimulationParameters::default(), 2025, 3);
        state.track_minimum(100.0);
        state.advance_year();
        state.track_minimum(100.0);
        state.advance_year();
        state.track_minimum(150.0);
        assert_eq!(state.min_assets, 100.0);
        assert_eq!(state.min_assets_year, 2025);
    }
}
