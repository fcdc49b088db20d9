//! Mortgage amortization with a yearly repriced rate
//!
//! The level payment is recomputed every month from the remaining term and
//! the current rate, so a rate change reshapes the payment rather than the
//! payoff date. Balances here are in yen.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::household::MortgageTerms;

/// Residual balance treated as fully repaid
const PAID_OFF_EPSILON: f64 = 1.0;

/// Path followed by the base rate after the first simulated year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateScenario {
    #[default]
    Fixed,
    /// Small random walk with a slight downward skew
    Stable,
    /// +0.05 percentage points a year
    Rising,
    /// +0.20 percentage points a year
    SharpRising,
}

impl RateScenario {
    pub const ALL: [RateScenario; 4] = [
        RateScenario::Fixed,
        RateScenario::Stable,
        RateScenario::Rising,
        RateScenario::SharpRising,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RateScenario::Fixed => "fixed",
            RateScenario::Stable => "stable",
            RateScenario::Rising => "rising",
            RateScenario::SharpRising => "sharp_rising",
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, RateScenario::Stable)
    }

    /// Next year's base rate (decimal) given this year's
    pub fn next_rate<R: Rng + ?Sized>(&self, current: f64, rng: &mut R) -> f64 {
        match self {
            RateScenario::Fixed => current,
            RateScenario::Stable => current + (rng.gen::<f64>() - 0.45) * 0.0005,
            RateScenario::Rising => current + 0.0005,
            RateScenario::SharpRising => current + 0.002,
        }
    }
}

/// Month count clamped to `0..=u32::MAX`
fn clamp_months(months: i64) -> u32 {
    u32::try_from(months.max(0)).unwrap_or(u32::MAX)
}

/// Whole months from January of `from` to January of `to`
fn months_between(from: i32, to: i32) -> u32 {
    clamp_months((i64::from(to) - i64::from(from)) * 12)
}

/// Level payment that repays `balance` over `months` at `monthly_rate`
pub fn level_payment(balance: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return balance;
    }
    // (1 + r)^n - 1 via exp_m1, nonzero even when 1.0 + r rounds to 1.0
    let denominator = (months as f64 * monthly_rate.ln_1p()).exp_m1();
    if monthly_rate > 0.0 && denominator > 0.0 {
        if denominator.is_infinite() {
            return balance * monthly_rate;
        }
        balance * monthly_rate * (denominator + 1.0) / denominator
    } else {
        balance / months as f64
    }
}

/// Mortgage figures for one simulated year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MortgageYear {
    /// Sum of the twelve monthly payments
    pub payment: f64,
    /// Balance after the year's payments
    pub balance: f64,
    /// Annual rate actually charged (base minus discount, floored at zero)
    pub applied_rate: f64,
}

/// Outstanding balance and base rate carried from year to year
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationState {
    pub balance: f64,
    pub base_rate: f64,
}

impl AmortizationState {
    /// Roll the loan forward from origination to the simulation start at
    /// the initial applied rate; `offset_months` covers the assumed
    /// origination month
    pub fn pre_rolled(terms: &MortgageTerms, balance: f64, start_year: i32, offset_months: i32) -> Self {
        let months_before = clamp_months(
            (i64::from(start_year) - i64::from(terms.origination_year)) * 12 + i64::from(offset_months),
        );
        let monthly_rate = terms.initial_applied_rate() / 12.0;
        let mut remaining = months_between(terms.origination_year, terms.payoff_year);
        let mut balance = balance;

        for _ in 0..months_before {
            if balance <= 0.0 || remaining == 0 {
                break;
            }
            let interest = balance * monthly_rate;
            let payment = level_payment(balance, monthly_rate, remaining);
            balance -= payment - interest;
            if balance < PAID_OFF_EPSILON {
                balance = 0.0;
            }
            remaining -= 1;
        }

        Self {
            balance,
            base_rate: terms.base_rate,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }

    /// Reprice (unless `reprice` is false) and make up to twelve payments
    pub fn advance_year<R: Rng + ?Sized>(
        &mut self,
        terms: &MortgageTerms,
        year: i32,
        reprice: bool,
        rng: &mut R,
    ) -> MortgageYear {
        if reprice {
            self.base_rate = terms.rate_scenario.next_rate(self.base_rate, rng);
        }
        let applied_rate = (self.base_rate - terms.rate_discount).max(0.0);
        let monthly_rate = applied_rate / 12.0;
        let months_left = months_between(year, terms.payoff_year).max(1);

        let mut payment = 0.0;
        for _ in 0..12 {
            if self.is_paid_off() {
                break;
            }
            let monthly = level_payment(self.balance, monthly_rate, months_left);
            let interest = self.balance * monthly_rate;
            self.balance -= monthly - interest;
            if self.balance < PAID_OFF_EPSILON {
                self.balance = 0.0;
            }
            payment += monthly;
        }

        MortgageYear {
            payment,
            balance: self.balance,
            applied_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn terms(scenario: RateScenario) -> MortgageTerms {
        MortgageTerms {
            rate_scenario: scenario,
            ..MortgageTerms::default()
        }
    }

    #[test]
    fn test_level_payment_matches_annuity_formula() {
        // 30 million over 35 years at 1.2%
        let r = 0.012 / 12.0;
        let payment = level_payment(30_000_000.0, r, 420);
        assert!((payment - 87_510.0).abs() < 10.0, "payment {}", payment);

        assert_eq!(level_payment(1_200.0, 0.0, 12), 100.0);
        assert_eq!(level_payment(500.0, 0.01, 0), 500.0);
    }

    #[test]
    fn test_negligible_rate_stays_finite() {
        assert_relative_eq!(level_payment(1_200.0, 1e-18, 12), 100.0, max_relative = 1e-9);
        assert_relative_eq!(level_payment(1_200.0, 0.01, u32::MAX), 12.0);

        let mut terms = terms(RateScenario::Fixed);
        terms.base_rate = terms.rate_discount + 1e-17;
        assert!(terms.initial_applied_rate() > 0.0);

        // 15 months straight-line out of 420
        let mut state = AmortizationState::pre_rolled(&terms, 64_600_000.0, 2025, 3);
        assert_relative_eq!(state.balance, 64_600_000.0 * 405.0 / 420.0, max_relative = 1e-9);

        let mut rng = StdRng::seed_from_u64(1);
        let year = state.advance_year(&terms, 2025, false, &mut rng);
        assert!(year.payment.is_finite() && year.payment > 0.0);
        assert!(year.balance.is_finite() && year.balance > 60_000_000.0);
    }

    #[test]
    fn test_pre_roll_reduces_balance() {
        let terms = terms(RateScenario::Fixed);
        let state = AmortizationState::pre_rolled(&terms, 64_600_000.0, 2025, 3);

        // 15 months of payments at 0.784%
        assert!(state.balance < 64_600_000.0);
        assert!(state.balance > 62_500_000.0 && state.balance < 62_700_000.0);
        assert_eq!(state.base_rate, terms.base_rate);
    }

    #[test]
    fn test_pre_roll_skipped_for_future_origination() {
        let mut terms = terms(RateScenario::Fixed);
        terms.origination_year = 2030;
        terms.payoff_year = 2060;
        let state = AmortizationState::pre_rolled(&terms, 1_000_000.0, 2025, 3);
        assert_eq!(state.balance, 1_000_000.0);
    }

    #[test]
    fn test_fixed_rate_pays_off_monotonically() {
        let terms = terms(RateScenario::Fixed);
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = AmortizationState::pre_rolled(&terms, 64_600_000.0, 2025, 3);

        let mut previous = state.balance;
        let mut paid_off_year = None;
        for (i, year) in (2025..=2070).enumerate() {
            let result = state.advance_year(&terms, year, i > 0, &mut rng);
            assert!(result.balance <= previous);
            if paid_off_year.is_some() {
                assert_eq!(result.payment, 0.0);
            }
            if result.balance == 0.0 && paid_off_year.is_none() {
                paid_off_year = Some(year);
            }
            previous = result.balance;
        }

        let paid_off_year = paid_off_year.expect("loan never paid off");
        assert!(paid_off_year <= terms.payoff_year);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let mut terms = terms(RateScenario::Fixed);
        terms.base_rate = 0.01;
        terms.rate_discount = 0.02;
        terms.origination_year = 2025;
        terms.payoff_year = 2035;
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = AmortizationState {
            balance: 1_200_000.0,
            base_rate: terms.base_rate,
        };

        let result = state.advance_year(&terms, 2025, false, &mut rng);
        assert_eq!(result.applied_rate, 0.0);
        // Term stays at 120 months for the whole year, so each month repays 1/120
        let expected = 1_200_000.0 * (1.0 - (119.0_f64 / 120.0).powi(12));
        assert_relative_eq!(result.payment, expected, max_relative = 1e-9);
        assert_relative_eq!(result.balance, 1_200_000.0 - expected, max_relative = 1e-9);
    }

    #[test]
    fn test_rising_scenarios_step_rate() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_relative_eq!(RateScenario::Rising.next_rate(0.02, &mut rng), 0.0205);
        assert_relative_eq!(RateScenario::SharpRising.next_rate(0.02, &mut rng), 0.022);
        assert_eq!(RateScenario::Fixed.next_rate(0.02, &mut rng), 0.02);
    }

    #[test]
    fn test_stable_scenario_bounded_and_seedable() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let next_a = RateScenario::Stable.next_rate(0.02, &mut a);
            let next_b = RateScenario::Stable.next_rate(0.02, &mut b);
            assert_eq!(next_a, next_b);
            assert!(next_a >= 0.02 - 0.000225 - 1e-12);
            assert!(next_a <= 0.02 + 0.000275 + 1e-12);
        }
    }

    #[test]
    fn test_first_year_not_repriced() {
        let terms = terms(RateScenario::SharpRising);
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = AmortizationState::pre_rolled(&terms, 64_600_000.0, 2025, 3);

        let first = state.advance_year(&terms, 2025, false, &mut rng);
        assert_relative_eq!(first.applied_rate, 0.00784, max_relative = 1e-9);
        let second = state.advance_year(&terms, 2026, true, &mut rng);
        assert_relative_eq!(second.applied_rate, 0.00984, max_relative = 1e-9);
        assert!(second.payment > first.payment * 0.99);
    }
}
