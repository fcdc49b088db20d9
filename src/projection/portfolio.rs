//! Asset buckets, growth, and the liquidity buffer policy
//!
//! Balances here are in yen.

use crate::household::AssetAssumptions;
use crate::MAN_YEN;

/// One of the six asset buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Cash,
    Domestic,
    ForeignCash,
    ForeignBond,
    ForeignStock,
    RetirementSavings,
}

/// Buckets drawn on, in order, to refill a cash shortfall
pub const LIQUIDATION_ORDER: [Bucket; 3] = [Bucket::ForeignStock, Bucket::ForeignBond, Bucket::Domestic];

/// Growth of a foreign holding: local yield and currency move compound
pub fn currency_adjusted(local_yield: f64, currency_drift: f64) -> f64 {
    (1.0 + local_yield) * (1.0 + currency_drift) - 1.0
}

/// Annual growth rates for the invested buckets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthRates {
    pub domestic: f64,
    pub foreign_cash: f64,
    pub foreign_bond: f64,
    pub foreign_stock: f64,
}

impl GrowthRates {
    pub fn from_assets(assets: &AssetAssumptions) -> Self {
        let drift = assets.currency_drift;
        Self {
            domestic: assets.domestic.yield_rate,
            foreign_cash: currency_adjusted(assets.foreign_cash.yield_rate, drift),
            foreign_bond: currency_adjusted(assets.foreign_bond.yield_rate, drift),
            foreign_stock: currency_adjusted(assets.foreign_stock.yield_rate, drift),
        }
    }

    /// Retirement savings are invested like foreign stock
    pub fn retirement_savings(&self) -> f64 {
        self.foreign_stock
    }
}

/// Cash buffer rules applied once a year after cash flow lands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferPolicy {
    /// Target cash balance in yen
    pub target: f64,
    pub invest_surplus: bool,
    /// Share of surplus sent to foreign stock, the rest to domestic
    pub foreign_allocation: f64,
}

impl BufferPolicy {
    pub fn from_assets(assets: &AssetAssumptions) -> Self {
        Self {
            target: assets.buffer_target * MAN_YEN,
            invest_surplus: assets.invest_surplus,
            foreign_allocation: assets.foreign_allocation,
        }
    }
}

/// What the buffer policy did in a year
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BufferAction {
    /// Cash already at target, or above it with sweeping disabled
    Hold,
    /// Risk buckets sold into cash; `shortfall` is what could not be covered
    Drawdown { recovered: f64, shortfall: f64 },
    /// Cash above target swept into investments
    Reinvest { to_foreign_stock: f64, to_domestic: f64 },
}

impl BufferAction {
    /// Signed transfer into cash (negative when swept out)
    pub fn cash_transfer(&self) -> f64 {
        match self {
            BufferAction::Hold => 0.0,
            BufferAction::Drawdown { recovered, .. } => *recovered,
            BufferAction::Reinvest {
                to_foreign_stock,
                to_domestic,
            } => -(to_foreign_stock + to_domestic),
        }
    }

    /// Every liquidation source ran dry before the shortfall was covered
    pub fn exhausted(&self) -> bool {
        matches!(self, BufferAction::Drawdown { shortfall, .. } if *shortfall > 0.0)
    }
}

/// Balances of the six buckets
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub domestic: f64,
    pub foreign_cash: f64,
    pub foreign_bond: f64,
    pub foreign_stock: f64,
    pub retirement_savings: f64,
}

impl PortfolioState {
    /// Opening balances, converted from man-yen
    pub fn from_assets(assets: &AssetAssumptions) -> Self {
        Self {
            cash: assets.cash * MAN_YEN,
            domestic: assets.domestic.balance * MAN_YEN,
            foreign_cash: assets.foreign_cash.balance * MAN_YEN,
            foreign_bond: assets.foreign_bond.balance * MAN_YEN,
            foreign_stock: assets.foreign_stock.balance * MAN_YEN,
            retirement_savings: assets.retirement_savings * MAN_YEN,
        }
    }

    pub fn balance(&self, bucket: Bucket) -> f64 {
        match bucket {
            Bucket::Cash => self.cash,
            Bucket::Domestic => self.domestic,
            Bucket::ForeignCash => self.foreign_cash,
            Bucket::ForeignBond => self.foreign_bond,
            Bucket::ForeignStock => self.foreign_stock,
            Bucket::RetirementSavings => self.retirement_savings,
        }
    }

    fn balance_mut(&mut self, bucket: Bucket) -> &mut f64 {
        match bucket {
            Bucket::Cash => &mut self.cash,
            Bucket::Domestic => &mut self.domestic,
            Bucket::ForeignCash => &mut self.foreign_cash,
            Bucket::ForeignBond => &mut self.foreign_bond,
            Bucket::ForeignStock => &mut self.foreign_stock,
            Bucket::RetirementSavings => &mut self.retirement_savings,
        }
    }

    pub fn total(&self) -> f64 {
        self.cash
            + self.domestic
            + self.foreign_cash
            + self.foreign_bond
            + self.foreign_stock
            + self.retirement_savings
    }

    /// Add a year's contribution and grow the account as if the
    /// contribution arrived mid-year
    pub fn contribute_retirement(&mut self, contribution: f64, growth_rate: f64) {
        let gain = (self.retirement_savings + contribution / 2.0) * growth_rate;
        self.retirement_savings += contribution + gain;
    }

    /// One year of growth on the domestic and foreign buckets
    pub fn apply_growth(&mut self, rates: &GrowthRates) {
        self.domestic *= 1.0 + rates.domestic;
        self.foreign_cash *= 1.0 + rates.foreign_cash;
        self.foreign_bond *= 1.0 + rates.foreign_bond;
        self.foreign_stock *= 1.0 + rates.foreign_stock;
    }

    pub fn apply_cash_flow(&mut self, net_cash_flow: f64) {
        self.cash += net_cash_flow;
    }

    /// Refill cash below target from the liquidation order, or sweep the
    /// excess above target into investments; never both in one year
    pub fn rebalance_buffer(&mut self, policy: &BufferPolicy) -> BufferAction {
        if self.cash < policy.target {
            let mut deficit = policy.target - self.cash;
            let mut recovered = 0.0;

            for bucket in LIQUIDATION_ORDER {
                let balance = self.balance_mut(bucket);
                let draw = balance.max(0.0).min(deficit);
                *balance -= draw;
                recovered += draw;
                deficit -= draw;
                if deficit <= 0.0 {
                    break;
                }
            }

            self.cash += recovered;
            BufferAction::Drawdown {
                recovered,
                shortfall: deficit.max(0.0),
            }
        } else if self.cash > policy.target && policy.invest_surplus {
            let surplus = self.cash - policy.target;
            self.cash = policy.target;

            let to_foreign_stock = surplus * policy.foreign_allocation;
            let to_domestic = surplus * (1.0 - policy.foreign_allocation);
            self.foreign_stock += to_foreign_stock;
            self.domestic += to_domestic;

            BufferAction::Reinvest {
                to_foreign_stock,
                to_domestic,
            }
        } else {
            BufferAction::Hold
        }
    }

    /// Balances converted to man-yen for reporting
    pub fn in_man_yen(&self) -> PortfolioState {
        PortfolioState {
            cash: self.cash / MAN_YEN,
            domestic: self.domestic / MAN_YEN,
            foreign_cash: self.foreign_cash / MAN_YEN,
            foreign_bond: self.foreign_bond / MAN_YEN,
            foreign_stock: self.foreign_stock / MAN_YEN,
            retirement_savings: self.retirement_savings / MAN_YEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn policy(target: f64, invest_surplus: bool, foreign_allocation: f64) -> BufferPolicy {
        BufferPolicy {
            target,
            invest_surplus,
            foreign_allocation,
        }
    }

    fn portfolio(cash: f64, domestic: f64, bond: f64, stock: f64) -> PortfolioState {
        PortfolioState {
            cash,
            domestic,
            foreign_cash: 50.0,
            foreign_bond: bond,
            foreign_stock: stock,
            retirement_savings: 70.0,
        }
    }

    fn liquid(p: &PortfolioState) -> f64 {
        p.cash + p.domestic + p.foreign_bond + p.foreign_stock
    }

    #[test]
    fn test_currency_compounds_multiplicatively() {
        let rate = currency_adjusted(0.05, 0.01);
        assert_relative_eq!(rate, 1.05 * 1.01 - 1.0);
        assert!((rate - 0.06).abs() > 1e-4);

        let mut state = PortfolioState {
            foreign_bond: 1000.0,
            ..Default::default()
        };
        let rates = GrowthRates {
            domestic: 0.0,
            foreign_cash: 0.0,
            foreign_bond: currency_adjusted(0.03, -0.025),
            foreign_stock: 0.0,
        };
        state.apply_growth(&rates);
        assert_relative_eq!(state.foreign_bond, 1000.0 * 1.03 * 0.975);
    }

    #[test]
    fn test_retirement_contribution_mid_year() {
        let mut state = PortfolioState {
            retirement_savings: 1000.0,
            ..Default::default()
        };
        state.contribute_retirement(120.0, 0.1);
        // 1000 + 120 + (1000 + 60) * 0.1
        assert_relative_eq!(state.retirement_savings, 1226.0);
    }

    #[test]
    fn test_drawdown_takes_stock_first() {
        let mut state = portfolio(100.0, 500.0, 500.0, 500.0);
        let action = state.rebalance_buffer(&policy(300.0, true, 1.0));

        assert_eq!(action, BufferAction::Drawdown { recovered: 200.0, shortfall: 0.0 });
        assert_eq!(state.cash, 300.0);
        assert_eq!(state.foreign_stock, 300.0);
        assert_eq!(state.foreign_bond, 500.0);
        assert_eq!(state.domestic, 500.0);
    }

    #[test]
    fn test_drawdown_cascades_through_waterfall() {
        let mut state = portfolio(-200.0, 400.0, 150.0, 100.0);
        let action = state.rebalance_buffer(&policy(300.0, true, 1.0));

        assert_eq!(state.foreign_stock, 0.0);
        assert_eq!(state.foreign_bond, 0.0);
        assert_eq!(state.domestic, 150.0);
        assert_eq!(state.cash, 300.0);
        assert!(!action.exhausted());
        // Foreign cash and retirement savings are never liquidated
        assert_eq!(state.foreign_cash, 50.0);
        assert_eq!(state.retirement_savings, 70.0);
    }

    #[test]
    fn test_exhausted_sources_leave_negative_cash() {
        let mut state = portfolio(-1000.0, 100.0, 100.0, 100.0);
        let action = state.rebalance_buffer(&policy(300.0, true, 1.0));

        assert!(action.exhausted());
        assert_eq!(action, BufferAction::Drawdown { recovered: 300.0, shortfall: 1000.0 });
        assert_eq!(state.cash, -700.0);
        assert_eq!(state.domestic + state.foreign_bond + state.foreign_stock, 0.0);
    }

    #[test]
    fn test_partial_cover_without_insolvency() {
        let mut state = portfolio(100.0, 50.0, 0.0, 0.0);
        let action = state.rebalance_buffer(&policy(300.0, true, 1.0));

        assert!(action.exhausted());
        assert_eq!(state.cash, 150.0);
    }

    #[test]
    fn test_surplus_split_by_allocation() {
        let mut state = portfolio(1300.0, 0.0, 0.0, 0.0);
        let action = state.rebalance_buffer(&policy(300.0, true, 0.25));

        assert_eq!(state.cash, 300.0);
        assert_eq!(state.foreign_stock, 250.0);
        assert_eq!(state.domestic, 750.0);
        assert_eq!(action.cash_transfer(), -1000.0);
    }

    #[test]
    fn test_surplus_held_when_sweeping_disabled() {
        let mut state = portfolio(1300.0, 0.0, 0.0, 0.0);
        assert_eq!(state.rebalance_buffer(&policy(300.0, false, 1.0)), BufferAction::Hold);
        assert_eq!(state.cash, 1300.0);

        let mut state = portfolio(300.0, 10.0, 10.0, 10.0);
        assert_eq!(state.rebalance_buffer(&policy(300.0, true, 1.0)), BufferAction::Hold);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_waterfall_conserves_value(
            cash in -5_000.0f64..5_000.0,
            domestic in 0.0f64..3_000.0,
            bond in 0.0f64..3_000.0,
            stock in 0.0f64..3_000.0,
            target in 0.0f64..2_000.0,
            allocation in 0.0f64..=1.0,
            invest in any::<bool>(),
        ) {
            let mut state = portfolio(cash, domestic, bond, stock);
            let before = liquid(&state);
            state.rebalance_buffer(&policy(target, invest, allocation));
            let after = liquid(&state);
            prop_assert!((before - after).abs() < 1e-6);
        }

        #[test]
        fn prop_cash_reaches_target_while_sources_remain(
            cash in -5_000.0f64..5_000.0,
            domestic in 0.0f64..3_000.0,
            bond in 0.0f64..3_000.0,
            stock in 0.0f64..3_000.0,
            target in 0.0f64..2_000.0,
        ) {
            let mut state = portfolio(cash, domestic, bond, stock);
            let action = state.rebalance_buffer(&policy(target, true, 1.0));
            prop_assert!(state.domestic >= 0.0 && state.foreign_bond >= 0.0 && state.foreign_stock >= 0.0);
            if state.domestic > 0.0 || state.foreign_bond > 0.0 || state.foreign_stock > 0.0 {
                prop_assert!(state.cash >= target - 1e-9);
                prop_assert!(!action.exhausted());
            }
        }
    }
}
