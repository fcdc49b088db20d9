//! Household simulation parameters
//!
//! All monetary values are man-yen (10,000 yen). Rates are decimal fractions.

use serde::{Deserialize, Serialize};

use crate::assumptions::{EducationTrack, RearingPlan};
use crate::error::{Error, Result};
use crate::projection::RateScenario;

/// A child in the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Child {
    pub birth_year: i32,
    /// Birth month (1-12); ages are counted by calendar year only
    pub birth_month: u32,
    pub education_track: EducationTrack,
    pub rearing_plan: RearingPlan,
    /// Lives away from home during university (ages 18-21)
    pub boarding: bool,
}

impl Child {
    pub fn new(birth_year: i32, birth_month: u32, education_track: EducationTrack) -> Self {
        Self {
            birth_year,
            birth_month,
            education_track,
            rearing_plan: RearingPlan::Standard,
            boarding: false,
        }
    }

    /// Age in a calendar year (negative before birth)
    pub fn age_in(&self, year: i32) -> i32 {
        year - self.birth_year
    }
}

impl Default for Child {
    fn default() -> Self {
        Child::new(2025, 2, EducationTrack::I)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Household {
    /// Head of household's age at the simulation start year
    pub head_age: i32,
    pub children: Vec<Child>,
    /// Annual allowance sent to each boarding child
    pub boarding_cost: f64,
}

impl Default for Household {
    fn default() -> Self {
        Self {
            head_age: 38,
            children: vec![Child::default()],
            boarding_cost: 150.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeAssumptions {
    pub base_salary: f64,
    pub growth_rate: f64,
    pub retirement_age: i32,
    /// Fraction of peak salary kept while re-employed
    pub reemployment_ratio: f64,
    pub full_retirement_age: i32,
    pub pension_start_age: i32,
    pub pension_amount: f64,
    pub partner_income: f64,
}

impl Default for IncomeAssumptions {
    fn default() -> Self {
        Self {
            base_salary: 1050.0,
            growth_rate: 0.015,
            retirement_age: 60,
            reemployment_ratio: 0.6,
            full_retirement_age: 65,
            pension_start_age: 65,
            pension_amount: 240.0,
            partner_income: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivingCostAssumptions {
    /// Annual living cost excluding housing, in start-year prices
    pub base_living_cost: f64,
    /// Property tax and upkeep, not inflated
    pub fixed_housing_cost: f64,
    pub inflation_rate: f64,
}

impl Default for LivingCostAssumptions {
    fn default() -> Self {
        Self {
            base_living_cost: 576.0,
            fixed_housing_cost: 19.2,
            inflation_rate: 0.02,
        }
    }
}

/// Opening balance and annual yield of one asset bucket
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Holding {
    pub balance: f64,
    pub yield_rate: f64,
}

impl Holding {
    pub fn new(balance: f64, yield_rate: f64) -> Self {
        Self { balance, yield_rate }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetAssumptions {
    pub cash: f64,
    pub domestic: Holding,
    pub foreign_cash: Holding,
    pub foreign_bond: Holding,
    pub foreign_stock: Holding,
    /// Retirement savings account; grows at the foreign stock yield
    pub retirement_savings: f64,
    pub retirement_monthly_contribution: f64,
    /// Annual drift of foreign currency against the yen
    pub currency_drift: f64,
    /// Cash kept liquid as a safety net
    pub buffer_target: f64,
    /// Sweep cash above the buffer into investments
    pub invest_surplus: bool,
    /// Share of the swept surplus sent to foreign stock (rest to domestic)
    pub foreign_allocation: f64,
}

impl Default for AssetAssumptions {
    fn default() -> Self {
        Self {
            cash: 330.0,
            domestic: Holding::new(360.0, 0.005),
            foreign_cash: Holding::new(58.0, 0.02),
            foreign_bond: Holding::new(406.0, 0.03),
            foreign_stock: Holding::new(1683.0, 0.05),
            retirement_savings: 190.0,
            retirement_monthly_contribution: 3.0,
            currency_drift: 0.01,
            buffer_target: 300.0,
            invest_surplus: true,
            foreign_allocation: 1.0,
        }
    }
}

impl AssetAssumptions {
    pub fn opening_total(&self) -> f64 {
        self.cash
            + self.domestic.balance
            + self.foreign_cash.balance
            + self.foreign_bond.balance
            + self.foreign_stock.balance
            + self.retirement_savings
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageTerms {
    pub principal: f64,
    pub origination_year: i32,
    pub payoff_year: i32,
    pub base_rate: f64,
    /// Discount off the base rate; the applied rate never goes below zero
    pub rate_discount: f64,
    pub rate_scenario: RateScenario,
}

impl Default for MortgageTerms {
    fn default() -> Self {
        Self {
            principal: 6460.0,
            origination_year: 2024,
            payoff_year: 2059,
            base_rate: 0.02841,
            rate_discount: 0.02057,
            rate_scenario: RateScenario::Fixed,
        }
    }
}

impl MortgageTerms {
    pub fn initial_applied_rate(&self) -> f64 {
        (self.base_rate - self.rate_discount).max(0.0)
    }
}

/// Full set of inputs for one projection run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub household: Household,
    pub income: IncomeAssumptions,
    pub living: LivingCostAssumptions,
    pub assets: AssetAssumptions,
    pub mortgage: MortgageTerms,
}

/// First simulated year of the default configuration
pub const REFERENCE_START_YEAR: i32 = 2025;

/// Supported child birth years, relative to the start year
const CHILD_BIRTH_WINDOW: (i32, i32) = (-23, 35);
const MAX_HEAD_AGE: i32 = 120;
/// Supported origination years, relative to the start year
const ORIGINATION_WINDOW: (i32, i32) = (-50, 10);
const MAX_MORTGAGE_TERM_YEARS: i32 = 50;

fn year_in_window(field: &'static str, year: i32, start_year: i32, (before, after): (i32, i32)) -> Result<()> {
    let earliest = start_year.saturating_add(before);
    let latest = start_year.saturating_add(after);
    if !(earliest..=latest).contains(&year) {
        return Err(Error::invalid(
            field,
            format!("{} is outside {}-{}", year, earliest, latest),
        ));
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(field, format!("{} is not a finite number", value)))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if finite(field, value)? < 0.0 {
        return Err(Error::invalid(field, format!("{} must not be negative", value)));
    }
    Ok(())
}

fn fraction(field: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&finite(field, value)?) {
        return Err(Error::invalid(field, format!("{} must be between 0 and 1", value)));
    }
    Ok(())
}

impl SimulationParameters {
    /// Check the inputs the engine takes on trust, for a run starting in
    /// `REFERENCE_START_YEAR`
    pub fn validate(&self) -> Result<()> {
        self.validate_for(REFERENCE_START_YEAR)
    }

    /// Check the inputs for a run starting in `start_year`
    pub fn validate_for(&self, start_year: i32) -> Result<()> {
        let household = &self.household;
        if household.children.is_empty() || household.children.len() > 2 {
            return Err(Error::invalid(
                "household.children",
                format!("expected 1 or 2 children, got {}", household.children.len()),
            ));
        }
        for child in &household.children {
            if !(1..=12).contains(&child.birth_month) {
                return Err(Error::invalid(
                    "household.children.birth_month",
                    format!("{} is not a month", child.birth_month),
                ));
            }
            year_in_window(
                "household.children.birth_year",
                child.birth_year,
                start_year,
                CHILD_BIRTH_WINDOW,
            )?;
        }
        if !(0..=MAX_HEAD_AGE).contains(&household.head_age) {
            return Err(Error::invalid(
                "household.head_age",
                format!("{} is outside 0-{}", household.head_age, MAX_HEAD_AGE),
            ));
        }
        non_negative("household.boarding_cost", household.boarding_cost)?;

        let income = &self.income;
        non_negative("income.base_salary", income.base_salary)?;
        finite("income.growth_rate", income.growth_rate)?;
        fraction("income.reemployment_ratio", income.reemployment_ratio)?;
        non_negative("income.pension_amount", income.pension_amount)?;
        non_negative("income.partner_income", income.partner_income)?;
        if income.retirement_age > income.full_retirement_age {
            return Err(Error::invalid(
                "income.retirement_age",
                format!(
                    "retirement age {} is after full retirement age {}",
                    income.retirement_age, income.full_retirement_age
                ),
            ));
        }

        let living = &self.living;
        non_negative("living.base_living_cost", living.base_living_cost)?;
        non_negative("living.fixed_housing_cost", living.fixed_housing_cost)?;
        finite("living.inflation_rate", living.inflation_rate)?;

        let assets = &self.assets;
        non_negative("assets.cash", assets.cash)?;
        for (field, holding) in [
            ("assets.domestic", &assets.domestic),
            ("assets.foreign_cash", &assets.foreign_cash),
            ("assets.foreign_bond", &assets.foreign_bond),
            ("assets.foreign_stock", &assets.foreign_stock),
        ] {
            non_negative(field, holding.balance)?;
            finite(field, holding.yield_rate)?;
        }
        non_negative("assets.retirement_savings", assets.retirement_savings)?;
        non_negative(
            "assets.retirement_monthly_contribution",
            assets.retirement_monthly_contribution,
        )?;
        finite("assets.currency_drift", assets.currency_drift)?;
        non_negative("assets.buffer_target", assets.buffer_target)?;
        fraction("assets.foreign_allocation", assets.foreign_allocation)?;

        let mortgage = &self.mortgage;
        non_negative("mortgage.principal", mortgage.principal)?;
        finite("mortgage.base_rate", mortgage.base_rate)?;
        finite("mortgage.rate_discount", mortgage.rate_discount)?;
        if mortgage.payoff_year < mortgage.origination_year {
            return Err(Error::invalid(
                "mortgage.payoff_year",
                format!(
                    "payoff year {} is before origination year {}",
                    mortgage.payoff_year, mortgage.origination_year
                ),
            ));
        }
        year_in_window(
            "mortgage.origination_year",
            mortgage.origination_year,
            start_year,
            ORIGINATION_WINDOW,
        )?;
        if mortgage.payoff_year - mortgage.origination_year > MAX_MORTGAGE_TERM_YEARS {
            return Err(Error::invalid(
                "mortgage.payoff_year",
                format!("term longer than {} years", MAX_MORTGAGE_TERM_YEARS),
            ));
        }

        Ok(())
    }
}
