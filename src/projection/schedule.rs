//! Per-year income and non-mortgage expense schedules
//!
//! Amounts are man-yen, like the parameters they come from.

use crate::assumptions::CostTables;
use crate::household::{Household, IncomeAssumptions, LivingCostAssumptions};

/// Household income for one year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeBreakdown {
    pub labor: f64,
    pub partner: f64,
    pub pension: f64,
}

impl IncomeBreakdown {
    pub fn total(&self) -> f64 {
        self.labor + self.partner + self.pension
    }
}

/// Non-mortgage spending for one year
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpenseBreakdown {
    pub education: f64,
    pub rearing: f64,
    pub boarding: f64,
    /// Inflated living cost plus fixed housing cost
    pub living: f64,
}

impl ExpenseBreakdown {
    pub fn child_related(&self) -> f64 {
        self.education + self.rearing + self.boarding
    }

    pub fn total(&self) -> f64 {
        self.child_related() + self.living
    }
}

/// Stage of the head of household's working life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentStage {
    Employed,
    Reemployed,
    Retired,
}

/// Labor income step function; remembers the last salary before retirement
#[derive(Debug, Clone, Default)]
pub struct IncomeSchedule {
    peak_income: f64,
}

impl IncomeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last salary earned before the retirement age
    pub fn peak_income(&self) -> f64 {
        self.peak_income
    }

    pub fn stage(income: &IncomeAssumptions, head_age: i32) -> EmploymentStage {
        if head_age < income.retirement_age {
            EmploymentStage::Employed
        } else if head_age < income.full_retirement_age {
            EmploymentStage::Reemployed
        } else {
            EmploymentStage::Retired
        }
    }

    /// Income for a year; must be called in increasing year order
    pub fn income_for(&mut self, income: &IncomeAssumptions, head_age: i32, elapsed: i32) -> IncomeBreakdown {
        let labor = match Self::stage(income, head_age) {
            EmploymentStage::Employed => {
                let salary = income.base_salary * (1.0 + income.growth_rate).powi(elapsed);
                self.peak_income = salary;
                salary
            }
            EmploymentStage::Reemployed => self.peak_income * income.reemployment_ratio,
            EmploymentStage::Retired => 0.0,
        };

        let pension = if head_age >= income.pension_start_age {
            income.pension_amount
        } else {
            0.0
        };

        IncomeBreakdown {
            labor,
            partner: income.partner_income,
            pension,
        }
    }
}

/// Non-mortgage expenses for a calendar year
pub fn expenses_for(
    costs: &CostTables,
    household: &Household,
    living: &LivingCostAssumptions,
    boarding_ages: (i32, i32),
    year: i32,
    elapsed: i32,
) -> ExpenseBreakdown {
    let mut expenses = ExpenseBreakdown::default();

    for child in &household.children {
        let age = child.age_in(year);
        expenses.education += costs.education(child.education_track).cost_at(age);
        expenses.rearing += costs.rearing(child.rearing_plan).cost_at(age);
        if child.boarding && (boarding_ages.0..=boarding_ages.1).contains(&age) {
            expenses.boarding += household.boarding_cost;
        }
    }

    expenses.living = living.base_living_cost * (1.0 + living.inflation_rate).powi(elapsed)
        + living.fixed_housing_cost;

    expenses
}
