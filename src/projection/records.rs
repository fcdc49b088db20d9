//! Projection output structures
//!
//! Every monetary field is in man-yen.

use serde::{Deserialize, Serialize};

/// One simulated year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    // Timing
    pub year: i32,
    pub elapsed: i32,
    pub head_age: i32,
    pub child_ages: Vec<i32>,

    // Income
    pub labor_income: f64,
    pub partner_income: f64,
    pub pension: f64,
    pub income: f64,

    // Non-mortgage expenses
    pub education: f64,
    pub rearing: f64,
    pub boarding: f64,
    pub living: f64,
    pub non_mortgage_expense: f64,

    // Mortgage
    pub mortgage_payment: f64,
    pub mortgage_balance: f64,
    pub applied_rate: f64,

    // Cash flow
    pub retirement_contribution: f64,
    pub net_cash_flow: f64,
    /// Positive when drawn into cash, negative when swept out
    pub buffer_transfer: f64,

    // End-of-year balances
    pub cash: f64,
    pub domestic: f64,
    pub foreign_cash: f64,
    pub foreign_bond: f64,
    pub foreign_stock: f64,
    pub retirement_savings: f64,
    pub total_assets: f64,
    pub net_assets: f64,
}

impl YearRecord {
    pub fn new(year: i32, elapsed: i32) -> Self {
        Self {
            year,
            elapsed,
            ..Default::default()
        }
    }

    /// Education, rearing and boarding costs for the year
    pub fn child_cost(&self) -> f64 {
        self.education + self.rearing + self.boarding
    }

    /// Everything that left the household this year
    pub fn total_outflow(&self) -> f64 {
        self.non_mortgage_expense + self.mortgage_payment + self.retirement_contribution
    }
}

/// Complete projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// One row per simulated year, in increasing year order
    pub records: Vec<YearRecord>,

    /// First year cash stayed negative after every liquidation source ran dry
    pub insolvency_year: Option<i32>,

    /// Year of the lowest total assets (first occurrence)
    pub min_assets_year: i32,

    /// Lowest total assets seen
    pub min_assets_value: f64,

    /// Buffer target the run was held to
    pub buffer_target: f64,
}

impl ProjectionResult {
    pub fn new(start_year: i32, buffer_target: f64) -> Self {
        Self {
            records: Vec::new(),
            insolvency_year: None,
            min_assets_year: start_year,
            min_assets_value: f64::INFINITY,
            buffer_target,
        }
    }

    pub fn add_record(&mut self, record: YearRecord) {
        self.records.push(record);
    }

    pub fn record_for(&self, year: i32) -> Option<&YearRecord> {
        self.records.iter().find(|r| r.year == year)
    }

    /// Headline figures for the run
    pub fn summary(&self) -> ProjectionSummary {
        let total_child_cost: f64 = self.records.iter().map(YearRecord::child_cost).sum();
        let final_net_assets = self.records.last().map(|r| r.net_assets).unwrap_or(0.0);

        ProjectionSummary {
            years: self.records.len() as u32,
            total_child_cost,
            min_assets_year: self.min_assets_year,
            min_assets_value: self.min_assets_value,
            final_net_assets,
            insolvency_year: self.insolvency_year,
            min_above_buffer: self.min_assets_value > self.buffer_target,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub total_child_cost: f64,
    pub min_assets_year: i32,
    pub min_assets_value: f64,
    pub final_net_assets: f64,
    pub insolvency_year: Option<i32>,
    /// Lowest total assets stayed above the buffer target
    pub min_above_buffer: bool,
}

impl ProjectionSummary {
    pub fn is_solvent(&self) -> bool {
        self.insolvency_year.is_none()
    }
}
