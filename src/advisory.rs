//! Prompt construction for the optional advice service
//!
//! Text generation itself lives behind `AdviceGenerator`; this crate only
//! builds the prompt and shields callers from the service's failures.

use std::fmt;

use log::{error, info};
use serde::Serialize;

use crate::assumptions::{CurrencyScenario, EducationTrack};
use crate::household::SimulationParameters;
use crate::projection::ProjectionSummary;
use crate::report::format_man_yen;

/// Shown to the user whenever generation fails
pub const GENERIC_ADVICE_ERROR: &str = "Advice is unavailable right now. Please try again later.";

/// Error type returned by generator implementations
pub type GeneratorError = Box<dyn std::error::Error + Send + Sync>;

/// External text-generation service
pub trait AdviceGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildProfile {
    pub birth_year: i32,
    pub birth_month: u32,
    pub education_track: EducationTrack,
}

/// Facts handed to the advice service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvicePrompt {
    pub head_age: i32,
    pub base_salary: f64,
    pub retirement_age: i32,
    pub children: Vec<ChildProfile>,

    /// Opening portfolio (man-yen) and its split, as fractions
    pub portfolio_total: f64,
    pub safe_ratio: f64,
    pub bond_ratio: f64,
    pub stock_ratio: f64,
    pub currency_scenario: String,

    pub worst_year: i32,
    pub worst_year_assets: f64,
    pub final_net_assets: f64,
    pub insolvency_year: Option<i32>,
}

impl AdvicePrompt {
    pub fn build(params: &SimulationParameters, summary: &ProjectionSummary) -> Self {
        let assets = &params.assets;
        let total = assets.opening_total();
        let share = |amount: f64| if total > 0.0 { amount / total } else { 0.0 };

        let drift = assets.currency_drift;
        let currency_scenario = CurrencyScenario::from_drift(drift)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| format!("custom ({:+.1}%/yr)", drift * 100.0));

        Self {
            head_age: params.household.head_age,
            base_salary: params.income.base_salary,
            retirement_age: params.income.retirement_age,
            children: params
                .household
                .children
                .iter()
                .map(|c| ChildProfile {
                    birth_year: c.birth_year,
                    birth_month: c.birth_month,
                    education_track: c.education_track,
                })
                .collect(),
            portfolio_total: total,
            safe_ratio: share(assets.cash + assets.domestic.balance + assets.foreign_cash.balance),
            bond_ratio: share(assets.foreign_bond.balance),
            stock_ratio: share(assets.foreign_stock.balance + assets.retirement_savings),
            currency_scenario,
            worst_year: summary.min_assets_year,
            worst_year_assets: summary.min_assets_value,
            final_net_assets: summary.final_net_assets,
            insolvency_year: summary.insolvency_year,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AdvicePrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "As a financial planner, give investment and household budget advice based on this projection.\n"
        )?;

        writeln!(f, "# Household")?;
        writeln!(
            f,
            "- Head of household: age {}, salary {} man-yen (retires at {})",
            self.head_age,
            format_man_yen(self.base_salary),
            self.retirement_age
        )?;
        for (n, child) in self.children.iter().enumerate() {
            writeln!(
                f,
                "- Child {}: born {}-{:02}, education track {} ({})",
                n + 1,
                child.birth_year,
                child.birth_month,
                child.education_track.code(),
                child.education_track.description()
            )?;
        }

        writeln!(f, "\n# Current portfolio (total {} man-yen)", format_man_yen(self.portfolio_total))?;
        writeln!(f, "- Safe assets (cash, domestic, foreign cash): {:.1}%", self.safe_ratio * 100.0)?;
        writeln!(f, "- Foreign bonds: {:.1}%", self.bond_ratio * 100.0)?;
        writeln!(f, "- Foreign stocks (incl. retirement account): {:.1}%", self.stock_ratio * 100.0)?;
        writeln!(f, "- Currency scenario: {}", self.currency_scenario)?;

        writeln!(f, "\n# Projection")?;
        writeln!(
            f,
            "- Tightest year: {} (total assets {} man-yen)",
            self.worst_year,
            format_man_yen(self.worst_year_assets)
        )?;
        writeln!(f, "- Net assets at end of horizon: {} man-yen", format_man_yen(self.final_net_assets))?;
        if let Some(year) = self.insolvency_year {
            writeln!(f, "- Cash runs out in {}", year)?;
        }

        writeln!(f, "\n# Points to cover")?;
        writeln!(f, "1. Whether the current portfolio's risk suits this household")?;
        writeln!(f, "2. Risk of selling stocks during peak education costs, and how to avoid it")?;
        writeln!(f, "3. Exposure to currency moves and the allocation going forward")?;
        write!(f, "\nBe blunt and specific, three points.")
    }
}

/// Ask the service for advice; any failure becomes `GENERIC_ADVICE_ERROR`
pub fn request_advice(generator: &dyn AdviceGenerator, prompt: &AdvicePrompt) -> Result<String, &'static str> {
    info!("Requesting advice for worst year {}", prompt.worst_year);
    match generator.generate(&prompt.render()) {
        Ok(text) => Ok(text),
        Err(err) => {
            error!("Advice generation failed: {}", err);
            Err(GENERIC_ADVICE_ERROR)
        }
    }
}
