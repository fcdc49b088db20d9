//! Projection engine for year-by-year household projections

mod engine;
mod mortgage;
mod portfolio;
mod records;
mod schedule;
mod state;
mod timeline;

pub use engine::{ProjectionConfig, ProjectionEngine};
pub use mortgage::{level_payment, AmortizationState, MortgageYear, RateScenario};
pub use portfolio::{
    currency_adjusted, Bucket, BufferAction, BufferPolicy, GrowthRates, PortfolioState, LIQUIDATION_ORDER,
};
pub use records::{ProjectionResult, ProjectionSummary, YearRecord};
pub use schedule::{expenses_for, EmploymentStage, ExpenseBreakdown, IncomeBreakdown, IncomeSchedule};
pub use state::ProjectionState;
pub use timeline::Timeline;
