//! Household Projector - multi-decade household finance projection engine
//!
//! This library provides:
//! - Year-by-year income and expense schedules (salary path, retirement,
//!   pension, per-child education and rearing costs, inflated living costs)
//! - Mortgage amortization under fixed, drifting, and rising rate paths
//! - Six-bucket portfolio growth with currency-adjusted foreign returns and a
//!   cash buffer refilled through a liquidation waterfall
//! - Solvency tracking: worst year, insolvency year, final net assets
//! - Batch and seeded multi-scenario runs
//!
//! Parameters and outputs are in man-yen (10,000 yen).

pub mod access;
pub mod advisory;
pub mod assumptions;
pub mod error;
pub mod household;
pub mod leaderboard;
pub mod projection;
pub mod report;
pub mod scenario;

/// Yen per man-yen
pub const MAN_YEN: f64 = 10_000.0;

// Re-export commonly used types
pub use assumptions::{Assumptions, CostTable, EducationTrack, RearingPlan};
pub use error::{Error, Result};
pub use household::{Child, SimulationParameters};
pub use projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary, RateScenario, YearRecord};
pub use scenario::ScenarioRunner;
