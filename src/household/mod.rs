//! Household parameter structures and loading

mod data;
pub mod loader;

pub use data::{
    AssetAssumptions, Child, Holding, Household, IncomeAssumptions, LivingCostAssumptions,
    MortgageTerms, SimulationParameters, REFERENCE_START_YEAR,
};
pub use loader::{load_parameters, load_parameters_from_reader};
