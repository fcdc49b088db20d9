//! Reference data and input presets for household projections

mod cost_tables;
pub mod loader;
pub mod presets;

pub use cost_tables::{CostTable, CostTables, EducationTrack, RearingPlan, COST_TABLE_AGES};
pub use loader::LoadedAssumptions;
pub use presets::{CurrencyScenario, IncomePreset, InflationPreset, LivingPreset};

use std::path::Path;

use crate::error::Result;

/// Container for all projection assumptions
#[derive(Debug, Clone, Default)]
pub struct Assumptions {
    pub costs: CostTables,
}

impl Assumptions {
    /// Built-in reference tables
    pub fn reference() -> Self {
        Self {
            costs: CostTables::reference(),
        }
    }

    /// Load table overrides from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Ok(Self::reference().with_loaded(LoadedAssumptions::load_default()?))
    }

    /// Load table overrides from a specific directory; curves not present
    /// in the files keep their reference values
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;
        Ok(Self::reference().with_loaded(loaded))
    }

    pub fn with_loaded(mut self, loaded: LoadedAssumptions) -> Self {
        for (track, table) in loaded.education {
            self.costs.set_education(track, table);
        }
        for (plan, table) in loaded.rearing {
            self.costs.set_rearing(plan, table);
        }
        self
    }
}
