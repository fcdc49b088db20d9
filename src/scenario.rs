//! Scenario runner for batch projections
//!
//! Pre-loads assumptions once, then allows running many projections with
//! different parameters, configurations, rate scenarios, or seeds without
//! re-reading CSV files.

use std::path::Path;

use rayon::prelude::*;

use crate::assumptions::Assumptions;
use crate::error::Result;
use crate::household::SimulationParameters;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult, RateScenario};

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for scenario in RateScenario::ALL {
///     let mut params = params.clone();
///     params.mortgage.rate_scenario = scenario;
///     let result = runner.run(&params, ProjectionConfig::with_seed(7));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner with the built-in reference tables
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::reference(),
        }
    }

    /// Create runner by loading table overrides from the default directory
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    /// Create runner from a specific assumptions directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    fn engine(&self, config: ProjectionConfig) -> ProjectionEngine {
        ProjectionEngine::new(self.base_assumptions.clone(), config)
    }

    /// Run a single projection with the given config
    pub fn run(&self, params: &SimulationParameters, config: ProjectionConfig) -> ProjectionResult {
        self.engine(config).project(params)
    }

    /// Run several households under the same config
    pub fn run_batch(&self, households: &[SimulationParameters], config: ProjectionConfig) -> Vec<ProjectionResult> {
        let engine = self.engine(config);
        households.iter().map(|p| engine.project(p)).collect()
    }

    /// Run one household under several configs
    pub fn run_scenarios(&self, params: &SimulationParameters, configs: &[ProjectionConfig]) -> Vec<ProjectionResult> {
        configs
            .iter()
            .map(|config| self.engine(config.clone()).project(params))
            .collect()
    }

    /// Run one household under every mortgage rate scenario
    pub fn run_rate_scenarios(
        &self,
        params: &SimulationParameters,
        config: ProjectionConfig,
    ) -> Vec<(RateScenario, ProjectionResult)> {
        let engine = self.engine(config);
        RateScenario::ALL
            .iter()
            .map(|&scenario| {
                let mut params = params.clone();
                params.mortgage.rate_scenario = scenario;
                (scenario, engine.project(&params))
            })
            .collect()
    }

    /// Run independent seeded projections in parallel, in seed order
    pub fn run_seeds(
        &self,
        params: &SimulationParameters,
        config: &ProjectionConfig,
        seeds: &[u64],
    ) -> Vec<ProjectionResult> {
        seeds
            .par_iter()
            .map(|&seed| {
                let config = ProjectionConfig {
                    seed: Some(seed),
                    ..config.clone()
                };
                self.engine(config).project(params)
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Mutable access for customizing tables before a batch
    pub fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{CostTable, EducationTrack, COST_TABLE_AGES};

    #[test]
    fn test_rate_scenarios_ordered_by_cost() {
        let runner = ScenarioRunner::new();
        let results = runner.run_rate_scenarios(&SimulationParameters::default(), ProjectionConfig::with_seed(1));
        assert_eq!(results.len(), 4);

        let net = |s: RateScenario| {
            results
                .iter()
                .find(|(scenario, _)| *scenario == s)
                .map(|(_, r)| r.summary().final_net_assets)
                .unwrap_or(f64::NAN)
        };
        assert!(net(RateScenario::Fixed) > net(RateScenario::Rising));
        assert!(net(RateScenario::Rising) > net(RateScenario::SharpRising));
    }

    #[test]
    fn test_seeds_run_in_parallel_reproducibly() {
        let runner = ScenarioRunner::new();
        let mut params = SimulationParameters::default();
        params.mortgage.rate_scenario = RateScenario::Stable;
        let config = ProjectionConfig::default();

        let parallel = runner.run_seeds(&params, &config, &[1, 2, 3]);
        let serial = runner.run(&params, ProjectionConfig::with_seed(2));
        assert_eq!(parallel.len(), 3);
        assert_eq!(parallel[1].summary(), serial.summary());
    }

    #[test]
    fn test_custom_tables_change_child_cost() {
        let mut runner = ScenarioRunner::new();
        let params = SimulationParameters::default();
        let config = ProjectionConfig::with_seed(1);
        let before = runner.run(&params, config.clone()).summary().total_child_cost;

        runner
            .assumptions_mut()
            .costs
            .set_education(EducationTrack::I, CostTable::new([0.0; COST_TABLE_AGES]));
        let after = runner.run(&params, config).summary().total_child_cost;
        assert!(after < before);

        let batch = runner.run_batch(&[params.clone(), params], ProjectionConfig::with_seed(1));
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].summary(), batch[1].summary());
    }
}
