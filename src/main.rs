//! Household Projector CLI
//!
//! Command-line interface for running a household projection

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use household_projector::access::{AccessGate, GateSession};
use household_projector::advisory::AdvicePrompt;
use household_projector::assumptions::{
    Assumptions, CurrencyScenario, EducationTrack, IncomePreset, InflationPreset, LivingPreset,
};
use household_projector::household::{load_parameters, SimulationParameters};
use household_projector::projection::{ProjectionConfig, RateScenario};
use household_projector::report::{format_man_yen, milestones, write_year_table_to_path};
use household_projector::ScenarioRunner;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliIncomePreset {
    Conservative,
    Standard,
    Aggressive,
}

impl From<CliIncomePreset> for IncomePreset {
    fn from(value: CliIncomePreset) -> Self {
        match value {
            CliIncomePreset::Conservative => IncomePreset::Conservative,
            CliIncomePreset::Standard => IncomePreset::Standard,
            CliIncomePreset::Aggressive => IncomePreset::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliLivingPreset {
    Frugal,
    Standard,
    Comfortable,
}

impl From<CliLivingPreset> for LivingPreset {
    fn from(value: CliLivingPreset) -> Self {
        match value {
            CliLivingPreset::Frugal => LivingPreset::Frugal,
            CliLivingPreset::Standard => LivingPreset::Standard,
            CliLivingPreset::Comfortable => LivingPreset::Comfortable,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliInflation {
    Zero,
    Low,
    Standard,
    High,
}

impl From<CliInflation> for InflationPreset {
    fn from(value: CliInflation) -> Self {
        match value {
            CliInflation::Zero => InflationPreset::Zero,
            CliInflation::Low => InflationPreset::Low,
            CliInflation::Standard => InflationPreset::Standard,
            CliInflation::High => InflationPreset::High,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCurrency {
    YenWeakening,
    Flat,
    GradualYenStrength,
    RapidYenStrength,
}

impl From<CliCurrency> for CurrencyScenario {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::YenWeakening => CurrencyScenario::YenWeakening,
            CliCurrency::Flat => CurrencyScenario::Flat,
            CliCurrency::GradualYenStrength => CurrencyScenario::GradualYenStrength,
            CliCurrency::RapidYenStrength => CurrencyScenario::RapidYenStrength,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRateScenario {
    Fixed,
    Stable,
    Rising,
    SharpRising,
}

impl From<CliRateScenario> for RateScenario {
    fn from(value: CliRateScenario) -> Self {
        match value {
            CliRateScenario::Fixed => RateScenario::Fixed,
            CliRateScenario::Stable => RateScenario::Stable,
            CliRateScenario::Rising => RateScenario::Rising,
            CliRateScenario::SharpRising => RateScenario::SharpRising,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "household_projector",
    about = "Project household cash flow, portfolio and mortgage year by year"
)]
struct Cli {
    #[arg(long, help = "JSON parameter file; defaults are used when omitted")]
    params: Option<PathBuf>,
    #[arg(long, help = "Directory with education_costs.csv / rearing_costs.csv overrides")]
    assumptions: Option<PathBuf>,
    #[arg(long)]
    head_age: Option<i32>,
    #[arg(long, value_enum, help = "Starting salary and raise preset")]
    income_preset: Option<CliIncomePreset>,
    #[arg(long, help = "Base salary in man-yen; overrides the income preset")]
    salary: Option<f64>,
    #[arg(long, value_enum)]
    living_preset: Option<CliLivingPreset>,
    #[arg(long, value_enum)]
    inflation: Option<CliInflation>,
    #[arg(long, value_enum)]
    currency: Option<CliCurrency>,
    #[arg(long, value_enum)]
    rate_scenario: Option<CliRateScenario>,
    #[arg(long, help = "Education track (A-I) of the first child")]
    education_track: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, help = "Run every rate scenario and compare the headline figures")]
    compare_rates: bool,
    #[arg(long, default_value = "projection_output.csv")]
    output: PathBuf,
    #[arg(long, help = "Print the summary as JSON")]
    json: bool,
    #[arg(long, help = "Print the prompt that would be sent to the advice service")]
    advice_prompt: bool,
    #[arg(long, help = "Required when PROJECTOR_SECRET is set")]
    password: Option<String>,
}

fn apply_overrides(cli: &Cli, params: &mut SimulationParameters) -> Result<()> {
    if let Some(age) = cli.head_age {
        params.household.head_age = age;
    }
    if let Some(preset) = cli.income_preset.map(IncomePreset::from) {
        params.income.base_salary = preset.base_salary();
        params.income.growth_rate = preset.growth_rate();
    }
    if let Some(salary) = cli.salary {
        params.income.base_salary = salary;
    }
    if let Some(preset) = cli.living_preset.map(LivingPreset::from) {
        params.living.base_living_cost = preset.annual_cost();
    }
    if let Some(preset) = cli.inflation.map(InflationPreset::from) {
        params.living.inflation_rate = preset.rate();
    }
    if let Some(scenario) = cli.currency.map(CurrencyScenario::from) {
        params.assets.currency_drift = scenario.drift_rate();
    }
    if let Some(scenario) = cli.rate_scenario {
        params.mortgage.rate_scenario = scenario.into();
    }
    if let Some(code) = &cli.education_track {
        let track = EducationTrack::from_code(&code.to_uppercase())
            .with_context(|| format!("unknown education track `{}` (expected A-I)", code))?;
        match params.household.children.first_mut() {
            Some(child) => child.education_track = track,
            None => bail!("no child to assign education track {} to", track.code()),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let gate = AccessGate::from_env();
    let mut session = GateSession::new();
    if gate.is_configured() && !gate.attempt(&mut session, cli.password.as_deref().unwrap_or("")) {
        bail!("access denied: wrong or missing --password");
    }

    let mut params = match &cli.params {
        Some(path) => load_parameters(path).with_context(|| format!("loading {}", path.display()))?,
        None => SimulationParameters::default(),
    };
    apply_overrides(&cli, &mut params)?;
    let config = ProjectionConfig {
        seed: cli.seed,
        ..Default::default()
    };
    params
        .validate_for(config.start_year)
        .context("invalid parameters after applying flags")?;

    let assumptions = match &cli.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir).with_context(|| format!("loading tables from {}", dir.display()))?,
        None => Assumptions::reference(),
    };
    let runner = ScenarioRunner::with_assumptions(assumptions);

    if cli.compare_rates {
        println!("{:<14} {:>12} {:>10} {:>14} {:>12}", "Scenario", "Worst year", "Assets", "Final net", "Insolvent");
        println!("{}", "-".repeat(66));
        for (scenario, result) in runner.run_rate_scenarios(&params, config.clone()) {
            let summary = result.summary();
            println!(
                "{:<14} {:>12} {:>10} {:>14} {:>12}",
                scenario.label(),
                summary.min_assets_year,
                format_man_yen(summary.min_assets_value),
                format_man_yen(summary.final_net_assets),
                summary.insolvency_year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()),
            );
        }
        println!();
    }

    let result = runner.run(&params, config);
    let summary = result.summary();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Household Projection ({} years)", summary.years);
        println!("{}", "=".repeat(40));
        println!(
            "{:<26} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Year (ages)", "Income", "Cash flow", "Total", "Loan", "Net"
        );
        println!("{}", "-".repeat(81));
        for milestone in milestones(&result.records) {
            let r = milestone.record;
            println!(
                "{:<26} {:>10} {:>10} {:>10} {:>10} {:>10}",
                milestone.label,
                format_man_yen(r.income),
                format_man_yen(r.net_cash_flow),
                format_man_yen(r.total_assets),
                format_man_yen(r.mortgage_balance),
                format_man_yen(r.net_assets),
            );
        }

        let boarding = params.household.children.iter().any(|c| c.boarding);
        println!("\nSummary (man-yen):");
        println!(
            "  Child costs:        {} ({})",
            format_man_yen(summary.total_child_cost),
            if boarding { "incl. boarding allowance" } else { "living at home" }
        );
        match summary.insolvency_year {
            Some(year) => println!("  Cash runs out in:   {}", year),
            None => println!(
                "  Tightest year:      {} ({}{})",
                summary.min_assets_year,
                format_man_yen(summary.min_assets_value),
                if summary.min_above_buffer { "" } else { ", below buffer" }
            ),
        }
        println!("  Final net assets:   {}", format_man_yen(summary.final_net_assets));
    }

    if cli.advice_prompt {
        println!("\n{}", AdvicePrompt::build(&params, &summary).render());
    }

    write_year_table_to_path(&cli.output, &result.records)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    if !cli.json {
        println!("\nFull results written to: {}", cli.output.display());
    }

    Ok(())
}
