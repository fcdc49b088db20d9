//! Run many seeded projections of one mortgage rate scenario
//!
//! Outputs per-year percentile bands of net assets, mortgage payment and
//! applied rate

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use household_projector::household::{load_parameters, SimulationParameters};
use household_projector::projection::{ProjectionConfig, RateScenario, YearRecord};
use household_projector::report::format_man_yen;
use household_projector::ScenarioRunner;

const PERCENTILES: [f64; 3] = [5.0, 50.0, 95.0];

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
#[command(name = "rate_stress", about = "Percentile bands across seeded rate paths")]
struct Cli {
    #[arg(long)]
    params: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = CliRateScenario::Stable)]
    scenario: CliRateScenario,
    #[arg(long, default_value_t = 1000)]
    runs: u64,
    #[arg(long, default_value_t = 0)]
    base_seed: u64,
    #[arg(long, default_value = "rate_stress_output.csv")]
    output: PathBuf,
}

/// Nearest-rank percentile of an ascending slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Percentiles of one field across runs for year index `i`
fn band(runs: &[Vec<YearRecord>], i: usize, field: fn(&YearRecord) -> f64) -> Vec<f64> {
    let mut values: Vec<f64> = runs.iter().filter_map(|r| r.get(i)).map(field).collect();
    values.sort_by(f64::total_cmp);
    PERCENTILES.iter().map(|&p| percentile(&values, p)).collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut params = match &cli.params {
        Some(path) => load_parameters(path).with_context(|| format!("loading {}", path.display()))?,
        None => SimulationParameters::default(),
    };
    params.mortgage.rate_scenario = cli.scenario.into();

    let start = Instant::now();
    println!(
        "Running {} projections of the {} scenario...",
        cli.runs,
        params.mortgage.rate_scenario.label()
    );

    let seeds: Vec<u64> = (0..cli.runs).map(|i| cli.base_seed + i).collect();
    let runner = ScenarioRunner::new();
    let results = runner.run_seeds(&params, &ProjectionConfig::default(), &seeds);
    println!("Projections complete in {:?}", start.elapsed());

    let insolvent = results.iter().filter(|r| r.insolvency_year.is_some()).count();
    let finals: Vec<f64> = results.iter().map(|r| r.summary().final_net_assets).collect();
    let runs: Vec<Vec<YearRecord>> = results.into_iter().map(|r| r.records).collect();
    let years: Vec<i32> = runs
        .first()
        .map(|r| r.iter().map(|x| x.year).collect())
        .unwrap_or_default();

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    writer.write_record([
        "year",
        "net_assets_p5",
        "net_assets_p50",
        "net_assets_p95",
        "payment_p5",
        "payment_p50",
        "payment_p95",
        "applied_rate_p5",
        "applied_rate_p50",
        "applied_rate_p95",
    ])?;

    for (i, year) in years.iter().enumerate() {
        let mut row = vec![year.to_string()];
        row.extend(band(&runs, i, |r| r.net_assets).iter().map(|v| format!("{:.2}", v)));
        row.extend(band(&runs, i, |r| r.mortgage_payment).iter().map(|v| format!("{:.2}", v)));
        row.extend(band(&runs, i, |r| r.applied_rate).iter().map(|v| format!("{:.6}", v)));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    println!("Output written to {}", cli.output.display());

    let mut sorted = finals;
    sorted.sort_by(f64::total_cmp);
    println!("\nFinal net assets (man-yen):");
    for p in PERCENTILES {
        println!("  p{:<3} {:>12}", p, format_man_yen(percentile(&sorted, p)));
    }
    println!("  Insolvent runs: {} of {}", insolvent, cli.runs);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
