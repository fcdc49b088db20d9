//! CSV-based cost table loader
//!
//! Loads education and rearing cost curves from CSV files in data/assumptions/.
//! Both files are wide: one row per child age, one column per curve.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use super::cost_tables::{CostTable, EducationTrack, RearingPlan, COST_TABLE_AGES};
use crate::error::{Error, Result};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const EDUCATION_COSTS_FILE: &str = "education_costs.csv";
pub const REARING_COSTS_FILE: &str = "rearing_costs.csv";

/// Read a wide by-age table: header `age,<name>,<name>...`
/// Returns (column name, curve) pairs in header order
fn read_wide_table<R: Read>(reader: R, table: &str) -> Result<Vec<(String, CostTable)>> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    if headers.get(0).map(str::trim) != Some("age") {
        return Err(Error::MalformedTable {
            table: table.to_string(),
            reason: "first column must be `age`".to_string(),
        });
    }

    let names: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();
    let mut curves = vec![CostTable::new([0.0; COST_TABLE_AGES]); names.len()];

    for result in reader.records() {
        let record = result?;
        let age: usize = record[0].trim().parse().map_err(|_| Error::MalformedTable {
            table: table.to_string(),
            reason: format!("bad age `{}`", &record[0]),
        })?;
        if age >= COST_TABLE_AGES {
            return Err(Error::MalformedTable {
                table: table.to_string(),
                reason: format!("age {} outside 0..{}", age, COST_TABLE_AGES),
            });
        }

        for (column, curve) in curves.iter_mut().enumerate() {
            let raw = record.get(column + 1).unwrap_or("").trim();
            let cost: f64 = raw.parse().map_err(|_| Error::MalformedTable {
                table: table.to_string(),
                reason: format!("bad cost `{}` at age {}", raw, age),
            })?;
            curve.set_cost(age, cost);
        }
    }

    Ok(names.into_iter().zip(curves).collect())
}

/// Load education curves keyed by track code (A..I)
pub fn load_education_costs<R: Read>(reader: R) -> Result<Vec<(EducationTrack, CostTable)>> {
    read_wide_table(reader, EDUCATION_COSTS_FILE)?
        .into_iter()
        .map(|(name, curve)| {
            EducationTrack::from_code(&name)
                .map(|track| (track, curve))
                .ok_or_else(|| Error::MalformedTable {
                    table: EDUCATION_COSTS_FILE.to_string(),
                    reason: format!("unknown education track `{}`", name),
                })
        })
        .collect()
}

/// Load rearing curves keyed by plan (standard, generous)
pub fn load_rearing_costs<R: Read>(reader: R) -> Result<Vec<(RearingPlan, CostTable)>> {
    read_wide_table(reader, REARING_COSTS_FILE)?
        .into_iter()
        .map(|(name, curve)| {
            RearingPlan::from_code(&name)
                .map(|plan| (plan, curve))
                .ok_or_else(|| Error::MalformedTable {
                    table: REARING_COSTS_FILE.to_string(),
                    reason: format!("unknown rearing plan `{}`", name),
                })
        })
        .collect()
}

/// Cost curves loaded from a directory; either file may be absent
#[derive(Debug, Default)]
pub struct LoadedAssumptions {
    pub education: Vec<(EducationTrack, CostTable)>,
    pub rearing: Vec<(RearingPlan, CostTable)>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut loaded = LoadedAssumptions::default();

        let education_path = path.join(EDUCATION_COSTS_FILE);
        if education_path.exists() {
            loaded.education = load_education_costs(File::open(&education_path)?)?;
            info!("Loaded {} education curves from {}", loaded.education.len(), education_path.display());
        }

        let rearing_path = path.join(REARING_COSTS_FILE);
        if rearing_path.exists() {
            loaded.rearing = load_rearing_costs(File::open(&rearing_path)?)?;
            info!("Loaded {} rearing curves from {}", loaded.rearing.len(), rearing_path.display());
        }

        Ok(loaded)
    }
}
