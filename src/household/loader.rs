//! Load simulation parameters from JSON documents
//!
//! Every section is optional; missing fields fall back to the defaults
//! in `SimulationParameters::default()`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;

use super::SimulationParameters;
use crate::error::Result;

/// Load and validate parameters from a JSON file
pub fn load_parameters<P: AsRef<Path>>(path: P) -> Result<SimulationParameters> {
    let path = path.as_ref();
    let params = load_parameters_from_reader(BufReader::new(File::open(path)?))?;
    info!("Loaded household parameters from {}", path.display());
    Ok(params)
}

/// Load and validate parameters from any reader (e.g., request body)
pub fn load_parameters_from_reader<R: Read>(reader: R) -> Result<SimulationParameters> {
    let params: SimulationParameters = serde_json::from_reader(reader)?;
    params.validate()?;
    Ok(params)
}
