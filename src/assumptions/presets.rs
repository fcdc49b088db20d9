//! Named input presets offered to the household
//!
//! Presets only seed parameter values; once chosen, the numbers can be
//! edited freely and the engine never looks back at the preset.

use serde::{Deserialize, Serialize};

/// Salary scenario: starting salary (man-yen) and annual raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IncomePreset {
    Conservative,
    #[default]
    Standard,
    Aggressive,
}

impl IncomePreset {
    pub fn base_salary(&self) -> f64 {
        800.0
    }

    pub fn growth_rate(&self) -> f64 {
        match self {
            IncomePreset::Conservative => 0.005,
            IncomePreset::Standard => 0.015,
            IncomePreset::Aggressive => 0.03,
        }
    }
}

/// Annual living cost excluding housing, in man-yen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LivingPreset {
    /// 300k yen per month
    Frugal,
    /// 380k yen per month
    Standard,
    /// 480k yen per month
    #[default]
    Comfortable,
}

impl LivingPreset {
    pub fn annual_cost(&self) -> f64 {
        match self {
            LivingPreset::Frugal => 360.0,
            LivingPreset::Standard => 456.0,
            LivingPreset::Comfortable => 576.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InflationPreset {
    Zero,
    Low,
    #[default]
    Standard,
    High,
}

impl InflationPreset {
    pub fn rate(&self) -> f64 {
        match self {
            InflationPreset::Zero => 0.0,
            InflationPreset::Low => 0.01,
            InflationPreset::Standard => 0.02,
            InflationPreset::High => 0.03,
        }
    }
}

/// Assumed drift of foreign currency against the yen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurrencyScenario {
    /// Dollar gains 1.0% a year
    #[default]
    YenWeakening,
    Flat,
    /// Dollar loses 1.0% a year
    GradualYenStrength,
    /// Dollar loses 2.5% a year
    RapidYenStrength,
}

impl CurrencyScenario {
    pub fn drift_rate(&self) -> f64 {
        match self {
            CurrencyScenario::YenWeakening => 0.01,
            CurrencyScenario::Flat => 0.0,
            CurrencyScenario::GradualYenStrength => -0.01,
            CurrencyScenario::RapidYenStrength => -0.025,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CurrencyScenario::YenWeakening => "weak yen (+1.0%/yr)",
            CurrencyScenario::Flat => "flat (0%/yr)",
            CurrencyScenario::GradualYenStrength => "gradual strong yen (-1.0%/yr)",
            CurrencyScenario::RapidYenStrength => "rapid strong yen (-2.5%/yr)",
        }
    }

    /// Scenario whose drift matches `rate`, if any
    pub fn from_drift(rate: f64) -> Option<Self> {
        [
            CurrencyScenario::YenWeakening,
            CurrencyScenario::Flat,
            CurrencyScenario::GradualYenStrength,
            CurrencyScenario::RapidYenStrength,
        ]
        .into_iter()
        .find(|s| (s.drift_rate() - rate).abs() < 1e-12)
    }
}
