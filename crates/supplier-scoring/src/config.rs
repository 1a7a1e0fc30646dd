//! Scorer configuration
//!
//! Every lookup table and calibration constant a scorer reads is held here
//! and injected at construction. `ScoringConfig::default()` reproduces the
//! published constants; a JSON file may override any section.

use crate::emission_factors::EmissionFactorTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scoring configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Reference quantities at which an impact dimension is fully "used up"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactBaselines {
    /// kWh
    pub energy: f64,
    /// m³
    pub water: f64,
    /// kg
    pub waste: f64,
    /// kg CO2e
    pub emissions: f64,
}

impl Default for ImpactBaselines {
    fn default() -> Self {
        Self {
            energy: 1000.0,
            water: 100.0,
            waste: 50.0,
            emissions: 100.0,
        }
    }
}

/// Sustainability score weights (sum = 1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SustainabilityWeights {
    pub energy: f64,
    pub water: f64,
    pub waste: f64,
    pub emissions: f64,
    pub recycling: f64,
    pub renewable: f64,
}

impl Default for SustainabilityWeights {
    fn default() -> Self {
        Self {
            energy: 0.25,
            water: 0.20,
            waste: 0.20,
            emissions: 0.20,
            recycling: 0.10,
            renewable: 0.05,
        }
    }
}

impl SustainabilityWeights {
    pub fn sum(&self) -> f64 {
        self.energy + self.water + self.waste + self.emissions + self.recycling + self.renewable
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentalConfig {
    pub baselines: ImpactBaselines,
    pub weights: SustainabilityWeights,
    /// Certifications reported in `certification_status`
    pub certifications: BTreeSet<String>,
}

impl Default for EnvironmentalConfig {
    fn default() -> Self {
        Self {
            baselines: ImpactBaselines::default(),
            weights: SustainabilityWeights::default(),
            certifications: ["ISO14001", "ISO50001", "LEED"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// Certifications reported in `certification_status`
    pub certifications: BTreeSet<String>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            certifications: ["ISO9001", "ISO14001", "ISO45001"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub emission_factors: EmissionFactorTable,
    pub environmental: EnvironmentalConfig,
    pub quality: QualityConfig,
}

impl ScoringConfig {
    /// Load and validate a JSON config file. Sections missing from the file
    /// keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading scoring config from {:?}", path);

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let config: ScoringConfig = serde_json::from_reader(reader)?;

        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Returns all problems at once, not just the first.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(mut table_errors) = self.emission_factors.validate() {
            errors.append(&mut table_errors);
        }

        let b = &self.environmental.baselines;
        for (name, value) in [
            ("energy", b.energy),
            ("water", b.water),
            ("waste", b.waste),
            ("emissions", b.emissions),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(format!(
                    "environmental.baselines.{}: must be greater than zero, got {}",
                    name, value
                ));
            }
        }

        let w = &self.environmental.weights;
        for (name, value) in [
            ("energy", w.energy),
            ("water", w.water),
            ("waste", w.waste),
            ("emissions", w.emissions),
            ("recycling", w.recycling),
            ("renewable", w.renewable),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!(
                    "environmental.weights.{}: must be between 0 and 1, got {}",
                    name, value
                ));
            }
        }
        if (w.sum() - 1.0).abs() > 0.001 {
            errors.push(format!(
                "environmental.weights: must sum to 1.0, got {:.4}",
                w.sum()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
