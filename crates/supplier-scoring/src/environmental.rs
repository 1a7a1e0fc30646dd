//! Environmental impact and sustainability scoring
//!
//! # Carbon Footprint (metric tons CO2e)
//!
//! ```text
//! footprint = (energy·0.5 + water·0.298 + waste·2.53 + direct_emissions) / 1000
//! ```
//!
//! # Sustainability Score
//!
//! ```text
//! impact(x, baseline) = min(1, x / baseline)
//! S = Σ w_d · 100·(1 − impact_d)  +  w_r·recycling_rate  +  w_n·renewable_usage
//! ```
//!
//! | Factor | Weight | Baseline |
//! |--------|--------|----------|
//! | Energy (kWh) | 0.25 | 1000 |
//! | Water (m³) | 0.20 | 100 |
//! | Waste (kg) | 0.20 | 50 |
//! | Emissions (kg CO2e) | 0.20 | 100 |
//! | Recycling rate (%) | 0.10 | - |
//! | Renewable energy (%) | 0.05 | - |

use crate::config::EnvironmentalConfig;
use crate::recommendations::{self, ImpactScores};
use crate::{clamp_score, ensure_finite, require_non_negative, require_range, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// kg CO2e per kWh
pub const ENERGY_CO2E_FACTOR: f64 = 0.5;
/// kg CO2e per m³
pub const WATER_CO2E_FACTOR: f64 = 0.298;
/// kg CO2e per kg
pub const WASTE_CO2E_FACTOR: f64 = 2.53;

/// Impact score above which a dimension is non-compliant
pub const COMPLIANCE_LIMIT: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentalInput {
    /// kWh
    pub energy_consumption: f64,
    /// m³
    pub water_usage: f64,
    /// kg
    pub waste_generated: f64,
    /// Direct emissions, kg CO2e
    pub carbon_emissions: f64,
    /// Percent
    pub recycling_rate: f64,
    /// Percent
    pub renewable_energy_usage: f64,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
}

impl EnvironmentalInput {
    pub fn validate(&self) -> Result<()> {
        require_non_negative("energy_consumption", self.energy_consumption)?;
        require_non_negative("water_usage", self.water_usage)?;
        require_non_negative("waste_generated", self.waste_generated)?;
        require_non_negative("carbon_emissions", self.carbon_emissions)?;
        require_range("recycling_rate", self.recycling_rate, 0.0, 100.0)?;
        require_range("renewable_energy_usage", self.renewable_energy_usage, 0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SustainabilityLevel {
    Low,
    Medium,
    High,
}

impl SustainabilityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::High
        } else if score >= 60.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyImpact {
    pub consumption: f64,
    pub renewable_percentage: f64,
    pub impact_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterImpact {
    pub usage: f64,
    pub impact_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteImpact {
    pub generated: f64,
    pub recycling_rate: f64,
    pub impact_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsImpact {
    pub direct_emissions: f64,
    pub impact_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactBreakdown {
    pub energy: EnergyImpact,
    pub water: WaterImpact,
    pub waste: WasteImpact,
    pub emissions: EmissionsImpact,
}

impl ImpactBreakdown {
    fn scores(&self) -> ImpactScores {
        ImpactScores {
            energy: self.energy.impact_score,
            water: self.water.impact_score,
            waste: self.waste.impact_score,
            emissions: self.emissions.impact_score,
        }
    }
}

/// `true` where the dimension's impact score is within the limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceStatus {
    pub energy: bool,
    pub water: bool,
    pub waste: bool,
    pub emissions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalAssessment {
    /// 0-100
    pub environmental_score: f64,
    /// Metric tons CO2e
    pub carbon_footprint: f64,
    pub sustainability_level: SustainabilityLevel,
    pub impact_breakdown: ImpactBreakdown,
    pub certification_status: BTreeMap<String, bool>,
    pub recommendations: Vec<String>,
    pub compliance_status: ComplianceStatus,
}

#[derive(Debug, Clone, Default)]
pub struct EnvironmentalScorer {
    config: EnvironmentalConfig,
}

impl EnvironmentalScorer {
    pub fn new(config: EnvironmentalConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, input: &EnvironmentalInput) -> Result<EnvironmentalAssessment> {
        input.validate()?;

        let carbon_footprint = (input.energy_consumption * ENERGY_CO2E_FACTOR
            + input.water_usage * WATER_CO2E_FACTOR
            + input.waste_generated * WASTE_CO2E_FACTOR
            + input.carbon_emissions)
            / 1000.0;
        let carbon_footprint = ensure_finite("carbon_footprint", carbon_footprint)?;

        let b = &self.config.baselines;
        let impact_breakdown = ImpactBreakdown {
            energy: EnergyImpact {
                consumption: input.energy_consumption,
                renewable_percentage: input.renewable_energy_usage,
                impact_score: normalize_impact(input.energy_consumption, b.energy),
            },
            water: WaterImpact {
                usage: input.water_usage,
                impact_score: normalize_impact(input.water_usage, b.water),
            },
            waste: WasteImpact {
                generated: input.waste_generated,
                recycling_rate: input.recycling_rate,
                impact_score: normalize_impact(input.waste_generated, b.waste),
            },
            emissions: EmissionsImpact {
                direct_emissions: input.carbon_emissions,
                impact_score: normalize_impact(input.carbon_emissions, b.emissions),
            },
        };

        let impact = impact_breakdown.scores();
        let environmental_score = clamp_score(ensure_finite(
            "environmental_score",
            self.sustainability_score(&impact, input.recycling_rate, input.renewable_energy_usage),
        )?);
        let sustainability_level = SustainabilityLevel::from_score(environmental_score);

        debug!(
            "Environmental: score={:.2} ({:?}), footprint={:.4} t (energy={:.2}, water={:.2}, waste={:.2}, emissions={:.2})",
            environmental_score, sustainability_level, carbon_footprint,
            impact.energy, impact.water, impact.waste, impact.emissions
        );

        Ok(EnvironmentalAssessment {
            environmental_score,
            carbon_footprint,
            sustainability_level,
            certification_status: certification_status(&self.config.certifications, &input.certifications),
            recommendations: recommendations::environmental(&impact),
            compliance_status: ComplianceStatus {
                energy: impact.energy <= COMPLIANCE_LIMIT,
                water: impact.water <= COMPLIANCE_LIMIT,
                waste: impact.waste <= COMPLIANCE_LIMIT,
                emissions: impact.emissions <= COMPLIANCE_LIMIT,
            },
            impact_breakdown,
        })
    }

    fn sustainability_score(&self, impact: &ImpactScores, recycling_rate: f64, renewable_usage: f64) -> f64 {
        let w = &self.config.weights;

        w.energy * 100.0 * (1.0 - impact.energy)
            + w.water * 100.0 * (1.0 - impact.water)
            + w.waste * 100.0 * (1.0 - impact.waste)
            + w.emissions * 100.0 * (1.0 - impact.emissions)
            + w.recycling * recycling_rate
            + w.renewable * renewable_usage
    }
}

/// Share of the baseline used, capped at 1
pub fn normalize_impact(value: f64, baseline: f64) -> f64 {
    (value / baseline).min(1.0)
}

/// Report which of the recognised certifications the supplier holds.
/// Unrecognised certifications are ignored.
pub(crate) fn certification_status(
    recognised: &BTreeSet<String>,
    held: &BTreeSet<String>,
) -> BTreeMap<String, bool> {
    recognised
        .iter()
        .map(|cert| (cert.clone(), held.contains(cert)))
        .collect()
}
