//! Supplier Scoring
//!
//! Deterministic scoring engines for supplier assessment. Every scorer is a
//! pure function of one validated input record and its injected
//! configuration: no shared mutable state, no clock, no I/O.
//!
//! # Scorers
//!
//! | Scorer | Input | Headline output |
//! |--------|-------|-----------------|
//! | [`TransportationScorer`] | distance, volume, mode, load factor | efficiency score (0-100) |
//! | [`EconomicScorer`] | cost components, capacity, volume | economic score (0-100), ROI |
//! | [`EnvironmentalScorer`] | consumption, waste, emissions | sustainability score (0-100) |
//! | [`QualityScorer`] | measurements vs standards | quality score (0-100), risk level |
//! | [`TradeoffScorer`] | the three scores above + weights | balanced score, tradeoff matrix |
//!
//! # Tradeoff Model
//!
//! ```text
//! balanced = (w_e·E + w_q·Q + w_env·Env) / (w_e + w_q + w_env)
//! ```
//!
//! Weights must sum to 1 within ±0.01; the division by the actual sum only
//! absorbs floating drift inside that tolerance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;
pub mod dispatch;
pub mod economic;
pub mod emission_factors;
pub mod environmental;
pub mod quality;
pub mod recommendations;
pub mod tradeoff;
pub mod transportation;

pub use config::{EnvironmentalConfig, QualityConfig, ScoringConfig};
pub use dispatch::{
    ScorerKind, Scorers, ScoringOutcome, ScoringRequest, SourcingRequest, TradeoffRequest,
};
pub use economic::{CostInput, EconomicAssessment, EconomicScorer, SourcingPlan, SupplierQuote};
pub use emission_factors::{EmissionFactorTable, FuelType, TransportMode, VehicleType};
pub use environmental::{EnvironmentalAssessment, EnvironmentalInput, EnvironmentalScorer};
pub use quality::{AuditRecord, QualityAssessment, QualityInput, QualityScorer};
pub use tradeoff::{TradeoffAnalysis, TradeoffInput, TradeoffScorer, Weights};
pub use transportation::{TransportAssessment, TransportInput, TransportationScorer};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
    #[error("calculation failed: {0}")]
    Calculation(String),
}

impl ScoringError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Calculation(_) => "calculation_error",
        }
    }

    /// Offending input field, for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::Calculation(_) => None,
        }
    }

    /// Prefix the field path, e.g. `volume` -> `suppliers[2].volume`
    pub fn within(self, prefix: &str) -> Self {
        match self {
            Self::Validation { field, message } => Self::Validation {
                field: format!("{}.{}", prefix, field),
                message,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;

/// Three-level bucket shared by quality and tradeoff risk reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Assessment dimensions combined by the tradeoff scorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Economic,
    Quality,
    Environmental,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Economic, Self::Quality, Self::Environmental];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economic => "economic",
            Self::Quality => "quality",
            Self::Environmental => "environmental",
        }
    }
}

/// Clamp a score onto the 0-100 scale
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Reject non-finite intermediates instead of letting NaN leak into a result
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        tracing::error!("{} evaluated to {} after validation passed", name, value);
        Err(ScoringError::Calculation(format!(
            "{} is not a finite number ({})",
            name, value
        )))
    }
}

/// Require `value > 0`
pub(crate) fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ScoringError::validation(field, "must be greater than zero"))
    }
}

/// Require `value >= 0`
pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScoringError::validation(field, "cannot be negative"))
    }
}

/// Require `min <= value <= max`
pub(crate) fn require_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::validation(
            field,
            format!("must be between {} and {}", min, max),
        ))
    }
}
