//! Kind-tagged dispatch over all scorers
//!
//! A `ScoringRequest` carries its scorer kind in a `"kind"` tag; `Scorers`
//! routes it to the matching scorer and wraps the result in the matching
//! `ScoringOutcome` variant.

use crate::config::ScoringConfig;
use crate::economic::{CostInput, EconomicAssessment, EconomicScorer, SourcingPlan, SupplierQuote};
use crate::environmental::{EnvironmentalAssessment, EnvironmentalInput, EnvironmentalScorer};
use crate::quality::{QualityAssessment, QualityInput, QualityScorer};
use crate::tradeoff::{TradeoffAnalysis, TradeoffInput, TradeoffScorer, Weights};
use crate::transportation::{TransportAssessment, TransportInput, TransportationScorer};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Economic,
    Sourcing,
    Quality,
    Environmental,
    Transportation,
    Tradeoff,
}

impl ScorerKind {
    pub const ALL: [ScorerKind; 6] = [
        Self::Economic,
        Self::Sourcing,
        Self::Quality,
        Self::Environmental,
        Self::Transportation,
        Self::Tradeoff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economic => "economic",
            Self::Sourcing => "sourcing",
            Self::Quality => "quality",
            Self::Environmental => "environmental",
            Self::Transportation => "transportation",
            Self::Tradeoff => "tradeoff",
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcingRequest {
    pub suppliers: Vec<SupplierQuote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TradeoffRequest {
    pub input: TradeoffInput,
    pub weights: Weights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringRequest {
    Economic(CostInput),
    Sourcing(SourcingRequest),
    Quality(QualityInput),
    Environmental(EnvironmentalInput),
    Transportation(TransportInput),
    Tradeoff(TradeoffRequest),
}

impl ScoringRequest {
    pub fn kind(&self) -> ScorerKind {
        match self {
            Self::Economic(_) => ScorerKind::Economic,
            Self::Sourcing(_) => ScorerKind::Sourcing,
            Self::Quality(_) => ScorerKind::Quality,
            Self::Environmental(_) => ScorerKind::Environmental,
            Self::Transportation(_) => ScorerKind::Transportation,
            Self::Tradeoff(_) => ScorerKind::Tradeoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringOutcome {
    Economic(EconomicAssessment),
    Sourcing(SourcingPlan),
    Quality(QualityAssessment),
    Environmental(EnvironmentalAssessment),
    Transportation(TransportAssessment),
    Tradeoff(TradeoffAnalysis),
}

impl ScoringOutcome {
    pub fn kind(&self) -> ScorerKind {
        match self {
            Self::Economic(_) => ScorerKind::Economic,
            Self::Sourcing(_) => ScorerKind::Sourcing,
            Self::Quality(_) => ScorerKind::Quality,
            Self::Environmental(_) => ScorerKind::Environmental,
            Self::Transportation(_) => ScorerKind::Transportation,
            Self::Tradeoff(_) => ScorerKind::Tradeoff,
        }
    }

    pub fn recommendations(&self) -> &[String] {
        match self {
            Self::Economic(a) => &a.recommendations,
            Self::Sourcing(_) => &[],
            Self::Quality(a) => &a.recommendations,
            Self::Environmental(a) => &a.recommendations,
            Self::Transportation(a) => &a.recommendations,
            Self::Tradeoff(a) => &a.recommendations,
        }
    }
}

/// One instance of every scorer, built from a single configuration
#[derive(Debug, Clone, Default)]
pub struct Scorers {
    pub transportation: TransportationScorer,
    pub economic: EconomicScorer,
    pub environmental: EnvironmentalScorer,
    pub quality: QualityScorer,
    pub tradeoff: TradeoffScorer,
}

impl Scorers {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            transportation: TransportationScorer::new(config.emission_factors.clone()),
            economic: EconomicScorer::new(),
            environmental: EnvironmentalScorer::new(config.environmental.clone()),
            quality: QualityScorer::new(config.quality.clone()),
            tradeoff: TradeoffScorer::new(),
        }
    }

    pub fn compute(&self, request: &ScoringRequest) -> Result<ScoringOutcome> {
        let kind = request.kind();
        debug!("Computing {} score", kind);

        let outcome = match request {
            ScoringRequest::Economic(input) => self.economic.score(input).map(ScoringOutcome::Economic),
            ScoringRequest::Sourcing(req) => self
                .economic
                .optimize_sourcing(&req.suppliers)
                .map(ScoringOutcome::Sourcing),
            ScoringRequest::Quality(input) => self.quality.score(input).map(ScoringOutcome::Quality),
            ScoringRequest::Environmental(input) => self
                .environmental
                .score(input)
                .map(ScoringOutcome::Environmental),
            ScoringRequest::Transportation(input) => self
                .transportation
                .score(input)
                .map(ScoringOutcome::Transportation),
            ScoringRequest::Tradeoff(req) => self
                .tradeoff
                .score(&req.input, &req.weights)
                .map(ScoringOutcome::Tradeoff),
        };

        if let Err(e) = &outcome {
            warn!("{} scoring rejected: {}", kind, e);
        }
        outcome
    }
}
