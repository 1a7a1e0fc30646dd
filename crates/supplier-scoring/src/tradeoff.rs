//! Multi-criteria tradeoff analysis
//!
//! Combines the economic, quality and environmental scores of one supplier
//! into a weighted balanced score, with a pairwise tradeoff matrix and a
//! risk assessment built from caller-supplied risk factors.
//!
//! ```text
//! balanced = (w_e·economic + w_q·quality + w_n·environmental) / (w_e + w_q + w_n)
//! ```
//!
//! Weights must sum to 1 within ±0.01.

use crate::economic::EconomicAssessment;
use crate::environmental::EnvironmentalAssessment;
use crate::quality::QualityAssessment;
use crate::recommendations;
use crate::{ensure_finite, require_range, Dimension, Result, RiskLevel, ScoringError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Accepted deviation of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;
/// Pairwise score gap that triggers balancing advice
pub const TRADEOFF_THRESHOLD: f64 = 20.0;
/// Dimension scores below this get an optimization suggestion
pub const SUGGESTION_THRESHOLD: f64 = 70.0;
/// Weight above which a suggestion is high priority
pub const HIGH_PRIORITY_WEIGHT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TradeoffInput {
    pub economic_score: f64,
    pub quality_score: f64,
    pub environmental_score: f64,
    /// Risk factor scores above this are flagged, 0-1
    pub risk_tolerance: f64,
    /// Period label -> performance value, ordered by label
    #[serde(default)]
    pub historical_performance: BTreeMap<String, f64>,
    pub risk_factors: BTreeMap<String, f64>,
}

impl TradeoffInput {
    /// Build from the outputs of the other three scorers.
    pub fn from_assessments(
        economic: &EconomicAssessment,
        quality: &QualityAssessment,
        environmental: &EnvironmentalAssessment,
        risk_tolerance: f64,
        risk_factors: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            economic_score: economic.score,
            quality_score: quality.quality_score,
            environmental_score: environmental.environmental_score,
            risk_tolerance,
            historical_performance: BTreeMap::new(),
            risk_factors,
        }
    }

    pub fn score_of(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Economic => self.economic_score,
            Dimension::Quality => self.quality_score,
            Dimension::Environmental => self.environmental_score,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_range("economic_score", self.economic_score, 0.0, 100.0)?;
        require_range("quality_score", self.quality_score, 0.0, 100.0)?;
        require_range("environmental_score", self.environmental_score, 0.0, 100.0)?;
        require_range("risk_tolerance", self.risk_tolerance, 0.0, 1.0)?;

        if self.risk_factors.is_empty() {
            return Err(ScoringError::validation(
                "risk_factors",
                "at least one risk factor is required",
            ));
        }
        for (name, value) in &self.risk_factors {
            if !value.is_finite() {
                return Err(ScoringError::validation(
                    format!("risk_factors.{}", name),
                    "must be a finite number",
                ));
            }
        }
        for (period, value) in &self.historical_performance {
            if !value.is_finite() {
                return Err(ScoringError::validation(
                    format!("historical_performance.{}", period),
                    "must be a finite number",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Weights {
    pub economic_weight: f64,
    pub quality_weight: f64,
    pub environmental_weight: f64,
}

impl Weights {
    pub fn weight_of(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Economic => self.economic_weight,
            Dimension::Quality => self.quality_weight,
            Dimension::Environmental => self.environmental_weight,
        }
    }

    pub fn total(&self) -> f64 {
        self.economic_weight + self.quality_weight + self.environmental_weight
    }

    /// An out-of-tolerance sum is always reported under `weights`, before
    /// any single weight is range-checked.
    pub fn validate(&self) -> Result<()> {
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE + f64::EPSILON {
            return Err(ScoringError::validation(
                "weights",
                format!("must sum to 1 (±{}), got {:.4}", WEIGHT_SUM_TOLERANCE, total),
            ));
        }

        require_range("economic_weight", self.economic_weight, 0.0, 1.0)?;
        require_range("quality_weight", self.quality_weight, 0.0, 1.0)?;
        require_range("environmental_weight", self.environmental_weight, 0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    /// Population variance
    pub volatility: f64,
    pub latest_value: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trend", rename_all = "snake_case")]
pub enum HistoricalTrend {
    InsufficientData,
    Improving(TrendStats),
    Declining(TrendStats),
}

impl HistoricalTrend {
    /// Compare the first and last values in label order. A flat series
    /// counts as declining.
    pub fn from_history(history: &BTreeMap<String, f64>) -> Self {
        let values: Vec<f64> = history.values().copied().collect();
        let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
            return Self::InsufficientData;
        };
        if values.len() < 2 {
            return Self::InsufficientData;
        }

        let n = values.len() as f64;
        let average = values.iter().sum::<f64>() / n;
        let volatility = values.iter().map(|v| (v - average).powi(2)).sum::<f64>() / n;
        let stats = TrendStats {
            volatility,
            latest_value: last,
            average,
        };

        if last > first {
            Self::Improving(stats)
        } else {
            Self::Declining(stats)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Mean of the risk factor scores
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Factors above tolerance, in name order
    pub key_risk_factors: Vec<String>,
    pub historical_trend: HistoricalTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffPair {
    pub left: Dimension,
    pub right: Dimension,
    /// Weighted score of `left`
    pub left_impact: f64,
    /// Weighted score of `right`
    pub right_impact: f64,
    /// Absolute gap between the unweighted scores
    pub tradeoff_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub dimension: Dimension,
    pub priority: Priority,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffAnalysis {
    /// Same as `balanced_score`
    pub overall_score: f64,
    pub balanced_score: f64,
    pub risk_assessment: RiskAssessment,
    /// economic/quality, economic/environmental, quality/environmental
    pub tradeoff_matrix: Vec<TradeoffPair>,
    pub recommendations: Vec<String>,
    pub optimization_suggestions: Vec<OptimizationSuggestion>,
}

const PAIRS: [(Dimension, Dimension); 3] = [
    (Dimension::Economic, Dimension::Quality),
    (Dimension::Economic, Dimension::Environmental),
    (Dimension::Quality, Dimension::Environmental),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct TradeoffScorer;

impl TradeoffScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, input: &TradeoffInput, weights: &Weights) -> Result<TradeoffAnalysis> {
        input.validate()?;
        weights.validate()?;

        let weighted: f64 = Dimension::ALL
            .iter()
            .map(|d| input.score_of(*d) * weights.weight_of(*d))
            .sum();
        let balanced_score = ensure_finite("balanced_score", weighted / weights.total())?;

        let risk_assessment = risk_assessment(input)?;
        let tradeoff_matrix = tradeoff_matrix(input, weights);

        let recommendations = tradeoff_matrix
            .iter()
            .filter(|pair| pair.tradeoff_score > TRADEOFF_THRESHOLD)
            .filter_map(|pair| recommendations::tradeoff_pair(pair.left, pair.right))
            .collect();

        let optimization_suggestions = Dimension::ALL
            .iter()
            .filter(|d| input.score_of(**d) < SUGGESTION_THRESHOLD)
            .map(|d| OptimizationSuggestion {
                dimension: *d,
                priority: if weights.weight_of(*d) > HIGH_PRIORITY_WEIGHT {
                    Priority::High
                } else {
                    Priority::Medium
                },
                suggestion: recommendations::optimization_suggestion(*d),
            })
            .collect();

        debug!(
            "Tradeoff: balanced={:.2}, risk={:.3} ({:?}), {} key factors",
            balanced_score,
            risk_assessment.risk_score,
            risk_assessment.risk_level,
            risk_assessment.key_risk_factors.len()
        );

        Ok(TradeoffAnalysis {
            overall_score: balanced_score,
            balanced_score,
            risk_assessment,
            tradeoff_matrix,
            recommendations,
            optimization_suggestions,
        })
    }
}

fn risk_assessment(input: &TradeoffInput) -> Result<RiskAssessment> {
    let sum: f64 = input.risk_factors.values().sum();
    let risk_score = ensure_finite("risk_score", sum / input.risk_factors.len() as f64)?;

    Ok(RiskAssessment {
        risk_score,
        risk_level: if risk_score > input.risk_tolerance {
            RiskLevel::High
        } else {
            RiskLevel::Low
        },
        key_risk_factors: input
            .risk_factors
            .iter()
            .filter(|(_, score)| **score > input.risk_tolerance)
            .map(|(name, _)| name.clone())
            .collect(),
        historical_trend: HistoricalTrend::from_history(&input.historical_performance),
    })
}

fn tradeoff_matrix(input: &TradeoffInput, weights: &Weights) -> Vec<TradeoffPair> {
    PAIRS
        .iter()
        .map(|&(left, right)| TradeoffPair {
            left,
            right,
            left_impact: input.score_of(left) * weights.weight_of(left),
            right_impact: input.score_of(right) * weights.weight_of(right),
            tradeoff_score: (input.score_of(left) - input.score_of(right)).abs(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn input(economic: f64, quality: f64, environmental: f64) -> TradeoffInput {
        TradeoffInput {
            economic_score: economic,
            quality_score: quality,
            environmental_score: environmental,
            risk_tolerance: 0.5,
            historical_performance: BTreeMap::new(),
            risk_factors: BTreeMap::from([
                ("geopolitical".to_string(), 0.7),
                ("single_source".to_string(), 0.3),
            ]),
        }
    }

    fn weights(e: f64, q: f64, n: f64) -> Weights {
        Weights {
            economic_weight: e,
            quality_weight: q,
            environmental_weight: n,
        }
    }

    #[test]
    fn test_balanced_score() {
        let result = TradeoffScorer::new()
            .score(&input(75.0, 85.0, 90.0), &weights(0.4, 0.3, 0.3))
            .unwrap();

        assert!((result.balanced_score - 82.5).abs() < EPS);
        assert_eq!(result.overall_score, result.balanced_score);
        assert!(result.recommendations.is_empty());
        assert!(result.optimization_suggestions.is_empty());
    }

    #[test]
    fn test_weight_sum_outside_tolerance() {
        let scorer = TradeoffScorer::new();
        let data = input(75.0, 85.0, 90.0);

        for bad in [
            weights(0.5, 0.3, 0.3),
            weights(0.3, 0.3, 0.3),
            weights(1.5, 0.0, 0.0),
            weights(0.0, 0.0, 0.0),
        ] {
            let err = scorer.score(&data, &bad).unwrap_err();
            assert_eq!(err.code(), "validation_error");
            assert_eq!(err.field(), Some("weights"));
        }

        // within ±0.01, normalized by the actual total
        let result = scorer.score(&data, &weights(0.4, 0.3, 0.305)).unwrap();
        let expected = (75.0 * 0.4 + 85.0 * 0.3 + 90.0 * 0.305) / 1.005;
        assert!((result.balanced_score - expected).abs() < EPS);
    }

    #[test]
    fn test_single_weight_out_of_range() {
        let err = TradeoffScorer::new()
            .score(&input(50.0, 50.0, 50.0), &weights(1.2, -0.1, -0.1))
            .unwrap_err();
        assert_eq!(err.field(), Some("economic_weight"));
    }

    #[test]
    fn test_score_out_of_range() {
        let err = TradeoffScorer::new()
            .score(&input(50.0, 101.0, 50.0), &weights(0.4, 0.3, 0.3))
            .unwrap_err();
        assert_eq!(err.field(), Some("quality_score"));
    }

    #[test]
    fn test_empty_risk_factors_rejected() {
        let mut data = input(50.0, 50.0, 50.0);
        data.risk_factors.clear();
        let err = TradeoffScorer::new()
            .score(&data, &weights(0.4, 0.3, 0.3))
            .unwrap_err();
        assert_eq!(err.field(), Some("risk_factors"));
    }

    #[test]
    fn test_risk_assessment() {
        let result = TradeoffScorer::new()
            .score(&input(50.0, 50.0, 50.0), &weights(0.4, 0.3, 0.3))
            .unwrap();
        let risk = result.risk_assessment;

        assert!((risk.risk_score - 0.5).abs() < EPS);
        assert_eq!(risk.risk_level, RiskLevel::Low);
        assert_eq!(risk.key_risk_factors, vec!["geopolitical".to_string()]);
        assert_eq!(risk.historical_trend, HistoricalTrend::InsufficientData);
    }

    #[test]
    fn test_matrix_and_recommendations() {
        let result = TradeoffScorer::new()
            .score(&input(40.0, 90.0, 65.0), &weights(0.5, 0.3, 0.2))
            .unwrap();

        let m = &result.tradeoff_matrix;
        assert_eq!(m.len(), 3);
        assert_eq!((m[0].left, m[0].right), (Dimension::Economic, Dimension::Quality));
        assert!((m[0].left_impact - 20.0).abs() < EPS);
        assert!((m[0].right_impact - 27.0).abs() < EPS);
        assert_eq!(m[0].tradeoff_score, 50.0);
        assert_eq!(m[1].tradeoff_score, 25.0);
        assert_eq!(m[2].tradeoff_score, 25.0);

        assert_eq!(
            result.recommendations,
            vec![
                "Balance cost optimization with quality requirements".to_string(),
                "Consider environmental impact in cost optimization".to_string(),
                "Align quality standards with environmental goals".to_string(),
            ]
        );

        let suggestions = &result.optimization_suggestions;
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].dimension, Dimension::Economic);
        assert_eq!(suggestions[0].priority, Priority::High);
        assert_eq!(suggestions[1].dimension, Dimension::Environmental);
        assert_eq!(suggestions[1].priority, Priority::Medium);
    }

    #[test]
    fn test_historical_trend() {
        let history = BTreeMap::from([
            ("2024-01".to_string(), 60.0),
            ("2024-02".to_string(), 70.0),
            ("2024-03".to_string(), 80.0),
        ]);
        match HistoricalTrend::from_history(&history) {
            HistoricalTrend::Improving(stats) => {
                assert_eq!(stats.latest_value, 80.0);
                assert!((stats.average - 70.0).abs() < EPS);
                assert!((stats.volatility - 200.0 / 3.0).abs() < EPS);
            }
            other => panic!("expected improving, got {:?}", other),
        }

        let flat = BTreeMap::from([("a".to_string(), 5.0), ("b".to_string(), 5.0)]);
        assert!(matches!(
            HistoricalTrend::from_history(&flat),
            HistoricalTrend::Declining(_)
        ));

        let single = BTreeMap::from([("a".to_string(), 5.0)]);
        assert_eq!(
            HistoricalTrend::from_history(&single),
            HistoricalTrend::InsufficientData
        );
    }

    #[test]
    fn test_from_assessments() {
        use crate::economic::{CostInput, EconomicScorer};
        use crate::environmental::{EnvironmentalInput, EnvironmentalScorer};
        use crate::quality::{QualityInput, QualityScorer};

        let economic = EconomicScorer::new()
            .score(&CostInput {
                material_cost: 1000.0,
                transportation_cost: 200.0,
                labor_cost: 300.0,
                overhead_cost: 150.0,
                tax_rate: 0.1,
                capacity: 1000.0,
                volume: 800.0,
            })
            .unwrap();
        let quality = QualityScorer::default()
            .score(&QualityInput {
                measurements: BTreeMap::from([("tensile".to_string(), 500.0)]),
                standards: BTreeMap::from([("tensile".to_string(), 450.0)]),
                defect_rate: 2.0,
                customer_satisfaction: 90.0,
                compliance_score: 95.0,
                process_efficiency: 88.0,
                certifications: Default::default(),
                audit_history: Vec::new(),
            })
            .unwrap();
        let environmental = EnvironmentalScorer::default()
            .score(&EnvironmentalInput {
                energy_consumption: 500.0,
                water_usage: 50.0,
                waste_generated: 10.0,
                carbon_emissions: 20.0,
                recycling_rate: 60.0,
                renewable_energy_usage: 40.0,
                certifications: Default::default(),
            })
            .unwrap();

        let data = TradeoffInput::from_assessments(
            &economic,
            &quality,
            &environmental,
            0.5,
            BTreeMap::from([("supply".to_string(), 0.4)]),
        );
        assert_eq!(data.economic_score, economic.score);
        assert_eq!(data.quality_score, 100.0);
        assert!((data.environmental_score - 62.5).abs() < EPS);

        let result = TradeoffScorer::new()
            .score(&data, &weights(0.4, 0.3, 0.3))
            .unwrap();
        assert_eq!(result.optimization_suggestions.len(), 2);
        assert_eq!(result.optimization_suggestions[0].dimension, Dimension::Economic);
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(HistoricalTrend::Declining(TrendStats {
            volatility: 1.0,
            latest_value: 2.0,
            average: 3.0,
        }))
        .unwrap();
        assert_eq!(value["trend"], "declining");
        assert_eq!(value["latest_value"], 2.0);

        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }
}
