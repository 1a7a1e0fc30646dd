//! Quality compliance and risk assessment
//!
//! `quality_score` is the share of measured metrics meeting their standard.
//! The risk bucket comes from a weighted health score where higher is
//! better, so a *high* health score maps to `RiskLevel::Low`:
//!
//! ```text
//! health = 0.3·(100 − defect_rate) + 0.3·satisfaction + 0.2·compliance + 0.2·efficiency
//! ≥ 80 → Low, ≥ 60 → Medium, else High
//! ```

use crate::config::QualityConfig;
use crate::environmental::certification_status;
use crate::recommendations;
use crate::{ensure_finite, require_non_negative, require_range, Result, RiskLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

const W_DEFECT: f64 = 0.3;
const W_SATISFACTION: f64 = 0.3;
const W_COMPLIANCE: f64 = 0.2;
const W_EFFICIENCY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Major,
    Critical,
    Observation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditFinding {
    pub description: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub findings: Vec<AuditFinding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityInput {
    pub measurements: BTreeMap<String, f64>,
    pub standards: BTreeMap<String, f64>,
    /// Percent
    pub defect_rate: f64,
    pub customer_satisfaction: f64,
    pub compliance_score: f64,
    pub process_efficiency: f64,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    /// Oldest first
    #[serde(default)]
    pub audit_history: Vec<AuditRecord>,
}

impl QualityInput {
    pub fn validate(&self) -> Result<()> {
        require_range("defect_rate", self.defect_rate, 0.0, 100.0)?;
        require_range("customer_satisfaction", self.customer_satisfaction, 0.0, 100.0)?;
        require_range("compliance_score", self.compliance_score, 0.0, 100.0)?;
        require_range("process_efficiency", self.process_efficiency, 0.0, 100.0)?;

        for (map, values) in [("measurements", &self.measurements), ("standards", &self.standards)] {
            for (metric, value) in values {
                if !value.is_finite() {
                    return Err(crate::ScoringError::validation(
                        format!("{}.{}", map, metric),
                        "must be a finite number",
                    ));
                }
            }
        }
        for (i, audit) in self.audit_history.iter().enumerate() {
            require_non_negative("score", audit.score)
                .map_err(|e| e.within(&format!("audit_history[{}]", i)))?;
        }
        Ok(())
    }

    /// Weighted supplier health, 0-100, higher is better
    pub fn health_score(&self) -> f64 {
        W_DEFECT * (100.0 - self.defect_rate)
            + W_SATISFACTION * self.customer_satisfaction
            + W_COMPLIANCE * self.compliance_score
            + W_EFFICIENCY * self.process_efficiency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditSummary {
    NoHistory,
    Summarized {
        total_audits: usize,
        last_audit_date: NaiveDate,
        average_score: f64,
        major_findings: Vec<AuditFinding>,
    },
}

impl AuditSummary {
    pub fn from_history(history: &[AuditRecord]) -> Self {
        let Some(last) = history.last() else {
            return Self::NoHistory;
        };

        let total = history.iter().map(|a| a.score).sum::<f64>();
        Self::Summarized {
            total_audits: history.len(),
            last_audit_date: last.date,
            average_score: total / history.len() as f64,
            major_findings: history
                .iter()
                .flat_map(|a| a.findings.iter())
                .filter(|f| f.severity == Severity::Major)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    /// 0-100
    pub quality_score: f64,
    /// Same as `quality_score`
    pub overall_score: f64,
    pub compliance_details: BTreeMap<String, bool>,
    pub risk_level: RiskLevel,
    pub improvement_areas: Vec<String>,
    pub certification_status: BTreeMap<String, bool>,
    pub audit_summary: AuditSummary,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    config: QualityConfig,
}

impl QualityScorer {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, input: &QualityInput) -> Result<QualityAssessment> {
        input.validate()?;

        let compliance_details: BTreeMap<String, bool> = input
            .measurements
            .iter()
            .filter_map(|(metric, value)| {
                input
                    .standards
                    .get(metric)
                    .map(|standard| (metric.clone(), value >= standard))
            })
            .collect();

        let quality_score = if compliance_details.is_empty() {
            warn!(
                "No measurement matched a standard ({} measurements, {} standards)",
                input.measurements.len(),
                input.standards.len()
            );
            0.0
        } else {
            let compliant = compliance_details.values().filter(|c| **c).count();
            100.0 * compliant as f64 / compliance_details.len() as f64
        };

        let health = ensure_finite("risk_score", input.health_score())?;
        let risk_level = risk_level(health);

        debug!(
            "Quality: score={:.1} ({}/{} compliant), health={:.2} -> {:?} risk",
            quality_score,
            compliance_details.values().filter(|c| **c).count(),
            compliance_details.len(),
            health,
            risk_level
        );

        Ok(QualityAssessment {
            quality_score,
            overall_score: quality_score,
            recommendations: recommendations::quality_compliance(&compliance_details),
            compliance_details,
            risk_level,
            improvement_areas: recommendations::quality_improvement_areas(
                input.defect_rate,
                input.customer_satisfaction,
                input.compliance_score,
                input.process_efficiency,
            ),
            certification_status: certification_status(&self.config.certifications, &input.certifications),
            audit_summary: AuditSummary::from_history(&input.audit_history),
        })
    }
}

/// Health score to risk bucket. Higher health means lower risk.
pub fn risk_level(health: f64) -> RiskLevel {
    if health >= 80.0 {
        RiskLevel::Low
    } else if health >= 60.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
