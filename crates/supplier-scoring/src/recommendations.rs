//! Rule-based advice shared by all scorers
//!
//! Rules only read already-computed metrics; they never change a score.

use crate::emission_factors::{FuelType, TransportMode, VehicleType};
use crate::Dimension;
use std::collections::BTreeMap;

/// Transport advice is only emitted below this efficiency score
pub const TRANSPORT_EFFICIENCY_THRESHOLD: f64 = 70.0;
const LOW_LOAD_FACTOR: f64 = 0.8;
const HIGH_EMISSIONS_PER_KM: f64 = 1.5;
const HIGH_EMISSIONS_PER_VOLUME: f64 = 3.0;

/// Economic score bands
const ECONOMIC_POOR: f64 = 30.0;
const ECONOMIC_FAIR: f64 = 60.0;

/// Environmental impact above which a dimension gets advice
pub const ENVIRONMENTAL_ADVICE_THRESHOLD: f64 = 0.7;

/// Quality improvement thresholds (percent)
const MAX_DEFECT_RATE: f64 = 5.0;
const MIN_CUSTOMER_SATISFACTION: f64 = 80.0;
const MIN_COMPLIANCE_SCORE: f64 = 90.0;
const MIN_PROCESS_EFFICIENCY: f64 = 85.0;

/// Transport facts the advice rules look at
#[derive(Debug, Clone, Copy)]
pub struct TransportFacts {
    pub mode: TransportMode,
    pub vehicle_type: Option<VehicleType>,
    pub fuel_type: Option<FuelType>,
    pub load_factor: f64,
    pub emissions_per_km: f64,
    pub emissions_per_volume: f64,
    pub efficiency_score: f64,
}

pub fn transportation(facts: &TransportFacts) -> Vec<String> {
    let mut recommendations = Vec::new();

    if facts.efficiency_score >= TRANSPORT_EFFICIENCY_THRESHOLD {
        return recommendations;
    }

    if facts.mode.is_road() {
        if matches!(
            facts.vehicle_type,
            Some(VehicleType::SmallTruck) | Some(VehicleType::MediumTruck)
        ) {
            recommendations.push("Consider using larger trucks for better efficiency".to_string());
        }
        if facts.fuel_type.map(|f| f.is_fossil()).unwrap_or(false) {
            recommendations.push("Consider switching to electric or hybrid vehicles".to_string());
        }
    }

    if facts.load_factor < LOW_LOAD_FACTOR {
        recommendations.push("Optimize load factor to reduce empty space".to_string());
    }
    if facts.emissions_per_km > HIGH_EMISSIONS_PER_KM {
        recommendations.push("Consider alternative transport modes for long distances".to_string());
    }
    if facts.emissions_per_volume > HIGH_EMISSIONS_PER_VOLUME {
        recommendations.push("Optimize packaging to reduce volume requirements".to_string());
    }

    recommendations
}

/// Advice keyed on the unclamped economic score
pub fn economic(score: f64) -> Vec<String> {
    let lines: [&str; 3] = if score < ECONOMIC_POOR {
        [
            "Consider renegotiating supplier contracts",
            "Look for alternative suppliers with better pricing",
            "Optimize transportation routes to reduce costs",
        ]
    } else if score < ECONOMIC_FAIR {
        [
            "Review and optimize inventory management",
            "Consider bulk purchasing for better rates",
            "Evaluate automation opportunities to reduce labor costs",
        ]
    } else {
        [
            "Maintain current cost structure",
            "Focus on quality and service improvements",
            "Consider long-term contracts for price stability",
        ]
    };

    lines.iter().map(|s| s.to_string()).collect()
}

/// Environmental impact normalized scores, in report order
#[derive(Debug, Clone, Copy)]
pub struct ImpactScores {
    pub energy: f64,
    pub water: f64,
    pub waste: f64,
    pub emissions: f64,
}

pub fn environmental(impact: &ImpactScores) -> Vec<String> {
    let rules = [
        (impact.energy, "Implement energy efficiency measures"),
        (impact.water, "Optimize water usage and implement recycling"),
        (impact.waste, "Enhance waste reduction and recycling programs"),
        (impact.emissions, "Develop carbon reduction strategies"),
    ];

    rules
        .iter()
        .filter(|(score, _)| *score > ENVIRONMENTAL_ADVICE_THRESHOLD)
        .map(|(_, text)| text.to_string())
        .collect()
}

/// One line per metric that missed its standard
pub fn quality_compliance(compliance: &BTreeMap<String, bool>) -> Vec<String> {
    compliance
        .iter()
        .filter(|(_, compliant)| !**compliant)
        .map(|(metric, _)| format!("Improve {} to meet standards", metric))
        .collect()
}

pub fn quality_improvement_areas(
    defect_rate: f64,
    customer_satisfaction: f64,
    compliance_score: f64,
    process_efficiency: f64,
) -> Vec<String> {
    let mut areas = Vec::new();
    if defect_rate > MAX_DEFECT_RATE {
        areas.push("Defect rate reduction".to_string());
    }
    if customer_satisfaction < MIN_CUSTOMER_SATISFACTION {
        areas.push("Customer satisfaction improvement".to_string());
    }
    if compliance_score < MIN_COMPLIANCE_SCORE {
        areas.push("Compliance enhancement".to_string());
    }
    if process_efficiency < MIN_PROCESS_EFFICIENCY {
        areas.push("Process efficiency optimization".to_string());
    }
    areas
}

/// Balancing advice for a pair of dimensions whose scores diverge.
/// A dimension paired with itself has no tradeoff and gets `None`.
pub fn tradeoff_pair(left: Dimension, right: Dimension) -> Option<String> {
    use Dimension::*;
    let text = match (left, right) {
        (Economic, Quality) | (Quality, Economic) => {
            "Balance cost optimization with quality requirements"
        }
        (Economic, Environmental) | (Environmental, Economic) => {
            "Consider environmental impact in cost optimization"
        }
        (Quality, Environmental) | (Environmental, Quality) => {
            "Align quality standards with environmental goals"
        }
        (Economic, Economic) | (Quality, Quality) | (Environmental, Environmental) => {
            return None
        }
    };
    Some(text.to_string())
}

pub fn optimization_suggestion(dimension: Dimension) -> String {
    match dimension {
        Dimension::Economic => "Optimize cost structure and supplier relationships",
        Dimension::Quality => "Enhance quality control measures and supplier standards",
        Dimension::Environmental => {
            "Implement sustainable practices and reduce environmental impact"
        }
    }
    .to_string()
}
