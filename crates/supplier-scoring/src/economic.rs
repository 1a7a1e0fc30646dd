//! Economic scoring and sourcing optimization
//!
//! ```text
//! total_cost    = material + transportation + labor + overhead
//! cost_per_unit = total_cost / volume
//! roi           = (capacity·cost_per_unit − total_cost) / total_cost · 100
//! score         = clamp(100 · (1 − total_cost / (capacity·cost_per_unit)))
//! ```
//!
//! Score and ROI are both driven by the same capacity/volume ratio. The
//! formulas are a published contract and are kept exactly as written.
//! Tax is reported in the breakdown but not added to `total_cost`.

use crate::recommendations;
use crate::{clamp_score, ensure_finite, require_non_negative, require_positive, require_range};
use crate::{Result, ScoringError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostInput {
    pub material_cost: f64,
    pub transportation_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    /// Decimal, 0-1
    pub tax_rate: f64,
    pub capacity: f64,
    pub volume: f64,
}

impl CostInput {
    pub fn validate(&self) -> Result<()> {
        require_positive("volume", self.volume)?;
        require_positive("capacity", self.capacity)?;
        require_non_negative("material_cost", self.material_cost)?;
        require_non_negative("transportation_cost", self.transportation_cost)?;
        require_non_negative("labor_cost", self.labor_cost)?;
        require_non_negative("overhead_cost", self.overhead_cost)?;
        require_range("tax_rate", self.tax_rate, 0.0, 1.0)
    }

    pub fn total_cost(&self) -> f64 {
        self.material_cost + self.transportation_cost + self.labor_cost + self.overhead_cost
    }

    /// Material plus transportation cost per unit of capacity
    pub fn cost_efficiency(&self) -> f64 {
        (self.material_cost + self.transportation_cost) / self.capacity
    }

    fn unit_sourcing_cost(&self) -> f64 {
        self.material_cost + self.transportation_cost
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub material: f64,
    pub transportation: f64,
    pub labor: f64,
    pub overhead: f64,
    pub tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicAssessment {
    /// 0-100
    pub score: f64,
    pub cost_breakdown: CostBreakdown,
    pub total_cost: f64,
    pub cost_per_unit: f64,
    /// Percent
    pub roi: f64,
    pub recommendations: Vec<String>,
}

/// A supplier's cost record, as submitted for sourcing optimization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierQuote {
    pub supplier_id: String,
    pub cost: CostInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSupplier {
    pub supplier_id: String,
    pub allocation: f64,
    pub cost_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingDetails {
    pub total_capacity_utilized: f64,
    pub number_of_suppliers: usize,
    pub average_cost_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcingPlan {
    /// supplier_id -> allocated quantity
    pub optimal_allocation: BTreeMap<String, f64>,
    pub total_cost: f64,
    pub savings_potential: f64,
    /// All suppliers, most cost-efficient first
    pub optimal_suppliers: Vec<RankedSupplier>,
    pub optimization_details: SourcingDetails,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EconomicScorer;

impl EconomicScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, input: &CostInput) -> Result<EconomicAssessment> {
        input.validate()?;

        let total_cost = input.total_cost();
        let tax_amount = total_cost * input.tax_rate;
        let cost_per_unit = total_cost / input.volume;
        let capacity_cost = input.capacity * cost_per_unit;

        let roi = ensure_finite("roi", (capacity_cost - total_cost) / total_cost * 100.0)?;
        let raw_score = ensure_finite("score", 100.0 * (1.0 - total_cost / capacity_cost))?;
        let score = clamp_score(raw_score);

        debug!(
            "Economic: score={:.2} (raw={:.2}), total={:.2}, per_unit={:.4}, roi={:.2}%",
            score, raw_score, total_cost, cost_per_unit, roi
        );

        Ok(EconomicAssessment {
            score,
            cost_breakdown: CostBreakdown {
                material: input.material_cost,
                transportation: input.transportation_cost,
                labor: input.labor_cost,
                overhead: input.overhead_cost,
                tax: tax_amount,
            },
            total_cost,
            cost_per_unit,
            roi,
            recommendations: recommendations::economic(raw_score),
        })
    }

    /// Greedy allocation across suppliers, cheapest per unit of capacity first
    pub fn optimize_sourcing(&self, quotes: &[SupplierQuote]) -> Result<SourcingPlan> {
        if quotes.is_empty() {
            return Err(ScoringError::validation(
                "suppliers",
                "at least one supplier is required",
            ));
        }
        for (i, quote) in quotes.iter().enumerate() {
            quote
                .cost
                .validate()
                .map_err(|e| e.within(&format!("suppliers[{}]", i)))?;
        }

        let mut ranked: Vec<&SupplierQuote> = quotes.iter().collect();
        ranked.sort_by(|a, b| {
            a.cost
                .cost_efficiency()
                .partial_cmp(&b.cost.cost_efficiency())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut optimal_allocation = BTreeMap::new();
        let mut total_cost = 0.0;
        let mut allocated = 0.0;

        for quote in &ranked {
            if allocated < quote.cost.capacity {
                let allocation = (quote.cost.capacity - allocated).min(quote.cost.volume);
                optimal_allocation.insert(quote.supplier_id.clone(), allocation);
                total_cost += allocation * quote.cost.unit_sourcing_cost();
                allocated += allocation;
            }
        }

        let current_cost: f64 = quotes
            .iter()
            .map(|q| q.cost.volume * q.cost.unit_sourcing_cost())
            .sum();

        let optimal_suppliers = ranked
            .iter()
            .map(|q| RankedSupplier {
                supplier_id: q.supplier_id.clone(),
                allocation: optimal_allocation.get(&q.supplier_id).copied().unwrap_or(0.0),
                cost_efficiency: q.cost.cost_efficiency(),
            })
            .collect();

        let average_cost_per_unit = if allocated > 0.0 {
            total_cost / allocated
        } else {
            0.0
        };

        info!(
            "Sourcing plan: {} of {} suppliers allocated, {:.2} units, savings {:.2}",
            optimal_allocation.len(),
            quotes.len(),
            allocated,
            current_cost - total_cost
        );

        Ok(SourcingPlan {
            optimization_details: SourcingDetails {
                total_capacity_utilized: allocated,
                number_of_suppliers: optimal_allocation.len(),
                average_cost_per_unit,
            },
            optimal_allocation,
            total_cost,
            savings_potential: current_cost - total_cost,
            optimal_suppliers,
        })
    }
}
