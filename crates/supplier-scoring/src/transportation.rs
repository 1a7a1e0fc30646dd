//! Transportation emissions and efficiency scoring
//!
//! ```text
//! base      = distance · base_factor(mode) · volume
//! adjusted  = base · vehicle_mult · fuel_mult          (truck only, else 1.0)
//! total     = adjusted · (1 + (1 − load_factor) · 0.2)  (×2 for return trips)
//!
//! efficiency = 0.4·clamp(100·(1 − per_km/2))
//!            + 0.4·clamp(100·(1 − per_volume/5))
//!            + 0.2·(load_factor·100)
//! ```
//!
//! The 2 kg/km and 5 kg/m³ divisors are reference ceilings, not derived values.

use crate::emission_factors::{EmissionFactorTable, FuelType, TransportMode, VehicleType};
use crate::recommendations::{self, TransportFacts};
use crate::{clamp_score, ensure_finite, require_positive, Result, ScoringError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Penalty per unit of unused capacity
pub const EMPTY_SPACE_PENALTY: f64 = 0.2;

/// Reference ceiling for emissions per km (kg CO2e/km)
pub const MAX_EMISSIONS_PER_KM: f64 = 2.0;

/// Reference ceiling for emissions per volume (kg CO2e/m³)
pub const MAX_EMISSIONS_PER_VOLUME: f64 = 5.0;

const W_PER_KM: f64 = 0.4;
const W_PER_VOLUME: f64 = 0.4;
const W_LOAD: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportInput {
    /// Kilometres
    pub distance: f64,
    /// Cubic metres
    pub volume: f64,
    pub transport_mode: TransportMode,
    /// Required for trucks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<VehicleType>,
    /// Required for trucks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
    /// Share of vehicle capacity used, in (0, 1]
    pub load_factor: f64,
    #[serde(default)]
    pub return_trip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionBreakdown {
    pub base_emissions: f64,
    pub vehicle_impact: f64,
    pub fuel_impact: f64,
    pub load_factor_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportAssessment {
    /// kg CO2e
    pub total_emissions: f64,
    pub emissions_per_km: f64,
    pub emissions_per_volume: f64,
    /// 0-100
    pub efficiency_score: f64,
    pub recommendations: Vec<String>,
    pub breakdown: EmissionBreakdown,
}

/// Scores a single shipment against an injected emission factor table
#[derive(Debug, Clone, Default)]
pub struct TransportationScorer {
    factors: EmissionFactorTable,
}

impl TransportationScorer {
    pub fn new(factors: EmissionFactorTable) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &EmissionFactorTable {
        &self.factors
    }

    pub fn score(&self, input: &TransportInput) -> Result<TransportAssessment> {
        require_positive("distance", input.distance)?;
        require_positive("volume", input.volume)?;
        if !(input.load_factor > 0.0 && input.load_factor <= 1.0) {
            return Err(ScoringError::validation(
                "load_factor",
                "must be greater than 0 and at most 1",
            ));
        }

        let base_factor = self.factors.base_factor(input.transport_mode)?;

        let (vehicle_multiplier, fuel_multiplier) = if input.transport_mode.is_road() {
            let vehicle = input.vehicle_type.ok_or_else(|| {
                ScoringError::validation("vehicle_type", "is required for road transport")
            })?;
            let fuel = input.fuel_type.ok_or_else(|| {
                ScoringError::validation("fuel_type", "is required for road transport")
            })?;
            (
                self.factors.vehicle_multiplier(vehicle)?,
                self.factors.fuel_multiplier(fuel)?,
            )
        } else {
            (1.0, 1.0)
        };

        let base_emissions = input.distance * base_factor * input.volume;
        let adjusted_emissions = base_emissions * vehicle_multiplier * fuel_multiplier;
        let load_penalty = 1.0 + (1.0 - input.load_factor) * EMPTY_SPACE_PENALTY;

        let mut total_emissions = adjusted_emissions * load_penalty;
        if input.return_trip {
            total_emissions *= 2.0;
        }
        let total_emissions = ensure_finite("total_emissions", total_emissions)?;

        let emissions_per_km = total_emissions / input.distance;
        let emissions_per_volume = total_emissions / input.volume;

        let efficiency_score =
            efficiency_score(emissions_per_km, emissions_per_volume, input.load_factor);

        let recommendations = recommendations::transportation(&TransportFacts {
            mode: input.transport_mode,
            vehicle_type: input.vehicle_type,
            fuel_type: input.fuel_type,
            load_factor: input.load_factor,
            emissions_per_km,
            emissions_per_volume,
            efficiency_score,
        });

        debug!(
            "Transport {:?}: {:.3} kg CO2e (per_km={:.3}, per_m3={:.3}, efficiency={:.1})",
            input.transport_mode, total_emissions, emissions_per_km, emissions_per_volume, efficiency_score
        );

        Ok(TransportAssessment {
            total_emissions,
            emissions_per_km,
            emissions_per_volume,
            efficiency_score,
            recommendations,
            breakdown: EmissionBreakdown {
                base_emissions,
                vehicle_impact: base_emissions * (vehicle_multiplier - 1.0),
                fuel_impact: base_emissions * (fuel_multiplier - 1.0),
                load_factor_impact: base_emissions * (load_penalty - 1.0),
            },
        })
    }
}

/// Blend per-km, per-volume and load utilisation into a 0-100 score
pub fn efficiency_score(emissions_per_km: f64, emissions_per_volume: f64, load_factor: f64) -> f64 {
    let km_score = clamp_score(100.0 * (1.0 - emissions_per_km / MAX_EMISSIONS_PER_KM));
    let volume_score = clamp_score(100.0 * (1.0 - emissions_per_volume / MAX_EMISSIONS_PER_VOLUME));
    let load_score = load_factor * 100.0;

    W_PER_KM * km_score + W_PER_VOLUME * volume_score + W_LOAD * load_score
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn truck(vehicle: VehicleType, fuel: FuelType) -> TransportInput {
        TransportInput {
            distance: 100.0,
            volume: 10.0,
            transport_mode: TransportMode::Truck,
            vehicle_type: Some(vehicle),
            fuel_type: Some(fuel),
            load_factor: 1.0,
            return_trip: false,
        }
    }

    #[test]
    fn test_large_diesel_truck() {
        let scorer = TransportationScorer::default();
        let result = scorer.score(&truck(VehicleType::LargeTruck, FuelType::Diesel)).unwrap();

        // 100 km · 0.15 · 10 m³ = 150, ×2.0 vehicle, ×1.0 fuel, full load
        assert!((result.total_emissions - 300.0).abs() < EPS);
        assert!((result.emissions_per_km - 3.0).abs() < EPS);
        assert!((result.emissions_per_volume - 30.0).abs() < EPS);
        // both rate scores clamp to zero, load contributes 0.2 · 100
        assert!((result.efficiency_score - 20.0).abs() < EPS);

        assert!((result.breakdown.base_emissions - 150.0).abs() < EPS);
        assert!((result.breakdown.vehicle_impact - 150.0).abs() < EPS);
        assert!(result.breakdown.fuel_impact.abs() < EPS);
        assert!(result.breakdown.load_factor_impact.abs() < EPS);

        assert_eq!(
            result.recommendations,
            vec![
                "Consider switching to electric or hybrid vehicles".to_string(),
                "Consider alternative transport modes for long distances".to_string(),
                "Optimize packaging to reduce volume requirements".to_string(),
            ]
        );
    }

    #[test]
    fn test_electric_truck_is_efficient() {
        let scorer = TransportationScorer::default();
        let mut input = truck(VehicleType::ElectricVehicle, FuelType::Electric);
        input.volume = 5.0;

        let result = scorer.score(&input).unwrap();

        // 75 · 0.3 · 0.2 = 4.5 kg; per_km 0.045, per_m3 0.9
        assert!((result.total_emissions - 4.5).abs() < EPS);
        assert!((result.efficiency_score - 91.9).abs() < 1e-6);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_train_with_return_trip_and_partial_load() {
        let scorer = TransportationScorer::default();
        let input = TransportInput {
            distance: 500.0,
            volume: 2.0,
            transport_mode: TransportMode::Train,
            vehicle_type: None,
            fuel_type: None,
            load_factor: 0.5,
            return_trip: true,
        };

        let result = scorer.score(&input).unwrap();

        // 500 · 0.03 · 2 = 30, load penalty 1.1, doubled
        assert!((result.total_emissions - 66.0).abs() < 1e-9);
        assert!((result.emissions_per_km - 0.132).abs() < 1e-9);
        assert!((result.breakdown.load_factor_impact - 3.0).abs() < 1e-9);
        assert!((result.efficiency_score - 47.36).abs() < 1e-6);
        assert!(result
            .recommendations
            .contains(&"Optimize load factor to reduce empty space".to_string()));
    }

    #[test]
    fn test_non_road_modes_ignore_vehicle_details() {
        let scorer = TransportationScorer::default();
        let mut input = truck(VehicleType::LargeTruck, FuelType::Petrol);
        input.transport_mode = TransportMode::Ship;

        let result = scorer.score(&input).unwrap();
        // 100 · 0.02 · 10, no multipliers
        assert!((result.total_emissions - 20.0).abs() < EPS);
        assert!(result.breakdown.vehicle_impact.abs() < EPS);
    }

    #[test]
    fn test_truck_requires_vehicle_and_fuel() {
        let scorer = TransportationScorer::default();

        let mut input = truck(VehicleType::SmallTruck, FuelType::Diesel);
        input.vehicle_type = None;
        let err = scorer.score(&input).unwrap_err();
        assert_eq!(err.field(), Some("vehicle_type"));

        let mut input = truck(VehicleType::SmallTruck, FuelType::Diesel);
        input.fuel_type = None;
        let err = scorer.score(&input).unwrap_err();
        assert_eq!(err.field(), Some("fuel_type"));
    }

    #[test]
    fn test_rejects_out_of_range_inputs() {
        let scorer = TransportationScorer::default();

        let mut input = truck(VehicleType::SmallTruck, FuelType::Diesel);
        input.distance = 0.0;
        assert_eq!(scorer.score(&input).unwrap_err().field(), Some("distance"));

        let mut input = truck(VehicleType::SmallTruck, FuelType::Diesel);
        input.volume = -3.0;
        assert_eq!(scorer.score(&input).unwrap_err().field(), Some("volume"));

        for lf in [0.0, -0.1, 1.01, f64::NAN] {
            let mut input = truck(VehicleType::SmallTruck, FuelType::Diesel);
            input.load_factor = lf;
            assert_eq!(scorer.score(&input).unwrap_err().field(), Some("load_factor"));
        }
    }

    #[test]
    fn test_injected_table_overrides_defaults() {
        let mut table = EmissionFactorTable::default();
        table.base_factors.insert(TransportMode::Plane, 1.0);
        let scorer = TransportationScorer::new(table);

        let input = TransportInput {
            distance: 10.0,
            volume: 1.0,
            transport_mode: TransportMode::Plane,
            vehicle_type: None,
            fuel_type: None,
            load_factor: 1.0,
            return_trip: false,
        };
        assert!((scorer.score(&input).unwrap().total_emissions - 10.0).abs() < EPS);
    }

    #[test]
    fn test_input_wire_format() {
        let json = r#"{
            "distance": 120.0,
            "volume": 8.0,
            "transport_mode": "truck",
            "vehicle_type": "medium_truck",
            "fuel_type": "biodiesel",
            "load_factor": 0.9
        }"#;
        let input: TransportInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.vehicle_type, Some(VehicleType::MediumTruck));
        assert!(!input.return_trip);

        let unknown = r#"{"distance": 1, "volume": 1, "transport_mode": "ship", "load_factor": 1, "colour": "red"}"#;
        assert!(serde_json::from_str::<TransportInput>(unknown).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn transport_input() -> impl Strategy<Value = TransportInput> {
        (
            0.1f64..20_000.0,
            0.01f64..500.0,
            prop::sample::select(TransportMode::ALL.to_vec()),
            prop::sample::select(VehicleType::ALL.to_vec()),
            prop::sample::select(FuelType::ALL.to_vec()),
            0.01f64..=1.0,
            any::<bool>(),
        )
            .prop_map(|(distance, volume, mode, vehicle, fuel, load_factor, return_trip)| {
                TransportInput {
                    distance,
                    volume,
                    transport_mode: mode,
                    vehicle_type: Some(vehicle),
                    fuel_type: Some(fuel),
                    load_factor,
                    return_trip,
                }
            })
    }

    proptest! {
        #[test]
        fn fuzz_efficiency_is_bounded(input in transport_input()) {
            let result = TransportationScorer::default().score(&input).unwrap();
            prop_assert!((0.0..=100.0).contains(&result.efficiency_score),
                "efficiency {} out of range", result.efficiency_score);
            prop_assert!(result.total_emissions >= 0.0);
        }

        #[test]
        fn fuzz_scoring_is_idempotent(input in transport_input()) {
            let scorer = TransportationScorer::default();
            let first = scorer.score(&input).unwrap();
            let second = scorer.score(&input).unwrap();
            prop_assert_eq!(first.total_emissions.to_bits(), second.total_emissions.to_bits());
            prop_assert_eq!(first.efficiency_score.to_bits(), second.efficiency_score.to_bits());
            prop_assert_eq!(first, second);
        }
    }
}
