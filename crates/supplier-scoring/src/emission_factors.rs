//! Emission factor lookup table
//!
//! Base factors are kg CO2e per km per m³ of cargo. Vehicle and fuel factors
//! are dimensionless multipliers and only apply to road transport.

use crate::{Result, ScoringError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Truck,
    Train,
    Ship,
    Plane,
}

impl TransportMode {
    pub const ALL: [TransportMode; 4] = [Self::Truck, Self::Train, Self::Ship, Self::Plane];

    /// Road transport needs vehicle and fuel details
    pub fn is_road(&self) -> bool {
        matches!(self, Self::Truck)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// < 3.5 t
    SmallTruck,
    /// 3.5-16 t
    MediumTruck,
    /// > 16 t
    LargeTruck,
    ElectricVehicle,
    HybridVehicle,
}

impl VehicleType {
    pub const ALL: [VehicleType; 5] = [
        Self::SmallTruck,
        Self::MediumTruck,
        Self::LargeTruck,
        Self::ElectricVehicle,
        Self::HybridVehicle,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Diesel,
    Petrol,
    Electric,
    Hybrid,
    Biodiesel,
    /// Compressed natural gas
    Cng,
}

impl FuelType {
    pub const ALL: [FuelType; 6] = [
        Self::Diesel,
        Self::Petrol,
        Self::Electric,
        Self::Hybrid,
        Self::Biodiesel,
        Self::Cng,
    ];

    pub fn is_fossil(&self) -> bool {
        matches!(self, Self::Diesel | Self::Petrol)
    }
}

/// Immutable emission multipliers injected into the transportation scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionFactorTable {
    pub base_factors: BTreeMap<TransportMode, f64>,
    pub vehicle_factors: BTreeMap<VehicleType, f64>,
    pub fuel_factors: BTreeMap<FuelType, f64>,
}

impl Default for EmissionFactorTable {
    fn default() -> Self {
        let base_factors = BTreeMap::from([
            (TransportMode::Truck, 0.15),
            (TransportMode::Train, 0.03),
            (TransportMode::Ship, 0.02),
            (TransportMode::Plane, 0.25),
        ]);
        let vehicle_factors = BTreeMap::from([
            (VehicleType::SmallTruck, 1.0),
            (VehicleType::MediumTruck, 1.5),
            (VehicleType::LargeTruck, 2.0),
            (VehicleType::ElectricVehicle, 0.3),
            (VehicleType::HybridVehicle, 0.6),
        ]);
        let fuel_factors = BTreeMap::from([
            (FuelType::Diesel, 1.0),
            (FuelType::Petrol, 1.1),
            (FuelType::Electric, 0.2),
            (FuelType::Hybrid, 0.5),
            (FuelType::Biodiesel, 0.7),
            (FuelType::Cng, 0.8),
        ]);

        Self {
            base_factors,
            vehicle_factors,
            fuel_factors,
        }
    }
}

impl EmissionFactorTable {
    pub fn base_factor(&self, mode: TransportMode) -> Result<f64> {
        self.base_factors.get(&mode).copied().ok_or_else(|| {
            ScoringError::Calculation(format!("no base emission factor for {:?}", mode))
        })
    }

    pub fn vehicle_multiplier(&self, vehicle: VehicleType) -> Result<f64> {
        self.vehicle_factors.get(&vehicle).copied().ok_or_else(|| {
            ScoringError::Calculation(format!("no emission multiplier for {:?}", vehicle))
        })
    }

    pub fn fuel_multiplier(&self, fuel: FuelType) -> Result<f64> {
        self.fuel_factors.get(&fuel).copied().ok_or_else(|| {
            ScoringError::Calculation(format!("no emission multiplier for {:?}", fuel))
        })
    }

    /// Check that every mode, vehicle and fuel has a finite, non-negative entry.
    /// Returns all problems at once.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for mode in TransportMode::ALL {
            check_entry(&mut errors, "base_factors", mode, self.base_factors.get(&mode));
        }
        for vehicle in VehicleType::ALL {
            check_entry(&mut errors, "vehicle_factors", vehicle, self.vehicle_factors.get(&vehicle));
        }
        for fuel in FuelType::ALL {
            check_entry(&mut errors, "fuel_factors", fuel, self.fuel_factors.get(&fuel));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_entry<K: std::fmt::Debug>(errors: &mut Vec<String>, table: &str, key: K, value: Option<&f64>) {
    match value {
        None => errors.push(format!("emission_factors.{}: missing entry for {:?}", table, key)),
        Some(v) if !v.is_finite() || *v < 0.0 => errors.push(format!(
            "emission_factors.{}: {:?} must be a non-negative number, got {}",
            table, key, v
        )),
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_complete() {
        assert!(EmissionFactorTable::default().validate().is_ok());
    }

    #[test]
    fn test_default_lookups() {
        let table = EmissionFactorTable::default();
        assert_eq!(table.base_factor(TransportMode::Truck).unwrap(), 0.15);
        assert_eq!(table.base_factor(TransportMode::Ship).unwrap(), 0.02);
        assert_eq!(table.vehicle_multiplier(VehicleType::LargeTruck).unwrap(), 2.0);
        assert_eq!(table.fuel_multiplier(FuelType::Cng).unwrap(), 0.8);
    }

    #[test]
    fn test_missing_entry_is_calculation_error() {
        let mut table = EmissionFactorTable::default();
        table.base_factors.remove(&TransportMode::Plane);

        let err = table.base_factor(TransportMode::Plane).unwrap_err();
        assert_eq!(err.code(), "calculation_error");

        let problems = table.validate().unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("base_factors"));
    }

    #[test]
    fn test_negative_factor_rejected() {
        let mut table = EmissionFactorTable::default();
        table.fuel_factors.insert(FuelType::Petrol, -1.0);
        table.vehicle_factors.insert(VehicleType::SmallTruck, f64::NAN);

        let problems = table.validate().unwrap_err();
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&VehicleType::ElectricVehicle).unwrap();
        assert_eq!(json, "\"electric_vehicle\"");

        let fuel: FuelType = serde_json::from_str("\"cng\"").unwrap();
        assert_eq!(fuel, FuelType::Cng);

        let table: EmissionFactorTable =
            serde_json::from_str(&serde_json::to_string(&EmissionFactorTable::default()).unwrap()).unwrap();
        assert_eq!(table, EmissionFactorTable::default());
    }
}
