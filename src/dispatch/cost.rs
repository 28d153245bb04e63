//! Code for calculating the running cost and available capacity of generating units.
use crate::market::MarketConditions;
use crate::plant::{UnitKind, UnitSpec};
use crate::units::{Dimensionless, MassPerEnergy, MoneyPerEnergy, Tenths};

/// Tons of CO2 emitted per MWh of gas burned, assumed the same for every gas-fired unit
pub const CO2_EMISSION_FACTOR: MassPerEnergy = MassPerEnergy(0.3);

/// Properties of a unit derived from its specification and the current market conditions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchInfo {
    /// Cost of producing one MWh of electricity
    pub cost: MoneyPerEnergy,
    /// The most the unit can produce right now
    pub available: Tenths,
}

/// Calculate the running cost and available capacity for a unit.
///
/// Wind is free but limited to the current share of its nameplate capacity, truncated to a
/// whole MW. Fuel-burning units can run up to `pmax` and pay for fuel (and, for gas, emissions)
/// divided by their efficiency.
pub fn derive_dispatch_info(unit: &UnitSpec, market: &MarketConditions) -> DispatchInfo {
    match unit.kind {
        UnitKind::WindTurbine => DispatchInfo {
            cost: MoneyPerEnergy(0.0),
            available: Tenths::from_power_whole_mw(
                unit.pmax * market.wind_percentage / Dimensionless(100.0),
            ),
        },
        UnitKind::GasFired => DispatchInfo {
            cost: market.gas_price / unit.efficiency
                + CO2_EMISSION_FACTOR * market.co2_price / unit.efficiency,
            available: Tenths::from_power(unit.pmax),
        },
        UnitKind::Turbojet => DispatchInfo {
            cost: market.kerosine_price / unit.efficiency,
            available: Tenths::from_power(unit.pmax),
        },
    }
}
