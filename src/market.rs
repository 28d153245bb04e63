//! Fuel and environmental prices at the instant being dispatched.
use crate::units::{Dimensionless, MoneyPerEnergy, MoneyPerMass};

/// Current market conditions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketConditions {
    /// Price of gas per MWh of fuel
    pub gas_price: MoneyPerEnergy,
    /// Price of kerosine per MWh of fuel
    pub kerosine_price: MoneyPerEnergy,
    /// Price of emitting one ton of CO2
    pub co2_price: MoneyPerMass,
    /// Percentage (0-100) of wind nameplate capacity currently available
    pub wind_percentage: Dimensionless,
}
