//! Fixtures for tests

use crate::market::MarketConditions;
use crate::plant::{UnitKind, UnitSpec};
use crate::request::DispatchRequest;
use crate::units::{Dimensionless, MoneyPerEnergy, MoneyPerMass, Power};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Create a unit with the given parameters
pub fn unit(name: &str, kind: UnitKind, efficiency: f64, pmin: f64, pmax: f64) -> UnitSpec {
    UnitSpec {
        id: name.into(),
        kind,
        efficiency: Dimensionless(efficiency),
        pmin: Power(pmin),
        pmax: Power(pmax),
    }
}

#[fixture]
pub fn market() -> MarketConditions {
    MarketConditions {
        gas_price: MoneyPerEnergy(13.4),
        kerosine_price: MoneyPerEnergy(50.8),
        co2_price: MoneyPerMass(20.0),
        wind_percentage: Dimensionless(60.0),
    }
}

#[fixture]
pub fn units() -> Vec<UnitSpec> {
    vec![
        unit("gasfiredbig1", UnitKind::GasFired, 0.53, 100.0, 460.0),
        unit("gasfiredbig2", UnitKind::GasFired, 0.53, 100.0, 460.0),
        unit("gasfiredsomewhatsmaller", UnitKind::GasFired, 0.37, 40.0, 210.0),
        unit("tj1", UnitKind::Turbojet, 0.3, 0.0, 16.0),
        unit("windpark1", UnitKind::WindTurbine, 1.0, 0.0, 150.0),
        unit("windpark2", UnitKind::WindTurbine, 1.0, 0.0, 36.0),
    ]
}

#[fixture]
pub fn request(market: MarketConditions, units: Vec<UnitSpec>) -> DispatchRequest {
    DispatchRequest::new(Power(480.0), market, units).unwrap()
}
