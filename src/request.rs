//! Defines the [`DispatchRequest`] struct, a validated description of one dispatch problem.
use crate::id::check_ids_unique;
use crate::market::MarketConditions;
use crate::plant::UnitSpec;
use crate::units::{Dimensionless, Power};
use anyhow::{Context, Result, ensure};

/// A validated request for a production plan.
///
/// The only way to construct one is [`DispatchRequest::new`], so the dispatch code can rely on
/// every invariant checked there.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    load: Power,
    market: MarketConditions,
    units: Vec<UnitSpec>,
}

/// The largest load or unit capacity accepted.
///
/// Power is dispatched as whole tenths of a MW in an `i64`; this ceiling keeps every quantity, and
/// the total capacity of any fleet that fits in memory, well inside that range.
pub const MAX_POWER: Power = Power(1e9);

/// Check that the load is valid
fn check_load(load: Power) -> Result<()> {
    ensure!(
        load.is_finite() && load >= Power(0.0),
        "load must be a finite number greater than or equal to zero"
    );
    ensure!(load <= MAX_POWER, "load cannot exceed {MAX_POWER}");

    Ok(())
}

/// Check that a price is valid
fn check_price(name: &str, price: f64) -> Result<()> {
    ensure!(
        price.is_finite() && price >= 0.0,
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// Check that the market conditions are valid
fn check_market(market: &MarketConditions) -> Result<()> {
    check_price("gas price", market.gas_price.value())?;
    check_price("kerosine price", market.kerosine_price.value())?;
    check_price("CO2 price", market.co2_price.value())?;
    ensure!(
        market.wind_percentage.is_finite()
            && (0.0..=100.0).contains(&market.wind_percentage.0),
        "wind percentage must be between 0 and 100"
    );

    Ok(())
}

/// Check that a single unit's limits and efficiency are valid
fn check_unit(unit: &UnitSpec) -> Result<()> {
    ensure!(
        unit.pmin.is_finite() && unit.pmin >= Power(0.0),
        "pmin must be a finite number greater than or equal to zero"
    );
    ensure!(
        unit.pmax.is_finite() && unit.pmax >= unit.pmin,
        "pmax must be a finite number greater than or equal to pmin"
    );
    ensure!(unit.pmax <= MAX_POWER, "pmax cannot exceed {MAX_POWER}");
    if unit.kind.is_cost_bearing() {
        ensure!(
            unit.efficiency.is_finite()
                && unit.efficiency > Dimensionless(0.0)
                && unit.efficiency <= Dimensionless(1.0),
            "efficiency must be greater than 0 and at most 1 for {} units",
            unit.kind
        );
    }

    Ok(())
}

impl DispatchRequest {
    /// Create a new request, checking that it is semantically possible.
    pub fn new(load: Power, market: MarketConditions, units: Vec<UnitSpec>) -> Result<Self> {
        check_load(load)?;
        check_market(&market)?;
        check_ids_unique(&units).context("Invalid unit names")?;
        for unit in &units {
            check_unit(unit).with_context(|| format!("Invalid unit {}", unit.id))?;
        }

        Ok(Self {
            load,
            market,
            units,
        })
    }

    /// The target demand
    pub fn load(&self) -> Power {
        self.load
    }

    /// Fuel and environmental prices
    pub fn market(&self) -> &MarketConditions {
        &self.market
    }

    /// Generating units, in the order they were given
    pub fn units(&self) -> &[UnitSpec] {
        &self.units
    }
}
