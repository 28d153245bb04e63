//! Generating units and their static characteristics.
use crate::id::{define_id_getter, define_id_type};
use crate::units::{Dimensionless, Power};
use serde::{Deserialize, Serialize};
use strum::Display;

define_id_type! {UnitID}

/// The technology of a generating unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum UnitKind {
    /// A gas-fired plant, paying for fuel and CO2 emissions
    #[serde(rename = "gasfired", alias = "gas")]
    #[strum(serialize = "gasfired")]
    GasFired,
    /// A kerosine-fired turbojet
    #[serde(rename = "turbojet")]
    #[strum(serialize = "turbojet")]
    Turbojet,
    /// A wind park, free to run but limited by the available wind
    #[serde(rename = "windturbine", alias = "wind")]
    #[strum(serialize = "windturbine")]
    WindTurbine,
}

impl UnitKind {
    /// Whether running this kind of unit costs money (i.e. it burns fuel)
    pub fn is_cost_bearing(self) -> bool {
        !matches!(self, Self::WindTurbine)
    }
}

/// A generating unit taking part in the dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSpec {
    /// Unique identifier for the unit
    pub id: UnitID,
    /// The technology of the unit
    pub kind: UnitKind,
    /// Fraction of fuel energy converted to electricity.
    ///
    /// Only meaningful for cost-bearing units.
    pub efficiency: Dimensionless,
    /// Minimum stable output once the unit is running
    pub pmin: Power,
    /// Nameplate capacity
    pub pmax: Power,
}
define_id_getter! {UnitSpec, UnitID}
