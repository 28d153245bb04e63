//! Common routines for handling input data.
//!
//! Requests are JSON documents in the format accepted by the HTTP service:
//!
//! ```json
//! {
//!   "load": 480,
//!   "fuels": {"gas(euro/MWh)": 13.4, "kerosine(euro/MWh)": 50.8, "co2(euro/ton)": 20, "wind(%)": 60},
//!   "powerplants": [
//!     {"name": "gasfiredbig1", "type": "gasfired", "efficiency": 0.53, "pmin": 100, "pmax": 460}
//!   ]
//! }
//! ```
use crate::market::MarketConditions;
use crate::plant::{UnitKind, UnitSpec};
use crate::request::DispatchRequest;
use crate::units::{Dimensionless, MoneyPerEnergy, MoneyPerMass, Power};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read a serde-deserialisable value from a TOML file.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path)
        .with_context(|| format!("Could not read {}", file_path.display()))?;
    let toml_data = toml::from_str(&toml_str)
        .with_context(|| format!("Could not parse {}", file_path.display()))?;

    Ok(toml_data)
}

/// Read a serde-deserialisable value from a JSON file.
///
/// # Arguments
///
/// * `file_path` - Path to the JSON file
pub fn read_json<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let json_str = fs::read_to_string(file_path)
        .with_context(|| format!("Could not read {}", file_path.display()))?;
    let json_data = serde_json::from_str(&json_str)
        .with_context(|| format!("Could not parse {}", file_path.display()))?;

    Ok(json_data)
}

/// Fuel and environmental prices as they appear in a request
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FuelsRaw {
    /// Gas price (EUR/MWh)
    #[serde(rename = "gas(euro/MWh)", alias = "gas")]
    pub gas: f64,
    /// Kerosine price (EUR/MWh)
    #[serde(rename = "kerosine(euro/MWh)", alias = "kerosine")]
    pub kerosine: f64,
    /// CO2 price (EUR/ton)
    #[serde(rename = "co2(euro/ton)", alias = "co2")]
    pub co2: f64,
    /// Wind availability (%)
    #[serde(rename = "wind(%)", alias = "wind")]
    pub wind: f64,
}

/// A generating unit as it appears in a request
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PowerPlantRaw {
    /// Unique name of the unit
    pub name: String,
    /// Technology of the unit
    #[serde(rename = "type")]
    pub kind: UnitKind,
    /// Efficiency; may be left out for wind units
    #[serde(default)]
    pub efficiency: Option<f64>,
    /// Minimum stable output (MW)
    pub pmin: f64,
    /// Nameplate capacity (MW)
    pub pmax: f64,
}

/// A request document, before any semantic checks
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PayloadRaw {
    /// Target load (MW)
    pub load: f64,
    /// Market prices
    pub fuels: FuelsRaw,
    /// Generating units, in order
    pub powerplants: Vec<PowerPlantRaw>,
}

impl PowerPlantRaw {
    /// Convert into a [`UnitSpec`]
    fn into_unit_spec(self) -> Result<UnitSpec> {
        let efficiency = match (self.efficiency, self.kind.is_cost_bearing()) {
            (Some(efficiency), _) => efficiency,
            (None, false) => 1.0,
            (None, true) => bail!("Unit {} is missing an efficiency", self.name),
        };

        Ok(UnitSpec {
            id: self.name.into(),
            kind: self.kind,
            efficiency: Dimensionless(efficiency),
            pmin: Power(self.pmin),
            pmax: Power(self.pmax),
        })
    }
}

impl PayloadRaw {
    /// Check the request and convert it into a [`DispatchRequest`]
    pub fn into_request(self) -> Result<DispatchRequest> {
        let market = MarketConditions {
            gas_price: MoneyPerEnergy(self.fuels.gas),
            kerosine_price: MoneyPerEnergy(self.fuels.kerosine),
            co2_price: MoneyPerMass(self.fuels.co2),
            wind_percentage: Dimensionless(self.fuels.wind),
        };
        let units = self
            .powerplants
            .into_iter()
            .map(PowerPlantRaw::into_unit_spec)
            .collect::<Result<Vec<_>>>()?;

        DispatchRequest::new(Power(self.load), market, units)
    }
}

/// Parse and check a request from a JSON string
pub fn parse_request(json: &str) -> Result<DispatchRequest> {
    let payload: PayloadRaw = serde_json::from_str(json).context("Invalid request structure")?;
    payload.into_request()
}

/// Read and check a request from a JSON file.
///
/// # Arguments
///
/// * `file_path` - Path to the request file
pub fn load_request(file_path: &Path) -> Result<DispatchRequest> {
    let payload: PayloadRaw = read_json(file_path)?;
    payload
        .into_request()
        .with_context(|| format!("Invalid request in {}", file_path.display()))
}
