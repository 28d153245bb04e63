//! Merit-order economic dispatch for a fleet of power plants.
//!
//! Given a load, fuel prices and a set of generating units, works out how much each unit should
//! produce so that the load is met at low cost.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod dispatch;
pub mod id;
pub mod input;
pub mod log;
pub mod market;
pub mod output;
pub mod plant;
pub mod request;
pub mod server;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the directory where program configuration files are stored
pub fn get_powerplan_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No known config dir for this platform; fall back on the working directory
        return PathBuf::from(".powerplan");
    };
    config_dir.push("powerplan");

    config_dir
}
