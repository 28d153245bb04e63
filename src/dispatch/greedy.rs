//! The incremental merit-order allocation of load to fuel-burning units.
//!
//! Units are visited in merit order over repeated passes. An idle unit can only be switched on
//! if it can take at least `pmin`; a running unit takes as much of the remaining load as its
//! `pmax` allows. Every allocation is a whole number of 0.1 MW steps.
//!
//! Each pass that makes progress either serves the whole load or brings at least one more unit
//! to `pmax`, so the number of passes is bounded by the number of units plus one.
use super::Allocation;
use crate::units::Tenths;
use log::{debug, warn};

/// How the incremental allocation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyResult {
    /// Load left unserved
    pub remaining: Tenths,
    /// Whether the allocation stopped because a whole pass made no progress
    pub stalled: bool,
    /// The number of passes made over the units
    pub passes: usize,
}

/// Work out how much more a unit should produce, if anything.
fn next_increment(allocation: &Allocation, remaining: Tenths) -> Option<Tenths> {
    let current = allocation.output;
    let pmin = allocation.min_output();
    let pmax = allocation.max_output();
    if current >= pmax {
        return None;
    }

    let increment = if current == Tenths::ZERO {
        // The unit can't be turned on below pmin
        if pmax.min(remaining) < pmin.max(Tenths::STEP) {
            return None;
        }
        remaining.min(pmax).max(pmin)
    } else {
        remaining.min(pmax - current)
    };

    (increment >= Tenths::STEP).then_some(increment)
}

/// Allocate the remaining load across the fuel-burning units.
///
/// Stops once the remaining load is no more than 0.1 MW, or when a full pass can't place any
/// more load.
pub fn allocate_incrementally(allocations: &mut [Allocation], remaining: Tenths) -> GreedyResult {
    let mut remaining = remaining;
    let mut passes = 0;
    while remaining > Tenths::STEP {
        passes += 1;
        let mut made_progress = false;
        for allocation in allocations
            .iter_mut()
            .filter(|allocation| allocation.unit().kind.is_cost_bearing())
        {
            let Some(increment) = next_increment(allocation, remaining) else {
                continue;
            };

            allocation.output += increment;
            remaining -= increment;
            made_progress = true;
            debug!(
                "{} produces {}, remaining load: {remaining}",
                allocation.unit().id,
                allocation.output
            );

            if remaining <= Tenths::STEP {
                break;
            }
        }

        if !made_progress {
            warn!("Could not satisfy remaining load of {remaining}");
            return GreedyResult {
                remaining,
                stalled: true,
                passes,
            };
        }
    }

    GreedyResult {
        remaining,
        stalled: false,
        passes,
    }
}
