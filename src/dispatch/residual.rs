//! Code for closing a small gap between the total allocated output and the load.
use super::Allocation;
use crate::units::Tenths;
use log::{debug, warn};

/// Try to absorb the difference between the load and the allocated output in a single unit.
///
/// Running units are visited in reverse merit order and the first one that can take the whole
/// difference while staying within its bounds is adjusted. A running unit is never switched off.
///
/// # Returns
///
/// The difference between load and total output that is left afterwards.
pub fn correct_residual(allocations: &mut [Allocation], load: Tenths) -> Tenths {
    let total: Tenths = allocations.iter().map(|allocation| allocation.output).sum();
    let difference = load - total;
    if difference.abs() <= Tenths::STEP {
        return difference;
    }

    warn!("Production differs from load by {difference}");
    for allocation in allocations
        .iter_mut()
        .rev()
        .filter(|allocation| allocation.output.is_positive())
    {
        let adjusted = allocation.output + difference;
        let lower = allocation.min_output().max(Tenths::STEP);
        if (lower..=allocation.max_output()).contains(&adjusted) {
            debug!(
                "Adjusting {} from {} to {adjusted}",
                allocation.unit().id,
                allocation.output
            );
            allocation.output = adjusted;
            return Tenths::ZERO;
        }
    }

    difference
}
