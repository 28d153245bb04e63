//! Code for allocating load to wind units, which are used before anything that burns fuel.
use super::Allocation;
use crate::plant::UnitKind;
use crate::units::Tenths;
use log::debug;

/// Give each wind unit, in merit order, as much of the load as it can take.
///
/// # Returns
///
/// The load still to be served once wind has been used.
pub fn allocate_wind(allocations: &mut [Allocation], load: Tenths) -> Tenths {
    let mut remaining = load;
    for allocation in allocations
        .iter_mut()
        .filter(|allocation| allocation.unit().kind == UnitKind::WindTurbine)
    {
        if !remaining.is_positive() {
            break;
        }

        let output = allocation.max_output().min(remaining);
        allocation.output = output;
        remaining -= output;
        debug!(
            "Wind: {} produces {output}, remaining load: {remaining}",
            allocation.unit().id
        );
    }

    remaining
}
