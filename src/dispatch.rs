//! Code for performing the economic dispatch.
//!
//! Given a validated [`DispatchRequest`], this works out how much each unit should produce so
//! that the load is met at low cost. Units are ranked in merit order, wind is used first, then
//! fuel-burning units are filled in incrementally, and finally any small remaining gap is closed
//! by nudging one running unit.
//!
//! Every call works on its own freshly derived state, so requests can be dispatched concurrently.
use crate::plant::{UnitID, UnitSpec};
use crate::request::DispatchRequest;
use crate::units::{Power, Tenths};
use itertools::Itertools;
use log::{debug, info, warn};
use thiserror::Error;

pub mod cost;
pub use cost::DispatchInfo;
pub mod greedy;
use greedy::allocate_incrementally;
pub mod merit_order;
pub use merit_order::{RankedUnit, rank_units};
pub mod residual;
use residual::correct_residual;
pub mod wind;
use wind::allocate_wind;

/// The output being built up for one unit during the dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation<'a> {
    ranked: RankedUnit<'a>,
    min_output: Tenths,
    /// The output allocated so far
    pub output: Tenths,
}

impl<'a> Allocation<'a> {
    /// Create a new, idle allocation for a ranked unit
    pub fn new(ranked: RankedUnit<'a>) -> Self {
        let min_output = if ranked.unit.kind.is_cost_bearing() {
            Tenths::from_power(ranked.unit.pmin)
        } else {
            Tenths::ZERO
        };

        Self {
            ranked,
            min_output,
            output: Tenths::ZERO,
        }
    }

    /// The unit being dispatched
    pub fn unit(&self) -> &'a UnitSpec {
        self.ranked.unit
    }

    /// The lowest output at which the unit may run (wind has no minimum)
    pub fn min_output(&self) -> Tenths {
        self.min_output
    }

    /// The highest output the unit can reach right now
    pub fn max_output(&self) -> Tenths {
        self.ranked.info.available
    }
}

/// Build idle allocations for every unit in a request, in merit order
pub fn allocations_for(request: &DispatchRequest) -> Vec<Allocation<'_>> {
    rank_units(request).into_iter().map(Allocation::new).collect()
}

/// The output allocated to a single unit
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    /// The unit
    pub unit_id: UnitID,
    /// How much the unit should produce
    pub output: Tenths,
}

/// How much each unit should produce, in the order the units were given in the request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductionPlan(Vec<PlanEntry>);

impl ProductionPlan {
    /// Build a plan from allocations, restoring the request order
    fn from_allocations(allocations: Vec<Allocation>) -> Self {
        Self(
            allocations
                .into_iter()
                .sorted_by_key(|allocation| allocation.ranked.position)
                .map(|allocation| PlanEntry {
                    unit_id: allocation.unit().id.clone(),
                    output: allocation.output,
                })
                .collect(),
        )
    }

    /// Iterate over the entries of the plan
    pub fn iter(&self) -> impl Iterator<Item = &PlanEntry> {
        self.0.iter()
    }

    /// The number of entries in the plan
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the plan is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The output allocated to the given unit, if it is part of the plan
    pub fn output_for(&self, unit_id: &str) -> Option<Power> {
        self.iter()
            .find(|entry| entry.unit_id.as_str() == unit_id)
            .map(|entry| entry.output.to_power())
    }

    /// The total output of all units
    pub fn total(&self) -> Power {
        self.iter()
            .map(|entry| entry.output)
            .sum::<Tenths>()
            .to_power()
    }
}

impl<'a> IntoIterator for &'a ProductionPlan {
    type Item = &'a PlanEntry;
    type IntoIter = std::slice::Iter<'a, PlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A successfully computed dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The plan meets the load to within 0.1 MW
    Satisfied(ProductionPlan),
    /// The plan is within capacity, but a gap to the load could not be closed
    UncorrectedResidual {
        /// The plan
        plan: ProductionPlan,
        /// Load minus total output
        residual: Power,
    },
}

impl DispatchOutcome {
    /// The production plan
    pub fn plan(&self) -> &ProductionPlan {
        match self {
            Self::Satisfied(plan) | Self::UncorrectedResidual { plan, .. } => plan,
        }
    }

    /// Consume the outcome, returning the production plan
    pub fn into_plan(self) -> ProductionPlan {
        match self {
            Self::Satisfied(plan) | Self::UncorrectedResidual { plan, .. } => plan,
        }
    }

    /// The gap left between load and total output, if it exceeds the tolerance
    pub fn residual(&self) -> Option<Power> {
        match self {
            Self::Satisfied(_) => None,
            Self::UncorrectedResidual { residual, .. } => Some(*residual),
        }
    }
}

/// A dispatch which could not meet the load
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The units cannot serve the whole load
    #[error("Insufficient capacity: {unserved} of the {load} load cannot be served")]
    InsufficientCapacity {
        /// The requested load
        load: Power,
        /// Total available capacity of all units
        available: Power,
        /// The part of the load left unserved
        unserved: Power,
        /// The best plan that could be found
        plan: ProductionPlan,
    },
}

/// Perform the dispatch for a request.
///
/// # Returns
///
/// A [`DispatchOutcome`] with the production plan, or [`DispatchError::InsufficientCapacity`] if
/// the load cannot be met.
pub fn dispatch(request: &DispatchRequest) -> Result<DispatchOutcome, DispatchError> {
    let mut allocations = allocations_for(request);
    debug!(
        "Merit order: {}",
        allocations
            .iter()
            .map(|a| format!("{}({:.2})", a.unit().id, a.ranked.info.cost.value()))
            .join(", ")
    );

    let load = Tenths::from_power(request.load());
    let available: Tenths = allocations.iter().map(Allocation::max_output).sum();
    if available < load {
        warn!("Available capacity of {available} is below the load of {load}");
        return Err(DispatchError::InsufficientCapacity {
            load: load.to_power(),
            available: available.to_power(),
            unserved: (load - available).to_power(),
            plan: ProductionPlan::from_allocations(allocations),
        });
    }

    let remaining = allocate_wind(&mut allocations, load);
    let greedy = allocate_incrementally(&mut allocations, remaining);
    debug!(
        "Incremental allocation finished after {} passes",
        greedy.passes
    );
    let residual = correct_residual(&mut allocations, load);

    let plan = ProductionPlan::from_allocations(allocations);
    info!("Total production: {}, target load: {load}", plan.total());

    if residual.abs() <= Tenths::STEP {
        return Ok(DispatchOutcome::Satisfied(plan));
    }

    if greedy.stalled && residual.is_positive() {
        return Err(DispatchError::InsufficientCapacity {
            load: load.to_power(),
            available: available.to_power(),
            unserved: residual.to_power(),
            plan,
        });
    }

    warn!("Could not correct a residual of {residual}");
    Ok(DispatchOutcome::UncorrectedResidual {
        plan,
        residual: residual.to_power(),
    })
}
