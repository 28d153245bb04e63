//! Code for ranking units in merit order.
use super::cost::{DispatchInfo, derive_dispatch_info};
use crate::plant::UnitSpec;
use crate::request::DispatchRequest;

/// A unit together with its derived cost and availability
#[derive(Debug, Clone, PartialEq)]
pub struct RankedUnit<'a> {
    /// Index of the unit in the request
    pub position: usize,
    /// The unit's specification
    pub unit: &'a UnitSpec,
    /// Cost and availability under the request's market conditions
    pub info: DispatchInfo,
}

/// Rank the units of a request from cheapest to most expensive.
///
/// Units with equal cost are ordered by descending available capacity. Any remaining ties keep
/// the order of the request.
pub fn rank_units(request: &DispatchRequest) -> Vec<RankedUnit<'_>> {
    let mut ranked: Vec<_> = request
        .units()
        .iter()
        .enumerate()
        .map(|(position, unit)| RankedUnit {
            position,
            unit,
            info: derive_dispatch_info(unit, request.market()),
        })
        .collect();

    // NB: `sort_by` is stable
    ranked.sort_by(|a, b| {
        a.info
            .cost
            .value()
            .total_cmp(&b.info.cost.value())
            .then_with(|| b.info.available.cmp(&a.info.available))
    });

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{market, request, unit};
    use crate::market::MarketConditions;
    use crate::plant::UnitKind;
    use crate::units::Power;
    use rstest::rstest;

    fn names(ranked: &[RankedUnit]) -> Vec<String> {
        ranked.iter().map(|r| r.unit.id.to_string()).collect()
    }

    #[rstest]
    fn test_rank_units(request: DispatchRequest) {
        let ranked = rank_units(&request);
        assert_eq!(
            names(&ranked),
            [
                "windpark1",
                "windpark2",
                "gasfiredbig1",
                "gasfiredbig2",
                "gasfiredsomewhatsmaller",
                "tj1"
            ]
        );
        assert_eq!(ranked[0].position, 4);
        assert_eq!(ranked[5].position, 3);
    }

    #[rstest]
    fn test_rank_units_ties(market: MarketConditions) {
        // Same cost: bigger first, then request order
        let units = vec![
            unit("small", UnitKind::GasFired, 0.5, 0.0, 50.0),
            unit("big_a", UnitKind::GasFired, 0.5, 0.0, 100.0),
            unit("big_b", UnitKind::GasFired, 0.5, 0.0, 100.0),
        ];
        let request = DispatchRequest::new(Power(10.0), market, units).unwrap();
        assert_eq!(names(&rank_units(&request)), ["big_a", "big_b", "small"]);
    }
}
