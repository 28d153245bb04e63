//! Integration tests for the dispatch over a range of loads and market conditions.
use float_cmp::assert_approx_eq;
use itertools::Itertools;
use powerplan::dispatch::{DispatchError, DispatchOutcome, ProductionPlan, dispatch, rank_units};
use powerplan::input::parse_request;
use powerplan::request::DispatchRequest;
use powerplan::units::{Power, Tenths};
use rstest::rstest;

const FLEET: &str = r#"[
    {"name": "gasfiredbig1", "type": "gasfired", "efficiency": 0.53, "pmin": 100, "pmax": 460},
    {"name": "gasfiredbig2", "type": "gasfired", "efficiency": 0.53, "pmin": 100, "pmax": 460},
    {"name": "gasfiredsomewhatsmaller", "type": "gasfired", "efficiency": 0.37, "pmin": 40, "pmax": 210},
    {"name": "tj1", "type": "turbojet", "efficiency": 0.3, "pmin": 0, "pmax": 16},
    {"name": "windpark1", "type": "windturbine", "efficiency": 1, "pmin": 0, "pmax": 150},
    {"name": "windpark2", "type": "windturbine", "efficiency": 1, "pmin": 0, "pmax": 36}
]"#;

fn request(load: f64, wind: f64) -> DispatchRequest {
    parse_request(&format!(
        r#"{{
            "load": {load},
            "fuels": {{"gas(euro/MWh)": 13.4, "kerosine(euro/MWh)": 50.8, "co2(euro/ton)": 20, "wind(%)": {wind}}},
            "powerplants": {FLEET}
        }}"#
    ))
    .unwrap()
}

/// Loads from zero to beyond the capacity of the fleet, in steps of 3.7 MW
fn loads() -> impl Iterator<Item = f64> {
    (0..=370).map(|i| f64::from(i * 37) / 10.0)
}

/// Check that every unit's output is within its bounds
fn check_bounds(request: &DispatchRequest, plan: &ProductionPlan) {
    let ranked = rank_units(request);
    for (position, (unit, entry)) in request.units().iter().zip(plan).enumerate() {
        assert_eq!(unit.id, entry.unit_id);
        let available = ranked
            .iter()
            .find(|ranked| ranked.position == position)
            .unwrap()
            .info
            .available;
        assert!(entry.output >= Tenths::ZERO);
        assert!(entry.output <= available, "{} above capacity", unit.id);
        if unit.kind.is_cost_bearing() && entry.output > Tenths::ZERO {
            assert!(
                entry.output >= Tenths::from_power(unit.pmin),
                "{} below pmin",
                unit.id
            );
        }
    }
}

/// Check that no cheaper unit is left with spare capacity while a dearer one is running
fn check_merit_order(request: &DispatchRequest, plan: &ProductionPlan) {
    let ranked = rank_units(request);
    let output = |position: usize| plan.iter().nth(position).unwrap().output;
    for (cheaper, dearer) in ranked
        .iter()
        .filter(|ranked| ranked.unit.kind.is_cost_bearing())
        .tuple_combinations()
    {
        if dearer.info.cost <= cheaper.info.cost || output(dearer.position) == Tenths::ZERO {
            continue;
        }

        let cheaper_output = output(cheaper.position);
        let blocked_by_pmin = cheaper_output == Tenths::ZERO && cheaper.unit.pmin > Power(0.0);
        assert!(
            cheaper_output == cheaper.info.available || blocked_by_pmin,
            "{} has spare capacity while {} is running",
            cheaper.unit.id,
            dearer.unit.id
        );
    }
}

#[test]
fn test_end_to_end_scenario() {
    let request = request(480.0, 60.0);

    let ranked = rank_units(&request);
    let cost = |name: &str| {
        ranked
            .iter()
            .find(|ranked| ranked.unit.id.as_str() == name)
            .unwrap()
            .info
            .cost
            .value()
    };
    assert_approx_eq!(f64, cost("gasfiredbig1"), 36.60, epsilon = 0.01);
    assert_approx_eq!(f64, cost("gasfiredbig2"), 36.60, epsilon = 0.01);
    assert_approx_eq!(f64, cost("gasfiredsomewhatsmaller"), 52.43, epsilon = 0.01);
    assert_approx_eq!(f64, cost("tj1"), 169.33, epsilon = 0.01);
    assert_eq!(cost("windpark1"), 0.0);

    let outcome = dispatch(&request).unwrap();
    assert!(matches!(outcome, DispatchOutcome::Satisfied(_)));
    let plan = outcome.plan();
    let outputs = plan
        .iter()
        .map(|entry| (entry.unit_id.as_str(), entry.output.to_power().value()))
        .collect_vec();
    assert_eq!(
        outputs,
        [
            ("gasfiredbig1", 369.0),
            ("gasfiredbig2", 0.0),
            ("gasfiredsomewhatsmaller", 0.0),
            ("tj1", 0.0),
            ("windpark1", 90.0),
            ("windpark2", 21.0),
        ]
    );
    assert_eq!(plan.total(), Power(480.0));
}

#[test]
fn test_wind_exceeds_load() {
    let request = request(100.0, 100.0);
    let plan = dispatch(&request).unwrap().into_plan();
    assert_eq!(plan.output_for("windpark1"), Some(Power(100.0)));
    for unit in request.units().iter().filter(|u| u.kind.is_cost_bearing()) {
        assert_eq!(plan.output_for(unit.id.as_str()), Some(Power(0.0)));
    }
}

#[rstest]
#[case(0.0)]
#[case(33.3)]
#[case(60.0)]
#[case(100.0)]
fn test_dispatch_properties(#[case] wind: f64) {
    let mut gaps = 0;
    for load in loads() {
        let request = request(load, wind);
        match dispatch(&request) {
            Ok(DispatchOutcome::Satisfied(plan)) => {
                let difference = (plan.total().value() - load).abs();
                assert!(difference <= 0.1 + 1e-9, "load {load}: off by {difference}");
                check_bounds(&request, &plan);
                check_merit_order(&request, &plan);
            }
            Ok(DispatchOutcome::UncorrectedResidual { plan, .. }) => {
                check_bounds(&request, &plan);
            }
            Err(DispatchError::InsufficientCapacity {
                available,
                unserved,
                plan,
                ..
            }) => {
                if available.value() >= load {
                    gaps += 1;
                }
                assert!(unserved > Power(0.0));
                check_bounds(&request, &plan);
                assert!(plan.total().value() < load);
            }
        }
    }

    // Only loads falling into the narrow gaps left by pmin can't be served within capacity
    assert!(gaps < 25, "{gaps} loads within capacity not served");
}

#[rstest]
#[case(1257.1, 0.1)]
#[case(1300.0, 43.0)]
#[case(5000.0, 3743.0)]
fn test_shortfall(#[case] load: f64, #[case] expected_unserved: f64) {
    let Err(DispatchError::InsufficientCapacity {
        available,
        unserved,
        ..
    }) = dispatch(&request(load, 60.0))
    else {
        panic!("Expected insufficient capacity for load {load}");
    };
    assert_eq!(available, Power(1257.0));
    assert_approx_eq!(f64, unserved.value(), expected_unserved, epsilon = 1e-9);
}

#[test]
fn test_determinism() {
    for load in [0.0, 123.4, 480.0, 999.9] {
        let first = dispatch(&request(load, 60.0));
        for _ in 0..5 {
            assert_eq!(dispatch(&request(load, 60.0)), first);
        }
    }
}

#[test]
fn test_oversized_units_rejected() {
    let err = parse_request(
        r#"{
            "load": 100,
            "fuels": {"gas": 13.4, "kerosine": 50.8, "co2": 20, "wind": 60},
            "powerplants": [
                {"name": "a", "type": "gasfired", "efficiency": 0.5, "pmin": 0, "pmax": 1e18},
                {"name": "b", "type": "gasfired", "efficiency": 0.5, "pmin": 0, "pmax": 1e18}
            ]
        }"#,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Invalid unit a");

    let err = parse_request(
        r#"{
            "load": 100,
            "fuels": {"gas": 13.4, "kerosine": 50.8, "co2": 20, "wind": 60},
            "powerplants": [{"name": "w", "type": "windturbine", "pmin": 0, "pmax": 1e20}]
        }"#,
    )
    .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "pmax cannot exceed 1000000000 MW");
}
