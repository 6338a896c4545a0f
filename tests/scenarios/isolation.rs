//! Test: Isolated steps - inputs they receive and how their results surface

use crate::helpers::*;
use stepwise::core::{Configuration, FnStep};

/// With several pending destinations an isolated step only gets the run's initial destination
#[test]
fn test_isolated_step_gets_initial_destination_when_fanned_out() {
    let calls = calls();
    let fan_out = pipeline()
        .apply(produce(&["a", "b"]))
        .apply_isolated(recording("iso", &calls), Some(true))
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("init")), vec!["a", "b", "init"]);
    assert_eq!(*calls.borrow(), vec!["iso:init"]);
}

#[test]
fn test_isolated_step_gets_single_pending_destination() {
    let calls = calls();
    let fan_out = pipeline()
        .apply(suffix("_m"))
        .apply_isolated(recording("iso", &calls), Some(true))
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("s")), vec!["s_m", "s_m"]);
    assert_eq!(*calls.borrow(), vec!["iso:s_m"]);
}

#[test]
fn test_isolated_step_gets_fresh_destination_by_default() {
    let calls = calls();
    let fan_out = pipeline()
        .apply(suffix("_m"))
        .apply_isolated(recording("iso", &calls), None)
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("s")), vec!["s_m", ""]);
    assert_eq!(*calls.borrow(), vec!["iso:"]);
}

#[test]
fn test_fresh_isolated_destination_comes_from_initial_factory() {
    let calls = calls();
    let fan_out = pipeline()
        .initial_value("seed".to_string())
        .apply(suffix("_m"))
        .apply_isolated(recording("iso", &calls), Some(false))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["seed_m", "seed"]);
    assert_eq!(*calls.borrow(), vec!["iso:seed"]);
}

#[test]
fn test_configuration_can_default_to_keeping_destination() {
    let calls = calls();
    let fan_out = Text::with_configuration(Configuration::new().with_isolate_initial_destination(false))
        .apply(suffix("_m"))
        .apply_isolated(recording("iso", &calls), None)
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("s")), vec!["s_m", "s_m"]);
    assert_eq!(*calls.borrow(), vec!["iso:s_m"]);
}

/// An absent value ends the isolated step's own output without touching the main chain
#[test]
fn test_absent_isolated_result_stops_only_that_branch() {
    let fan_out = pipeline()
        .apply(suffix("_m"))
        .apply_isolated(produce_with_gaps(&[Some("x"), None, Some("y")]), None)
        .apply(suffix("_z"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("s")), vec!["s_m", "x", "s_m_z"]);
}

#[test]
fn test_isolated_step_returning_nothing() {
    let fan_out = pipeline()
        .apply(suffix("_m"))
        .apply_isolated(FnStep::new(|_: &String, _: Option<String>, _: &()| None), None)
        .apply(suffix("_z"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("s")), vec!["s_m", "s_m_z"]);
}

#[test]
fn test_isolated_results_never_rejoin_main_chain() {
    let calls = calls();
    let fan_out = pipeline()
        .apply(suffix("_m"))
        .apply_isolated(constant("iso"), None)
        .apply(recording("after", &calls))
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("s")), vec!["s_m", "iso", "s_m"]);
    assert_eq!(*calls.borrow(), vec!["after:s_m"]);
}

#[test]
fn test_conditional_isolated_step() {
    let fan_out = pipeline()
        .apply(suffix("_m"))
        .apply_if_isolated(|_: &String, _: Option<&String>, _: &()| true, suffix("_c"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, Some("s")), vec!["s_m", "_c"]);
}
