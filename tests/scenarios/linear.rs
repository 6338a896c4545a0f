//! Test: Linear executor - strict left fold, fail fast on absent

use crate::helpers::*;
use stepwise::core::Configuration;
use stepwise::execution::GroupStep;

#[test]
fn test_fail_fast_skips_remaining_steps() {
    let calls = calls();
    let linear = pipeline()
        .apply(recording("one", &calls))
        .then(|_: &String, _: Option<String>, _: &()| None)
        .apply(recording("three", &calls))
        .apply(recording("four", &calls))
        .build();

    assert_eq!(linear.transform(&"src".to_string(), Some("d".to_string()), &()).unwrap(), None);
    assert_eq!(*calls.borrow(), vec!["one:d"]);
}

#[test]
fn test_isolation_flags_are_ignored() {
    let linear = pipeline()
        .apply(suffix("_a"))
        .apply_isolated(suffix("_b"), None)
        .apply(suffix("_c"))
        .build();

    let result = linear.transform(&"src".to_string(), Some("s".to_string()), &()).unwrap();
    assert_eq!(result.as_deref(), Some("s_a_b_c"));
}

#[test]
fn test_empty_pipeline_without_auto_creation_is_absent() {
    let linear = Text::with_configuration(Configuration::new().with_auto_create_destination(false)).build();
    assert_eq!(linear.run(&"src".to_string(), &()).unwrap(), None);
}

#[test]
fn test_absent_leaf_is_not_replaced_by_default_instance() {
    let linear = pipeline()
        .then(|_: &String, _: Option<String>, _: &()| None)
        .build();
    assert_eq!(linear.run(&"src".to_string(), &()).unwrap(), None);
}

#[test]
fn test_conditional_steps() {
    let linear = pipeline()
        .then_if(
            |source: &String, _: Option<&String>, _: &()| source.starts_with('y'),
            |_: &String, d: Option<String>, _: &()| d.map(|d| d + "+yes"),
        )
        .then_if(
            |source: &String, _: Option<&String>, _: &()| source.starts_with('n'),
            |_: &String, d: Option<String>, _: &()| d.map(|d| d + "+no"),
        )
        .build();

    let result = linear.transform(&"yes".to_string(), Some("d".to_string()), &()).unwrap();
    assert_eq!(result.as_deref(), Some("d+yes"));
}

#[test]
fn test_linear_group_step() {
    let inner = pipeline().apply(suffix("_in1")).apply(suffix("_in2"));
    let linear = pipeline()
        .apply(suffix("_out"))
        .apply(GroupStep::linear(inner))
        .build();

    let result = linear.transform(&"src".to_string(), Some("s".to_string()), &()).unwrap();
    assert_eq!(result.as_deref(), Some("s_out_in1_in2"));
}

#[test]
fn test_fan_out_group_in_linear_pipeline_yields_last() {
    let inner = pipeline().apply(spread());
    let linear = pipeline().apply(GroupStep::fan_out(inner)).build();

    let result = linear.transform(&"src".to_string(), Some("s".to_string()), &()).unwrap();
    assert_eq!(result.as_deref(), Some("s2"));
}
