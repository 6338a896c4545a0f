//! Test: Lazy evaluation - no work beyond the last consumed element

use crate::helpers::*;

#[test]
fn test_no_step_runs_past_last_consumed_element() {
    let calls = calls();
    let fan_out = pipeline()
        .apply(recording("first", &calls))
        .apply_isolated(recording("iso", &calls), Some(true))
        .apply(recording("last", &calls))
        .build_fan_out();

    let source = "source".to_string();
    let mut outputs = fan_out.transform_multi(&source, Some("s".to_string()), &());
    assert!(calls.borrow().is_empty());

    assert_eq!(outputs.next().unwrap().unwrap(), "s");
    assert_eq!(*calls.borrow(), vec!["first:s"]);

    assert_eq!(outputs.next().unwrap().unwrap(), "s");
    assert_eq!(*calls.borrow(), vec!["first:s", "iso:s"]);

    drop(outputs);
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn test_sequence_is_fused() {
    let fan_out = pipeline().apply(suffix("_a")).build_fan_out();
    let source = "source".to_string();
    let mut outputs = fan_out.transform_multi(&source, Some("s".to_string()), &());

    assert_eq!(outputs.next().unwrap().unwrap(), "s_a");
    assert!(outputs.next().is_none());
    assert!(outputs.next().is_none());
}

#[test]
fn test_every_call_starts_a_new_run() {
    let fan_out = pipeline().apply(produce(&["a", "b"])).build_fan_out();
    assert_eq!(collect(&fan_out, None), collect(&fan_out, None));
}
