//! Test: Pruning and main-chain termination

use crate::helpers::*;
use stepwise::core::{FnStep, TransformAction, TypedMulti, TypedMultiStep};

#[test]
fn test_absent_result_prunes_destination_and_stops_main_chain() {
    let drop_b = FnStep::new(|_: &String, d: Option<String>, _: &()| d.filter(|d| d != "b"));
    let fan_out = pipeline()
        .apply(produce(&["a", "b", "c"]))
        .apply(drop_b)
        .apply(suffix("_x"))
        .build_fan_out();

    let outputs = collect(&fan_out, None);
    assert_eq!(outputs, vec!["a", "c"]);
    assert!(outputs.iter().all(|o| o != "b" && !o.ends_with("_x")));
}

/// Everything pruned: later ordinary steps are skipped, isolated steps still run
#[test]
fn test_all_pruned_still_runs_isolated_steps() {
    let calls = calls();
    let fan_out = pipeline()
        .apply(produce(&["a", "b"]))
        .apply(gated(&["z"], TransformAction::BreakTransformation))
        .apply(recording("after", &calls))
        .apply_isolated(constant("iso"), None)
        .apply(suffix("_x"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["iso"]);
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_pass_through_keeps_destinations() {
    let fan_out = pipeline()
        .apply(produce(&["a", "b"]))
        .apply(gated(&["z"], TransformAction::PassThrough))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a", "b"]);
}

#[test]
fn test_first_step_absent_yields_nothing() {
    let calls = calls();
    let fan_out = pipeline()
        .then(|_: &String, _: Option<String>, _: &()| None)
        .apply(recording("after", &calls))
        .build_fan_out();

    assert!(collect(&fan_out, Some("s")).is_empty());
    assert!(calls.borrow().is_empty());
}

/// An absent value inside a multi-result step keeps what came before it
#[test]
fn test_absent_value_in_multi_result_terminates() {
    let fan_out = pipeline()
        .apply(produce_with_gaps(&[Some("a"), None, Some("b")]))
        .apply(suffix("_x"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a"]);
}

/// Multi-result step passing destinations through, except `b` which yields nothing
struct DropB;

impl TypedMultiStep<String, String, ()> for DropB {
    fn apply_multi(&self, _: &String, d: Option<String>, _: &()) -> Vec<Option<String>> {
        match d {
            Some(d) if d == "b" => vec![],
            other => vec![other],
        }
    }
}

/// An empty result removes only that branch; the others carry on
#[test]
fn test_empty_result_prunes_only_that_branch() {
    let fan_out = pipeline()
        .apply(produce(&["a", "b", "c"]))
        .apply(TypedMulti::new(DropB))
        .apply(suffix("_x"))
        .apply_isolated(produce(&["a", "b", "c"]), None)
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a_x", "c_x", "a", "b", "c"]);
}
