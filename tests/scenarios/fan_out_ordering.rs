//! Test: Fan-out ordering - flush before isolated steps, main chain last

use crate::helpers::*;

/// Main chain [a, b], isolated [c, d], then every main destination gets "_x"
#[test]
fn test_flush_before_isolated_then_main_chain_at_end() {
    let fan_out = pipeline()
        .apply(produce(&["a", "b"]))
        .apply_isolated(produce(&["c", "d"]), None)
        .apply(suffix("_x"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a", "b", "c", "d", "a_x", "b_x"]);
}

/// Two isolated steps in a row only flush the main chain once
#[test]
fn test_consecutive_isolated_steps_flush_once() {
    let fan_out = pipeline()
        .apply(produce(&["a"]))
        .apply_isolated(constant("i1"), None)
        .apply_isolated(constant("i2"), None)
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a", "i1", "i2"]);
}

/// New main-chain results produced after a flush are flushed again before the next isolated step
#[test]
fn test_new_main_chain_results_flush_before_next_isolated_step() {
    let fan_out = pipeline()
        .apply(produce(&["a"]))
        .apply_isolated(constant("i1"), None)
        .apply(suffix("_x"))
        .apply_isolated(constant("i2"), None)
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a", "i1", "a_x", "i2"]);
}

#[test]
fn test_main_chain_only_is_emitted_once_at_end() {
    let fan_out = pipeline()
        .apply(produce(&["a", "b"]))
        .apply(suffix("_1"))
        .apply(suffix("_2"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a_1_2", "b_1_2"]);
}

/// An isolated step ahead of every ordinary step has nothing to flush
#[test]
fn test_leading_isolated_step() {
    let fan_out = pipeline()
        .apply_isolated(constant("iso"), None)
        .apply(suffix("_x"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["iso", "_x"]);
}

#[test]
fn test_fan_out_preserves_working_set_order() {
    let fan_out = pipeline()
        .apply(produce(&["a", "b"]))
        .apply(spread())
        .apply(suffix("!"))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a1!", "a2!", "b1!", "b2!"]);
}

/// The single-result view is the last element of the sequence
#[test]
fn test_single_result_view_is_last_element() {
    let cases = vec![
        pipeline()
            .apply(produce(&["a", "b"]))
            .apply_isolated(produce(&["c", "d"]), None)
            .apply(suffix("_x")),
        pipeline().apply(produce(&["a"])).apply_isolated(constant("iso"), None),
        pipeline().apply(spread()),
        pipeline().then(|_: &String, _: Option<String>, _: &()| None),
    ];

    for case in cases {
        let fan_out = case.build_fan_out();
        let all = collect(&fan_out, Some("s"));
        let last = fan_out.transform(&"source".to_string(), Some("s".to_string()), &()).unwrap();
        assert_eq!(last, all.last().cloned());
    }
}

#[test]
fn test_fan_out_group_as_ordinary_step() {
    use stepwise::execution::GroupStep;

    let inner = pipeline().apply(spread());
    let fan_out = pipeline()
        .apply(produce(&["a", "b"]))
        .apply(GroupStep::fan_out(inner))
        .build_fan_out();

    assert_eq!(collect(&fan_out, None), vec!["a1", "a2", "b1", "b2"]);
}
