//! Test: Error propagation

use crate::helpers::*;
use std::any::Any;
use stepwise::core::{Configuration, PipelineError};

#[test]
fn test_multi_step_in_linear_pipeline_is_unsupported() {
    let linear = pipeline().apply(spread()).build();
    let err = linear.run(&"src".to_string(), &()).unwrap_err();
    assert!(matches!(err, PipelineError::Unsupported { .. }));
}

#[test]
fn test_fan_out_error_ends_sequence() {
    let configuration = Configuration::new().with_instance_factory(|_| Some(Box::new(7u8) as Box<dyn Any>));
    let fan_out = Text::with_configuration(configuration).apply(suffix("_a")).build_fan_out();

    let source = "src".to_string();
    let mut outputs = fan_out.run(&source, &());
    assert!(matches!(outputs.next(), Some(Err(PipelineError::InstanceType { .. }))));
    assert!(outputs.next().is_none());

    assert!(fan_out.transform(&source, None, &()).is_err());
}

#[test]
fn test_error_after_flushed_results() {
    let configuration = Configuration::new().with_instance_factory(|_| Some(Box::new(7u8) as Box<dyn Any>));
    let fan_out = Text::with_configuration(configuration)
        .apply(suffix("_a"))
        .apply_isolated(suffix("_iso"), None)
        .build_fan_out();

    let source = "src".to_string();
    let outputs: Vec<_> = fan_out.transform_multi(&source, Some("s".to_string()), &()).collect();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].as_deref(), Ok("s_a"));
    assert!(outputs[1].is_err());
}

#[test]
fn test_remove_step_out_of_range() {
    let mut pipeline = pipeline().apply(suffix("_a"));
    let err = pipeline.remove_step(1).err().expect("index 1 is past the end");
    assert_eq!(err, PipelineError::StepIndexOutOfRange { index: 1, len: 1 });
    assert_eq!(pipeline.len(), 1);
}
