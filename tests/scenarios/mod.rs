//! Scenario-based tests for stepwise

mod errors;
mod fan_out_ordering;
mod isolation;
mod laziness;
mod linear;
mod pruning;
