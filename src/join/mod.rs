//! A `Join` aggregates a fixed number of independent asynchronous completions into exactly one
//! downstream handler invocation.
mod join;

pub use join::*;
