//! Common test utilities for compcat integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod panel;

#[allow(unused_imports)]
pub use fixtures::*;
pub use panel::*;
