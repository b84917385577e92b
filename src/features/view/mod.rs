pub mod error_responses;
pub mod registry;

pub use registry::{ViewLimits, ViewRegistry};
