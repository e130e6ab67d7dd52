//! Command implementations

pub mod plan;
pub mod resolve;
