//! High-level operations.
//!
//! This module contains the implementation of Berth commands. Operations
//! only plan: they resolve descriptors and synthesize commands, and never
//! run the commands they produce.

pub mod plan;
pub mod resolve;

pub use plan::{plan_package, plan_units, UnitPlan};
pub use resolve::{format_descriptor, resolve_package};
