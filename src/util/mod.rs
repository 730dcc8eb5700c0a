//! Helpers shared across the page flows.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules keep validation and routing rules out of the flows so
//! each rule is tested once, without a network.

pub mod auth;
pub mod forms;
