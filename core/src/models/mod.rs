//! Domain models
//!
//! In-memory representations of the documents the editing surface works
//! on (profiles, simulations) and of the simulation output the service
//! returns (frames). Every edit operation is a pure function returning
//! a new value; collections hold their entries behind `Arc` so that
//! untouched entries keep pointer identity across edits.

pub mod agent;
pub mod frame;
pub mod profile;
pub mod simulation;
pub mod state_manager;
pub mod vector;

use thiserror::Error;

/// Errors raised by model edit operations
///
/// These are local validation failures: the triggering edit is rejected
/// before any request is issued and no model state changes.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("agent index {index} out of range (profile has {len} agents)")]
    AgentIndexOutOfRange { index: usize, len: usize },

    #[error("state manager index {index} out of range (agent has {len} state managers)")]
    StateManagerIndexOutOfRange { index: usize, len: usize },

    #[error("unknown simulation '{id}'")]
    UnknownSimulation { id: String },

    #[error("unknown agent '{id}'")]
    UnknownAgent { id: String },

    #[error("mass must be positive, got {value}")]
    NonPositiveMass { value: f64 },
}
