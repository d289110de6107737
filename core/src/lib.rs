//! Nbody Studio Core - Client Engine
//!
//! Editing state model and result-reshaping pipeline for a physics-agent
//! simulation service. Users define profiles (agents with state-manager
//! pipelines) and simulations (per-agent initial states), trigger remote
//! runs, and consume the derived 3D trajectory series.
//!
//! # Architecture
//!
//! - **models**: Domain types (Profile, Agent, Simulation, Frame)
//! - **tuple**: Codec for the state-manager argument tuple literal
//! - **schema**: State-manager function catalog, indexed by name
//! - **reshape**: Frames to per-agent plot series
//! - **service**: Schema provider / simulation service boundary (HTTP)
//! - **controller**: Session store, command dispatch, async orchestration
//!
//! # Critical Invariants
//!
//! 1. Model operations are pure: new values out, inputs untouched
//! 2. A simulation always holds an initial state for every
//!    currently-known agent of its profile before it is ever run
//! 3. Responses outliving their triggering selection are discarded

// Module declarations
pub mod controller;
pub mod models;
pub mod reshape;
pub mod schema;
pub mod service;
pub mod tuple;

// Re-exports for convenience
pub use controller::{
    Command, ControllerError, EditController, FetchOutcome, SelectionState, SelectionToken, Session,
};
pub use models::{
    agent::Agent,
    frame::{AgentFrameState, Frame, Snapshot, SnapshotEntry, RESERVED_KEYS},
    profile::{Profile, ProfileSet},
    simulation::{InitialAgentState, Simulation, SimulationSet, StateField},
    state_manager::StateManagerBinding,
    vector::Vector3,
    ModelError,
};
pub use reshape::{CoordinateSeries, PlotSeries, Trajectories};
pub use schema::{SchemaCatalog, SchemaError, StateManagerSchema};
pub use service::{
    HttpSimulationService, SchemaProvider, ServiceConfig, ServiceError, SimulationService,
};
