//! Service boundary
//!
//! Abstract contracts for the two remote collaborators the core depends
//! on: the schema provider (state-manager function catalog) and the
//! simulation service (profile/simulation CRUD plus the run endpoint),
//! together with the error taxonomy shared by every call across that
//! boundary. The concrete HTTP client lives in [`http`].

pub mod http;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::frame::Frame;
use crate::models::profile::Profile;
use crate::models::simulation::Simulation;
use crate::schema::SchemaCatalog;

pub use http::{HttpSimulationService, ServiceConfig};

/// Failures crossing the service boundary
///
/// Every variant is recoverable: the caller logs it and leaves prior
/// model state unchanged. There is no automatic retry or backoff; the
/// user retries manually.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request rejected before a response was produced
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("service returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected JSON shape
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Catalog lookup of available state-manager functions
#[async_trait]
pub trait SchemaProvider {
    /// Fetch the state-manager function catalog
    async fn fetch_catalog(&self) -> Result<SchemaCatalog, ServiceError>;
}

/// Profile/simulation CRUD and the run endpoint
#[async_trait]
pub trait SimulationService {
    /// Fetch all stored profiles, keyed by profile id
    async fn fetch_profiles(&self) -> Result<HashMap<String, Profile>, ServiceError>;

    /// Store one profile under `id`, replacing any existing body
    async fn save_profile(&self, id: &str, profile: &Profile) -> Result<(), ServiceError>;

    /// Activate the server-side context for one profile
    async fn load_profile(&self, id: &str) -> Result<(), ServiceError>;

    /// Fetch the simulations belonging to one profile, keyed by
    /// simulation id
    async fn fetch_simulations(
        &self,
        profile_id: &str,
    ) -> Result<HashMap<String, Simulation>, ServiceError>;

    /// Run one simulation and return its frame sequence
    ///
    /// The frames come back chronologically ordered in the response
    /// body; ordering is the service's guarantee, not re-checked here.
    async fn run_simulation(
        &self,
        profile_id: &str,
        simulation_id: &str,
        simulation: &Simulation,
    ) -> Result<Vec<Frame>, ServiceError>;
}
