//! HTTP client for the simulation service
//!
//! One `reqwest` client implements both boundary traits; the paths
//! mirror the service's REST surface. No retry, no backoff: a failed
//! call surfaces as a [`ServiceError`] and the user retries manually.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::models::frame::Frame;
use crate::models::profile::Profile;
use crate::models::simulation::Simulation;
use crate::schema::{CatalogResponse, SchemaCatalog};
use crate::service::{SchemaProvider, ServiceError, SimulationService};

/// Connection settings for the simulation service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL of the service, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    /// The development server the service runs on locally
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// `reqwest`-backed implementation of both service traits
pub struct HttpSimulationService {
    client: Client,
    base_url: String,
}

impl HttpSimulationService {
    /// Build a client from connection settings
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body
    ///
    /// Body decoding goes through `serde_json` directly so that a shape
    /// mismatch is reported as [`ServiceError::MalformedResponse`], not
    /// as a transport failure.
    async fn request_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let body = self.request_text(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request, check the status, and ignore the body
    async fn request_ok(&self, request: RequestBuilder) -> Result<(), ServiceError> {
        self.request_text(request).await.map(|_| ())
    }

    async fn request_text(&self, request: RequestBuilder) -> Result<String, ServiceError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SchemaProvider for HttpSimulationService {
    async fn fetch_catalog(&self) -> Result<SchemaCatalog, ServiceError> {
        let response: CatalogResponse = self
            .request_json(self.client.get(self.url("/schema/statemanagers")))
            .await?;
        Ok(SchemaCatalog::from_entries(response.state_managers))
    }
}

#[async_trait]
impl SimulationService for HttpSimulationService {
    async fn fetch_profiles(&self) -> Result<HashMap<String, Profile>, ServiceError> {
        self.request_json(self.client.get(self.url("/profiles")))
            .await
    }

    async fn save_profile(&self, id: &str, profile: &Profile) -> Result<(), ServiceError> {
        self.request_ok(
            self.client
                .put(self.url(&format!("/profile/{}", id)))
                .json(profile),
        )
        .await
    }

    async fn load_profile(&self, id: &str) -> Result<(), ServiceError> {
        self.request_ok(self.client.post(self.url(&format!("/profile/{}/load", id))))
            .await
    }

    async fn fetch_simulations(
        &self,
        profile_id: &str,
    ) -> Result<HashMap<String, Simulation>, ServiceError> {
        self.request_json(
            self.client
                .get(self.url(&format!("/profile/{}/simulations", profile_id))),
        )
        .await
    }

    async fn run_simulation(
        &self,
        profile_id: &str,
        simulation_id: &str,
        simulation: &Simulation,
    ) -> Result<Vec<Frame>, ServiceError> {
        self.request_json(
            self.client
                .put(self.url(&format!(
                    "/profile/{}/simulation/{}",
                    profile_id, simulation_id
                )))
                .json(simulation),
        )
        .await
    }
}
