//! Edit controller
//!
//! Orchestrates user edits against the profile and simulation models,
//! keeps simulations in sync when a profile's agent set changes, and
//! issues the asynchronous service operations (load, save, run).
//!
//! All session state lives in one explicit [`Session`] store owned by
//! the controller; there are no ambient globals. Edits arrive as
//! [`Command`] messages and are applied by the pure model functions,
//! which republish whole new values, so a stale closure over an old
//! value can never corrupt a newer one.
//!
//! # Concurrency discipline
//!
//! Model operations are synchronous and pure; only service calls
//! suspend. Each data-fetching operation is scoped to the selection
//! that triggered it via a [`SelectionToken`]: when the selection
//! changes before the response is applied, the response is discarded
//! and must not mutate state. Responses that do land apply
//! last-response-wins; there is no merging with concurrent local
//! edits. Service failures are logged and leave prior state unchanged.

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use std::collections::HashMap;

use crate::models::agent::Agent;
use crate::models::frame::{Frame, Snapshot};
use crate::models::profile::{Profile, ProfileSet};
use crate::models::state_manager::StateManagerBinding;
use crate::models::simulation::{Simulation, SimulationSet, StateField};
use crate::models::ModelError;
use crate::reshape::{self, Trajectories};
use crate::schema::{SchemaCatalog, SchemaError};
use crate::service::{SchemaProvider, ServiceError, SimulationService};

/// Failures surfaced by controller operations
///
/// Validation variants block the triggering action locally, before any
/// request is issued. Service variants are logged at the call site and
/// never leave partial writes behind. Nothing here is fatal: every
/// failure is recoverable by re-editing or re-selecting.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no profile selected")]
    NoProfileSelected,

    #[error("unknown profile '{0}'")]
    UnknownProfile(String),

    #[error("profile name must not be empty")]
    EmptyProfileName,

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Selection states of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    ProfileSelected,
    ProfileAndSimulationSelected,
}

/// An edit, expressed as an explicit message
///
/// Index-based addressing matches the single-writer in-memory session:
/// agents and state managers are identified by list position.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Append a fresh agent with a derived, collision-free id
    AddAgent,
    /// Rename the agent at `agent_index`
    SetAgentId { agent_index: usize, id: String },
    /// Append a blank state-manager binding to one agent's pipeline
    AddStateManager { agent_index: usize },
    /// Bind a binding to a catalog function
    SetFunction {
        agent_index: usize,
        manager_index: usize,
        function: String,
    },
    /// Replace one positional argument of a binding's consumed tuple
    SetConsumedPart {
        agent_index: usize,
        manager_index: usize,
        part_index: usize,
        value: String,
    },
    /// Set a binding's output name
    SetProduced {
        agent_index: usize,
        manager_index: usize,
        value: String,
    },
    /// Move the selected profile to a new id (local only; see
    /// [`EditController::rename_and_save`] for the persisted form)
    RenameProfile { new_id: String },
    /// Create a simulation with default per-agent initial states
    AddSimulation,
    /// Select one of the current profile's simulations
    SelectSimulation { id: String },
    /// Set one scalar of one agent's initial state in one simulation
    SetInitialState {
        simulation_id: String,
        agent_id: String,
        field: StateField,
        value: f64,
    },
}

/// Scopes an in-flight fetch to the selection that triggered it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken(u64);

/// Whether a resolved response was applied or discarded as stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Discarded,
}

/// The session-scoped store of everything the controller edits
#[derive(Debug, Clone, Default)]
pub struct Session {
    profiles: ProfileSet,
    selected_profile: Option<String>,
    simulations: SimulationSet,
    selected_simulation: Option<String>,
    schema: SchemaCatalog,
    trajectories: Option<Trajectories>,
    initial_frame: Option<Snapshot>,
}

impl Session {
    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    pub fn selected_profile(&self) -> Option<&str> {
        self.selected_profile.as_deref()
    }

    /// Simulations of the selected profile
    pub fn simulations(&self) -> &SimulationSet {
        &self.simulations
    }

    pub fn selected_simulation(&self) -> Option<&str> {
        self.selected_simulation.as_deref()
    }

    pub fn schema(&self) -> &SchemaCatalog {
        &self.schema
    }

    /// Plot series published by the most recent successful run
    pub fn trajectories(&self) -> Option<&Trajectories> {
        self.trajectories.as_ref()
    }

    /// Snapshot of the first frame of the most recent run
    pub fn initial_frame(&self) -> Option<&Snapshot> {
        self.initial_frame.as_ref()
    }
}

/// Long-lived controller over one page session
pub struct EditController<S> {
    service: S,
    session: Session,
    epoch: u64,
}

impl<S> EditController<S> {
    /// Create a controller with an empty session
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: Session::default(),
            epoch: 0,
        }
    }

    /// Read access to the session store
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Current selection state
    pub fn state(&self) -> SelectionState {
        match (
            &self.session.selected_profile,
            &self.session.selected_simulation,
        ) {
            (None, _) => SelectionState::Idle,
            (Some(_), None) => SelectionState::ProfileSelected,
            (Some(_), Some(_)) => SelectionState::ProfileAndSimulationSelected,
        }
    }

    /// Token for the current selection, without changing it
    ///
    /// Captured before issuing a fetch whose response must die with the
    /// selection it was issued for.
    pub fn selection_token(&self) -> SelectionToken {
        SelectionToken(self.epoch)
    }

    /// Start a new selection, invalidating every in-flight fetch
    pub fn begin_selection(&mut self) -> SelectionToken {
        self.epoch += 1;
        SelectionToken(self.epoch)
    }

    fn is_current(&self, token: SelectionToken) -> bool {
        token.0 == self.epoch
    }

    /// Create and select a fresh, empty profile under a generated
    /// placeholder id
    ///
    /// Clears the simulation selection and replaces the simulation set
    /// with an empty one (a new profile has no stored simulations).
    pub fn select_new_profile(&mut self) -> String {
        self.begin_selection();
        let id = format!("Profile-{}", Uuid::new_v4());
        self.session.profiles = self.session.profiles.with_profile(&id, Profile::empty());
        self.session.selected_profile = Some(id.clone());
        self.session.simulations = SimulationSet::new();
        self.session.selected_simulation = None;
        id
    }

    /// Apply a resolved profile selection: the load acknowledgement and
    /// the sibling simulations fetched for `id`
    ///
    /// A stale token means the selection changed while the fetch was in
    /// flight; the response is discarded without touching state.
    pub fn apply_profile_selection(
        &mut self,
        token: SelectionToken,
        id: &str,
        simulations: HashMap<String, Simulation>,
    ) -> FetchOutcome {
        if !self.is_current(token) {
            debug!(profile = id, "discarding stale profile selection response");
            return FetchOutcome::Discarded;
        }
        self.session.selected_profile = Some(id.to_string());
        self.session.simulations = SimulationSet::from_fetched(simulations);
        self.session.selected_simulation = None;
        FetchOutcome::Applied
    }

    /// Apply resolved run results for one simulation
    ///
    /// Publishes freshly reshaped trajectories (replacing, never
    /// appending to, the previous ones), records the run's first-frame
    /// snapshot, and stores the frames on the simulation. Stale tokens
    /// discard the response.
    pub fn apply_run_results(
        &mut self,
        token: SelectionToken,
        simulation_id: &str,
        frames: Vec<Frame>,
    ) -> Result<FetchOutcome, ControllerError> {
        if !self.is_current(token) {
            debug!(
                simulation = simulation_id,
                "discarding stale run response"
            );
            return Ok(FetchOutcome::Discarded);
        }

        // Validate the simulation address first so a bad response
        // cannot leave a half-applied update behind
        let simulations = self
            .session
            .simulations
            .with_run_data(simulation_id, frames.clone())?;

        self.session.trajectories = Some(reshape::reshape(&frames));
        self.session.initial_frame = frames.first().map(|frame| frame.snapshot().clone());
        self.session.simulations = simulations;
        info!(simulation = simulation_id, "published run trajectories");
        Ok(FetchOutcome::Applied)
    }

    /// Apply one edit command to the session
    ///
    /// Every successful agent-set mutation is followed by a simulation
    /// sync, so each simulation holds an initial state for every
    /// currently-known agent before it can ever be run.
    pub fn dispatch(&mut self, command: Command) -> Result<(), ControllerError> {
        match command {
            Command::AddAgent => {
                let (id, profile) = self.selected_profile_value()?;
                let (updated, _) = profile.with_new_agent();
                self.commit_profile(&id, updated, true);
            }
            Command::SetAgentId { agent_index, id } => {
                let (profile_id, profile) = self.selected_profile_value()?;
                let agent = agent_at(&profile, agent_index)?.with_id(&id);
                let updated = profile.with_agent_replaced(agent_index, agent)?;
                self.commit_profile(&profile_id, updated, true);
            }
            Command::AddStateManager { agent_index } => {
                let (profile_id, profile) = self.selected_profile_value()?;
                let agent = agent_at(&profile, agent_index)?.with_new_state_manager();
                let updated = profile.with_agent_replaced(agent_index, agent)?;
                self.commit_profile(&profile_id, updated, false);
            }
            Command::SetFunction {
                agent_index,
                manager_index,
                function,
            } => {
                self.update_binding(agent_index, manager_index, |binding| {
                    binding.with_function(&function)
                })?;
            }
            Command::SetConsumedPart {
                agent_index,
                manager_index,
                part_index,
                value,
            } => {
                self.update_binding(agent_index, manager_index, |binding| {
                    binding.with_consumed_part(part_index, &value)
                })?;
            }
            Command::SetProduced {
                agent_index,
                manager_index,
                value,
            } => {
                self.update_binding(agent_index, manager_index, |binding| {
                    binding.with_produced(&value)
                })?;
            }
            Command::RenameProfile { new_id } => {
                self.rename_selected(&new_id)?;
            }
            Command::AddSimulation => {
                let (_, profile) = self.selected_profile_value()?;
                let (simulations, _) = self.session.simulations.with_new_simulation(&profile);
                self.session.simulations = simulations;
            }
            Command::SelectSimulation { id } => {
                if !self.session.simulations.contains(&id) {
                    return Err(ModelError::UnknownSimulation { id }.into());
                }
                self.session.selected_simulation = Some(id);
            }
            Command::SetInitialState {
                simulation_id,
                agent_id,
                field,
                value,
            } => {
                self.session.simulations = self.session.simulations.with_initial_state_field(
                    &simulation_id,
                    &agent_id,
                    field,
                    value,
                )?;
            }
        }
        Ok(())
    }

    fn selected_profile_value(&self) -> Result<(String, Profile), ControllerError> {
        let id = self
            .session
            .selected_profile
            .clone()
            .ok_or(ControllerError::NoProfileSelected)?;
        let profile = self
            .session
            .profiles
            .get(&id)
            .ok_or_else(|| ControllerError::UnknownProfile(id.clone()))?;
        Ok((id, Profile::clone(profile)))
    }

    /// Republish an edited profile; `agent_set_changed` triggers the
    /// simulation sync invariant
    fn commit_profile(&mut self, id: &str, profile: Profile, agent_set_changed: bool) {
        if agent_set_changed {
            self.session.simulations = self.session.simulations.synced_with(&profile);
        }
        self.session.profiles = self.session.profiles.with_profile(id, profile);
    }

    fn update_binding<F>(
        &mut self,
        agent_index: usize,
        manager_index: usize,
        edit: F,
    ) -> Result<(), ControllerError>
    where
        F: FnOnce(&StateManagerBinding) -> StateManagerBinding,
    {
        let (profile_id, profile) = self.selected_profile_value()?;
        let agent = agent_at(&profile, agent_index)?;
        let binding =
            agent
                .state_managers
                .get(manager_index)
                .ok_or(ModelError::StateManagerIndexOutOfRange {
                    index: manager_index,
                    len: agent.state_managers.len(),
                })?;
        let updated_agent = agent.with_state_manager_replaced(manager_index, edit(binding))?;
        let updated = profile.with_agent_replaced(agent_index, updated_agent)?;
        self.commit_profile(&profile_id, updated, false);
        Ok(())
    }

    fn rename_selected(&mut self, new_id: &str) -> Result<(), ControllerError> {
        if new_id.trim().is_empty() {
            return Err(ControllerError::EmptyProfileName);
        }
        let (old_id, _) = self.selected_profile_value()?;
        self.session.profiles = self.session.profiles.renamed(&old_id, new_id);
        self.session.selected_profile = Some(new_id.to_string());
        Ok(())
    }

    /// Validate the selected profile for saving
    ///
    /// The profile name must be non-empty, and when a schema catalog is
    /// loaded every binding must reference a known function with a
    /// matching argument count. With no catalog loaded (the fetch
    /// failed or never ran) binding validation is skipped rather than
    /// rejecting everything.
    fn validate_for_save(&self) -> Result<(String, Profile), ControllerError> {
        let (id, profile) = self.selected_profile_value()?;
        if id.trim().is_empty() {
            return Err(ControllerError::EmptyProfileName);
        }
        if !self.session.schema.is_empty() {
            for agent in &profile.agents {
                for binding in &agent.state_managers {
                    self.session.schema.validate_binding(binding)?;
                }
            }
        }
        Ok((id, profile))
    }
}

impl<S: SimulationService + SchemaProvider> EditController<S> {
    /// Fetch the state-manager catalog and index it by name
    pub async fn refresh_schema(&mut self) -> Result<(), ControllerError> {
        match self.service.fetch_catalog().await {
            Ok(catalog) => {
                self.session.schema = catalog;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch state manager catalog");
                Err(err.into())
            }
        }
    }

    /// Fetch all stored profiles into the session
    pub async fn refresh_profiles(&mut self) -> Result<(), ControllerError> {
        match self.service.fetch_profiles().await {
            Ok(profiles) => {
                self.session.profiles = ProfileSet::from_fetched(profiles);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch profiles");
                Err(err.into())
            }
        }
    }

    /// Select an existing profile
    ///
    /// Requests the server-side load and the profile's simulations; on
    /// success the selection moves to the profile and its fetched
    /// simulations, clearing any simulation selection. On failure the
    /// prior selection and state are kept.
    pub async fn select_profile(&mut self, id: &str) -> Result<FetchOutcome, ControllerError> {
        if !self.session.profiles.contains(id) {
            return Err(ControllerError::UnknownProfile(id.to_string()));
        }

        let token = self.begin_selection();

        if let Err(err) = self.service.load_profile(id).await {
            warn!(profile = id, error = %err, "profile load failed");
            return Err(err.into());
        }
        let simulations = match self.service.fetch_simulations(id).await {
            Ok(simulations) => simulations,
            Err(err) => {
                warn!(profile = id, error = %err, "fetching simulations failed");
                return Err(err.into());
            }
        };

        Ok(self.apply_profile_selection(token, id, simulations))
    }

    /// Persist the selected profile (full replace)
    ///
    /// Validation failures block the save before any request is
    /// issued; a service failure leaves all local state unchanged.
    pub async fn save_profile(&mut self) -> Result<(), ControllerError> {
        let (id, profile) = self.validate_for_save()?;
        if let Err(err) = self.service.save_profile(&id, &profile).await {
            warn!(profile = %id, error = %err, "saving profile failed");
            return Err(err.into());
        }
        Ok(())
    }

    /// Rename the selected profile and persist it under the new id
    ///
    /// The rename is applied locally first so the save goes out under
    /// the new key; if the service rejects the save, the whole profile
    /// collection and the selection are rolled back to their prior
    /// values.
    pub async fn rename_and_save(&mut self, new_id: &str) -> Result<(), ControllerError> {
        let before_profiles = self.session.profiles.clone();
        let before_selection = self.session.selected_profile.clone();

        self.rename_selected(new_id)?;
        let (id, profile) = self.validate_for_save()?;

        if let Err(err) = self.service.save_profile(&id, &profile).await {
            warn!(profile = %id, error = %err, "rename save rejected, rolling back");
            self.session.profiles = before_profiles;
            self.session.selected_profile = before_selection;
            return Err(err.into());
        }
        Ok(())
    }

    /// Run one simulation of the selected profile and publish its
    /// trajectories
    ///
    /// On failure the previously published trajectories are left
    /// untouched. A response resolving after the selection changed is
    /// discarded.
    pub async fn run_simulation(
        &mut self,
        simulation_id: &str,
    ) -> Result<FetchOutcome, ControllerError> {
        let profile_id = self
            .session
            .selected_profile
            .clone()
            .ok_or(ControllerError::NoProfileSelected)?;
        let simulation = self
            .session
            .simulations
            .get(simulation_id)
            .map(|sim| Simulation::clone(sim))
            .ok_or_else(|| ModelError::UnknownSimulation {
                id: simulation_id.to_string(),
            })?;

        let token = self.selection_token();
        let frames = match self
            .service
            .run_simulation(&profile_id, simulation_id, &simulation)
            .await
        {
            Ok(frames) => frames,
            Err(err) => {
                warn!(
                    profile = %profile_id,
                    simulation = simulation_id,
                    error = %err,
                    "simulation run failed"
                );
                return Err(err.into());
            }
        };

        self.apply_run_results(token, simulation_id, frames)
    }
}

fn agent_at(profile: &Profile, index: usize) -> Result<&Agent, ModelError> {
    profile
        .agents
        .get(index)
        .ok_or(ModelError::AgentIndexOutOfRange {
            index,
            len: profile.agents.len(),
        })
}
