//! Simulation model
//!
//! A simulation is a named run configuration belonging to one profile:
//! per-agent initial states plus the frame history returned by the most
//! recent run. Simulations live in a [`SimulationSet`] keyed by
//! simulation id.
//!
//! # Critical Invariants
//!
//! 1. After any profile agent-set change, every simulation holds an
//!    initial state for every currently-known agent (enforced by
//!    [`SimulationSet::synced_with`], which the edit layer runs after
//!    each successful agent-set mutation)
//! 2. Sync is additive-only: an initial state is never removed, even
//!    when its agent was deleted from the profile
//! 3. All operations are copy-on-write: untouched simulations keep
//!    their `Arc` pointer identity

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::frame::Frame;
use crate::models::profile::Profile;
use crate::models::vector::Vector3;
use crate::models::ModelError;

/// Initial position/velocity/mass for one agent in one simulation
///
/// # Example
/// ```
/// use nbody_studio_core::InitialAgentState;
///
/// let state = InitialAgentState::default();
/// assert_eq!(state.mass, 1.0);
/// assert_eq!(state.position.x, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialAgentState {
    pub position: Vector3,
    pub velocity: Vector3,
    /// Strictly positive; enforced at the mutation point
    pub mass: f64,
}

impl Default for InitialAgentState {
    /// Zero position and velocity, unit mass
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            velocity: Vector3::ZERO,
            mass: 1.0,
        }
    }
}

/// One editable scalar of an [`InitialAgentState`]
///
/// The explicit-enum form of the field paths the editing surface binds
/// its inputs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateField {
    PositionX,
    PositionY,
    PositionZ,
    VelocityX,
    VelocityY,
    VelocityZ,
    Mass,
}

impl InitialAgentState {
    /// Return a copy with exactly one scalar field replaced
    ///
    /// Setting a non-positive mass is rejected; every other scalar is
    /// unconstrained.
    pub fn with_field(&self, field: StateField, value: f64) -> Result<Self, ModelError> {
        let mut next = *self;
        match field {
            StateField::PositionX => next.position.x = value,
            StateField::PositionY => next.position.y = value,
            StateField::PositionZ => next.position.z = value,
            StateField::VelocityX => next.velocity.x = value,
            StateField::VelocityY => next.velocity.y = value,
            StateField::VelocityZ => next.velocity.z = value,
            StateField::Mass => {
                if value <= 0.0 {
                    return Err(ModelError::NonPositiveMass { value });
                }
                next.mass = value;
            }
        }
        Ok(next)
    }
}

/// A named run configuration plus its frame history
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Simulation {
    /// Initial state per agent id; a superset of the owning profile's
    /// agent ids once synced
    pub initial_states: HashMap<String, InitialAgentState>,
    /// Frames from the most recent run; replaced wholesale, never
    /// appended to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<Frame>,
}

impl Simulation {
    /// Build a simulation with one default initial state per agent of
    /// the given profile
    pub fn for_profile(profile: &Profile) -> Self {
        Self {
            initial_states: profile
                .agent_ids()
                .map(|id| (id.to_string(), InitialAgentState::default()))
                .collect(),
            data: Vec::new(),
        }
    }
}

/// The simulation collection of one profile, keyed by simulation id
///
/// Values are held behind `Arc`; operations clone only the simulations
/// they actually change, so unchanged entries keep pointer identity.
#[derive(Debug, Clone, Default)]
pub struct SimulationSet {
    simulations: HashMap<String, Arc<Simulation>>,
}

impl SimulationSet {
    /// An empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from freshly fetched simulation bodies
    pub fn from_fetched(simulations: HashMap<String, Simulation>) -> Self {
        Self {
            simulations: simulations
                .into_iter()
                .map(|(id, sim)| (id, Arc::new(sim)))
                .collect(),
        }
    }

    /// Look up a simulation by id
    pub fn get(&self, id: &str) -> Option<&Arc<Simulation>> {
        self.simulations.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.simulations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    /// Ids of all simulations, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.simulations.keys().map(|id| id.as_str())
    }

    /// Return a copy holding one new simulation derived from `profile`
    ///
    /// The new simulation is keyed `Simulation {count + 1}`, bumped
    /// until fresh, and carries a default initial state for every
    /// current agent of the profile.
    pub fn with_new_simulation(&self, profile: &Profile) -> (Self, String) {
        let mut n = self.simulations.len() + 1;
        let mut id = format!("Simulation {}", n);
        while self.simulations.contains_key(&id) {
            n += 1;
            id = format!("Simulation {}", n);
        }

        let mut simulations = self.simulations.clone();
        simulations.insert(id.clone(), Arc::new(Simulation::for_profile(profile)));
        (Self { simulations }, id)
    }

    /// Insert a default initial state for every profile agent missing
    /// from a simulation
    ///
    /// This is the consistency guarantee of the model: a simulation
    /// always has an initial state for every currently-known agent of
    /// its profile before it is ever run. Existing keys are never
    /// removed or overwritten; simulations already in sync keep their
    /// `Arc` identity.
    pub fn synced_with(&self, profile: &Profile) -> Self {
        let simulations = self
            .simulations
            .iter()
            .map(|(id, sim)| {
                let missing: Vec<&str> = profile
                    .agent_ids()
                    .filter(|agent_id| !sim.initial_states.contains_key(*agent_id))
                    .collect();
                if missing.is_empty() {
                    return (id.clone(), Arc::clone(sim));
                }

                let mut synced = Simulation::clone(sim);
                for agent_id in missing {
                    synced
                        .initial_states
                        .insert(agent_id.to_string(), InitialAgentState::default());
                }
                (id.clone(), Arc::new(synced))
            })
            .collect();
        Self { simulations }
    }

    /// Deep copy-on-write update of exactly one scalar field
    ///
    /// Only the addressed simulation is reallocated; every other entry
    /// keeps its `Arc` identity.
    pub fn with_initial_state_field(
        &self,
        sim_id: &str,
        agent_id: &str,
        field: StateField,
        value: f64,
    ) -> Result<Self, ModelError> {
        let sim = self
            .simulations
            .get(sim_id)
            .ok_or_else(|| ModelError::UnknownSimulation {
                id: sim_id.to_string(),
            })?;
        let state = sim
            .initial_states
            .get(agent_id)
            .ok_or_else(|| ModelError::UnknownAgent {
                id: agent_id.to_string(),
            })?;

        let updated_state = state.with_field(field, value)?;
        let mut updated = Simulation::clone(sim);
        updated
            .initial_states
            .insert(agent_id.to_string(), updated_state);

        let mut simulations = self.simulations.clone();
        simulations.insert(sim_id.to_string(), Arc::new(updated));
        Ok(Self { simulations })
    }

    /// Replace one simulation's frame history with fresh run results
    pub fn with_run_data(&self, sim_id: &str, frames: Vec<Frame>) -> Result<Self, ModelError> {
        let sim = self
            .simulations
            .get(sim_id)
            .ok_or_else(|| ModelError::UnknownSimulation {
                id: sim_id.to_string(),
            })?;

        let mut updated = Simulation::clone(sim);
        updated.data = frames;

        let mut simulations = self.simulations.clone();
        simulations.insert(sim_id.to_string(), Arc::new(updated));
        Ok(Self { simulations })
    }
}
