//! Profile model
//!
//! A profile is a named, reusable configuration of agents and their
//! state-manager pipelines. Profiles live in a [`ProfileSet`] keyed by
//! profile id; the id is the collection key (and the URL path segment
//! on the wire), not a field of the profile body.
//!
//! # Critical Invariants
//!
//! 1. Agent ids are unique within a profile (derived ids are
//!    disambiguated on creation)
//! 2. Agent order is significant and preserved by every operation
//! 3. All operations are pure: they return new values and never mutate
//!    a profile referenced elsewhere

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::agent::Agent;
use crate::models::ModelError;

/// One profile: an ordered collection of agents
///
/// # Example
/// ```
/// use nbody_studio_core::Profile;
///
/// let profile = Profile::empty();
/// let (profile, id) = profile.with_new_agent();
/// assert_eq!(id, "Body1");
/// assert_eq!(profile.agents.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Ordered agent list; order is significant
    pub agents: Vec<Agent>,
}

impl Profile {
    /// A profile with no agents, as created by the "new profile" action
    pub fn empty() -> Self {
        Self { agents: Vec::new() }
    }

    /// Return a copy with a new agent appended
    ///
    /// The derived id is `Body{count + 1}`; if an agent with that id
    /// already exists the counter is bumped until the id is fresh, so
    /// generated ids never collide with user-chosen ones.
    pub fn with_new_agent(&self) -> (Self, String) {
        let mut n = self.agents.len() + 1;
        let mut id = format!("Body{}", n);
        while self.agents.iter().any(|agent| agent.id == id) {
            n += 1;
            id = format!("Body{}", n);
        }

        let mut agents = self.agents.clone();
        agents.push(Agent::new(&id));
        (Self { agents }, id)
    }

    /// Return a copy with the agent at `index` replaced
    ///
    /// Agents are addressed by list position, not by id; reordering is
    /// not supported.
    pub fn with_agent_replaced(&self, index: usize, agent: Agent) -> Result<Self, ModelError> {
        if index >= self.agents.len() {
            return Err(ModelError::AgentIndexOutOfRange {
                index,
                len: self.agents.len(),
            });
        }
        let mut agents = self.agents.clone();
        agents[index] = agent;
        Ok(Self { agents })
    }

    /// Ids of all agents, in list order
    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.agents.iter().map(|agent| agent.id.as_str())
    }
}

/// The profile collection, keyed by profile id
///
/// Values are held behind `Arc` so that operations which do not touch a
/// profile keep its pointer identity, making downstream change
/// detection a pointer comparison.
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    profiles: HashMap<String, Arc<Profile>>,
}

impl ProfileSet {
    /// An empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from freshly fetched profile bodies
    pub fn from_fetched(profiles: HashMap<String, Profile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|(id, profile)| (id, Arc::new(profile)))
                .collect(),
        }
    }

    /// Look up a profile by id
    pub fn get(&self, id: &str) -> Option<&Arc<Profile>> {
        self.profiles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Ids of all profiles, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(|id| id.as_str())
    }

    /// Return a copy with `profile` stored under `id`
    ///
    /// An existing profile under the same id is replaced.
    pub fn with_profile(&self, id: &str, profile: Profile) -> Self {
        let mut profiles = self.profiles.clone();
        profiles.insert(id.to_string(), Arc::new(profile));
        Self { profiles }
    }

    /// Rename a profile: delete `old_id`, insert the same value at `new_id`
    ///
    /// If `new_id` already exists it is silently overwritten
    /// (last-write-wins). If `old_id` is absent the collection is
    /// returned unchanged.
    pub fn renamed(&self, old_id: &str, new_id: &str) -> Self {
        let mut profiles = self.profiles.clone();
        if let Some(profile) = profiles.remove(old_id) {
            profiles.insert(new_id.to_string(), profile);
        }
        Self { profiles }
    }
}
