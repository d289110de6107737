//! Agent model
//!
//! An agent is one simulated body. It owns an ordered pipeline of
//! state-manager bindings; the sequence order is the evaluation order
//! and is always preserved by edit operations.

use serde::{Deserialize, Serialize};

use crate::models::state_manager::StateManagerBinding;
use crate::models::ModelError;

/// A simulated body and its state-manager pipeline
///
/// # Example
/// ```
/// use nbody_studio_core::Agent;
///
/// let agent = Agent::new("Body1");
/// let agent = agent.with_new_state_manager();
/// assert_eq!(agent.state_managers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Identifier, unique within the owning profile
    pub id: String,
    /// Evaluation-ordered state-manager pipeline
    pub state_managers: Vec<StateManagerBinding>,
}

impl Agent {
    /// Create an agent with an empty pipeline
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            state_managers: Vec::new(),
        }
    }

    /// Return a copy with a blank binding appended to the pipeline
    pub fn with_new_state_manager(&self) -> Self {
        let mut state_managers = self.state_managers.clone();
        state_managers.push(StateManagerBinding::empty());
        Self {
            id: self.id.clone(),
            state_managers,
        }
    }

    /// Return a copy with the binding at `index` replaced
    ///
    /// Bindings are addressed by pipeline position; reordering is not
    /// supported.
    pub fn with_state_manager_replaced(
        &self,
        index: usize,
        binding: StateManagerBinding,
    ) -> Result<Self, ModelError> {
        if index >= self.state_managers.len() {
            return Err(ModelError::StateManagerIndexOutOfRange {
                index,
                len: self.state_managers.len(),
            });
        }
        let mut state_managers = self.state_managers.clone();
        state_managers[index] = binding;
        Ok(Self {
            id: self.id.clone(),
            state_managers,
        })
    }

    /// Return a copy carrying a different id
    pub fn with_id(&self, id: &str) -> Self {
        Self {
            id: id.to_string(),
            state_managers: self.state_managers.clone(),
        }
    }
}
