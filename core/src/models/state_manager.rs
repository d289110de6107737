//! State-manager binding model
//!
//! A state manager is a named function composed into an agent's update
//! pipeline. A binding records which function to call, the tuple literal
//! of arguments it consumes, and the name its result is produced under.

use serde::{Deserialize, Serialize};

use crate::tuple;

/// One state-manager invocation bound into an agent's pipeline
///
/// `consumed` holds the serialized tuple literal owned by the tuple
/// codec; the binding itself never interprets that text beyond the
/// positional helpers below.
///
/// # Example
/// ```
/// use nbody_studio_core::StateManagerBinding;
///
/// let binding = StateManagerBinding::empty()
///     .with_function("propagate_position")
///     .with_consumed_part(0, "prev!(timeStep)")
///     .with_consumed_part(1, "prev!(position)");
/// assert_eq!(binding.consumed, "(prev!(timeStep), prev!(position))");
/// assert_eq!(binding.consumed_part(5), "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateManagerBinding {
    /// Name of a function in the service's state-manager catalog
    pub function: String,
    /// Tuple literal of argument expressions, arity per the catalog
    pub consumed: String,
    /// Free-form output binding name
    pub produced: String,
}

impl StateManagerBinding {
    /// A fresh binding with every field blank, as created by the
    /// "add state manager" action
    pub fn empty() -> Self {
        Self {
            function: String::new(),
            consumed: String::new(),
            produced: String::new(),
        }
    }

    /// Positional argument getter, sparse-safe
    pub fn consumed_part(&self, index: usize) -> String {
        tuple::part(&self.consumed, index)
    }

    /// Return a copy with argument `index` replaced
    ///
    /// The whole `consumed` field is re-encoded atomically.
    pub fn with_consumed_part(&self, index: usize, value: &str) -> Self {
        Self {
            consumed: tuple::set_part(&self.consumed, index, value),
            ..self.clone()
        }
    }

    /// Return a copy bound to a different catalog function
    pub fn with_function(&self, function: &str) -> Self {
        Self {
            function: function.to_string(),
            ..self.clone()
        }
    }

    /// Return a copy with a different output binding name
    pub fn with_produced(&self, produced: &str) -> Self {
        Self {
            produced: produced.to_string(),
            ..self.clone()
        }
    }
}
