//! State-manager function catalog
//!
//! The schema provider publishes the set of functions a state-manager
//! binding may reference, each with its named-and-typed inputs and its
//! output type. The catalog is fetched once per session and indexed by
//! function name at load time, so per-binding lookups are constant-time
//! instead of a linear scan over the wire list.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::state_manager::StateManagerBinding;
use crate::tuple;

/// Catalog entry for one state-manager function
///
/// `inputs` is an ordered list of single-entry maps `{argName: typeName}`,
/// exactly as the service derives them from the function signatures; the
/// declared arity of the function is the length of that list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateManagerSchema {
    pub function_name: String,
    pub inputs: Vec<BTreeMap<String, String>>,
    pub output_type: String,
}

impl StateManagerSchema {
    /// Declared input count
    pub fn arity(&self) -> usize {
        self.inputs.len()
    }
}

/// Wire shape of the catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub state_managers: Vec<StateManagerSchema>,
}

/// Binding validation failures
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("unknown state manager function '{name}'")]
    UnknownFunction { name: String },

    #[error("function '{function}' takes {expected} argument(s), binding supplies {found}")]
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },
}

/// The loaded catalog, indexed by function name
///
/// # Example
/// ```
/// use nbody_studio_core::schema::{SchemaCatalog, StateManagerSchema};
/// use std::collections::BTreeMap;
///
/// let entry = StateManagerSchema {
///     function_name: "propagate_mass".to_string(),
///     inputs: vec![BTreeMap::from([("mass".to_string(), "float".to_string())])],
///     output_type: "float".to_string(),
/// };
/// let catalog = SchemaCatalog::from_entries(vec![entry]);
/// assert_eq!(catalog.arity_of("propagate_mass"), Some(1));
/// assert!(catalog.get("no_such_function").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    by_name: HashMap<String, StateManagerSchema>,
    order: Vec<String>,
}

impl SchemaCatalog {
    /// An empty catalog (nothing fetched yet)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index catalog entries by function name
    ///
    /// A duplicated function name keeps the last entry, mirroring how
    /// the service would shadow a redefined function.
    pub fn from_entries(entries: Vec<StateManagerSchema>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut order = Vec::with_capacity(entries.len());
        for entry in entries {
            if !by_name.contains_key(&entry.function_name) {
                order.push(entry.function_name.clone());
            }
            by_name.insert(entry.function_name.clone(), entry);
        }
        Self { by_name, order }
    }

    /// Look up one function's schema
    pub fn get(&self, name: &str) -> Option<&StateManagerSchema> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Declared arity of a function, if known
    pub fn arity_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).map(StateManagerSchema::arity)
    }

    /// Function names in catalog publication order
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Validate one binding against the catalog
    ///
    /// The referenced function must exist and the decoded argument
    /// count must match its declared arity. Called at save time; edits
    /// in progress are never blocked by this check.
    pub fn validate_binding(&self, binding: &StateManagerBinding) -> Result<(), SchemaError> {
        let schema = self
            .get(&binding.function)
            .ok_or_else(|| SchemaError::UnknownFunction {
                name: binding.function.clone(),
            })?;

        let found = tuple::decode(&binding.consumed).len();
        if found != schema.arity() {
            return Err(SchemaError::ArityMismatch {
                function: binding.function.clone(),
                expected: schema.arity(),
                found,
            });
        }
        Ok(())
    }
}
