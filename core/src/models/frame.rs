//! Frame wire model
//!
//! A frame is one timestep of simulation output. On the wire it is a
//! 3-element array `[startTime, endTime, snapshot]`. The snapshot maps
//! agent ids to their propagated state, and additionally carries the
//! two reserved metadata keys `"time"` and `"timeStep"` as plain
//! numbers. The reserved keys are not agents and must be skipped when
//! reshaping frames into plot series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::vector::Vector3;

/// Snapshot keys that are metadata, not agents
pub const RESERVED_KEYS: [&str; 2] = ["time", "timeStep"];

/// One agent's state within a frame snapshot
///
/// Position and velocity are required for plotting; any further numeric
/// scalars the service propagates alongside them (mass, per-agent time,
/// per-agent timeStep) are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFrameState {
    pub position: Vector3,
    pub velocity: Vector3,
    /// Remaining numeric scalar fields of the agent's state
    #[serde(flatten)]
    pub scalars: BTreeMap<String, f64>,
}

/// One entry of a frame snapshot: an agent state or a reserved-key scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotEntry {
    /// Value of a reserved metadata key (`"time"` / `"timeStep"`)
    Scalar(f64),
    /// State of one agent
    Agent(AgentFrameState),
}

/// A frame snapshot: agent ids and reserved keys to their values
pub type Snapshot = BTreeMap<String, SnapshotEntry>;

/// One timestep of simulation output
///
/// Serialized as the wire tuple `[t_start, t_end, snapshot]`.
///
/// # Example
/// ```
/// use nbody_studio_core::Frame;
///
/// let json = r#"[0.0, 1.0, {"time": 0.5, "A1":
///     {"position": {"x": 1.0, "y": 2.0, "z": 3.0},
///      "velocity": {"x": 0.0, "y": 0.0, "z": 0.0}}}]"#;
/// let frame: Frame = serde_json::from_str(json).unwrap();
/// assert_eq!(frame.t_start(), 0.0);
/// assert_eq!(frame.agent_states().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame(f64, f64, Snapshot);

impl Frame {
    /// Build a frame from its parts
    pub fn new(t_start: f64, t_end: f64, snapshot: Snapshot) -> Self {
        Self(t_start, t_end, snapshot)
    }

    /// Start of the time range this frame covers
    pub fn t_start(&self) -> f64 {
        self.0
    }

    /// End of the time range this frame covers
    pub fn t_end(&self) -> f64 {
        self.1
    }

    /// The full snapshot, reserved keys included
    pub fn snapshot(&self) -> &Snapshot {
        &self.2
    }

    /// Agent entries of the snapshot, in key order
    ///
    /// Skips the reserved metadata keys and any entry that is not an
    /// agent state object.
    pub fn agent_states(&self) -> impl Iterator<Item = (&str, &AgentFrameState)> {
        self.2.iter().filter_map(|(id, entry)| {
            if RESERVED_KEYS.contains(&id.as_str()) {
                return None;
            }
            match entry {
                SnapshotEntry::Agent(state) => Some((id.as_str(), state)),
                SnapshotEntry::Scalar(_) => None,
            }
        })
    }
}
