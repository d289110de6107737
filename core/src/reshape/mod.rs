//! Result reshaper
//!
//! Converts the time-ordered frame sequence a run returns into
//! per-agent coordinate series suitable for 3D trajectory plotting:
//! one series set for position, one for velocity.
//!
//! Frames are trusted to arrive in chronological order; this component
//! enforces no ordering of its own. Output is always built from scratch
//! so a re-run fully overwrites previously plotted data instead of
//! accumulating onto it.

use std::collections::BTreeMap;

use crate::models::frame::Frame;

/// Growing coordinate sequences for one agent
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinateSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

/// Per-agent coordinate series for one physical quantity
///
/// Keyed by agent id; `BTreeMap` keeps iteration deterministic for the
/// rendering surface.
pub type PlotSeries = BTreeMap<String, CoordinateSeries>;

/// The two derived series sets a run produces
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Trajectories {
    pub position: PlotSeries,
    pub velocity: PlotSeries,
}

/// Reshape a frame sequence into position and velocity plot series
///
/// For each frame in input order, every agent entry (the reserved
/// `"time"`/`"timeStep"` keys are metadata and skipped) appends its
/// position components to that agent's position series and its velocity
/// components to the velocity series. A series is lazily created on
/// first sight of an agent id, so an agent absent from a frame simply
/// advances no index for that frame. Series lengths are therefore not
/// guaranteed equal across agents with partial data, and consumers must
/// not assume frame-aligned indices between agents.
///
/// # Example
/// ```
/// use nbody_studio_core::models::frame::{Frame, Snapshot, SnapshotEntry, AgentFrameState};
/// use nbody_studio_core::{reshape, Vector3};
/// use std::collections::BTreeMap;
///
/// let mut snapshot = Snapshot::new();
/// snapshot.insert("A1".to_string(), SnapshotEntry::Agent(AgentFrameState {
///     position: Vector3::new(1.0, 2.0, 3.0),
///     velocity: Vector3::ZERO,
///     scalars: BTreeMap::new(),
/// }));
/// let series = reshape::reshape(&[Frame::new(0.0, 1.0, snapshot)]);
/// assert_eq!(series.position["A1"].x, vec![1.0]);
/// ```
pub fn reshape(frames: &[Frame]) -> Trajectories {
    let mut trajectories = Trajectories::default();

    for frame in frames {
        for (agent_id, state) in frame.agent_states() {
            let position = trajectories
                .position
                .entry(agent_id.to_string())
                .or_default();
            position.x.push(state.position.x);
            position.y.push(state.position.y);
            position.z.push(state.position.z);

            let velocity = trajectories
                .velocity
                .entry(agent_id.to_string())
                .or_default();
            velocity.x.push(state.velocity.x);
            velocity.y.push(state.velocity.y);
            velocity.z.push(state.velocity.z);
        }
    }

    trajectories
}
