use std::f64::consts::TAU;

use crate::core::{Lifecycle, Phase, PhaseCell};
use crate::level::LevelError;
use crate::scene::{NodeId, SceneNode, SceneTree};
use crate::time::SharedClock;

use super::number_prop;

/// Rotating platform.
///
/// The angle is a pure function of clock time, not an accumulation of
/// per-tick deltas: pausing the clock freezes the platform exactly and
/// resuming continues from the same angle.
#[derive(Debug)]
pub struct Spinner {
    name: String,
    node: NodeId,
    /// Radians per second; the sign is the direction.
    speed: f64,
    initial_phase: f64,
    clock: SharedClock,
    phase: PhaseCell,
    /// Updates applied during the current run.
    frames: u64,
}

impl Spinner {
    pub fn new(
        name: impl Into<String>,
        node: NodeId,
        speed: f64,
        initial_phase: f64,
        clock: SharedClock,
    ) -> Self {
        Self {
            name: name.into(),
            node,
            speed,
            initial_phase,
            clock,
            phase: PhaseCell::new(),
            frames: 0,
        }
    }

    /// `speed` (rad/s, default 0) and `phase` (rad, defaults to the node's
    /// yaw), as `(speed, phase)`.
    pub(crate) fn read_config(name: &str, node: &SceneNode) -> Result<(f64, f64), LevelError> {
        let speed = number_prop(name, node, "speed")?.unwrap_or(0.0);
        let initial_phase = number_prop(name, node, "phase")?.unwrap_or(node.transform.yaw as f64);
        if !speed.is_finite() || !initial_phase.is_finite() {
            return Err(LevelError::InvalidMechanic {
                name: name.to_string(),
                reason: "speed and phase must be finite".into(),
            });
        }
        Ok((speed, initial_phase))
    }

    pub(crate) fn from_node(
        name: String,
        id: NodeId,
        node: &SceneNode,
        clock: SharedClock,
    ) -> Result<Self, LevelError> {
        let (speed, initial_phase) = Self::read_config(&name, node)?;
        Ok(Self::new(name, id, speed, initial_phase, clock))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Angle in `[0, 2π)` after `elapsed_secs` of clock time.
    pub fn angle_at(&self, elapsed_secs: f64) -> f64 {
        (self.initial_phase + elapsed_secs * self.speed).rem_euclid(TAU)
    }

    pub fn angle(&self) -> f64 {
        self.angle_at(self.clock.elapsed_secs())
    }

    /// Writes the current angle to the platform node. Detached while stopped.
    pub fn update(&mut self, scene: &mut SceneTree) {
        if !self.phase.is_started() {
            return;
        }
        let angle = self.angle();
        if let Some(node) = scene.get_mut(self.node) {
            node.transform.yaw = angle as f32;
        }
        self.frames += 1;
    }
}

impl Lifecycle for Spinner {
    fn phase(&self) -> Phase {
        self.phase.get()
    }

    fn initialize(&mut self) {
        if self.phase.initialize() {
            log::debug!("spinner {:?} initialized ({} rad/s)", self.name, self.speed);
        }
    }

    fn start(&mut self) {
        self.phase.start();
        self.frames = 0;
    }

    fn stop(&mut self) {
        self.phase.stop();
    }

    fn dispose(mut self) {
        self.phase.dispose();
        log::debug!("spinner {:?} disposed", self.name);
    }
}
