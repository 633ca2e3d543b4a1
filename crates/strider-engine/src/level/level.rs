use std::collections::BTreeMap;
use std::time::Duration;

use strider_format::Blueprint;

use crate::core::{Lifecycle, Phase, PhaseCell};
use crate::mechanics::{Mechanic, MechanicClockPolicy, MechanicId, Spinner, Teleporter};
use crate::scene::SceneTree;
use crate::time::SharedClock;

use super::{LevelError, LevelInfo, Missing};

/// Blueprint root kind every level must use.
pub const LEVEL_ROOT_KIND: &str = "Level";

/// A running instance of a level.
///
/// Owns its scene, its clock, and its mechanics. Mechanics are kept in
/// blueprint order; they start before the clock and stop after it.
#[derive(Debug)]
pub struct Level {
    info: LevelInfo,
    scene: SceneTree,
    clock: SharedClock,
    mechanics: BTreeMap<MechanicId, Mechanic>,
    phase: PhaseCell,
    runs: u32,
}

impl Level {
    /// Materializes `blueprint` and builds every mechanic it marks. Each
    /// mechanic is initialized but not started.
    pub fn build(
        info: LevelInfo,
        blueprint: &Blueprint,
        clock: SharedClock,
        policy: MechanicClockPolicy,
    ) -> Result<Self, LevelError> {
        check_root(&info.name, blueprint)?;

        let scene = SceneTree::from_blueprint(blueprint);
        let mut mechanics = BTreeMap::new();
        for (id, node) in scene.iter() {
            if let Some(mut mechanic) = Mechanic::from_node(id, node, &scene, &clock, policy)? {
                mechanic.initialize();
                mechanics.insert(MechanicId(mechanics.len() as u32), mechanic);
            }
        }

        log::info!(
            "built level {:?}: {} nodes, {} mechanics",
            info.name,
            scene.len(),
            mechanics.len()
        );

        Ok(Self { info, scene, clock, mechanics, phase: PhaseCell::new(), runs: 0 })
    }

    /// Runs every check [`build`](Self::build) makes on the blueprint
    /// without creating clocks or mechanics.
    pub fn validate(info: &LevelInfo, blueprint: &Blueprint) -> Result<(), LevelError> {
        check_root(&info.name, blueprint)?;
        let scene = SceneTree::from_blueprint(blueprint);
        for (id, node) in scene.iter() {
            Mechanic::check_node(id, node, &scene)?;
        }
        Ok(())
    }

    pub fn info(&self) -> &LevelInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn scene(&self) -> &SceneTree {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneTree {
        &mut self.scene
    }

    /// The run clock. Readers may hold a clone; only the level mutates it.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Completed `start` calls, restarts included.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn mechanics(&self) -> impl Iterator<Item = (MechanicId, &Mechanic)> {
        self.mechanics.iter().map(|(id, m)| (*id, m))
    }

    pub fn mechanic(&self, name: &str) -> Option<&Mechanic> {
        self.mechanics.values().find(|m| m.name() == name)
    }

    pub fn mechanic_mut(&mut self, name: &str) -> Option<&mut Mechanic> {
        self.mechanics.values_mut().find(|m| m.name() == name)
    }

    pub fn spinner(&self, name: &str) -> Option<&Spinner> {
        self.mechanic(name)?.as_spinner()
    }

    pub fn teleporter(&self, name: &str) -> Option<&Teleporter> {
        self.mechanic(name)?.as_teleporter()
    }

    /// Per-tick update; does nothing unless started.
    pub fn tick(&mut self) {
        if !self.phase.is_started() {
            return;
        }
        for mechanic in self.mechanics.values_mut() {
            mechanic.update(&mut self.scene);
        }
    }

    /// Fires `teleporter` on the scene node named `subject`.
    ///
    /// `Ok(false)` when the teleporter is not ready (stopped or cooling down).
    pub fn teleport(&mut self, teleporter: &str, subject: &str) -> Result<bool, LevelError> {
        let subject_id = self
            .scene
            .find(subject)
            .ok_or_else(|| LevelError::NotFound(Missing::Node(subject.to_string())))?;
        let teleporter = self
            .mechanics
            .values_mut()
            .find(|m| m.name() == teleporter)
            .and_then(Mechanic::as_teleporter_mut)
            .ok_or_else(|| LevelError::NotFound(Missing::Mechanic(teleporter.to_string())))?;
        Ok(teleporter.trigger_node(&mut self.scene, subject_id))
    }

    /// Freezes the run clock. Time-driven mechanics freeze with it.
    pub fn pause(&mut self) {
        if self.phase.is_started() {
            self.clock.stop();
        }
    }

    pub fn resume(&mut self) {
        if self.phase.is_started() {
            self.clock.start();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase.is_started() && !self.clock.is_running()
    }

    /// Stop then start. Per-run mechanic state is reset; the run clock is
    /// zeroed only when `reset_clock` is set.
    pub fn restart(&mut self, reset_clock: bool) {
        self.stop();
        if reset_clock {
            self.clock.reset();
        }
        self.start();
    }

    /// Resyncs reported time, e.g. after a checkpoint teleport.
    pub fn set_time_offset(&self, offset: Duration) {
        self.clock.set_offset(offset);
    }
}

fn check_root(level: &str, blueprint: &Blueprint) -> Result<(), LevelError> {
    if blueprint.root.kind == LEVEL_ROOT_KIND {
        return Ok(());
    }
    Err(LevelError::Corrupt {
        level: level.to_string(),
        reason: format!("root node is {:?}, expected {LEVEL_ROOT_KIND:?}", blueprint.root.kind),
    })
}

impl Lifecycle for Level {
    fn phase(&self) -> Phase {
        self.phase.get()
    }

    fn initialize(&mut self) {
        if self.phase.initialize() {
            for mechanic in self.mechanics.values_mut() {
                mechanic.initialize();
            }
            log::debug!("level {:?} initialized", self.info.name);
        }
    }

    fn start(&mut self) {
        self.phase.start();
        for mechanic in self.mechanics.values_mut() {
            mechanic.start();
        }
        self.clock.start();
        self.runs += 1;
        log::info!("level {:?} started (run {})", self.info.name, self.runs);
    }

    fn stop(&mut self) {
        if !self.phase.stop() {
            return;
        }
        self.clock.stop();
        for mechanic in self.mechanics.values_mut().rev() {
            mechanic.stop();
        }
        log::info!("level {:?} stopped at {:.3}s", self.info.name, self.clock.elapsed_secs());
    }

    fn dispose(mut self) {
        if self.phase.dispose() {
            self.clock.stop();
        }
        let count = self.mechanics.len();
        for (_, mechanic) in std::mem::take(&mut self.mechanics).into_iter().rev() {
            mechanic.dispose();
        }
        log::info!("level {:?} disposed ({count} mechanics)", self.info.name);
    }
}
