use std::time::Duration;

use crate::coords::{Positioned, Vec3};
use crate::core::{Lifecycle, Phase, PhaseCell};
use crate::level::{LevelError, Missing};
use crate::scene::{NodeId, SceneNode, SceneTree};
use crate::time::{OffsetClock, SharedClock};

use super::{MechanicClockPolicy, number_prop};

/// Sends a subject to a named anchor.
///
/// The anchor is borrowed from the scene and read at send time, so a moved
/// anchor is honored. The teleporter keeps no subject state; its only
/// run state is the private cooldown clock and a use counter.
#[derive(Debug)]
pub struct Teleporter {
    name: String,
    node: NodeId,
    destination: String,
    destination_node: NodeId,
    cooldown: Duration,
    /// Private clock; restarted on every `start` per `policy`.
    clock: SharedClock,
    level_clock: SharedClock,
    policy: MechanicClockPolicy,
    last_use: Option<Duration>,
    uses: u32,
    phase: PhaseCell,
}

impl Teleporter {
    /// Resolves `destination` in `scene`; a missing anchor fails construction.
    pub fn new(
        name: impl Into<String>,
        node: NodeId,
        destination: impl Into<String>,
        scene: &SceneTree,
        cooldown: Duration,
        level_clock: SharedClock,
        policy: MechanicClockPolicy,
    ) -> Result<Self, LevelError> {
        let name = name.into();
        let destination = destination.into();
        let Some(destination_node) = scene.find(&destination) else {
            return Err(LevelError::NotFound(Missing::Anchor {
                teleporter: name,
                anchor: destination,
            }));
        };
        let clock = OffsetClock::with_source(level_clock.source().clone(), Duration::ZERO).shared();

        Ok(Self {
            name,
            node,
            destination,
            destination_node,
            cooldown,
            clock,
            level_clock,
            policy,
            last_use: None,
            uses: 0,
            phase: PhaseCell::new(),
        })
    }

    /// `destination` (anchor name, must exist in `scene`) and `cooldown`
    /// (seconds, default 0), as `(destination, cooldown)`.
    pub(crate) fn read_config(
        name: &str,
        node: &SceneNode,
        scene: &SceneTree,
    ) -> Result<(String, Duration), LevelError> {
        let Some(destination) = node.prop_text("destination") else {
            return Err(LevelError::InvalidMechanic {
                name: name.to_string(),
                reason: "missing `destination` anchor".into(),
            });
        };
        if scene.find(destination).is_none() {
            return Err(LevelError::NotFound(Missing::Anchor {
                teleporter: name.to_string(),
                anchor: destination.to_string(),
            }));
        }
        let cooldown = number_prop(name, node, "cooldown")?.unwrap_or(0.0);
        if !cooldown.is_finite() || cooldown < 0.0 {
            return Err(LevelError::InvalidMechanic {
                name: name.to_string(),
                reason: format!("cooldown must be a non-negative number, got {cooldown}"),
            });
        }
        Ok((destination.to_string(), Duration::from_secs_f64(cooldown)))
    }

    pub(crate) fn from_node(
        name: String,
        id: NodeId,
        node: &SceneNode,
        scene: &SceneTree,
        level_clock: SharedClock,
        policy: MechanicClockPolicy,
    ) -> Result<Self, LevelError> {
        let (destination, cooldown) = Self::read_config(&name, node, scene)?;
        Self::new(name, id, destination, scene, cooldown, level_clock, policy)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Successful triggers during the current run.
    pub fn uses(&self) -> u32 {
        self.uses
    }

    /// Current world position of the destination anchor.
    pub fn destination_position(&self, scene: &SceneTree) -> Option<Vec3> {
        scene.world_position(self.destination_node)
    }

    /// Repositions `subject` at the anchor. Idempotent; ignores cooldown and
    /// lifecycle state. `false` only if the anchor is not in `scene`.
    pub fn send_to_destination<P: Positioned + ?Sized>(&self, scene: &SceneTree, subject: &mut P) -> bool {
        match self.destination_position(scene) {
            Some(position) => {
                subject.set_position(position);
                true
            }
            None => false,
        }
    }

    /// Started and out of cooldown.
    pub fn is_ready(&self) -> bool {
        if !self.phase.is_started() {
            return false;
        }
        match self.last_use {
            None => true,
            Some(at) => self.clock.elapsed().saturating_sub(at) >= self.cooldown,
        }
    }

    /// Teleports `subject` if ready and counts the use.
    pub fn trigger<P: Positioned + ?Sized>(&mut self, scene: &SceneTree, subject: &mut P) -> bool {
        if !self.is_ready() {
            return false;
        }
        let from = subject.position();
        if !self.send_to_destination(scene, subject) {
            return false;
        }
        log::trace!("teleporter {:?} moved subject {from:?} -> {:?}", self.name, subject.position());
        self.record_use();
        true
    }

    /// Like [`trigger`](Self::trigger) for a node of the same scene.
    pub fn trigger_node(&mut self, scene: &mut SceneTree, subject: NodeId) -> bool {
        if !self.is_ready() {
            return false;
        }
        let Some(position) = self.destination_position(scene) else {
            return false;
        };
        if !scene.set_world_position(subject, position) {
            return false;
        }
        self.record_use();
        true
    }

    fn record_use(&mut self) {
        self.uses += 1;
        self.last_use = Some(self.clock.elapsed());
        log::debug!("teleporter {:?} used ({} this run)", self.name, self.uses);
    }
}

impl Lifecycle for Teleporter {
    fn phase(&self) -> Phase {
        self.phase.get()
    }

    fn initialize(&mut self) {
        if self.phase.initialize() {
            log::debug!("teleporter {:?} → {:?} initialized", self.name, self.destination);
        }
    }

    fn start(&mut self) {
        self.phase.start();
        let offset = match self.policy {
            MechanicClockPolicy::ResetToZero => Duration::ZERO,
            MechanicClockPolicy::InheritLevelOffset => self.level_clock.elapsed(),
        };
        self.clock.reset();
        self.clock.set_offset(offset);
        self.clock.start();
        self.uses = 0;
        self.last_use = None;
    }

    fn stop(&mut self) {
        if self.phase.stop() {
            self.clock.stop();
        }
    }

    fn dispose(mut self) {
        if self.phase.dispose() {
            self.clock.stop();
        }
        log::debug!("teleporter {:?} disposed after {} uses", self.name, self.uses);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use strider_format::parse_str;

    use super::*;
    use crate::time::ManualTime;

    const SCENE: &str = r#"Level {
        Anchor "exit" { x: 10 y: 2 }
        Teleporter "gate" { destination: exit cooldown: 0.5 }
        Body "player" { x: 1 }
    }"#;

    struct Fixture {
        time: Arc<ManualTime>,
        level_clock: SharedClock,
        scene: SceneTree,
    }

    fn fixture() -> Fixture {
        let time = Arc::new(ManualTime::new());
        let level_clock = OffsetClock::with_source(time.clone(), Duration::ZERO).shared();
        let scene = SceneTree::from_blueprint(&parse_str(SCENE).unwrap());
        Fixture { time, level_clock, scene }
    }

    fn gate(f: &Fixture, policy: MechanicClockPolicy) -> Teleporter {
        let id = f.scene.find("gate").unwrap();
        let node = f.scene.get(id).unwrap();
        let mut t = Teleporter::from_node("gate".into(), id, node, &f.scene, f.level_clock.clone(), policy)
            .unwrap();
        t.initialize();
        t
    }

    #[test]
    fn send_is_idempotent() {
        let f = fixture();
        let t = gate(&f, MechanicClockPolicy::ResetToZero);
        let mut subject = Vec3::new(-3.0, 0.0, 0.0);
        assert!(t.send_to_destination(&f.scene, &mut subject));
        let first = subject;
        assert!(t.send_to_destination(&f.scene, &mut subject));
        assert_eq!(subject, first);
        assert_eq!(subject, Vec3::new(10.0, 2.0, 0.0));
    }

    #[test]
    fn moved_anchor_is_honored() {
        let mut f = fixture();
        let t = gate(&f, MechanicClockPolicy::ResetToZero);
        let exit = f.scene.find("exit").unwrap();
        f.scene.set_world_position(exit, Vec3::new(0.0, 5.0, 0.0));
        let mut subject = Vec3::ZERO;
        t.send_to_destination(&f.scene, &mut subject);
        assert_eq!(subject, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn missing_anchor_fails_construction() {
        let f = fixture();
        let err = Teleporter::new(
            "broken",
            f.scene.root(),
            "nowhere",
            &f.scene,
            Duration::ZERO,
            f.level_clock.clone(),
            MechanicClockPolicy::ResetToZero,
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::NotFound(Missing::Anchor { .. })));
    }

    fn config_of(src: &str) -> Result<(String, Duration), LevelError> {
        let scene = SceneTree::from_blueprint(&parse_str(src).unwrap());
        let node = scene.get(scene.find("t").unwrap()).unwrap();
        Teleporter::read_config("t", node, &scene)
    }

    #[test]
    fn config_from_node() {
        let (destination, cooldown) =
            config_of(r#"Level { Anchor "a" Teleporter "t" { destination: a cooldown: 1.5 } }"#).unwrap();
        assert_eq!(destination, "a");
        assert_eq!(cooldown, Duration::from_millis(1500));
    }

    #[test]
    fn non_numeric_cooldown_is_rejected() {
        let err = config_of(r#"Level { Anchor "a" Teleporter "t" { destination: a cooldown: soon } }"#)
            .unwrap_err();
        assert!(matches!(err, LevelError::InvalidMechanic { .. }), "{err}");
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let err = config_of(r#"Level { Anchor "a" Teleporter "t" { destination: a cooldown: -1 } }"#)
            .unwrap_err();
        assert!(matches!(err, LevelError::InvalidMechanic { .. }));
    }

    #[test]
    fn config_resolves_anchor() {
        let err = config_of(r#"Level { Teleporter "t" { destination: gone } }"#).unwrap_err();
        assert!(matches!(err, LevelError::NotFound(Missing::Anchor { .. })));
    }

    #[test]
    fn cooldown_gates_triggers() {
        let mut f = fixture();
        let mut t = gate(&f, MechanicClockPolicy::ResetToZero);
        let player = f.scene.find("player").unwrap();
        assert!(!t.trigger_node(&mut f.scene, player), "not started");
        t.start();
        assert!(t.trigger_node(&mut f.scene, player));
        assert!(!t.trigger_node(&mut f.scene, player), "cooling down");
        f.time.advance(Duration::from_millis(500));
        assert!(t.trigger_node(&mut f.scene, player));
        assert_eq!(t.uses(), 2);
        assert_eq!(f.scene.world_position(player), Some(Vec3::new(10.0, 2.0, 0.0)));
    }

    #[test]
    fn restart_resets_uses_and_cooldown() {
        let mut f = fixture();
        let mut t = gate(&f, MechanicClockPolicy::ResetToZero);
        let mut subject = Vec3::ZERO;
        t.start();
        assert!(t.trigger(&f.scene, &mut subject));
        t.stop();
        assert!(!t.is_ready());
        t.start();
        assert_eq!(t.uses(), 0);
        assert!(t.is_ready());
        f.time.advance(Duration::from_millis(1));
        assert!(t.trigger(&f.scene, &mut subject));
    }

    #[test]
    fn private_clock_resets_to_zero() {
        let f = fixture();
        f.level_clock.start();
        f.time.advance(Duration::from_secs(7));
        let mut t = gate(&f, MechanicClockPolicy::ResetToZero);
        t.start();
        assert_eq!(t.clock().elapsed(), Duration::ZERO);
        f.time.advance(Duration::from_secs(1));
        t.start();
        assert_eq!(t.clock().elapsed(), Duration::ZERO);
    }

    #[test]
    fn private_clock_inherits_level_time() {
        let f = fixture();
        f.level_clock.start();
        f.time.advance(Duration::from_secs(7));
        let mut t = gate(&f, MechanicClockPolicy::InheritLevelOffset);
        t.start();
        assert_eq!(t.clock().elapsed(), Duration::from_secs(7));
        f.time.advance(Duration::from_secs(1));
        assert_eq!(t.clock().elapsed(), Duration::from_secs(8));
    }
}
