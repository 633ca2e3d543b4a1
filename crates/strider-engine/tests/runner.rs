//! End-to-end runner behavior against level directories on disk.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use strider_engine::config::RunnerConfig;
use strider_engine::core::{Lifecycle, Phase};
use strider_engine::coords::Vec3;
use strider_engine::level::{LevelError, LevelRunner, Missing, RunnerEvent};
use strider_engine::mechanics::MechanicClockPolicy;
use strider_engine::time::ManualTime;
use tempfile::TempDir;

const ALPHA: &str = r#"
Level {
    Anchor "spawn" { x: 0 y: 1 }
    Anchor "summit" { x: 4 y: 12 z: -3 }
    Spinner "fan" { speed: 2 }
    Teleporter "lift" { destination: summit cooldown: 5 }
    Body "player" { y: 1 }
}
"#;

const BETA: &str = r#"
Level {
    Group "ring" {
        Spinner "outer" { speed: -1 phase: 0.5 }
        Spinner "inner" { speed: 3 }
    }
}
"#;

struct Fixture {
    root: TempDir,
    time: Arc<ManualTime>,
    events: Rc<RefCell<Vec<RunnerEvent>>>,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        write_level(root.path(), "alpha", "full_name: Alpha Peak\ncreators: Ana, Bo\ndifficulty: 3", ALPHA);
        write_level(root.path(), "beta", "full_name: Beta Ring", BETA);
        write_level(root.path(), "broken", "full_name: Broken", "Menu { }");
        Self { root, time: Arc::new(ManualTime::new()), events: Rc::default() }
    }

    fn dir(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    fn runner(&self, config: RunnerConfig) -> LevelRunner {
        let events = Rc::clone(&self.events);
        LevelRunner::new("session-1", config)
            .with_time_source(self.time.clone())
            .on_event(move |e| events.borrow_mut().push(e.clone()))
    }

    fn take_events(&self) -> Vec<RunnerEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

fn write_level(root: &Path, name: &str, info: &str, scene: &str) {
    let dir = root.join(name);
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("info.txt"), info).unwrap();
    fs::write(dir.join("level.scene"), scene).unwrap();
}

fn created(name: &str) -> RunnerEvent {
    RunnerEvent::LevelCreated { name: name.into() }
}

fn started(name: &str) -> RunnerEvent {
    RunnerEvent::LevelStarted { name: name.into() }
}

fn stopped(name: &str) -> RunnerEvent {
    RunnerEvent::LevelStopped { name: name.into(), phase: Phase::Stopped }
}

fn disposed(name: &str) -> RunnerEvent {
    RunnerEvent::LevelDisposed { name: name.into() }
}

// ── assignment ────────────────────────────────────────────────────────────

#[test]
fn assign_starts_level_with_metadata() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("alpha")).unwrap();

    let level = runner.current_level().unwrap();
    assert_eq!(level.phase(), Phase::Started);
    assert_eq!(level.info().creators, ["Ana", "Bo"]);
    assert_eq!(level.info().difficulty, Some(3.0));
    assert!(runner.active_clock().unwrap().is_running());
    assert_eq!(fx.take_events(), [created("Alpha Peak"), started("Alpha Peak")]);
}

#[test]
fn previous_level_is_disposed_before_next_is_created() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("alpha")).unwrap();
    let alpha_clock = runner.active_clock().unwrap();
    fx.take_events();

    runner.assign(fx.dir("beta")).unwrap();
    assert_eq!(
        fx.take_events(),
        [stopped("Alpha Peak"), disposed("Alpha Peak"), created("Beta Ring"), started("Beta Ring")]
    );
    assert!(!alpha_clock.is_running());
    assert_eq!(runner.current_level().unwrap().name(), "Beta Ring");
}

#[test]
fn unreadable_package_keeps_current_level() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("alpha")).unwrap();
    fx.take_events();

    let err = runner.assign(fx.dir("missing")).unwrap_err();
    assert!(matches!(err, LevelError::NotFound(Missing::LevelDirectory(_))));
    assert_eq!(runner.current_level().unwrap().phase(), Phase::Started);

    let events = fx.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], RunnerEvent::LoadFailed { dir, .. } if dir.ends_with("missing")));
}

#[test]
fn corrupt_level_keeps_current_level() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("alpha")).unwrap();
    let clock = runner.active_clock().unwrap();
    fx.take_events();

    let err = runner.assign(fx.dir("broken")).unwrap_err();
    assert!(matches!(err, LevelError::Corrupt { .. }));
    assert_eq!(runner.current_level().unwrap().name(), "Alpha Peak");
    assert_eq!(runner.current_level().unwrap().phase(), Phase::Started);
    assert!(clock.is_running());

    let events = fx.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], RunnerEvent::LoadFailed { .. }));
}

#[test]
fn misconfigured_mechanic_keeps_current_level() {
    let fx = Fixture::new();
    write_level(fx.root.path(), "typo", "full_name: Typo", r#"Level { Spinner "w" { speed: fast } }"#);
    write_level(
        fx.root.path(),
        "lost",
        "full_name: Lost",
        r#"Level { Teleporter "t" { destination: nowhere } }"#,
    );
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("alpha")).unwrap();

    let err = runner.assign(fx.dir("typo")).unwrap_err();
    assert!(matches!(err, LevelError::InvalidMechanic { .. }));
    let err = runner.assign(fx.dir("lost")).unwrap_err();
    assert!(matches!(err, LevelError::NotFound(Missing::Anchor { .. })));
    assert_eq!(runner.current_level().unwrap().phase(), Phase::Started);
}

#[test]
fn custom_blueprint_file_name() {
    let fx = Fixture::new();
    fs::rename(fx.dir("beta").join("level.scene"), fx.dir("beta").join("ring.scene")).unwrap();
    let config = RunnerConfig { blueprint_file: "ring.scene".into(), ..RunnerConfig::default() };
    let mut runner = fx.runner(config);
    runner.assign(fx.dir("beta")).unwrap();
    assert_eq!(runner.current_level().unwrap().mechanics().count(), 2);
}

// ── running ───────────────────────────────────────────────────────────────

#[test]
fn timer_follows_level_clock() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig { timer_digits: 2, ..RunnerConfig::default() });
    runner.assign(fx.dir("alpha")).unwrap();
    let timer = runner.timer().unwrap();

    fx.time.advance(Duration::from_millis(125_400));
    assert_eq!(timer.text(), "2:05.40");

    runner.set_paused(true);
    fx.time.advance(Duration::from_secs(30));
    assert!(runner.is_paused());
    assert_eq!(timer.text(), "2:05.40");
}

#[test]
fn tick_rotates_spinners() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("beta")).unwrap();

    fx.time.advance(Duration::from_millis(250));
    runner.tick();

    let level = runner.current_level().unwrap();
    let outer = level.spinner("outer").unwrap();
    let inner = level.spinner("inner").unwrap();
    assert!((outer.angle() - 0.25).abs() < 1e-9);
    assert!((inner.angle() - 0.75).abs() < 1e-9);
    let node = level.scene().get(inner.node()).unwrap();
    assert!((node.transform.yaw - 0.75).abs() < 1e-6);
}

#[test]
fn teleport_through_runner() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("alpha")).unwrap();

    assert!(runner.teleport("lift", "player").unwrap());
    let level = runner.current_level().unwrap();
    let player = level.scene().find("player").unwrap();
    assert_eq!(level.scene().world_position(player), Some(Vec3::new(4.0, 12.0, -3.0)));

    assert!(!runner.teleport("lift", "player").unwrap());
    fx.time.advance(Duration::from_secs(5));
    assert!(runner.teleport("lift", "player").unwrap());
}

#[test]
fn teleport_without_level_is_not_found() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    assert!(runner.teleport("lift", "player").unwrap_err().is_not_found());
}

// ── restart ───────────────────────────────────────────────────────────────

#[test]
fn restart_resets_counters_not_time() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    runner.assign(fx.dir("alpha")).unwrap();

    fx.time.advance(Duration::from_secs(7));
    runner.teleport("lift", "player").unwrap();
    assert!(runner.restart(false));

    let level = runner.current_level().unwrap();
    assert_eq!(level.teleporter("lift").unwrap().uses(), 0);
    assert_eq!(level.elapsed(), Duration::from_secs(7));
    assert!(level.teleporter("lift").unwrap().is_ready());

    assert!(runner.restart(true));
    assert_eq!(runner.current_level().unwrap().elapsed(), Duration::ZERO);
}

#[test]
fn inherited_mechanic_clock_policy() {
    let fx = Fixture::new();
    let config = RunnerConfig {
        mechanic_clock: MechanicClockPolicy::InheritLevelOffset,
        ..RunnerConfig::default()
    };
    let mut runner = fx.runner(config);
    runner.assign(fx.dir("alpha")).unwrap();

    fx.time.advance(Duration::from_secs(4));
    runner.restart(false);
    let lift = runner.current_level().unwrap().teleporter("lift").unwrap();
    assert_eq!(lift.clock().elapsed(), Duration::from_secs(4));
}

// ── teardown ──────────────────────────────────────────────────────────────

#[test]
fn unload_and_drop_dispose_level() {
    let fx = Fixture::new();
    let mut runner = fx.runner(RunnerConfig::default());
    assert!(!runner.unload());

    runner.assign(fx.dir("alpha")).unwrap();
    let clock = runner.active_clock().unwrap();
    assert!(runner.unload());
    assert!(!clock.is_running());
    assert!(!runner.restart(false));

    runner.assign(fx.dir("beta")).unwrap();
    fx.take_events();
    drop(runner);
    assert_eq!(fx.take_events(), [stopped("Beta Ring"), disposed("Beta Ring")]);
}
