//! Strider headless level player.
//!
//! Runs a level directory on the engine's tick loop and logs the timer and
//! mechanic state once per second.
//!
//! # Usage
//!
//! ```bash
//! strider-play crates/strider-play/levels/tutorial
//! strider-play levels/tutorial --seconds 10 --teleport lift:player
//! strider-play levels/tutorial --then levels/ring --config strider.toml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;

use strider_engine::config::EngineConfig;
use strider_engine::level::{LevelRunner, RunnerEvent};
use strider_engine::logging::init_logging;
use strider_engine::time::FrameClock;

#[derive(Parser)]
#[command(name = "strider-play")]
#[command(author, version, about = "Strider - headless level runner")]
struct Args {
    /// Level directory (contains info.txt and the scene blueprint)
    level: PathBuf,

    /// Level to switch to halfway through the run
    #[arg(long)]
    then: Option<PathBuf>,

    /// Seconds of simulated play
    #[arg(long, short = 's', default_value = "5")]
    seconds: f64,

    /// Engine config file (strider.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Player session name
    #[arg(long, default_value = "local")]
    session: String,

    /// Timer fraction digits (overrides the config)
    #[arg(long)]
    digits: Option<usize>,

    /// Fire `teleporter:subject` one second in
    #[arg(long)]
    teleport: Option<String>,

    /// Log filter, e.g. "debug" or "strider_engine=trace"
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(digits) = args.digits {
        config.runner.timer_digits = digits;
    }
    if let Some(filter) = &args.log {
        config.logging = config.logging.with_filter(filter.clone());
    }
    if !(args.seconds.is_finite() && args.seconds >= 0.0) {
        bail!("--seconds must be a non-negative number");
    }
    let teleport = args.teleport.as_deref().map(parse_teleport).transpose()?;

    init_logging(config.logging.clone());

    let tick_rate = config.runner.tick_rate.max(1);
    let mut runner = LevelRunner::new(args.session.clone(), config.runner.clone())
        .on_event(|event| match event {
            RunnerEvent::LoadFailed { dir, error } => {
                log::warn!("load of {} failed: {error}", dir.display())
            }
            other => log::debug!("{other:?}"),
        });

    runner
        .assign(&args.level)
        .with_context(|| format!("entering level {}", args.level.display()))?;
    report_level(&runner);

    let period = Duration::from_secs_f64(1.0 / f64::from(tick_rate));
    let total_ticks = (args.seconds * f64::from(tick_rate)).round() as u64;
    if args.then.is_some() && total_ticks == 0 {
        bail!("--then needs a run of at least one tick; raise --seconds");
    }
    let switch_at = switch_tick(total_ticks);
    let mut frames = FrameClock::new();

    for tick in 1..=total_ticks {
        let frame = frames.tick();
        runner.tick();

        if tick == u64::from(tick_rate) {
            if let Some((teleporter, subject)) = &teleport {
                let moved = runner
                    .teleport(teleporter, subject)
                    .with_context(|| format!("teleporting {subject} with {teleporter}"))?;
                log::info!("teleport {teleporter} → {subject}: {}", if moved { "ok" } else { "not ready" });
            }
        }
        if tick == switch_at {
            if let Some(next) = &args.then {
                runner
                    .assign(next)
                    .with_context(|| format!("switching to level {}", next.display()))?;
                report_level(&runner);
            }
        }
        if tick % u64::from(tick_rate) == 0 {
            report_tick(&runner, frame.dt);
        }

        std::thread::sleep(period);
    }

    report_tick(&runner, 0.0);
    runner.unload();
    Ok(())
}

/// Tick on which `--then` switches levels: halfway, but never before the first.
fn switch_tick(total_ticks: u64) -> u64 {
    (total_ticks / 2).max(1)
}

fn parse_teleport(spec: &str) -> Result<(String, String)> {
    match spec.split_once(':') {
        Some((teleporter, subject)) if !teleporter.is_empty() && !subject.is_empty() => {
            Ok((teleporter.to_string(), subject.to_string()))
        }
        _ => bail!("--teleport expects `teleporter:subject`, got {spec:?}"),
    }
}

fn report_level(runner: &LevelRunner) {
    let Some(level) = runner.current_level() else {
        return;
    };
    let info = level.info();
    log::info!(
        "▶ {} by {} (difficulty {}{})",
        info.name,
        if info.creators.is_empty() { "unknown".to_string() } else { info.creators.join(", ") },
        info.difficulty.map_or_else(|| "?".to_string(), |d| d.to_string()),
        info.difficulty_label.as_deref().map(|l| format!(", {l}")).unwrap_or_default(),
    );
    for (id, mechanic) in level.mechanics() {
        log::info!("  #{} {} {:?}", id.0, mechanic.kind().as_str(), mechanic.name());
    }
}

fn report_tick(runner: &LevelRunner, dt: f32) {
    let (Some(level), Some(timer)) = (runner.current_level(), runner.timer()) else {
        return;
    };
    let spinners: Vec<String> = level
        .mechanics()
        .filter_map(|(_, m)| m.as_spinner())
        .map(|s| format!("{}={:.2}rad", s.name(), s.angle()))
        .collect();
    log::info!("[{}] {} dt={:.1}ms {}", timer.text(), level.name(), dt * 1000.0, spinners.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_happens_within_short_runs() {
        assert_eq!(switch_tick(1), 1);
        assert_eq!(switch_tick(2), 1);
        assert_eq!(switch_tick(300), 150);
    }

    #[test]
    fn teleport_argument() {
        assert_eq!(parse_teleport("lift:player").unwrap(), ("lift".into(), "player".into()));
        assert!(parse_teleport("lift").is_err());
        assert!(parse_teleport(":player").is_err());
    }
}
