//! Headless sky diagram driver.
//!
//! Runs the timekeeper against a synthetic refresh clock and prints one JSON
//! object per frame on stdout. Logs go to stderr.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   JSON config file (default: built-in defaults)
//!   --frames <N>      Maximum frames to emit (default: 120)
//!   --fps <F>         Synthetic refresh rate (default: 60)
//!   --play            Play continuously instead of stepping one day

use std::io::{self, Write};

use serde::Serialize;

use skydiagram::core::{logging, Error, Result};
use skydiagram::diagram::{Changes, SkyDiagram, SkyDiagramConfig};
use skydiagram::sky::{SkyGradient, SkyLevelOutput, Terminator};
use skydiagram::time::{AnimationState, ManualScheduler, PhaseName, TimeReadout, Timekeeper};
use skydiagram::track::TrackPoint;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameRecord<'a> {
    frame: usize,
    ms: f64,
    state: &'static str,
    readout: &'a TimeReadout,
    phase: PhaseName,
    sun: TrackPoint,
    moon: TrackPoint,
    sky_level: SkyLevelOutput,
    gradient: SkyGradient,
    terminator: Terminator,
    moon_path: String,
    changes: Changes,
}

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let config = match parse_str_arg(args, "--config") {
        Some(path) => SkyDiagramConfig::load(path)?,
        None => SkyDiagramConfig::default(),
    };
    let frames = parse_usize_arg(args, "--frames").unwrap_or(120);
    let fps = parse_f64_arg(args, "--fps").unwrap_or(60.0);
    if !(fps.is_finite() && fps > 0.0) {
        return Err(Error::InvalidArgument(format!("--fps must be positive, got {fps}")));
    }
    let play = args.iter().any(|a| a == "--play");

    let mut timekeeper = Timekeeper::new(&config.time, ManualScheduler::new())?;
    let mut diagram = SkyDiagram::new(&config)?;

    timekeeper.go_to_day_1()?;
    if play {
        timekeeper.play()?;
    } else {
        timekeeper.increment_day()?;
    }
    diagram.set_readout(timekeeper.readout())?;
    timekeeper.clear_flags();

    let mut out = io::stdout().lock();
    serde_json::to_writer(
        &mut out,
        &serde_json::json!({ "trackPath": diagram.frame().track.path_data() }),
    )?;
    writeln!(out)?;

    let frame_ms = 1000.0 / fps;
    for frame in 0..frames {
        let ms = frame as f64 * frame_ms;
        timekeeper.advance(ms)?;

        let changes = if timekeeper.has_time_changed() {
            diagram.set_readout(timekeeper.readout())?
        } else {
            Changes::default()
        };
        timekeeper.clear_flags();

        let f = diagram.frame();
        let record = FrameRecord {
            frame,
            ms,
            state: timekeeper.animation_state().name(),
            readout: timekeeper.readout(),
            phase: timekeeper.readout().phase_name(),
            sun: f.sun,
            moon: f.moon,
            sky_level: f.sky_level,
            gradient: f.gradient,
            terminator: f.terminator,
            moon_path: f.terminator.svg_path(),
            changes,
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;

        if timekeeper.animation_state() == AnimationState::Idle {
            log::info!("Animation finished after {} frames", frame + 1);
            break;
        }
    }
    out.flush()?;
    Ok(())
}

fn parse_f64_arg(args: &[String], flag: &str) -> Option<f64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
