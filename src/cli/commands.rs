//! CLI command implementations
//!
//! Each command builds a console over the mock provider, drives it, and
//! prints what the presentation layer would render.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::console::level::meter_zone;
use crate::console::{ConsoleConfig, ControlConsoleFacade, MeterZone};
use crate::error::Result;
use crate::generation::{
    Engine, GenerationKind, GenerationRequest, JobState, MockProvider, RequestSettings,
};

/// Print the mixer strip after applying the requested solo/mute flags.
pub fn channels(solo: &[String], mute: &[String]) -> Result<()> {
    let mut console = console_with_delay(Duration::ZERO);
    for id in solo {
        if !console.toggle_solo(id) {
            println!("(no channel '{}')", id);
        }
    }
    for id in mute {
        if !console.toggle_mute(id) {
            println!("(no channel '{}')", id);
        }
    }

    println!("{:<10} {:>4} {:>5}  M S  LEVEL", "CHANNEL", "VOL", "PAN");
    for channel in console.channels() {
        let level = console.effective_level(&channel.id).unwrap_or(0);
        let hot = if meter_zone(level) == MeterZone::Hot {
            " !"
        } else {
            ""
        };
        println!(
            "{:<10} {:>4} {:>5}  {} {}  {:>3}{}",
            channel.label,
            channel.volume,
            channel.pan,
            flag(channel.muted),
            flag(channel.soloed),
            level,
            hot,
        );
    }
    Ok(())
}

/// Move the granular pad and print the resulting parameter set.
pub fn surface(x: i32, y: i32) -> Result<()> {
    let mut console = console_with_delay(Duration::ZERO);
    console.set_surface_position(x, y);
    let (px, py) = console.surface_position();
    println!("pad at ({}, {})", px, py);
    for (spec, value) in console.surface_snapshot().iter() {
        println!("{:<12} {:>4}  [{}, {}]", spec.name, value, spec.min, spec.max);
    }
    Ok(())
}

/// Submit a generation request and wait for the mock provider to complete.
pub fn generate(prompt: &str, kind: &str, engine: Option<&str>, delay_ms: u64) -> Result<()> {
    let kind: GenerationKind = kind.parse()?;
    let engine = match engine {
        Some(id) => id.parse()?,
        None => Engine::default_for(kind),
    };
    let settings = default_settings(kind);
    let request = GenerationRequest::new(prompt, engine, settings)?;

    let mut console = console_with_delay(Duration::from_millis(delay_ms));
    console.submit(request)?;
    println!(
        "{} generation dispatched to {}...",
        kind,
        engine.display_name()
    );

    // Cooperative wait: pump completions until the job leaves Pending.
    let deadline = Duration::from_millis(delay_ms) + Duration::from_secs(5);
    let started = std::time::Instant::now();
    while console.job_state(kind).is_pending() && started.elapsed() < deadline {
        console.poll();
        thread::sleep(Duration::from_millis(10));
    }

    match console.job_state(kind) {
        JobState::Succeeded { result } => {
            println!(
                "done: '{}' ({}, {})",
                result.name,
                result.duration_display(),
                result.engine.display_name()
            );
        }
        JobState::Failed { reason } => println!("failed: {}", reason),
        other => println!("still {}", other),
    }

    println!("results, newest first:");
    for result in console.results(kind) {
        println!("  {} ({})", result.name, result.duration_display());
    }
    Ok(())
}

fn console_with_delay(delay: Duration) -> ControlConsoleFacade {
    ControlConsoleFacade::new(
        Arc::new(MockProvider::with_delay(delay)),
        ConsoleConfig::default(),
    )
}

fn default_settings(kind: GenerationKind) -> RequestSettings {
    use crate::generation::{AspectRatio, Resolution};
    match kind {
        GenerationKind::Track => RequestSettings::track("Pop", "aria", 120),
        GenerationKind::Video => RequestSettings::video(
            10,
            "Music Video",
            Resolution::Fhd1080,
            30,
            AspectRatio::Widescreen,
        ),
        GenerationKind::StemSplit => RequestSettings::stem_split(),
    }
}

fn flag(on: bool) -> &'static str {
    if on {
        "*"
    } else {
        "-"
    }
}
