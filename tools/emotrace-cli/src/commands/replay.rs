//! Replay a recorded frame log through the emotion engine.

use std::path::{Path, PathBuf};

use emotrace_common::{AppConfig, EmotraceError, EmotraceResult};
use emotrace_detection_core::{EmotionEngine, EngineError};
use emotrace_face_model::{
    parse_frame_log, ActivationEvent, DetectorProfile, TimedFrame, TimestampPolicy,
};

pub fn run(
    config: &AppConfig,
    frames_path: PathBuf,
    profile_path: Option<PathBuf>,
    json: bool,
    policy: Option<TimestampPolicy>,
) -> anyhow::Result<()> {
    let frames = load_frames(&frames_path)?;
    let mut profile = resolve_profile(profile_path.as_deref().or(config.profile.as_deref()))?;
    if let Some(policy) = policy {
        profile.timestamp_policy = policy;
    }

    let mut engine = EmotionEngine::from_profile(&profile)
        .map_err(|e| EmotraceError::detection(format!("Failed to build engine: {e}")))?;

    if !json {
        println!(
            "Replaying {} frame(s) from {} through {} channel(s)",
            frames.len(),
            frames_path.display(),
            engine.len()
        );
        println!();
    }

    let mut event_count = 0usize;
    let mut error_count = 0usize;
    let mut skipped = 0usize;

    for frame in &frames {
        let evaluation = match engine.evaluate(&frame.aus, frame.timestamp) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                skip_frame(e, frame.timestamp)?;
                skipped += 1;
                continue;
            }
        };

        for event in &evaluation.events {
            println!("{}", render_event(event, json)?);
        }
        for error in &evaluation.errors {
            eprintln!("{:>9.3}s  {error}", frame.timestamp);
        }

        event_count += evaluation.events.len();
        error_count += evaluation.errors.len();
    }

    if json {
        return Ok(());
    }

    println!();
    println!("Summary:");
    println!("  Events: {event_count}");
    println!("  Channel errors: {error_count}");
    if skipped > 0 {
        println!("  Skipped frames: {skipped}");
    }
    if let Some(last) = engine.last_timestamp() {
        println!("  Last timestamp: {last:.3}s");
    }
    for snapshot in engine.snapshots() {
        println!(
            "  {:<10} intensity={:.3} {}",
            snapshot.kind.as_str(),
            snapshot.current_intensity,
            if snapshot.is_active {
                "active"
            } else {
                "inactive"
            }
        );
    }

    Ok(())
}

/// Decide whether a rejected frame can be skipped or ends the replay.
fn skip_frame(err: EngineError, timestamp: f64) -> EmotraceResult<()> {
    match err {
        EngineError::NonMonotonicTimestamp { .. } | EngineError::InvalidTimestamp { .. } => {
            tracing::warn!(t = timestamp, "Skipping frame: {err}");
            Ok(())
        }
        other => Err(EmotraceError::detection(format!("Replay failed: {other}"))),
    }
}

fn render_event(event: &ActivationEvent, json: bool) -> EmotraceResult<String> {
    if json {
        Ok(serde_json::to_string(event)?)
    } else {
        Ok(event.to_string())
    }
}

fn load_frames(path: &Path) -> EmotraceResult<Vec<TimedFrame>> {
    if !path.exists() {
        return Err(EmotraceError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_frame_log(&content).map_err(|e| EmotraceError::frame(e.to_string()))
}

/// Load the named profile, or fall back to the built-in defaults.
fn resolve_profile(path: Option<&Path>) -> EmotraceResult<DetectorProfile> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading detector profile");
            DetectorProfile::load(path).map_err(|e| EmotraceError::profile(e.to_string()))
        }
        None => Ok(DetectorProfile::default()),
    }
}
