//! Write the default detector profile.

use std::path::PathBuf;

use emotrace_common::{config_file_path, AppConfig};
use emotrace_face_model::DetectorProfile;

pub fn run(
    mut config: AppConfig,
    path: PathBuf,
    force: bool,
    set_default: bool,
) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (pass --force to overwrite)",
            path.display()
        );
    }

    let profile = DetectorProfile::default();
    profile
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write profile: {e}"))?;

    println!("Wrote default profile to {}", path.display());
    println!("  Channels: {}", profile.enabled_builtins().len());
    println!(
        "  Thresholds: on {:.2} / off {:.2}",
        profile.defaults.on_threshold, profile.defaults.off_threshold
    );
    println!(
        "  Debounce: onset {} ms / offset {} ms",
        profile.defaults.min_onset_duration_ms, profile.defaults.min_offset_duration_ms
    );
    println!("  Smoothing: alpha {:.2}", profile.defaults.ema_alpha);

    if set_default {
        config.profile = Some(std::fs::canonicalize(&path)?);
        config
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to save config: {e}"))?;
        println!("  Set as default in {}", config_file_path().display());
    }

    Ok(())
}
