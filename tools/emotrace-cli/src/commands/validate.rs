//! Validate a detector profile.

use std::path::PathBuf;

use emotrace_face_model::DetectorProfile;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating profile at: {}", path.display());

    let profile =
        DetectorProfile::load(&path).map_err(|e| anyhow::anyhow!("Invalid profile: {e}"))?;

    println!("  Timestamp policy: {:?}", profile.timestamp_policy);
    println!("  Cheek weight: {:.2}", profile.cheek_weight);
    for kind in profile.enabled_builtins() {
        let config = profile.config_for(&kind);
        let marker = if profile.overrides.contains_key(&kind) {
            " (override)"
        } else {
            ""
        };
        println!(
            "  {:<10} on {:.2} off {:.2} onset {:>5} ms offset {:>5} ms alpha {:.2}{}",
            kind.as_str(),
            config.on_threshold,
            config.off_threshold,
            config.min_onset_duration_ms,
            config.min_offset_duration_ms,
            config.ema_alpha,
            marker
        );
        if !config.has_hysteresis_gap() {
            println!("    warning: no hysteresis gap, channel may chatter");
        }
    }

    println!("\nProfile is valid.");
    Ok(())
}
