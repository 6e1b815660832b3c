//! Cross-platform notification support
//! Currently only implements macOS notifications
use crate::countdown::PhaseChange;

#[cfg(target_os = "macos")]
use std::process::Command;

fn phase_message(change: &PhaseChange) -> String {
    format!(
        "{} over. {} for {} minutes.",
        change.from.title(),
        change.to.title(),
        change.to.duration_secs() / 60
    )
}

/// Announce a countdown phase flip
pub fn notify_phase_change(change: &PhaseChange) {
    let message = phase_message(change);
    tracing::info!(from = ?change.from, to = ?change.to, "{}", message);

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "Momentum - {}""#,
            message.replace('"', "\\\""),
            change.to.title()
        );

        let _ = Command::new("osascript").arg("-e").arg(&script).output();
    }
}
