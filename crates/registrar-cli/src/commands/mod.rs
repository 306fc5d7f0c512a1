pub mod init;
pub mod report;
pub mod search;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use registrar_core::config::{load_config_from, RegistrarConfig};
use registrar_core::roster::{self, Replay};

/// Load config and roster, then replay the roster into a fresh registry.
///
/// Rejected roster actions are printed as warnings on stderr.
pub fn load_registry(roster_path: &Path, config_path: Option<PathBuf>) -> Result<Replay> {
    let config: RegistrarConfig = load_config_from(config_path.as_deref())?;
    let roster = roster::parse_roster(roster_path, &config)?;
    let replay = roster.replay(config);
    tracing::info!(
        users = replay.registry.users().len(),
        courses = replay.registry.courses().len(),
        rejected = replay.issues.len(),
        "loaded roster {}",
        roster_path.display()
    );

    for issue in &replay.issues {
        let subject = issue.subject.as_deref().unwrap_or("roster");
        eprintln!("  [{subject}] WARNING: {}", issue.message);
    }

    Ok(replay)
}
