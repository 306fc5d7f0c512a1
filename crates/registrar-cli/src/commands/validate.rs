//! The `registrar validate` command.

use std::path::PathBuf;

use anyhow::Result;

use registrar_core::config::load_config_from;
use registrar_core::roster;

pub fn execute(roster_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parsed = roster::parse_roster(&roster_path, &config)?;

    println!(
        "Roster: {} ({} users, {} courses, {} enrollments)",
        roster_path.display(),
        parsed.users.len(),
        parsed.courses.len(),
        parsed.enrollments.len()
    );

    let warnings = roster::validate_roster(&parsed);
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Roster is valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
