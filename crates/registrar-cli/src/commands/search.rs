//! The `registrar search` command.

use std::path::PathBuf;

use anyhow::Result;

use registrar_core::model::Role;
use registrar_core::search::SearchOutcome;

pub fn execute(
    roster_path: PathBuf,
    query: String,
    role: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let role: Option<Role> = role
        .map(|r| r.parse().map_err(|e: String| anyhow::anyhow!("{}", e)))
        .transpose()?;

    let replay = super::load_registry(&roster_path, config_path)?;
    let registry = &replay.registry;
    let noun = role.map_or_else(|| "user".to_string(), |r| r.to_string());

    let outcome = match registry.search(&query, role) {
        Ok(outcome) => outcome,
        Err(e) if e.is_not_found() => {
            println!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        SearchOutcome::Cancelled => println!("Search cancelled."),
        SearchOutcome::Resolved(user) => println!("{user}"),
        SearchOutcome::Matches { users, total } => {
            if total == 0 {
                println!("No {noun}s found.");
            } else {
                println!("Showing {} of {total} {noun}(s):", users.len());
                for (i, user) in users.iter().enumerate() {
                    println!("{}. {user}", i + 1);
                }
            }
        }
    }

    Ok(())
}
