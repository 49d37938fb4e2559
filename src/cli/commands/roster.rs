//! Roster import command handler

use anyhow::Context;
use std::path::Path;

use crate::domain::Actor;
use crate::roster;
use crate::state::SharedState;

pub async fn cmd_import_roster(state: &SharedState, file: &Path) -> anyhow::Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let candidates = roster::parse(&data)?;
    let total = candidates.len();

    let inserted = state
        .student_service
        .bulk_import(&Actor::cli(), candidates)
        .await?;

    println!(
        "✓ Imported {inserted} of {total} students ({} already on the roster)",
        total as u64 - inserted
    );
    Ok(())
}
