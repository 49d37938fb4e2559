//! Backup, restore and year reset command handlers

use anyhow::Context;
use std::path::Path;

use crate::domain::Actor;
use crate::services::Snapshot;
use crate::state::SharedState;

pub async fn cmd_backup(state: &SharedState, file: &Path) -> anyhow::Result<()> {
    let snapshot = state.maintenance_service.backup(&Actor::cli()).await?;
    let json = serde_json::to_string_pretty(&snapshot)?;
    tokio::fs::write(file, json)
        .await
        .with_context(|| format!("Failed to write {}", file.display()))?;

    println!(
        "✓ Backed up {} students, {} visits, {} follow-ups, {} referrals, {} appointments to {}",
        snapshot.students.len(),
        snapshot.visits.len(),
        snapshot.special_cases.len(),
        snapshot.referrals.len(),
        snapshot.clinic_appointments.len(),
        file.display()
    );
    Ok(())
}

pub async fn cmd_restore(state: &SharedState, file: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a valid backup file", file.display()))?;
    let students = snapshot.students.len();

    state
        .maintenance_service
        .restore(&Actor::cli(), snapshot)
        .await?;

    println!("✓ Restored {students} students from {}", file.display());
    Ok(())
}

pub async fn cmd_reset_year(state: &SharedState, confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        println!("This deletes every student, visit, follow-up, referral and appointment.");
        println!("Users, settings and the audit log are kept.");
        println!();
        println!("Run again with --yes to proceed.");
        return Ok(());
    }

    state.maintenance_service.reset_year(&Actor::cli()).await?;
    println!("✓ School year reset");
    Ok(())
}
