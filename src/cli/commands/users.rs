//! User account command handler

use crate::domain::{Actor, Role};
use crate::services::NewUser;
use crate::state::SharedState;

pub async fn cmd_create_user(
    state: &SharedState,
    username: &str,
    role: &str,
    password: &str,
) -> anyhow::Result<()> {
    let role: Role = role.parse()?;

    let id = state
        .auth_service
        .create_user(
            &Actor::cli(),
            NewUser {
                username: username.to_string(),
                password: password.to_string(),
                role,
            },
        )
        .await?;

    println!("✓ Created {role} account '{username}' (id {id})");
    Ok(())
}
