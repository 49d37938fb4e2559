use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};
use serde::Serialize;
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};

/// Account data safe to hand to callers (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub failed_attempts: i32,
    pub last_login: Option<String>,
}

impl From<users::Model> for UserSummary {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
            is_active: model.is_active,
            failed_attempts: model.failed_attempts,
            last_login: model.last_login,
        }
    }
}

pub struct UserRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<users::Model>, DbErr> {
        Users::find_by_id(id).one(self.conn).await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<users::Model>, DbErr> {
        Users::find()
            .filter(users::Column::Username.eq(username))
            .one(self.conn)
            .await
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>, DbErr> {
        let rows = Users::find()
            .order_by_asc(users::Column::Id)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    pub async fn insert(
        &self,
        username: &str,
        password_hash: String,
        role: &str,
    ) -> Result<i32, DbErr> {
        let model = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role: Set(role.to_string()),
            is_active: Set(true),
            failed_attempts: Set(0),
            last_login: Set(None),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;

        Ok(model.id)
    }

    pub async fn record_failed_attempt(&self, id: i32) -> Result<(), DbErr> {
        Users::update_many()
            .col_expr(
                users::Column::FailedAttempts,
                Expr::col(users::Column::FailedAttempts).add(1),
            )
            .filter(users::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    pub async fn record_login(&self, id: i32, at: &str) -> Result<(), DbErr> {
        Users::update_many()
            .col_expr(users::Column::FailedAttempts, Expr::value(0))
            .col_expr(users::Column::LastLogin, Expr::value(at))
            .filter(users::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    /// Returns `false` when no account has this id.
    pub async fn update_access(&self, id: i32, role: &str, is_active: bool) -> Result<bool, DbErr> {
        let result = Users::update_many()
            .col_expr(users::Column::Role, Expr::value(role))
            .col_expr(users::Column::IsActive, Expr::value(is_active))
            .filter(users::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Replaces the password hash and clears any lockout.
    pub async fn set_password(&self, id: i32, password_hash: String) -> Result<bool, DbErr> {
        let result = Users::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(users::Column::FailedAttempts, Expr::value(0))
            .filter(users::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the library default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Hashes on the blocking pool; Argon2 is CPU-bound.
pub async fn hash_password_blocking(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();
    task::spawn_blocking(move || hash_password(&password, Some(&config)))
        .await
        .context("Password hashing task panicked")?
}

/// Checks a password against a stored PHC hash string.
pub async fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let password_hash = password_hash.to_string();
    let password = password.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password_blocking("admin123", &fast_params())
            .await
            .unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(&hash, "admin123").await.unwrap());
        assert!(!verify_password(&hash, "admin124").await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify_password("not-a-hash", "x").await.is_err());
    }
}
