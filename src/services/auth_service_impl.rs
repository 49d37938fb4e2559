//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use sea_orm::TransactionTrait;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::repositories::user::{self, UserRepository};
use crate::db::{Store, UserSummary};
use crate::domain::audit::tables;
use crate::domain::{Actor, AuditAction, Identity, Role, timestamp_now};
use crate::services::audit;
use crate::services::auth_service::{AuthError, AuthService, LoginResult, NewUser};
use crate::services::session::SessionKeys;

pub const MIN_PASSWORD_LEN: usize = 6;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    keys: SessionKeys,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        let keys = SessionKeys::new(&security.session_secret, security.session_hours);
        Self {
            store,
            security,
            keys,
        }
    }

    fn check_password_rules(password: &str) -> Result<(), AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(
        &self,
        username: &str,
        password: &str,
        address: &str,
    ) -> Result<LoginResult, AuthError> {
        let Some(account) = self.store.users().get_by_username(username).await? else {
            audit::record(
                &self.store.conn,
                &Actor::new(None, address),
                AuditAction::LoginFailedUserNotFound,
                tables::USERS,
                None,
            )
            .await?;
            warn!(username, address, "Login failed: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        let actor = Actor::new(Some(account.id), address);

        if account.failed_attempts >= self.security.lockout_threshold {
            audit::record(
                &self.store.conn,
                &actor,
                AuditAction::LoginLocked,
                tables::USERS,
                Some(account.id),
            )
            .await?;
            warn!(username, address, "Login refused: account locked");
            return Err(AuthError::Locked);
        }

        if !account.is_active {
            audit::record(
                &self.store.conn,
                &actor,
                AuditAction::LoginInactive,
                tables::USERS,
                Some(account.id),
            )
            .await?;
            warn!(username, address, "Login refused: account inactive");
            return Err(AuthError::Inactive);
        }

        if !user::verify_password(&account.password_hash, password).await? {
            let txn = self.store.conn.begin().await?;
            UserRepository::new(&txn)
                .record_failed_attempt(account.id)
                .await?;
            audit::record(
                &txn,
                &actor,
                AuditAction::LoginFailedWrongPassword,
                tables::USERS,
                Some(account.id),
            )
            .await?;
            txn.commit().await?;

            warn!(
                username,
                address,
                failed_attempts = account.failed_attempts + 1,
                "Login failed: wrong password"
            );
            return Err(AuthError::InvalidCredentials);
        }

        let role: Role = account
            .role
            .parse()
            .map_err(|e: crate::domain::UnknownRole| AuthError::Internal(e.to_string()))?;

        let txn = self.store.conn.begin().await?;
        UserRepository::new(&txn)
            .record_login(account.id, &timestamp_now())
            .await?;
        audit::record(
            &txn,
            &actor,
            AuditAction::LoginSuccess,
            tables::USERS,
            Some(account.id),
        )
        .await?;
        txn.commit().await?;

        let identity = Identity {
            id: account.id,
            username: account.username,
            role,
        };
        let token = self
            .keys
            .issue(&identity)
            .map_err(|e| AuthError::Internal(format!("Failed to sign session token: {e}")))?;

        info!(username = %identity.username, "User logged in");

        Ok(LoginResult {
            token,
            user: identity,
        })
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError> {
        Ok(self.store.users().list().await?)
    }

    async fn create_user(&self, actor: &Actor, new_user: NewUser) -> Result<i32, AuthError> {
        let username = new_user.username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        Self::check_password_rules(&new_user.password)?;

        if self.store.users().get_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict("Username already exists".to_string()));
        }

        let hash = user::hash_password_blocking(&new_user.password, &self.security).await?;

        let txn = self.store.conn.begin().await?;
        let id = UserRepository::new(&txn)
            .insert(username, hash, new_user.role.as_str())
            .await?;
        audit::record(&txn, actor, AuditAction::CreateUser, tables::USERS, Some(id)).await?;
        txn.commit().await?;

        info!(username, role = %new_user.role, "Created user");
        Ok(id)
    }

    async fn update_user(
        &self,
        actor: &Actor,
        id: i32,
        role: Role,
        is_active: bool,
    ) -> Result<(), AuthError> {
        let txn = self.store.conn.begin().await?;
        if !UserRepository::new(&txn)
            .update_access(id, role.as_str(), is_active)
            .await?
        {
            return Err(AuthError::UserNotFound(id));
        }
        audit::record(&txn, actor, AuditAction::UpdateUser, tables::USERS, Some(id)).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn reset_password(
        &self,
        actor: &Actor,
        id: i32,
        password: &str,
    ) -> Result<(), AuthError> {
        Self::check_password_rules(password)?;
        let hash = user::hash_password_blocking(password, &self.security).await?;

        let txn = self.store.conn.begin().await?;
        if !UserRepository::new(&txn).set_password(id, hash).await? {
            return Err(AuthError::UserNotFound(id));
        }
        audit::record(&txn, actor, AuditAction::ResetPassword, tables::USERS, Some(id)).await?;
        txn.commit().await?;
        Ok(())
    }
}
