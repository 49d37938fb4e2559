//! Identity resolution and role checks.
//!
//! [`resolve_identity`] wraps every route except login and stores the
//! resolved [`Identity`] as a request extension. Role requirements are
//! declared per route group with [`require_role`].

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::{Actor, Identity, Role};

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Accepts a valid session token for an account that is still active, taking
/// the role from the stored account. Without an `Authorization` header and in
/// single-user mode the request runs as the built-in administrator.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let identity = if request.headers().contains_key(header::AUTHORIZATION) {
        match session_identity(&state, request.headers()).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return ApiError::unauthenticated().into_response(),
            Err(err) => return err.into_response(),
        }
    } else if state.config().security.single_user_mode {
        Identity::single_user_admin()
    } else {
        return ApiError::unauthenticated().into_response();
    };

    tracing::Span::current().record("user_id", identity.username.as_str());
    request.extensions_mut().insert(identity);
    next.run(request).await
}

async fn session_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<Identity>, ApiError> {
    let Some(claims) = bearer_token(headers).and_then(|t| state.session_keys().verify(t)) else {
        return Ok(None);
    };

    let Some(account) = state.store().users().get(claims.id).await? else {
        return Ok(None);
    };
    if !account.is_active {
        tracing::warn!(user = %account.username, "Session refused: account inactive");
        return Ok(None);
    }

    Ok(account.role.parse::<Role>().ok().map(|role| Identity {
        id: account.id,
        username: account.username,
        role,
    }))
}

/// `route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_role))`
pub async fn require_role(
    State(allowed): State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Response {
    match request.extensions().get::<Identity>() {
        Some(identity) if identity.has_any_role(allowed) => next.run(request).await,
        Some(identity) => {
            tracing::warn!(
                user = %identity.username,
                role = %identity.role,
                path = %request.uri().path(),
                "Role check refused request"
            );
            ApiError::forbidden().into_response()
        }
        None => ApiError::unauthenticated().into_response(),
    }
}

/// Peer IP address, or empty when the server was not started with connect
/// info (as in tests).
#[derive(Debug, Clone, Default)]
pub struct ClientAddress(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientAddress {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
                .unwrap_or_default(),
        ))
    }
}

/// The resolved identity plus where the request came from.
#[derive(Debug, Clone)]
pub struct Caller {
    pub identity: Identity,
    pub address: String,
}

impl Caller {
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor::from((&self.identity, self.address.as_str()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(ApiError::unauthenticated)?;
        let Ok(ClientAddress(address)) = ClientAddress::from_request_parts(parts, state).await;
        Ok(Self { identity, address })
    }
}
