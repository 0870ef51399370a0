//! Request extractors
//!
//! Identity comes from the `x-user-id` header set by the upstream identity
//! proxy. Session and token handling live outside this service.

use axum::{extract::FromRequestParts, http::request::Parts};
use wo_core::traits::Id;

use crate::error::ApiError;

/// The authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub id: Id,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Not signed in. Log in to continue."))?;

        let id: Id = header
            .parse()
            .map_err(|_| ApiError::unauthorized("Invalid user identity header"))?;

        Ok(AuthenticatedUser { id })
    }
}
