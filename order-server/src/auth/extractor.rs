//! Request context extractor

use axum::{extract::FromRequestParts, http::request::Parts};

use super::RequestContext;
use crate::utils::AppError;

pub const ACTOR_HEADER: &str = "x-actor-id";
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(ctx.clone());
        }

        let actor_id = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                tracing::warn!(uri = %parts.uri, "Request without actor identity");
                AppError::Unauthorized
            })?;

        // First hop of x-forwarded-for is the original client
        let client_ip = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let ctx = RequestContext {
            actor_id: actor_id.to_string(),
            client_ip,
        };
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
