use axum::extract::{FromRequestParts, Path};
use http::request::Parts;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// True only for non-empty string of ASCII digits with value greater than zero
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && id.bytes().any(|b| b != b'0')
}

pub fn parse_id(id: &str) -> ApiResult<i64> {
    if !is_valid_id(id) {
        return Err(ApiError::InvalidId);
    }
    // digits only, so the only possible failure is overflow
    id.parse::<i64>().map_err(|_| ApiError::InvalidId)
}

/// Record id taken from `{id}` path segment, rejected with 400 unless it is a positive integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                debug!("Cannot extract id from path: {e}");
                ApiError::InvalidId
            })?;
        parse_id(&raw).map(EntityId)
    }
}
