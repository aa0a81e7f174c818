use axum::extract::{FromRequest, Request};
use garde::Validate;
use std::fmt::Display;
use std::ops::Deref;
use tracing::debug;

use crate::error::ApiError;

/// Extractor wrapper which validates extracted payload with garde.
///
/// Both failure of inner extractor (malformed JSON, unknown enum value ...) and
/// failed validation are reported as [`ApiError::InvalidBody`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<S, Extractor, T> FromRequest<S> for Garde<Extractor>
where
    S: Send + Sync,
    T: Validate<Context = ()>,
    Extractor: Deref<Target = T> + FromRequest<S>,
    <Extractor as FromRequest<S>>::Rejection: Display,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request(req, state).await.map_err(|e| {
            debug!("Invalid request body: {e}");
            ApiError::InvalidBody(e.to_string())
        })?;

        inner.deref().validate().map_err(|report| {
            debug!("Request body validation failed: {report}");
            ApiError::InvalidBody(report.to_string())
        })?;
        Ok(Garde(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, Json};
    use vgapi_dal::manufacturer::CreateManufacturer;

    fn json_request(body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_garde_extractor() {
        let Garde(Json(payload)) =
            Garde::<Json<CreateManufacturer>>::from_request(json_request(r#"{"name":"Sega"}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name.as_deref(), Some("Sega"));
        assert_eq!(payload.surname, None);

        let long = format!(r#"{{"surname":"{}"}}"#, "s".repeat(256));
        for body in ["{not json", r#"{"name": 5}"#, long.as_str()] {
            let res = Garde::<Json<CreateManufacturer>>::from_request(json_request(body), &()).await;
            assert!(matches!(res, Err(ApiError::InvalidBody(_))), "{body}");
        }
    }
}
