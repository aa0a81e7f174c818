use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

pub const INVALID_ID_MESSAGE: &str = "El ID debe ser un número entero mayor a 0.";
pub const NO_CHANGES_MESSAGE: &str =
    "No se modifico el registro / no se encontraron nuevos cambios.";
const STORE_ERROR_MESSAGE: &str = "Error al acceder a la base de datos.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", INVALID_ID_MESSAGE)]
    InvalidId,

    #[error("{0}")]
    InvalidQuery(String),

    #[error("{0}")]
    InvalidBody(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{}", NO_CHANGES_MESSAGE)]
    NoChanges,

    #[error("{0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(vgapi_dal::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Store,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub message: String,
    pub kind: ErrorKind,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidId | ApiError::InvalidQuery(_) | ApiError::InvalidBody(_) => {
                ErrorKind::Validation
            }
            ApiError::NotFound(_) | ApiError::NoChanges => ErrorKind::NotFound,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Store(_) => ErrorKind::Store,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<vgapi_dal::Error> for ApiError {
    fn from(err: vgapi_dal::Error) -> Self {
        use vgapi_dal::Error;
        match err {
            Error::RecordNotFound(entity) => ApiError::NotFound(format!("{entity} no encontrado.")),
            Error::InvalidReference(msg) => ApiError::InvalidBody(msg),
            e @ (Error::InvalidOrderByField(_) | Error::InvalidFilterField(_)) => {
                ApiError::InvalidQuery(e.to_string())
            }
            Error::Restricted {
                entity,
                id,
                dependants,
            } => ApiError::Conflict(format!(
                "{entity} {id} tiene {dependants} videojuego(s) asociado(s), no se puede borrar."
            )),
            e => ApiError::Store(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            ApiError::Store(e) => {
                error!("Store error: {e}");
                STORE_ERROR_MESSAGE.to_string()
            }
            other => {
                debug!("Request rejected ({status}): {other}");
                other.to_string()
            }
        };
        let body = ErrorBody {
            message,
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dal_error_mapping() {
        let err: ApiError = vgapi_dal::Error::RecordNotFound("Videojuego".into()).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Videojuego no encontrado.");

        let err: ApiError = vgapi_dal::Error::Restricted {
            entity: "Fabricante".into(),
            id: 1,
            dependants: 2,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = vgapi_dal::Error::InvalidReference("Fabricante 9 no existe".into()).into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: ApiError = vgapi_dal::Error::DatabaseError(sqlx::Error::PoolClosed).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.kind(), ErrorKind::Store);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::InvalidId.to_string(), INVALID_ID_MESSAGE);
        assert_eq!(ApiError::NoChanges.status_code(), StatusCode::NOT_FOUND);
    }
}
