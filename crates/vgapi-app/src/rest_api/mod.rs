pub mod game;
pub mod id;
pub mod macros;
pub mod manufacturer;
pub mod paging;

use serde::{Deserialize, Serialize};

pub const CREATED_MESSAGE: &str = "Registro creado correctamente";
pub const UPDATED_MESSAGE: &str = "Registro Actualizado Correctamente";
pub const DELETED_MESSAGE: &str = "Registro Borrado Correctamente";

/// Confirmation body of successful mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl StatusMessage {
    pub fn created(id: i64) -> Self {
        StatusMessage {
            message: CREATED_MESSAGE.to_string(),
            id: Some(id),
        }
    }

    pub fn updated() -> Self {
        StatusMessage {
            message: UPDATED_MESSAGE.to_string(),
            id: None,
        }
    }

    pub fn deleted() -> Self {
        StatusMessage {
            message: DELETED_MESSAGE.to_string(),
            id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_json() {
        let created = serde_json::to_value(StatusMessage::created(3)).unwrap();
        assert_eq!(
            created,
            serde_json::json!({"message": "Registro creado correctamente", "id": 3})
        );
        let deleted = serde_json::to_value(StatusMessage::deleted()).unwrap();
        assert_eq!(
            deleted,
            serde_json::json!({"message": "Registro Borrado Correctamente"})
        );
    }
}
