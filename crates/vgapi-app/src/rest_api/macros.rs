/// Generates `crud_api` module with get, create, update and delete handlers for entity.
///
/// Expects `<Entity>Repository`, `Create<Entity>` and `Update<Entity>` to be in scope
/// of the calling module. Listing is left to the calling module, because each entity
/// is listed differently.
#[macro_export]
macro_rules! crud_api {
    ($entity:ty, $tag:literal) => {
        type EntityRepository = paste::paste! {[<$entity Repository>]};
        $crate::repository_from_request!(EntityRepository);
        pub mod crud_api {
            use super::*;
            use $crate::error::{ApiError, ApiResult};
            use $crate::rest_api::{id::EntityId, StatusMessage};
            use $crate::validate::Garde;
            use axum::{response::IntoResponse, Json};
            use http::StatusCode;
            use tracing::{debug, info};

            type CreateEntity = paste::paste! {[<Create $entity>]};
            type UpdateEntity = paste::paste! {[<Update $entity>]};

            #[cfg_attr(feature = "openapi", utoipa::path(get, path = "/{id}", tag = $tag,
                operation_id = concat!("get", stringify!($entity)),
                params(("id" = String, Path, description = "Positive integer id")),
                responses(
                    (status = StatusCode::OK, description = "Record with related data", body = $entity),
                    (status = StatusCode::BAD_REQUEST, description = "Invalid id", body = $crate::error::ErrorBody),
                    (status = StatusCode::NOT_FOUND, description = "Record not found", body = $crate::error::ErrorBody)
                )))]
            pub async fn get(
                EntityId(id): EntityId,
                repository: EntityRepository,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.get(id).await?;

                Ok((StatusCode::OK, Json(record)))
            }

            #[cfg_attr(feature = "openapi", utoipa::path(post, path = "", tag = $tag,
                operation_id = concat!("create", stringify!($entity)),
                request_body = CreateEntity,
                responses(
                    (status = StatusCode::OK, description = "Record created", body = StatusMessage),
                    (status = StatusCode::BAD_REQUEST, description = "Invalid payload", body = $crate::error::ErrorBody)
                )))]
            pub async fn create(
                repository: EntityRepository,
                Garde(Json(payload)): Garde<Json<CreateEntity>>,
            ) -> ApiResult<impl IntoResponse> {
                let record = repository.create(payload).await?;
                info!("Created {} {}", stringify!($entity), record.id);

                Ok((StatusCode::OK, Json(StatusMessage::created(record.id))))
            }

            #[cfg_attr(feature = "openapi", utoipa::path(put, path = "/{id}", tag = $tag,
                operation_id = concat!("update", stringify!($entity)),
                params(("id" = String, Path, description = "Positive integer id")),
                request_body = UpdateEntity,
                responses(
                    (status = StatusCode::OK, description = "Record updated", body = StatusMessage),
                    (status = StatusCode::BAD_REQUEST, description = "Invalid id or payload", body = $crate::error::ErrorBody),
                    (status = StatusCode::NOT_FOUND, description = "Record not found or nothing changed", body = $crate::error::ErrorBody)
                )))]
            pub async fn update(
                EntityId(id): EntityId,
                repository: EntityRepository,
                Garde(Json(payload)): Garde<Json<UpdateEntity>>,
            ) -> ApiResult<impl IntoResponse> {
                let changed = repository.update(id, payload).await?;
                if changed == 0 {
                    debug!("Update of {} {id} changed nothing", stringify!($entity));
                    return Err(ApiError::NoChanges);
                }
                info!("Updated {} {id}", stringify!($entity));

                Ok((StatusCode::OK, Json(StatusMessage::updated())))
            }

            #[cfg_attr(feature = "openapi", utoipa::path(delete, path = "/{id}", tag = $tag,
                operation_id = concat!("delete", stringify!($entity)),
                params(("id" = String, Path, description = "Positive integer id")),
                responses(
                    (status = StatusCode::OK, description = "Record deleted", body = StatusMessage),
                    (status = StatusCode::BAD_REQUEST, description = "Invalid id", body = $crate::error::ErrorBody),
                    (status = StatusCode::NOT_FOUND, description = "Record not found", body = $crate::error::ErrorBody),
                    (status = StatusCode::CONFLICT, description = "Record is still referenced", body = $crate::error::ErrorBody)
                )))]
            pub async fn delete(
                EntityId(id): EntityId,
                repository: EntityRepository,
            ) -> ApiResult<impl IntoResponse> {
                repository.delete(id).await?;
                info!("Deleted {} {id}", stringify!($entity));

                Ok((StatusCode::OK, Json(StatusMessage::deleted())))
            }

            #[cfg(feature = "openapi")]
            #[derive(utoipa::OpenApi)]
            #[openapi(paths(get, create, update, delete))]
            struct ApiDocs;

            #[cfg(feature = "openapi")]
            pub(super) fn api_docs() -> utoipa::openapi::OpenApi {
                use utoipa::OpenApi as _;
                ApiDocs::openapi()
            }
        }
    };
}

#[macro_export]
macro_rules! publish_api_docs {
    ($($end_point:path),+) => {
        #[cfg(feature = "openapi")]
        #[derive(utoipa::OpenApi)]
        #[openapi(paths($($end_point),+))]
        struct ModuleDocs;

        #[cfg(feature = "openapi")]
        pub fn api_docs() -> utoipa::openapi::OpenApi {
            use utoipa::OpenApi as _;
            let docs = ModuleDocs::openapi();
            docs.merge_from(crud_api::api_docs())
        }
    };
}
