use axum::{response::IntoResponse, routing::get, Json};
use http::StatusCode;
use vgapi_dal::manufacturer::{
    CreateManufacturer, Manufacturer, ManufacturerRepository, UpdateManufacturer,
};

use crate::{crud_api, error::ApiResult, publish_api_docs};

crud_api!(Manufacturer, "fabricantes");

/// All manufacturers, each with its games
#[cfg_attr(feature = "openapi", utoipa::path(get, path = "", tag = "fabricantes",
    operation_id = "listManufacturer",
    responses((status = StatusCode::OK, description = "Manufacturers with their games", body = Vec<Manufacturer>))))]
pub async fn list(repository: EntityRepository) -> ApiResult<impl IntoResponse> {
    let manufacturers: Vec<Manufacturer> = repository.list_all().await?;
    Ok((StatusCode::OK, Json(manufacturers)))
}

publish_api_docs!(list);

pub fn router() -> axum::Router<crate::state::AppState> {
    axum::Router::new()
        .route("/", get(list).post(crud_api::create))
        .route(
            "/{id}",
            get(crud_api::get)
                .put(crud_api::update)
                .delete(crud_api::delete),
        )
}
