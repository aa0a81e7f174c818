use axum::{extract::Query, response::IntoResponse, routing::get, Json};
use http::StatusCode;
use tracing::debug;
use vgapi_dal::game::{CreateGame, Game, GameRepository, UpdateGame};

use crate::{crud_api, error::ApiResult, publish_api_docs, rest_api::paging::GameListQuery};

crud_api!(Game, "videojuegos");

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "", tag = "videojuegos",
    operation_id = "listGame",
    params(GameListQuery),
    responses(
        (status = StatusCode::OK, description = "Games with their manufacturer", body = Vec<Game>),
        (status = StatusCode::BAD_REQUEST, description = "Invalid query", body = crate::error::ErrorBody)
    )))]
pub async fn list(
    repository: EntityRepository,
    Query(query): Query<GameListQuery>,
) -> ApiResult<impl IntoResponse> {
    debug!("Games query: {query:?}");
    let params = query.into_listing_params()?;
    let games: Vec<Game> = repository.list(params).await?;
    Ok((StatusCode::OK, Json(games)))
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
