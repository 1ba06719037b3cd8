//! JSON API mirroring the HTML pages

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::{PageQuery, ValidPage};
use crate::http::server::AppState;
use crate::pages::{self, FilterOptions, PageView};

/// GET /api/pages/{slug}
async fn page_json(
    State(state): State<Arc<AppState>>,
    ValidPage(page): ValidPage,
    PageQuery(request): PageQuery,
) -> Result<Json<PageView>, ApiError> {
    Ok(Json(pages::build(&state.db, page, &request).await?))
}

/// GET /api/filters
async fn filters(State(state): State<Arc<AppState>>) -> Result<Json<FilterOptions>, ApiError> {
    Ok(Json(pages::filter_options(&state.db).await?))
}

/// API routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/pages/{slug}", get(page_json))
        .route("/api/filters", get(filters))
}
