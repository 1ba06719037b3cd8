//! Browser-facing HTML pages

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::{routing::get, Router};
use tracing::debug;

use crate::http::error::ApiError;
use crate::http::extractors::{PageQuery, ValidPage};
use crate::http::server::AppState;
use crate::pages;
use crate::render;

/// GET / - the overview is the landing page
async fn index() -> Redirect {
    Redirect::to("/overview")
}

/// GET /{slug}
async fn page(
    State(state): State<Arc<AppState>>,
    ValidPage(page): ValidPage,
    PageQuery(request): PageQuery,
) -> Result<Html<String>, ApiError> {
    let view = pages::build(&state.db, page, &request).await?;
    let options = pages::filter_options(&state.db).await?;
    debug!(page = %page, blocks = view.blocks.len(), "rendering page");

    Ok(Html(render::page_html(&view, &options, &request.filters)))
}

/// HTML page routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/{slug}", get(page))
}
