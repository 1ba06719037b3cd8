//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use bolsactl_core::Page;

use super::error::ApiError;
use crate::pages::PageRequest;

/// Extract a known page from its path slug
pub struct ValidPage(pub Page);

impl<S> FromRequestParts<S> for ValidPage
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(slug): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound {
                resource: "page",
                id: String::new(),
            })?;

        Page::from_slug(&slug)
            .map(Self)
            .ok_or(ApiError::NotFound { resource: "page", id: slug })
    }
}

/// Filters and page controls from the query string.
///
/// `axum::extract::Query` cannot collect repeated keys (`uf=SP&uf=RJ`), so
/// the raw query is decoded here.
pub struct PageQuery(pub PageRequest);

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request = PageRequest::from_query(parts.uri.query())?;
        Ok(Self(request))
    }
}
