use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use serde_json::Value;

/// `visualizations` field of the provider's `/api` body, validated.
#[derive(Debug, Clone)]
pub struct Visualizations(pub Value);

/// Provider's `/api/<title>` body, validated.
#[derive(Debug, Clone)]
pub struct VisualizationItem(pub Value);

// augment middleware が extensions に insert 済みである前提
// 見つからない場合は 500 (route に middleware が掛かっていない = 配線ミス)

impl<S> FromRequestParts<S> for Visualizations
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Visualizations>().cloned().ok_or_else(|| {
            tracing::error!("Visualizations requested on a route without populate_visualization_list");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

impl<S> FromRequestParts<S> for VisualizationItem
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VisualizationItem>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("VisualizationItem requested on a route without populate_visualization");
                StatusCode::INTERNAL_SERVER_ERROR
            })
    }
}
