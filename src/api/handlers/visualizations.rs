/*
 * Responsibility
 * - / (一覧) と /visualizations/{title} (単体)
 * - provider からの取得・検証は augment middleware 済み。ここでは extensions から受け取って返すだけ
 */
use axum::Json;
use serde_json::{Value, json};

use crate::api::extractors::{VisualizationItem, Visualizations};
use crate::services::session::Session;

pub async fn index(session: Session, Visualizations(list): Visualizations) -> Json<Value> {
    let user = session.data().await.user;

    Json(json!({
        "user": user,
        "visualizations": list,
    }))
}

pub async fn show(VisualizationItem(visualization): VisualizationItem) -> Json<Value> {
    Json(json!({ "visualization": visualization }))
}
