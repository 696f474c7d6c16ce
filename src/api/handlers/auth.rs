/*
 * Responsibility
 * - /auth (login page 用の情報 / login 完了後の redirect) と /logout
 * - provider への認証そのものは augment::authenticate_user middleware の責務
 */
use axum::{
    Json,
    response::{IntoResponse, Redirect},
};
use serde_json::json;

use crate::services::session::Session;

/// GET /auth: flash message を取り出して返す (表示したら消える)
pub async fn login_page(session: Session) -> impl IntoResponse {
    let message = session.take_message().await;
    let authenticated = session.data().await.user.is_some();

    Json(json!({
        "message": message,
        "authenticated": authenticated,
    }))
}

/// POST /auth: authenticate_user を通過した = session.user が入っている
pub async fn login() -> Redirect {
    Redirect::to("/")
}

/// POST /logout
pub async fn logout(session: Session) -> Redirect {
    session.destroy().await;
    Redirect::to("/auth")
}
