/*
 * Responsibility
 * - URL 構造を定義
 * - どの route にどの augment middleware を掛けるかをここで決める
 *   - `/`, `/visualizations[/{title}]`: check_authentication → populate_visualization[_list]
 *   - POST `/auth`: authenticate_user
 * - session middleware は app.rs 側で全体に掛ける (/health 以外)
 */
use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::api::handlers::{
    auth::{login, login_page, logout},
    visualizations::{index, show},
};
use crate::middleware::augment;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/",
            get(index.layer(from_fn_with_state(
                state.clone(),
                augment::populate_visualization_list,
            ))),
        )
        // title 無しは populate_visualization が `/` へ redirect する
        .route(
            "/visualizations",
            get(show.layer(from_fn_with_state(
                state.clone(),
                augment::populate_visualization,
            ))),
        )
        .route(
            "/visualizations/{title}",
            get(show.layer(from_fn_with_state(
                state.clone(),
                augment::populate_visualization,
            ))),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            augment::check_authentication,
        ));

    let auth = Router::new()
        .route(
            "/auth",
            get(login_page).post(
                login
                    .layer(from_fn_with_state(
                        state.clone(),
                        augment::authenticate_user,
                    ))
                    .layer(DefaultBodyLimit::max(state.body_limit)),
            ),
        )
        .route("/logout", post(logout));

    Router::new().merge(protected).merge(auth)
}
