//! RequestAugmenter の各操作を route 単位の middleware として動かす
//!
//! 使い方 (route_layer / Handler::layer で個別に掛ける):
//! ```ignore
//! get(index).layer(middleware::from_fn_with_state(state.clone(), augment::populate_visualization_list))
//! ```
//!
//! Flow per request:
//! - `Session` (session middleware が入れたもの) から RequestContext を組み立てる
//! - augmenter を実行
//! - session の変更を書き戻す
//! - Continue なら結果を extensions に載せて next、Terminated ならそのレスポンスを返す

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, RawPathParams, State, rejection::RawPathParamsRejection},
    http::{HeaderMap, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::extractors::{VisualizationItem, Visualizations};
use crate::error::AppError;
use crate::services::augmenter::{Credentials, Outcome, RequestContext};
use crate::services::session::Session;
use crate::state::AppState;

pub async fn populate_visualization_list(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let session = req.extensions().get::<Session>().cloned();
    let mut ctx = context_for(session.as_ref()).await;

    let outcome = state.augmenter.populate_visualization_list(&mut ctx).await?;
    write_back(session.as_ref(), &ctx).await;

    if let Outcome::Terminated(termination) = outcome {
        return Ok(termination.into_response());
    }

    if let Some(list) = ctx.visualizations {
        req.extensions_mut().insert(Visualizations(list));
    }
    Ok(next.run(req).await)
}

pub async fn populate_visualization(
    State(state): State<AppState>,
    params: Result<RawPathParams, RawPathParamsRejection>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let title = params.ok().and_then(|params| {
        params
            .iter()
            .find(|(name, _)| *name == "title")
            .map(|(_, value)| value.to_string())
    });

    let session = req.extensions().get::<Session>().cloned();
    let mut ctx = context_for(session.as_ref()).await;

    let outcome = state
        .augmenter
        .populate_visualization(&mut ctx, title.as_deref())
        .await?;
    write_back(session.as_ref(), &ctx).await;

    if let Outcome::Terminated(termination) = outcome {
        return Ok(termination.into_response());
    }

    if let Some(item) = ctx.visualization {
        req.extensions_mut().insert(VisualizationItem(item));
    }
    Ok(next.run(req).await)
}

pub async fn authenticate_user(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // body は一度読むと消えるので、読んだ bytes で request を作り直して next に渡す
    // 上限は route 側の DefaultBodyLimit (state.body_limit)
    let (parts, body) = req.into_parts();
    let bytes = Bytes::from_request(Request::from_parts(parts.clone(), body), &state)
        .await
        .map_err(|rejection| {
            tracing::warn!(error = ?rejection, "failed to read login body");
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge
            } else {
                AppError::bad_request("INVALID_BODY", "request body could not be read")
            }
        })?;
    let credentials = parse_credentials(&parts.headers, &bytes)?;
    let req = Request::from_parts(parts, Body::from(bytes));

    let session = req.extensions().get::<Session>().cloned();
    let mut ctx = context_for(session.as_ref()).await;

    let outcome = state
        .augmenter
        .authenticate_user(&mut ctx, &credentials)
        .await?;
    write_back(session.as_ref(), &ctx).await;

    match outcome {
        Outcome::Continue => {
            if let Some(session) = &session {
                session.rotate().await;
            }
            Ok(next.run(req).await)
        }
        Outcome::Terminated(termination) => Ok(termination.into_response()),
    }
}

pub async fn check_authentication(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let session = req.extensions().get::<Session>().cloned();
    let mut ctx = context_for(session.as_ref()).await;

    let outcome = state.augmenter.check_authentication(&mut ctx);
    write_back(session.as_ref(), &ctx).await;

    match outcome {
        Outcome::Continue => next.run(req).await,
        Outcome::Terminated(termination) => termination.into_response(),
    }
}

async fn context_for(session: Option<&Session>) -> RequestContext {
    match session {
        Some(session) => RequestContext::new(Some(session.data().await)),
        None => RequestContext::new(None),
    }
}

async fn write_back(session: Option<&Session>, ctx: &RequestContext) {
    if let (Some(session), Some(data)) = (session, ctx.session.as_ref()) {
        session.replace(data.clone()).await;
    }
}

/// `application/json` か `application/x-www-form-urlencoded` の body から credentials を読む。
///
/// JSON で username / password が文字列以外 (数値など) の場合は 400。
fn parse_credentials(headers: &HeaderMap, bytes: &[u8]) -> Result<Credentials, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Credentials::default());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        return serde_json::from_slice(bytes).map_err(|err| {
            tracing::warn!(error = ?err, "invalid login json");
            AppError::bad_request("INVALID_BODY", "invalid json body")
        });
    }

    let mut credentials = Credentials::default();
    for (key, value) in url::form_urlencoded::parse(bytes) {
        match key.as_ref() {
            "username" => credentials.username = Some(value.into_owned()),
            "password" => credentials.password = Some(value.into_owned()),
            _ => {}
        }
    }
    Ok(credentials)
}
