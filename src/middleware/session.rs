//! Cookie session: load → `Session` を extensions に入れる → 変更があれば保存
//!
//! - Cookie の値は UUID v4 の session id のみ受け付ける (それ以外は新規セッション扱い)
//! - 新規セッションは、何か書き込まれた時だけ保存して Cookie を発行する
//! - rotate されたセッションは新しい id で保存し直し、旧 id を消す (login 時)
//! - store の失敗は 500 (fail-closed)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, header},
    middleware::{self, Next},
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::session::{Session, SessionData};
use crate::state::{AppState, SessionSettings};

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, session_middleware))
}

async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let settings = &state.session;

    let existing = match session_id_from_cookies(req.headers(), &settings.cookie_name) {
        Some(id) => state.sessions.load(&id).await?.map(|data| (id, data)),
        None => None,
    };

    let session = match existing {
        Some((id, data)) => Session::new(id, data, false),
        None => Session::new(Uuid::new_v4().to_string(), SessionData::default(), true),
    };

    req.extensions_mut().insert(session.clone());

    let mut res = next.run(req).await;

    if session.is_destroyed().await {
        if !session.is_new() {
            state.sessions.remove(session.id()).await?;
        }
        append_cookie(&mut res, &expired_cookie(settings))?;
    } else if session.is_dirty().await {
        let rotated = session.is_rotated().await;
        let id = if rotated {
            Uuid::new_v4().to_string()
        } else {
            session.id().to_string()
        };

        state
            .sessions
            .save(&id, &session.data().await, settings.ttl_seconds)
            .await?;

        // 旧 id は login 前に第三者が仕込んだ可能性があるので残さない
        if rotated && !session.is_new() {
            state.sessions.remove(session.id()).await?;
        }

        if session.is_new() || rotated {
            tracing::debug!(rotated, "issuing session cookie");
            append_cookie(&mut res, &session_cookie(settings, &id))?;
        }
    }

    Ok(res)
}

fn session_id_from_cookies(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
        .map(|id| id.to_string())
}

fn session_cookie(settings: &SessionSettings, id: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.cookie_name, id, settings.ttl_seconds
    );
    if settings.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

fn expired_cookie(settings: &SessionSettings) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        settings.cookie_name
    )
}

fn append_cookie(res: &mut Response, cookie: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(cookie).map_err(|err| {
        tracing::error!(error = ?err, "invalid session cookie header");
        AppError::Internal
    })?;
    res.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}
