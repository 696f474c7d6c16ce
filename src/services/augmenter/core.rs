use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::services::{
    augmenter::{
        error::{AugmentError, AugmentResult},
        types::{Credentials, Outcome, RequestContext, Termination},
    },
    provider::{ProviderClient, ProviderResponse},
    validators::Validators,
};

pub const MISSING_CREDENTIALS_MESSAGE: &str =
    "Please provide a username and password in the request body.";
pub const NOT_LOGGED_IN_MESSAGE: &str = "No User found... Please log in.";

pub const LOGIN_PATH: &str = "/auth";
pub const HOME_PATH: &str = "/";

/// Fetches provider data / authenticates users and attaches the results to a
/// `RequestContext`.
///
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Clone)]
pub struct RequestAugmenter {
    provider: Arc<dyn ProviderClient>,
    validators: Arc<dyn Validators>,
}

impl RequestAugmenter {
    pub fn new(provider: Arc<dyn ProviderClient>, validators: Arc<dyn Validators>) -> Self {
        Self {
            provider,
            validators,
        }
    }

    pub async fn provider_get(&self, path: &str) -> AugmentResult<ProviderResponse> {
        self.provider.get(path).await.map_err(|err| {
            tracing::warn!(error = ?err, path, "provider GET failed");
            AugmentError::from(err)
        })
    }

    pub async fn provider_post(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> AugmentResult<ProviderResponse> {
        self.provider.post_form(path, form).await.map_err(|err| {
            tracing::warn!(error = ?err, path, "provider POST failed");
            AugmentError::from(err)
        })
    }

    /// `GET /api` → `ctx.visualizations`
    pub async fn populate_visualization_list(
        &self,
        ctx: &mut RequestContext,
    ) -> AugmentResult<Outcome> {
        // TODO: cache the list per user.
        let res = self.provider_get("/api").await?;

        let verdict = self.validators.list(&res.body);
        if !verdict.valid {
            tracing::warn!(status = res.status, ?verdict, "visualization list rejected");
            return Err(AugmentError::Validation { verdict });
        }

        ctx.visualizations = Some(
            res.body
                .get("visualizations")
                .cloned()
                .unwrap_or(Value::Null),
        );
        Ok(Outcome::Continue)
    }

    /// `GET /api/<title>` → `ctx.visualization`. Without a title, redirects home.
    pub async fn populate_visualization(
        &self,
        ctx: &mut RequestContext,
        title: Option<&str>,
    ) -> AugmentResult<Outcome> {
        let Some(title) = title.filter(|t| !t.is_empty()) else {
            return Ok(Outcome::Terminated(Termination::redirect(HOME_PATH)));
        };

        let res = self.provider_get(&visualization_path(title)).await?;

        let verdict = self.validators.item(&res.body);
        if !verdict.valid {
            tracing::warn!(title, status = res.status, ?verdict, "visualization rejected");
            return Err(AugmentError::Validation { verdict });
        }

        ctx.visualization = Some(res.body);
        Ok(Outcome::Continue)
    }

    /// `POST /auth` with the credentials; stores the provider's user on the session.
    pub async fn authenticate_user(
        &self,
        ctx: &mut RequestContext,
        credentials: &Credentials,
    ) -> AugmentResult<Outcome> {
        let Some(session) = ctx.session.as_mut() else {
            tracing::warn!("authenticate_user called without a session");
            return Ok(Outcome::Terminated(Termination::unauthorized(LOGIN_PATH)));
        };

        if credentials.is_empty() {
            session.message = Some(MISSING_CREDENTIALS_MESSAGE.to_string());
            return Ok(Outcome::Terminated(Termination::unauthorized(LOGIN_PATH)));
        }

        let mut form = Vec::with_capacity(2);
        if let Some(username) = credentials.username() {
            form.push(("username", username));
        }
        if let Some(password) = credentials.password() {
            form.push(("password", password));
        }

        let res = self.provider_post("/auth", &form).await?;
        tracing::info!(status = res.status, "provider authentication response");

        if res.is_ok() {
            session.user = Some(res.body);
            session.message = None;
            session.authenticated_at = Some(Utc::now());
            Ok(Outcome::Continue)
        } else {
            session.message = error_message(&res.body);
            Ok(Outcome::Terminated(Termination::unauthorized(LOGIN_PATH)))
        }
    }

    /// Lets the request through only when the session carries a user.
    pub fn check_authentication(&self, ctx: &mut RequestContext) -> Outcome {
        match ctx.session.as_mut() {
            Some(session) if session.user.is_some() => Outcome::Continue,
            Some(session) => {
                session.message = Some(NOT_LOGGED_IN_MESSAGE.to_string());
                Outcome::Terminated(Termination::unauthorized(LOGIN_PATH))
            }
            None => Outcome::Terminated(Termination::unauthorized(LOGIN_PATH)),
        }
    }
}

/// `/api/<title>` with the title encoded as one path segment.
pub fn visualization_path(title: &str) -> String {
    // byte_serialize は空白を `+` にするので path 用に `%20` へ戻す (`+` 自体は `%2B` になる)
    let encoded: String = url::form_urlencoded::byte_serialize(title.as_bytes()).collect();
    format!("/api/{}", encoded.replace('+', "%20"))
}

fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
