use std::sync::Arc;

use axum::{Form, Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::{
    response::ApiResult,
    services::{ServiceContext, auth_service::AccessToken},
    state::AppState,
};

/// OAuth2 password-grant style form. Extra fields such as `grant_type` and
/// `scope` are accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/token", post(issue_token))
        .route("/token/", post(issue_token))
}

async fn issue_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenForm>,
) -> ApiResult<AccessToken> {
    let token = ServiceContext::from_state(state.as_ref())
        .auth(state.as_ref())
        .login(&form.username, &form.password)
        .await?;
    Ok(Json(token))
}
