use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::PathRejection},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::params::double_option;
use crate::{
    db::entities::user,
    error::AppError,
    response::ApiResult,
    routes::guards::{ActiveUser, AdminUser},
    services::{
        ServiceContext,
        user_service::{CreateUserInput, UserUpdateInput},
    },
    state::AppState,
};

/// Public view of an account. The password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub enabled: bool,
    pub isadmin: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub isadmin: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub isadmin: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: Option<u64>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route("/users/me", get(read_self).patch(update_self))
        .route("/users/me/", get(read_self).patch(update_self))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).patch(update_user),
        )
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Vec<UserResponse>> {
    let users = ServiceContext::from_state(state.as_ref())
        .user()
        .list_users(query.offset, query.limit)
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<UserResponse> {
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .create_user(CreateUserInput {
            username: body.username,
            password: body.password,
            full_name: body.full_name,
            email: body.email,
            phone: body.phone,
            enabled: body.enabled,
            isadmin: body.isadmin,
        })
        .await?;
    Ok(Json(user.into()))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    user_id: Result<Path<i32>, PathRejection>,
) -> ApiResult<UserResponse> {
    let user_id = user_path(user_id)?;
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .get_user(user_id)
        .await?;
    Ok(Json(user.into()))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    user_id: Result<Path<i32>, PathRejection>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let user_id = user_path(user_id)?;
    if body.id.is_some_and(|id| id != user_id) {
        return Err(AppError::invalid_input("User id does not match the path"));
    }

    let users = ServiceContext::from_state(state.as_ref()).user();
    // 404 before any hashing work for unknown ids.
    users.get_user(user_id).await?;
    let user = users.update_user(user_id, body.into()).await?;
    Ok(Json(user.into()))
}

async fn read_self(caller: ActiveUser) -> ApiResult<UserResponse> {
    Ok(Json(caller.user.into_inner().into()))
}

async fn update_self(
    State(state): State<Arc<AppState>>,
    caller: ActiveUser,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let claimed_id = body.id;
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .update_self(&caller.user, claimed_id, body.into())
        .await?;
    Ok(Json(user.into()))
}

fn user_path(user_id: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    user_id
        .map(|Path(id)| id)
        .map_err(|_| AppError::invalid_input("Invalid user id"))
}

impl From<UpdateUserRequest> for UserUpdateInput {
    fn from(body: UpdateUserRequest) -> Self {
        Self {
            username: body.username,
            password: body.password,
            full_name: body.full_name,
            email: body.email,
            phone: body.phone,
            enabled: body.enabled,
            isadmin: body.isadmin,
        }
    }
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            enabled: user.enabled,
            isadmin: user.isadmin,
        }
    }
}
