use std::time::Duration;

use serde::Serialize;

use crate::{
    auth::{
        JwtKeys,
        jwt::issue_token,
        password::{verify_dummy_password, verify_password},
    },
    error::AppError,
    services::user_service::UserService,
};

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Exchanges a username and password for a bearer token.
pub struct AuthService<'a> {
    users: UserService,
    keys: &'a JwtKeys,
    ttl: Duration,
}

impl<'a> AuthService<'a> {
    pub fn new(users: UserService, keys: &'a JwtKeys, ttl: Duration) -> Self {
        Self { users, keys, ttl }
    }

    /// Unknown usernames and wrong passwords fail the same way and take the
    /// same argon2 work. The enabled flag is not checked here; inactive
    /// accounts are stopped when the token is used.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            verify_dummy_password(password);
            tracing::warn!(%username, "login failed: unknown user");
            return Err(AppError::bad_login());
        };

        if !verify_password(password, &user.password_hash) {
            tracing::warn!(%username, "login failed: wrong password");
            return Err(AppError::bad_login());
        }

        let access_token = issue_token(self.keys, &user.username, self.ttl)?;
        tracing::info!(%username, "issued access token");
        Ok(AccessToken {
            access_token,
            token_type: "bearer",
        })
    }
}
