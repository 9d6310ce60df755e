use axum::http::{HeaderMap, header};

use super::{Claims, JwtKeys, Role, jwt::verify_token};
use crate::{
    db::entities::user, error::AppError, services::user_service::UserService, state::AppState,
};

/// A user that passed token validation, lookup and the active check.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub user::Model);

impl AuthenticatedUser {
    pub fn role(&self) -> Role {
        Role::of(self.0.isadmin)
    }

    pub fn into_inner(self) -> user::Model {
        self.0
    }
}

/// Turns a request's bearer token into an authenticated user. Stages run in a
/// fixed order and each one short-circuits on failure:
/// token -> claims -> user -> active -> role.
pub struct IdentityResolver<'a> {
    keys: &'a JwtKeys,
    users: UserService,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(keys: &'a JwtKeys, users: UserService) -> Self {
        Self { keys, users }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(&state.jwt, UserService::from_state(state))
    }

    pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

        match value.trim().split_once(' ') {
            Some((scheme, token))
                if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
            {
                Ok(token.trim())
            }
            _ => Err(AppError::unauthorized("Not authenticated")),
        }
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        verify_token(self.keys, token).map_err(|err| {
            tracing::debug!(error = %err, "rejected bearer token");
            AppError::from(err)
        })
    }

    /// Unknown subjects get the same 401 as a bad token.
    pub async fn load_user(&self, claims: &Claims) -> Result<user::Model, AppError> {
        self.users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(AppError::invalid_credentials)
    }

    pub fn require_active(user: user::Model) -> Result<AuthenticatedUser, AppError> {
        if !user.enabled {
            tracing::warn!(username = %user.username, "inactive account rejected");
            return Err(AppError::inactive());
        }
        Ok(AuthenticatedUser(user))
    }

    pub fn require_role(user: &AuthenticatedUser, required: Role) -> Result<(), AppError> {
        if !user.role().grants(required) {
            tracing::warn!(
                username = %user.0.username,
                required = required.as_str(),
                "insufficient role"
            );
            return Err(AppError::forbidden());
        }
        Ok(())
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AppError> {
        let token = Self::bearer_token(headers)?;
        let claims = self.validate(token)?;
        let user = self.load_user(&claims).await?;
        Self::require_active(user)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};
    use chrono::Utc;

    use super::{AuthenticatedUser, IdentityResolver};
    use crate::{auth::Role, db::entities::user, error::AppError};

    fn user(enabled: bool, isadmin: bool) -> user::Model {
        let now = Utc::now().fixed_offset();
        user::Model {
            id: 1,
            created_at: now,
            updated_at: now,
            username: "alice".to_string(),
            full_name: None,
            email: None,
            phone: None,
            enabled,
            isadmin,
            password_hash: "hash".to_string(),
        }
    }

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn bearer_token_accepts_any_scheme_case() {
        assert_eq!(
            IdentityResolver::bearer_token(&headers("Bearer abc")).ok(),
            Some("abc")
        );
        assert_eq!(
            IdentityResolver::bearer_token(&headers("bearer abc")).ok(),
            Some("abc")
        );
    }

    #[test]
    fn bearer_token_rejects_missing_or_foreign_schemes() {
        assert!(matches!(
            IdentityResolver::bearer_token(&HeaderMap::new()),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            IdentityResolver::bearer_token(&headers("Basic abc")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            IdentityResolver::bearer_token(&headers("Bearer ")),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn disabled_accounts_fail_the_active_check() {
        let err = IdentityResolver::require_active(user(false, true)).expect_err("inactive");
        assert!(matches!(err, AppError::InactiveAccount(_)));
    }

    #[test]
    fn role_check_runs_on_active_users() {
        let admin = AuthenticatedUser(user(true, true));
        let regular = AuthenticatedUser(user(true, false));

        assert!(IdentityResolver::require_role(&admin, Role::Admin).is_ok());
        assert!(IdentityResolver::require_role(&regular, Role::User).is_ok());
        assert!(matches!(
            IdentityResolver::require_role(&regular, Role::Admin),
            Err(AppError::Forbidden(_))
        ));
    }
}
