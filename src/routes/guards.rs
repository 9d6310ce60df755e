use std::{marker::PhantomData, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    auth::{AdminRole, AuthenticatedUser, IdentityResolver, RequiredRole, UserRole},
    error::AppError,
    state::AppState,
};

// Token -> user -> active check. The result is cached in the request
// extensions so later extractors reuse it.
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(user);
        }

        let user = IdentityResolver::from_state(state.as_ref())
            .authenticate(&parts.headers)
            .await?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

pub struct AuthRoleGuard<R: RequiredRole> {
    pub user: AuthenticatedUser,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for AuthRoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        IdentityResolver::require_role(&user, R::required())?;

        Ok(Self {
            user,
            _marker: PhantomData,
        })
    }
}

/// Any enabled account.
pub type ActiveUser = AuthRoleGuard<UserRole>;
/// Enabled account with the admin flag.
pub type AdminUser = AuthRoleGuard<AdminRole>;
