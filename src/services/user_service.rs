use crate::{
    auth::{AuthenticatedUser, password::hash_password},
    db::dao::{DaoBase, NewUser, UserChanges, UserDao},
    db::entities::user,
    error::AppError,
    services::{
        ServiceContext,
        crud_service::{CrudErrors, CrudOp, CrudService},
    },
    state::AppState,
};

pub const DEFAULT_USER_LIMIT: u64 = 100;

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub enabled: bool,
    pub isadmin: bool,
}

/// Partial update; `None` keeps the stored value. The password is hashed
/// before it reaches storage.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub enabled: Option<bool>,
    pub isadmin: Option<bool>,
}

#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub fn from_state(state: &AppState) -> Self {
        ServiceContext::from_state(state).user()
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, AppError> {
        self.user_dao
            .find_by_username(username)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    pub async fn list_users(
        &self,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<user::Model>, AppError> {
        self.user_dao
            .list_users(offset, limit.unwrap_or(DEFAULT_USER_LIMIT))
            .await
            .map_err(|err| self.map_error(CrudOp::List, err))
    }

    pub async fn get_user(&self, id: i32) -> Result<user::Model, AppError> {
        self.user_dao
            .find_by_id(id)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, err))
    }

    pub async fn create_user(&self, input: CreateUserInput) -> Result<user::Model, AppError> {
        let username = normalize_username(&input.username)?;
        let password_hash = hash_password(&input.password)?;
        self.user_dao
            .create_user(NewUser {
                username,
                full_name: normalize_optional(input.full_name),
                email: normalize_optional(input.email),
                phone: normalize_optional(input.phone),
                enabled: input.enabled,
                isadmin: input.isadmin,
                password_hash,
            })
            .await
            .map_err(|err| self.map_error(CrudOp::Create, err))
    }

    pub async fn update_user(
        &self,
        id: i32,
        input: UserUpdateInput,
    ) -> Result<user::Model, AppError> {
        let changes = UserChanges {
            username: input.username.as_deref().map(normalize_username).transpose()?,
            password_hash: input.password.as_deref().map(hash_password).transpose()?,
            full_name: input.full_name.map(normalize_optional),
            email: input.email.map(normalize_optional),
            phone: input.phone.map(normalize_optional),
            enabled: input.enabled,
            isadmin: input.isadmin,
        };
        self.user_dao
            .update_user(id, changes)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, err))
    }

    /// Self-service update. `claimed_id` is the id the client put in the
    /// body, if any; it must match the caller. Only admins may change their
    /// own `enabled`/`isadmin` flags.
    pub async fn update_self(
        &self,
        caller: &AuthenticatedUser,
        claimed_id: Option<i32>,
        input: UserUpdateInput,
    ) -> Result<user::Model, AppError> {
        let current = &caller.0;
        if claimed_id.is_some_and(|id| id != current.id) {
            return Err(AppError::invalid_input("Cannot update another user's record"));
        }

        let changes_flags = input.enabled.is_some_and(|enabled| enabled != current.enabled)
            || input.isadmin.is_some_and(|isadmin| isadmin != current.isadmin);
        if changes_flags && !current.isadmin {
            tracing::warn!(username = %current.username, "self-service flag change rejected");
            return Err(AppError::forbidden());
        }

        self.update_user(current.id, input).await
    }

    /// Creates the bootstrap admin unless an account with that username
    /// already exists. Returns whether a row was inserted.
    pub async fn ensure_superuser(&self, username: &str, password: &str) -> Result<bool, AppError> {
        if let Some(existing) = self.find_by_username(username).await? {
            if !existing.isadmin {
                tracing::warn!(%username, "superuser account exists without admin flag");
            }
            return Ok(false);
        }

        self.create_user(CreateUserInput {
            username: username.to_string(),
            password: password.to_string(),
            full_name: None,
            email: None,
            phone: None,
            enabled: true,
            isadmin: true,
        })
        .await?;
        Ok(true)
    }
}

impl CrudService for UserService {
    fn errors(&self) -> CrudErrors {
        CrudErrors {
            not_found: "User not found",
            ..CrudErrors::default()
        }
    }
}

fn normalize_username(username: &str) -> Result<String, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::invalid_input("Username must not be empty"));
    }
    Ok(username.to_string())
}

/// Blank optional strings are stored as absent so they never collide on the
/// unique email/phone indexes.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::{UserService, UserUpdateInput, normalize_optional};
    use crate::{
        auth::AuthenticatedUser,
        db::dao::{DaoBase, UserDao},
        db::entities::user,
        error::AppError,
    };

    fn caller(isadmin: bool) -> AuthenticatedUser {
        let now = Utc::now().fixed_offset();
        AuthenticatedUser(user::Model {
            id: 5,
            created_at: now,
            updated_at: now,
            username: "bob".to_string(),
            full_name: None,
            email: None,
            phone: None,
            enabled: true,
            isadmin,
            password_hash: "hash".to_string(),
        })
    }

    fn service() -> UserService {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        UserService::new(UserDao::new(&db))
    }

    #[tokio::test]
    async fn update_self_rejects_mismatched_id() {
        let err = service()
            .update_self(&caller(false), Some(6), UserUpdateInput::default())
            .await
            .expect_err("mismatched id");
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn non_admin_cannot_promote_themselves() {
        let input = UserUpdateInput {
            isadmin: Some(true),
            ..Default::default()
        };
        let err = service()
            .update_self(&caller(false), Some(5), input)
            .await
            .expect_err("promotion should fail");
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_storage() {
        let input = UserUpdateInput {
            password: Some("abc".to_string()),
            ..Default::default()
        };
        let err = service()
            .update_user(5, input)
            .await
            .expect_err("short password");
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn blank_optional_values_become_absent() {
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" a@b.c ".to_string())),
            Some("a@b.c".to_string())
        );
        assert_eq!(normalize_optional(None), None);
    }
}
