use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{
        auth_service::AuthService, comment_service::CommentService, task_service::TaskService,
        user_service::UserService,
    },
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn task(&self) -> TaskService {
        TaskService::new(self.daos.task(), self.daos.priority())
    }

    pub fn comment(&self) -> CommentService {
        CommentService::new(self.daos.comment())
    }

    pub fn auth<'a>(&self, state: &'a AppState) -> AuthService<'a> {
        AuthService::new(self.user(), &state.jwt, state.config.auth.token_ttl())
    }
}
