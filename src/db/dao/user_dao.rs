use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub enabled: bool,
    pub isadmin: bool,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub full_name: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub enabled: Option<bool>,
    pub isadmin: Option<bool>,
    pub password_hash: Option<String>,
}

impl UserDao {
    pub async fn find_by_username(&self, username: &str) -> DaoResult<Option<user::Model>> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    pub async fn list_users(&self, offset: u64, limit: u64) -> DaoResult<Vec<user::Model>> {
        self.find(offset, limit, (user::Column::Id, Order::Asc), |query| query)
            .await
    }

    pub async fn create_user(&self, new_user: NewUser) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            username: Set(new_user.username),
            full_name: Set(new_user.full_name),
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            enabled: Set(new_user.enabled),
            isadmin: Set(new_user.isadmin),
            password_hash: Set(new_user.password_hash),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_user(&self, id: i32, changes: UserChanges) -> DaoResult<user::Model> {
        self.update(id, move |active| {
            if let Some(username) = changes.username {
                active.username = Set(username);
            }
            if let Some(full_name) = changes.full_name {
                active.full_name = Set(full_name);
            }
            if let Some(email) = changes.email {
                active.email = Set(email);
            }
            if let Some(phone) = changes.phone {
                active.phone = Set(phone);
            }
            if let Some(enabled) = changes.enabled {
                active.enabled = Set(enabled);
            }
            if let Some(isadmin) = changes.isadmin {
                active.isadmin = Set(isadmin);
            }
            if let Some(password_hash) = changes.password_hash {
                active.password_hash = Set(password_hash);
            }
        })
        .await
    }
}
