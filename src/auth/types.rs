use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Highest role an account holds; admins are also users.
    pub fn of(isadmin: bool) -> Self {
        if isadmin { Role::Admin } else { Role::User }
    }

    pub fn grants(&self, required: Role) -> bool {
        match required {
            Role::User => true,
            Role::Admin => matches!(self, Role::Admin),
        }
    }
}

pub trait RequiredRole {
    fn required() -> Role;
}

pub struct UserRole;

impl RequiredRole for UserRole {
    fn required() -> Role {
        Role::User
    }
}

pub struct AdminRole;

impl RequiredRole for AdminRole {
    fn required() -> Role {
        Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // username
    pub exp: usize,  // expiry (unix)
    pub iat: usize,  // issued at
}
