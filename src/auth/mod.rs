pub mod identity;
pub mod jwt;
pub mod password;
pub mod types;

pub use identity::{AuthenticatedUser, IdentityResolver};
pub use jwt::{CredentialError, JwtKeys};
pub use types::{AdminRole, Claims, RequiredRole, Role, UserRole};
