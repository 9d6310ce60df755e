pub mod comments;
pub mod params;
pub mod tasks;
pub mod token;
pub mod users;
