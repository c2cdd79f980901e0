pub mod app;
pub mod config;
pub mod credential;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod types;

pub use credential::PasswordHasher;
pub use db::Storage;
pub use error::RolsaError;
