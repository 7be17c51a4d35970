// Job recruitment backend: account, job and application services over a
// single database connection, with a thin HTTP adapter for the desktop UI.

pub mod config;
pub mod context;
pub mod db;
pub mod errors;
pub mod logger;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;
pub mod session;

// Re-export common types
pub use crate::config::AppConfig;
pub use crate::context::AppContext;
pub use crate::db::{DbConnection, Gateway};
pub use crate::errors::ApiError;
pub use crate::session::{Session, SessionUser};
