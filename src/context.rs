use std::sync::{Mutex, MutexGuard};

use log::error;

use crate::config::AppConfig;
use crate::db::{DbConnection, Gateway};
use crate::errors::ApiError;
use crate::models::Role;
use crate::session::{Session, SessionUser};

/// Data-access context handed to every route: the gateway, the login slot
/// and the loaded configuration.
///
/// There is one login slot per process, shared by every HTTP client. The
/// server assumes a single local front end bound to a loopback address;
/// `AppConfig::validate` warns when `HOST` is anything else.
pub struct AppContext {
    gateway: Mutex<Gateway>,
    session: Mutex<Session>,
    pub config: AppConfig,
}

impl AppContext {
    pub fn new(gateway: Gateway, config: AppConfig) -> Self {
        Self {
            gateway: Mutex::new(gateway),
            session: Mutex::new(Session::new()),
            config,
        }
    }

    pub fn gateway(&self) -> Result<MutexGuard<'_, Gateway>, ApiError> {
        self.gateway.lock().map_err(|e| {
            error!("Gateway lock poisoned: {}", e);
            ApiError::InternalError("database gateway unavailable".to_string())
        })
    }

    pub fn session(&self) -> Result<MutexGuard<'_, Session>, ApiError> {
        self.session.lock().map_err(|e| {
            error!("Session lock poisoned: {}", e);
            ApiError::InternalError("session unavailable".to_string())
        })
    }

    /// Runs one service call on the shared connection. Blocks the calling
    /// thread until the database answers.
    pub fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut DbConnection) -> Result<T, ApiError>,
    {
        self.gateway()?.with_conn(f)
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session().ok().and_then(|s| s.current().cloned())
    }

    pub fn require_user(&self) -> Result<SessionUser, ApiError> {
        self.session()?.require().cloned()
    }

    pub fn require_role(&self, role: Role) -> Result<SessionUser, ApiError> {
        self.session()?.require_role(role).cloned()
    }
}
