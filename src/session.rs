use serde::Serialize;

use crate::errors::ApiError;
use crate::models::Role;

/// Identity of an authenticated user.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionUser {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// The process-wide login slot. Valid until cleared by logout or replaced by
/// the next login; there is no token and no expiry.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<SessionUser>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, user: SessionUser) {
        self.current = Some(user);
    }

    pub fn clear(&mut self) -> Option<SessionUser> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&SessionUser> {
        self.current.as_ref()
    }

    pub fn require(&self) -> Result<&SessionUser, ApiError> {
        self.current
            .as_ref()
            .ok_or_else(|| ApiError::AuthError("Please log in first".to_string()))
    }

    /// Role gate used by the dashboards; services do not enforce roles.
    pub fn require_role(&self, role: Role) -> Result<&SessionUser, ApiError> {
        let user = self.require()?;
        if user.role != role {
            return Err(ApiError::ForbiddenError(format!(
                "This action is only available to {} accounts",
                role
            )));
        }
        Ok(user)
    }
}
