use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    JobSeeker,
    Employer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::JobSeeker => "JobSeeker",
            Role::Employer => "Employer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JobSeeker" => Ok(Role::JobSeeker),
            "Employer" => Ok(Role::Employer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Lifecycle of an application: `Pending` is the only initial state and
/// `Selected` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Selected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Selected => "Selected",
        }
    }

    pub fn can_select(&self) -> bool {
        matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ApplicationStatus::Pending),
            "Selected" => Ok(ApplicationStatus::Selected),
            other => Err(format!("unknown application status '{}'", other)),
        }
    }
}

#[derive(Queryable, Serialize, Debug)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: String,
    pub role: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub role: String,
}

/// Row shown in the job search table.
#[derive(Queryable, Serialize, Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: f64,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::jobs)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub salary: f64,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::applications)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewApplication {
    pub job_id: i32,
    pub job_seeker_id: i32,
    pub status: String,
    pub resume: Option<Vec<u8>>,
}

/// Employer-side view: application joined with its job and applicant.
#[derive(Queryable, Serialize, Debug, Clone)]
pub struct ApplicationRow {
    pub id: i32,
    pub job_title: String,
    pub applicant: String,
    pub status: String,
    pub applied_date: NaiveDateTime,
}

/// Job seeker's own application status.
#[derive(Queryable, Serialize, Debug, Clone)]
pub struct UserApplicationRow {
    pub job_title: String,
    pub status: String,
    pub applied_date: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

// DTOs
#[derive(Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub role: Role,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostJobRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Kept as text so that parsing failures surface as validation errors.
    pub salary: String,
}

#[derive(Deserialize, Debug)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::JobSeeker, Role::Employer] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("Recruiter".parse::<Role>().is_err());
        assert!("jobseeker".parse::<Role>().is_err());
    }

    #[test]
    fn only_pending_can_be_selected() {
        assert!(ApplicationStatus::Pending.can_select());
        assert!(!ApplicationStatus::Selected.can_select());
        assert_eq!("Selected".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Selected));
        assert!("Rejected".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn role_deserializes_from_variant_name() {
        let req: LoginRequest = serde_json::from_str(
            r#"{"email":"a@example.com","password":"pw","role":"Employer"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Employer);
    }

    #[test]
    fn confirmation_from_flag() {
        assert_eq!(Confirmation::from(true), Confirmation::Confirmed);
        assert_eq!(Confirmation::from(false), Confirmation::Declined);
    }
}
