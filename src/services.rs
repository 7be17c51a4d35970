use crate::db::DbConnection;
use crate::errors::ApiError;
use crate::models::*;
use crate::schema::{applications, jobs, users};
use crate::session::SessionUser;
use bcrypt::{hash, verify};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::{debug, error, info};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

const INVALID_LOGIN: &str = "Invalid credentials or incorrect role";

/// Exactly ten ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a salary entered as free text into a non-negative amount.
pub fn parse_salary(text: &str) -> Result<f64, ApiError> {
    let invalid = || ApiError::ValidationError("Salary must be a number".to_string());
    let amount = Decimal::from_str(text.trim()).map_err(|_| invalid())?;
    if amount.is_sign_negative() {
        return Err(ApiError::ValidationError(
            "Salary must not be negative".to_string(),
        ));
    }
    amount.to_f64().ok_or_else(invalid)
}

fn require_text(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

fn db_error(context: &str, e: DieselError) -> ApiError {
    error!("{}: {}", context, e);
    ApiError::from(e)
}

pub struct AuthService;

impl AuthService {
    pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
        hash(password, cost).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalError("Failed to hash password".to_string())
        })
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
        verify(password, hash).map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalError("Failed to verify password".to_string())
        })
    }

    /// Checks the (email, password, role) triple. Every mismatch yields the
    /// same error so a caller cannot tell which part was wrong.
    pub fn authenticate(
        conn: &mut DbConnection,
        email_addr: &str,
        password: &str,
        role: Role,
    ) -> Result<SessionUser, ApiError> {
        let user = match UserService::find_by_email(conn, email_addr)? {
            Some(user) => user,
            None => {
                debug!("Login failed: no user with email {}", email_addr.trim());
                return Err(ApiError::AuthError(INVALID_LOGIN.to_string()));
            }
        };

        if user.role != role.as_str() {
            debug!("Login failed: {} is not a {}", user.email, role);
            return Err(ApiError::AuthError(INVALID_LOGIN.to_string()));
        }

        if !Self::verify_password(password, &user.password_hash)? {
            debug!("Login failed: invalid password for {}", user.email);
            return Err(ApiError::AuthError(INVALID_LOGIN.to_string()));
        }

        info!("User {} logged in as {}", user.email, role);
        Ok(SessionUser {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role,
        })
    }
}

pub struct UserService;

impl UserService {
    pub fn find_by_email(
        conn: &mut DbConnection,
        email_addr: &str,
    ) -> Result<Option<User>, ApiError> {
        users::table
            .filter(users::email.eq(email_addr.trim()))
            .select((
                users::id,
                users::name,
                users::email,
                users::password_hash,
                users::phone_number,
                users::role,
            ))
            .first::<User>(conn)
            .optional()
            .map_err(|e| db_error("Error finding user by email", e))
    }

    pub fn find_user_id_by_email(
        conn: &mut DbConnection,
        email_addr: &str,
    ) -> Result<Option<i32>, ApiError> {
        users::table
            .filter(users::email.eq(email_addr.trim()))
            .select(users::id)
            .first::<i32>(conn)
            .optional()
            .map_err(|e| db_error("Error resolving user id", e))
    }

    /// Input checks for a registration. Needs no connection, so callers run
    /// it before borrowing one.
    pub fn validate(request: &RegisterRequest) -> Result<(), ApiError> {
        if !is_valid_phone(&request.phone_number) {
            return Err(ApiError::ValidationError(
                "Please enter a valid 10-digit phone number".to_string(),
            ));
        }
        require_text(&request.name, "Name")?;
        require_text(&request.email, "Email")?;
        require_text(&request.password, "Password")
    }

    /// Validates and inserts a new account, returning its id.
    ///
    /// Uniqueness of the email is left to the database constraint.
    pub fn register(
        conn: &mut DbConnection,
        request: &RegisterRequest,
        bcrypt_cost: u32,
    ) -> Result<i32, ApiError> {
        Self::validate(request)?;

        let new_user = NewUser {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            password_hash: AuthService::hash_password(&request.password, bcrypt_cost)?,
            phone_number: request.phone_number.clone(),
            role: request.role.as_str().to_string(),
        };

        diesel::insert_into(users::table)
            .values(&new_user)
            .execute(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    debug!("Attempted to register existing email: {}", new_user.email);
                    ApiError::ValidationError("Email already exists".to_string())
                }
                other => db_error("Failed to register user", other),
            })?;

        let user_id = Self::find_user_id_by_email(conn, &new_user.email)?.ok_or_else(|| {
            ApiError::PersistenceError("Registered user could not be read back".to_string())
        })?;

        info!("Registered {} {} with ID {}", new_user.role, new_user.email, user_id);
        Ok(user_id)
    }
}

pub struct JobService;

impl JobService {
    /// Checks a posting and returns its parsed salary.
    pub fn validate(request: &PostJobRequest) -> Result<f64, ApiError> {
        require_text(&request.title, "Title")?;
        parse_salary(&request.salary)
    }

    /// Inserts a job posting. Restricting this to employers is the caller's job.
    pub fn post_job(conn: &mut DbConnection, request: &PostJobRequest) -> Result<(), ApiError> {
        let salary = Self::validate(request)?;

        let new_job = NewJob {
            title: request.title.trim().to_string(),
            description: request.description.clone(),
            salary,
        };

        diesel::insert_into(jobs::table)
            .values(&new_job)
            .execute(conn)
            .map_err(|e| db_error("Failed to post job", e))?;

        info!("Posted job '{}' with salary {}", new_job.title, new_job.salary);
        Ok(())
    }

    pub fn list_jobs(conn: &mut DbConnection) -> Result<Vec<JobSummary>, ApiError> {
        let rows = jobs::table
            .select((jobs::id, jobs::title, jobs::salary))
            .order_by(jobs::id.asc())
            .load::<JobSummary>(conn)
            .map_err(|e| db_error("Failed to list jobs", e))?;

        debug!("Listed {} jobs", rows.len());
        Ok(rows)
    }
}

pub struct ApplicationService;

impl ApplicationService {
    /// Files an application for the session user with the resume stored
    /// verbatim. Resolving the user and inserting are separate statements.
    pub fn apply(
        conn: &mut DbConnection,
        job_id: i32,
        session_email: &str,
        resume: Vec<u8>,
    ) -> Result<(), ApiError> {
        let job_seeker_id = UserService::find_user_id_by_email(conn, session_email)?
            .ok_or_else(|| ApiError::NotFoundError("User not found".to_string()))?;

        let resume_len = resume.len();
        let new_application = NewApplication {
            job_id,
            job_seeker_id,
            status: ApplicationStatus::Pending.as_str().to_string(),
            resume: Some(resume),
        };

        diesel::insert_into(applications::table)
            .values(&new_application)
            .execute(conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    debug!("Application references missing job {}", job_id);
                    ApiError::NotFoundError("Job not found".to_string())
                }
                other => db_error("Failed to submit application", other),
            })?;

        info!(
            "User {} applied to job {} with a {} byte resume",
            job_seeker_id, job_id, resume_len
        );
        Ok(())
    }

    /// All applications with their job title and applicant name. Rows whose
    /// job or applicant is missing fall out of the inner join.
    pub fn list_applications(conn: &mut DbConnection) -> Result<Vec<ApplicationRow>, ApiError> {
        let rows = applications::table
            .inner_join(jobs::table)
            .inner_join(users::table)
            .select((
                applications::id,
                jobs::title,
                users::name,
                applications::status,
                applications::applied_date,
            ))
            .order_by(applications::id.asc())
            .load::<ApplicationRow>(conn)
            .map_err(|e| db_error("Failed to list applications", e))?;

        debug!("Listed {} applications", rows.len());
        Ok(rows)
    }

    pub fn list_applications_for_user(
        conn: &mut DbConnection,
        session_email: &str,
    ) -> Result<Vec<UserApplicationRow>, ApiError> {
        let user_id = UserService::find_user_id_by_email(conn, session_email)?
            .ok_or_else(|| ApiError::NotFoundError("User not found".to_string()))?;

        let rows = applications::table
            .inner_join(jobs::table)
            .filter(applications::job_seeker_id.eq(user_id))
            .select((jobs::title, applications::status, applications::applied_date))
            .order_by(applications::id.asc())
            .load::<UserApplicationRow>(conn)
            .map_err(|e| db_error("Failed to list applications for user", e))?;

        debug!("User {} has {} applications", user_id, rows.len());
        Ok(rows)
    }

    /// Moves a pending application to `Selected`. Selecting an already
    /// selected application is accepted without a write.
    pub fn select_candidate(
        conn: &mut DbConnection,
        application_id: i32,
    ) -> Result<ApplicationStatus, ApiError> {
        let updated = diesel::update(
            applications::table
                .filter(applications::id.eq(application_id))
                .filter(applications::status.eq(ApplicationStatus::Pending.as_str())),
        )
        .set(applications::status.eq(ApplicationStatus::Selected.as_str()))
        .execute(conn)
        .map_err(|e| db_error("Failed to update application status", e))?;

        if updated > 0 {
            info!("Application {} selected", application_id);
            return Ok(ApplicationStatus::Selected);
        }

        let current = applications::table
            .filter(applications::id.eq(application_id))
            .select(applications::status)
            .first::<String>(conn)
            .optional()
            .map_err(|e| db_error("Failed to read application status", e))?;

        let Some(status) = current else {
            return Err(ApiError::NotFoundError(format!(
                "Application {} not found",
                application_id
            )));
        };

        match ApplicationStatus::from_str(&status) {
            Ok(ApplicationStatus::Selected) => {
                debug!("Application {} was already selected", application_id);
                Ok(ApplicationStatus::Selected)
            }
            _ => Err(ApiError::ValidationError(format!(
                "Application {} cannot be selected from status '{}'",
                application_id, status
            ))),
        }
    }

    /// Deletes one application once the caller has confirmed. A declined
    /// confirmation sends nothing to the database.
    pub fn delete_application(
        conn: &mut DbConnection,
        application_id: i32,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, ApiError> {
        if confirmation == Confirmation::Declined {
            debug!("Deletion of application {} cancelled", application_id);
            return Ok(DeleteOutcome::Cancelled);
        }

        let deleted = diesel::delete(applications::table.filter(applications::id.eq(application_id)))
            .execute(conn)
            .map_err(|e| db_error("Failed to delete application", e))?;

        if deleted == 0 {
            return Err(ApiError::NotFoundError(format!(
                "Application {} not found",
                application_id
            )));
        }

        info!("Application {} deleted", application_id);
        Ok(DeleteOutcome::Deleted)
    }

    pub fn download_resume(
        conn: &mut DbConnection,
        application_id: i32,
    ) -> Result<Vec<u8>, ApiError> {
        let blob = applications::table
            .filter(applications::id.eq(application_id))
            .select(applications::resume)
            .first::<Option<Vec<u8>>>(conn)
            .optional()
            .map_err(|e| db_error("Failed to load resume", e))?;

        match blob.flatten() {
            Some(bytes) if !bytes.is_empty() => {
                debug!("Loaded {} byte resume for application {}", bytes.len(), application_id);
                Ok(bytes)
            }
            _ => Err(ApiError::NotFoundError(
                "No resume found for this application".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    const COST: u32 = 4;

    fn conn() -> DbConnection {
        db::open(":memory:").unwrap()
    }

    fn register(conn: &mut DbConnection, name: &str, email: &str, role: Role) -> i32 {
        let request = RegisterRequest {
            name: name.into(),
            email: email.into(),
            password: "hunter22".into(),
            phone_number: "5551234567".into(),
            role,
        };
        UserService::register(conn, &request, COST).unwrap()
    }

    fn post(conn: &mut DbConnection, title: &str, salary: &str) -> i32 {
        let request = PostJobRequest {
            title: title.into(),
            description: format!("{} role", title),
            salary: salary.into(),
        };
        JobService::post_job(conn, &request).unwrap();
        JobService::list_jobs(conn)
            .unwrap()
            .into_iter()
            .rev()
            .find(|job| job.title == title)
            .unwrap()
            .id
    }

    fn user_count(conn: &mut DbConnection) -> i64 {
        users::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn phone_must_be_ten_ascii_digits() {
        assert!(is_valid_phone("5551234567"));
        assert!(!is_valid_phone("555123456"));
        assert!(!is_valid_phone("55512345678"));
        assert!(!is_valid_phone("555-123-45"));
        assert!(!is_valid_phone("５５５1234567"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn salary_parsing() {
        assert_eq!(parse_salary("90000").unwrap(), 90000.0);
        assert_eq!(parse_salary(" 1234.50 ").unwrap(), 1234.5);
        assert!(matches!(parse_salary("lots"), Err(ApiError::ValidationError(_))));
        assert!(matches!(parse_salary(""), Err(ApiError::ValidationError(_))));
        assert!(matches!(parse_salary("NaN"), Err(ApiError::ValidationError(_))));
        assert!(matches!(parse_salary("-5"), Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn bad_phone_fails_validation_without_insert() {
        let mut conn = conn();
        for phone in ["12345", "abcdefghij", "55512345678", ""] {
            let request = RegisterRequest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "pw".into(),
                phone_number: phone.into(),
                role: Role::JobSeeker,
            };
            let err = UserService::register(&mut conn, &request, COST).unwrap_err();
            assert!(matches!(err, ApiError::ValidationError(_)));
        }
        assert_eq!(user_count(&mut conn), 0);
    }

    #[test]
    fn malformed_input_is_rejected_without_a_connection() {
        let mut gateway = db::Gateway::connect("/nonexistent-dir/for/sure/jobs.db");
        assert!(!gateway.is_connected());

        let registration = RegisterRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            phone_number: "123".into(),
            role: Role::JobSeeker,
        };
        assert!(matches!(
            UserService::validate(&registration),
            Err(ApiError::ValidationError(_))
        ));

        let posting = PostJobRequest {
            title: "Engineer".into(),
            description: String::new(),
            salary: "abc".into(),
        };
        assert!(matches!(
            JobService::validate(&posting),
            Err(ApiError::ValidationError(_))
        ));

        let valid = RegisterRequest {
            phone_number: "5551234567".into(),
            ..registration
        };
        assert!(UserService::validate(&valid).is_ok());
        assert!(matches!(
            gateway.with_conn(|conn| UserService::register(conn, &valid, COST)),
            Err(ApiError::ConnectivityError(_))
        ));
    }

    #[test]
    fn password_is_stored_hashed() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let user = UserService::find_by_email(&mut conn, "ada@example.com")
            .unwrap()
            .unwrap();
        assert_ne!(user.password_hash, "hunter22");
        assert!(AuthService::verify_password("hunter22", &user.password_hash).unwrap());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let request = RegisterRequest {
            name: "Other".into(),
            email: "ada@example.com".into(),
            password: "pw".into(),
            phone_number: "5550000000".into(),
            role: Role::Employer,
        };
        let err = UserService::register(&mut conn, &request, COST).unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
        assert_eq!(user_count(&mut conn), 1);
    }

    #[test]
    fn authentication_requires_matching_role() {
        let mut conn = conn();
        let ada_id = register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);

        let user =
            AuthService::authenticate(&mut conn, "ada@example.com", "hunter22", Role::JobSeeker)
                .unwrap();
        assert_eq!(user.user_id, ada_id);
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "Ada");
        assert_eq!(user.role, Role::JobSeeker);

        let wrong_role =
            AuthService::authenticate(&mut conn, "ada@example.com", "hunter22", Role::Employer)
                .unwrap_err();
        let wrong_password =
            AuthService::authenticate(&mut conn, "ada@example.com", "nope", Role::JobSeeker)
                .unwrap_err();
        let unknown =
            AuthService::authenticate(&mut conn, "bob@example.com", "hunter22", Role::JobSeeker)
                .unwrap_err();

        assert_eq!(wrong_role.to_string(), wrong_password.to_string());
        assert_eq!(wrong_role.to_string(), unknown.to_string());
        assert!(matches!(wrong_role, ApiError::AuthError(_)));
    }

    #[test]
    fn invalid_salary_posts_nothing() {
        let mut conn = conn();
        let request = PostJobRequest {
            title: "Engineer".into(),
            description: String::new(),
            salary: "ninety thousand".into(),
        };
        assert!(matches!(
            JobService::post_job(&mut conn, &request),
            Err(ApiError::ValidationError(_))
        ));
        assert!(JobService::list_jobs(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn jobs_are_listed_in_insertion_order() {
        let mut conn = conn();
        post(&mut conn, "Engineer", "90000");
        post(&mut conn, "Designer", "75000.5");
        let jobs = JobService::list_jobs(&mut conn).unwrap();
        let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, ["Engineer", "Designer"]);
        assert_eq!(jobs[1].salary, 75000.5);
    }

    #[test]
    fn apply_for_unknown_user_is_not_found() {
        let mut conn = conn();
        let job_id = post(&mut conn, "Engineer", "90000");
        let err = ApplicationService::apply(&mut conn, job_id, "ghost@example.com", vec![1])
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFoundError(_)));
        assert!(ApplicationService::list_applications(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn apply_for_unknown_job_inserts_nothing() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let err =
            ApplicationService::apply(&mut conn, 999, "ada@example.com", vec![1]).unwrap_err();
        assert!(matches!(&err, ApiError::NotFoundError(msg) if msg == "Job not found"));
        let count: i64 = applications::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn duplicate_applications_are_allowed() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let job_id = post(&mut conn, "Engineer", "90000");
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", vec![1]).unwrap();
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", vec![2]).unwrap();
        assert_eq!(ApplicationService::list_applications(&mut conn).unwrap().len(), 2);
    }

    #[test]
    fn resume_round_trip_is_byte_exact() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let job_id = post(&mut conn, "Engineer", "90000");

        let one_byte = vec![0x7f];
        let large: Vec<u8> = (0..(1024 * 1024 + 17)).map(|i| (i % 251) as u8).collect();

        ApplicationService::apply(&mut conn, job_id, "ada@example.com", one_byte.clone()).unwrap();
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", large.clone()).unwrap();

        let rows = ApplicationService::list_applications(&mut conn).unwrap();
        assert_eq!(ApplicationService::download_resume(&mut conn, rows[0].id).unwrap(), one_byte);
        assert_eq!(ApplicationService::download_resume(&mut conn, rows[1].id).unwrap(), large);
    }

    #[test]
    fn empty_or_missing_resume_is_not_found() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let job_id = post(&mut conn, "Engineer", "90000");
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", Vec::new()).unwrap();
        let id = ApplicationService::list_applications(&mut conn).unwrap()[0].id;

        let err = ApplicationService::download_resume(&mut conn, id).unwrap_err();
        assert_eq!(err.to_string(), "Not found: No resume found for this application");
        assert!(matches!(
            ApplicationService::download_resume(&mut conn, id + 100),
            Err(ApiError::NotFoundError(_))
        ));
    }

    #[test]
    fn select_candidate_on_missing_id_mutates_nothing() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let job_id = post(&mut conn, "Engineer", "90000");
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", vec![1, 2, 3]).unwrap();
        let id = ApplicationService::list_applications(&mut conn).unwrap()[0].id;

        let err = ApplicationService::select_candidate(&mut conn, id + 1).unwrap_err();
        assert!(matches!(err, ApiError::NotFoundError(_)));

        let rows = ApplicationService::list_applications(&mut conn).unwrap();
        assert!(rows.iter().all(|r| r.status == "Pending"));
    }

    #[test]
    fn selecting_twice_is_idempotent() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let job_id = post(&mut conn, "Engineer", "90000");
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", vec![1]).unwrap();
        let id = ApplicationService::list_applications(&mut conn).unwrap()[0].id;

        assert_eq!(
            ApplicationService::select_candidate(&mut conn, id).unwrap(),
            ApplicationStatus::Selected
        );
        assert_eq!(
            ApplicationService::select_candidate(&mut conn, id).unwrap(),
            ApplicationStatus::Selected
        );
    }

    #[test]
    fn delete_requires_confirmation_and_removes_one_row() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        let job_id = post(&mut conn, "Engineer", "90000");
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", vec![1]).unwrap();
        ApplicationService::apply(&mut conn, job_id, "ada@example.com", vec![2]).unwrap();
        let rows = ApplicationService::list_applications(&mut conn).unwrap();
        let (first, second) = (rows[0].id, rows[1].id);

        assert_eq!(
            ApplicationService::delete_application(&mut conn, first, Confirmation::Declined)
                .unwrap(),
            DeleteOutcome::Cancelled
        );
        assert_eq!(ApplicationService::list_applications(&mut conn).unwrap().len(), 2);

        assert_eq!(
            ApplicationService::delete_application(&mut conn, first, Confirmation::Confirmed)
                .unwrap(),
            DeleteOutcome::Deleted
        );
        let remaining = ApplicationService::list_applications(&mut conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);

        assert!(matches!(
            ApplicationService::delete_application(&mut conn, first, Confirmation::Confirmed),
            Err(ApiError::NotFoundError(_))
        ));
    }

    #[test]
    fn user_without_applications_gets_empty_list() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        post(&mut conn, "Engineer", "90000");
        let rows =
            ApplicationService::list_applications_for_user(&mut conn, "ada@example.com").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn user_sees_only_own_applications() {
        let mut conn = conn();
        register(&mut conn, "Ada", "ada@example.com", Role::JobSeeker);
        register(&mut conn, "Bob", "bob@example.com", Role::JobSeeker);
        let engineer = post(&mut conn, "Engineer", "90000");
        let designer = post(&mut conn, "Designer", "70000");
        ApplicationService::apply(&mut conn, engineer, "ada@example.com", vec![1]).unwrap();
        ApplicationService::apply(&mut conn, designer, "bob@example.com", vec![2]).unwrap();

        let rows =
            ApplicationService::list_applications_for_user(&mut conn, "bob@example.com").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].job_title, "Designer");
        assert_eq!(rows[0].status, "Pending");
    }

    #[test]
    fn hire_flow_end_to_end() {
        let mut conn = conn();
        register(&mut conn, "A", "a@example.com", Role::JobSeeker);
        register(&mut conn, "Boss", "boss@example.com", Role::Employer);
        let job_id = post(&mut conn, "Engineer", "90000");

        ApplicationService::apply(&mut conn, job_id, "a@example.com", vec![1, 2, 3]).unwrap();

        let rows = ApplicationService::list_applications(&mut conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].job_title, "Engineer");
        assert_eq!(rows[0].applicant, "A");
        assert_eq!(rows[0].status, "Pending");

        ApplicationService::select_candidate(&mut conn, rows[0].id).unwrap();

        let mine =
            ApplicationService::list_applications_for_user(&mut conn, "a@example.com").unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].job_title, "Engineer");
        assert_eq!(mine[0].status, "Selected");
    }
}
