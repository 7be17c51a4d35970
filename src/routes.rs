use actix_web::{delete, get, post, web, HttpResponse, Scope};
use log::{debug, error, info};
use serde_json::json;

use crate::context::AppContext;
use crate::db::DbConnection;
use crate::errors::ApiError;
use crate::models::*;
use crate::services::{ApplicationService, AuthService, JobService, UserService};

/// Runs a service call on actix's blocking pool with the shared connection.
async fn blocking<T, F>(ctx: web::Data<AppContext>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut DbConnection) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || ctx.run(f))
        .await
        .map_err(|e| {
            error!("Database operation error: {}", e);
            ApiError::InternalError(e.to_string())
        })?
}

#[get("/health")]
async fn health_check(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let probe = ctx.clone();
    let (connected, backend) = web::block(move || -> Result<_, ApiError> {
        let mut gateway = probe.gateway()?;
        let connected = gateway.ping().is_ok();
        Ok((connected, gateway.backend_name()))
    })
    .await
    .map_err(|e| ApiError::InternalError(e.to_string()))??;

    Ok(HttpResponse::Ok().json(json!({
        "status": if connected { "ok" } else { "degraded" },
        "database": {
            "connected": connected,
            "backend": backend,
        },
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

#[post("/db/reconnect")]
async fn reconnect(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let probe = ctx.clone();
    web::block(move || -> Result<(), ApiError> {
        let mut gateway = probe.gateway()?;
        gateway.reconnect()
    })
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))??;

    info!("Database reconnected");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Database Connected Successfully!"
    })))
}

#[post("/register")]
async fn register(
    ctx: web::Data<AppContext>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    debug!("Registration attempt for: {}", request.email);
    UserService::validate(&request)?;
    let cost = ctx.config.bcrypt_cost;
    let user_id = blocking(ctx, move |conn| UserService::register(conn, &request, cost)).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Registration Successful",
        "user_id": user_id
    })))
}

#[post("/login")]
async fn login(
    ctx: web::Data<AppContext>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest {
        email,
        password,
        role,
    } = body.into_inner();
    debug!("Login attempt for {} as {}", email, role);

    let user = blocking(ctx.clone(), move |conn| {
        AuthService::authenticate(conn, &email, &password, role)
    })
    .await?;

    ctx.session()?.begin(user.clone());

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Login Successful as {}", user.role),
        "user": user
    })))
}

#[post("/logout")]
async fn logout(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let previous = ctx.session()?.clear();
    if let Some(user) = &previous {
        info!("User {} logged out", user.email);
    }
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "was_logged_in": previous.is_some()
    })))
}

#[get("/session")]
async fn current_session(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let user = ctx.require_user()?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/jobs")]
async fn list_jobs(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    ctx.require_user()?;
    let jobs = blocking(ctx, JobService::list_jobs).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[post("/jobs")]
async fn post_job(
    ctx: web::Data<AppContext>,
    body: web::Json<PostJobRequest>,
) -> Result<HttpResponse, ApiError> {
    ctx.require_role(Role::Employer)?;
    let request = body.into_inner();
    JobService::validate(&request)?;
    blocking(ctx, move |conn| JobService::post_job(conn, &request)).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Job Posted Successfully"
    })))
}

/// Body is the raw resume file, stored unchanged.
#[post("/jobs/{job_id}/apply")]
async fn apply(
    ctx: web::Data<AppContext>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let user = ctx.require_role(Role::JobSeeker)?;
    let job_id = path.into_inner();
    let resume = body.to_vec();
    blocking(ctx, move |conn| {
        ApplicationService::apply(conn, job_id, &user.email, resume)
    })
    .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Applied Successfully with Resume!"
    })))
}

#[get("/applications")]
async fn list_applications(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    ctx.require_role(Role::Employer)?;
    let rows = blocking(ctx, ApplicationService::list_applications).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[post("/applications/{application_id}/select")]
async fn select_candidate(
    ctx: web::Data<AppContext>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    ctx.require_role(Role::Employer)?;
    let application_id = path.into_inner();
    let status = blocking(ctx, move |conn| {
        ApplicationService::select_candidate(conn, application_id)
    })
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Candidate Selected Successfully!",
        "status": status
    })))
}

#[delete("/applications/{application_id}")]
async fn delete_application(
    ctx: web::Data<AppContext>,
    path: web::Path<i32>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, ApiError> {
    ctx.require_role(Role::Employer)?;
    let application_id = path.into_inner();
    let confirmation = Confirmation::from(query.confirm);
    let outcome = blocking(ctx, move |conn| {
        ApplicationService::delete_application(conn, application_id, confirmation)
    })
    .await?;

    let message = match outcome {
        DeleteOutcome::Deleted => "Application Deleted Successfully!".to_string(),
        DeleteOutcome::Cancelled => format!(
            "Are you sure you want to delete Application ID: {}? Repeat with confirm=true",
            application_id
        ),
    };
    Ok(HttpResponse::Ok().json(json!({
        "outcome": outcome,
        "message": message
    })))
}

#[get("/applications/{application_id}/resume")]
async fn download_resume(
    ctx: web::Data<AppContext>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    ctx.require_role(Role::Employer)?;
    let application_id = path.into_inner();
    let bytes = blocking(ctx, move |conn| {
        ApplicationService::download_resume(conn, application_id)
    })
    .await?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"resume-{}\"", application_id),
        ))
        .body(bytes))
}

#[get("/my/applications")]
async fn my_applications(ctx: web::Data<AppContext>) -> Result<HttpResponse, ApiError> {
    let user = ctx.require_role(Role::JobSeeker)?;
    let rows = blocking(ctx, move |conn| {
        ApplicationService::list_applications_for_user(conn, &user.email)
    })
    .await?;

    let notice = rows
        .is_empty()
        .then_some("You haven't applied for any jobs yet.");
    Ok(HttpResponse::Ok().json(json!({
        "applications": rows,
        "notice": notice
    })))
}

pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(health_check)
        .service(reconnect)
        .service(register)
        .service(login)
        .service(logout)
        .service(current_session)
        .service(list_jobs)
        .service(post_job)
        .service(apply)
        .service(list_applications)
        .service(select_candidate)
        .service(delete_application)
        .service(download_resume)
        .service(my_applications)
}
