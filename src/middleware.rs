use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{web, Error};
use log::{info, log, Level};
use std::future::{ready, Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::time::Instant;

use crate::context::AppContext;

/// Logs each request with the acting session user, and each response with
/// its status and latency.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: Rc<S>,
}

fn actor(req: &ServiceRequest) -> String {
    req.app_data::<web::Data<AppContext>>()
        .and_then(|ctx| ctx.current_user())
        .map(|user| format!("{} ({})", user.email, user.role))
        .unwrap_or_else(|| String::from("anonymous"))
}

/// Log level and ANSI color for a response status.
fn status_style(status: StatusCode) -> (Level, &'static str) {
    if status.is_success() || status.is_redirection() {
        (Level::Info, "\x1B[1;32m")
    } else if status.is_client_error() {
        (Level::Warn, "\x1B[1;33m")
    } else {
        (Level::Error, "\x1B[1;31m")
    }
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + 'static>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_owned();
        let who = actor(&req);

        info!("→ Request: \x1B[1;34m{} {}\x1B[0m by {}", method, path, who);

        let service = self.service.clone();

        Box::pin(async move {
            let start = Instant::now();
            let res = service.call(req).await?;

            let status = res.status();
            let (level, color) = status_style(status);
            log!(
                level,
                "← Response: {}{}\x1B[0m for {} {} ({}) in {:.2?}",
                color,
                status,
                method,
                path,
                who,
                start.elapsed()
            );

            Ok(res)
        })
    }
}
