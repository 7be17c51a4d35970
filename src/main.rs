use actix_web::{web, App, HttpServer};
use log::{error, info, warn};

use job_recruitment::config::{log_filter_from_env, AppConfig};
use job_recruitment::context::AppContext;
use job_recruitment::db::Gateway;
use job_recruitment::logger::setup_logger;
use job_recruitment::middleware::RequestLogger;
use job_recruitment::routes::api_scope;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env and initialize logger before reading the rest of the config
    dotenvy::dotenv().ok();
    setup_logger(&log_filter_from_env());
    let config = AppConfig::from_env();

    if let Err(e) = config.validate() {
        error!("Configuration validation error: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
    }

    // A failed connection keeps the process alive; POST /api/db/reconnect retries.
    let gateway = Gateway::connect(&config.database_url);
    if !gateway.is_connected() {
        warn!("Starting without a database connection");
    }

    let host = config.host.clone();
    let port = config.port;
    let max_resume_bytes = config.max_resume_bytes;
    let ctx = web::Data::new(AppContext::new(gateway, config));

    info!("Starting HTTP server at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(ctx.clone())
            .app_data(web::PayloadConfig::new(max_resume_bytes))
            .service(api_scope())
    })
    .workers(1)
    .shutdown_timeout(30)
    .bind((host, port))?
    .run()
    .await
}
