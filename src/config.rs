use log::warn;
use std::env;
use std::net::IpAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://job_recruitment.db";
pub const DEFAULT_MAX_RESUME_BYTES: usize = 16 * 1024 * 1024;

/// Discrete PostgreSQL connection parameters, used when `DATABASE_URL` is unset.
#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseParams {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub sslmode: String,
}

impl DatabaseParams {
    /// Reads `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_SSLMODE`.
    /// Returns `None` unless at least `DB_HOST` and `DB_NAME` are present.
    pub fn from_env() -> Option<Self> {
        let host = env::var("DB_HOST").ok()?;
        let name = env::var("DB_NAME").ok()?;

        let port = match env::var("DB_PORT") {
            Ok(val) => val.parse::<u16>().unwrap_or_else(|_| {
                warn!("DB_PORT '{}' is not a valid port, using 5432", val);
                5432
            }),
            Err(_) => 5432,
        };

        Some(Self {
            host,
            port,
            name,
            user: env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            sslmode: env::var("DB_SSLMODE").unwrap_or_else(|_| "prefer".to_string()),
        })
    }

    pub fn to_url(&self) -> String {
        let credentials = if self.password.is_empty() {
            self.user.clone()
        } else {
            format!("{}:{}", self.user, self.password)
        };
        format!(
            "postgres://{}@{}:{}/{}?sslmode={}",
            credentials, self.host, self.port, self.name, self.sslmode
        )
    }
}

/// Hides the password part of a connection URL before it reaches the logs.
pub fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:****@{}", scheme, user, host),
        None => url.to_string(),
    }
}

/// Log filter from `LOG_LEVEL`, read before the rest of the configuration so
/// the logger is live while config fallbacks are reported.
pub fn log_filter_from_env() -> String {
    env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// `localhost` or any loopback IP.
pub fn is_loopback_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost")
        || host
            .parse::<IpAddr>()
            .map(|ip| ip.is_loopback())
            .unwrap_or(false)
}

// Config
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub bcrypt_cost: u32,
    pub max_resume_bytes: usize,
    pub log_level: String,
}

impl AppConfig {
    /// Reads the process environment. Load `.env` and install the logger
    /// first, or the fallback warnings are lost.
    pub fn from_env() -> Self {
        let database_url = match env::var("DATABASE_URL") {
            Ok(val) => val,
            Err(_) => match DatabaseParams::from_env() {
                Some(params) => params.to_url(),
                None => {
                    warn!("Neither DATABASE_URL nor DB_HOST/DB_NAME set");
                    warn!("Falling back to local database {}", DEFAULT_DATABASE_URL);
                    DEFAULT_DATABASE_URL.to_string()
                }
            },
        };

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(bcrypt::DEFAULT_COST);

        let max_resume_bytes = env::var("MAX_RESUME_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_RESUME_BYTES);

        let log_level = log_filter_from_env();

        Self {
            host,
            port,
            database_url,
            bcrypt_cost,
            max_resume_bytes,
            log_level,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err("BCRYPT_COST must be between 4 and 31".to_string());
        }

        if self.max_resume_bytes == 0 {
            return Err("MAX_RESUME_BYTES must be positive".to_string());
        }

        if self.database_url.trim().is_empty() {
            return Err("DATABASE_URL must not be empty".to_string());
        }

        if self.database_url.starts_with("postgres") && self.database_url.contains("sslmode=disable") {
            warn!("Database connection is unencrypted (sslmode=disable)");
        }

        if !is_loopback_host(&self.host) {
            warn!(
                "HOST {} is not a loopback address; every client shares the single login session",
                self.host
            );
        }

        Ok(())
    }
}
