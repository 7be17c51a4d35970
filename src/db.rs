//! Persistence gateway: one long-lived database connection shared by every
//! service call.
//!
//! PostgreSQL is the deployment backend; SQLite (a file or `:memory:`) serves
//! local desktop installs and the test suite. Both sit behind [`DbConnection`]
//! so the services are written once against the diesel query DSL.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, error, info, warn};

use crate::config::redact_url;
use crate::errors::ApiError;

#[derive(diesel::MultiConnection)]
pub enum DbConnection {
    Postgresql(PgConnection),
    Sqlite(SqliteConnection),
}

impl DbConnection {
    pub fn backend_name(&self) -> &'static str {
        match self {
            DbConnection::Postgresql(_) => "postgresql",
            DbConnection::Sqlite(_) => "sqlite",
        }
    }
}

// Database initialization SQL
pub const PG_INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(255) UNIQUE NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    phone_number VARCHAR(10) NOT NULL,
    role VARCHAR(20) NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id SERIAL PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    salary DOUBLE PRECISION NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    id SERIAL PRIMARY KEY,
    job_id INTEGER NOT NULL REFERENCES jobs(id),
    job_seeker_id INTEGER NOT NULL REFERENCES users(id),
    status VARCHAR(20) NOT NULL DEFAULT 'Pending',
    applied_date TIMESTAMP NOT NULL DEFAULT NOW(),
    resume BYTEA
);
"#;

pub const SQLITE_INIT_SQL: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    role TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    salary DOUBLE NOT NULL
);

CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id INTEGER NOT NULL REFERENCES jobs(id),
    job_seeker_id INTEGER NOT NULL REFERENCES users(id),
    status TEXT NOT NULL DEFAULT 'Pending',
    applied_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    resume BLOB
);
"#;

/// Establishes a connection for `database_url` and provisions the schema.
///
/// `postgres://` and `postgresql://` URLs select PostgreSQL. Anything else is
/// handed to SQLite, with an optional `sqlite://` prefix stripped.
pub fn open(database_url: &str) -> Result<DbConnection, ApiError> {
    let established = if database_url.starts_with("postgres://")
        || database_url.starts_with("postgresql://")
    {
        PgConnection::establish(database_url).map(DbConnection::Postgresql)
    } else {
        let path = database_url.strip_prefix("sqlite://").unwrap_or(database_url);
        SqliteConnection::establish(path).map(DbConnection::Sqlite)
    };
    let mut conn = established.map_err(|e| ApiError::ConnectivityError(e.to_string()))?;

    provision(&mut conn)?;
    Ok(conn)
}

fn provision(conn: &mut DbConnection) -> Result<(), ApiError> {
    let result = match conn {
        DbConnection::Postgresql(pg) => pg.batch_execute(PG_INIT_SQL),
        DbConnection::Sqlite(lite) => lite.batch_execute(SQLITE_INIT_SQL),
    };
    result.map_err(|e| {
        error!("Failed to execute database initialization script: {}", e);
        ApiError::PersistenceError(e.to_string())
    })?;
    debug!("Schema provisioned on {}", conn.backend_name());
    Ok(())
}

/// Owner of the single connection. A failed connect leaves the gateway in a
/// disconnected state where every call reports [`ApiError::ConnectivityError`]
/// until [`Gateway::reconnect`] succeeds.
pub struct Gateway {
    database_url: String,
    conn: Option<DbConnection>,
}

impl Gateway {
    /// Connects at startup. Failure is logged, not retried.
    pub fn connect(database_url: &str) -> Self {
        info!("Connecting to database: {}", redact_url(database_url));
        let conn = match open(database_url) {
            Ok(conn) => {
                info!("Database connection established ({})", conn.backend_name());
                Some(conn)
            }
            Err(e) => {
                error!("Database connection failed: {}", e);
                None
            }
        };
        Self {
            database_url: database_url.to_string(),
            conn,
        }
    }

    /// Like [`Gateway::connect`] but returns the failure to the caller.
    pub fn open(database_url: &str) -> Result<Self, ApiError> {
        let conn = open(database_url)?;
        Ok(Self {
            database_url: database_url.to_string(),
            conn: Some(conn),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.conn.as_ref().map(DbConnection::backend_name)
    }

    /// User-initiated retry. Replaces the current connection on success.
    pub fn reconnect(&mut self) -> Result<(), ApiError> {
        info!("Reconnecting to database: {}", redact_url(&self.database_url));
        let conn = open(&self.database_url).map_err(|e| {
            warn!("Reconnect failed: {}", e);
            e
        })?;
        self.conn = Some(conn);
        Ok(())
    }

    pub fn ping(&mut self) -> Result<(), ApiError> {
        self.with_conn(|conn| {
            conn.batch_execute("SELECT 1")?;
            Ok(())
        })
    }

    /// Lends the connection to one unit of work.
    pub fn with_conn<T, F>(&mut self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut DbConnection) -> Result<T, ApiError>,
    {
        match self.conn.as_mut() {
            Some(conn) => f(conn),
            None => Err(ApiError::ConnectivityError(
                "not connected to the database".to_string(),
            )),
        }
    }
}
