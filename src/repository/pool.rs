//! Connection pools for SQLite and PostgreSQL.
//!
//! The backend is chosen once, from the database URL, when the pool is built.
//! Repositories dispatch on the pool variant with [`with_conn!`].

use std::path::Path;

use diesel::sqlite::SqliteConnection;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, SimpleAsyncConnection};

#[cfg(feature = "postgres")]
use diesel_async::pooled_connection::deadpool::Pool as DeadPool;
#[cfg(feature = "postgres")]
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
#[cfg(feature = "postgres")]
use diesel_async::AsyncPgConnection;

use super::util::{is_postgres_url, to_diesel_error};

pub type DbError = diesel::result::Error;

pub type SqliteConn = SyncConnectionWrapper<SqliteConnection>;

#[cfg(feature = "postgres")]
pub type PgConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Connections kept by the PostgreSQL pool.
#[cfg(feature = "postgres")]
const PG_POOL_SIZE: usize = 10;

/// Applied to every new SQLite connection. Foreign keys are off by default,
/// and without a busy timeout a second writer fails at once.
const SQLITE_CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

/// File path named by a SQLite URL (`sqlite:app.db`, `sqlite://app.db` or a
/// bare path).
fn sqlite_path(database_url: &str) -> &str {
    let path = database_url.strip_prefix("sqlite:").unwrap_or(database_url);
    path.strip_prefix("//").unwrap_or(path)
}

/// Opens a fresh SQLite connection per checkout.
#[derive(Clone)]
pub struct SqlitePool {
    path: String,
}

impl SqlitePool {
    pub fn new(database_url: &str) -> Self {
        Self {
            path: sqlite_path(database_url).to_string(),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::new(&path.display().to_string())
    }

    pub async fn get(&self) -> Result<SqliteConn, DbError> {
        let mut conn = SqliteConn::establish(&self.path)
            .await
            .map_err(to_diesel_error)?;
        conn.batch_execute(SQLITE_CONNECTION_PRAGMAS).await?;
        Ok(conn)
    }
}

#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct PgPool {
    pool: DeadPool<AsyncPgConnection>,
}

#[cfg(feature = "postgres")]
impl PgPool {
    pub fn new(database_url: &str) -> Result<Self, DbError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = DeadPool::builder(manager)
            .max_size(PG_POOL_SIZE)
            .build()
            .map_err(to_diesel_error)?;
        Ok(Self { pool })
    }

    pub async fn get(&self) -> Result<PgConn, DbError> {
        self.pool.get().await.map_err(to_diesel_error)
    }
}

/// Pool for whichever backend the database URL names.
#[derive(Clone)]
pub enum DbPool {
    Sqlite(SqlitePool),
    #[cfg(feature = "postgres")]
    Postgres(PgPool),
}

impl DbPool {
    /// `postgres://` and `postgresql://` URLs select PostgreSQL, anything else
    /// is treated as a SQLite path.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        if !is_postgres_url(url) {
            return Ok(DbPool::Sqlite(SqlitePool::new(url)));
        }

        #[cfg(feature = "postgres")]
        {
            Ok(DbPool::Postgres(PgPool::new(url)?))
        }
        #[cfg(not(feature = "postgres"))]
        {
            Err(to_diesel_error(
                "PostgreSQL support not compiled. Rebuild with --features postgres",
            ))
        }
    }

    pub fn sqlite_from_path(path: &Path) -> Self {
        DbPool::Sqlite(SqlitePool::from_path(path))
    }
}

/// Check out a connection from either backend and run `$body` with it bound
/// to `$conn`. The body must type-check against both connection types.
#[macro_export]
macro_rules! with_conn {
    ($pool:expr, $conn:ident => $body:expr) => {{
        match &$pool {
            $crate::repository::pool::DbPool::Sqlite(pool) => {
                let mut $conn = pool.get().await?;
                $body
            }
            #[cfg(feature = "postgres")]
            $crate::repository::pool::DbPool::Postgres(pool) => {
                let mut $conn = pool.get().await?;
                $body
            }
        }
    }};
}
