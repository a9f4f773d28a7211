//! Connection pool and migrations.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use folio_error::{DatabaseError, DatabaseErrorKind, FolioResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const IN_MEMORY: &str = ":memory:";
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Pooled SQLite connection.
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// The `[database]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct DatabaseConfig {
    /// SQLite database file, or `:memory:`
    #[serde(default = "default_url")]
    url: String,
    /// Maximum pooled connections
    #[serde(default = "default_pool_size")]
    pool_size: u32,
}

fn default_url() -> String {
    "folio.db".to_string()
}

fn default_pool_size() -> u32 {
    8
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            pool_size: default_pool_size(),
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a database at `url`.
    pub fn new(url: impl Into<String>, pool_size: u32) -> Self {
        Self {
            url: url.into(),
            pool_size,
        }
    }

    /// A private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY, 1)
    }
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            BUSY_TIMEOUT_MS
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Handle to the media library database.
///
/// Cheap to clone; all clones share one pool. Blocking Diesel work runs on
/// the Tokio blocking pool through [`Database::run`].
#[derive(Clone)]
pub struct Database {
    pool: Pool<ConnectionManager<SqliteConnection>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl Database {
    /// Open the database and apply pending migrations.
    ///
    /// An in-memory database lives in a single never-recycled connection,
    /// so the configured pool size is ignored for it.
    #[tracing::instrument(skip(config), fields(url = %config.url))]
    pub fn open(config: &DatabaseConfig) -> FolioResult<Self> {
        let in_memory = config.url == IN_MEMORY;
        let manager = ConnectionManager::<SqliteConnection>::new(config.url.as_str());

        let mut builder = Pool::builder()
            .connection_customizer(Box::new(SqlitePragmas))
            .connection_timeout(Duration::from_secs(30));
        builder = if in_memory {
            builder.max_size(1).idle_timeout(None).max_lifetime(None)
        } else {
            builder.max_size(config.pool_size.max(1))
        };

        let pool = builder
            .build(manager)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

        let db = Self { pool };
        db.migrate()?;
        tracing::info!(in_memory, "Opened media library database");
        Ok(db)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> FolioResult<Self> {
        Self::open(&DatabaseConfig::in_memory())
    }

    fn migrate(&self) -> FolioResult<()> {
        let mut pooled = self.connection()?;
        let conn: &mut SqliteConnection = &mut pooled;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;
        if !applied.is_empty() {
            tracing::info!(count = applied.len(), "Applied migrations");
        }
        Ok(())
    }

    /// Check out a pooled connection on the current thread.
    pub fn connection(&self) -> FolioResult<DbConnection> {
        Ok(self.pool.get().map_err(DatabaseError::from)?)
    }

    /// Run blocking Diesel work with a pooled connection.
    pub async fn run<T, F>(&self, f: F) -> FolioResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> FolioResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(DatabaseError::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Task(e.to_string())))?
    }
}
