//! # prepcall-db
//!
//! PostgreSQL database layer for prepcall.
//!
//! This crate provides:
//! - Connection pool management
//! - The brief repository implementation
//! - Schema migrations (feature `migrations`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use prepcall_db::Database;
//! use prepcall_core::BriefRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/prepcall").await?;
//!     let brief = db.briefs.fetch(some_id).await?;
//!     println!("{}", brief.company_name);
//!     Ok(())
//! }
//! ```

pub mod briefs;
pub mod pool;

// Re-export core types
pub use prepcall_core::*;

pub use briefs::PgBriefRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Brief repository for CRUD operations.
    pub briefs: std::sync::Arc<PgBriefRepository>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            briefs: std::sync::Arc::new(PgBriefRepository::new(pool.clone())),
            pool,
        }
    }

    /// Connect with default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
