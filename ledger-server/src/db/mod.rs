//! Database Module
//!
//! Owns the embedded SurrealDB handle. Every repository call is an
//! independent round-trip with no cross-call transaction; multi-step
//! sequences (order completion + invoice creation) are reconciled at the
//! application level, not here.

pub mod models;
pub mod repository;

use shared::{AppError, AppResult};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "ledger";
const DATABASE: &str = "ops";

/// Database service - owns the SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open the store at the given path (RocksDB-backed)
    pub async fn open(path: &str) -> AppResult<Self> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::store_unavailable(format!("Failed to open store: {}", e)))?;
        Self::select_database(&db).await?;
        tracing::info!(path = %path, "Store opened");
        Ok(Self { db })
    }

    /// Open an in-memory store (tests, ephemeral sessions)
    pub async fn memory() -> AppResult<Self> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::store_unavailable(format!("Failed to open store: {}", e)))?;
        Self::select_database(&db).await?;
        Ok(Self { db })
    }

    async fn select_database(db: &Surreal<Db>) -> AppResult<()> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::store_unavailable(format!("Failed to select database: {}", e)))
    }

    /// Clone of the underlying handle for repository construction
    pub fn handle(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
