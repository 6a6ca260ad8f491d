//! Invoice Counter Repository
//!
//! One counter document per billing period (`invoice_counter:<YYYYMM>`),
//! bumped with an atomic upsert so invoice numbers never collide within a
//! period. Display numbers are built from these sequences; record ids stay
//! the primary key.

use super::{BaseRepository, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "invoice_counter";

#[derive(Debug, Serialize, Deserialize)]
struct Counter {
    value: i64,
}

#[derive(Clone)]
pub struct InvoiceCounterRepository {
    base: BaseRepository,
}

impl InvoiceCounterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically advance and return the sequence for a period (`YYYYMM`)
    pub async fn next(&self, period: &str) -> RepoResult<i64> {
        let id = RecordId::from_table_key(TABLE, period);
        let mut result = self
            .base
            .db()
            .query("UPSERT $id SET value = (value ?? 0) + 1 RETURN AFTER")
            .bind(("id", id))
            .await?;
        let counter: Option<Counter> = result.take(0)?;
        counter
            .map(|c| c.value)
            .ok_or_else(|| RepoError::Database("Counter upsert returned no record".to_string()))
    }
}
