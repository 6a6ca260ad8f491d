//! Expense Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Expense, ExpenseCreate, ExpenseUpdate};
use chrono::{DateTime, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "expense";

#[derive(Clone)]
pub struct ExpenseRepository {
    base: BaseRepository,
}

impl ExpenseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new expense
    pub async fn create(&self, data: ExpenseCreate) -> RepoResult<Expense> {
        if data.description.trim().is_empty() {
            return Err(RepoError::MissingField("description".to_string()));
        }
        if !data.amount.is_finite() || data.amount <= 0.0 {
            return Err(RepoError::Validation(format!(
                "expense amount must be positive, got {}",
                data.amount
            )));
        }

        let now = Utc::now();
        let expense = Expense {
            id: None,
            category: data.category,
            amount: data.amount,
            date: data.date.unwrap_or(now),
            description: data.description,
            created_at: now,
        };

        let created: Option<Expense> = self.base.db().create(TABLE).content(expense).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create expense".to_string()))
    }

    /// All expenses, unordered (callers sort)
    pub async fn find_all(&self) -> RepoResult<Vec<Expense>> {
        let expenses: Vec<Expense> = self.base.db().select(TABLE).await?;
        Ok(expenses)
    }

    /// Find expense by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Expense>> {
        let expense: Option<Expense> = self.base.db().select((TABLE, record_key(TABLE, id))).await?;
        Ok(expense)
    }

    /// Expenses dated in [start, end)
    pub async fn find_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Expense>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM expense WHERE date >= $start AND date < $end")
            .bind(("start", start.timestamp_millis()))
            .bind(("end", end.timestamp_millis()))
            .await?;
        let expenses: Vec<Expense> = result.take(0)?;
        Ok(expenses)
    }

    /// Update an expense
    pub async fn update(&self, id: &str, data: ExpenseUpdate) -> RepoResult<Expense> {
        let key = record_key(TABLE, id);
        let existing = self
            .find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Expense {} not found", id)))?;

        let mut updated = existing.clone();
        if let Some(v) = data.category {
            updated.category = v;
        }
        if let Some(amount) = data.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(RepoError::Validation(format!(
                    "expense amount must be positive, got {}",
                    amount
                )));
            }
            updated.amount = amount;
        }
        if let Some(v) = data.date {
            updated.date = v;
        }
        if let Some(v) = data.description {
            if v.trim().is_empty() {
                return Err(RepoError::MissingField("description".to_string()));
            }
            updated.description = v;
        }

        updated.id = None;
        let persisted: Option<Expense> =
            self.base.db().update((TABLE, key)).content(updated).await?;
        persisted.ok_or_else(|| RepoError::NotFound(format!("Expense {} not found", id)))
    }

    /// Hard delete
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<Expense> = self.base.db().delete((TABLE, record_key(TABLE, id))).await?;
        Ok(deleted.is_some())
    }
}
