//! Expense Service
//!
//! Thin policy gate over the expense adapter; expenses have no lifecycle.

use crate::core::policy::Policy;
use crate::db::models::{Expense, ExpenseCreate, ExpenseUpdate};
use crate::db::repository::ExpenseRepository;
use shared::{AppError, AppResult};
use validator::Validate;

#[derive(Clone)]
pub struct ExpenseService {
    expenses: ExpenseRepository,
    policy: Policy,
}

impl ExpenseService {
    pub fn new(expenses: ExpenseRepository, policy: Policy) -> Self {
        Self { expenses, policy }
    }

    pub async fn record_expense(&self, data: ExpenseCreate) -> AppResult<Expense> {
        self.policy.require_record_expenses()?;
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let created = self.expenses.create(data).await?;
        tracing::info!(
            category = %created.category,
            amount = created.amount,
            "Expense recorded"
        );
        Ok(created)
    }

    pub async fn update_expense(&self, id: &str, data: ExpenseUpdate) -> AppResult<Expense> {
        self.policy.require_record_expenses()?;
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        Ok(self.expenses.update(id, data).await?)
    }

    pub async fn delete_expense(&self, id: &str) -> AppResult<()> {
        self.policy.require_record_expenses()?;
        if !self.expenses.delete(id).await? {
            return Err(AppError::not_found("Expense"));
        }
        Ok(())
    }

    pub async fn list_expenses(&self) -> AppResult<Vec<Expense>> {
        Ok(self.expenses.find_all().await?)
    }

    pub async fn get_expense(&self, id: &str) -> AppResult<Expense> {
        self.expenses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Expense"))
    }
}
