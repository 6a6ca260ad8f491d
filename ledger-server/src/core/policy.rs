//! Access policy
//!
//! A capability object passed explicitly into each service at construction
//! and evaluated once at the operation boundary. There are no per-screen
//! flags; the UI's role gate maps a signed-in staff user to one of these.

use shared::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    pub manage_billing: bool,
    pub manage_orders: bool,
    pub record_expenses: bool,
    pub view_reports: bool,
}

impl Policy {
    /// Full capability set (admin)
    pub fn allow_all() -> Self {
        Self {
            manage_billing: true,
            manage_orders: true,
            record_expenses: true,
            view_reports: true,
        }
    }

    /// Reporting only
    pub fn read_only() -> Self {
        Self {
            manage_billing: false,
            manage_orders: false,
            record_expenses: false,
            view_reports: true,
        }
    }

    pub fn require_manage_billing(&self) -> AppResult<()> {
        require(self.manage_billing, "manage billing")
    }

    pub fn require_manage_orders(&self) -> AppResult<()> {
        require(self.manage_orders, "manage orders")
    }

    pub fn require_record_expenses(&self) -> AppResult<()> {
        require(self.record_expenses, "record expenses")
    }

    pub fn require_view_reports(&self) -> AppResult<()> {
        require(self.view_reports, "view reports")
    }
}

fn require(granted: bool, action: &str) -> AppResult<()> {
    if granted {
        Ok(())
    } else {
        Err(AppError::permission_denied(action))
    }
}
