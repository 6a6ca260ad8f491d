//! Status enums and their transition tables
//!
//! The transition tables live here, next to the enums, so the console UI can
//! decide which actions to offer without duplicating the rules. The engine
//! enforces the same tables before every persisted status change.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Invoice
// =============================================================================

/// Invoice lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// The transition table. Everything not matched here is rejected.
    ///
    /// A draft is fully mutable and may be moved to any other status by a
    /// direct edit. Once sent, only the explicit collection actions remain:
    /// mark paid, fall overdue, or cancel. Paid and Cancelled are absorbing.
    pub fn can_transition_to(self, next: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        match (self, next) {
            (Draft, n) => n != Draft,
            (Sent, Paid) | (Sent, Overdue) | (Sent, Cancelled) => true,
            (Overdue, Cancelled) => true,
            _ => false,
        }
    }

    /// Absorbing states: no outgoing transitions defined
    pub fn is_terminal(self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }

    /// Full edits (items, client, tax, number) are only allowed in draft
    pub fn is_editable(self) -> bool {
        matches!(self, InvoiceStatus::Draft)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// Order fulfilment status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Forward-only through Pending → Processing → Completed, one step at a
    /// time; Cancelled is reachable from any non-completed state.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Completed)
                | (Pending, Cancelled)
                | (Processing, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Expense
// =============================================================================

/// Fixed expense category set
///
/// Documents written before the category feature, or with a category that is
/// no longer in the set, deserialize as `Other` rather than being dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    OfficeSupplies,
    Marketing,
    Travel,
    Software,
    Equipment,
    Utilities,
    #[default]
    Other,
}

impl ExpenseCategory {
    /// Every category, in report display order
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::OfficeSupplies,
        ExpenseCategory::Marketing,
        ExpenseCategory::Travel,
        ExpenseCategory::Software,
        ExpenseCategory::Equipment,
        ExpenseCategory::Utilities,
        ExpenseCategory::Other,
    ];

    /// Parse a stored category name; unknown or retired names fold into Other
    pub fn from_string(s: &str) -> Self {
        match s {
            "OFFICE_SUPPLIES" => ExpenseCategory::OfficeSupplies,
            "MARKETING" => ExpenseCategory::Marketing,
            "TRAVEL" => ExpenseCategory::Travel,
            "SOFTWARE" => ExpenseCategory::Software,
            "EQUIPMENT" => ExpenseCategory::Equipment,
            "UTILITIES" => ExpenseCategory::Utilities,
            _ => ExpenseCategory::Other,
        }
    }

    /// Display label used in reports and exports
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::OfficeSupplies => "Office Supplies",
            ExpenseCategory::Marketing => "Marketing",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Software => "Software",
            ExpenseCategory::Equipment => "Equipment",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl<'de> Deserialize<'de> for ExpenseCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ExpenseCategory::from_string(&raw))
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
