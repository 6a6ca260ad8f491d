//! Invoice number generation
//!
//! Numbers are `PREFIX-YYYYMM-NNN`: billing period in the business timezone
//! plus a per-period sequence from an atomic counter document in the store.
//! Unique within a prefix+period by construction; the store-assigned record
//! id remains the primary key and the number stays a display identifier.

use crate::db::repository::InvoiceCounterRepository;
use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use shared::AppResult;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct InvoiceNumberGenerator {
    counters: InvoiceCounterRepository,
    prefix: String,
    tz: Tz,
}

impl InvoiceNumberGenerator {
    pub fn new(db: Surreal<Db>, prefix: impl Into<String>, tz: Tz) -> Self {
        Self {
            counters: InvoiceCounterRepository::new(db),
            prefix: prefix.into(),
            tz,
        }
    }

    /// Next invoice number for the current billing period
    pub async fn next(&self) -> AppResult<String> {
        let now = Utc::now().with_timezone(&self.tz);
        let period = format!("{:04}{:02}", now.year(), now.month());
        let sequence = self.counters.next(&period).await?;
        Ok(format_invoice_number(&self.prefix, &period, sequence))
    }
}

/// Render a number; the sequence is zero-padded to 3 digits and widens
/// naturally past 999
pub fn format_invoice_number(prefix: &str, period: &str, sequence: i64) -> String {
    format!("{}-{}-{:03}", prefix, period, sequence)
}
