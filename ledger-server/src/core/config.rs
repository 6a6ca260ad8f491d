//! Engine configuration
//!
//! # Environment variables
//!
//! All configuration items can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | LEDGER_WORK_DIR | /var/lib/ledger | Work directory (store files, logs) |
//! | LEDGER_TIMEZONE | UTC | Business timezone (IANA name) |
//! | LEDGER_INVOICE_PREFIX | INV | Invoice number prefix |
//! | LEDGER_DUE_DAYS | 15 | Due days for bridged invoices |
//! | LEDGER_CURRENCY_SYMBOL | $ | Symbol used in exports |
//! | ENVIRONMENT | development | Runtime environment |

use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the store files and logs
    pub work_dir: String,
    /// Business timezone for billing periods and report bucketing
    pub timezone: Tz,
    /// Prefix on generated invoice numbers
    pub invoice_prefix: String,
    /// Payment window granted to invoices created by the order bridge
    pub invoice_due_days: i64,
    /// Currency symbol used by the exporters
    pub currency_symbol: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: "/var/lib/ledger".to_string(),
            timezone: chrono_tz::UTC,
            invoice_prefix: "INV".to_string(),
            invoice_due_days: 15,
            currency_symbol: "$".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults; a `.env` file is honored when
    /// present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Config::default();

        let timezone = std::env::var("LEDGER_TIMEZONE")
            .ok()
            .and_then(|name| match name.parse::<Tz>() {
                Ok(tz) => Some(tz),
                Err(_) => {
                    tracing::warn!(timezone = %name, "Unknown timezone, falling back to UTC");
                    None
                }
            })
            .unwrap_or(defaults.timezone);

        Self {
            work_dir: std::env::var("LEDGER_WORK_DIR").unwrap_or(defaults.work_dir),
            timezone,
            invoice_prefix: std::env::var("LEDGER_INVOICE_PREFIX").unwrap_or(defaults.invoice_prefix),
            invoice_due_days: std::env::var("LEDGER_DUE_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.invoice_due_days),
            currency_symbol: std::env::var("LEDGER_CURRENCY_SYMBOL")
                .unwrap_or(defaults.currency_symbol),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Path of the document store under the work directory
    pub fn store_path(&self) -> String {
        format!("{}/store", self.work_dir)
    }
}
