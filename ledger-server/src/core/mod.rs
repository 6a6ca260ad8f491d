//! Core Module
//!
//! Configuration, access policy and the application state composition root.

pub mod config;
pub mod policy;
pub mod state;

// Re-exports
pub use config::Config;
pub use policy::Policy;
pub use state::AppState;
