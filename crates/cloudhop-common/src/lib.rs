//! cloudhop Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the cloudhop workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`MigrateError`] and the [`Result`] alias
//! - **Logging**: `tracing` subscriber setup driven by [`logging::LogConfig`]
//! - **Types**: container roles, object summaries and staged entries
//! - **Formatting**: human-readable byte sizes
//!
//! # Example
//!
//! ```no_run
//! use cloudhop_common::{format::format_bytes, MigrateError, Result};
//!
//! fn report(total: u64) -> Result<()> {
//!     if total == 0 {
//!         return Err(MigrateError::Config("nothing to report".into()));
//!     }
//!     println!("Total: {}", format_bytes(total));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod format;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{MigrateError, Result};
pub use types::{ContainerRole, ObjectSummary, StagedEntry};
