//! Error types for ticketdesk.
//!
//! This crate provides the foundation error types used throughout the ticketdesk workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use ticketdesk_error::{ConfigError, DeskResult};
//!
//! fn load_token() -> DeskResult<String> {
//!     Err(ConfigError::missing("discord.token"))?
//! }
//!
//! match load_token() {
//!     Ok(token) => println!("Got: {}", token),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod validation;

pub use api::{ApiError, ApiErrorKind, ApiResult};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{DeskError, DeskErrorKind, DeskResult};
pub use validation::{ValidationError, ValidationErrorKind};
