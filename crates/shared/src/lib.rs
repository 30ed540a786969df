//! Shared configuration, errors, and tracing setup for SwiftMedia.
//!
//! This crate provides the ambient pieces used by every other crate:
//! - Layered configuration for the object-storage connection
//! - Application-wide error type
//! - Tracing subscriber initialization

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::{AppConfig, LogConfig, LogFormat, StorageSettings};
pub use error::{AppError, AppResult};
