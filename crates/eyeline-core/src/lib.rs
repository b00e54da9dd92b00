//! # eyeline-core
//!
//! Core crate for Eyeline. Contains the artifact-store and detector traits,
//! configuration schemas, typed identifiers, coordinate types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Eyeline crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, JobError};
pub use result::AppResult;
