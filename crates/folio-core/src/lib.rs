//! # folio-core
//!
//! Core types, traits, and abstractions for the folio archive library.
//!
//! This crate provides the foundational data structures and trait definitions
//! that other folio crates depend on.

pub mod error;
pub mod logging;
pub mod models;
pub mod search;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result, ValidationErrors, ValidationFailure};
pub use models::*;
pub use search::*;
pub use traits::*;
