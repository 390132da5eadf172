//! # VGC Common Library
//!
//! Shared code for the VGC workspace:
//! - Error taxonomy (`Error` enum, `Result` alias)
//! - Candidate / domain / category data types
//! - Configuration loading and root folder resolution
//! - Duration parsing and formatting utilities

pub mod config;
pub mod duration;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Candidate, CandidateKind, Category, Domain};
