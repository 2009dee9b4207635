//! Common utilities module
//!
//! This module contains shared utilities used across the extraction pipeline.

pub mod error;

pub use error::{ExtractError, Result};
