//! Common utilities for sqlweave
//!
//! This crate provides shared functionality used across all sqlweave crates.

pub mod error;

pub use error::{Result, SqlWeaveError};
