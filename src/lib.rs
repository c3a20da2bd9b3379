//! Library crate for user-records-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - Remote API client and wire types (`api`)
//! - Application state, view operations and the event loop (`app`)
//! - Command-line settings (`config`)
//! - Error and result types (`error`)
//! - UI rendering (`ui`)
//!
//! It is used by the `user-records` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{ApiError, DynError, Result};
