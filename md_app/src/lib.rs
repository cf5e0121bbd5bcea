//! # md_app
//!
//! Wiring for the `md_feed` binary: configuration, tracing, Ctrl+C handling
//! and the cached catalogue lookups.

pub mod catalog;
pub mod cli;
pub mod config_loader;
pub mod shutdown_handler;
pub mod tracing_setup;
