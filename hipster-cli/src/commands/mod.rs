//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (init, path, show)
//! - [`generate`] - Build a full HiPS pyramid from a catalog
//! - [`mosaic`] - Rebuild Allsky mosaics from existing tiles

pub mod common;
pub mod config;
pub mod generate;
pub mod mosaic;
