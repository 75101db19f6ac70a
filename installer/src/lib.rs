//! gosetup installer library.
//!
//! This crate provides the core functionality for installing the Go
//! toolchain without a system package manager: platform detection, version
//! resolution against the go.dev release catalog, archive download and
//! extraction, and shell profile configuration. It is used by the `gosetup`
//! CLI binary and can be consumed programmatically for testing or custom
//! installation workflows.
//!
//! # Modules
//!
//! - [`catalog`] - Release catalog types, parsing, and HTTP client
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Run configuration built once at startup
//! - [`dirs`] - Directory resolution abstraction for the home directory
//! - [`download`] - Archive download and temporary directory checks
//! - [`error`] - Fatal error types surfaced by the binary
//! - [`extraction`] - `.tar.gz` extraction with path traversal protection
//! - [`logging`] - Debug output wiring for the `log` facade
//! - [`output`] - User-facing status, warning, and error lines
//! - [`pipeline`] - End-to-end installation orchestration
//! - [`platform`] - Host OS and architecture detection
//! - [`profile`] - Shell profile PATH configuration with fallbacks
//! - [`progress`] - Download progress reporting and byte formatting
//! - [`resolution`] - Version resolution and download URL synthesis
//! - [`target`] - Installation target directories
//! - [`verification`] - SHA-256 verification of downloaded archives

pub mod catalog;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod download;
pub mod error;
pub mod extraction;
pub(crate) mod http;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod profile;
pub mod progress;
pub mod resolution;
pub mod target;
pub mod verification;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
