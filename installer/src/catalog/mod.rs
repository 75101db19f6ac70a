//! Go release catalog: data model, parsing, and HTTP retrieval.
//!
//! The catalog is the JSON listing published at `go.dev/dl/?mode=json`.
//! A plaintext endpoint (`go.dev/VERSION?m=text`) naming the latest release
//! is consulted only when the catalog is unreachable or lacks a usable
//! stable entry.
//!
//! # Sub-modules
//!
//! - [`client`] - `ReleaseSource` trait and its HTTP implementation.
//! - [`error`] - Errors raised while fetching or parsing.
//! - [`parser`] - Catalog JSON and latest-version text parsing.
//! - [`release`] - `Release` and `ReleaseFile` catalog entries.

pub mod client;
pub mod error;
pub mod parser;
pub mod release;

pub use client::{HttpReleaseSource, ReleaseSource};
pub use error::CatalogError;
pub use parser::{parse_catalog, parse_latest_version};
pub use release::{ARCHIVE_KIND, Release, ReleaseFile, VERSION_PREFIX, strip_version_prefix};
