//! # otakit-core
//!
//! Core library for the otakit release pipeline CLI providing:
//! - Validated announce configuration (environment or flags)
//! - OTA manifest location, loading and append-only updates
//! - Content fingerprinting of update artifacts behind a [`Digester`]
//! - Working-tree status summaries for release notes
//! - Build target matrix expansion for CI

pub mod announce;
pub mod config;
pub mod digest;
pub mod entry;
pub mod error;
pub mod manifest;
pub mod status;
pub mod targets;

pub use announce::{announce, AnnounceOutcome};
pub use config::{AnnounceConfig, AnnounceInputs, SigningTier};
pub use digest::{Digester, Sha256Digester, Sha256sumDigester};
pub use entry::{Entry, EntryBuilder};
pub use error::{Error, Result};
pub use manifest::{DefaultReason, LoadedManifest, Manifest, ManifestKey};
pub use status::TreeStatus;
pub use targets::{BuildTarget, TargetMatrix};
