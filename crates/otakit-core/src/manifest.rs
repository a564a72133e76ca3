//! OTA manifest files
//!
//! One manifest exists per (device, update type, signing tier) and lives at
//! `{manifest_dir}/{device}-{type}-{tier}.json`:
//! ```json
//! {
//!   "response": [
//!     {
//!       "datetime": 1704067200,
//!       "filename": "foo-ota-20240101.zip",
//!       "id": "dffd6021bb2bd5b0af676290809ec3a5",
//!       "sha256": "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f",
//!       "romtype": "Nightly",
//!       "size": 1048576,
//!       "url": "https://dl.example.com/foo/foo-ota-20240101.zip",
//!       "version": "14"
//!     }
//!   ]
//! }
//! ```
//!
//! Manifests are append-only. Entries already on disk are kept as raw JSON
//! objects and written back unchanged; only their `id` is consulted. A file
//! is malformed only when it is not JSON or has no `response` array.
//! Concurrent announces for the same manifest are not guarded against;
//! callers serialize them.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::ErrorKind;
use tracing::{debug, info, warn};

use crate::config::SigningTier;
use crate::entry::Entry;
use crate::error::{Error, Result};

/// Identifies a manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestKey {
    pub device: String,
    pub update_type: String,
    pub tier: SigningTier,
}

impl ManifestKey {
    pub fn new(
        device: impl Into<String>,
        update_type: impl Into<String>,
        tier: SigningTier,
    ) -> Self {
        Self {
            device: device.into(),
            update_type: update_type.into(),
            tier,
        }
    }

    /// Manifest file name; the update type is lowercased, the device is not
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.json",
            self.device,
            self.update_type.to_lowercase(),
            self.tier.tag()
        )
    }

    /// Full, lexically normalized manifest path under `manifest_dir`
    pub fn path_in(&self, manifest_dir: &Utf8Path) -> Utf8PathBuf {
        normalize(&manifest_dir.join(self.file_name()))
    }
}

/// Resolve `.` and `..` components without touching the filesystem
fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    let mut out: Vec<Utf8Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.last() {
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return Utf8PathBuf::from(".");
    }
    out.iter().map(|c| c.as_str()).collect()
}

/// Parsed manifest contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Entries in append order, oldest first
    pub response: Vec<Value>,

    /// Top-level fields written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why a manifest fell back to the empty default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// No file at the manifest path
    Missing,
    /// The file exists but could not be read
    Unreadable(String),
    /// The file is not a manifest
    Malformed(String),
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("file does not exist"),
            Self::Unreadable(e) => write!(f, "unreadable: {}", e),
            Self::Malformed(e) => write!(f, "malformed: {}", e),
        }
    }
}

/// Outcome of loading a manifest from disk
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedManifest {
    Parsed(Manifest),
    Default { reason: DefaultReason },
}

impl LoadedManifest {
    /// Read a manifest, falling back to an empty one on any failure
    pub fn load(path: &Utf8Path) -> Self {
        debug!("Loading manifest from: {}", path);

        let loaded = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Manifest>(&content) {
                Ok(manifest) => {
                    debug!("Loaded manifest with {} entries", manifest.response.len());
                    return Self::Parsed(manifest);
                }
                Err(e) => Self::Default {
                    reason: DefaultReason::Malformed(e.to_string()),
                },
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Self::Default {
                reason: DefaultReason::Missing,
            },
            Err(e) => Self::Default {
                reason: DefaultReason::Unreadable(e.to_string()),
            },
        };

        if let Self::Default { reason } = &loaded {
            warn!("Failed to load ota json from {} ({})", path, reason);
        }
        loaded
    }

    /// Whether the empty default manifest was substituted
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default { .. })
    }

    /// Why the default was substituted, if it was
    pub fn default_reason(&self) -> Option<&DefaultReason> {
        match self {
            Self::Parsed(_) => None,
            Self::Default { reason } => Some(reason),
        }
    }

    pub fn into_manifest(self) -> Manifest {
        match self {
            Self::Parsed(manifest) => manifest,
            Self::Default { .. } => Manifest::default(),
        }
    }
}

/// Fingerprint of a recorded entry; `None` when it has no string `id`
pub fn recorded_id(recorded: &Value) -> Option<&str> {
    recorded.get("id").and_then(Value::as_str)
}

impl Manifest {
    /// Entry already recorded with the same fingerprint, if any
    pub fn find_conflict(&self, entry: &Entry) -> Option<&Value> {
        self.response
            .iter()
            .find(|old| recorded_id(old) == Some(entry.id.as_str()))
    }

    /// Append an entry unless its fingerprint is already recorded
    ///
    /// On conflict the manifest is left unchanged.
    pub fn append(&mut self, entry: Entry) -> Result<()> {
        if let Some(existing) = self.find_conflict(&entry) {
            return Err(Error::fingerprint_conflict(entry, existing.clone()));
        }
        self.response.push(serde_json::to_value(&entry)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.response.len()
    }

    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }

    /// Render as 2-space indented JSON
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Overwrite the manifest file, creating its directory if needed
    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let content = self.to_pretty_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::manifest_write(path, e))?;
        }
        std::fs::write(path, content).map_err(|e| Error::manifest_write(path, e))?;
        info!("Saved manifest {} with {} entries", path, self.len());
        Ok(())
    }
}
