//! Announce a new OTA artifact
//!
//! Locates the manifest for the configured device/type/tier, fingerprints
//! the artifact and appends a new entry. The conflict check runs before
//! anything is written, so a failed announce leaves the manifest untouched.

use camino::Utf8PathBuf;
use tracing::{error, info};

use crate::config::AnnounceConfig;
use crate::digest::Digester;
use crate::entry::{Entry, EntryBuilder};
use crate::error::{Error, Result};
use crate::manifest::{DefaultReason, LoadedManifest, ManifestKey};

/// Result of a successful announce
#[derive(Debug, Clone)]
pub struct AnnounceOutcome {
    /// The appended entry
    pub entry: Entry,

    /// Manifest that was written
    pub manifest_path: Utf8PathBuf,

    /// Why the manifest started from the empty default; `None` when an
    /// existing manifest was extended
    pub default_reason: Option<DefaultReason>,

    /// Number of entries after the append
    pub total_entries: usize,
}

/// Append a new entry for the configured artifact to its manifest
pub fn announce(config: &AnnounceConfig, digester: &dyn Digester) -> Result<AnnounceOutcome> {
    let key = ManifestKey::new(&config.device, &config.update_type, config.tier);
    let manifest_path = key.path_in(config.manifest_dir());
    info!("Announcing {} to {}", config.artifact_path, manifest_path);

    let loaded = LoadedManifest::load(&manifest_path);
    let default_reason = loaded.default_reason().cloned();
    let mut manifest = loaded.into_manifest();

    let entry = EntryBuilder::new(
        &config.timestamp,
        &config.base_url,
        &config.os_version,
        &config.update_type,
    )
    .build(&config.artifact_path, digester)?;

    if let Err(err) = manifest.append(entry.clone()) {
        if let Error::FingerprintConflict { new, existing } = &err {
            error!("New OTA entry {:?} conflicts with an old one: {:?}", new, existing);
        }
        return Err(err);
    }
    manifest.save(&manifest_path)?;

    Ok(AnnounceOutcome {
        entry,
        manifest_path,
        default_reason,
        total_entries: manifest.len(),
    })
}
