//! Announce configuration
//!
//! Inputs arrive as `OTA_*` environment variables (or the equivalent CLI
//! flags). Every required input is checked in a single pass so that all
//! missing names can be reported together before any other work starts.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use tracing::{debug, error};

use crate::error::{Error, Result};

/// Environment variable holding the device codename
pub const ENV_DEVICE: &str = "OTA_DEVICE";
/// Environment variable holding the update type
pub const ENV_TYPE: &str = "OTA_TYPE";
/// Environment variable holding the release timestamp
pub const ENV_TIMESTAMP: &str = "OTA_TIMESTAMP";
/// Environment variable holding the artifact path
pub const ENV_PATH: &str = "OTA_PATH";
/// Environment variable holding the signed flag (`1` means signed)
pub const ENV_SIGNED: &str = "OTA_SIGNED";
/// Environment variable holding the download base URL
pub const ENV_BASE_URL: &str = "OTA_BASE_URL";
/// Environment variable holding the OS version
pub const ENV_OS_VERSION: &str = "OTA_OS_VERSION";
/// Environment variable overriding the manifest directory
pub const ENV_MANIFEST_DIR: &str = "OTA_MANIFEST_DIR";

/// Which keys an artifact was signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningTier {
    /// Signed with release keys
    ReleaseKeys,
    /// Signed with test keys (unsigned builds)
    TestKeys,
}

impl SigningTier {
    /// Map the raw `OTA_SIGNED` value to a tier; only `"1"` is signed
    pub fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("1") => Self::ReleaseKeys,
            _ => Self::TestKeys,
        }
    }

    /// Tag embedded in manifest file names
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ReleaseKeys => "release-keys",
            Self::TestKeys => "test-keys",
        }
    }
}

impl fmt::Display for SigningTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Raw, unvalidated announce inputs
#[derive(Debug, Clone, Default)]
pub struct AnnounceInputs {
    pub device: Option<String>,
    pub update_type: Option<String>,
    pub timestamp: Option<String>,
    pub artifact_path: Option<String>,
    pub signed: Option<String>,
    pub base_url: Option<String>,
    pub os_version: Option<String>,
    pub manifest_dir: Option<String>,
}

impl AnnounceInputs {
    /// Validate all required inputs at once
    ///
    /// Empty values count as missing. Each missing name is logged and the
    /// returned error carries the full list.
    pub fn validate(self) -> Result<AnnounceConfig> {
        let mut missing = Vec::new();

        let mut require = |value: Option<String>, name: &'static str| -> String {
            match value {
                Some(v) if !v.is_empty() => v,
                _ => {
                    error!("Missing input environment variable {}", name);
                    missing.push(name);
                    String::new()
                }
            }
        };

        let device = require(self.device, ENV_DEVICE);
        let update_type = require(self.update_type, ENV_TYPE);
        let timestamp = require(self.timestamp, ENV_TIMESTAMP);
        let artifact_path = require(self.artifact_path, ENV_PATH);
        let os_version = require(self.os_version, ENV_OS_VERSION);
        let base_url = require(self.base_url, ENV_BASE_URL);

        if !missing.is_empty() {
            return Err(Error::missing_inputs(missing));
        }

        let manifest_dir = match self.manifest_dir.filter(|d| !d.is_empty()) {
            Some(dir) => Utf8PathBuf::from(dir),
            None => default_manifest_dir()?,
        };

        let config = AnnounceConfig {
            device,
            update_type,
            timestamp,
            artifact_path: Utf8PathBuf::from(artifact_path),
            tier: SigningTier::from_flag(self.signed.as_deref()),
            base_url,
            os_version,
            manifest_dir,
        };
        debug!("Resolved announce config: {:?}", config);
        Ok(config)
    }
}

/// Validated announce configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceConfig {
    pub device: String,
    pub update_type: String,
    pub timestamp: String,
    pub artifact_path: Utf8PathBuf,
    pub tier: SigningTier,
    pub base_url: String,
    pub os_version: String,
    pub manifest_dir: Utf8PathBuf,
}

impl AnnounceConfig {
    /// Directory the manifests live in
    pub fn manifest_dir(&self) -> &Utf8Path {
        &self.manifest_dir
    }
}

/// Default manifest directory: `../ota` next to the running executable
pub fn default_manifest_dir() -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = Utf8PathBuf::from_path_buf(exe).map_err(|p| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("executable path is not valid UTF-8: {}", p.display()),
        ))
    })?;
    let exe_dir = exe.parent().unwrap_or_else(|| Utf8Path::new("."));
    Ok(exe_dir.join("..").join("ota"))
}
