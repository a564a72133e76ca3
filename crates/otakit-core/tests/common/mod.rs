//! Common test infrastructure for otakit-core tests
//!
//! Provides a temporary release workspace with an artifact directory and a
//! manifest directory, plus helpers to build announce configs against it.

#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use otakit_core::{AnnounceConfig, SigningTier};
use tempfile::TempDir;

/// SHA256 of "Hello, World!"
pub const HELLO_SHA256: &str = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";

pub const BASE_URL: &str = "https://dl.example.com/foo";

/// Temporary release workspace
pub struct ReleaseDir {
    _temp_dir: TempDir,
    root: Utf8PathBuf,
}

impl ReleaseDir {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(root.join("out")).unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    pub fn manifest_dir(&self) -> Utf8PathBuf {
        self.root.join("ota")
    }

    /// Write an artifact into the output directory
    pub fn artifact(&self, name: &str, data: &[u8]) -> Utf8PathBuf {
        let path = self.root.join("out").join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    /// Announce config for device `foo`, type `Nightly`, unsigned
    pub fn config(&self, artifact: &Utf8Path, timestamp: &str) -> AnnounceConfig {
        AnnounceConfig {
            device: "foo".to_string(),
            update_type: "Nightly".to_string(),
            timestamp: timestamp.to_string(),
            artifact_path: artifact.to_owned(),
            tier: SigningTier::TestKeys,
            base_url: BASE_URL.to_string(),
            os_version: "14".to_string(),
            manifest_dir: self.manifest_dir(),
        }
    }

    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.manifest_dir().join("foo-nightly-test-keys.json")
    }

    /// Seed the manifest file with raw content
    pub fn write_manifest(&self, content: &str) {
        std::fs::create_dir_all(self.manifest_dir()).unwrap();
        std::fs::write(self.manifest_path(), content).unwrap();
    }

    /// Read the manifest file back as JSON
    pub fn read_manifest(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.manifest_path()).unwrap();
        serde_json::from_str(&content).unwrap()
    }
}
