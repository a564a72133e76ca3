//! OTA manifest entries
//!
//! An entry describes one published update artifact. Entries are built once,
//! at announce time, and never modified afterwards.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::digest::Digester;
use crate::error::{Error, Result};

/// Number of hex characters of the SHA256 digest used as the entry id
pub const ID_HEX_LEN: usize = 32;

/// A published OTA artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Release timestamp; `None` when the caller passed a non-numeric value
    pub datetime: Option<Number>,

    /// Artifact base name
    pub filename: String,

    /// Content fingerprint, the first 32 hex characters of `sha256`
    pub id: String,

    /// Full lowercase hex SHA256 digest
    pub sha256: String,

    /// Update type, case preserved
    pub romtype: String,

    /// Artifact size in bytes
    pub size: u64,

    /// Download URL
    pub url: String,

    /// OS version
    pub version: String,

    /// Fields written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Builds an [`Entry`] from an artifact on disk
pub struct EntryBuilder<'a> {
    timestamp: &'a str,
    base_url: &'a str,
    os_version: &'a str,
    update_type: &'a str,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(
        timestamp: &'a str,
        base_url: &'a str,
        os_version: &'a str,
        update_type: &'a str,
    ) -> Self {
        Self {
            timestamp,
            base_url,
            os_version,
            update_type,
        }
    }

    /// Stat and hash the artifact, then assemble the entry
    pub fn build(&self, artifact: &Utf8Path, digester: &dyn Digester) -> Result<Entry> {
        let metadata =
            std::fs::metadata(artifact).map_err(|e| Error::artifact_access(artifact, e))?;
        if !metadata.is_file() {
            return Err(Error::artifact_access(
                artifact,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let filename = artifact
            .file_name()
            .ok_or_else(|| {
                Error::artifact_access(
                    artifact,
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })?
            .to_string();

        let sha256 = digester.digest(artifact)?;
        let id = fingerprint(&sha256)
            .ok_or_else(|| Error::digest(artifact, format!("digest too short: {}", sha256)))?
            .to_string();
        debug!("Fingerprint of {}: {}", filename, id);

        Ok(Entry {
            datetime: parse_timestamp(self.timestamp),
            url: format!("{}/{}", self.base_url, filename),
            filename,
            id,
            sha256,
            romtype: self.update_type.to_string(),
            size: metadata.len(),
            version: self.os_version.to_string(),
            extra: Map::new(),
        })
    }
}

/// Truncate a hex digest to the entry id
pub fn fingerprint(sha256: &str) -> Option<&str> {
    sha256.get(..ID_HEX_LEN)
}

/// Parse a timestamp using leading-integer semantics
///
/// Leading whitespace and a sign are accepted, a `0x`/`0X` prefix switches
/// to hexadecimal, and parsing stops at the first character that is not a
/// digit of the radix. Values outside the 64-bit integer range are kept as
/// floating point numbers. Returns `None` when no digits are present.
pub fn parse_timestamp(raw: &str) -> Option<Number> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let digits_end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }

    if let Ok(value) = i64::from_str_radix(digits, radix) {
        return Some(Number::from(if negative { -value } else { value }));
    }
    if !negative {
        if let Ok(value) = u64::from_str_radix(digits, radix) {
            return Some(Number::from(value));
        }
    }
    let magnitude = digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0f64, |acc, d| acc * f64::from(radix) + f64::from(d));
    Number::from_f64(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Sha256Digester;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const HELLO_SHA256: &str = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";

    struct FixedDigester(&'static str);

    impl Digester for FixedDigester {
        fn digest(&self, _path: &Utf8Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn artifact(dir: &TempDir, name: &str, data: &[u8]) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        std::fs::write(&path, data).unwrap();
        path
    }

    fn ts(raw: &str) -> Option<i64> {
        parse_timestamp(raw).and_then(|n| n.as_i64())
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(ts("1700000000"), Some(1_700_000_000));
        assert_eq!(ts("  42"), Some(42));
        assert_eq!(ts("-7"), Some(-7));
        assert_eq!(ts("+7"), Some(7));
        assert_eq!(ts("123abc"), Some(123));
        assert_eq!(ts("12.5"), Some(12));
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("-"), None);
    }

    #[test]
    fn test_parse_timestamp_hex_prefix() {
        assert_eq!(ts("0x1A"), Some(26));
        assert_eq!(ts("0X1a"), Some(26));
        assert_eq!(ts("-0x10"), Some(-16));
        assert_eq!(ts("0x1Ag"), Some(26));
        assert_eq!(parse_timestamp("0x"), None);
        assert_eq!(parse_timestamp("0xg"), None);
    }

    #[test]
    fn test_parse_timestamp_beyond_i64() {
        let max_u64 = parse_timestamp("18446744073709551615").unwrap();
        assert_eq!(max_u64.as_u64(), Some(u64::MAX));

        let huge = parse_timestamp("100000000000000000000").unwrap();
        assert_eq!(huge.as_f64(), Some(1e20));

        let negative = parse_timestamp("-100000000000000000000").unwrap();
        assert_eq!(negative.as_f64(), Some(-1e20));
    }

    #[test]
    fn test_fingerprint_truncates_to_32_chars() {
        assert_eq!(
            fingerprint(HELLO_SHA256),
            Some("dffd6021bb2bd5b0af676290809ec3a5")
        );
        assert_eq!(fingerprint("abc"), None);
    }

    #[test]
    fn test_build_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = artifact(&temp_dir, "foo-ota-20240101.zip", b"Hello, World!");

        let entry = EntryBuilder::new("1704067200", "https://dl.example.com/foo", "14", "Nightly")
            .build(&path, &Sha256Digester)
            .unwrap();

        assert_eq!(entry.datetime, Some(Number::from(1_704_067_200)));
        assert_eq!(entry.filename, "foo-ota-20240101.zip");
        assert_eq!(entry.id, "dffd6021bb2bd5b0af676290809ec3a5");
        assert_eq!(entry.sha256, HELLO_SHA256);
        assert_eq!(entry.romtype, "Nightly");
        assert_eq!(entry.size, 13);
        assert_eq!(
            entry.url,
            "https://dl.example.com/foo/foo-ota-20240101.zip"
        );
        assert_eq!(entry.version, "14");
        assert!(entry.extra.is_empty());
    }

    #[test]
    fn test_build_entry_non_numeric_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let path = artifact(&temp_dir, "ota.zip", b"data");

        let entry = EntryBuilder::new("soon", "https://x", "14", "stable")
            .build(&path, &Sha256Digester)
            .unwrap();
        assert_eq!(entry.datetime, None);

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["datetime"].is_null());
    }

    #[test]
    fn test_build_entry_missing_artifact() {
        let result = EntryBuilder::new("1", "https://x", "14", "stable")
            .build(Utf8Path::new("/nonexistent/ota.zip"), &Sha256Digester);

        match result {
            Err(Error::ArtifactAccess { path, .. }) => {
                assert_eq!(path, Utf8PathBuf::from("/nonexistent/ota.zip"))
            }
            other => panic!("Expected ArtifactAccess, got {:?}", other),
        }
    }

    #[test]
    fn test_build_entry_rejects_short_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path = artifact(&temp_dir, "ota.zip", b"data");

        let result = EntryBuilder::new("1", "https://x", "14", "stable")
            .build(&path, &FixedDigester("abcd"));
        assert!(matches!(result, Err(Error::Digest { .. })));
    }

    #[test]
    fn test_entry_field_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = artifact(&temp_dir, "ota.zip", b"data");

        let entry = EntryBuilder::new("1", "https://x", "14", "stable")
            .build(&path, &Sha256Digester)
            .unwrap();
        let json = serde_json::to_string(&entry).unwrap();

        let keys = [
            "\"datetime\"",
            "\"filename\"",
            "\"id\"",
            "\"sha256\"",
            "\"romtype\"",
            "\"size\"",
            "\"url\"",
            "\"version\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", json);
    }

    #[test]
    fn test_entry_keeps_unknown_fields() {
        let raw = r#"{
            "datetime": 1,
            "filename": "a.zip",
            "id": "00000000000000000000000000000000",
            "sha256": "0000000000000000000000000000000000000000000000000000000000000000",
            "romtype": "stable",
            "size": 10,
            "url": "https://x/a.zip",
            "version": "13",
            "changelog": "https://x/a.txt"
        }"#;
        let entry: Entry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.extra["changelog"], "https://x/a.txt");

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["changelog"], "https://x/a.txt");
    }
}
