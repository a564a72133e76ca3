//! Artifact content digests
//!
//! OTA packages routinely exceed 2 GiB, so every implementation here streams
//! the file instead of loading it into memory.

use camino::Utf8Path;
use sha2::{Digest as _, Sha256};
use std::fs::File;
use std::io::Read;
use std::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Read buffer size for streaming digests (1MB)
const DIGEST_CHUNK_SIZE: usize = 1024 * 1024;

/// Length of a hex encoded SHA256 digest
pub const SHA256_HEX_LEN: usize = 64;

/// Computes the lowercase hex SHA256 digest of a file
pub trait Digester {
    fn digest(&self, path: &Utf8Path) -> Result<String>;
}

/// Native streaming SHA256
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digester;

impl Digester for Sha256Digester {
    fn digest(&self, path: &Utf8Path) -> Result<String> {
        let mut file = File::open(path).map_err(|e| Error::artifact_access(path, e))?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; DIGEST_CHUNK_SIZE];

        loop {
            let bytes_read = file
                .read(&mut buffer)
                .map_err(|e| Error::digest(path, e.to_string()))?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        let result = hasher.finalize();
        Ok(format!("{:x}", result))
    }
}

/// Delegates to the `sha256sum` utility
#[derive(Debug, Clone)]
pub struct Sha256sumDigester {
    program: String,
}

impl Sha256sumDigester {
    pub fn new() -> Self {
        Self {
            program: "sha256sum".to_string(),
        }
    }

    /// Use a different program with `sha256sum` compatible output
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for Sha256sumDigester {
    fn default() -> Self {
        Self::new()
    }
}

impl Digester for Sha256sumDigester {
    fn digest(&self, path: &Utf8Path) -> Result<String> {
        debug!("Running {} on {}", self.program, path);

        let output = Command::new(&self.program)
            .arg(path.as_str())
            .output()
            .map_err(|e| Error::digest(path, format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::digest(
                path,
                format!(
                    "{} exited with code {}: {}",
                    self.program,
                    output.status.code().unwrap_or(-1),
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_sha256sum_output(&stdout).ok_or_else(|| {
            Error::digest(
                path,
                format!("unexpected {} output: {}", self.program, stdout.trim()),
            )
        })
    }
}

/// Extract the digest from `<hex>  <file>` output
fn parse_sha256sum_output(stdout: &str) -> Option<String> {
    let token = stdout.split_whitespace().next()?;
    let token = token.strip_prefix('\\').unwrap_or(token);
    if token.len() == SHA256_HEX_LEN && token.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(token.to_ascii_lowercase())
    } else {
        None
    }
}
