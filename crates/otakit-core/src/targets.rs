//! Build target matrix expansion
//!
//! Expands a comma-separated target list into a CI matrix. A trailing `+`
//! builds only a signed variant, a trailing `*` builds both signed and
//! unsigned variants, and a bare name builds only the unsigned variant.

use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use std::io;

use crate::error::{Error, Result};

/// One row of the CI build matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub target: String,
    pub sign: bool,
    pub unsigned: bool,
}

impl BuildTarget {
    /// Parse a single target item such as `foo+`, `foo*` or `foo`
    pub fn parse(item: &str) -> Self {
        if let Some(target) = item.strip_suffix('+') {
            Self {
                target: target.to_string(),
                sign: true,
                unsigned: false,
            }
        } else if let Some(target) = item.strip_suffix('*') {
            Self {
                target: target.to_string(),
                sign: true,
                unsigned: true,
            }
        } else {
            Self {
                target: item.to_string(),
                sign: false,
                unsigned: true,
            }
        }
    }
}

/// CI matrix in `strategy.matrix.include` form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMatrix {
    pub include: Vec<BuildTarget>,
}

impl TargetMatrix {
    /// Parse a comma-separated list; empty items are skipped
    pub fn parse(list: &str) -> Self {
        let include = list
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(BuildTarget::parse)
            .collect();
        Self { include }
    }

    /// Single-line JSON with `", "` and `": "` separators
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut ser)?;
        String::from_utf8(buf)
            .map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

/// Compact JSON with a space after every separator
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
