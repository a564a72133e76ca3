//! Working-tree status summaries
//!
//! Turns porcelain-style status output (`XY path` per line) into a one-line
//! markdown fragment for release notes, e.g.
//! ``(Dirty, Modified: `a.txt`, `b.txt`, Untracked: `new.rs`)``.
//! A clean tree renders as an empty string.

use std::fmt;
use std::io::BufRead;

use crate::error::Result;

/// Status category of a changed path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Untracked,
    Deleted,
    Other,
}

impl ChangeKind {
    /// Render order of categories in the summary
    pub const ALL: [ChangeKind; 4] = [
        ChangeKind::Modified,
        ChangeKind::Untracked,
        ChangeKind::Deleted,
        ChangeKind::Other,
    ];

    /// Classify a porcelain status code
    pub fn from_code(code: &str) -> Self {
        match code {
            "??" => Self::Untracked,
            "M" => Self::Modified,
            "D" => Self::Deleted,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Modified => "Modified",
            Self::Untracked => "Untracked",
            Self::Deleted => "Deleted",
            Self::Other => "Other",
        }
    }
}

/// Changed paths grouped by category, first-seen order, no duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStatus {
    modified: Vec<String>,
    untracked: Vec<String>,
    deleted: Vec<String>,
    other: Vec<String>,
}

impl TreeStatus {
    /// Parse status lines from a string
    pub fn parse(input: &str) -> Self {
        let mut status = Self::default();
        for line in input.lines() {
            status.add_line(line);
        }
        status
    }

    /// Parse status lines from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut status = Self::default();
        status.read_from(reader)?;
        Ok(status)
    }

    /// Add every line of a reader to this status
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<()> {
        for line in reader.lines() {
            self.add_line(&line?);
        }
        Ok(())
    }

    /// Record one status line; blank lines are ignored
    pub fn add_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        let (code, path) = match line.split_once(char::is_whitespace) {
            Some((code, rest)) => (code, rest.trim_start()),
            None => (line, ""),
        };
        self.add(ChangeKind::from_code(code), path);
    }

    /// Record a path under a category
    pub fn add(&mut self, kind: ChangeKind, path: &str) {
        let paths = self.paths_mut(kind);
        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }

    pub fn paths(&self, kind: ChangeKind) -> &[String] {
        match kind {
            ChangeKind::Modified => &self.modified,
            ChangeKind::Untracked => &self.untracked,
            ChangeKind::Deleted => &self.deleted,
            ChangeKind::Other => &self.other,
        }
    }

    fn paths_mut(&mut self, kind: ChangeKind) -> &mut Vec<String> {
        match kind {
            ChangeKind::Modified => &mut self.modified,
            ChangeKind::Untracked => &mut self.untracked,
            ChangeKind::Deleted => &mut self.deleted,
            ChangeKind::Other => &mut self.other,
        }
    }

    pub fn is_clean(&self) -> bool {
        ChangeKind::ALL.iter().all(|k| self.paths(*k).is_empty())
    }

    /// Markdown summary; empty when the tree is clean
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TreeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return Ok(());
        }
        let groups: Vec<String> = ChangeKind::ALL
            .iter()
            .filter(|k| !self.paths(**k).is_empty())
            .map(|k| {
                let paths: Vec<String> = self.paths(*k).iter().map(|p| markdown_code(p)).collect();
                format!("{}: {}", k.label(), paths.join(", "))
            })
            .collect();
        write!(f, "(Dirty, {})", groups.join(", "))
    }
}

/// Render text as inline markdown code, escaping backticks
pub fn markdown_code(input: &str) -> String {
    format!("`{}`", input.replace('`', "\\`"))
}
