//! The document being paged.
//!
//! This module handles:
//! - Loading a file from disk into a [`Document`]
//! - Deciding whether a file is markdown or source code
//! - Splitting a body into presentation slides ([`slides`])

pub mod slides;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use slides::{SlideDeck, parse_slides};

/// File extensions rendered as markdown. Anything else is rendered as code.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdown", "mkdn", "mkd", "markdown"];

/// A file opened in the pager.
///
/// Documents are never edited in place: a reload produces a new value that
/// replaces the old one wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    note: String,
    local_path: PathBuf,
    body: String,
}

impl Document {
    pub fn new(note: impl Into<String>, local_path: impl Into<PathBuf>, body: impl Into<String>) -> Self {
        Self {
            note: note.into(),
            local_path: local_path.into(),
            body: body.into(),
        }
    }

    /// Read `path` from disk.
    ///
    /// The stored path is canonicalized so it compares equal to the paths
    /// reported by filesystem notifications.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        let local_path = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        let raw_bytes = std::fs::read(&local_path)
            .with_context(|| format!("Failed to read {}", local_path.display()))?;
        let note = local_path
            .file_name()
            .map_or_else(|| local_path.display().to_string(), |n| {
                n.to_string_lossy().to_string()
            });
        Ok(Self {
            note,
            local_path,
            body: String::from_utf8_lossy(&raw_bytes).into_owned(),
        })
    }

    /// Display label shown in the status bar.
    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Extension of a file name, without the leading dot.
///
/// A dotfile such as `.bashrc` is all extension.
pub fn file_extension(name: &str) -> Option<&str> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    file_name.rfind('.').map(|dot| &file_name[dot + 1..])
}

/// Returns true for markdown extensions and for files without an extension.
pub fn is_markdown_file(name: &str) -> bool {
    let Some(ext) = file_extension(name) else {
        return true;
    };
    MARKDOWN_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// Wrap source code in a fenced block tagged with its language.
pub fn wrap_code_block(code: &str, language: &str) -> String {
    let mut out = format!("```{language}\n{code}");
    if !code.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("```");
    out
}
