//! Output formatting for the installer CLI.
//!
//! Human-readable lines go to stderr; the machine-readable `--json` forms
//! of the inspection commands are rendered here as well.

use crate::hash::{Tag, tag_hex};
use camino::Utf8Path;
use serde::Serialize;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format the message shown after a successful installation.
#[must_use]
pub fn success_message(archive: &Utf8Path, app_dir: &Utf8Path) -> String {
    format!("Installed {archive} to {app_dir}")
}

/// JSON view of a `param.sfo` lookup.
#[derive(Debug, Serialize)]
pub struct TitleIdReport<'a> {
    /// File the identifier was read from.
    pub path: &'a Utf8Path,
    /// The identifier.
    pub title_id: &'a str,
}

/// Summary of a synthesized header.
#[derive(Debug, Serialize)]
pub struct HeadBinReport {
    /// Where the header was written.
    pub path: String,
    /// Content id written into the header.
    pub content_id: String,
    /// Main header, info block and whole-content tags, hex encoded.
    pub tags: [String; 3],
}

impl HeadBinReport {
    /// Build a report for a header written to `path`.
    #[must_use]
    pub fn new(path: &Utf8Path, content_id: String, tags: &[Tag; 3]) -> Self {
        Self {
            path: path.to_string(),
            content_id,
            tags: tags.each_ref().map(tag_hex),
        }
    }

    /// Format the report for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!(
            concat!(
                "Wrote {}\n",
                "  content id:   {}\n",
                "  header tag:   {}\n",
                "  info tag:     {}\n",
                "  content tag:  {}"
            ),
            self.path, self.content_id, self.tags[0], self.tags[1], self.tags[2]
        )
    }
}

/// Serialise `value` as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialisation fails.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
