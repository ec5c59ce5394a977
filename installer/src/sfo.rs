//! `param.sfo` metadata reader.
//!
//! A `param.sfo` blob starts with a 20-byte header (magic, version, key table
//! offset, value table offset, entry count, all little-endian) followed by
//! 16-byte index entries. Each entry locates a NUL-terminated key inside the
//! key table and a value inside the value table.
//!
//! The reader is tolerant rather than strict: it never fails, it only stops
//! scanning at the first entry whose key or value would fall outside the
//! buffer.

use camino::Utf8Path;
use log::debug;

/// Key holding the application identifier.
pub const TITLE_ID_KEY: &str = "TITLE_ID";

const HEADER_LEN: usize = 20;
const ENTRY_LEN: usize = 16;

/// Fixed header of a `param.sfo` blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SfoHeader {
    /// File magic (`\0PSF`).
    pub magic: u32,
    /// Format version.
    pub version: u32,
    /// Offset of the key table from the start of the blob.
    pub key_table: u32,
    /// Offset of the value table from the start of the blob.
    pub value_table: u32,
    /// Number of index entries.
    pub count: u32,
}

impl SfoHeader {
    /// Parse the header from the start of `buf`.
    ///
    /// Returns `None` when the buffer is too short to hold one.
    #[must_use]
    pub fn parse(buf: &[u8]) -> Option<Self> {
        Some(Self {
            magic: read_u32(buf, 0)?,
            version: read_u32(buf, 4)?,
            key_table: read_u32(buf, 8)?,
            value_table: read_u32(buf, 12)?,
            count: read_u32(buf, 16)?,
        })
    }
}

/// Read the `TITLE_ID` attribute from the `param.sfo` at `path`.
///
/// Returns `None` if the file cannot be read or carries no identifier; the
/// caller decides whether that is fatal.
#[must_use]
pub fn read_title_id(path: &Utf8Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(buf) => find_value(&buf, TITLE_ID_KEY),
        Err(e) => {
            debug!("cannot read {path}: {e}");
            None
        }
    }
}

/// Look up the string value stored under `key` in a `param.sfo` buffer.
///
/// Entries are visited in table order and the last match wins. Scanning
/// stops at the first entry whose key or value pointer lies outside the
/// buffer.
///
/// # Examples
///
/// ```
/// use vpk_installer::sfo::find_value;
///
/// assert_eq!(find_value(&[], "TITLE_ID"), None);
/// ```
#[must_use]
pub fn find_value(buf: &[u8], key: &str) -> Option<String> {
    let header = SfoHeader::parse(buf)?;
    let mut found = None;

    for index in 0..header.count {
        let Some((name, value)) = entry_strings(buf, &header, index) else {
            debug!("param.sfo entry {index} out of bounds, stopping scan");
            break;
        };
        if name == key.as_bytes() {
            found = Some(String::from_utf8_lossy(value).into_owned());
        }
    }

    found
}

/// Resolve the key and value strings of entry `index`.
fn entry_strings<'a>(
    buf: &'a [u8],
    header: &SfoHeader,
    index: u32,
) -> Option<(&'a [u8], &'a [u8])> {
    let entry = HEADER_LEN.checked_add(usize::try_from(index).ok()?.checked_mul(ENTRY_LEN)?)?;
    let name_offset = read_u16(buf, entry)?;
    let data_offset = read_u32(buf, entry.checked_add(12)?)?;

    let name_at = to_usize(header.key_table)?.checked_add(usize::from(name_offset))?;
    let value_at = to_usize(header.value_table)?.checked_add(to_usize(data_offset)?)?;
    if name_at >= buf.len() || value_at >= buf.len() {
        return None;
    }

    Some((c_string(buf, name_at), c_string(buf, value_at)))
}

/// Bytes from `start` up to the first NUL or the end of the buffer.
fn c_string(buf: &[u8], start: usize) -> &[u8] {
    let tail = buf.get(start..).unwrap_or_default();
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    &tail[..end]
}

fn read_u16(buf: &[u8], at: usize) -> Option<u16> {
    let bytes = buf.get(at..at.checked_add(2)?)?;
    Some(u16::from_le_bytes(bytes.try_into().ok()?))
}

fn read_u32(buf: &[u8], at: usize) -> Option<u32> {
    let bytes = buf.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

fn to_usize(value: u32) -> Option<usize> {
    usize::try_from(value).ok()
}

#[cfg(test)]
#[path = "sfo_tests.rs"]
mod tests;
