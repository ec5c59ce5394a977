//! `head.bin` synthesis.
//!
//! The promoter refuses a package directory without
//! `sce_sys/package/head.bin`, and VPK archives do not ship one. The file is
//! produced from a fixed template: the content id slot is filled in from the
//! package's `TITLE_ID`, then three authentication tags are recomputed.
//!
//! All length and offset fields in the header are big-endian `u32`s. The
//! tags must be computed in a fixed order:
//!
//! 1. the main header tag over `[0, main_len)`, stored at `main_len`;
//! 2. the info block tag over `[info_offset, info_offset + info_len - 64)`,
//!    stored at the offset held in the info tag field;
//! 3. the whole-content tag over `[0, total_len)`, stored at `total_len`.
//!
//! The third tag covers the first two, and no tag slot overlaps a field read
//! by a later step.

pub mod template;

use crate::error::{InstallerError, Result};
use crate::hash::{TAG_LEN, Tag, authenticate};
use crate::sfo::read_title_id;
use crate::stager::{ensure_dirs, head_bin_path, param_sfo_path};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fs::File;
use std::io::Write;
use std::ops::Range;

pub use template::{TEMPLATE, TEMPLATE_LEN};

/// Offset of the content id slot.
pub const CONTENT_ID_OFFSET: usize = 0x30;
/// Width of the content id slot.
pub const CONTENT_ID_LEN: usize = 48;
/// Offset of the info block offset field.
pub const INFO_OFFSET_FIELD: usize = 0x08;
/// Offset of the info block length field.
pub const INFO_LEN_FIELD: usize = 0x10;
/// Offset of the main header length field.
pub const MAIN_LEN_FIELD: usize = 0xD0;
/// Offset of the field holding the info tag destination.
pub const INFO_TAG_FIELD: usize = 0xD4;
/// Offset of the total content length field.
pub const TOTAL_LEN_FIELD: usize = 0xE8;

/// Bytes at the end of the info block excluded from its tag.
const INFO_TRAILER_LEN: usize = 64;

const CONTENT_ID_PREFIX: &str = "EP9000-";
const CONTENT_ID_SUFFIX: &str = "_00-";
const CONTENT_HASH_PLACEHOLDER: &str = "XXXXXXXXXXXXXXXX";

/// Build the full content id for `title_id`.
///
/// # Examples
///
/// ```
/// use vpk_installer::head_bin::content_id;
///
/// assert_eq!(content_id("PCSX00001"), "EP9000-PCSX00001_00-XXXXXXXXXXXXXXXX");
/// ```
#[must_use]
pub fn content_id(title_id: &str) -> String {
    format!("{CONTENT_ID_PREFIX}{title_id}{CONTENT_ID_SUFFIX}{CONTENT_HASH_PLACEHOLDER}")
}

/// A byte range covered by a tag and the offset the tag is stored at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSite {
    /// Bytes the tag authenticates.
    pub covered: Range<usize>,
    /// Offset of the 16-byte tag slot.
    pub slot: usize,
}

impl TagSite {
    /// The slot as a byte range.
    #[must_use]
    pub fn slot_range(&self) -> Range<usize> {
        self.slot..self.slot.saturating_add(TAG_LEN)
    }

    /// Keep the site only if both ranges lie within `header`.
    fn within(self, header: &[u8]) -> Option<Self> {
        let len = header.len();
        let fits = self.covered.start <= self.covered.end
            && self.covered.end <= len
            && self.slot.checked_add(TAG_LEN)? <= len;
        fits.then_some(self)
    }
}

/// Locate the main header tag. Returns `None` if `header` is too short
/// for the fields it declares.
#[must_use]
pub fn main_tag_site(header: &[u8]) -> Option<TagSite> {
    let len = be_field(header, MAIN_LEN_FIELD)?;
    TagSite {
        covered: 0..len,
        slot: len,
    }
    .within(header)
}

/// Locate the info block tag. Returns `None` if `header` is too short or
/// the info block is smaller than its trailer.
#[must_use]
pub fn info_tag_site(header: &[u8]) -> Option<TagSite> {
    let offset = be_field(header, INFO_OFFSET_FIELD)?;
    let len = be_field(header, INFO_LEN_FIELD)?;
    let end = offset.checked_add(len.checked_sub(INFO_TRAILER_LEN)?)?;
    TagSite {
        covered: offset..end,
        slot: be_field(header, INFO_TAG_FIELD)?,
    }
    .within(header)
}

/// Locate the whole-content tag. Returns `None` if `header` is too short
/// for the fields it declares.
#[must_use]
pub fn total_tag_site(header: &[u8]) -> Option<TagSite> {
    let len = be_field(header, TOTAL_LEN_FIELD)?;
    TagSite {
        covered: 0..len,
        slot: len,
    }
    .within(header)
}

/// Produce a complete header image for `title_id`.
///
/// The template is copied, never modified. The content id is written with
/// `strncpy` semantics: NUL padded, or cut at 48 bytes with no terminator
/// if it is longer.
#[must_use]
pub fn build_head_bin(title_id: &str) -> Vec<u8> {
    let mut header = TEMPLATE.to_vec();

    let id = content_id(title_id);
    let slot = &mut header[CONTENT_ID_OFFSET..CONTENT_ID_OFFSET + CONTENT_ID_LEN];
    slot.fill(0);
    let copied = id.len().min(CONTENT_ID_LEN);
    slot[..copied].copy_from_slice(&id.as_bytes()[..copied]);

    // Every site resolves on the template.
    for locate in [main_tag_site, info_tag_site, total_tag_site] {
        let Some(site) = locate(&header) else {
            continue;
        };
        let tag = authenticate(&header[site.covered.clone()]);
        header[site.slot_range()].copy_from_slice(&tag);
    }

    header
}

/// Read back the three tags embedded in a header image, in computation
/// order. Returns `None` if any tag site falls outside `header`.
#[must_use]
pub fn embedded_tags(header: &[u8]) -> Option<[Tag; 3]> {
    let read = |site: TagSite| -> Option<Tag> { header.get(site.slot_range())?.try_into().ok() };
    Some([
        read(main_tag_site(header)?)?,
        read(info_tag_site(header)?)?,
        read(total_tag_site(header)?)?,
    ])
}

/// Synthesize `sce_sys/package/head.bin` inside `package_dir`.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`InstallerError::HeadBinPresent`] if the archive already
/// shipped a header, [`InstallerError::MissingTitleId`] if `param.sfo`
/// yields no identifier, and [`InstallerError::WriteFailed`] if the file
/// cannot be written.
pub fn synthesize(package_dir: &Utf8Path) -> Result<Utf8PathBuf> {
    let dest = head_bin_path(package_dir);
    if dest.exists() {
        return Err(InstallerError::HeadBinPresent { path: dest });
    }

    let sfo_path = param_sfo_path(package_dir);
    let title_id =
        read_title_id(&sfo_path).ok_or(InstallerError::MissingTitleId { path: sfo_path })?;
    debug!("title id {title_id}, content id {}", content_id(&title_id));

    let header = build_head_bin(&title_id);

    if let Some(parent) = dest.parent() {
        ensure_dirs(parent);
    }
    write_all(&dest, &header)?;

    info!("wrote {dest} for {title_id}");
    Ok(dest)
}

fn write_all(dest: &Utf8Path, contents: &[u8]) -> Result<()> {
    let write_error = |e: std::io::Error| InstallerError::WriteFailed {
        path: dest.to_owned(),
        reason: e.to_string(),
    };
    let mut file = File::create(dest).map_err(write_error)?;
    file.write_all(contents).map_err(write_error)?;
    file.sync_all().map_err(write_error)
}

/// Read the big-endian `u32` at `at` as an offset or length.
fn be_field(header: &[u8], at: usize) -> Option<usize> {
    let bytes: [u8; 4] = header.get(at..at.checked_add(4)?)?.try_into().ok()?;
    usize::try_from(u32::from_be_bytes(bytes)).ok()
}
