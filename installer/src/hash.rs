//! Package authentication tags.
//!
//! The promoter checks three 16-byte tags inside `head.bin`. Each tag is
//! derived from a SHA-1 digest of the covered bytes by scattering parts of
//! that digest into a 64-byte block and hashing the block again. The layout
//! of the block is fixed by the platform and must be reproduced exactly; a
//! single misplaced byte only shows up much later as an opaque promoter
//! failure.

use sha1::{Digest, Sha1};

/// Size of an authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// A 16-byte package authentication tag.
pub type Tag = [u8; TAG_LEN];

/// Compute the authentication tag for `data`.
///
/// # Examples
///
/// ```
/// use vpk_installer::hash::authenticate;
///
/// let tag = authenticate(b"abc");
/// assert_eq!(tag, authenticate(b"abc"));
/// assert_ne!(tag, authenticate(b"abd"));
/// ```
#[must_use]
pub fn authenticate(data: &[u8]) -> Tag {
    let digest: [u8; 20] = Sha1::digest(data).into();

    let mut block = [0_u8; 64];
    block[0..8].copy_from_slice(&digest[4..12]);
    block[8..16].copy_from_slice(&digest[4..12]);
    block[16..20].copy_from_slice(&digest[12..16]);
    block[20] = digest[16];
    block[21] = digest[1];
    block[22] = digest[2];
    block[23] = digest[3];
    block.copy_within(16..24, 24);

    let second: [u8; 20] = Sha1::digest(block).into();
    let mut tag = [0_u8; TAG_LEN];
    tag.copy_from_slice(&second[..TAG_LEN]);
    tag
}

/// Render a tag as lowercase hex.
#[must_use]
pub fn tag_hex(tag: &Tag) -> String {
    tag.iter().map(|byte| format!("{byte:02x}")).collect()
}
