//! Shared test utilities for the installer crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour suites under `tests/`.

use camino::Utf8Path;
use std::io::Write;
use zip::write::SimpleFileOptions;

/// Builds `param.sfo` blobs with UTF-8 string entries.
#[derive(Debug, Default, Clone)]
pub struct SfoBuilder {
    entries: Vec<(String, String)>,
}

impl SfoBuilder {
    /// Start an empty blob.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a string entry.
    #[must_use]
    pub fn entry(mut self, key: &str, value: &str) -> Self {
        self.entries.push((key.to_owned(), value.to_owned()));
        self
    }

    /// Serialise the blob.
    ///
    /// # Panics
    ///
    /// Panics if the tables grow beyond the 16-bit key offsets the format
    /// allows.
    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let index_len = 20 + 16 * self.entries.len();

        let mut keys = Vec::new();
        let mut values = Vec::new();
        let mut index = Vec::new();
        for (key, value) in &self.entries {
            let key_offset = u16::try_from(keys.len()).expect("key table too large");
            keys.extend_from_slice(key.as_bytes());
            keys.push(0);

            let data_offset = u32::try_from(values.len()).expect("value table too large");
            let value_len = u32::try_from(value.len() + 1).expect("value too large");
            let total_len = value_len.next_multiple_of(4);
            values.extend_from_slice(value.as_bytes());
            values.resize(values.len() + (total_len - value_len + 1) as usize, 0);

            index.extend_from_slice(&key_offset.to_le_bytes());
            index.push(4);
            index.push(2);
            index.extend_from_slice(&value_len.to_le_bytes());
            index.extend_from_slice(&total_len.to_le_bytes());
            index.extend_from_slice(&data_offset.to_le_bytes());
        }
        keys.resize(keys.len().next_multiple_of(4), 0);

        let key_table = u32::try_from(index_len).expect("index too large");
        let value_table = key_table + u32::try_from(keys.len()).expect("keys too large");
        let count = u32::try_from(self.entries.len()).expect("too many entries");

        let mut blob = Vec::with_capacity(index_len + keys.len() + values.len());
        blob.extend_from_slice(b"\0PSF");
        blob.extend_from_slice(&0x0101_u32.to_le_bytes());
        blob.extend_from_slice(&key_table.to_le_bytes());
        blob.extend_from_slice(&value_table.to_le_bytes());
        blob.extend_from_slice(&count.to_le_bytes());
        blob.extend_from_slice(&index);
        blob.extend_from_slice(&keys);
        blob.extend_from_slice(&values);
        blob
    }
}

/// Write a ZIP archive containing `entries` to `path`.
///
/// Names ending in `/` become directory entries.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_vpk(path: &Utf8Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).expect("create archive");
    let mut writer = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, contents) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, options)
                .expect("add directory entry");
        } else {
            writer.start_file(*name, options).expect("start entry");
            writer.write_all(contents).expect("write entry");
        }
    }
    writer.finish().expect("finish archive");
}

/// Write a minimal installable VPK for `title_id` to `path`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_minimal_vpk(path: &Utf8Path, title_id: &str) {
    let sfo = SfoBuilder::new()
        .entry("TITLE", "Test Application")
        .entry("TITLE_ID", title_id)
        .build();
    write_vpk(
        path,
        &[
            ("eboot.bin", b"SCE\0fake-eboot".as_slice()),
            ("sce_sys/", b"".as_slice()),
            ("sce_sys/param.sfo", sfo.as_slice()),
            ("sce_sys/icon0.png", b"\x89PNG".as_slice()),
        ],
    );
}
