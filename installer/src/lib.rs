//! VPK installer library.
//!
//! This crate installs `.vpk` application archives: it unpacks the archive
//! into a staging directory, synthesizes the package header
//! (`sce_sys/package/head.bin`) from the title id in `sce_sys/param.sfo`,
//! and drives an installer service that promotes the staged package. It is
//! used by the `vpk-installer` CLI binary and can be embedded with custom
//! extractors, services and progress sinks.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Installer settings and their sources
//! - [`error`] - Error types surfaced to the user
//! - [`extraction`] - ZIP archive extraction
//! - [`hash`] - The header authentication transform
//! - [`head_bin`] - Package header synthesis
//! - [`install`] - The end-to-end install pipeline
//! - [`output`] - Terminal and JSON output
//! - [`progress`] - Progress and result sinks
//! - [`promoter`] - The installer service and its driver
//! - [`sfo`] - `param.sfo` parsing
//! - [`stager`] - Staging tree layout

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod hash;
pub mod head_bin;
pub mod install;
pub mod output;
pub mod progress;
pub mod promoter;
pub mod sfo;
pub mod stager;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
