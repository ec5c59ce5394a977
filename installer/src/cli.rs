//! CLI argument definitions for the VPK installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::config::InstallConfig;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install `.vpk` application archives.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "vpk-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install .vpk application archives.\n\n",
    "The archive is unpacked into a staging directory, a package header ",
    "(sce_sys/package/head.bin) is generated from the TITLE_ID in ",
    "sce_sys/param.sfo, and the staged package is handed to the installer ",
    "service, which places it below the install root.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install an archive:\n",
    "    $ vpk-installer install homebrew.vpk\n\n",
    "  Show the title id of an unpacked package:\n",
    "    $ vpk-installer title-id pkg/sce_sys/param.sfo --json\n\n",
    "  Generate head.bin for an unpacked package:\n",
    "    $ vpk-installer head-bin pkg/",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file [default: per-user config.toml when present].
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Scratch directory wiped before each install.
    #[arg(long, value_name = "DIR", global = true)]
    pub staging_root: Option<Utf8PathBuf>,

    /// Directory installed packages are placed in.
    #[arg(long, value_name = "DIR", global = true)]
    pub install_root: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable).
    #[arg(short, long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install a `.vpk` archive.
    Install(InstallArgs),

    /// Print the TITLE_ID stored in a param.sfo file.
    TitleId(TitleIdArgs),

    /// Generate head.bin for an already unpacked package.
    HeadBin(HeadBinArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Archive to install.
    #[arg(value_name = "ARCHIVE")]
    pub archive: Utf8PathBuf,
}

/// Arguments for the title-id command.
#[derive(Parser, Debug, Clone)]
pub struct TitleIdArgs {
    /// The param.sfo file to read.
    #[arg(value_name = "PARAM_SFO")]
    pub param_sfo: Utf8PathBuf,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the head-bin command.
#[derive(Parser, Debug, Clone)]
pub struct HeadBinArgs {
    /// Unpacked package directory.
    #[arg(value_name = "PACKAGE_DIR")]
    pub package_dir: Utf8PathBuf,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Apply the path overrides given on the command line to `config`.
    pub fn apply_overrides(&self, config: &mut InstallConfig) {
        if let Some(root) = &self.staging_root {
            config.staging_root = root.clone();
        }
        if let Some(root) = &self.install_root {
            config.install_root = root.clone();
        }
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
