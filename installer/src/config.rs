//! Installer configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults
//! rooted in the per-user data directory, an optional TOML file, and
//! command-line overrides applied by the caller.

use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use directories_next::ProjectDirs;
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application name used for per-user directories.
pub const APP_NAME: &str = "vpk-installer";

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default pause between promoter state queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Default pause after a successful install before the worker exits.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Per-user directories the installer keeps its state in.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory holding the staging and install roots.
    fn data_dir(&self) -> Option<PathBuf>;

    /// Directory searched for the configuration file.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the platform conventions.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    project: ProjectDirs,
}

impl SystemBaseDirs {
    /// Resolve the platform directories. Returns `None` when no home
    /// directory can be found.
    #[must_use]
    pub fn new() -> Option<Self> {
        ProjectDirs::from("", "", APP_NAME).map(|project| Self { project })
    }
}

impl BaseDirs for SystemBaseDirs {
    fn data_dir(&self) -> Option<PathBuf> {
        Some(self.project.data_dir().to_path_buf())
    }

    fn config_dir(&self) -> Option<PathBuf> {
        Some(self.project.config_dir().to_path_buf())
    }
}

/// Resolved settings for one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Scratch tree wiped at the start of every install.
    pub staging_root: Utf8PathBuf,
    /// Where the host service places installed packages.
    pub install_root: Utf8PathBuf,
    /// Pause between promoter state queries.
    pub poll_interval: Duration,
    /// Pause after a successful install.
    pub settle_delay: Duration,
}

impl InstallConfig {
    /// Settings rooted at `data_dir`.
    #[must_use]
    pub fn with_data_dir(data_dir: &Utf8Path) -> Self {
        Self {
            staging_root: data_dir.join("ptmp"),
            install_root: data_dir.join("app"),
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Built-in defaults for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] when no data directory can be
    /// resolved or it is not valid UTF-8.
    pub fn defaults(dirs: &dyn BaseDirs) -> Result<Self> {
        let data_dir = dirs.data_dir().ok_or_else(|| InstallerError::Config {
            path: Utf8PathBuf::new(),
            reason: "could not determine the user data directory".to_owned(),
        })?;
        let data_dir = utf8_dir(data_dir)?;
        Ok(Self::with_data_dir(&data_dir))
    }

    /// Load settings: defaults, then `explicit` or the per-user config
    /// file if present.
    ///
    /// An explicit file must exist; the per-user file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] if defaults cannot be resolved or
    /// a config file cannot be read or parsed.
    pub fn load(dirs: &dyn BaseDirs, explicit: Option<&Utf8Path>) -> Result<Self> {
        let mut config = Self::defaults(dirs)?;
        let path = match explicit {
            Some(path) => Some(path.to_owned()),
            None => default_config_path(dirs).filter(|p| p.is_file()),
        };
        if let Some(path) = path {
            debug!("reading configuration from {path}");
            let file = ConfigFile::read(&path)?;
            config.apply(file);
        }
        Ok(config)
    }

    /// Apply the fields set in `file`.
    pub fn apply(&mut self, file: ConfigFile) {
        if let Some(root) = file.staging_root {
            self.staging_root = root;
        }
        if let Some(root) = file.install_root {
            self.install_root = root;
        }
        if let Some(ms) = file.poll_interval_ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = file.settle_delay_ms {
            self.settle_delay = Duration::from_millis(ms);
        }
    }
}

/// Contents of a configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Overrides [`InstallConfig::staging_root`].
    pub staging_root: Option<Utf8PathBuf>,
    /// Overrides [`InstallConfig::install_root`].
    pub install_root: Option<Utf8PathBuf>,
    /// Overrides [`InstallConfig::poll_interval`], in milliseconds.
    pub poll_interval_ms: Option<u64>,
    /// Overrides [`InstallConfig::settle_delay`], in milliseconds.
    pub settle_delay_ms: Option<u64>,
}

impl ConfigFile {
    /// Parse `text` as a configuration file read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] on malformed TOML or unknown keys.
    pub fn parse(path: &Utf8Path, text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| InstallerError::Config {
            path: path.to_owned(),
            reason: e.message().to_owned(),
        })
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Config`] if the file cannot be read or
    /// parsed.
    pub fn read(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| InstallerError::Config {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Self::parse(path, &text)
    }
}

/// Location of the per-user configuration file, if one can be resolved.
#[must_use]
pub fn default_config_path(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    let dir = dirs.config_dir()?;
    Utf8PathBuf::try_from(dir)
        .ok()
        .map(|dir| dir.join(CONFIG_FILENAME))
}

fn utf8_dir(dir: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(dir).map_err(|e| InstallerError::Config {
        path: Utf8PathBuf::new(),
        reason: format!("data directory is not UTF-8: {}", e.as_path().display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Dirs {
        _guard: TempDir,
        root: Utf8PathBuf,
        dirs: MockBaseDirs,
    }

    #[fixture]
    fn dirs() -> Dirs {
        let guard = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::try_from(guard.path().to_path_buf()).expect("utf8");
        let data = root.join("data").into_std_path_buf();
        let config = root.join("config").into_std_path_buf();
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_dir().returning(move || Some(data.clone()));
        dirs.expect_config_dir().returning(move || Some(config.clone()));
        Dirs {
            _guard: guard,
            root,
            dirs,
        }
    }

    #[rstest]
    fn defaults_live_under_data_dir(dirs: Dirs) {
        let config = InstallConfig::load(&dirs.dirs, None).expect("defaults");

        assert_eq!(config.staging_root, dirs.root.join("data/ptmp"));
        assert_eq!(config.install_root, dirs.root.join("data/app"));
        assert_eq!(config.poll_interval, Duration::from_millis(300));
        assert_eq!(config.settle_delay, Duration::from_secs(1));
    }

    #[rstest]
    fn user_config_file_overrides_defaults(dirs: Dirs) {
        let config_dir = dirs.root.join("config");
        std::fs::create_dir_all(&config_dir).expect("mkdir");
        std::fs::write(
            config_dir.join(CONFIG_FILENAME),
            "poll_interval_ms = 10\nstaging_root = \"/tmp/stage\"\n",
        )
        .expect("write config");

        let config = InstallConfig::load(&dirs.dirs, None).expect("load");

        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.staging_root, Utf8PathBuf::from("/tmp/stage"));
        assert_eq!(config.install_root, dirs.root.join("data/app"));
    }

    #[rstest]
    fn explicit_missing_file_is_an_error(dirs: Dirs) {
        let missing = dirs.root.join("nope.toml");

        let err = InstallConfig::load(&dirs.dirs, Some(&missing)).expect_err("missing file");

        assert!(matches!(err, InstallerError::Config { path, .. } if path == missing));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ConfigFile::parse(Utf8Path::new("c.toml"), "poll_interval = 3\n")
            .expect_err("unknown key");

        assert!(err.to_string().contains("c.toml"));
    }

    #[test]
    fn missing_data_dir_is_a_config_error() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_dir().returning(|| None);

        let err = InstallConfig::defaults(&dirs).expect_err("no data dir");

        assert!(matches!(err, InstallerError::Config { .. }));
    }

    #[test]
    fn apply_leaves_unset_fields_alone() {
        let mut config = InstallConfig::with_data_dir(Utf8Path::new("/d"));
        config.apply(ConfigFile {
            settle_delay_ms: Some(0),
            ..ConfigFile::default()
        });

        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.staging_root, Utf8PathBuf::from("/d/ptmp"));
    }
}
