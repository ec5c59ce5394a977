//! VPK installer CLI entrypoint.
//!
//! This binary installs `.vpk` archives against the host installer service
//! and exposes the header and metadata stages on their own for inspecting
//! unpacked packages.

use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser};
use std::io::Write;
use vpk_installer::cli::{Cli, Command, HeadBinArgs, InstallArgs, TitleIdArgs};
use vpk_installer::config::{InstallConfig, SystemBaseDirs};
use vpk_installer::error::{InstallerError, Result};
use vpk_installer::extraction::ZipExtractor;
use vpk_installer::head_bin::{CONTENT_ID_LEN, CONTENT_ID_OFFSET, embedded_tags, synthesize};
use vpk_installer::install::Installer;
use vpk_installer::output::{
    HeadBinReport, TitleIdReport, success_message, to_json, write_stderr_line,
};
use vpk_installer::progress::StderrProgress;
use vpk_installer::promoter::LocalPromoter;
use vpk_installer::sfo::read_title_id;
use vpk_installer::stager::param_sfo_path;

/// Exit status for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    /// The failure was already reported to the user.
    Reported,
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<Outcome> {
    match &cli.command {
        Some(Command::Install(args)) => run_install(cli, args, stderr),
        Some(Command::TitleId(args)) => run_title_id(args).map(|()| Outcome::Success),
        Some(Command::HeadBin(args)) => {
            run_head_bin(cli, args, stderr).map(|()| Outcome::Success)
        }
        None => {
            write_stderr_line(stderr, Cli::command().render_help());
            Ok(Outcome::Reported)
        }
    }
}

/// Loads settings from the config file and command line.
fn load_config(cli: &Cli) -> Result<InstallConfig> {
    let dirs = SystemBaseDirs::new().ok_or_else(|| InstallerError::Config {
        path: Utf8PathBuf::new(),
        reason: "could not determine the user's home directory".to_owned(),
    })?;
    let mut config = InstallConfig::load(&dirs, cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    Ok(config)
}

/// Installs an archive on the worker thread and waits for it.
///
/// Pipeline failures are shown by the progress sink, so they are not
/// returned as errors.
fn run_install(cli: &Cli, args: &InstallArgs, stderr: &mut dyn Write) -> Result<Outcome> {
    let config = load_config(cli)?;
    let service = LocalPromoter::new(config.install_root.clone());
    let installer = Installer::new(config, ZipExtractor, service);
    let sink = StderrProgress::new(std::io::stderr(), cli.quiet);

    let handle = installer.spawn(args.archive.clone(), sink)?;
    let (installer, result) = handle
        .join()
        .map_err(|_| std::io::Error::other("install worker panicked"))?;

    let Ok(report) = result else {
        return Ok(Outcome::Reported);
    };
    if !cli.quiet {
        let title_id = read_title_id(&param_sfo_path(&report.package_dir)).unwrap_or_default();
        let app_dir = installer.service().app_dir(&title_id);
        write_stderr_line(stderr, success_message(&args.archive, &app_dir));
    }
    Ok(Outcome::Success)
}

/// Prints the title id stored in a `param.sfo` file.
fn run_title_id(args: &TitleIdArgs) -> Result<()> {
    let title_id =
        read_title_id(&args.param_sfo).ok_or_else(|| InstallerError::MissingTitleId {
            path: args.param_sfo.clone(),
        })?;

    let mut stdout = std::io::stdout();
    if args.json {
        let report = TitleIdReport {
            path: &args.param_sfo,
            title_id: &title_id,
        };
        let json = to_json(&report).map_err(std::io::Error::from)?;
        writeln!(stdout, "{json}")?;
    } else {
        writeln!(stdout, "{title_id}")?;
    }
    Ok(())
}

/// Generates `head.bin` for an unpacked package and describes it.
fn run_head_bin(cli: &Cli, args: &HeadBinArgs, stderr: &mut dyn Write) -> Result<()> {
    let path = synthesize(&args.package_dir)?;
    let header = std::fs::read(&path)?;
    let tags = embedded_tags(&header).ok_or_else(|| InstallerError::WriteFailed {
        path: path.clone(),
        reason: "header is too short to hold its tags".to_owned(),
    })?;
    let report = HeadBinReport::new(&path, stored_content_id(&header), &tags);

    if args.json {
        let json = to_json(&report).map_err(std::io::Error::from)?;
        writeln!(std::io::stdout(), "{json}")?;
    } else if !cli.quiet {
        write_stderr_line(stderr, report.display_text());
    }
    Ok(())
}

/// The content id slot of a header, without its NUL padding.
fn stored_content_id(header: &[u8]) -> String {
    header
        .get(CONTENT_ID_OFFSET..CONTENT_ID_OFFSET + CONTENT_ID_LEN)
        .map(|slot| {
            String::from_utf8_lossy(slot)
                .trim_end_matches('\0')
                .to_owned()
        })
        .unwrap_or_default()
}

fn exit_code_for_run_result(result: Result<Outcome>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(Outcome::Success) => 0,
        Ok(Outcome::Reported) => 1,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpk_installer::head_bin::build_head_bin;
    use vpk_installer::stager::ensure_dirs;
    use vpk_installer::test_utils::SfoBuilder;

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(Outcome::Success), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_reported_failure_is_silent() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(Outcome::Reported), &mut stderr);
        assert_eq!(exit_code, 1);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = InstallerError::MissingTitleId {
            path: Utf8PathBuf::from("sce_sys/param.sfo"),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("Failed to obtain title id"));
    }

    #[test]
    fn stored_content_id_strips_padding() {
        let header = build_head_bin("PCSX00001");
        assert_eq!(
            stored_content_id(&header),
            "EP9000-PCSX00001_00-XXXXXXXXXXXXXXXX"
        );
        assert_eq!(stored_content_id(b"short"), "");
    }

    #[test]
    fn head_bin_command_writes_header() {
        let temp = tempfile::tempdir().expect("temp dir");
        let pkg = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        let sfo = param_sfo_path(&pkg);
        ensure_dirs(sfo.parent().expect("parent"));
        std::fs::write(&sfo, SfoBuilder::new().entry("TITLE_ID", "PCSX00001").build())
            .expect("write param.sfo");
        let cli = Cli::parse_from(["vpk-installer", "head-bin", pkg.as_str()]);
        let Some(Command::HeadBin(args)) = &cli.command else {
            panic!("expected HeadBin command");
        };

        let mut stderr = Vec::new();
        run_head_bin(&cli, args, &mut stderr).expect("head-bin succeeds");

        let text = String::from_utf8(stderr).expect("stderr UTF-8");
        assert!(text.contains("EP9000-PCSX00001_00-XXXXXXXXXXXXXXXX"));
        assert!(text.contains("c1870b8a254d60dd94615fbf28c24a3b"));
    }
}
