//! featconf: enable and disable firmware features in a config header.
//!
//! Rewrites the block between the `//CONFIGURE_EYECATCH_BEGIN` and
//! `//CONFIGURE_EYECATCH_END` comment lines of `Grbl_Esp32/src/Config.h` (or
//! another header named with `-c`), turning `#define ENABLE_<NAME>` lines on
//! and off.  Running the same command twice leaves the file as the first run
//! left it.
//!
//! # Usage
//!
//! ```text
//! featconf [OPTIONS]
//!
//! Options:
//!   -v, --verbose              Echo the config path and the managed block
//!   -c, --configfile <PATH>    Header to edit [default: from settings]
//!   -e, --enable [<NAME>...]   Features to turn on
//!   -d, --disable [<NAME>...]  Features to turn off
//!   -n, --dry-run              Do everything except write the header
//!   -s, --settings <PATH>      Settings file [env: FEATCONF_SETTINGS]
//!       --list                 Print the recognised feature names
//! ```
//!
//! # Exit codes
//!
//! `0` on success (and for `--help`, `--version`, `--list`); `255` for every
//! failure: bad arguments, an empty or unknown selection, unusable markers,
//! a bad settings file, or a read/write error.  Errors, usage and the list of
//! valid names go to stderr.  stdout carries only the verbose echo and the
//! `--list` output.
//!
//! # Logging
//!
//! `RUST_LOG` controls the `tracing` filter; when it is unset the settings
//! file's `[logging] log_level` is used (default `warn`).

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use featconf::application::{ConfigureFeaturesUseCase, ConfigureRequest};
use featconf::infrastructure::storage::config_file::FileConfigStore;
use featconf::infrastructure::storage::settings::{load_settings, Settings};
use featconf_core::FeatureRegistry;

/// Exit status for every failure.
const EXIT_FAILURE: u8 = 255;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Enable and disable firmware features inside the managed block of a config
/// header.
#[derive(Debug, Parser)]
#[command(
    name = "featconf",
    about = "Enable and disable firmware features in a config header",
    version
)]
struct Cli {
    /// Echo the absolute config path and every line of the managed block.
    #[arg(short, long)]
    verbose: bool,

    /// Header to edit.  Defaults to the settings file's
    /// `default_config_path`, normally `Grbl_Esp32/src/Config.h`.
    #[arg(short = 'c', long = "configfile", value_name = "PATH")]
    configfile: Option<PathBuf>,

    /// Features to turn on.  May be repeated.
    #[arg(short, long, num_args = 0.., value_name = "NAME")]
    enable: Vec<String>,

    /// Features to turn off.  A name also given to `--enable` is ignored here.
    #[arg(short, long, num_args = 0.., value_name = "NAME")]
    disable: Vec<String>,

    /// Run every step except writing the header.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// TOML settings file.  Without it, `featconf.toml` in the working
    /// directory is used if present.
    #[arg(short, long, env = "FEATCONF_SETTINGS", value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Print the recognised feature names and exit.
    #[arg(long)]
    list: bool,
}

impl Cli {
    /// Converts the parsed arguments into a [`ConfigureRequest`], taking the
    /// default header path from `settings`.
    fn into_request(self, settings: &Settings) -> ConfigureRequest {
        ConfigureRequest {
            config_path: self
                .configfile
                .unwrap_or_else(|| settings.editor.default_config_path.clone()),
            enable: self.enable,
            disable: self.disable,
            verbose: self.verbose,
            dry_run: self.dry_run,
        }
    }
}

/// Writes the registry's names, sorted, one per line under a heading.
fn write_feature_names(out: &mut dyn Write, registry: &FeatureRegistry) -> io::Result<()> {
    writeln!(out, "valid feature names:")?;
    for name in registry.sorted_names() {
        writeln!(out, "  {name}")?;
    }
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs one invocation after argument parsing.
///
/// Usage errors are reported here, together with the usage line and the
/// valid names, and come back as a failing exit code.  Everything else that
/// fails is returned as an error for `main` to print.
fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = load_settings(cli.settings.as_deref()).context("cannot load settings")?;
    init_tracing(&settings.logging.log_level);
    debug!(?settings, "settings loaded");

    let store = FileConfigStore::new(settings.editor.atomic_write);
    let use_case = ConfigureFeaturesUseCase::new(&settings.profile(), store)?;

    if cli.list {
        write_feature_names(&mut io::stdout().lock(), use_case.registry())?;
        return Ok(ExitCode::SUCCESS);
    }

    let request = cli.into_request(&settings);
    let result = use_case.execute(&request, &mut io::stdout().lock());
    match result {
        Ok(outcome) => {
            if request.dry_run {
                let state = if outcome.changed {
                    "would be updated"
                } else {
                    "is up to date"
                };
                eprintln!("dry run: {} {state}", outcome.path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_usage() => {
            let mut err = io::stderr().lock();
            writeln!(err, "{e}")?;
            writeln!(err, "{}", Cli::command().render_usage())?;
            write_feature_names(&mut err, use_case.registry())?;
            Ok(ExitCode::from(EXIT_FAILURE))
        }
        Err(e) => Err(e.into()),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_FAILURE),
            };
        }
    };

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
