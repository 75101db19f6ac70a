//! gosetup CLI entrypoint.
//!
//! This binary installs the Go toolchain from the go.dev release catalog
//! into the user's home directory (or `/usr/local` with `--root`) and adds
//! Go's `bin` directory to `PATH` through a shell profile.

use clap::Parser;
use gosetup::catalog::HttpReleaseSource;
use gosetup::cli::Cli;
use gosetup::config::{Endpoints, InstallConfig, running_as_root};
use gosetup::dirs::SystemBaseDirs;
use gosetup::download::HttpDownloader;
use gosetup::error::Result;
use gosetup::extraction::TarGzExtractor;
use gosetup::logging::init_logging;
use gosetup::output::Reporter;
use gosetup::pipeline::{Collaborators, InstallReport, run_install};
use gosetup::platform::system_detector;
use std::io;

fn main() {
    let cli = Cli::parse();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let mut reporter = Reporter::new(&mut out, &mut err);

    let run_result = run(&cli, &mut reporter);
    let exit_code = exit_code_for_run_result(run_result, &mut reporter);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, reporter: &mut Reporter<'_>) -> Result<InstallReport> {
    let config = InstallConfig::from_cli(
        cli,
        &SystemBaseDirs,
        running_as_root(),
        Endpoints::from_env(),
    )?;
    init_logging(config.debug);

    let detector = system_detector();
    let source = HttpReleaseSource::new(&config.endpoints);
    let collaborators = Collaborators {
        detector: detector.as_ref(),
        source: &source,
        downloader: &HttpDownloader,
        extractor: &TarGzExtractor,
    };
    run_install(&config, &collaborators, reporter)
}

fn exit_code_for_run_result<T>(result: Result<T>, reporter: &mut Reporter<'_>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            reporter.error(err);
            1
        }
    }
}
