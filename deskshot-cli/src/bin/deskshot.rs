//! Standalone CLI tool that saves the whole virtual desktop as a PNG.
//!
//! Prints one line: the saved path and size on success, or the failure on
//! stderr.  Exit codes `1`-`7` identify the pipeline step that failed.

use std::path::PathBuf;

use clap::Parser;
use deskshot_core::capture::{capture_to_file, CaptureOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "deskshot",
    version,
    about = "Capture all monitors into a single PNG via GDI / GDI+",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Output file path. Defaults to screenshot_<YYYYMMDD>_<HHMMSS>.png in the current directory
    #[arg(allow_hyphen_values = true)]
    output: Option<PathBuf>,

    /// Anything after the output path is ignored
    #[arg(hide = true, allow_hyphen_values = true)]
    _ignored: Vec<std::ffi::OsString>,
}

/// The single stdout line of a successful run.
fn status_line(outcome: &CaptureOutcome) -> String {
    format!(
        "Saved screenshot to {} ({}x{})",
        outcome.path.display(),
        outcome.width,
        outcome.height
    )
}

#[cfg(windows)]
fn backend() -> deskshot_core::backend::GdiBackend {
    deskshot_core::backend::GdiBackend::new()
}

#[cfg(not(windows))]
fn backend() -> deskshot_core::backend::UnsupportedBackend {
    deskshot_core::backend::UnsupportedBackend::new()
}

fn main() {
    let args = Args::parse();

    // `warn` keeps a normal run to a single line; RUST_LOG=debug traces each step.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    log::debug!("deskshot v{} starting", env!("CARGO_PKG_VERSION"));

    match capture_to_file(&backend(), args.output.as_deref()) {
        Ok(outcome) => println!("{}", status_line(&outcome)),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}
