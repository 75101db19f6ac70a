//! CLI argument definitions for the gosetup installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use clap::Parser;

/// Install the Go toolchain for the current user.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gosetup")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the Go toolchain for the current user.\n\n",
    "gosetup detects the host architecture, resolves a Go release from the ",
    "go.dev release catalog, downloads and extracts the archive to ",
    "~/.local/go, and adds ~/.local/go/bin to PATH in ~/.profile.\n\n",
    "Without -v the latest stable release is installed. With --root and ",
    "root privileges, Go is installed to /usr/local/go and PATH is ",
    "configured in /etc/profile.d/go.sh.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the latest stable release:\n",
    "    $ gosetup\n\n",
    "  Install Go 1.22 (resolved as 1.22.0):\n",
    "    $ gosetup -v 1.22\n\n",
    "  Install system-wide:\n",
    "    $ sudo gosetup --root\n\n",
    "ENVIRONMENT:\n",
    "  GOSETUP_CATALOG_URL     Release catalog JSON endpoint\n",
    "  GOSETUP_LATEST_URL      Latest version text endpoint\n",
    "  GOSETUP_DOWNLOAD_BASE   Base URL for archive downloads",
))]
pub struct Cli {
    /// Go version to install, e.g. 1.22.2 or 1.23 (can be repeated).
    #[arg(short = 'v', long = "go-version", value_name = "VERSION")]
    pub versions: Vec<String>,

    /// Enable debug mode for verbose output.
    #[arg(long)]
    pub debug: bool,

    /// Install and configure PATH system-wide (requires root privileges).
    #[arg(long)]
    pub root: bool,
}
