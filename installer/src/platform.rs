//! Host platform detection and architecture normalization.
//!
//! Linux hosts read kernel and machine information from `uname(2)`. Every
//! other host falls back to the architecture the binary was built for and
//! reports a non-fatal [`PlatformError::Unsupported`]; callers treat any
//! detection error as "use the default architecture" rather than aborting.

use log::debug;
use std::fmt;

/// Kernel and architecture information reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// Kernel release string (for example `6.8.0-45-generic`).
    pub kernel_version: String,
    /// Raw machine architecture (for example `x86_64`).
    pub architecture: String,
}

/// Errors arising from platform detection.
///
/// Every variant carries the build-default architecture so that callers can
/// continue without a second lookup.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The host OS has no uname-based detection.
    #[error("system call uname is only used on Linux (current OS: {os})")]
    Unsupported {
        /// The host operating system.
        os: &'static str,
        /// Architecture to use instead.
        default_arch: String,
    },

    /// The uname call itself failed.
    #[error("failed to get system info using uname: {reason}")]
    Uname {
        /// Description of the failure.
        reason: String,
        /// Architecture to use instead.
        default_arch: String,
    },
}

impl PlatformError {
    /// Return the architecture callers should fall back to.
    #[must_use]
    pub fn default_architecture(&self) -> &str {
        match self {
            Self::Unsupported { default_arch, .. } | Self::Uname { default_arch, .. } => {
                default_arch
            }
        }
    }
}

/// Detects kernel and architecture information for the running host.
#[cfg_attr(test, mockall::automock)]
pub trait PlatformDetector {
    /// Detect the host system information.
    ///
    /// # Errors
    ///
    /// Returns a [`PlatformError`] when detection is unavailable or fails.
    /// The error carries the architecture to use instead.
    fn detect(&self) -> Result<SystemInfo, PlatformError>;
}

/// Detector backed by `uname(2)`.
#[cfg(target_os = "linux")]
#[derive(Debug, Default, Clone, Copy)]
pub struct UnameDetector;

#[cfg(target_os = "linux")]
impl PlatformDetector for UnameDetector {
    fn detect(&self) -> Result<SystemInfo, PlatformError> {
        let uname = nix::sys::utsname::uname().map_err(|errno| {
            debug!("Failed to get system info using uname: {errno}");
            PlatformError::Uname {
                reason: errno.to_string(),
                default_arch: default_architecture(),
            }
        })?;
        let info = SystemInfo {
            kernel_version: uname.release().to_string_lossy().into_owned(),
            architecture: uname.machine().to_string_lossy().into_owned(),
        };
        debug!(
            "Uname Release: {}, Machine: {}",
            info.kernel_version, info.architecture
        );
        Ok(info)
    }
}

/// Detector for hosts without uname support; always reports the build
/// default architecture.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildDefaultDetector;

impl PlatformDetector for BuildDefaultDetector {
    fn detect(&self) -> Result<SystemInfo, PlatformError> {
        let os = std::env::consts::OS;
        debug!("Running on {os}, using the build time architecture");
        Err(PlatformError::Unsupported {
            os,
            default_arch: default_architecture(),
        })
    }
}

/// Return the detector appropriate for the build target.
#[must_use]
pub fn system_detector() -> Box<dyn PlatformDetector> {
    #[cfg(target_os = "linux")]
    {
        Box::new(UnameDetector)
    }
    #[cfg(not(target_os = "linux"))]
    {
        Box::new(BuildDefaultDetector)
    }
}

/// Return the Go operating system name for the build target.
///
/// # Examples
///
/// ```
/// use gosetup::platform::host_os;
///
/// assert!(!host_os().is_empty());
/// assert_ne!(host_os(), "macos");
/// ```
#[must_use]
pub fn host_os() -> &'static str {
    go_os_name(std::env::consts::OS)
}

/// Translate a Rust target OS name into Go's naming.
fn go_os_name(rust_os: &'static str) -> &'static str {
    match rust_os {
        "macos" => "darwin",
        other => other,
    }
}

/// Return the build target's architecture in Go's naming.
#[must_use]
pub fn default_architecture() -> String {
    map_architecture(std::env::consts::ARCH)
}

/// Normalize a detected architecture string to the name used by the Go
/// release catalog.
///
/// Matching is case-insensitive. Unrecognized input passes through
/// unchanged.
///
/// # Examples
///
/// ```
/// use gosetup::platform::map_architecture;
///
/// assert_eq!(map_architecture("x86_64"), "amd64");
/// assert_eq!(map_architecture("aarch64"), "arm64");
/// assert_eq!(map_architecture("mips64"), "mips64");
/// ```
#[must_use]
pub fn map_architecture(detected: &str) -> String {
    let mapped = match detected.to_ascii_lowercase().as_str() {
        "x86_64" | "amd64" => "amd64",
        "aarch64" | "arm64" => "arm64",
        "i386" | "i686" | "x86" => "386",
        "armv6l" | "armv7l" | "arm" => "arm",
        "ppc64le" => "ppc64le",
        "s390x" => "s390x",
        "riscv64" => "riscv64",
        "loongarch64" => "loong64",
        _ => {
            debug!("No specific mapping for detected architecture '{detected}', using as is");
            detected
        }
    };
    debug!("Mapped detected architecture '{detected}' to Go architecture '{mapped}'");
    mapped.to_owned()
}

/// The OS/architecture pair used to select release artefacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    /// Go operating system name (for example `linux`).
    pub os: String,
    /// Canonical Go architecture name (for example `amd64`).
    pub arch: String,
}

impl HostPlatform {
    /// Create a host platform from OS and architecture names.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::x86_64("x86_64", "amd64")]
    #[case::amd64("amd64", "amd64")]
    #[case::upper_case("X86_64", "amd64")]
    #[case::aarch64("aarch64", "arm64")]
    #[case::arm64("arm64", "arm64")]
    #[case::i386("i386", "386")]
    #[case::i686("i686", "386")]
    #[case::armv6l("armv6l", "arm")]
    #[case::armv7l("armv7l", "arm")]
    #[case::ppc64le("ppc64le", "ppc64le")]
    #[case::s390x("s390x", "s390x")]
    #[case::loongarch("loongarch64", "loong64")]
    fn maps_known_aliases(#[case] detected: &str, #[case] expected: &str) {
        assert_eq!(map_architecture(detected), expected);
    }

    #[rstest]
    #[case::unknown("mips64")]
    #[case::mixed_case_unknown("SPARC64")]
    #[case::empty("")]
    fn passes_unknown_architectures_through(#[case] detected: &str) {
        assert_eq!(map_architecture(detected), detected);
    }

    #[test]
    fn macos_is_reported_as_darwin() {
        assert_eq!(go_os_name("macos"), "darwin");
        assert_eq!(go_os_name("linux"), "linux");
        assert_eq!(go_os_name("freebsd"), "freebsd");
    }

    #[test]
    fn build_default_detector_reports_unsupported_with_default_arch() {
        let err = BuildDefaultDetector
            .detect()
            .expect_err("build default detector never succeeds");
        assert!(matches!(err, PlatformError::Unsupported { .. }));
        assert_eq!(err.default_architecture(), default_architecture());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn uname_detector_reports_a_machine() {
        let info = UnameDetector.detect().expect("uname works on linux");
        assert!(!info.architecture.is_empty());
        assert!(!info.kernel_version.is_empty());
    }

    #[test]
    fn host_platform_displays_as_os_slash_arch() {
        let host = HostPlatform::new("linux", "amd64");
        assert_eq!(host.to_string(), "linux/amd64");
    }
}
