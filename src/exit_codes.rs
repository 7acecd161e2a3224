//! Exit codes for the nexus3 CLI
//!
//! Every failure reported by a command handler is mapped to one of these codes
//! at the top-level boundary in `main`, so scripts can tell a usage mistake
//! from an unreachable server or a partially failed transfer.

/// Process exit codes used by `nexus3`
///
/// These codes follow the BSD sysexits.h conventions where possible:
/// - 0: Success
/// - 64-78: Standard exit codes from sysexits.h
/// - 100+: Custom application-specific codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum NexusExitCode {
    /// Success (0) - Command completed successfully
    Success = exitcode::OK,

    /// Command line usage error (64) - unknown or ambiguous command, bad argument
    UsageError = exitcode::USAGE,

    /// Data format error (65) - the server sent something we could not parse
    DataError = exitcode::DATAERR,

    /// Cannot open input file (66) - local file not found or unreadable
    NoInput = exitcode::NOINPUT,

    /// Addressee unknown (67) - the requested resource does not exist on the server
    NotFound = exitcode::NOUSER,

    /// Internal software error (70)
    SoftwareError = exitcode::SOFTWARE,

    /// Input/output error (74) - at least one file of a transfer failed
    IoError = exitcode::IOERR,

    /// Configuration error (78) - missing or corrupt settings
    ConfigError = exitcode::CONFIG,

    /// The server is older than the operation requires (100)
    UnsupportedVersion = 100,

    /// Network error (101) - connection or TLS failure
    NetworkError = 101,

    /// API error (102) - the server rejected the request
    ApiError = 102,
}

impl NexusExitCode {
    /// Convert to numeric exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Get descriptive message for the exit code
    pub fn message(&self) -> &'static str {
        match self {
            NexusExitCode::Success => "Success",
            NexusExitCode::UsageError => "Command line usage error",
            NexusExitCode::DataError => "Data format error",
            NexusExitCode::NoInput => "Cannot open input file",
            NexusExitCode::NotFound => "Resource not found",
            NexusExitCode::SoftwareError => "Internal software error",
            NexusExitCode::IoError => "Transfer incomplete",
            NexusExitCode::ConfigError => "Configuration error",
            NexusExitCode::UnsupportedVersion => "Unsupported Nexus version",
            NexusExitCode::NetworkError => "Network communication error",
            NexusExitCode::ApiError => "Remote API error",
        }
    }
}

impl From<NexusExitCode> for i32 {
    fn from(code: NexusExitCode) -> Self {
        code.code()
    }
}
