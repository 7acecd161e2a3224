use std::path::PathBuf;
use thiserror::Error;

use crate::{
    client::ApiError, configuration::ConfigurationError, dispatch::DispatchError,
    exit_codes::NexusExitCode, format::FormattingError, transfer::TransferError,
};

/// Error types that can occur during CLI command execution
#[derive(Debug, Error)]
pub enum CliError {
    /// Unknown or ambiguous command
    #[error("{0}")]
    DispatchError(#[from] DispatchError),
    /// Error when no handler is registered for a parsed subcommand
    #[error("Undefined or unsupported subcommand: {0}")]
    UnsupportedSubcommand(String),
    /// Error related to configuration loading or management
    #[error("Configuration error: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    /// Error related to data formatting
    #[error("Formatting error: {0}")]
    FormattingError(#[from] FormattingError),
    /// Error when a required command-line argument is missing
    #[error("Missing required argument: {0}")]
    MissingRequiredArgument(String),
    #[error("{0}")]
    ApiError(#[from] ApiError),
    #[error("{0}")]
    TransferError(#[from] TransferError),
    /// Some files of an upload or download failed; the rest were transferred
    #[error("{failed} of {total} file(s) failed to transfer")]
    PartialTransfer { failed: usize, total: usize },
    #[error("failed to read {path:?}: {cause}")]
    InputError {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("Prompt error: {0}")]
    PromptError(#[from] inquire::InquireError),
    #[error("Operation cancelled")]
    Cancelled,
}

impl CliError {
    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> NexusExitCode {
        match self {
            CliError::DispatchError(_) => NexusExitCode::UsageError,
            CliError::UnsupportedSubcommand(_) => NexusExitCode::UsageError,
            CliError::ConfigurationError(_) => NexusExitCode::ConfigError,
            CliError::FormattingError(_) => NexusExitCode::DataError,
            CliError::MissingRequiredArgument(_) => NexusExitCode::UsageError,
            CliError::ApiError(e) => api_exit_code(e),
            CliError::TransferError(e) => match e {
                TransferError::InvalidRepositoryPath(_) => NexusExitCode::UsageError,
                TransferError::SourceNotFound(_) => NexusExitCode::NoInput,
                TransferError::NothingToTransfer(_) => NexusExitCode::NotFound,
                TransferError::Io { .. } => NexusExitCode::IoError,
                TransferError::Api { cause, .. } => api_exit_code(cause),
            },
            CliError::PartialTransfer { .. } => NexusExitCode::IoError,
            CliError::InputError { .. } => NexusExitCode::NoInput,
            CliError::PromptError(_) => NexusExitCode::UsageError,
            CliError::Cancelled => NexusExitCode::UsageError,
        }
    }
}

fn api_exit_code(error: &ApiError) -> NexusExitCode {
    match error {
        ApiError::HttpError(e) if e.is_connect() || e.is_timeout() => NexusExitCode::NetworkError,
        ApiError::HttpError(_) => NexusExitCode::ApiError,
        ApiError::JsonError(_) => NexusExitCode::DataError,
        ApiError::InvalidUrl(_) => NexusExitCode::ConfigError,
        ApiError::NotFound { .. } => NexusExitCode::NotFound,
        ApiError::Action { .. } => NexusExitCode::ApiError,
        ApiError::UnsupportedVersion { .. } => NexusExitCode::UnsupportedVersion,
        ApiError::UnknownServerVersion(_) => NexusExitCode::ApiError,
        ApiError::InvalidParameter { .. } => NexusExitCode::UsageError,
        ApiError::GroovyDisabled { .. } => NexusExitCode::ConfigError,
    }
}
