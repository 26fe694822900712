//! The error taxonomy shared by every plugin.

use thiserror::Error;

/// Everything that can go wrong while carrying out a plugin action.
///
/// Handlers return `Result<Reply, PluginError>`; the invoker translates any
/// error into the plugin's own error shape at the presentation boundary, so
/// no variant ever escapes to the caller of [`crate::plugins::invoke`].
#[derive(Debug, Error)]
pub enum PluginError {
    /// The argument string failed to parse into the plugin's expected form.
    #[error("{0}")]
    MalformedArgument(String),

    /// The argument parsed but named something unusable: a missing file, a
    /// bad field value, oversized or binary content.
    #[error("{0}")]
    InvalidInput(String),

    /// The target path is outside every allowed base path, or the action is
    /// switched off by configuration.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested variant of the action is not in the supported set.
    #[error("{0}")]
    UnsupportedAction(String),

    /// A required external facility is absent: interpreter, program,
    /// browser, trash.
    #[error("{0}")]
    DependencyMissing(String),

    /// A bounded wait on a child process or browser session expired.
    #[error("{0}")]
    Timeout(String),

    /// An unanticipated fault. Reported like every other error, never a
    /// panic.
    #[error("{0}")]
    Internal(String),
}

impl PluginError {
    /// Stable lowercase variant name, for logs and assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            PluginError::MalformedArgument(_) => "malformed_argument",
            PluginError::InvalidInput(_) => "invalid_input",
            PluginError::Unauthorized(_) => "unauthorized",
            PluginError::UnsupportedAction(_) => "unsupported_action",
            PluginError::DependencyMissing(_) => "dependency_missing",
            PluginError::Timeout(_) => "timeout",
            PluginError::Internal(_) => "internal",
        }
    }
}
