use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    IssuesFileMissing,
    ConfigParseError,
    ItemNotFound,
    EmptyItemId,
    InvalidItem,
    InvalidEnumValue,
    IssuesWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::IssuesFileMissing => "E1001",
            Self::ConfigParseError => "E1002",
            Self::ItemNotFound => "E2001",
            Self::EmptyItemId => "E2002",
            Self::InvalidItem => "E2003",
            Self::InvalidEnumValue => "E2005",
            Self::IssuesWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::IssuesFileMissing => "Issues file not found",
            Self::ConfigParseError => "Config file parse error",
            Self::ItemNotFound => "Item not found",
            Self::EmptyItemId => "Item id is empty",
            Self::InvalidItem => "Invalid item record",
            Self::InvalidEnumValue => "Invalid status/type value",
            Self::IssuesWriteFailed => "Issues file write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::IssuesFileMissing => {
                Some("Pass --issues <PATH> or create .arbor/issues.jsonl in this directory.")
            }
            Self::ConfigParseError => Some("Fix syntax in .arbor/config.toml and retry."),
            Self::ItemNotFound => Some("Check the id with `arbor tree` on a known parent."),
            Self::EmptyItemId => None,
            Self::InvalidItem => Some("Every issue needs a non-empty id and title."),
            Self::InvalidEnumValue => Some("Use one of the documented status/type values."),
            Self::IssuesWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the arbor core.
#[derive(Debug, thiserror::Error)]
pub enum ArborError {
    #[error("issue not found: {0}")]
    ItemNotFound(String),

    #[error("issue id cannot be empty")]
    EmptyItemId,

    #[error("invalid issue {id}: {reason}")]
    InvalidItem { id: String, reason: &'static str },

    #[error("issues file not found: {}", .0.display())]
    IssuesFileMissing(PathBuf),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl ArborError {
    /// Map the error onto its stable [`ErrorCode`].
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ItemNotFound(_) => ErrorCode::ItemNotFound,
            Self::EmptyItemId => ErrorCode::EmptyItemId,
            Self::InvalidItem { .. } => ErrorCode::InvalidItem,
            Self::IssuesFileMissing(_) => ErrorCode::IssuesFileMissing,
            Self::Io { .. } => ErrorCode::IssuesWriteFailed,
            Self::Json(_) => ErrorCode::InternalUnexpected,
            Self::Config { .. } => ErrorCode::ConfigParseError,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ArborError, ErrorCode};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::IssuesFileMissing,
            ErrorCode::ConfigParseError,
            ErrorCode::ItemNotFound,
            ErrorCode::EmptyItemId,
            ErrorCode::InvalidItem,
            ErrorCode::InvalidEnumValue,
            ErrorCode::IssuesWriteFailed,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::ItemNotFound.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = ArborError::ItemNotFound("bv-9".to_string());
        assert_eq!(err.to_string(), "issue not found: bv-9");
        assert_eq!(err.code(), ErrorCode::ItemNotFound);
    }
}
