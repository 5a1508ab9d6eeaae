use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong outside the core. The outline and link
/// passes themselves never fail; only reading and validating input does.
#[derive(Debug, Error)]
pub enum DocmenuError {
    #[error("{}: not found{}", .path.display(), suggestion_suffix(.suggestion.as_deref()))]
    NotFound {
        path: PathBuf,
        suggestion: Option<String>,
    },

    #[error("{}: permission denied", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid document: {reason}", .path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("{}: unsupported format (expected .md or .json)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("{}: invalid config: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("invalid glob {pattern:?}: {reason}")]
    InvalidGlob { pattern: String, reason: String },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean {name}?)"),
        None => String::new(),
    }
}

impl DocmenuError {
    /// Attach a concrete path to an error produced without one (inline MCP
    /// documents validate against an empty path).
    #[must_use]
    pub fn with_path(self, path: PathBuf) -> Self {
        match self {
            Self::InvalidDocument { reason, .. } => Self::InvalidDocument { path, reason },
            other => other,
        }
    }
}
