use std::io;

/// Errors raised while compiling or evaluating a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid pattern segment '{segment}': {reason}")]
    InvalidSegment { segment: String, reason: String },
    #[error(
        "Pattern segment '{segment}' declares {groups} capturing groups for {variables} variables; use non-capturing groups instead"
    )]
    CapturingGroup {
        segment: String,
        groups: usize,
        variables: usize,
    },
    #[error("Pattern \"{pattern}\" is not a match for \"{path}\"")]
    NoMatch { pattern: String, path: String },
    #[error("Cannot combine patterns: {first} vs {second}")]
    IncompatibleCombine { first: String, second: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Malformed location '{location}': {reason}")]
    MalformedLocation { location: String, reason: String },
    #[error("Unsupported capability: {capability} for {description}")]
    UnsupportedCapability {
        capability: &'static str,
        description: String,
    },
    #[error("I/O error on {description}: {source}")]
    Store {
        description: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl ResourceError {
    /// Classifies an I/O error raised while touching `description`.
    pub fn from_io(description: impl Into<String>, err: io::Error) -> Self {
        let description = description.into();
        if err.kind() == io::ErrorKind::NotFound {
            ResourceError::NotFound(format!("{description} ({err})"))
        } else {
            ResourceError::Store {
                description,
                source: err,
            }
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl ToString) -> Self {
        ResourceError::MalformedLocation {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unsupported(capability: &'static str, description: impl Into<String>) -> Self {
        ResourceError::UnsupportedCapability {
            capability,
            description: description.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound(_))
    }

    /// Whether this error points at a bad location or pattern rather than
    /// at the state of a backing store.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ResourceError::MalformedLocation { .. } | ResourceError::Pattern(_)
        )
    }
}

pub type ResourceResult<T> = std::result::Result<T, ResourceError>;
