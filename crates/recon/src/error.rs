use std::fmt;

/// Pipeline stage an error originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Loader,
    Engine,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Loader => write!(f, "loader"),
            Self::Engine => write!(f, "engine"),
        }
    }
}

/// Structural failures. Per-unit data-quality conditions are never errors;
/// they surface as notes in the result.
#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty name, empty column candidates, etc.).
    ConfigValidation(String),
    /// None of the candidate header names is present in a source.
    MissingColumn { source: String, candidates: Vec<String> },
    /// Malformed CSV or unreadable source.
    Io { source: String, message: String },
    /// A unit master record has an empty unit identifier.
    EmptyUnitId { source: String, index: usize },
    /// The unit master lists the same identifier twice.
    DuplicateUnit { unit: String },
}

impl ReconError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::ConfigParse(_) | Self::ConfigValidation(_) => Stage::Config,
            Self::MissingColumn { .. } | Self::Io { .. } => Stage::Loader,
            Self::EmptyUnitId { .. } | Self::DuplicateUnit { .. } => Stage::Engine,
        }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, candidates } => {
                write!(f, "loader: {source}: missing column (tried {})", candidates.join(", "))
            }
            Self::Io { source, message } => write!(f, "loader: {source}: {message}"),
            Self::EmptyUnitId { source, index } => {
                write!(f, "engine: {source} record #{index} has an empty unit identifier")
            }
            Self::DuplicateUnit { unit } => {
                write!(f, "engine: unit '{unit}' appears more than once in the unit master")
            }
        }
    }
}

impl std::error::Error for ReconError {}
