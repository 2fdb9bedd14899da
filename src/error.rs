use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    TomlParseError {
        origin: String,
        source: toml::de::Error,
    },
    PayloadParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    MissingSection {
        section: String,
    },
    InvalidOption {
        key: String,
        reason: String,
    },
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    MissingInput {
        name: String,
    },
    ApiError {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileReadError { path, source } => {
                write!(f, "failed to read file: {} ({})", path.display(), source)
            }
            Error::TomlParseError { origin, source } => {
                write!(f, "failed to parse toml document: {} ({})", origin, source)
            }
            Error::PayloadParseError { path, source } => {
                write!(
                    f,
                    "failed to parse event payload: {} ({})",
                    path.display(),
                    source
                )
            }
            Error::MissingSection { section } => {
                write!(f, "Missing [{}] section.", section)
            }
            Error::InvalidOption { key, reason } => {
                write!(f, "invalid configuration option `{}`: {}", key, reason)
            }
            Error::InvalidPattern { pattern, source } => {
                write!(f, "invalid pattern '{}': {}", pattern, source)
            }
            Error::MissingInput { name } => {
                write!(f, "missing required input: {}", name)
            }
            Error::ApiError { url, source } => {
                write!(f, "request to {} failed: {}", url, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileReadError { source, .. } => Some(source),
            Error::TomlParseError { source, .. } => Some(source),
            Error::PayloadParseError { source, .. } => Some(source),
            Error::InvalidPattern { source, .. } => Some(source),
            Error::ApiError { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    pub fn invalid_option(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidOption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn from_api_error<T: std::error::Error + Send + Sync + 'static>(
        url: impl Into<String>,
        err: T,
    ) -> Self {
        Error::ApiError {
            url: url.into(),
            source: Box::new(err),
        }
    }
}
