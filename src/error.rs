use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Request to the course catalog failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse HTML: {0}")]
    ParsingError(String),

    #[error("Could not find required element on the page: {0}")]
    ElementNotFound(String),

    #[error("`{value}` is not a selectable option of {selector}")]
    OptionNotFound { selector: String, value: String },

    #[error("Timed out after {waited_ms}ms waiting for {selector}")]
    Timeout { selector: String, waited_ms: u128 },

    #[error("Expected at least 3 detail blocks in the search result, found {found}")]
    TooFewBlocks { found: usize },

    #[error("Credits label does not match `Total Credits: N`: {0:?}")]
    CreditsNotFound(String),

    #[error("Invalid course code {code:?}: {reason}")]
    InvalidCourseCode { code: String, reason: &'static str },

    #[error("Could not read course list {}: {source}", .path.display())]
    InputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write results: {0}")]
    OutputError(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Browser automation failed: {0}")]
    BrowserError(String),
}

/// Coarse classification of failures, mirroring how the batch treats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input file, course code or configuration. Raised before any lookup.
    Input,
    /// Target page unreachable or a control is missing.
    Navigation,
    /// The result page did not have the expected shape.
    Parse,
    /// The output file could not be written.
    Output,
}

impl ScraperError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCourseCode { .. } | Self::InputError { .. } | Self::ConfigError(_) => {
                ErrorKind::Input
            }
            Self::RequestError(_)
            | Self::ElementNotFound(_)
            | Self::OptionNotFound { .. }
            | Self::Timeout { .. }
            | Self::BrowserError(_) => ErrorKind::Navigation,
            Self::ParsingError(_) | Self::TooFewBlocks { .. } | Self::CreditsNotFound(_) => {
                ErrorKind::Parse
            }
            Self::OutputError(_) => ErrorKind::Output,
        }
    }
}

impl From<figment::Error> for ScraperError {
    fn from(err: figment::Error) -> Self {
        Self::ConfigError(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
