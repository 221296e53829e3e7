use thiserror::Error;

#[derive(Error, Debug)]
pub enum TermbaseError {
    // Remote collection failures, one per operation kind
    #[error("failed to fetch glossary data: {0}")]
    FetchFailure(String),

    #[error("failed to save glossary entry: {0}")]
    SaveFailure(String),

    #[error("failed to delete glossary entry '{0}': {1}")]
    DeleteFailure(String, String),

    #[error("failed to import glossary file: {0}")]
    ImportFailure(String),

    // Local state errors
    #[error("no glossary entry is selected")]
    NoSelection,

    #[error("entry '{0}' is not loaded")]
    EntryNotLoaded(String),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("invalid sort parameter '{0}'")]
    InvalidSort(String),

    #[error("unknown entry field '{0}'")]
    InvalidField(String),

    #[error("invalid severity '{0}'")]
    InvalidSeverity(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl TermbaseError {
    pub fn invalid_field(field: String) -> Self {
        TermbaseError::InvalidField(field)
    }

    pub fn invalid_severity(value: String) -> Self {
        TermbaseError::InvalidSeverity(value)
    }

    /// Whether this error came back from the remote collection rather than
    /// from local state.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            TermbaseError::FetchFailure(_)
                | TermbaseError::SaveFailure(_)
                | TermbaseError::DeleteFailure(..)
                | TermbaseError::ImportFailure(_)
                | TermbaseError::Http(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TermbaseError>;
