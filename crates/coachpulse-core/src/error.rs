use thiserror::Error;

/// Roster construction and lookup errors
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Alias collision: \"{alias}\" maps to both {first} and {second}")]
    AliasCollision {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Duplicate player in snapshot: {0}")]
    DuplicatePlayer(String),

    #[error("Roster snapshot parse error: {0}")]
    ParseError(String),

    #[error("Roster snapshot file not found: {0}")]
    FileNotFound(String),
}

/// Sentiment scorer errors
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Scorer request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Malformed score response: {0}")]
    MalformedResponse(String),

    #[error("Lexicon file error: {0}")]
    LexiconError(String),
}

/// Sentiment store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Analysis pipeline errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Store write failed for transcript {transcript_id}: {source}")]
    StoreWriteFailure {
        transcript_id: String,
        #[source]
        source: StoreError,
    },

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
