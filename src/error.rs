use thiserror::Error;

/// Fatal startup failures: the dataset could not be turned into a record store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot derive a year from submitted date {value:?}")]
    BadDate { row: usize, value: String },

    #[error("dataset contains no rows")]
    Empty,
}

/// Recoverable view failures. These surface as an in-view notice and leave
/// the previous view untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("no records match the current filter")]
    EmptyAggregation,

    #[error("unknown column: {0:?}")]
    InvalidSelection(String),
}
