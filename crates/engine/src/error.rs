use thiserror::Error;

/// Schema and bounds errors raised while transforming a table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("column reference is empty")]
    EmptyReference,

    #[error("cannot find column '{reference}'")]
    UnknownColumn { reference: String, available: Vec<String> },

    #[error("column '{reference}' is out of range [{first}-{last}]")]
    OutOfRange {
        reference: String,
        first: String,
        last: String,
        available: Vec<String>,
    },

    #[error("column '{0}' selected more than once")]
    DuplicateColumn(String),

    #[error("none of the requested columns exist in any input")]
    EmptySelection,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },

    #[error("tables have different columns and cannot be appended")]
    ColumnMismatch,

    #[error("start row {start} is outside 1..={total}")]
    StartOutOfRange { start: usize, total: usize },

    #[error("end row {end} must be greater than start row {start} and at most {limit}")]
    EndOutOfRange { start: usize, end: usize, limit: usize },

    #[error("{what} must be greater than 0")]
    NotPositive { what: &'static str },

    #[error("{segments} segments over {rows} rows leaves every segment empty")]
    SegmentsTooMany { segments: usize, rows: usize },
}

impl EngineError {
    /// Column names worth listing next to the message, if any.
    pub fn available_columns(&self) -> Option<&[String]> {
        match self {
            Self::UnknownColumn { available, .. } | Self::OutOfRange { available, .. } => {
                Some(available)
            }
            _ => None,
        }
    }
}
