use thiserror::Error;

/// Errors raised while building, loading or reporting on the grades database.
#[derive(Debug, Error)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to close sqlite connection: {0}")]
    Close(#[source] rusqlite::Error),

    #[error("foreign key check reported {0} violation(s)")]
    ForeignKeyViolations(usize),

    /// Only tables that belong to the schema may be dumped.
    #[error("unknown table: {0}")]
    UnknownTable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
