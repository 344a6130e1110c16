use thiserror::Error;

/// An error that can occur when loading GTFS tables.
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory table is not present in the feed
    #[error("Could not find file {0}")]
    MissingFile(String),
    /// The given path to the GTFS is neither a file nor a directory
    #[error("Could not read GTFS: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    /// A table has no header line
    #[error("'{0}' has no header line")]
    EmptyTable(String),
    /// A join key column is not declared in the table header
    #[error("'{table}' has no '{column}' column")]
    MissingColumn {
        /// Table that was searched
        table: String,
        /// Column that was expected
        column: String,
    },
    /// Generic Input/Output error while reading a file
    #[error("impossible to read file")]
    IO(#[from] std::io::Error),
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Error when trying to unzip the GTFS archive
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    /// Error when querying sqlite
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),
}
