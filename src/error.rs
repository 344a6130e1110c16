use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Gtfs(#[from] crate::gtfs::error::Error),
    #[error("Error converting '{path}' to JSON")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Error writing to file '{path}'")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} generation task panicked")]
    TaskPanicked(&'static str),
}
