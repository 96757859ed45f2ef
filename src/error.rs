use thiserror::Error;

// Per-match failures carry the offending path so batch summaries can name the file.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write report {path}: {source}")]
    Report {
        path: String,
        #[source]
        source: csv::Error,
    },
}
