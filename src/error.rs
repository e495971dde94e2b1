use std::io;
use std::path::PathBuf;

/// Failure while cutting a document into sections.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("delimiter must not be empty")]
    EmptyDelimiter,

    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("line {line} is longer than {limit} bytes")]
    LineTooLong { line: usize, limit: usize },
}

/// Failure of a single markdown-to-HTML conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("section is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("markdown conversion failed: {0}")]
    Markdown(String),
}

/// Failure of a batch render. No fragments survive it.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to render section {index}: {source}")]
    Section {
        index: usize,
        #[source]
        source: ConvertError,
    },

    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Error of the whole split-then-render pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Split(#[from] SplitError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
