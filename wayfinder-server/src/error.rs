use thiserror::Error;

/// Failures that stop the server from starting
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logging init failed: {0}")]
    Logging(String),

    #[error("failed to load campus graph: {0}")]
    Graph(#[from] wayfinder_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
