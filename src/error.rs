use miette::Diagnostic;
use thiserror::Error;

/// Main error type for anigen operations
#[derive(Error, Diagnostic, Debug)]
pub enum AnigenError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(anigen::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(anigen::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(anigen::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Encode error: {message}")]
    #[diagnostic(code(anigen::encode))]
    Encode { message: String },

    #[error("Export failed for {path}: {message}")]
    #[diagnostic(code(anigen::export))]
    Export {
        path: std::path::PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, AnigenError>;
