/// All errors that can occur while running a toolkit command.
#[derive(Debug, thiserror::Error)]
pub enum ToolsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("\"{anchor}\" not found in {file}")]
    AnchorNotFound { anchor: String, file: String },

    #[error("\"{0}\" contains invalid characters")]
    InvalidName(String),

    #[error("unsupported extension in \"{0}\"")]
    UnsupportedExtension(String),

    #[error("{0} is not supported on this platform")]
    Unsupported(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, ToolsError>;
