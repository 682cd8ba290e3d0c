use thiserror::Error;

/// Errors raised while rendering or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to write document: {0}")]
    Io(#[from] std::io::Error),

    #[error("background write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
