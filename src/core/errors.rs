use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(Box<calamine::Error>),

    #[error("XLSX write error: {0}")]
    XlsxWrite(Box<rust_xlsxwriter::XlsxError>),

    #[error("The file is empty or has no readable rows")]
    EmptySheet,

    #[error("Failed to load unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("The queue is empty")]
    EmptyQueue,

    #[error("No destination URL has been configured")]
    MissingDestination,

    #[error("Invalid destination URL: {0}")]
    InvalidDestination(String),

    #[error("Destination rejected the submission: {0}")]
    Rejected(String),

    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("PipError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for PipError {
    fn from(error: std::io::Error) -> Self {
        PipError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for PipError {
    fn from(error: reqwest::Error) -> Self {
        PipError::Reqwest(Box::new(error))
    }
}

impl From<calamine::Error> for PipError {
    fn from(error: calamine::Error) -> Self {
        PipError::Spreadsheet(Box::new(error))
    }
}

impl From<rust_xlsxwriter::XlsxError> for PipError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        PipError::XlsxWrite(Box::new(error))
    }
}
