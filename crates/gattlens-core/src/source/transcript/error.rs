use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl TranscriptError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        TranscriptError::Syntax {
            line,
            message: message.into(),
        }
    }
}
