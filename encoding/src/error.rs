/// Row-local decoding failures. Callers substitute a default value and carry on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid position '{fen}': {reason}")]
    InvalidPosition { fen: String, reason: String },

    #[error("Unparseable evaluation '{token}'")]
    UnparseableEvaluation { token: String },
}
