#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Invalid patch size: {0} (must be odd and > 0)")]
    InvalidPatchSize(usize),

    #[error("Descriptor length mismatch: expected {expected}, got {actual}")]
    DescriptorLengthMismatch { expected: usize, actual: usize },
}

pub type MatchResult<T> = Result<T, MatchError>;
