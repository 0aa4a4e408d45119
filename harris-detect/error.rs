use harris_core::ImageError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Invalid kernel {width}x{height}: {reason}")]
    InvalidKernel {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    #[error("Invalid suppression window: {0} (must be >= 0)")]
    InvalidWindow(i32),

    #[error("Invalid sigma: {0} (must be finite)")]
    InvalidSigma(f32),

    #[error("Invalid threshold: {0} (must be finite)")]
    InvalidThreshold(f32),

    #[error("Invalid Harris k: {0} (must be finite)")]
    InvalidK(f32),
}

pub type DetectResult<T> = Result<T, DetectError>;
