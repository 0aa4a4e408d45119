/// Malformed pixel buffer errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    #[error("Invalid image dimensions: {width}x{height} (must be > 0)")]
    InvalidImageSize { width: usize, height: usize },

    #[error("Invalid channel count: {0} (must be > 0)")]
    InvalidChannels(usize),

    #[error("Image data length mismatch: expected {expected_len}, got {actual_len}")]
    InvalidImageData { expected_len: usize, actual_len: usize },

    #[error("Image shape {width}x{height}x{channels} overflows the sample count")]
    ImageTooLarge {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("Image shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("Channel {channel} out of range for a {channels}-channel image")]
    ChannelOutOfRange { channel: usize, channels: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;
