use thiserror::Error;

/// Failure modes of the isolation core.
///
/// A classification pass that fails never commits: the frame's pixel memory
/// is left exactly as it was before the pass. A pass requested before the
/// palette is ready is NOT an error; it is a documented no-op (see
/// `PassOutcome::NotReady`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsolationError {
    /// The pixel format is not one of the two supported packed layouts
    /// (24bpp BGR or 32bpp BGRA), or its bit depth is not a whole number
    /// of bytes.
    #[error("unsupported pixel format: {bits_per_pixel} bits per pixel")]
    UnsupportedFormat { bits_per_pixel: u16 },

    /// An exclusive lock was requested on a frame that is already locked.
    #[error("frame is already locked")]
    LockConflict,

    /// A commit or discard was attempted against a frame that holds no lock.
    #[error("frame is not locked")]
    NotLocked,

    /// The palette sampling window does not fit inside the frame.
    #[error("{window}x{window} sampling window exceeds {width}x{height} frame")]
    SamplingWindowOutOfBounds { window: u32, width: u32, height: u32 },

    /// A byte buffer does not match the dimensions it claims to carry.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}
