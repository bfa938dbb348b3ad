// THEORY:
// The `buffer` module is the pixel-buffer access contract: the only way the
// rest of the engine touches a frame's raw memory. `acquire` takes exclusive
// access to a frame, copies its bytes into a caller-owned buffer and returns
// that buffer together with a `LockedBuffer` token carrying the offset
// metadata (width, height, byte depth). `release` commits the possibly-mutated
// bytes back and unlocks; `discard` unlocks WITHOUT committing, which is the
// abort path for a failed pass.
//
// The token is consumed by `release`/`discard`, so a lock can only be spent
// once. Between acquire and release the frame's own pixel memory is stale and
// must not be read by any other component; the copied-out buffer is the
// authoritative image for the duration of the pass.

use crate::core_modules::frame::Frame;
use crate::core_modules::pixel::pixel::Byte;
use crate::error::IsolationError;

/// An ownership-scoped view over a locked frame's pixel memory: the metadata
/// needed to compute pixel offsets, plus proof that the frame is locked.
#[derive(Debug)]
pub struct LockedBuffer {
    width: u32,
    height: u32,
    depth: usize,
}

impl LockedBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per pixel: 3 for packed BGR, 4 for packed BGRA.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Total byte length of the locked region: `width * height * depth`.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize * self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Takes exclusive read/write access to the frame's full rectangle and copies
/// the raw bytes out. Fails with `LockConflict` if the frame is already
/// locked, or `UnsupportedFormat` if the format's bit depth is not a whole
/// number of bytes.
pub fn acquire(frame: &mut Frame) -> Result<(LockedBuffer, Vec<Byte>), IsolationError> {
    if frame.is_locked() {
        return Err(IsolationError::LockConflict);
    }

    let bits = frame.format().bits_per_pixel();
    if bits % 8 != 0 {
        return Err(IsolationError::UnsupportedFormat {
            bits_per_pixel: bits,
        });
    }

    frame.set_locked(true);
    let lock = LockedBuffer {
        width: frame.width(),
        height: frame.height(),
        depth: (bits / 8) as usize,
    };
    let bytes = frame.copy_pixels_out();
    Ok((lock, bytes))
}

/// Commits the byte buffer back into the frame's pixel memory and releases
/// exclusive access. A size mismatch unlocks the frame but commits nothing.
pub fn release(frame: &mut Frame, lock: LockedBuffer, bytes: Vec<Byte>) -> Result<(), IsolationError> {
    if !frame.is_locked() {
        return Err(IsolationError::NotLocked);
    }
    if bytes.len() != lock.len() {
        frame.set_locked(false);
        return Err(IsolationError::SizeMismatch {
            expected: lock.len(),
            actual: bytes.len(),
        });
    }

    frame.copy_pixels_in(&bytes);
    frame.set_locked(false);
    Ok(())
}

/// Releases exclusive access without committing: the frame keeps the pixel
/// bytes it had before `acquire`.
pub fn discard(frame: &mut Frame, lock: LockedBuffer) {
    let _ = lock;
    frame.set_locked(false);
}
