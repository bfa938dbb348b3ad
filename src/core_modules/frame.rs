// THEORY:
// The `Frame` module models the boundary with the frame provider (the camera /
// video-capture side of the pipeline). A `Frame` is a mutable image resource:
// width, height, a packed pixel format, and the raw pixel bytes in B,G,R[,A]
// row-major order. The isolation core never owns a frame's lifetime; it
// borrows exclusive access for one lock/classify/unlock cycle through the
// `buffer` module, which is the only place allowed to toggle the lock flag.
//
// Direct per-pixel sampling (`get_pixel`/`set_pixel`) exists for the palette
// builder and for callers staging test scenes; it must not be used while the
// frame is locked, because the locked byte buffer is the authoritative copy
// during a pass.

use crate::core_modules::pixel::pixel::{ARGB_DEPTH, Byte, Pixel, RGB_DEPTH};
use crate::error::IsolationError;

/// Packed pixel layouts supported by the isolation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 24 bits per pixel, stored B,G,R.
    Rgb24,
    /// 32 bits per pixel, stored B,G,R,A.
    Argb32,
}

impl PixelFormat {
    /// Maps a provider's bits-per-pixel tag onto a supported layout.
    pub fn from_bits(bits_per_pixel: u16) -> Result<Self, IsolationError> {
        match bits_per_pixel {
            24 => Ok(PixelFormat::Rgb24),
            32 => Ok(PixelFormat::Argb32),
            other => Err(IsolationError::UnsupportedFormat {
                bits_per_pixel: other,
            }),
        }
    }

    pub fn bits_per_pixel(&self) -> u16 {
        match self {
            PixelFormat::Rgb24 => 24,
            PixelFormat::Argb32 => 32,
        }
    }

    /// Byte depth per pixel; the stride unit for all offset math.
    pub fn depth(&self) -> usize {
        match self {
            PixelFormat::Rgb24 => RGB_DEPTH,
            PixelFormat::Argb32 => ARGB_DEPTH,
        }
    }
}

/// A mutable image resource supplied by the frame provider.
pub struct Frame {
    width: u32,
    height: u32,
    format: PixelFormat,
    /// Packed pixel rows, top to bottom, in the format's byte order.
    data: Vec<Byte>,
    /// Set while a `LockedBuffer` holds exclusive access to `data`.
    locked: bool,
}

impl Frame {
    /// Creates a frame of the given dimensions with every byte zeroed.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let data = vec![0; width as usize * height as usize * format.depth()];
        Self {
            width,
            height,
            format,
            data,
            locked: false,
        }
    }

    /// Wraps existing packed pixel data. The byte length must match the
    /// dimensions exactly.
    pub fn from_raw(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<Byte>,
    ) -> Result<Self, IsolationError> {
        let expected = width as usize * height as usize * format.depth();
        if data.len() != expected {
            return Err(IsolationError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
            locked: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw packed bytes. Not meaningful while the frame is locked.
    pub fn data(&self) -> &[Byte] {
        &self.data
    }

    /// Samples a single pixel directly from frame memory.
    /// Panics if (x, y) is outside the frame.
    pub fn get_pixel(&self, x: u32, y: u32) -> Pixel {
        let offset = self.pixel_offset(x, y);
        match self.format {
            PixelFormat::Rgb24 => Pixel::from_bgr(&self.data[offset..offset + RGB_DEPTH]),
            PixelFormat::Argb32 => Pixel::from_bgra(&self.data[offset..offset + ARGB_DEPTH]),
        }
    }

    /// Writes a single pixel directly into frame memory.
    /// Panics if (x, y) is outside the frame.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        let offset = self.pixel_offset(x, y);
        self.data[offset] = pixel.blue;
        self.data[offset + 1] = pixel.green;
        self.data[offset + 2] = pixel.red;
        if self.format == PixelFormat::Argb32 {
            self.data[offset + 3] = pixel.alpha;
        }
    }

    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        if x >= self.width || y >= self.height {
            panic!(
                "Pixel ({x}, {y}) is outside the {}x{} frame.",
                self.width, self.height
            );
        }
        (y as usize * self.width as usize + x as usize) * self.format.depth()
    }

    pub(crate) fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub(crate) fn copy_pixels_out(&self) -> Vec<Byte> {
        self.data.clone()
    }

    pub(crate) fn copy_pixels_in(&mut self, bytes: &[Byte]) {
        self.data.copy_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_round_trip_rgb24() {
        let mut frame = Frame::new(4, 2, PixelFormat::Rgb24);
        frame.set_pixel(3, 1, Pixel::new(10, 20, 30, 0));
        let sampled = frame.get_pixel(3, 1);
        // 3-byte frames have no alpha plane; reads come back opaque.
        assert_eq!(sampled, Pixel::new(10, 20, 30, 255));
        assert_eq!(&frame.data()[(1 * 4 + 3) * 3..], &[30, 20, 10]);
    }

    #[test]
    fn pixel_round_trip_argb32() {
        let mut frame = Frame::new(2, 2, PixelFormat::Argb32);
        frame.set_pixel(0, 1, Pixel::new(1, 2, 3, 4));
        assert_eq!(frame.get_pixel(0, 1), Pixel::new(1, 2, 3, 4));
    }

    #[test]
    fn from_raw_rejects_wrong_length() {
        let result = Frame::from_raw(2, 2, PixelFormat::Rgb24, vec![0; 11]);
        assert_eq!(
            result.err(),
            Some(IsolationError::SizeMismatch {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn format_tags_map_to_supported_layouts() {
        assert_eq!(PixelFormat::from_bits(24).unwrap(), PixelFormat::Rgb24);
        assert_eq!(PixelFormat::from_bits(32).unwrap(), PixelFormat::Argb32);
        assert_eq!(
            PixelFormat::from_bits(16).err(),
            Some(IsolationError::UnsupportedFormat { bits_per_pixel: 16 })
        );
    }
}
