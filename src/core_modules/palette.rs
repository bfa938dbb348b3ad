// THEORY:
// The `palette` module builds the set of packed colors considered part of the
// hand region. It samples a fixed 100x100 window centered on an
// initialization frame (the user is expected to hold their hand over the
// frame center) and records every distinct packed color it sees. Frames too
// small to contain the window are rejected up front rather than sampled
// out of range.
//
// The palette is built to completion before anyone can observe it: the
// builder returns a fresh, fully-populated set, and the engine installs it
// atomically from the classifier's point of view. During classification the
// palette is shared read-only across the quadrant workers.

use crate::core_modules::frame::{Frame, PixelFormat};
use crate::core_modules::pixel::pixel::PackedColor;
use crate::error::IsolationError;
use std::collections::HashSet;

/// Side length in pixels of the fixed sampling window.
pub const SAMPLE_WINDOW: u32 = 100;
const SAMPLE_HALF: u32 = SAMPLE_WINDOW / 2;

/// The set of packed-color keys considered "valid" hand pixels.
/// Order is irrelevant; membership is everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: HashSet<PackedColor>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key; returns false if it was already present.
    pub fn insert(&mut self, key: PackedColor) -> bool {
        self.colors.insert(key)
    }

    #[inline]
    pub fn contains(&self, key: PackedColor) -> bool {
        self.colors.contains(&key)
    }

    /// Number of distinct colors sampled.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// An empty palette is legal: every pixel fails the membership test.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl FromIterator<PackedColor> for Palette {
    fn from_iter<I: IntoIterator<Item = PackedColor>>(keys: I) -> Self {
        Self {
            colors: keys.into_iter().collect(),
        }
    }
}

/// The fixed rectangle sampled during palette construction, centered on the
/// frame. Bounds are half-open pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingWindow {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl SamplingWindow {
    /// `[w/2-50, w/2+50) x [h/2-50, h/2+50)`. Fails fast when the frame is
    /// smaller than the window in either dimension.
    pub fn centered(width: u32, height: u32) -> Result<Self, IsolationError> {
        if width < SAMPLE_WINDOW || height < SAMPLE_WINDOW {
            return Err(IsolationError::SamplingWindowOutOfBounds {
                window: SAMPLE_WINDOW,
                width,
                height,
            });
        }
        Ok(Self {
            left: width / 2 - SAMPLE_HALF,
            top: height / 2 - SAMPLE_HALF,
            right: width / 2 + SAMPLE_HALF,
            bottom: height / 2 + SAMPLE_HALF,
        })
    }
}

/// Scans every pixel in the centered sampling window via direct per-pixel
/// sampling and collects the distinct packed colors into a fresh palette.
/// The returned set is complete; no caller ever sees it half-built.
pub fn build_palette(frame: &Frame) -> Result<Palette, IsolationError> {
    let window = SamplingWindow::centered(frame.width(), frame.height())?;
    let mut palette = Palette::new();

    for y in window.top..window.bottom {
        for x in window.left..window.right {
            let pixel = frame.get_pixel(x, y);
            let key = match frame.format() {
                PixelFormat::Rgb24 => pixel.key_rgb(),
                PixelFormat::Argb32 => pixel.key_argb(),
            };
            palette.insert(key);
        }
    }

    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::{Pixel, key_argb, key_rgb};

    #[test]
    fn window_is_centered_and_half_open() {
        let window = SamplingWindow::centered(200, 150).unwrap();
        assert_eq!(
            window,
            SamplingWindow {
                left: 50,
                top: 25,
                right: 150,
                bottom: 125
            }
        );
    }

    #[test]
    fn window_fills_an_exactly_fitting_frame() {
        let window = SamplingWindow::centered(100, 100).unwrap();
        assert_eq!(
            window,
            SamplingWindow {
                left: 0,
                top: 0,
                right: 100,
                bottom: 100
            }
        );
    }

    #[test]
    fn odd_dimensions_keep_the_window_in_bounds() {
        let window = SamplingWindow::centered(101, 107).unwrap();
        assert!(window.right <= 101);
        assert!(window.bottom <= 107);
        assert_eq!(window.right - window.left, SAMPLE_WINDOW);
        assert_eq!(window.bottom - window.top, SAMPLE_WINDOW);
    }

    #[test]
    fn undersized_frames_fail_fast() {
        assert_eq!(
            SamplingWindow::centered(99, 200).err(),
            Some(IsolationError::SamplingWindowOutOfBounds {
                window: SAMPLE_WINDOW,
                width: 99,
                height: 200
            })
        );
        assert!(SamplingWindow::centered(200, 40).is_err());
    }

    #[test]
    fn build_collects_distinct_colors_only() {
        let mut frame = Frame::new(120, 120, PixelFormat::Rgb24);
        // Two alternating colors inside the window.
        for y in 10..110 {
            for x in 10..110 {
                let pixel = if (x + y) % 2 == 0 {
                    Pixel::new(200, 140, 110, 255)
                } else {
                    Pixel::new(180, 120, 100, 255)
                };
                frame.set_pixel(x, y, pixel);
            }
        }

        let palette = build_palette(&frame).unwrap();
        // The zeroed border never enters the window, so black is absent.
        assert_eq!(palette.len(), 2);
        assert!(palette.contains(key_rgb(200, 140, 110)));
        assert!(palette.contains(key_rgb(180, 120, 100)));
        assert!(!palette.contains(key_rgb(0, 0, 0)));
    }

    #[test]
    fn build_ignores_pixels_outside_the_window() {
        let mut frame = Frame::new(120, 120, PixelFormat::Rgb24);
        for y in 0..120 {
            for x in 0..120 {
                frame.set_pixel(x, y, Pixel::new(50, 60, 70, 255));
            }
        }
        // An outlier in the corner, outside [10, 110).
        frame.set_pixel(0, 0, Pixel::new(255, 0, 255, 255));

        let palette = build_palette(&frame).unwrap();
        assert_eq!(palette.len(), 1);
        assert!(!palette.contains(key_rgb(255, 0, 255)));
    }

    #[test]
    fn argb_frames_sample_alpha_into_the_key() {
        let mut frame = Frame::new(100, 100, PixelFormat::Argb32);
        for y in 0..100 {
            for x in 0..100 {
                frame.set_pixel(x, y, Pixel::new(9, 8, 7, 128));
            }
        }

        let palette = build_palette(&frame).unwrap();
        assert_eq!(palette.len(), 1);
        assert!(palette.contains(key_argb(128, 9, 8, 7)));
        assert!(!palette.contains(key_argb(255, 9, 8, 7)));
    }
}
