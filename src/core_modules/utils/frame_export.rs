// Saves isolated frames as PNGs for downstream inspection. Frames store
// pixels in B,G,R[,A] order; PNG encoders want R,G,B[,A], so the channels are
// swizzled on the way out.

use crate::core_modules::frame::{Frame, PixelFormat};
use image::ImageEncoder;
use std::path::Path;

pub fn save(path: &Path, frame: &Frame) -> Result<(), image::error::ImageError> {
    let depth = frame.format().depth();
    let mut rgb = frame.data().to_vec();
    for pixel in rgb.chunks_exact_mut(depth) {
        pixel.swap(0, 2);
    }

    let color_type = match frame.format() {
        PixelFormat::Rgb24 => image::ExtendedColorType::Rgb8,
        PixelFormat::Argb32 => image::ExtendedColorType::Rgba8,
    };

    let output = std::fs::File::create(path)?;
    let encoder = image::codecs::png::PngEncoder::new(output);
    encoder.write_image(&rgb, frame.width(), frame.height(), color_type)?;

    Ok(())
}
