//! Synthetic frames for tests

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Deterministic xorshift noise
pub fn noise_gray(width: u32, height: u32, seed: u64) -> GrayImage {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    GrayImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        Luma([(state >> 56) as u8])
    })
}

/// Copy `src` into `dst` with its top-left corner at (`x`, `y`)
pub fn paste(dst: &mut GrayImage, src: &GrayImage, x: u32, y: u32) {
    for (sx, sy, pixel) in src.enumerate_pixels() {
        dst.put_pixel(x + sx, y + sy, *pixel);
    }
}

/// Gray to RGB with equal channels, so grayscale conversion gives the input back
pub fn to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}
