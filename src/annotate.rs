//! Debug helpers: mark a detection on a frame, cut a reference template out of one

use crate::error::{LocatorError, LocatorResult};
use image::{Rgb, RgbImage, imageops};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use std::path::Path;

/// Box size drawn around a detection when the matched size is unknown
pub const DEFAULT_MARKER_SIZE: u32 = 50;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CENTER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CENTER_RADIUS: i32 = 5;

/// Copy of `frame` with a 2px box of `width`x`height` centered on (x, y)
/// and a filled dot on the center itself. Parts outside the frame are clipped.
pub fn annotate_detection(frame: &RgbImage, x: i32, y: i32, width: u32, height: u32) -> RgbImage {
    let mut annotated = frame.clone();
    let left = x - (width / 2) as i32;
    let top = y - (height / 2) as i32;

    if width > 0 && height > 0 {
        draw_hollow_rect_mut(&mut annotated, Rect::at(left, top).of_size(width, height), BOX_COLOR);
    }
    if width > 2 && height > 2 {
        draw_hollow_rect_mut(
            &mut annotated,
            Rect::at(left + 1, top + 1).of_size(width - 2, height - 2),
            BOX_COLOR,
        );
    }
    draw_filled_circle_mut(&mut annotated, (x, y), CENTER_RADIUS, CENTER_COLOR);

    annotated
}

/// Annotate and write the result as an image file
pub fn save_annotated(
    frame: &RgbImage,
    x: i32,
    y: i32,
    size: (u32, u32),
    path: impl AsRef<Path>,
) -> LocatorResult<()> {
    let path = path.as_ref();
    let annotated = annotate_detection(frame, x, y, size.0, size.1);
    annotated.save(path).map_err(|source| LocatorError::ImageWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("🖍️ Annotated frame saved to {}", path.display());
    Ok(())
}

/// Crop a region of `frame` to use as a reference template
pub fn extract_template(
    frame: &RgbImage,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> LocatorResult<RgbImage> {
    let (frame_width, frame_height) = frame.dimensions();
    let fits = width > 0
        && height > 0
        && x.checked_add(width).is_some_and(|right| right <= frame_width)
        && y.checked_add(height).is_some_and(|bottom| bottom <= frame_height);
    if !fits {
        return Err(LocatorError::RegionOutOfBounds {
            x,
            y,
            width,
            height,
            frame_width,
            frame_height,
        });
    }

    Ok(imageops::crop_imm(frame, x, y, width, height).to_image())
}

/// Crop and save a template region
pub fn save_template(
    frame: &RgbImage,
    region: (u32, u32, u32, u32),
    path: impl AsRef<Path>,
) -> LocatorResult<()> {
    let path = path.as_ref();
    let (x, y, width, height) = region;
    let template = extract_template(frame, x, y, width, height)?;
    template.save(path).map_err(|source| LocatorError::ImageWrite {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "💾 Template {}x{} from ({}, {}) saved to {}",
        width,
        height,
        x,
        y,
        path.display()
    );
    Ok(())
}
