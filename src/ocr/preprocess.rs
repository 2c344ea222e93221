use image::{GrayImage, Luma, RgbImage, imageops};
use imageproc::contrast::otsu_level;
use imageproc::filter::median_filter;

/// Tile grid for adaptive equalization
const CLAHE_TILES: u32 = 8;
/// Histogram clip limit, as a multiple of the mean bin height
const CLAHE_CLIP_LIMIT: f32 = 2.0;

/// Prepares a screenshot for OCR.
///
/// Pipeline: grayscale → 3x3 median denoise → contrast-limited adaptive
/// histogram equalization → Otsu binarization → dark-on-light polarity.
pub fn prepare_for_ocr(frame: &RgbImage) -> GrayImage {
    let gray = imageops::grayscale(frame);
    let denoised = median_filter(&gray, 1, 1);
    let equalized = adaptive_equalize(&denoised, CLAHE_TILES, CLAHE_TILES, CLAHE_CLIP_LIMIT);
    let mut binary = binarize_otsu(&equalized);
    ensure_dark_on_light(&mut binary);
    binary
}

/// Contrast-limited adaptive histogram equalization.
///
/// Each tile gets a clipped-histogram mapping; pixels blend the mappings of
/// the four nearest tile centers bilinearly so tile seams do not show.
pub fn adaptive_equalize(
    image: &GrayImage,
    tiles_x: u32,
    tiles_y: u32,
    clip_limit: f32,
) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let tile_w = width.div_ceil(tiles_x.clamp(1, width));
    let tile_h = height.div_ceil(tiles_y.clamp(1, height));
    let tiles_x = width.div_ceil(tile_w);
    let tiles_y = height.div_ceil(tile_h);

    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            luts.push(tile_mapping(image, x0, y0, x1, y1, clip_limit));
        }
    }

    let lut = |tx: u32, ty: u32| &luts[(ty * tiles_x + tx) as usize];

    GrayImage::from_fn(width, height, |x, y| {
        let (tx0, tx1, ax) = neighbours(x, tile_w, tiles_x);
        let (ty0, ty1, ay) = neighbours(y, tile_h, tiles_y);
        let v = image.get_pixel(x, y)[0] as usize;

        let top = lut(tx0, ty0)[v] as f32 * (1.0 - ax) + lut(tx1, ty0)[v] as f32 * ax;
        let bottom = lut(tx0, ty1)[v] as f32 * (1.0 - ax) + lut(tx1, ty1)[v] as f32 * ax;
        let value = top * (1.0 - ay) + bottom * ay;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Tiles whose centers bracket `pos` along one axis, plus the blend weight
fn neighbours(pos: u32, tile_size: u32, tiles: u32) -> (u32, u32, f32) {
    let f = (pos as f32 + 0.5) / tile_size as f32 - 0.5;
    let last = tiles as i64 - 1;
    let t0 = (f.floor() as i64).clamp(0, last);
    let t1 = (t0 + 1).min(last);
    let weight = if t1 == t0 { 0.0 } else { (f - t0 as f32).clamp(0.0, 1.0) };
    (t0 as u32, t1 as u32, weight)
}

/// Clipped histogram equalization mapping for one tile
fn tile_mapping(image: &GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, clip_limit: f32) -> [u8; 256] {
    let mut histogram = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            histogram[image.get_pixel(x, y)[0] as usize] += 1;
        }
    }
    let count = (x1 - x0) * (y1 - y0);

    let limit = ((clip_limit * count as f32 / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for bin in histogram.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    let share = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in histogram.iter_mut().enumerate() {
        *bin += share + u32::from(i < remainder);
    }

    let mut mapping = [0u8; 256];
    let scale = 255.0 / count as f32;
    let mut cdf = 0u32;
    for (value, bin) in histogram.iter().enumerate() {
        cdf += bin;
        mapping[value] = (cdf as f32 * scale).round().min(255.0) as u8;
    }
    mapping
}

/// Global threshold at the Otsu level; pixels above it become white
pub fn binarize_otsu(image: &GrayImage) -> GrayImage {
    let level = otsu_level(image);
    log::trace!("Otsu level {}", level);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[0] > level {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Tesseract reads dark glyphs on a light page best; invert mostly-dark images
fn ensure_dark_on_light(binary: &mut GrayImage) {
    let total = binary.width() as u64 * binary.height() as u64;
    let dark = binary.pixels().filter(|p| p[0] == 0).count() as u64;
    if dark * 2 > total {
        for p in binary.pixels_mut() {
            p[0] = 255 - p[0];
        }
    }
}
