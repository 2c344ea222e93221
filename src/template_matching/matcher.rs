/// Template matching implementation
///
/// Scale-sweep search using zero-mean normalized cross-correlation.
/// Rendered icon size depends on desktop settings, so the reference is
/// resized through a list of scale factors and the best peak wins.
use super::reference::ReferenceTemplate;
use super::types::MatchResult;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::find_extremes;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::borrow::Cow;
use std::sync::Arc;

/// Scale factors tried by default
pub const DEFAULT_SCALE_FACTORS: [f32; 4] = [0.8, 1.0, 1.2, 1.5];

/// Wider sweep for desktops with unusual icon sizes
pub const WIDE_SCALE_FACTORS: [f32; 12] = [
    0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.25, 1.5, 1.75, 2.0, 2.5,
];

/// Windows whose pixel variance is below this carry no structure to correlate
const FLAT_EPSILON: f64 = 1e-6;

/// Correlation surface, one f32 score per window position
pub type CorrelationSurface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Scale-sweep matcher for the reference icon
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    threshold: f32,
    scale_factors: Vec<f32>,
}

impl TemplateMatcher {
    pub fn new(threshold: f32, scale_factors: Vec<f32>) -> Self {
        Self {
            threshold,
            scale_factors,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn scale_factors(&self) -> &[f32] {
        &self.scale_factors
    }

    /// Find the reference in a grayscale frame
    ///
    /// The best peak across scales is tracked with a strict greater-than, so
    /// the earliest scale keeps a tie. An anchor is produced only when the
    /// peak reaches the threshold; otherwise the sub-threshold confidence is
    /// still reported for diagnostics.
    pub fn find(&self, frame: &GrayImage, reference: &ReferenceTemplate) -> MatchResult {
        let mut result = MatchResult::none();
        let mut plan: Option<CorrelationPlan> = None;

        for &scale in &self.scale_factors {
            let Some(scaled) = scale_reference(reference.pixels(), scale) else {
                log::debug!("⚠️ Skipping scale {:.2}: reference collapses to zero size", scale);
                continue;
            };

            if scaled.width() > frame.width() || scaled.height() > frame.height() {
                log::debug!(
                    "⚠️ Skipping scale {:.2}: {}x{} > frame {}x{}",
                    scale,
                    scaled.width(),
                    scaled.height(),
                    frame.width(),
                    frame.height()
                );
                continue;
            }

            // Frame spectrum is shared by every scale that fits
            let correlation = plan.get_or_insert_with(|| CorrelationPlan::new(frame));
            let surface = correlation.surface(&scaled);
            let extremes = find_extremes(&surface);
            log::debug!(
                "🔍 Scale {:.2} ({}x{}): peak {:.4} at {:?}",
                scale,
                scaled.width(),
                scaled.height(),
                extremes.max_value,
                extremes.max_value_location
            );

            if extremes.max_value > result.confidence {
                result.confidence = extremes.max_value;
                result.scale = scale;
                result.location = Some(extremes.max_value_location);
                result.matched_size = (scaled.width(), scaled.height());
            }
        }

        if let Some((x, y)) = result.location
            && result.confidence >= self.threshold
        {
            let (w, h) = result.matched_size;
            result.anchor = Some(((x + w / 2) as i32, (y + h / 2) as i32));
        }

        result
    }
}

/// Resize the reference by `scale`, truncating the target dimensions.
/// Returns `None` when either dimension would be zero.
fn scale_reference(reference: &GrayImage, scale: f32) -> Option<Cow<'_, GrayImage>> {
    if (scale - 1.0).abs() <= f32::EPSILON {
        return Some(Cow::Borrowed(reference));
    }

    let width = (reference.width() as f32 * scale) as u32;
    let height = (reference.height() as f32 * scale) as u32;
    if width == 0 || height == 0 {
        return None;
    }

    Some(Cow::Owned(imageops::resize(
        reference,
        width,
        height,
        FilterType::Triangle,
    )))
}

/// Zero-mean normalized cross-correlation of `template` over every window of
/// `image`. The template must fit inside the image.
///
/// Scores are clamped to 0.0-1.0; flat windows and flat templates score 0.
pub fn correlation_surface(image: &GrayImage, template: &GrayImage) -> CorrelationSurface {
    CorrelationPlan::new(image).surface(template)
}

/// FFT correlation against one frame.
///
/// Pixels are laid out row-major with the frame width as stride, so for every
/// valid window offset the circular correlation never wraps: the furthest
/// product index is `width * height - 1`.
struct CorrelationPlan {
    width: u32,
    height: u32,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    frame_spectrum: Vec<Complex<f64>>,
    table: SummedAreaTable,
}

impl CorrelationPlan {
    fn new(frame: &GrayImage) -> Self {
        let (width, height) = frame.dimensions();
        let len = width as usize * height as usize;
        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);

        // Centering the frame keeps the spectrum small; the zero-mean
        // template makes the correlation independent of that offset
        let mean = frame.pixels().map(|p| p[0] as f64).sum::<f64>() / len.max(1) as f64;
        let mut frame_spectrum: Vec<Complex<f64>> = frame
            .pixels()
            .map(|p| Complex::new(p[0] as f64 - mean, 0.0))
            .collect();
        forward.process(&mut frame_spectrum);

        Self {
            width,
            height,
            forward,
            inverse,
            frame_spectrum,
            table: SummedAreaTable::new(frame),
        }
    }

    fn surface(&self, template: &GrayImage) -> CorrelationSurface {
        let (template_width, template_height) = template.dimensions();
        let out_width = self.width - template_width + 1;
        let out_height = self.height - template_height + 1;
        let mut surface = CorrelationSurface::new(out_width, out_height);

        let n = (template_width * template_height) as u64;
        let template_mean = template.pixels().map(|p| p[0] as f64).sum::<f64>() / n as f64;
        let template_norm = template
            .pixels()
            .map(|p| (p[0] as f64 - template_mean).powi(2))
            .sum::<f64>()
            .sqrt();
        if template_norm < FLAT_EPSILON {
            return surface;
        }

        let stride = self.width as usize;
        let mut buffer = vec![Complex::new(0.0, 0.0); self.frame_spectrum.len()];
        for (x, y, pixel) in template.enumerate_pixels() {
            buffer[y as usize * stride + x as usize] =
                Complex::new(pixel[0] as f64 - template_mean, 0.0);
        }
        self.forward.process(&mut buffer);
        for (value, frame) in buffer.iter_mut().zip(&self.frame_spectrum) {
            *value = *frame * value.conj();
        }
        self.inverse.process(&mut buffer);
        let unnormalized = buffer.len() as f64;

        for y in 0..out_height {
            for x in 0..out_width {
                let (sum, sum_sq) = self.table.window(x, y, template_width, template_height);
                // n * variance, exact in integers
                let spread =
                    (n as u128 * sum_sq as u128).saturating_sub(sum as u128 * sum as u128);
                let window_norm = (spread as f64 / n as f64).sqrt();
                if window_norm < FLAT_EPSILON {
                    continue;
                }

                let cross = buffer[y as usize * stride + x as usize].re / unnormalized;
                let score = cross / (template_norm * window_norm);
                surface.put_pixel(x, y, Luma([score.clamp(0.0, 1.0) as f32]));
            }
        }

        surface
    }
}

/// Inclusive prefix sums of pixel values and squared values
struct SummedAreaTable {
    width: usize,
    sums: Vec<u64>,
    squares: Vec<u64>,
}

impl SummedAreaTable {
    fn new(image: &GrayImage) -> Self {
        let width = image.width() as usize + 1;
        let height = image.height() as usize + 1;
        let mut sums = vec![0u64; width * height];
        let mut squares = vec![0u64; width * height];

        for (x, y, pixel) in image.enumerate_pixels() {
            let (x, y) = (x as usize + 1, y as usize + 1);
            let v = pixel[0] as u64;
            let idx = y * width + x;
            sums[idx] = v + sums[idx - 1] + sums[idx - width] - sums[idx - width - 1];
            squares[idx] =
                v * v + squares[idx - 1] + squares[idx - width] - squares[idx - width - 1];
        }

        Self {
            width,
            sums,
            squares,
        }
    }

    /// (sum, sum of squares) over the `w`x`h` window at (`x`, `y`)
    fn window(&self, x: u32, y: u32, w: u32, h: u32) -> (u64, u64) {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        let at = |table: &[u64], x: usize, y: usize| table[y * self.width + x];
        let sum = at(&self.sums, x1, y1) + at(&self.sums, x0, y0)
            - at(&self.sums, x0, y1)
            - at(&self.sums, x1, y0);
        let squares = at(&self.squares, x1, y1) + at(&self.squares, x0, y0)
            - at(&self.squares, x0, y1)
            - at(&self.squares, x1, y0);
        (sum, squares)
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new(0.7, DEFAULT_SCALE_FACTORS.to_vec())
    }
}
