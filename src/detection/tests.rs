//! Tests for the full detection pipeline

use crate::capture::ScreenCapture;
use crate::detection::{
    Detection, DetectionMethod, DetectorConfig, IconDetector, Sleeper, create_template_only_config,
    create_wide_scale_config,
};
use crate::error::{LocatorError, LocatorResult};
use crate::ocr::{BoundingBox, OcrEngine, OcrError, OcrToken, PageSegMode, TextExtractor};
use crate::template_matching::ReferenceTemplate;
use crate::test_support::{noise_gray, paste, to_rgb};
use image::{GrayImage, RgbImage};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// OCR engine that replays canned responses, then reads nothing
struct ScriptedEngine {
    responses: RefCell<VecDeque<Result<Vec<OcrToken>, OcrError>>>,
    calls: Rc<Cell<u32>>,
}

impl ScriptedEngine {
    fn new(responses: Vec<Result<Vec<OcrToken>, OcrError>>) -> (Self, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let engine = Self {
            responses: RefCell::new(responses.into()),
            calls: Rc::clone(&calls),
        };
        (engine, calls)
    }
}

impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn recognize(&self, _image: &GrayImage, _mode: PageSegMode) -> Result<Vec<OcrToken>, OcrError> {
        self.calls.set(self.calls.get() + 1);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

struct RecordingSleeper {
    naps: Rc<RefCell<Vec<Duration>>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.naps.borrow_mut().push(duration);
    }
}

fn caption(text: &str, left: i32, top: i32, conf: f32) -> OcrToken {
    OcrToken::new(
        text,
        BoundingBox {
            left,
            top,
            width: 60,
            height: 14,
        },
        conf,
    )
}

fn unavailable() -> OcrError {
    OcrError::EngineUnavailable {
        program: "tesseract".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
    }
}

fn noise_capture(seed: u64) -> Box<dyn ScreenCapture> {
    Box::new(move || -> LocatorResult<RgbImage> { Ok(to_rgb(&noise_gray(160, 120, seed))) })
}

fn detector(
    config: DetectorConfig,
    template: Option<ReferenceTemplate>,
    engine: ScriptedEngine,
) -> IconDetector {
    let extractor = TextExtractor::new(Box::new(engine), PageSegMode::SingleBlock);
    IconDetector::from_parts(config, template, extractor, noise_capture(1))
}

#[test]
fn test_pasted_template_round_trip() {
    let icon = noise_gray(24, 24, 42);
    let mut screen = noise_gray(200, 150, 7);
    paste(&mut screen, &icon, 120, 70);
    let frame = to_rgb(&screen);

    let (engine, ocr_calls) = ScriptedEngine::new(vec![]);
    let detector = detector(
        DetectorConfig::default(),
        Some(ReferenceTemplate::from_gray(icon)),
        engine,
    );

    let detection = detector.detect_icon_position(Some(&frame), true);
    assert_eq!(detection.position(), Some((132, 82)));
    assert!(detection.confidence >= 0.99, "got {}", detection.confidence);
    assert_eq!(detection.method, Some(DetectionMethod::TemplateMatch));
    assert_eq!(detection.matched_size, Some((24, 24)));
    assert_eq!(ocr_calls.get(), 0, "OCR must not run after a template hit");
}

#[test]
fn test_wide_profile_locates_double_size_icon() {
    let icon = noise_gray(24, 24, 43);
    let rendered = image::imageops::resize(&icon, 48, 48, image::imageops::FilterType::Triangle);
    let mut screen = noise_gray(200, 150, 11);
    paste(&mut screen, &rendered, 40, 50);
    let frame = to_rgb(&screen);

    let (engine, ocr_calls) = ScriptedEngine::new(vec![]);
    let detector = detector(
        create_wide_scale_config(),
        Some(ReferenceTemplate::from_gray(icon)),
        engine,
    );

    let detection = detector.detect_icon_position(Some(&frame), true);
    let (x, y) = detection.position().expect("template hit");
    assert!((x - 64).abs() <= 1, "x = {x}");
    assert!((y - 74).abs() <= 1, "y = {y}");
    assert_eq!(detection.method, Some(DetectionMethod::TemplateMatch));
    assert_eq!(detection.matched_size, Some((48, 48)));
    assert_eq!(ocr_calls.get(), 0);
}

#[test]
fn test_missing_template_falls_back_to_ocr() {
    let (engine, ocr_calls) = ScriptedEngine::new(vec![Ok(vec![
        caption("Recycle", 20, 200, 95.0),
        caption("Notepad", 300, 400, 80.0),
    ])]);
    let detector = detector(DetectorConfig::default(), None, engine);
    assert!(!detector.has_template());

    let detection = detector.detect_icon_position(None, true);
    // x = 300 + 60/2, y = 400 - 40/2
    assert_eq!(detection.position(), Some((330, 380)));
    assert_eq!(detection.method, Some(DetectionMethod::Ocr));
    assert_eq!(detection.matched_size, None);
    assert!((detection.confidence - 0.9).abs() < 1e-6);
    assert_eq!(ocr_calls.get(), 1);
}

#[test]
fn test_sub_threshold_template_falls_back_to_ocr() {
    let icon = noise_gray(24, 24, 42);
    let (engine, ocr_calls) = ScriptedEngine::new(vec![Ok(vec![caption("Notepad", 50, 90, 60.0)])]);
    let detector = detector(
        DetectorConfig::default(),
        Some(ReferenceTemplate::from_gray(icon)),
        engine,
    );

    let detection = detector.detect_icon_position(None, true);
    assert_eq!(detection.method, Some(DetectionMethod::Ocr));
    assert_eq!(ocr_calls.get(), 1);
}

#[test]
fn test_disabled_fallback_reports_template_confidence() {
    let icon = noise_gray(24, 24, 42);
    let (engine, ocr_calls) = ScriptedEngine::new(vec![Ok(vec![caption("Notepad", 50, 90, 60.0)])]);
    let detector = detector(
        create_template_only_config(),
        Some(ReferenceTemplate::from_gray(icon)),
        engine,
    );

    let detection = detector.detect_icon_position(None, false);
    assert!(!detection.is_found());
    assert!(detection.confidence > 0.0 && detection.confidence < 0.7);
    assert_eq!(ocr_calls.get(), 0);
}

#[test]
fn test_unavailable_ocr_is_zero_candidates() {
    let (engine, ocr_calls) = ScriptedEngine::new(vec![Err(unavailable())]);
    let detector = detector(DetectorConfig::default(), None, engine);

    let detection = detector.detect_icon_position(None, true);
    assert_eq!(detection, Detection::not_found(0.0));
    assert_eq!(ocr_calls.get(), 1);
}

#[test]
fn test_capture_failure_is_absorbed() {
    let (engine, ocr_calls) = ScriptedEngine::new(vec![]);
    let extractor = TextExtractor::new(Box::new(engine), PageSegMode::SingleBlock);
    let capture = Box::new(|| -> LocatorResult<RgbImage> {
        Err(LocatorError::CaptureFailed {
            description: "display asleep".to_string(),
        })
    });
    let detector = IconDetector::from_parts(DetectorConfig::default(), None, extractor, capture);

    assert_eq!(detector.detect_icon_position(None, true), Detection::not_found(0.0));
    assert_eq!(ocr_calls.get(), 0);
}

#[test]
fn test_retry_fails_twice_then_succeeds() {
    let (engine, ocr_calls) = ScriptedEngine::new(vec![
        Ok(vec![]),
        Err(unavailable()),
        Ok(vec![caption("Notepad", 300, 400, 90.0)]),
    ]);
    let naps = Rc::new(RefCell::new(Vec::new()));
    let detector = detector(DetectorConfig::default(), None, engine).with_sleeper(Box::new(
        RecordingSleeper {
            naps: Rc::clone(&naps),
        },
    ));

    let delay = Duration::from_millis(1500);
    let detection = detector.detect_with_retry(3, delay);

    assert_eq!(detection.position(), Some((330, 380)));
    assert_eq!(ocr_calls.get(), 3);
    assert_eq!(*naps.borrow(), vec![delay, delay]);
}

#[test]
fn test_retry_exhaustion() {
    let (engine, ocr_calls) = ScriptedEngine::new(vec![]);
    let naps = Rc::new(RefCell::new(Vec::new()));
    let detector = detector(DetectorConfig::default(), None, engine).with_sleeper(Box::new(
        RecordingSleeper {
            naps: Rc::clone(&naps),
        },
    ));

    let detection = detector.detect_with_retry(4, Duration::from_millis(10));
    assert_eq!(detection, Detection::not_found(0.0));
    assert_eq!(ocr_calls.get(), 4);
    assert_eq!(naps.borrow().len(), 3);
}

#[test]
fn test_validation_gate() {
    let (engine, _) = ScriptedEngine::new(vec![]);
    let detector = detector(DetectorConfig::default(), None, engine);

    assert!(detector.validate_icon_detection(Some(960), Some(540), 0.8));
    assert!(detector.validate_icon_detection(Some(0), Some(0), 0.7));
    assert!(detector.validate_icon_detection(Some(1920), Some(1080), 0.7));

    assert!(!detector.validate_icon_detection(None, Some(540), 0.8));
    assert!(!detector.validate_icon_detection(Some(960), None, 0.8));
    assert!(!detector.validate_icon_detection(Some(960), Some(540), 0.5));
    assert!(!detector.validate_icon_detection(Some(3000), Some(540), 0.8));
    assert!(!detector.validate_icon_detection(Some(960), Some(1081), 0.8));
    assert!(!detector.validate_icon_detection(Some(-1), Some(540), 0.8));
    assert!(!detector.validate_icon_detection(Some(1), Some(1), f32::NAN));
}

#[test]
fn test_validation_uses_configured_bounds() {
    let (engine, _) = ScriptedEngine::new(vec![]);
    let config = DetectorConfig {
        screen_width: 2560,
        screen_height: 1440,
        confidence_threshold: 0.85,
        ..DetectorConfig::default()
    };
    let detector = detector(config, None, engine);

    assert!(detector.validate_icon_detection(Some(2500), Some(1400), 0.9));
    assert!(!detector.validate_icon_detection(Some(2500), Some(1400), 0.8));
}

#[test]
fn test_locate_rejects_out_of_bounds_anchor() {
    // Caption at the very top puts the derived icon center above the screen
    let (engine, _) = ScriptedEngine::new(vec![Ok(vec![caption("Notepad", 300, 5, 90.0)])]);
    let config = DetectorConfig {
        max_attempts: 1,
        ..DetectorConfig::default()
    };
    let detector = detector(config, None, engine);

    assert!(detector.locate().is_none());
}

#[test]
fn test_locate_returns_validated_location() {
    let (engine, _) = ScriptedEngine::new(vec![Ok(vec![caption("Notepad", 300, 400, 90.0)])]);
    let config = DetectorConfig {
        max_attempts: 1,
        ..DetectorConfig::default()
    };
    let detector = detector(config, None, engine);

    let location = detector.locate().expect("validated location");
    assert_eq!((location.x, location.y), (330, 380));
    assert_eq!(location.method, DetectionMethod::Ocr);
    assert_eq!(location.matched_size, None);
}

#[test]
fn test_low_scoring_ocr_hit_fails_validation() {
    // Buried substring with poor OCR confidence: found, but below threshold
    let (engine, _) = ScriptedEngine::new(vec![Ok(vec![caption("MyNotepadTool", 300, 400, 10.0)])]);
    let config = DetectorConfig {
        max_attempts: 1,
        ..DetectorConfig::default()
    };
    let detector = detector(config, None, engine);

    let detection = detector.detect_icon_position(None, true);
    assert!(detection.is_found());
    assert!(detection.confidence < 0.7);
    assert!(detector.locate().is_none());
}

#[test]
fn test_new_with_missing_template_is_ocr_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = DetectorConfig {
        template_path: dir.path().join("notepad_icon.png"),
        ..DetectorConfig::default()
    };
    let detector = IconDetector::new(config, noise_capture(2)).unwrap();
    assert!(!detector.has_template());
}

#[test]
fn test_new_with_corrupt_template_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notepad_icon.png");
    std::fs::write(&path, b"\x89PNG garbage").unwrap();
    let config = DetectorConfig {
        template_path: path,
        ..DetectorConfig::default()
    };

    match IconDetector::new(config, noise_capture(2)) {
        Err(err) => {
            assert!(matches!(err, LocatorError::TemplateLoad { .. }));
            assert!(err.is_setup_defect());
        }
        Ok(_) => panic!("corrupt template must fail construction"),
    }
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = DetectorConfig {
        confidence_threshold: -0.1,
        ..DetectorConfig::default()
    };
    assert!(matches!(
        IconDetector::new(config, noise_capture(2)),
        Err(LocatorError::InvalidConfig { .. })
    ));
}

#[test]
fn test_detector_keeps_config_and_scales() {
    let (engine, _) = ScriptedEngine::new(vec![]);
    let detector = detector(
        create_wide_scale_config(),
        Some(ReferenceTemplate::from_gray(noise_gray(8, 8, 5))),
        engine,
    );
    assert_eq!(detector.config(), &create_wide_scale_config());
    assert_eq!(detector.config().scale_factors.len(), 12);
    assert!(detector.has_template());
}
