mod args;

use args::{Args, Command, print_help};
use icon_locator::annotate::{DEFAULT_MARKER_SIZE, save_annotated, save_template};
use icon_locator::capture::{ImageFileCapture, ScreenCapture};
use icon_locator::detection::{DetectorConfig, create_wide_scale_config};
use icon_locator::error::LocatorResult;
use icon_locator::template_matching::WIDE_SCALE_FACTORS;
use icon_locator::IconDetector;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::parse_from(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!(
                "Icon Locator v{} (built {})",
                env!("APP_VERSION_DISPLAY"),
                env!("APP_BUILD_YEAR")
            );
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("❌ {}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> LocatorResult<DetectorConfig> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None if args.wide_scales => create_wide_scale_config(),
        None => DetectorConfig::default(),
    };

    if args.wide_scales {
        config.scale_factors = WIDE_SCALE_FACTORS.to_vec();
    }
    if let Some(template) = &args.template {
        config.template_path = template.clone();
    }
    if let Some(threshold) = args.threshold {
        config.confidence_threshold = threshold;
    }
    if args.no_ocr {
        config.use_ocr_fallback = false;
    }
    if let Some(attempts) = args.attempts {
        config.max_attempts = attempts;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.retry_delay_ms = delay_ms;
    }
    Ok(config)
}

/// Ok(true) when the icon was located and validated
fn run(args: &Args) -> LocatorResult<bool> {
    let config = build_config(args)?;
    let capture = ImageFileCapture::new(&args.screenshot);

    if let Some(region) = args.extract {
        let frame = capture.capture_frame()?;
        save_template(&frame, region, &config.template_path)?;
        return Ok(true);
    }

    let detector = IconDetector::new(config, Box::new(capture.clone()))?;
    log::debug!("Detector config: {:?}", detector.config());

    let Some(location) = detector.locate() else {
        println!("❌ Icon not found");
        return Ok(false);
    };
    println!(
        "✅ Icon found at ({}, {}) via {} with confidence {:.2}",
        location.x, location.y, location.method, location.confidence
    );

    if let Some(out) = &args.annotate {
        let size = location
            .matched_size
            .unwrap_or((DEFAULT_MARKER_SIZE, DEFAULT_MARKER_SIZE));
        let frame = capture.capture_frame()?;
        save_annotated(&frame, location.x, location.y, size, out)?;
    }

    Ok(true)
}
