use std::path::PathBuf;

/// Pixel region `x,y,width,height` for template extraction
pub type Region = (u32, u32, u32, u32);

#[derive(Debug, PartialEq)]
pub struct Args {
    pub screenshot: PathBuf,
    pub template: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub threshold: Option<f32>,
    pub wide_scales: bool,
    pub no_ocr: bool,
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
    pub annotate: Option<PathBuf>,
    pub extract: Option<Region>,
    pub debug_mode: bool,
}

/// What the command line asked for
#[derive(Debug, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

impl Args {
    /// Parse `argv` without the program name
    pub fn parse_from<I, S>(argv: I) -> Result<Command, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut screenshot: Option<PathBuf> = None;
        let mut args = Args {
            screenshot: PathBuf::new(),
            template: None,
            config: None,
            threshold: None,
            wide_scales: false,
            no_ocr: false,
            attempts: None,
            delay_ms: None,
            annotate: None,
            extract: None,
            debug_mode: false,
        };

        for arg in argv {
            let arg = arg.as_ref();
            if arg == "--help" || arg == "-h" {
                return Ok(Command::Help);
            } else if arg == "--version" || arg == "-v" {
                return Ok(Command::Version);
            } else if arg == "--debug" {
                args.debug_mode = true;
            } else if arg == "--wide-scales" {
                args.wide_scales = true;
            } else if arg == "--no-ocr" {
                args.no_ocr = true;
            } else if let Some(val) = arg.strip_prefix("--screenshot=") {
                screenshot = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--template=") {
                args.template = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--config=") {
                args.config = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--annotate=") {
                args.annotate = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                let threshold = val
                    .parse::<f32>()
                    .map_err(|_| format!("Invalid threshold value: {}", val))?;
                args.threshold = Some(threshold);
            } else if let Some(val) = arg.strip_prefix("--attempts=") {
                let attempts = val
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid attempts value: {}", val))?;
                args.attempts = Some(attempts);
            } else if let Some(val) = arg.strip_prefix("--delay-ms=") {
                let delay = val
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid delay value: {}", val))?;
                args.delay_ms = Some(delay);
            } else if let Some(val) = arg.strip_prefix("--extract=") {
                args.extract = Some(parse_region(val)?);
            } else {
                return Err(format!("Unknown argument: {}", arg));
            }
        }

        args.screenshot = screenshot.ok_or_else(|| "Missing required --screenshot=<path>".to_string())?;
        Ok(Command::Run(args))
    }
}

fn parse_region(val: &str) -> Result<Region, String> {
    let parts: Vec<u32> = val
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("Invalid region '{}', expected x,y,width,height", val))?;

    match parts.as_slice() {
        [x, y, w, h] => Ok((*x, *y, *w, *h)),
        _ => Err(format!("Invalid region '{}', expected x,y,width,height", val)),
    }
}

pub fn print_help() {
    println!("🔎 Icon Locator");
    println!();
    println!("USAGE:");
    println!("    icon-locator --screenshot=<path> [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --screenshot=PATH   Frame to search (re-read on every attempt)");
    println!("    --template=PATH     Reference icon (default: assets/notepad_icon.png)");
    println!("    --config=PATH       JSON detector config");
    println!("    --threshold=F       Confidence threshold in [0, 1]");
    println!("    --wide-scales       Sweep the wide 0.5x-2.5x scale range");
    println!("    --no-ocr            Disable the OCR caption fallback");
    println!("    --attempts=N        Detection attempts before giving up");
    println!("    --delay-ms=N        Pause between attempts");
    println!("    --annotate=PATH     Save the frame with the detection marked");
    println!("    --extract=X,Y,W,H   Save that region of the frame as the template and exit");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    icon-locator --screenshot=desktop.png");
    println!("    icon-locator --screenshot=desktop.png --wide-scales --annotate=hit.png");
    println!("    icon-locator --screenshot=desktop.png --extract=24,300,48,48");
}
