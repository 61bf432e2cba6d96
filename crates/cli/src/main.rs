use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use moodcam_core::capture::domain::frame_display::FrameDisplay;
use moodcam_core::capture::domain::frame_source::{CaptureError, FrameSource};
use moodcam_core::capture::infrastructure::ffmpeg_source::FfmpegSource;
use moodcam_core::capture::infrastructure::image_dump_display::ImageDumpDisplay;
use moodcam_core::capture::infrastructure::image_sequence_source::ImageSequenceSource;
use moodcam_core::classify::domain::classifier::EmotionClassifier;
use moodcam_core::classify::infrastructure::background_classifier::BackgroundClassifier;
use moodcam_core::classify::infrastructure::static_classifier::StaticClassifier;
use moodcam_core::pipeline::clock::MonotonicClock;
use moodcam_core::pipeline::detection_loop::{DetectionLoop, LoopError, LoopOptions};
use moodcam_core::pipeline::loop_logger::StdoutLoopLogger;

/// Live emotion overlay over a video or image-sequence stream.
///
/// No trained models ship with this binary: it drives the capture and
/// overlay path with the bundled sentinel classifier. Real classifiers plug
/// in through the `EmotionClassifier` trait.
#[derive(Parser)]
#[command(name = "moodcam")]
struct Cli {
    /// Input video file or directory of image frames.
    input: PathBuf,

    /// Directory for annotated output frames.
    #[arg(long, default_value = "annotated")]
    output_dir: PathBuf,

    /// Target interval between re-classifications, in milliseconds.
    #[arg(long, default_value = "750")]
    period_ms: u64,

    /// Bounded wait of each key poll, in milliseconds.
    #[arg(long, default_value = "33")]
    tick_wait_ms: u64,

    /// Key that ends the loop.
    #[arg(long, default_value = "q")]
    quit_key: char,

    /// Stop after this many ticks (0 = run until the stream ends).
    #[arg(long, default_value = "0")]
    max_ticks: usize,

    /// Run the classifier on a background thread.
    #[arg(long)]
    background: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let source = open_source(&cli.input)?;
    let display = build_display(&cli);
    let classifier = build_classifier(&cli);

    let options = LoopOptions {
        period: Duration::from_millis(cli.period_ms),
        tick_wait: Duration::from_millis(cli.tick_wait_ms),
        quit_key: cli.quit_key,
        ..LoopOptions::default()
    };

    log::info!("Starting capture loop; press '{}' to exit", cli.quit_key);

    let mut detection = DetectionLoop::new(
        source,
        display,
        classifier,
        Box::new(StdoutLoopLogger::new()),
        Box::new(MonotonicClock),
        options,
    );

    match detection.run() {
        Ok(summary) => {
            log::info!(
                "Stopped after {} ticks ({} classifications)",
                summary.ticks,
                summary.classifications
            );
            Ok(())
        }
        Err(LoopError::Capture(CaptureError::EndOfStream)) => {
            log::info!(
                "Stream ended; annotated frames in {}",
                cli.output_dir.display()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if cli.period_ms == 0 {
        return Err("Re-classification period must be positive".into());
    }
    Ok(())
}

fn open_source(input: &Path) -> Result<Box<dyn FrameSource>, Box<dyn std::error::Error>> {
    if input.is_dir() {
        Ok(Box::new(ImageSequenceSource::open(input)?))
    } else {
        Ok(Box::new(FfmpegSource::open(input)?))
    }
}

fn build_display(cli: &Cli) -> Box<dyn FrameDisplay> {
    let display = ImageDumpDisplay::new(&cli.output_dir);
    if cli.max_ticks > 0 {
        Box::new(display.with_key_after(cli.max_ticks, cli.quit_key))
    } else {
        Box::new(display)
    }
}

fn build_classifier(cli: &Cli) -> Box<dyn EmotionClassifier> {
    let base: Box<dyn EmotionClassifier> = Box::new(StaticClassifier::no_faces());
    if cli.background {
        Box::new(BackgroundClassifier::new(base))
    } else {
        base
    }
}
