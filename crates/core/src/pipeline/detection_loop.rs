use std::time::{Duration, Instant};

use thiserror::Error;

use crate::capture::domain::frame_display::FrameDisplay;
use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::classify::domain::annotation::FaceAnnotation;
use crate::classify::domain::classifier::{EmotionClassifier, Label};
use crate::overlay::renderer;
use crate::pipeline::clock::Clock;
use crate::pipeline::loop_logger::LoopLogger;
use crate::preprocess::normalizer::FrameNormalizer;
use crate::shared::constants::{ACCENT, DEFAULT_WINDOW_NAME, WHITE};
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum LoopError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("classifier failed: {0}")]
    Classifier(String),
    #[error("display failed: {0}")]
    Display(String),
}

#[derive(Clone, Debug)]
pub struct LoopOptions {
    pub window_name: String,
    /// Bounded wait of each key poll; also paces the loop.
    pub tick_wait: Duration,
    pub quit_key: char,
    /// Target interval between re-classifications.
    pub period: Duration,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            window_name: DEFAULT_WINDOW_NAME.to_string(),
            tick_wait: Duration::from_millis(33),
            quit_key: 'q',
            period: Duration::from_millis(750),
        }
    }
}

/// Counters reported on clean exit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub ticks: u64,
    pub classifications: u64,
}

/// State retained across ticks, owned exclusively by the loop and reset only
/// at loop start.
struct LoopState {
    /// Ticks since the last classification; resets to 0 on due ticks.
    frame_counter: u64,
    last_classified_at: Instant,
    /// Annotations rendered every tick until the next classification
    /// replaces them (stale reuse keeps the overlay from flickering between
    /// expensive classifier calls, trading up to one period of positional
    /// lag).
    last_annotations: Vec<FaceAnnotation>,
    last_logged_labels: Vec<Label>,
}

/// The capture-classify-render loop.
///
/// Each tick: acquire a frame, decide whether a re-classification is due
/// (elapsed time since the last one, never an assumed capture rate), render
/// the current annotation set onto the frame, show it, and poll for the quit
/// key. Capture and display handles are released exactly once on every exit
/// path.
pub struct DetectionLoop {
    source: Box<dyn FrameSource>,
    display: Box<dyn FrameDisplay>,
    classifier: Box<dyn EmotionClassifier>,
    logger: Box<dyn LoopLogger>,
    clock: Box<dyn Clock>,
    normalizer: FrameNormalizer,
    options: LoopOptions,
}

impl DetectionLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        display: Box<dyn FrameDisplay>,
        classifier: Box<dyn EmotionClassifier>,
        logger: Box<dyn LoopLogger>,
        clock: Box<dyn Clock>,
        options: LoopOptions,
    ) -> Self {
        Self {
            source,
            display,
            classifier,
            logger,
            clock,
            normalizer: FrameNormalizer::new(),
            options,
        }
    }

    /// Runs until the quit key or a fatal error. The capture source and
    /// display are torn down on both paths.
    pub fn run(&mut self) -> Result<LoopSummary, LoopError> {
        let result = self.run_ticks();
        self.source.close();
        self.display.close_all();
        result
    }

    fn run_ticks(&mut self) -> Result<LoopSummary, LoopError> {
        let mut state = LoopState {
            frame_counter: 0,
            last_classified_at: self.clock.now(),
            last_annotations: Vec::new(),
            last_logged_labels: Vec::new(),
        };
        let mut summary = LoopSummary::default();

        loop {
            let mut frame = self.source.read_frame()?;
            summary.ticks += 1;
            state.frame_counter += 1;

            let now = self.clock.now();
            if now.duration_since(state.last_classified_at) >= self.options.period {
                log::debug!("classifying after {} ticks", state.frame_counter);
                state.frame_counter = 0;
                state.last_classified_at = now;
                self.classify_into(&frame, &mut state)?;
                summary.classifications += 1;
            }

            render_annotations(&state.last_annotations, &mut frame);
            self.log_label_changes(&mut state);

            self.display
                .show(&self.options.window_name, &frame)
                .map_err(|e| LoopError::Display(e.to_string()))?;

            if self.display.poll_key(self.options.tick_wait) == Some(self.options.quit_key) {
                self.logger.info("quit key received");
                return Ok(summary);
            }
        }
    }

    /// Runs the classifier's three extraction operations against the same
    /// frame and replaces the annotation set with their pairing.
    fn classify_into(&mut self, frame: &Frame, state: &mut LoopState) -> Result<(), LoopError> {
        let normalized = self.normalizer.normalize(frame);
        let labels = self
            .classifier
            .classify(&normalized)
            .map_err(classifier_err)?;
        let rectangles = self
            .classifier
            .extract_face_rectangles(frame)
            .map_err(classifier_err)?;
        let landmarks = self
            .classifier
            .extract_landmark_points(frame)
            .map_err(classifier_err)?;

        state.last_annotations = FaceAnnotation::pair(labels, rectangles, landmarks);
        Ok(())
    }

    fn log_label_changes(&mut self, state: &mut LoopState) {
        let labels: Vec<Label> = state
            .last_annotations
            .iter()
            .map(|a| a.label.clone())
            .collect();
        if labels != state.last_logged_labels {
            self.logger.labels_changed(&labels);
            state.last_logged_labels = labels;
        }
    }
}

/// Box, then landmarks, then label, so the label is never obscured.
fn render_annotations(annotations: &[FaceAnnotation], frame: &mut Frame) {
    for annotation in annotations {
        renderer::draw_box(&annotation.bounding_box, frame, ACCENT);
        renderer::draw_landmarks(&annotation.landmarks, frame, WHITE);
        renderer::write_label(
            annotation.bounding_box.x(),
            annotation.bounding_box.y(),
            &annotation.label,
            frame,
            ACCENT,
        );
    }
}

fn classifier_err(e: Box<dyn std::error::Error>) -> LoopError {
    LoopError::Classifier(e.to_string())
}
