use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::classify::domain::classifier::{EmotionClassifier, Label, LandmarkPoints};
use crate::preprocess::normalizer::FrameNormalizer;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// One classification pass over one frame: the three correlated sequences.
type Snapshot = (Vec<Label>, Vec<BoundingBox>, Vec<LandmarkPoints>);
type ClassifyResult = Result<Snapshot, String>;

/// Decorator that runs the wrapped classifier on a worker thread, so a slow
/// classifier no longer stalls the render tick.
///
/// Frames go to the worker through a single-slot mailbox: a submission while
/// the worker is busy is dropped, never queued. The worker computes all three
/// operations from the same frame and publishes them as one snapshot, so the
/// getters stay positionally correlated. `classify` drains published results
/// to the latest snapshot and all three operations serve from it; until the
/// first snapshot arrives the decorator reports no detections.
///
/// Call pattern per tick is `classify`, `extract_face_rectangles`,
/// `extract_landmark_points` (the loop's order): `classify` refreshes the
/// snapshot and `extract_face_rectangles` submits its color frame for a
/// future snapshot. The worker normalizes internally; the frame `classify`
/// receives is not forwarded.
pub struct BackgroundClassifier {
    frame_tx: Option<Sender<Frame>>,
    result_rx: Receiver<ClassifyResult>,
    worker: Option<JoinHandle<()>>,
    current: Option<Snapshot>,
}

impl BackgroundClassifier {
    pub fn new(inner: Box<dyn EmotionClassifier>) -> Self {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Frame>(1);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<ClassifyResult>();

        let worker = std::thread::spawn(move || {
            let normalizer = FrameNormalizer::new();
            let mut inner = inner;
            for frame in frame_rx {
                let result = classify_frame(inner.as_mut(), &normalizer, &frame);
                if result_tx.send(result).is_err() {
                    break;
                }
            }
        });

        Self {
            frame_tx: Some(frame_tx),
            result_rx,
            worker: Some(worker),
            current: None,
        }
    }

    fn drain_to_latest(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        while let Ok(result) = self.result_rx.try_recv() {
            self.current = Some(result?);
        }
        Ok(())
    }
}

impl EmotionClassifier for BackgroundClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Vec<Label>, Box<dyn std::error::Error>> {
        self.drain_to_latest()?;
        Ok(self
            .current
            .as_ref()
            .map(|(labels, _, _)| labels.clone())
            .unwrap_or_default())
    }

    fn extract_face_rectangles(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        if let Some(tx) = &self.frame_tx {
            // Busy worker: drop the submission, keep serving the snapshot.
            let _ = tx.try_send(frame.clone());
        }
        Ok(self
            .current
            .as_ref()
            .map(|(_, rectangles, _)| rectangles.clone())
            .unwrap_or_default())
    }

    fn extract_landmark_points(
        &mut self,
        _frame: &Frame,
    ) -> Result<Vec<LandmarkPoints>, Box<dyn std::error::Error>> {
        Ok(self
            .current
            .as_ref()
            .map(|(_, _, landmarks)| landmarks.clone())
            .unwrap_or_default())
    }
}

impl Drop for BackgroundClassifier {
    fn drop(&mut self) {
        self.frame_tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn classify_frame(
    inner: &mut dyn EmotionClassifier,
    normalizer: &FrameNormalizer,
    frame: &Frame,
) -> ClassifyResult {
    let gray = normalizer.normalize(frame);
    let labels = inner.classify(&gray).map_err(|e| e.to_string())?;
    let rectangles = inner
        .extract_face_rectangles(frame)
        .map_err(|e| e.to_string())?;
    let landmarks = inner
        .extract_landmark_points(frame)
        .map_err(|e| e.to_string())?;
    Ok((labels, rectangles, landmarks))
}
