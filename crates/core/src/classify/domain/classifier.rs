use crate::shared::bounding_box::BoundingBox;
use crate::shared::frame::Frame;

/// Emotion label for one detected face, or the no-face sentinel.
pub type Label = String;

/// Ordered landmark coordinates for one face. Empty means no landmarks found.
pub type LandmarkPoints = Vec<(i32, i32)>;

/// Domain interface for per-face emotion classification.
///
/// The three operations are computed from the same input frame and are
/// positionally correlated: the i-th label, i-th rectangle, and i-th landmark
/// set describe the same face. Callers pair them with
/// [`FaceAnnotation::pair`](super::annotation::FaceAnnotation::pair) and must
/// not mix results across frames.
///
/// `classify` receives the normalized single-channel frame; the extraction
/// operations receive the original color frame. Implementations may be
/// stateful, hence `&mut self`.
pub trait EmotionClassifier: Send {
    /// Predicts one emotion label per detected face, or the no-face sentinel
    /// once when zero faces are detected.
    fn classify(&mut self, frame: &Frame) -> Result<Vec<Label>, Box<dyn std::error::Error>>;

    fn extract_face_rectangles(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>>;

    fn extract_landmark_points(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<LandmarkPoints>, Box<dyn std::error::Error>>;
}
