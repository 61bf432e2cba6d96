use crate::classify::domain::classifier::{EmotionClassifier, Label, LandmarkPoints};
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::NO_FACE_LABEL;
use crate::shared::frame::Frame;

/// Classifier that returns the same annotation set on every call.
///
/// Serves the CLI's capture-and-overlay smoke path (the binary bundles no
/// trained models) and integration-style tests that need a deterministic
/// collaborator.
pub struct StaticClassifier {
    labels: Vec<Label>,
    rectangles: Vec<BoundingBox>,
    landmarks: Vec<LandmarkPoints>,
}

impl StaticClassifier {
    pub fn new(
        labels: Vec<Label>,
        rectangles: Vec<BoundingBox>,
        landmarks: Vec<LandmarkPoints>,
    ) -> Self {
        Self {
            labels,
            rectangles,
            landmarks,
        }
    }

    /// The zero-faces result: the sentinel label with a degenerate rectangle.
    pub fn no_faces() -> Self {
        Self::new(
            vec![NO_FACE_LABEL.to_string()],
            vec![BoundingBox::new(0, 0, 0, 0)],
            vec![Vec::new()],
        )
    }
}

impl EmotionClassifier for StaticClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Vec<Label>, Box<dyn std::error::Error>> {
        Ok(self.labels.clone())
    }

    fn extract_face_rectangles(
        &mut self,
        _frame: &Frame,
    ) -> Result<Vec<BoundingBox>, Box<dyn std::error::Error>> {
        Ok(self.rectangles.clone())
    }

    fn extract_landmark_points(
        &mut self,
        _frame: &Frame,
    ) -> Result<Vec<LandmarkPoints>, Box<dyn std::error::Error>> {
        Ok(self.landmarks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(vec![0u8; 4 * 4 * 3], 4, 4, 3, 0)
    }

    #[test]
    fn test_returns_configured_results_every_call() {
        let mut classifier = StaticClassifier::new(
            vec!["happy".into()],
            vec![BoundingBox::new(10, 10, 50, 50)],
            vec![vec![(20, 20)]],
        );

        for _ in 0..3 {
            assert_eq!(classifier.classify(&frame()).unwrap(), vec!["happy"]);
            assert_eq!(
                classifier.extract_face_rectangles(&frame()).unwrap(),
                vec![BoundingBox::new(10, 10, 50, 50)]
            );
            assert_eq!(
                classifier.extract_landmark_points(&frame()).unwrap(),
                vec![vec![(20, 20)]]
            );
        }
    }

    #[test]
    fn test_no_faces_emits_sentinel() {
        let mut classifier = StaticClassifier::no_faces();
        assert_eq!(classifier.classify(&frame()).unwrap(), vec![NO_FACE_LABEL]);
        assert_eq!(
            classifier.extract_face_rectangles(&frame()).unwrap(),
            vec![BoundingBox::new(0, 0, 0, 0)]
        );
        assert_eq!(
            classifier.extract_landmark_points(&frame()).unwrap(),
            vec![Vec::new()]
        );
    }
}
