use crate::classify::domain::classifier::{Label, LandmarkPoints};
use crate::shared::bounding_box::BoundingBox;

/// One face's worth of classification output: label, rectangle, landmarks.
///
/// All three fields originate from the same classification tick; the pairing
/// in [`FaceAnnotation::pair`] is the only place the classifier's three
/// result sequences are zipped together.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceAnnotation {
    pub label: Label,
    pub bounding_box: BoundingBox,
    pub landmarks: LandmarkPoints,
}

impl FaceAnnotation {
    /// Pairs the classifier's three positionally-correlated sequences into
    /// per-face annotations, truncating to the shortest sequence.
    ///
    /// Extra entries beyond the shortest sequence are dropped silently; a
    /// length mismatch is a collaborator quirk, not an error.
    pub fn pair(
        labels: Vec<Label>,
        rectangles: Vec<BoundingBox>,
        landmarks: Vec<LandmarkPoints>,
    ) -> Vec<FaceAnnotation> {
        let shortest = labels.len().min(rectangles.len()).min(landmarks.len());
        if labels.len() != shortest || rectangles.len() != shortest || landmarks.len() != shortest {
            log::debug!(
                "classifier result lengths differ (labels={}, rectangles={}, landmarks={}); \
                 truncating to {shortest}",
                labels.len(),
                rectangles.len(),
                landmarks.len(),
            );
        }

        labels
            .into_iter()
            .zip(rectangles)
            .zip(landmarks)
            .map(|((label, bounding_box), landmarks)| FaceAnnotation {
                label,
                bounding_box,
                landmarks,
            })
            .collect()
    }
}
