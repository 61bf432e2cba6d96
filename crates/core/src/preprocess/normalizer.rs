use crate::preprocess::clahe::Clahe;
use crate::shared::frame::Frame;

/// Converts color frames to the normalized single-channel representation the
/// classifier consumes: grayscale plus local contrast equalization to reduce
/// lighting sensitivity.
///
/// Pure over its fixed equalizer configuration; safe to call repeatedly.
#[derive(Clone, Debug, Default)]
pub struct FrameNormalizer {
    clahe: Clahe,
}

impl FrameNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_equalizer(clahe: Clahe) -> Self {
        Self { clahe }
    }

    /// Returns a new 1-channel frame; the input frame is untouched.
    pub fn normalize(&self, frame: &Frame) -> Frame {
        debug_assert_eq!(frame.channels(), 3, "normalize expects an RGB frame");

        let width = frame.width() as usize;
        let height = frame.height() as usize;

        let src = frame.as_ndarray();
        let mut gray = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                gray.push(luminance(
                    src[[row, col, 0]],
                    src[[row, col, 1]],
                    src[[row, col, 2]],
                ));
            }
        }

        let equalized = self.clahe.apply(&gray, width, height);
        Frame::new(
            equalized,
            frame.width(),
            frame.height(),
            1,
            frame.index(),
        )
    }
}

/// Rec. 601 luma, the grayscale conversion the original pipeline uses.
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Frame::new(data, width, height, 3, 7)
    }

    #[test]
    fn test_output_is_single_channel_same_dimensions() {
        let normalizer = FrameNormalizer::new();
        let out = normalizer.normalize(&rgb_frame(64, 48, [10, 20, 30]));
        assert_eq!(out.channels(), 1);
        assert_eq!(out.width(), 64);
        assert_eq!(out.height(), 48);
        assert_eq!(out.data().len(), 64 * 48);
    }

    #[test]
    fn test_preserves_frame_index() {
        let normalizer = FrameNormalizer::new();
        let out = normalizer.normalize(&rgb_frame(8, 8, [0, 0, 0]));
        assert_eq!(out.index(), 7);
    }

    #[test]
    fn test_uniform_input_yields_uniform_output() {
        let normalizer = FrameNormalizer::new();
        let out = normalizer.normalize(&rgb_frame(64, 64, [120, 64, 31]));
        let first = out.data()[0];
        assert!(out.data().iter().all(|&v| v == first));
    }

    #[test]
    fn test_input_frame_untouched() {
        let normalizer = FrameNormalizer::new();
        let frame = rgb_frame(16, 16, [50, 100, 200]);
        let before = frame.data().to_vec();
        let _ = normalizer.normalize(&frame);
        assert_eq!(frame.data(), &before[..]);
    }

    #[test]
    fn test_luminance_weights() {
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
        // Green dominates the luma sum.
        assert!(luminance(0, 255, 0) > luminance(255, 0, 0));
        assert!(luminance(255, 0, 0) > luminance(0, 0, 255));
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 149);
        assert_eq!(luminance(0, 0, 255), 29);
    }

    #[test]
    fn test_repeated_calls_identical() {
        let normalizer = FrameNormalizer::new();
        let frame = rgb_frame(32, 32, [77, 77, 77]);
        let a = normalizer.normalize(&frame);
        let b = normalizer.normalize(&frame);
        assert_eq!(a.data(), b.data());
    }
}
