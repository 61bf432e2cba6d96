use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::capture::domain::frame_source::{CaptureError, FrameSource};
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;

/// Serves a directory of image files as a frame stream, sorted by file name.
///
/// Useful for replaying captured sessions and for driving the loop without a
/// camera. Exhausting the directory reports [`CaptureError::EndOfStream`].
pub struct ImageSequenceSource {
    pending: VecDeque<PathBuf>,
    next_index: usize,
    closed: bool,
}

impl ImageSequenceSource {
    pub fn open(dir: &Path) -> Result<Self, CaptureError> {
        let entries =
            std::fs::read_dir(dir).map_err(|e| CaptureError::Device(e.to_string()))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_image(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(CaptureError::Device(format!(
                "no image files in {}",
                dir.display()
            )));
        }

        Ok(Self {
            pending: paths.into(),
            next_index: 0,
            closed: false,
        })
    }

    /// Frames remaining to be served.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl FrameSource for ImageSequenceSource {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        if self.closed {
            return Err(CaptureError::Device("source is closed".to_string()));
        }

        let path = self.pending.pop_front().ok_or(CaptureError::EndOfStream)?;

        let img = image::open(&path)
            .map_err(|e| CaptureError::Decode(format!("{}: {e}", path.display())))?
            .to_rgb8();

        let (width, height) = img.dimensions();
        let frame = Frame::new(img.into_raw(), width, height, 3, self.next_index);
        self.next_index += 1;
        Ok(frame)
    }

    fn close(&mut self) {
        self.pending.clear();
        self.closed = true;
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
