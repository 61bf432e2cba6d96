use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capture::domain::frame_display::FrameDisplay;
use crate::shared::frame::Frame;

/// Headless display that writes every shown frame as a numbered PNG.
///
/// `poll_key` sleeps for the bounded wait, which is what paces the loop when
/// no interactive window exists. Unattended runs can be told to report a key
/// after a fixed number of polls so the loop terminates.
pub struct ImageDumpDisplay {
    output_dir: PathBuf,
    frames_shown: usize,
    polls: usize,
    key_after: Option<(usize, char)>,
    paced: bool,
}

impl ImageDumpDisplay {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            frames_shown: 0,
            polls: 0,
            key_after: None,
            paced: true,
        }
    }

    /// Reports `key` on the `polls`-th poll and every poll after it.
    pub fn with_key_after(mut self, polls: usize, key: char) -> Self {
        self.key_after = Some((polls, key));
        self
    }

    /// Disables the poll sleep. Intended for tests.
    pub fn unpaced(mut self) -> Self {
        self.paced = false;
        self
    }

    pub fn frames_shown(&self) -> usize {
        self.frames_shown
    }
}

impl FrameDisplay for ImageDumpDisplay {
    fn show(&mut self, _window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.output_dir)?;

        let rgb = match frame.channels() {
            3 => frame.data().to_vec(),
            1 => frame.data().iter().flat_map(|&v| [v, v, v]).collect(),
            c => return Err(format!("unsupported channel count: {c}").into()),
        };

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), rgb)
            .ok_or("Failed to create image from frame data")?;

        let path = self
            .output_dir
            .join(format!("frame_{:05}.png", self.frames_shown));
        img.save(&path)?;

        self.frames_shown += 1;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<char> {
        self.polls += 1;
        if self.paced {
            std::thread::sleep(timeout);
        }
        match self.key_after {
            Some((after, key)) if self.polls >= after => Some(key),
            _ => None,
        }
    }

    fn close_all(&mut self) {}
}
