use thiserror::Error;

use crate::shared::frame::Frame;

/// Why frame acquisition stopped. Every variant is fatal to the run; the
/// loop does not retry a failed source.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The source has no more frames (finite stream cleanly exhausted).
    #[error("capture stream ended")]
    EndOfStream,
    #[error("capture device failed: {0}")]
    Device(String),
    #[error("frame decode failed: {0}")]
    Decode(String),
}

/// Pulls frames from a camera, video file, or other stream.
///
/// The handle is exclusively owned by the loop: acquired at construction and
/// released by `close` exactly once at loop exit, on every exit path.
pub trait FrameSource: Send {
    /// Returns the next frame, or the error that ends the run.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Releases the underlying device or file handle. Idempotent.
    fn close(&mut self);
}
