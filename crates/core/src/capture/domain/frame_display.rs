use std::time::Duration;

use crate::shared::frame::Frame;

/// Presents frames and delivers key events.
///
/// `poll_key` also paces the loop: implementations wait up to `timeout`
/// before reporting that no key arrived.
pub trait FrameDisplay: Send {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits up to `timeout` for a key press.
    fn poll_key(&mut self, timeout: Duration) -> Option<char>;

    /// Tears down any display surfaces. Idempotent.
    fn close_all(&mut self);
}
