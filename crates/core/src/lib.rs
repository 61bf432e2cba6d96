//! Core capture-classify-render loop for live emotion overlays.
//!
//! The pipeline pulls frames from a [`capture::domain::frame_source::FrameSource`],
//! periodically asks an [`classify::domain::classifier::EmotionClassifier`] for
//! per-face labels, rectangles, and landmark points, and renders the current
//! (possibly stale) annotation set onto every frame until the quit key is seen.

pub mod capture;
pub mod classify;
pub mod overlay;
pub mod pipeline;
pub mod preprocess;
pub mod shared;
