/// RGB color triple used by the overlay renderer.
pub type Color = [u8; 3];

/// Reserved label emitted by classifiers when no face is detected.
///
/// The renderer gives this label special centered placement since there is no
/// meaningful box position without a face.
pub const NO_FACE_LABEL: &str = "no face";

pub const WHITE: Color = [255, 255, 255];
pub const GREEN: Color = [0, 255, 0];
/// Box and label color (light cyan; the original's BGR (255, 255, 104)).
pub const ACCENT: Color = [104, 255, 255];

/// Offset so label text clears the box's top-left corner.
pub const LABEL_OFFSET_PX: i32 = 10;

/// Radius of the filled disc drawn per landmark point.
pub const LANDMARK_RADIUS_PX: i32 = 1;

/// Thickness of the face rectangle outline.
pub const BOX_THICKNESS_PX: i32 = 2;

pub const DEFAULT_WINDOW_NAME: &str = "Emotion Detection";

pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 490;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
