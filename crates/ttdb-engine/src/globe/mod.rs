mod projector;
mod rotation;
mod view;

pub use projector::{center_rotation, project, Projection};
pub use rotation::{angle_delta, RotationAnimator};
pub use view::{DragOutcome, GlobeView, Viewport, DEFAULT_ZOOM, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
