// VIEW: GPU surface, gallery rendering, and the screen-space overlay
pub mod gpu_init;
pub mod overlay;
pub mod render;

pub use gpu_init::GpuContext;
pub use overlay::{LabelProjector, OverlayState, ScreenPlacement};
pub use render::{CameraResources, RenderState};
