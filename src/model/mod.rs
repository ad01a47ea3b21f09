// MODEL: camera and static scene data
pub mod camera;
pub mod gallery;

pub use camera::{Camera, PITCH_LIMIT};
pub use gallery::{Artwork, Gallery, LabelAnchor};
