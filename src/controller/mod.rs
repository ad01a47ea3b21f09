// CONTROLLER: input, navigation state, and the per-frame update order
pub mod bounds;
pub mod frame_loop;
pub mod input;
pub mod look;
pub mod movement;

pub use bounds::RoomBounds;
pub use frame_loop::FrameLoop;
pub use input::{InputEvent, InputState, Intent, KeyBindings};
pub use look::LookController;
pub use movement::MovementIntegrator;
