mod animation;
mod background;
mod cursor;
mod error;
mod fixed_frame;
mod fps_counter;
pub mod math;
mod ready;
mod resources;
pub mod sources;
mod time;
pub mod tweak;
pub use animation::AnimationActions;
pub use background::*;
pub use cursor::Cursor;
pub use error::*;
pub use fixed_frame::*;
pub use fps_counter::FPSCounter;
pub use ready::*;
pub use resources::*;
pub use sources::{Source, SourceKind, SourcePath};
pub use time::Time;
