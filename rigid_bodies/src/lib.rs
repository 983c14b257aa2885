mod pairs;
mod world;
pub use pairs::*;
pub use rapier3d::prelude::RigidBodyHandle;
pub use world::*;

#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("no rigid body {0:?} in the world")]
    UnknownBody(RigidBodyHandle),
}
