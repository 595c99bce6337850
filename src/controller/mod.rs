// CONTROLLER: Input, game logic, and per-frame update
pub mod input;
pub mod camera_controller;
pub mod physics;
pub mod collision;
pub mod placement;
pub mod culling;
pub mod session;

pub use input::{InputEvent, InputSnapshot, InputState, KeyBindings, MouseButton, MoveIntents};
pub use camera_controller::CameraController;
pub use physics::MotionIntegrator;
pub use collision::{CollisionResolver, Contacts};
pub use placement::{PlacementOutcome, PlacementResolver, RayHit};
pub use culling::VisibilityCuller;
pub use session::Session;
