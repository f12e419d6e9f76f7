//! The nine joint variants.
//!
//! Each variant is a [`JointVariant`](crate::JointVariant) policy: it owns
//! its user settings and incremental state, and decides which rows to
//! submit each step. Wrap one in a [`Joint`](crate::Joint) to use it.

mod ball;
mod corkscrew;
mod fixed;
mod hinge;
mod motor;
mod servo;
mod slider;
mod spring;
mod up_vector;

pub use ball::BallAndSocket;
pub use corkscrew::Corkscrew;
pub use fixed::Fixed;
pub use hinge::Hinge;
pub use motor::Motor;
pub use servo::Servo;
pub use slider::Slider;
pub use spring::Spring;
pub use up_vector::UpVector;
