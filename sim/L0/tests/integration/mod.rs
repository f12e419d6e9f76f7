//! Integration tests for the sim-joint crates.
//!
//! These tests drive joints through the public API only:
//! - Connection lifecycle and error surfaces
//! - Incremental angle tracking against moving bodies
//! - Limit stops, friction, servo and motor drive rows
//! - Slider position, Fixed breaking, UpVector and ball limits
//! - The wire boundary and the joint collection

pub mod angle_tracking;
pub mod ball_socket;
pub mod drives;
pub mod joint_set;
pub mod limits;
pub mod slider_position;
pub mod support;
pub mod wire_boundary;
