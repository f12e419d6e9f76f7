//! Core types for joint constraint formulation.
//!
//! This crate provides the plain data shared by every joint variant:
//!
//! - [`BodyState`] - Transform, angular/linear velocity and net force of a body
//! - [`BodyLookup`] / [`BodySet`] - Read access to body snapshots by [`BodyId`]
//! - [`JointConfig`] - Stiffness default, offset-point lever arm, thresholds
//! - [`JointError`] - Failures surfaced at construction, connection or step time
//!
//! # Layer 0
//!
//! Like the rest of `sim/L0`, this crate has no engine or GUI dependencies.
//! Bodies are owned by whatever world drives the simulation; joints only
//! read snapshots of them.
//!
//! # Coordinate System
//!
//! Right-handed, Z up. A joint attach frame carries its pin direction on
//! the local +Z axis.

#![doc(html_root_url = "https://docs.rs/sim-joint-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::missing_errors_doc,       // Error docs added where non-obvious
)]

mod body;
mod config;
mod error;

pub use body::{BodyId, BodyLookup, BodySet, BodyState};
pub use config::{JointConfig, DEFAULT_STIFFNESS, PIN_LENGTH};
pub use error::JointError;

/// Result type for joint operations.
pub type Result<T> = std::result::Result<T, JointError>;
