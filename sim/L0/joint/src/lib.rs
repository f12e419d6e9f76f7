//! Constraint-row joints for rigid bodies driven by an external solver.
//!
//! A joint never integrates anything. Each step it reads two body snapshots,
//! rebuilds its attach frames in world space, and submits a handful of
//! constraint rows (linear or angular, with stiffness, friction bounds and
//! a target acceleration) to a [`ConstraintRowSink`]. The solver behind the
//! sink turns those rows into impulses.
//!
//! # Joint Variants
//!
//! | Variant | Free motion | Rows |
//! |---------|-------------|------|
//! | [`Hinge`] | 1 rotation | pivot + 2 tilt, optional limit or friction |
//! | [`Servo`] | 1 rotation | hinge rows + drive toward a target angle |
//! | [`Motor`] | 1 rotation | hinge rows + drive toward a speed |
//! | [`Slider`] | 1 translation | 2 lateral + 2 offset + twist, optional limit or friction |
//! | [`Corkscrew`] | 1 rotation + 1 translation | 2 lateral + 2 offset, angular and linear slots |
//! | [`BallAndSocket`] | 3 rotations | native ball constraint with cone/twist limits |
//! | [`Fixed`] | none | 6 linear rows, optionally breakable |
//! | [`UpVector`] | pin twist + position | 2 angular rows |
//! | [`Spring`] | all | none |
//!
//! # Angle Tracking
//!
//! Rotational variants accumulate their angle with [`AngleTracker`], which
//! integrates the wrapped difference between successive measurements. The
//! angle is continuous across ±π and may grow without bound.
//!
//! # Example
//!
//! ```
//! use sim_joint::{Hinge, Joint, RowRecorder};
//! use sim_joint_types::{BodyId, BodySet, BodyState};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut bodies = BodySet::new();
//! bodies.insert(BodyId::new(1), BodyState::default());
//!
//! let hinge = Hinge::new().with_limits(-0.5, 0.5).unwrap();
//! let mut joint = Joint::new(Point3::origin(), Vector3::x(), hinge).unwrap();
//! joint.connect(&bodies, BodyId::new(1), None).unwrap();
//!
//! let mut rows = RowRecorder::new();
//! joint.submit_constraints(&bodies, &mut rows, 1.0 / 60.0).unwrap();
//! assert_eq!(rows.len(), 5);
//! ```
//!
//! # Layer 0 Crate
//!
//! No engine, FFI or GUI dependencies. Native solvers plug in through
//! [`RawRowSink`] and [`WireSink`], which own the only `f32` packing.

#![doc(html_root_url = "https://docs.rs/sim-joint/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::suboptimal_flops,
    clippy::similar_names
)]
#![cfg_attr(test, allow(clippy::float_cmp, clippy::panic))]

pub mod frame;
pub mod joint;
pub mod limits;
mod rows;
pub mod set;
pub mod sink;
pub mod tracking;
pub mod variants;
pub mod wire;

pub use frame::{attach_pose, signed_angle, JointFrame};
pub use joint::{AnyJoint, Joint, JointDof, JointKind, JointVariant, StepOutcome, StepReport};
pub use limits::{JointLimits, LimitState};
pub use set::{JointHandle, JointSet, StepSummary};
pub use sink::{
    BallSocketCall, BallSocketLimits, ConstraintRow, ConstraintRowSink, RowKind, RowRecorder,
};
pub use tracking::AngleTracker;
pub use variants::{BallAndSocket, Corkscrew, Fixed, Hinge, Motor, Servo, Slider, Spring, UpVector};
pub use wire::{RawRowSink, WireMatrix4, WireSink, WireVec3};
