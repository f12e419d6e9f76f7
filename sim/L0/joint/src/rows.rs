//! Row patterns shared by several joint variants.

use nalgebra::Vector3;

use crate::frame::{signed_angle, JointFrame};
use crate::limits::{JointLimits, LimitState};
use crate::sink::ConstraintRowSink;

/// Pin both pivots together: three linear rows along the parent axes.
pub(crate) fn pin_pivot(frame: &JointFrame<'_>, sink: &mut dyn ConstraintRowSink) {
    let (p0, p1) = (frame.pivot0(), frame.pivot1());
    for dir in [frame.x1(), frame.y1(), frame.z1()] {
        sink.add_linear_row(&p0, &p1, &dir);
        sink.set_row_stiffness(frame.stiffness);
    }
}

/// Pin the pivots laterally, leaving translation along the pin free.
pub(crate) fn pin_lateral(frame: &JointFrame<'_>, sink: &mut dyn ConstraintRowSink) {
    let (p0, p1) = (frame.pivot0(), frame.pivot1());
    for dir in [frame.x1(), frame.y1()] {
        sink.add_linear_row(&p0, &p1, &dir);
        sink.set_row_stiffness(frame.stiffness);
    }
}

/// Keep the pins parallel with two angular rows about the parent X and Y.
pub(crate) fn lock_tilt_angular(frame: &JointFrame<'_>, sink: &mut dyn ConstraintRowSink) {
    let (z0, z1) = (frame.z0(), frame.z1());
    for axis in [frame.x1(), frame.y1()] {
        sink.add_angular_row(-signed_angle(&z1, &z0, &axis), &axis);
        sink.set_row_stiffness(frame.stiffness);
    }
}

/// Keep the pins parallel by tying points one lever arm down each pin.
pub(crate) fn lock_tilt_offset(frame: &JointFrame<'_>, sink: &mut dyn ConstraintRowSink) {
    let (q0, q1) = frame.axial_points();
    for dir in [frame.x1(), frame.y1()] {
        sink.add_linear_row(&q0, &q1, &dir);
        sink.set_row_stiffness(frame.stiffness);
    }
}

/// Cancel rotation about the pin with one angular row.
pub(crate) fn lock_twist(frame: &JointFrame<'_>, sink: &mut dyn ConstraintRowSink) {
    let (sin, cos) = frame.measure_angle();
    sink.add_angular_row(-sin.atan2(cos), &frame.z1());
    sink.set_row_stiffness(frame.stiffness);
}

/// Submit a one-sided row pushing `angle` back inside `limits`.
///
/// The row may only push toward the range (zero minimum friction), so the
/// joint moves away from the stop freely. Returns the clamped angle when a
/// row was submitted.
pub(crate) fn clamp_angular(
    frame: &JointFrame<'_>,
    sink: &mut dyn ConstraintRowSink,
    limits: &JointLimits,
    angle: f64,
) -> Option<f64> {
    let z1 = frame.z1();
    match limits.state(angle) {
        LimitState::Inside => return None,
        LimitState::BelowMin { depth, .. } => sink.add_angular_row(depth, &z1),
        LimitState::AboveMax { depth, .. } => sink.add_angular_row(depth, &-z1),
    }
    sink.set_row_minimum_friction(0.0);
    sink.set_row_stiffness(1.0);
    Some(limits.clamp(angle))
}

/// Submit a one-sided row pushing the pin offset `position` back inside `limits`.
///
/// Returns the clamped position when a row was submitted.
pub(crate) fn clamp_linear(
    frame: &JointFrame<'_>,
    sink: &mut dyn ConstraintRowSink,
    limits: &JointLimits,
    position: f64,
) -> Option<f64> {
    let z1 = frame.z1();
    let p0 = frame.pivot0();
    let stop = |at: f64| frame.pivot1() + z1 * at;
    match limits.state(position) {
        LimitState::Inside => return None,
        LimitState::BelowMin { stop: at, .. } => sink.add_linear_row(&p0, &stop(at), &z1),
        LimitState::AboveMax { stop: at, .. } => sink.add_linear_row(&p0, &stop(at), &-z1),
    }
    sink.set_row_minimum_friction(0.0);
    sink.set_row_stiffness(1.0);
    Some(limits.clamp(position))
}

/// Zero-error angular row about `axis` driven at `acceleration`, with the
/// impulse bounded to ±`bound` when one is given.
pub(crate) fn drive_angular(
    frame: &JointFrame<'_>,
    sink: &mut dyn ConstraintRowSink,
    axis: &Vector3<f64>,
    acceleration: f64,
    bound: Option<f64>,
) {
    sink.add_angular_row(0.0, axis);
    sink.set_row_acceleration(acceleration);
    if let Some(bound) = bound {
        sink.set_row_minimum_friction(-bound);
        sink.set_row_maximum_friction(bound);
    }
    sink.set_row_stiffness(frame.stiffness);
}

/// Zero-error linear row along the pin driven at `acceleration`, bounded
/// to ±`bound`.
pub(crate) fn drive_linear(
    frame: &JointFrame<'_>,
    sink: &mut dyn ConstraintRowSink,
    acceleration: f64,
    bound: f64,
) {
    let p0 = frame.pivot0();
    sink.add_linear_row(&p0, &p0, &frame.z1());
    sink.set_row_acceleration(acceleration);
    sink.set_row_minimum_friction(-bound);
    sink.set_row_maximum_friction(bound);
    sink.set_row_stiffness(frame.stiffness);
}

/// Treat a zero bound as "unbounded".
pub(crate) fn bound(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}
