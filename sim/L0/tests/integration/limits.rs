//! Limit stops on rotational and linear axes.

use approx::assert_relative_eq;
use nalgebra::{Isometry3, Vector3};
use sim_joint::{Corkscrew, Hinge, RowRecorder, Servo};

use crate::support::{place_child, turned, two_bodies, world_joint, DT};

#[test]
fn test_hinge_clamps_at_max() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new().with_limits(-0.4, 0.4).unwrap());
    let mut rows = RowRecorder::new();

    place_child(&mut bodies, turned(0.6));
    let report = joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    assert_eq!(report.rows, 6);
    assert_relative_eq!(joint.variant().angle(), 0.4);
    let stop = rows.last().unwrap();
    assert_eq!(stop.min_friction, Some(0.0));
    assert_eq!(stop.stiffness, Some(1.0));
    assert_relative_eq!(stop.relative_angle().unwrap(), 0.2, epsilon = 1e-12);
    assert_relative_eq!(stop.axis(), -Vector3::z(), epsilon = 1e-12);
}

#[test]
fn test_hinge_clamps_at_min() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new().with_limits(-0.4, 0.4).unwrap());
    let mut rows = RowRecorder::new();

    place_child(&mut bodies, turned(-0.5));
    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    assert_relative_eq!(joint.variant().angle(), -0.4);
    let stop = rows.last().unwrap();
    assert_relative_eq!(stop.relative_angle().unwrap(), 0.1, epsilon = 1e-12);
    assert_relative_eq!(stop.axis(), Vector3::z(), epsilon = 1e-12);
}

#[test]
fn test_hinge_free_inside_range() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new().with_limits(-0.4, 0.4).unwrap());
    let mut rows = RowRecorder::new();

    place_child(&mut bodies, turned(0.3));
    let report = joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    assert_eq!(report.rows, 5);
}

#[test]
fn test_servo_clamps_at_max() {
    let mut bodies = two_bodies();
    let servo = Servo::new().with_target(5.0).with_limits(-1.0, 1.0).unwrap();
    let mut joint = world_joint(&bodies, servo);
    let mut rows = RowRecorder::new();

    place_child(&mut bodies, turned(1.25));
    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    assert_relative_eq!(joint.variant().angle(), 1.0);
    let stop = rows.last().unwrap();
    assert_eq!(stop.min_friction, Some(0.0));
    assert_relative_eq!(stop.relative_angle().unwrap(), 0.25, epsilon = 1e-12);
}

#[test]
fn test_corkscrew_clamps_at_max() {
    let mut bodies = two_bodies();
    let screw = Corkscrew::new()
        .with_angular_limits(-0.5, 0.5)
        .unwrap()
        .with_linear_limits(-2.0, 2.0)
        .unwrap();
    let mut joint = world_joint(&bodies, screw);
    let mut rows = RowRecorder::new();

    place_child(&mut bodies, Isometry3::translation(0.0, 0.0, 2.5) * turned(0.75));
    let report = joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    assert_eq!(report.rows, 6);
    assert_relative_eq!(joint.variant().angle(), 0.5);
    let angular = rows.rows()[4];
    let linear = rows.rows()[5];
    assert_eq!(angular.min_friction, Some(0.0));
    assert_relative_eq!(angular.relative_angle().unwrap(), 0.25, epsilon = 1e-12);
    assert_eq!(linear.min_friction, Some(0.0));
    assert_relative_eq!(linear.linear_error().unwrap(), -0.5, epsilon = 1e-12);
}

#[test]
fn test_release_after_clamp() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new().with_limits(-0.4, 0.4).unwrap());
    let mut rows = RowRecorder::new();

    place_child(&mut bodies, turned(0.6));
    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    assert_relative_eq!(joint.variant().angle(), 0.4);

    place_child(&mut bodies, turned(0.2));
    let report = joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    assert_relative_eq!(joint.variant().angle(), 0.2, epsilon = 1e-12);
    assert_eq!(report.rows, 5);
}
