//! Incremental angle tracking against bodies turned step by step.

use approx::assert_relative_eq;
use nalgebra::{Isometry3, Point3, UnitQuaternion, Vector3};
use sim_joint::{Hinge, Joint, Motor, RowRecorder};
use sim_joint_types::BodyState;

use crate::support::{place_child, turned, two_bodies, world_joint, CHILD, DT, PARENT};

#[test]
fn test_small_steps_sum_to_total() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new());
    let mut rows = RowRecorder::new();

    let steps = 200;
    let total = 1.3;
    for i in 1..=steps {
        place_child(&mut bodies, turned(total * f64::from(i) / f64::from(steps)));
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    }
    assert_relative_eq!(joint.variant().angle(), total, epsilon = 1e-9);
}

#[test]
fn test_continuous_past_pi() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new());
    let mut rows = RowRecorder::new();

    // Two and a half turns forward, then one back.
    let mut angle: f64 = 0.0;
    for _ in 0..50 {
        angle += 0.1 * std::f64::consts::PI;
        place_child(&mut bodies, turned(angle));
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    }
    assert_relative_eq!(joint.variant().angle(), 5.0 * std::f64::consts::PI, epsilon = 1e-9);

    for _ in 0..20 {
        angle -= 0.1 * std::f64::consts::PI;
        place_child(&mut bodies, turned(angle));
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    }
    assert_relative_eq!(joint.variant().angle(), 3.0 * std::f64::consts::PI, epsilon = 1e-9);
}

#[test]
fn test_angle_is_relative_to_parent() {
    let mut bodies = two_bodies();
    let mut joint = Joint::new(Point3::origin(), Vector3::z(), Hinge::new()).unwrap();
    joint.connect(&bodies, CHILD, Some(PARENT)).unwrap();
    let mut rows = RowRecorder::new();

    for i in 1..=10 {
        let base = 0.2 * f64::from(i);
        bodies.insert(PARENT, BodyState::at(turned(base)).with_omega(Vector3::z() * 2.0));
        let child = BodyState::at(turned(base + 0.05 * f64::from(i)));
        bodies.insert(CHILD, child.with_omega(Vector3::z() * 2.5));
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    }
    assert_relative_eq!(joint.variant().angle(), 0.5, epsilon = 1e-9);
    assert_relative_eq!(joint.variant().omega(), 0.5, epsilon = 1e-12);
}

#[test]
fn test_tilted_pin_tracks_about_its_own_axis() {
    let mut bodies = two_bodies();
    let pin = Vector3::new(1.0, 1.0, 1.0).normalize();
    let mut joint = Joint::new(Point3::new(0.5, 0.0, 0.0), pin, Motor::new()).unwrap();
    joint.connect(&bodies, CHILD, None).unwrap();
    let mut rows = RowRecorder::new();

    for i in 1..=30 {
        // Turn the child about the pin line through the attach point.
        let angle = 0.1 * f64::from(i);
        let about_pin = Isometry3::rotation_wrt_point(
            UnitQuaternion::from_scaled_axis(pin * angle),
            Point3::new(0.5, 0.0, 0.0),
        );
        place_child(&mut bodies, about_pin);
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    }
    assert_relative_eq!(joint.variant().angle(), 3.0, epsilon = 1e-9);
}
