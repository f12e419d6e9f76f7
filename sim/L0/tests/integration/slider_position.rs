//! Slider position measured along arbitrary pins.

use approx::assert_relative_eq;
use nalgebra::{Isometry3, Point3, Vector3};
use sim_joint::{Joint, RowRecorder, Slider};
use sim_joint_types::BodyState;

use crate::support::{place_child, two_bodies, CHILD, DT, PARENT};

#[test]
fn test_position_round_trip() {
    for pin in [Vector3::z(), Vector3::new(1.0, -2.0, 0.5), -Vector3::x()] {
        let mut bodies = two_bodies();
        let mut joint = Joint::new(Point3::new(0.2, 0.1, 0.0), pin, Slider::new()).unwrap();
        joint.connect(&bodies, CHILD, None).unwrap();

        for d in [-1.5, 0.0, 0.75, 3.0] {
            let along = pin.normalize() * d;
            place_child(&mut bodies, Isometry3::translation(along.x, along.y, along.z));
            let mut rows = RowRecorder::new();
            joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
            assert_relative_eq!(joint.variant().position(), d, epsilon = 1e-12);

            // Only the free axis moved, so every locking row is satisfied.
            for row in rows.rows() {
                let error = row.linear_error().or(row.relative_angle()).unwrap();
                assert_relative_eq!(error, 0.0, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn test_position_relative_to_moving_parent() {
    let mut bodies = two_bodies();
    let mut joint = Joint::new(Point3::origin(), Vector3::y(), Slider::new()).unwrap();
    joint.connect(&bodies, CHILD, Some(PARENT)).unwrap();

    bodies.insert(
        PARENT,
        BodyState::at(Isometry3::translation(5.0, 1.0, 0.0)).with_velocity(Vector3::y()),
    );
    bodies.insert(
        CHILD,
        BodyState::at(Isometry3::translation(5.0, 1.4, 0.0)).with_velocity(Vector3::y() * 3.0),
    );
    let mut rows = RowRecorder::new();
    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    assert_relative_eq!(joint.variant().position(), 0.4, epsilon = 1e-12);
    assert_relative_eq!(joint.variant().velocity(), 2.0, epsilon = 1e-12);
}

#[test]
fn test_limit_stop_along_tilted_pin() {
    let mut bodies = two_bodies();
    let pin = Vector3::new(0.0, 1.0, 1.0);
    let slider = Slider::new().with_limits(-1.0, 1.0).unwrap();
    let mut joint = Joint::new(Point3::origin(), pin, slider).unwrap();
    joint.connect(&bodies, CHILD, None).unwrap();

    let along = pin.normalize() * 1.25;
    place_child(&mut bodies, Isometry3::translation(along.x, along.y, along.z));
    let mut rows = RowRecorder::new();
    let report = joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    assert_eq!(report.rows, 6);
    let stop = rows.last().unwrap();
    assert_eq!(stop.min_friction, Some(0.0));
    assert_relative_eq!(stop.axis(), -pin.normalize(), epsilon = 1e-12);
    assert_relative_eq!(stop.linear_error().unwrap(), -0.25, epsilon = 1e-12);
}
