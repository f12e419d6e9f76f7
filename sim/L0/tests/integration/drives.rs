//! Motor, servo and friction drive rows.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use sim_joint::{Hinge, Motor, RowRecorder, Servo, Slider};

use crate::support::{place_child, turned, two_bodies, world_joint, CHILD, DT};

#[test]
fn test_motor_acceleration_is_capped_rate() {
    let bodies = two_bodies();
    let rate = 3.0;
    for max_accel in [10.0, 1e6] {
        let motor = Motor::new()
            .with_angular_rate(rate)
            .unwrap()
            .with_max_accel(max_accel)
            .unwrap();
        let mut joint = world_joint(&bodies, motor);
        let mut rows = RowRecorder::new();
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

        let expected = (rate / DT).min(max_accel);
        assert_relative_eq!(joint.variant().acceleration(), expected, epsilon = 1e-9);
        assert_relative_eq!(rows.last().unwrap().acceleration.unwrap(), expected, epsilon = 1e-9);
    }
}

#[test]
fn test_motor_at_speed_requests_nothing() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Motor::new().with_angular_rate(2.0).unwrap());
    bodies.get_mut(CHILD).unwrap().omega = Vector3::z() * 2.0;
    let mut rows = RowRecorder::new();

    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    assert_relative_eq!(joint.variant().acceleration(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(joint.variant().omega(), 2.0);
}

#[test]
fn test_servo_walks_to_target() {
    let mut bodies = two_bodies();
    let rate = 1.5;
    let servo = Servo::new().with_target(0.5).with_angular_rate(rate).unwrap();
    let mut joint = world_joint(&bodies, servo);
    let mut rows = RowRecorder::new();

    // Integrate the requested motion by hand.
    let mut angle = 0.0;
    for _ in 0..200 {
        rows.clear();
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
        if joint.variant().target_reached() {
            break;
        }
        angle += rate * DT;
        place_child(&mut bodies, turned(angle));
        bodies.get_mut(CHILD).unwrap().omega = Vector3::z() * rate;
    }
    assert!(joint.variant().target_reached());
    assert!((joint.variant().angle() - 0.5).abs() <= rate * DT);
    // Holding: the drive row cancels the current speed.
    let hold = rows.last().unwrap();
    assert_relative_eq!(hold.acceleration.unwrap(), -rate / DT, epsilon = 1e-9);
}

#[test]
fn test_hinge_friction_opposes_spin() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new().with_friction(4.0).unwrap());
    bodies.get_mut(CHILD).unwrap().omega = Vector3::z() * -0.6;
    let mut rows = RowRecorder::new();

    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    let row = rows.last().unwrap();
    assert_eq!(row.relative_angle(), Some(0.0));
    assert_relative_eq!(row.acceleration.unwrap(), 0.6 / DT, epsilon = 1e-9);
    assert_eq!((row.min_friction, row.max_friction), (Some(-4.0), Some(4.0)));
}

#[test]
fn test_slider_friction_opposes_slide() {
    let mut bodies = two_bodies();
    let mut slider = Slider::new();
    slider.set_friction(1.5).unwrap();
    let mut joint = world_joint(&bodies, slider);
    bodies.get_mut(CHILD).unwrap().velocity = Vector3::new(0.0, 0.0, 0.3);
    let mut rows = RowRecorder::new();

    let report = joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
    assert_eq!(report.rows, 6);
    let row = rows.last().unwrap();
    assert!(row.is_linear());
    assert_relative_eq!(row.acceleration.unwrap(), -0.3 / DT, epsilon = 1e-9);
}
