//! Joints submitting through the packed wire sink.

use nalgebra::Vector3;
use sim_joint::{BallAndSocket, Hinge, RawRowSink, WireMatrix4, WireSink, WireVec3};
use sim_joint_types::BodyState;

use crate::support::{place_child, turned, two_bodies, world_joint, CHILD, DT};

/// Counts calls the way a native solver binding would see them.
#[derive(Default)]
struct NativeLog {
    linear: Vec<[WireVec3; 3]>,
    angular: Vec<(f32, WireVec3)>,
    stiffness: Vec<f32>,
    friction: Vec<(char, f32)>,
    accelerations: Vec<f32>,
    ball: Vec<(f32, f32)>,
}

impl RawRowSink for NativeLog {
    fn add_linear_row(&mut self, point_a: &WireVec3, point_b: &WireVec3, direction: &WireVec3) {
        self.linear.push([*point_a, *point_b, *direction]);
    }
    fn add_angular_row(&mut self, relative_angle: f32, axis: &WireVec3) {
        self.angular.push((relative_angle, *axis));
    }
    fn set_row_stiffness(&mut self, stiffness: f32) {
        self.stiffness.push(stiffness);
    }
    fn set_row_minimum_friction(&mut self, friction: f32) {
        self.friction.push(('-', friction));
    }
    fn set_row_maximum_friction(&mut self, friction: f32) {
        self.friction.push(('+', friction));
    }
    fn set_row_acceleration(&mut self, acceleration: f32) {
        self.accelerations.push(acceleration);
    }
    fn attach_ball_socket(&mut self, _pivot: &WireVec3, _pin: &WireVec3) {}
    fn set_ball_cone_limits(&mut self, _pin: &WireVec3, max_cone: f32, max_twist: f32) {
        self.ball.push((max_cone, max_twist));
    }
}

#[test]
fn test_hinge_through_wire_sink() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new().with_limits(-0.25, 0.25).unwrap());
    place_child(&mut bodies, turned(0.5));

    let mut sink = WireSink::new(NativeLog::default());
    let report = joint.submit_constraints(&bodies, &mut sink, DT).unwrap();
    let log = sink.into_inner();

    assert_eq!(report.rows, 6);
    assert_eq!(log.linear.len(), 3);
    assert_eq!(log.angular.len(), 3);
    assert_eq!(log.stiffness.len(), 6);
    assert_eq!(log.friction, vec![('-', 0.0)]);
    let (stop, axis) = log.angular[2];
    assert!((stop - 0.25).abs() < 1e-6);
    assert_eq!(axis, WireVec3::new(0.0, 0.0, -1.0));
}

#[test]
fn test_disabled_ball_limits_travel_as_zero() {
    let bodies = two_bodies();
    let mut joint = world_joint(&bodies, BallAndSocket::new().with_limits(0.0, 0.5).unwrap());

    let mut sink = WireSink::new(NativeLog::default());
    joint.submit_constraints(&bodies, &mut sink, DT).unwrap();
    assert_eq!(sink.raw().ball, vec![(0.0, 0.5)]);
    assert!(sink.raw().accelerations.is_empty());
}

#[test]
fn test_native_body_pose_feeds_joint() {
    let mut bodies = two_bodies();
    let mut joint = world_joint(&bodies, Hinge::new());

    // Pose as a native solver reports it.
    let native = WireMatrix4::from(&turned(0.3));
    bodies.insert(CHILD, BodyState::at(native.to_isometry()).with_omega(Vector3::z()));

    let mut sink = WireSink::new(NativeLog::default());
    joint.submit_constraints(&bodies, &mut sink, DT).unwrap();
    assert!((joint.variant().angle() - 0.3).abs() < 1e-6);
}
