//! Ball-and-socket native constraint calls.

use nalgebra::{Point3, Vector3};
use sim_joint::{BallAndSocket, BallSocketCall, Joint, RowRecorder};

use crate::support::{two_bodies, CHILD, DT, PARENT};

fn limit_pushes(rows: &RowRecorder) -> Vec<(Option<f64>, Option<f64>)> {
    rows.ball_calls()
        .iter()
        .filter_map(|call| match call {
            BallSocketCall::Limits(l) => Some((l.max_cone, l.max_twist)),
            BallSocketCall::Attach { .. } => None,
        })
        .collect()
}

#[test]
fn test_connect_then_step_pushes_limits_once() {
    let bodies = two_bodies();
    let ball = BallAndSocket::new().with_limits(0.8, 0.4).unwrap();
    let mut joint = Joint::new(Point3::new(0.0, 0.0, 1.0), Vector3::z(), ball).unwrap();
    joint.connect(&bodies, CHILD, Some(PARENT)).unwrap();

    let mut rows = RowRecorder::new();
    for _ in 0..3 {
        let report = joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
        assert_eq!(report.rows, 0);
    }
    assert_eq!(limit_pushes(&rows), vec![(Some(0.8), Some(0.4))]);
    match rows.ball_calls()[0] {
        BallSocketCall::Attach { pivot, pin } => {
            assert!((pivot - Point3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
            assert!((pin - Vector3::z()).norm() < 1e-12);
        }
        BallSocketCall::Limits(_) => panic!("attach must come first"),
    }
}

#[test]
fn test_limit_change_pushes_clamped_values() {
    let bodies = two_bodies();
    let mut joint = Joint::new(Point3::origin(), Vector3::z(), BallAndSocket::new()).unwrap();
    joint.connect(&bodies, CHILD, None).unwrap();
    let mut rows = RowRecorder::new();
    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    joint.variant_mut().set_max_cone(4.0).unwrap();
    joint.variant_mut().set_max_twist(2.5).unwrap();
    joint.submit_constraints(&bodies, &mut rows, DT).unwrap();

    let pushes = limit_pushes(&rows);
    assert_eq!(pushes.len(), 2);
    assert_eq!(pushes[0], (None, None));
    let (cone, twist) = pushes[1];
    assert!((cone.unwrap() - 175_f64.to_radians()).abs() < 1e-12);
    assert!((twist.unwrap() - 90_f64.to_radians()).abs() < 1e-12);
}

#[test]
fn test_reconnect_attaches_again() {
    let bodies = two_bodies();
    let mut joint = Joint::new(Point3::origin(), Vector3::z(), BallAndSocket::new()).unwrap();
    let mut rows = RowRecorder::new();
    for _ in 0..2 {
        joint.connect(&bodies, CHILD, None).unwrap();
        joint.submit_constraints(&bodies, &mut rows, DT).unwrap();
        joint.disconnect();
    }
    let attaches = rows
        .ball_calls()
        .iter()
        .filter(|c| matches!(c, BallSocketCall::Attach { .. }))
        .count();
    assert_eq!(attaches, 2);
}
