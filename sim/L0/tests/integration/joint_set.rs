//! Stepping a mixed collection of joints.

use nalgebra::{Point3, Vector3};
use sim_joint::{
    Fixed, Hinge, Joint, JointKind, JointSet, Motor, RowRecorder, Slider, Spring, UpVector,
};
use sim_joint_types::{BodyId, BodySet, BodyState};

use crate::support::DT;

fn chain() -> BodySet {
    (1..=4)
        .map(|i| (BodyId::new(i), BodyState::default()))
        .collect()
}

fn at_origin<V: sim_joint::JointVariant>(variant: V) -> Joint<V> {
    Joint::new(Point3::origin(), Vector3::z(), variant).unwrap()
}

#[test]
fn test_mixed_set_row_counts() {
    let mut bodies = chain();
    let mut set = JointSet::new();
    let hinge = set.insert(at_origin(Hinge::new()));
    let slider = set.insert(at_origin(Slider::new()));
    let motor = set.insert(at_origin(Motor::new()));
    let up = set.insert(at_origin(UpVector::new()));
    let spring = set.insert(at_origin(Spring::new()));
    let weld = set.insert(at_origin(Fixed::new().breakable(50.0).unwrap()));

    set.connect(hinge, &bodies, BodyId::new(1), Some(BodyId::new(2))).unwrap();
    set.connect(slider, &bodies, BodyId::new(2), Some(BodyId::new(3))).unwrap();
    set.connect(motor, &bodies, BodyId::new(3), None).unwrap();
    set.connect(up, &bodies, BodyId::new(4), None).unwrap();
    set.connect(spring, &bodies, BodyId::new(1), Some(BodyId::new(4))).unwrap();
    set.connect(weld, &bodies, BodyId::new(4), Some(BodyId::new(1))).unwrap();

    let mut rows = RowRecorder::new();
    let summary = set.step(&bodies, &mut rows, DT).unwrap();
    assert_eq!(summary.stepped, 6);
    assert_eq!(
        summary.rows,
        vec![(hinge, 5), (slider, 5), (motor, 6), (up, 2), (spring, 0), (weld, 6)]
    );
    assert_eq!(rows.len(), summary.total_rows());
    assert!(summary.broken.is_empty());

    // Overload the weld: it drops out and the rest keep stepping.
    bodies.get_mut(BodyId::new(4)).unwrap().force = Vector3::z() * 60.0;
    let summary = set.step(&bodies, &mut rows, DT).unwrap();
    assert_eq!(summary.broken, vec![weld]);
    assert_eq!(set.connected_count(), 5);

    let summary = set.step(&bodies, &mut rows, DT).unwrap();
    assert_eq!(summary.stepped, 5);
    assert!(summary.rows.iter().all(|(h, _)| *h != weld));
}

#[test]
fn test_typed_handles() {
    let mut set = JointSet::new();
    let h = set.insert(at_origin(Motor::new()));
    assert_eq!(set.get(h).unwrap().kind(), JointKind::Motor);

    set.get_as_mut::<Motor>(h).unwrap().variant_mut().set_controller(-1.0);
    assert_eq!(set.get_as::<Motor>(h).unwrap().variant().controller(), -1.0);
    assert!(set.get_as::<Hinge>(h).is_none());
}

#[test]
fn test_missing_body_stops_step() {
    let mut bodies = chain();
    let mut set = JointSet::new();
    let a = set.insert(at_origin(Hinge::new()));
    let b = set.insert(at_origin(Hinge::new()));
    set.connect(a, &bodies, BodyId::new(1), None).unwrap();
    set.connect(b, &bodies, BodyId::new(2), None).unwrap();

    bodies.remove(BodyId::new(2));
    let mut rows = RowRecorder::new();
    let err = set.step(&bodies, &mut rows, DT).unwrap_err();
    assert_eq!(err, sim_joint_types::JointError::BodyNotFound(BodyId::new(2)));
    // The first joint's rows already went out.
    assert_eq!(rows.len(), 5);
}
