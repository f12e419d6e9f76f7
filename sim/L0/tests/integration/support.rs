//! Shared fixtures.

use nalgebra::{Isometry3, Point3, Vector3};
use sim_joint::{Joint, JointVariant};
use sim_joint_types::{BodyId, BodySet, BodyState};

pub const CHILD: BodyId = BodyId(1);
pub const PARENT: BodyId = BodyId(2);
pub const DT: f64 = 1.0 / 60.0;

/// Child and parent at rest at the origin.
pub fn two_bodies() -> BodySet {
    let mut bodies = BodySet::new();
    bodies.insert(CHILD, BodyState::default());
    bodies.insert(PARENT, BodyState::default());
    bodies
}

/// A joint at the origin with a +Z pin, connected child → world.
pub fn world_joint<V: JointVariant>(bodies: &BodySet, variant: V) -> Joint<V> {
    let mut joint = Joint::new(Point3::origin(), Vector3::z(), variant).expect("valid pin");
    joint.connect(bodies, CHILD, None).expect("connect");
    joint
}

/// Replace the child's pose.
pub fn place_child(bodies: &mut BodySet, pose: Isometry3<f64>) {
    bodies.get_mut(CHILD).expect("child present").transform = pose;
}

/// Pose turned by `angle` about world Z.
pub fn turned(angle: f64) -> Isometry3<f64> {
    Isometry3::rotation(Vector3::z() * angle)
}
