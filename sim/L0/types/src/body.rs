//! Rigid body snapshots as seen by joints.
//!
//! Bodies live in the external simulation world. Joints never own or mutate
//! them; they only read a [`BodyState`] snapshot each step through a
//! [`BodyLookup`].

use hashbrown::HashMap;
use nalgebra::{Isometry3, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a rigid body in the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(pub u64);

impl BodyId {
    /// Create a new body ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for BodyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Body({})", self.0)
    }
}

/// Kinematic snapshot of a rigid body for one simulation step.
///
/// # Example
///
/// ```
/// use sim_joint_types::BodyState;
/// use nalgebra::{Isometry3, Point3, Vector3};
///
/// let body = BodyState::at(Isometry3::translation(1.0, 0.0, 0.0))
///     .with_omega(Vector3::new(0.0, 0.0, 2.0));
///
/// // Velocity of a point one unit further along +X
/// let v = body.point_velocity(&Point3::new(2.0, 0.0, 0.0));
/// assert!((v.y - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyState {
    /// Body frame in world coordinates.
    pub transform: Isometry3<f64>,
    /// Angular velocity in world coordinates (rad/s).
    pub omega: Vector3<f64>,
    /// Linear velocity of the body origin in world coordinates.
    pub velocity: Vector3<f64>,
    /// Net force applied to the body during the last step.
    pub force: Vector3<f64>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self::at(Isometry3::identity())
    }
}

impl BodyState {
    /// A body at rest with the given transform.
    #[must_use]
    pub fn at(transform: Isometry3<f64>) -> Self {
        Self {
            transform,
            omega: Vector3::zeros(),
            velocity: Vector3::zeros(),
            force: Vector3::zeros(),
        }
    }

    /// Set the angular velocity.
    #[must_use]
    pub fn with_omega(mut self, omega: Vector3<f64>) -> Self {
        self.omega = omega;
        self
    }

    /// Set the linear velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the net applied force.
    #[must_use]
    pub fn with_force(mut self, force: Vector3<f64>) -> Self {
        self.force = force;
        self
    }

    /// Body origin in world coordinates.
    #[must_use]
    pub fn origin(&self) -> Point3<f64> {
        Point3::from(self.transform.translation.vector)
    }

    /// Velocity of a world-space point rigidly attached to this body.
    ///
    /// `v_point` = `v_origin` + omega × (point - origin)
    #[must_use]
    pub fn point_velocity(&self, point: &Point3<f64>) -> Vector3<f64> {
        self.velocity + self.omega.cross(&(point - self.origin()))
    }

    /// Check if the state contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.transform.translation.vector.iter().all(|x| x.is_finite())
            && self.transform.rotation.coords.iter().all(|x| x.is_finite())
            && self.omega.iter().all(|x| x.is_finite())
            && self.velocity.iter().all(|x| x.is_finite())
    }
}

/// Read access to body snapshots by ID.
pub trait BodyLookup {
    /// Get the current state of a body, if it exists.
    fn body(&self, id: BodyId) -> Option<&BodyState>;

    /// Check whether a body exists.
    fn contains(&self, id: BodyId) -> bool {
        self.body(id).is_some()
    }
}

impl BodyLookup for HashMap<BodyId, BodyState> {
    fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.get(&id)
    }
}

impl BodyLookup for std::collections::HashMap<BodyId, BodyState> {
    fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.get(&id)
    }
}

/// A simple owned collection of body snapshots.
///
/// The host refreshes entries once per step before asking joints for rows.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodySet {
    bodies: HashMap<BodyId, BodyState>,
}

impl BodySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a body snapshot. Returns the previous snapshot.
    pub fn insert(&mut self, id: BodyId, state: BodyState) -> Option<BodyState> {
        self.bodies.insert(id, state)
    }

    /// Remove a body.
    pub fn remove(&mut self, id: BodyId) -> Option<BodyState> {
        self.bodies.remove(&id)
    }

    /// Mutable access to a body snapshot.
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut BodyState> {
        self.bodies.get_mut(&id)
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over all bodies.
    pub fn iter(&self) -> impl Iterator<Item = (&BodyId, &BodyState)> {
        self.bodies.iter()
    }
}

impl BodyLookup for BodySet {
    fn body(&self, id: BodyId) -> Option<&BodyState> {
        self.bodies.get(&id)
    }
}

impl FromIterator<(BodyId, BodyState)> for BodySet {
    fn from_iter<I: IntoIterator<Item = (BodyId, BodyState)>>(iter: I) -> Self {
        Self {
            bodies: iter.into_iter().collect(),
        }
    }
}
