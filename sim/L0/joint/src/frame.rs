//! Joint attach frames and per-step geometry.
//!
//! An attach frame is a rigid transform whose local +Z axis is the joint's
//! pin direction. At connect time the joint caches one frame per body in
//! that body's local space; each step [`JointFrame`] rebuilds both frames
//! in world space from the current body transforms.

use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};
use sim_joint_types::{BodyState, JointConfig};

/// Below this planar magnitude a pin direction counts as vertical when
/// choosing the frame's X axis.
const ARBITRARY_AXIS_LIMIT: f64 = 1.0 / 64.0;

/// Build an attach frame at `position` whose +Z axis is `direction`.
///
/// X is picked with the arbitrary-axis rule: `Y × Z` for near-vertical pins,
/// `Z_world × Z` otherwise. `direction` must be non-zero.
#[must_use]
pub fn attach_pose(position: &Point3<f64>, direction: &Vector3<f64>) -> Isometry3<f64> {
    let z = direction.normalize();
    let reference = if z.x.abs() < ARBITRARY_AXIS_LIMIT && z.y.abs() < ARBITRARY_AXIS_LIMIT {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let x = reference.cross(&z).normalize();
    let y = z.cross(&x);

    let basis = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
    Isometry3::from_parts(
        Translation3::from(position.coords),
        UnitQuaternion::from_rotation_matrix(&basis),
    )
}

/// Signed angle from `from` to `to` measured about `axis`.
///
/// Both vectors are expected to be roughly perpendicular to `axis`; only
/// the projection on the plane normal to `axis` contributes to the sine.
#[must_use]
pub fn signed_angle(from: &Vector3<f64>, to: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    from.cross(to).dot(axis).atan2(from.dot(to))
}

/// World-space geometry of a connected joint for one step.
///
/// Index 0 refers to the child attach frame, index 1 to the parent's (or the
/// world's, when the joint has no parent).
#[derive(Debug, Clone, Copy)]
pub struct JointFrame<'a> {
    /// Child attach frame in world space.
    pub matrix0: Isometry3<f64>,
    /// Parent (or world) attach frame in world space.
    pub matrix1: Isometry3<f64>,
    /// Child body snapshot.
    pub child: BodyState,
    /// Parent body snapshot, `None` for the world.
    pub parent: Option<BodyState>,
    /// Step duration in seconds.
    pub timestep: f64,
    /// Stiffness applied to regular rows.
    pub stiffness: f64,
    /// Joint configuration.
    pub config: &'a JointConfig,
}

impl JointFrame<'_> {
    /// Child pivot (frame 0 origin).
    #[must_use]
    pub fn pivot0(&self) -> Point3<f64> {
        Point3::from(self.matrix0.translation.vector)
    }

    /// Parent pivot (frame 1 origin).
    #[must_use]
    pub fn pivot1(&self) -> Point3<f64> {
        Point3::from(self.matrix1.translation.vector)
    }

    /// Child frame X axis.
    #[must_use]
    pub fn x0(&self) -> Vector3<f64> {
        self.matrix0.rotation * Vector3::x()
    }

    /// Child frame Y axis.
    #[must_use]
    pub fn y0(&self) -> Vector3<f64> {
        self.matrix0.rotation * Vector3::y()
    }

    /// Child frame Z (pin) axis.
    #[must_use]
    pub fn z0(&self) -> Vector3<f64> {
        self.matrix0.rotation * Vector3::z()
    }

    /// Parent frame X axis.
    #[must_use]
    pub fn x1(&self) -> Vector3<f64> {
        self.matrix1.rotation * Vector3::x()
    }

    /// Parent frame Y axis.
    #[must_use]
    pub fn y1(&self) -> Vector3<f64> {
        self.matrix1.rotation * Vector3::y()
    }

    /// Parent frame Z (pin) axis.
    #[must_use]
    pub fn z1(&self) -> Vector3<f64> {
        self.matrix1.rotation * Vector3::z()
    }

    /// Offset-point lever arm.
    #[must_use]
    pub fn pin_length(&self) -> f64 {
        self.config.pin_length
    }

    /// Points one lever arm along each frame's pin axis.
    #[must_use]
    pub fn axial_points(&self) -> (Point3<f64>, Point3<f64>) {
        let l = self.pin_length();
        (self.pivot0() + self.z0() * l, self.pivot1() + self.z1() * l)
    }

    /// Points one lever arm along each frame's X axis.
    #[must_use]
    pub fn lateral_points(&self) -> (Point3<f64>, Point3<f64>) {
        let l = self.pin_length();
        (self.pivot0() + self.x0() * l, self.pivot1() + self.x1() * l)
    }

    /// Sine and cosine of the child's rotation about the parent pin,
    /// measured from the Y axes.
    ///
    /// The operand order makes the angle positive when the child turns
    /// positively about `z1`, matching [`Self::angular_velocity_about`].
    #[must_use]
    pub fn measure_angle(&self) -> (f64, f64) {
        let y0 = self.y0();
        let y1 = self.y1();
        (y1.cross(&y0).dot(&self.z1()), y1.dot(&y0))
    }

    /// Child angular velocity relative to the parent.
    #[must_use]
    pub fn relative_omega(&self) -> Vector3<f64> {
        self.child.omega - self.parent.map_or_else(Vector3::zeros, |p| p.omega)
    }

    /// Relative angular velocity projected on `axis`.
    #[must_use]
    pub fn angular_velocity_about(&self, axis: &Vector3<f64>) -> f64 {
        self.relative_omega().dot(axis)
    }

    /// Relative velocity of the two pivots projected on `axis`.
    #[must_use]
    pub fn linear_velocity_along(&self, axis: &Vector3<f64>) -> f64 {
        let v0 = self.child.point_velocity(&self.pivot0());
        let v1 = self
            .parent
            .map_or_else(Vector3::zeros, |p| p.point_velocity(&self.pivot1()));
        (v0 - v1).dot(axis)
    }

    /// Offset of the child pivot from the parent pivot along the parent pin.
    #[must_use]
    pub fn pin_offset(&self) -> f64 {
        (self.pivot0() - self.pivot1()).dot(&self.z1())
    }

    /// Child attach frame expressed in the parent attach frame.
    #[must_use]
    pub fn relative_transform(&self) -> Isometry3<f64> {
        self.matrix1.inverse() * self.matrix0
    }
}
