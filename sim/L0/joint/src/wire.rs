//! Fixed binary layout for handing rows to a native solver.
//!
//! Joints work in `f64` nalgebra types. Native solvers read packed `f32`
//! triples, so conversion happens here and nowhere else: wrap a
//! [`RawRowSink`] in a [`WireSink`] and pass that to the joints. Every
//! `f64` to `f32` cast in the crate lives in this module.

#![allow(clippy::cast_possible_truncation)]

use nalgebra::{
    Isometry3, Matrix3, Matrix4, Point3, Rotation3, Translation3, UnitQuaternion, Vector3,
};

use crate::sink::{BallSocketLimits, ConstraintRowSink};

/// Three packed `f32` values, laid out as `float[3]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WireVec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl WireVec3 {
    /// Create from components.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Raw bytes in native endianness.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Widen back to an nalgebra vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }
}

impl From<&Vector3<f64>> for WireVec3 {
    fn from(v: &Vector3<f64>) -> Self {
        Self::new(v.x as f32, v.y as f32, v.z as f32)
    }
}

impl From<&Point3<f64>> for WireVec3 {
    fn from(p: &Point3<f64>) -> Self {
        Self::from(&p.coords)
    }
}

/// A column-major `float[16]` transform, as native solvers report body poses.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WireMatrix4 {
    /// Columns, each `[x, y, z, w]`.
    pub cols: [[f32; 4]; 4],
}

impl Default for WireMatrix4 {
    fn default() -> Self {
        Self::from(&Isometry3::identity())
    }
}

impl WireMatrix4 {
    /// Raw bytes in native endianness.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Rigid part of the matrix. Scale and shear are dropped by
    /// re-orthonormalizing the rotation block.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        let m = Matrix4::from_fn(|row, col| f64::from(self.cols[col][row]));
        let block: Matrix3<f64> = m.fixed_view::<3, 3>(0, 0).into_owned();
        let rotation = Rotation3::from_matrix(&block);
        Isometry3::from_parts(
            Translation3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]),
            UnitQuaternion::from_rotation_matrix(&rotation),
        )
    }
}

impl From<&Isometry3<f64>> for WireMatrix4 {
    fn from(iso: &Isometry3<f64>) -> Self {
        let m = iso.to_homogeneous();
        let mut cols = [[0.0_f32; 4]; 4];
        for (col, out) in cols.iter_mut().enumerate() {
            for (row, value) in out.iter_mut().enumerate() {
                *value = m[(row, col)] as f32;
            }
        }
        Self { cols }
    }
}

/// Row interface of a native solver, in wire types.
///
/// Limits of a native ball constraint use `0.0` to mean "disabled".
pub trait RawRowSink {
    /// Add a linear row.
    fn add_linear_row(&mut self, point_a: &WireVec3, point_b: &WireVec3, direction: &WireVec3);
    /// Add an angular row.
    fn add_angular_row(&mut self, relative_angle: f32, axis: &WireVec3);
    /// Set stiffness of the last row.
    fn set_row_stiffness(&mut self, stiffness: f32);
    /// Set lower bound of the last row.
    fn set_row_minimum_friction(&mut self, friction: f32);
    /// Set upper bound of the last row.
    fn set_row_maximum_friction(&mut self, friction: f32);
    /// Set acceleration of the last row.
    fn set_row_acceleration(&mut self, acceleration: f32);
    /// Create the native ball constraint.
    fn attach_ball_socket(&mut self, pivot: &WireVec3, pin: &WireVec3);
    /// Set native ball cone and twist limits.
    fn set_ball_cone_limits(&mut self, pin: &WireVec3, max_cone: f32, max_twist: f32);
}

/// Adapts a [`RawRowSink`] to the [`ConstraintRowSink`] joints submit to.
#[derive(Debug, Default)]
pub struct WireSink<R> {
    raw: R,
}

impl<R: RawRowSink> WireSink<R> {
    /// Wrap a raw sink.
    pub fn new(raw: R) -> Self {
        Self { raw }
    }

    /// Access the wrapped sink.
    pub fn raw(&self) -> &R {
        &self.raw
    }

    /// Unwrap the raw sink.
    pub fn into_inner(self) -> R {
        self.raw
    }
}

impl<R: RawRowSink> ConstraintRowSink for WireSink<R> {
    fn add_linear_row(
        &mut self,
        point_a: &Point3<f64>,
        point_b: &Point3<f64>,
        direction: &Vector3<f64>,
    ) {
        self.raw
            .add_linear_row(&point_a.into(), &point_b.into(), &direction.into());
    }

    fn add_angular_row(&mut self, relative_angle: f64, axis: &Vector3<f64>) {
        self.raw.add_angular_row(relative_angle as f32, &axis.into());
    }

    fn set_row_stiffness(&mut self, stiffness: f64) {
        self.raw.set_row_stiffness(stiffness as f32);
    }

    fn set_row_minimum_friction(&mut self, friction: f64) {
        self.raw.set_row_minimum_friction(friction as f32);
    }

    fn set_row_maximum_friction(&mut self, friction: f64) {
        self.raw.set_row_maximum_friction(friction as f32);
    }

    fn set_row_acceleration(&mut self, acceleration: f64) {
        self.raw.set_row_acceleration(acceleration as f32);
    }

    fn attach_ball_socket(&mut self, pivot: &Point3<f64>, pin: &Vector3<f64>) {
        self.raw.attach_ball_socket(&pivot.into(), &pin.into());
    }

    fn set_ball_socket_limits(&mut self, limits: &BallSocketLimits) {
        self.raw.set_ball_cone_limits(
            &(&limits.pin).into(),
            limits.max_cone.unwrap_or(0.0) as f32,
            limits.max_twist.unwrap_or(0.0) as f32,
        );
    }
}
