//! Matrix <-> TRS transform codec
//!
//! Converts between the two transform encodings a node may carry and between
//! the document's right-handed convention and the host engine's local
//! convention. Everything here is pure and reentrant.

use glam::{Mat4, Quat, Vec3, Vec4};

/// Scale (1, 1, -1): flips the third axis
pub const HANDEDNESS_FLIP: Mat4 = Mat4::from_cols(Vec4::X, Vec4::Y, Vec4::NEG_Z, Vec4::W);

/// Per-row sign pattern of [`HANDEDNESS_FLIP`]
const FLIP_SIGNS: Vec4 = Vec4::new(1.0, 1.0, -1.0, 1.0);

/// Decomposed translation / rotation / scale
///
/// Composes as `translation * rotation * scale`: scale is applied to a vertex
/// first, then rotation, then translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trs {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Trs {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Exact comparison against the documented defaults
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn to_matrix(&self) -> Mat4 {
        compose(self)
    }
}

impl Default for Trs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node transform in exactly one of its two encodings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Explicit column-major matrix
    Matrix(Mat4),
    /// Separate translation / rotation / scale properties
    Decomposed(Trs),
}

impl Transform {
    pub const IDENTITY: Self = Self::Matrix(Mat4::IDENTITY);

    /// The authoritative matrix: stored as-is, or composed from TRS
    pub fn matrix(&self) -> Mat4 {
        match self {
            Transform::Matrix(m) => *m,
            Transform::Decomposed(trs) => trs.to_matrix(),
        }
    }

    /// Stored TRS, or the decomposition of the stored matrix
    pub fn trs(&self) -> Trs {
        match self {
            Transform::Matrix(m) => decompose(m),
            Transform::Decomposed(trs) => *trs,
        }
    }

    pub fn is_decomposed(&self) -> bool {
        matches!(self, Transform::Decomposed(_))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Narrow view of the host engine's live transform object
pub trait LocalTransform {
    fn local_transform(&self) -> Trs;
    fn set_local_transform(&mut self, trs: Trs);
}

/// Conjugate with [`HANDEDNESS_FLIP`]: `flip * m * flip`
///
/// Element `(row, col)` is multiplied by `sign(row) * sign(col)`, which is
/// exactly the matrix product without the rounding of a full multiply.
/// Applying it twice returns the input unchanged.
pub fn flip_handedness(m: Mat4) -> Mat4 {
    Mat4::from_cols(
        m.x_axis * FLIP_SIGNS,
        m.y_axis * FLIP_SIGNS,
        m.z_axis * -FLIP_SIGNS,
        m.w_axis * FLIP_SIGNS,
    )
}

/// Build `translation * rotation * scale`
pub fn compose(trs: &Trs) -> Mat4 {
    Mat4::from_scale_rotation_translation(trs.scale, trs.rotation, trs.translation)
}

/// Split a shear-free affine matrix into translation, rotation and scale
///
/// Rotation uses the trace formula on the scale-normalized basis. An axis of
/// zero scale is recovered from the other two. Near a 180
/// degree rotation `w` approaches zero and x/y/z stop being finite; those
/// components are replaced by 0. Inputs in that range do not round-trip.
pub fn decompose(m: &Mat4) -> Trs {
    let translation = m.w_axis.truncate();

    let x_axis = m.x_axis.truncate();
    let y_axis = m.y_axis.truncate();
    let z_axis = m.z_axis.truncate();
    let scale = Vec3::new(x_axis.length(), y_axis.length(), z_axis.length());

    let unit = |axis: Vec3, length: f32| if length > 0.0 { axis / length } else { axis };
    let mut x_axis = unit(x_axis, scale.x);
    let mut y_axis = unit(y_axis, scale.y);
    let mut z_axis = unit(z_axis, scale.z);

    // A single collapsed axis is rebuilt from the other two
    match (scale.x > 0.0, scale.y > 0.0, scale.z > 0.0) {
        (false, true, true) => x_axis = y_axis.cross(z_axis),
        (true, false, true) => y_axis = z_axis.cross(x_axis),
        (true, true, false) => z_axis = x_axis.cross(y_axis),
        _ => {}
    }

    // m{row}{col}; column c is the c-th basis axis
    let (m00, m10, m20) = (x_axis.x, x_axis.y, x_axis.z);
    let (m01, m11, m21) = (y_axis.x, y_axis.y, y_axis.z);
    let (m02, m12, m22) = (z_axis.x, z_axis.y, z_axis.z);

    let w = (1.0 + m00 + m11 + m22).max(0.0).sqrt() / 2.0;
    let w4 = 4.0 * w;
    let rotation = Quat::from_xyzw(
        finite_or_zero((m21 - m12) / w4),
        finite_or_zero((m02 - m20) / w4),
        finite_or_zero((m10 - m01) / w4),
        w,
    );

    Trs {
        translation,
        rotation,
        scale,
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

/// Project a document transform into host-local TRS
pub fn import_to_host(transform: &Transform) -> Trs {
    decompose(&flip_handedness(transform.matrix()))
}

/// Convert host-local TRS into document-convention TRS
pub fn export_from_host(host: &Trs) -> Trs {
    decompose(&flip_handedness(compose(host)))
}
