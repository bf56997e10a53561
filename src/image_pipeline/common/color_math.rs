//! 3x3 matrix helpers for the color pipeline.
//!
//! Every matrix in this crate is a flat, row-major `[f32; 9]`, and
//! [`apply_matrix`] computes `M · v` treating `v` as a column vector.
//! Nothing here transposes implicitly.

use tracing::warn;

/// Row-major 3x3 matrix.
pub type Matrix3 = [f32; 9];

pub const IDENTITY: Matrix3 = [
    1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,
    0.0, 0.0, 1.0,
];

/// XYZ to linear ProPhoto RGB (ROMM, D50 reference white).
pub const XYZ_TO_PROPHOTO: Matrix3 = [
    1.3459433, -0.2556075, -0.0511118,
    -0.5445989, 1.5081673, 0.0205351,
    0.0000000, 0.0000000, 1.2118128,
];

/// ProPhoto luminance weights, used wherever the working space needs a luma.
pub const PROPHOTO_LUMA: [f32; 3] = [0.288040, 0.711874, 0.000086];

/// Returns `a * b`.
pub fn multiply(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut result = [0.0f32; 9];
    for row in 0..3 {
        for col in 0..3 {
            let mut sum = 0.0;
            for k in 0..3 {
                sum += a[row * 3 + k] * b[k * 3 + col];
            }
            result[row * 3 + col] = sum;
        }
    }
    result
}

/// Returns `m · v`.
#[inline]
pub fn apply_matrix(m: &Matrix3, v: [f32; 3]) -> [f32; 3] {
    [
        m[0] * v[0] + m[1] * v[1] + m[2] * v[2],
        m[3] * v[0] + m[4] * v[1] + m[5] * v[2],
        m[6] * v[0] + m[7] * v[1] + m[8] * v[2],
    ]
}

pub fn transpose(m: &Matrix3) -> Matrix3 {
    [m[0], m[3], m[6], m[1], m[4], m[7], m[2], m[5], m[8]]
}

#[inline]
pub fn luminance(rgb: [f32; 3], weights: &[f32; 3]) -> f32 {
    rgb[0] * weights[0] + rgb[1] * weights[1] + rgb[2] * weights[2]
}

/// Builds the camera RGB → ProPhoto matrix as `XYZ_TO_PROPHOTO · cam_to_xyz`.
///
/// `cam_to_xyz` is flat and row-major. A 12-entry slice is read as three rows
/// of four with the fourth column dropped; any other length of at least nine
/// uses the first nine entries. Absent or short input yields the identity so
/// a render can always proceed. No white point adaptation is applied.
pub fn calculate_cam_to_prophoto(cam_to_xyz: Option<&[f32]>) -> Matrix3 {
    let cam = match cam_to_xyz {
        Some(m) if m.len() >= 9 => m,
        _ => {
            warn!("Invalid camera matrix, using identity");
            return IDENTITY;
        }
    };

    let m3x3: Matrix3 = if cam.len() == 12 {
        [
            cam[0], cam[1], cam[2],
            cam[4], cam[5], cam[6],
            cam[8], cam[9], cam[10],
        ]
    } else {
        let mut m = [0.0f32; 9];
        m.copy_from_slice(&cam[..9]);
        m
    };

    multiply(&XYZ_TO_PROPHOTO, &m3x3)
}
