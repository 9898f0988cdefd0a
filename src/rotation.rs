use std::f32::consts::TAU;

use crate::matrix_operations::{identity_matrix, matrix_multiply, rotation_matrix_plane};

pub const AXIS_X: usize = 0;
pub const AXIS_Y: usize = 1;
pub const AXIS_Z: usize = 2;
pub const AXIS_W: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationPlane {
    Zw,
    Yw,
    Yz,
    Xw,
    Xz,
    Xy,
}

impl RotationPlane {
    /// Composition order, outermost first.
    pub const ALL: [RotationPlane; 6] = [
        RotationPlane::Zw,
        RotationPlane::Yw,
        RotationPlane::Yz,
        RotationPlane::Xw,
        RotationPlane::Xz,
        RotationPlane::Xy,
    ];

    pub fn axes(self) -> (usize, usize) {
        match self {
            RotationPlane::Zw => (AXIS_Z, AXIS_W),
            RotationPlane::Yw => (AXIS_Y, AXIS_W),
            RotationPlane::Yz => (AXIS_Y, AXIS_Z),
            RotationPlane::Xw => (AXIS_X, AXIS_W),
            RotationPlane::Xz => (AXIS_X, AXIS_Z),
            RotationPlane::Xy => (AXIS_X, AXIS_Y),
        }
    }

    pub fn index(self) -> usize {
        match self {
            RotationPlane::Zw => 0,
            RotationPlane::Yw => 1,
            RotationPlane::Yz => 2,
            RotationPlane::Xw => 3,
            RotationPlane::Xz => 4,
            RotationPlane::Xy => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RotationPlane::Zw => "ZW",
            RotationPlane::Yw => "YW",
            RotationPlane::Yz => "YZ",
            RotationPlane::Xw => "XW",
            RotationPlane::Xz => "XZ",
            RotationPlane::Xy => "XY",
        }
    }

    pub fn elementary_matrix(self, angle: f32) -> [[f32; 4]; 4] {
        let (a, b) = self.axes();
        rotation_matrix_plane::<4>(a, b, angle)
    }
}

/// One angle per coordinate plane, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationAngles {
    pub zw: f32,
    pub yw: f32,
    pub yz: f32,
    pub xw: f32,
    pub xz: f32,
    pub xy: f32,
}

impl RotationAngles {
    pub fn new(zw: f32, yw: f32, yz: f32, xw: f32, xz: f32, xy: f32) -> Self {
        Self { zw, yw, yz, xw, xz, xy }
    }

    /// Normalized [0,1] controls, indexed like `RotationPlane::index`.
    pub fn from_controls(controls: [f32; 6]) -> Self {
        Self::new(
            controls[0] * TAU,
            controls[1] * TAU,
            controls[2] * TAU,
            controls[3] * TAU,
            controls[4] * TAU,
            controls[5] * TAU,
        )
    }

    pub fn angle(&self, plane: RotationPlane) -> f32 {
        match plane {
            RotationPlane::Zw => self.zw,
            RotationPlane::Yw => self.yw,
            RotationPlane::Yz => self.yz,
            RotationPlane::Xw => self.xw,
            RotationPlane::Xz => self.xz,
            RotationPlane::Xy => self.xy,
        }
    }

    /// M = Rzw · Ryw · Ryz · Rxw · Rxz · Rxy, so Rxy acts on a column vector first.
    pub fn compose(&self) -> [[f32; 4]; 4] {
        RotationPlane::ALL.iter().fold(identity_matrix(), |m, &plane| {
            matrix_multiply(m, plane.elementary_matrix(self.angle(plane)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix_operations::{determinant_4d, matrix_vector_multiply};

    fn assert_matrix_close(a: &[[f32; 4]; 4], b: &[[f32; 4]; 4]) {
        for i in 0..4 {
            for j in 0..4 {
                assert!(
                    (a[i][j] - b[i][j]).abs() < 1e-5,
                    "mismatch at [{i}][{j}]: {} vs {}",
                    a[i][j],
                    b[i][j]
                );
            }
        }
    }

    #[test]
    fn zero_angles_compose_to_identity() {
        assert_matrix_close(&RotationAngles::default().compose(), &identity_matrix());
    }

    #[test]
    fn full_turn_controls_compose_to_identity() {
        let angles = RotationAngles::from_controls([1.0; 6]);
        assert_matrix_close(&angles.compose(), &identity_matrix());
    }

    #[test]
    fn composed_transform_is_a_pure_rotation() {
        let samples = [
            [0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            [0.9, 0.05, 0.77, 0.31, 0.0, 0.42],
            [0.25, 0.25, 0.25, 0.25, 0.25, 0.25],
            [0.6, 0.0, 0.0, 0.0, 0.0, 0.13],
        ];
        for controls in samples {
            let m = RotationAngles::from_controls(controls).compose();
            assert!((determinant_4d(&m) - 1.0).abs() < 1e-4);
            // Orthonormal rows.
            for i in 0..4 {
                for j in 0..4 {
                    let dot: f32 = (0..4).map(|k| m[i][k] * m[j][k]).sum();
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert!((dot - expected).abs() < 1e-4);
                }
            }
        }
    }

    #[test]
    fn xy_plane_is_applied_first() {
        let quarter = std::f32::consts::FRAC_PI_2;
        let angles = RotationAngles { xy: quarter, yw: quarter, ..Default::default() };
        let m = angles.compose();

        // x -> y under Rxy, then y -> w under Ryw.
        let v = matrix_vector_multiply(&m, [1.0, 0.0, 0.0, 0.0]);
        assert!(v[0].abs() < 1e-5);
        assert!(v[1].abs() < 1e-5);
        assert!(v[2].abs() < 1e-5);
        assert!((v[3] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn composition_order_matters() {
        let angles = RotationAngles::new(0.0, 0.7, 0.0, 0.0, 0.0, 1.3);
        let composed = angles.compose();
        let reversed = matrix_multiply(
            RotationPlane::Xy.elementary_matrix(1.3),
            RotationPlane::Yw.elementary_matrix(0.7),
        );
        let forward = matrix_multiply(
            RotationPlane::Yw.elementary_matrix(0.7),
            RotationPlane::Xy.elementary_matrix(1.3),
        );
        assert_matrix_close(&composed, &forward);
        let differs = (0..4).any(|i| (0..4).any(|j| (composed[i][j] - reversed[i][j]).abs() > 1e-3));
        assert!(differs);
    }
}
