use cgmath::{Matrix4, SquareMatrix};

pub fn identity_matrix<const N: usize>() -> [[f32; N]; N] {
    let mut result = [[0.0; N]; N];
    for i in 0..N {
        result[i][i] = 1.0;
    }
    result
}

/// Rotation confined to the plane spanned by axes `a` and `b`.
/// cos lands on (a,a) and (b,b), -sin on (a,b) and +sin on (b,a).
pub fn rotation_matrix_plane<const N: usize>(a: usize, b: usize, angle: f32) -> [[f32; N]; N] {
    let cos_theta = angle.cos();
    let sin_theta = angle.sin();
    let mut result = identity_matrix::<N>();
    result[a][a] = cos_theta;
    result[a][b] = -sin_theta;
    result[b][a] = sin_theta;
    result[b][b] = cos_theta;
    result
}

pub fn matrix_multiply<const N: usize> (a: [[f32; N]; N], b: [[f32; N]; N]) -> [[f32; N]; N] {
    let mut result = [[0.0; N]; N];
    for i in 0..N {
        for j in 0..N {
            for k in 0..N {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Row-major matrix times column vector.
pub fn matrix_vector_multiply<const N: usize>(m: &[[f32; N]; N], v: [f32; N]) -> [f32; N] {
    let mut result = [0.0; N];
    for i in 0..N {
        for j in 0..N {
            result[i] += m[i][j] * v[j];
        }
    }
    result
}

pub fn determinant_4d(m: &[[f32; 4]; 4]) -> f32 {
    // cgmath takes columns, but det(M^T) == det(M).
    Matrix4::from(*m).determinant()
}

/// Column-major layout expected by WGSL `mat4x4<f32>`.
pub fn flatten_4x4_matrix_for_wgpu(matrix: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix.into()
}
