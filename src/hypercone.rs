use log::debug;
use rand::Rng;

use crate::collapse::{collapse_points, CollapseMode, CollapsedPoints};
use crate::error::PipelineError;
use crate::matrix_operations::matrix_vector_multiply;

/// (x, y, z, w)
pub type Sample4D = [f32; 4];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcceptanceMode {
    /// Keep points on or inside the boundary cone w² = x² + y² + z².
    #[default]
    Volume,
    // A shell mode keeping only points within `threshold` of the boundary would go here.
}

impl AcceptanceMode {
    pub fn accepts(self, [x, y, z, w]: Sample4D) -> bool {
        match self {
            AcceptanceMode::Volume => w * w <= x * x + y * y + z * z,
        }
    }
}

/// Rejection-sampled points of the 4D hypercone, transformed in place by the later stages.
#[derive(Clone, Debug, Default)]
pub struct Hypercone {
    points: Vec<Sample4D>,
}

impl Hypercone {
    /// Draws `n` candidates uniformly from the cube [min_value, max_value]^4 and keeps the
    /// accepted ones in candidate order. The accepted count is random; there is no top-up.
    /// The cube's width must itself be finite. A zero-width cube yields `n` copies of the
    /// same point (c, c, c, c), all accepted since c² <= 3c².
    pub fn sample<R: Rng + ?Sized>(
        n: usize,
        min_value: f32,
        max_value: f32,
        threshold: f32,
        rng: &mut R,
    ) -> Result<Self, PipelineError> {
        let width = max_value - min_value;
        if !(min_value.is_finite() && max_value.is_finite() && width.is_finite() && min_value <= max_value) {
            return Err(PipelineError::InvalidRange { min: min_value, max: max_value });
        }

        let mode = AcceptanceMode::Volume;
        let mut points = Vec::with_capacity(n);
        for _ in 0..n {
            let candidate: Sample4D = [
                rng.gen_range(min_value..=max_value),
                rng.gen_range(min_value..=max_value),
                rng.gen_range(min_value..=max_value),
                rng.gen_range(min_value..=max_value),
            ];
            if mode.accepts(candidate) {
                points.push(candidate);
            }
        }

        debug!(
            "hypercone: accepted {} of {} candidates in [{min_value}, {max_value}] (threshold {threshold} unused by {mode:?})",
            points.len(),
            n
        );

        Ok(Self { points })
    }

    pub fn from_points(points: Vec<Sample4D>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Sample4D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn transform(&mut self, matrix: &[[f32; 4]; 4]) {
        for point in &mut self.points {
            *point = matrix_vector_multiply(matrix, *point);
        }
    }

    pub fn scale(&mut self, scale: f32) {
        for point in &mut self.points {
            for v in point.iter_mut() {
                *v *= scale;
            }
        }
    }

    pub fn collapse(&self, mode: CollapseMode) -> CollapsedPoints {
        collapse_points(&self.points, mode)
    }
}
