#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("range [{min}, {max}] has zero width and cannot be normalized")]
    DegenerateRange { min: f32, max: f32 },
    #[error("collapse mode {0} is not one of 0 (x), 1 (y), 2 (z), 3 (w)")]
    InvalidCollapseMode(i32),
    #[error("no points left to process")]
    EmptySet,
    #[error("invalid range: min {min} must be below max {max}")]
    InvalidRange { min: f32, max: f32 },
    #[error("got {positions} positions but {colors} colors")]
    LengthMismatch { positions: usize, colors: usize },
}
