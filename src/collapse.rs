use crate::error::PipelineError;

/// Which 4D coordinate is dropped when projecting to 3D.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollapseMode {
    DropX,
    DropY,
    DropZ,
    #[default]
    DropW,
}

impl CollapseMode {
    pub const ALL: [CollapseMode; 4] = [
        CollapseMode::DropX,
        CollapseMode::DropY,
        CollapseMode::DropZ,
        CollapseMode::DropW,
    ];

    pub fn selector(self) -> i32 {
        match self {
            CollapseMode::DropX => 0,
            CollapseMode::DropY => 1,
            CollapseMode::DropZ => 2,
            CollapseMode::DropW => 3,
        }
    }

    pub fn next(self) -> Self {
        match self {
            CollapseMode::DropX => CollapseMode::DropY,
            CollapseMode::DropY => CollapseMode::DropZ,
            CollapseMode::DropZ => CollapseMode::DropW,
            CollapseMode::DropW => CollapseMode::DropX,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CollapseMode::DropX => "collapse X (w, y, z)",
            CollapseMode::DropY => "collapse Y (x, w, z)",
            CollapseMode::DropZ => "collapse Z (x, y, w)",
            CollapseMode::DropW => "collapse W (x, y, z)",
        }
    }

    /// Splits a point into its retained 3D position and the dropped scalar.
    /// The dropped axis' slot is filled by w.
    pub fn project(self, [x, y, z, w]: [f32; 4]) -> ([f32; 3], f32) {
        match self {
            CollapseMode::DropX => ([w, y, z], x),
            CollapseMode::DropY => ([x, w, z], y),
            CollapseMode::DropZ => ([x, y, w], z),
            CollapseMode::DropW => ([x, y, z], w),
        }
    }
}

impl TryFrom<i32> for CollapseMode {
    type Error = PipelineError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CollapseMode::DropX),
            1 => Ok(CollapseMode::DropY),
            2 => Ok(CollapseMode::DropZ),
            3 => Ok(CollapseMode::DropW),
            other => Err(PipelineError::InvalidCollapseMode(other)),
        }
    }
}

/// Index-aligned projection output: `positions[i]` and `values[i]` come from the same 4D point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollapsedPoints {
    pub positions: Vec<[f32; 3]>,
    pub values: Vec<f32>,
}

impl CollapsedPoints {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, position: [f32; 3], value: f32) {
        self.positions.push(position);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub fn collapse_points(points: &[[f32; 4]], mode: CollapseMode) -> CollapsedPoints {
    let mut collapsed = CollapsedPoints::with_capacity(points.len());
    for &point in points {
        let (position, value) = mode.project(point);
        collapsed.push(position, value);
    }
    collapsed
}
