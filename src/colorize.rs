use crate::range_filter::{FilteredPoints, ValueRange};

/// 8-bit RGBA.
pub type Color32 = [u8; 4];

pub const BLUE: Color32 = [0, 0, 255, 255];
pub const GREEN: Color32 = [0, 255, 0, 255];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Red, green and blue follow the normalized x, y and z of the 3D position.
    #[default]
    Position,
    /// Low-to-high gradient over the collapsed value.
    Gradient,
}

impl ColorMode {
    /// 0 selects position coloring; anything else the gradient.
    pub fn from_selector(selector: i32) -> Self {
        if selector == 0 {
            ColorMode::Position
        } else {
            ColorMode::Gradient
        }
    }

    pub fn selector(self) -> i32 {
        match self {
            ColorMode::Position => 0,
            ColorMode::Gradient => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ColorMode::Position => ColorMode::Gradient,
            ColorMode::Gradient => ColorMode::Position,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorMode::Position => "position",
            ColorMode::Gradient => "gradient",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gradient {
    pub low: Color32,
    pub high: Color32,
}

impl Default for Gradient {
    fn default() -> Self {
        Self { low: BLUE, high: GREEN }
    }
}

impl Gradient {
    pub fn sample(&self, t: f32) -> Color32 {
        let t = t.clamp(0.0, 1.0);
        std::array::from_fn(|i| {
            let a = self.low[i] as f32;
            let b = self.high[i] as f32;
            (a + (b - a) * t) as u8
        })
    }
}

fn unit_to_byte(t: f32) -> u8 {
    (t * 255.0) as u8
}

pub fn color_by_position(positions: &[[f32; 3]]) -> Vec<Color32> {
    let axis_range = |axis: usize| {
        ValueRange::of(positions.iter().map(|p| p[axis])).unwrap_or(ValueRange::new(0.0, 0.0))
    };
    let ranges = [axis_range(0), axis_range(1), axis_range(2)];

    positions
        .iter()
        .map(|p| {
            [
                unit_to_byte(ranges[0].normalize(p[0])),
                unit_to_byte(ranges[1].normalize(p[1])),
                unit_to_byte(ranges[2].normalize(p[2])),
                255,
            ]
        })
        .collect()
}

pub fn color_by_gradient(values: &[f32], range: ValueRange, gradient: &Gradient) -> Vec<Color32> {
    values.iter().map(|&v| gradient.sample(range.normalize(v))).collect()
}

pub fn colorize(filtered: &FilteredPoints, mode: ColorMode, gradient: &Gradient) -> Vec<Color32> {
    match mode {
        ColorMode::Position => color_by_position(&filtered.positions),
        ColorMode::Gradient => color_by_gradient(&filtered.values, filtered.visible_range, gradient),
    }
}
