use bytemuck::{Pod, Zeroable};

use crate::colorize::Color32;
use crate::error::PipelineError;

const MAX_BRIGHTNESS: f32 = 16.0;

/// RGB scaled against a shared brightness byte: bytes `[R, G, B, Y]`, R in the low byte.
/// Decoding gives `C * Y * 16 / 255²`, so colors up to 16x over white survive at 8 bits
/// per channel. Lossy; alpha is not kept.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(transparent)]
pub struct PackedColor(pub u32);

impl PackedColor {
    pub fn encode(color: [f32; 4]) -> Self {
        let y = color[0].max(color[1]).max(color[2]);
        let y = (y * 255.0 / MAX_BRIGHTNESS).ceil().clamp(1.0, 255.0);
        let scale = 255.0 * 255.0 / (y * MAX_BRIGHTNESS);
        let channel = |v: f32| (v * scale).clamp(0.0, 255.0) as u32;

        Self(channel(color[0]) | channel(color[1]) << 8 | channel(color[2]) << 16 | (y as u32) << 24)
    }

    pub fn encode_color32(color: Color32) -> Self {
        Self::encode(color.map(|c| c as f32 / 255.0))
    }

    pub fn decode(self) -> [f32; 4] {
        let data = self.0;
        let r = (data & 0xff) as f32;
        let g = ((data >> 8) & 0xff) as f32;
        let b = ((data >> 16) & 0xff) as f32;
        let y = self.brightness() as f32;
        let scale = y * MAX_BRIGHTNESS / (255.0 * 255.0);
        [r * scale, g * scale, b * scale, 1.0]
    }

    pub fn brightness(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

/// One stored point; 16 bytes, uploaded to the GPU as-is.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointRecord {
    pub position: [f32; 3],
    pub color: PackedColor,
}

pub const POINT_RECORD_SIZE: usize = std::mem::size_of::<PointRecord>();

/// Canonical point array plus a version bumped on every replacement.
#[derive(Debug, Default)]
pub struct PointCloudStore {
    points: Vec<PointRecord>,
    data_version: u64,
}

impl PointCloudStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    /// Replaces every stored point. The version moves even when the content does not.
    pub fn initialize(&mut self, positions: &[[f32; 3]], colors: &[Color32]) -> Result<(), PipelineError> {
        if positions.len() != colors.len() {
            return Err(PipelineError::LengthMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }

        self.points = positions
            .iter()
            .zip(colors)
            .map(|(&position, &color)| PointRecord {
                position,
                color: PackedColor::encode_color32(color),
            })
            .collect();
        self.data_version += 1;
        Ok(())
    }

    pub fn try_get_points(&self) -> Option<(Vec<[f32; 3]>, Vec<[f32; 4]>)> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.points.iter().map(|p| (p.position, p.color.decode())).unzip())
    }

    pub fn records(&self) -> &[PointRecord] {
        &self.points
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }
}
