use clap::Parser;

use crate::colorize::Gradient;
use crate::controls::ControlPanel;

/// Numeric knobs of the generator that are not driven by the control panel.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Target visible point count before the fourth-dimension window widens the request.
    pub num_points: usize,
    pub min_value: f32,
    pub max_value: f32,
    /// Reserved for shell sampling; volume sampling ignores it.
    pub threshold: f32,
    pub scale: f32,
    /// Fixed seed for reproducible point sets; entropy when unset.
    pub seed: Option<u64>,
    pub gradient: Gradient,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_points: 1000,
            min_value: -1.0,
            max_value: 1.0,
            threshold: 0.01,
            scale: 1.0,
            seed: None,
            gradient: Gradient::default(),
        }
    }
}

/// Hypercone Playground - interactive 4D hypercone point cloud viewer
#[derive(Parser, Debug)]
#[command(name = "hypercone-playground")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Approximate number of visible points
    #[arg(short, long, default_value_t = 1000)]
    pub num_points: usize,

    /// Lower bound of the sampling cube on every axis
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    pub min_value: f32,

    /// Upper bound of the sampling cube on every axis
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub max_value: f32,

    /// Surface tolerance, reserved for shell sampling
    #[arg(long, default_value_t = 0.01)]
    pub threshold: f32,

    /// Uniform scale applied after rotation
    #[arg(short, long, default_value_t = 1.0)]
    pub scale: f32,

    /// Random seed for reproducible point sets
    #[arg(long)]
    pub seed: Option<u64>,

    /// Axis to collapse: 0 = x, 1 = y, 2 = z, 3 = w
    #[arg(short, long, default_value_t = 3)]
    pub collapse: i32,

    /// Coloring: 0 = by position, anything else = gradient over the collapsed axis
    #[arg(long, default_value_t = 0)]
    pub coloring: i32,

    /// Upload packed point records and decode colors on the GPU
    #[arg(long)]
    pub packed: bool,
}

/// Everything the viewer needs at startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewerConfig {
    pub generator: GeneratorConfig,
    pub controls: ControlPanel,
    pub packed_upload: bool,
}

impl Args {
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            num_points: self.num_points,
            min_value: self.min_value,
            max_value: self.max_value,
            threshold: self.threshold,
            scale: self.scale,
            seed: self.seed,
            ..Default::default()
        }
    }

    pub fn initial_controls(&self) -> ControlPanel {
        ControlPanel {
            collapse_selector: self.collapse,
            coloring_selector: self.coloring,
            ..Default::default()
        }
    }

    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            generator: self.generator_config(),
            controls: self.initial_controls(),
            packed_upload: self.packed,
        }
    }
}
