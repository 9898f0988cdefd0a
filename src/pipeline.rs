use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collapse::CollapseMode;
use crate::colorize::{colorize, Color32, ColorMode};
use crate::config::GeneratorConfig;
use crate::error::PipelineError;
use crate::hypercone::Hypercone;
use crate::point_cloud::PointCloudStore;
use crate::range_filter::{filter_by_window, FourthDimWindow};
use crate::rotation::RotationAngles;

/// Control-panel state for one regeneration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationRequest {
    pub angles: RotationAngles,
    pub collapse_selector: i32,
    pub coloring_selector: i32,
    pub min_percent: f32,
    pub max_percent: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloudSnapshot {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<Color32>,
    pub requested_samples: usize,
    pub accepted_samples: usize,
}

impl PointCloudSnapshot {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Over-request samples in proportion to how much of the collapsed axis the window hides,
/// so the visible count stays near `num_points`. Truncates; not a guarantee.
pub fn requested_sample_count(num_points: usize, window: FourthDimWindow) -> usize {
    (num_points as f32 / window.width()) as usize
}

/// sample -> rotate -> scale -> collapse -> filter -> color.
pub fn regenerate<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    request: &GenerationRequest,
    rng: &mut R,
) -> Result<PointCloudSnapshot, PipelineError> {
    let collapse = CollapseMode::try_from(request.collapse_selector)?;
    let coloring = ColorMode::from_selector(request.coloring_selector);
    let window = FourthDimWindow::new(request.min_percent, request.max_percent)?;
    let requested_samples = requested_sample_count(config.num_points, window);

    let matrix = request.angles.compose();
    let mut cone = Hypercone::sample(
        requested_samples,
        config.min_value,
        config.max_value,
        config.threshold,
        rng,
    )?;
    cone.transform(&matrix);
    cone.scale(config.scale);
    let accepted_samples = cone.len();

    let filtered = filter_by_window(cone.collapse(collapse), window)?;
    let colors = colorize(&filtered, coloring, &config.gradient);

    Ok(PointCloudSnapshot {
        positions: filtered.positions,
        colors,
        requested_samples,
        accepted_samples,
    })
}

/// Owns the random source and commits successful runs into a store.
pub struct Generator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn regenerate(&mut self, request: &GenerationRequest) -> Result<PointCloudSnapshot, PipelineError> {
        regenerate(&self.config, request, &mut self.rng)
    }

    /// The store is only touched once the whole pipeline has succeeded.
    pub fn regenerate_into(
        &mut self,
        store: &mut PointCloudStore,
        request: &GenerationRequest,
    ) -> Result<(), PipelineError> {
        let snapshot = self.regenerate(request)?;
        store.initialize(&snapshot.positions, &snapshot.colors)?;
        info!(
            "regenerated {} points ({} sampled, {} accepted), data version {}",
            snapshot.len(),
            snapshot.requested_samples,
            snapshot.accepted_samples,
            store.data_version()
        );
        Ok(())
    }
}
