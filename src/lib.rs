pub mod camera;
pub mod collapse;
pub mod colorize;
pub mod config;
pub mod controls;
pub mod error;
pub mod hypercone;
pub mod input;
pub mod matrix_operations;
pub mod pipeline;
pub mod point_cloud;
pub mod point_pass;
pub mod range_filter;
pub mod renderer;
pub mod rotation;
mod app;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub use config::{GeneratorConfig, ViewerConfig};
pub use error::PipelineError;
pub use pipeline::{regenerate, GenerationRequest, Generator, PointCloudSnapshot};
pub use point_cloud::{PackedColor, PointCloudStore, PointRecord};

pub fn run(config: ViewerConfig) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        pollster::block_on(app::arun(config));
    }
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(app::arun(config));
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    run(ViewerConfig::default());
}
