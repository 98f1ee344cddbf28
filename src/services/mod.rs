pub mod pipeline;

pub use pipeline::{
    Boundary, KernelPreset, KernelSpec, Pipeline, PipelineReport, Recipe, SkippedStep, Step,
};
