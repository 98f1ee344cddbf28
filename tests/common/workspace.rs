//! Scratch directory with an offline pipeline for integration tests.

use std::path::{Path, PathBuf};

use imagegene::models::{AppConfig, FontConfig};
use imagegene::raster_ops::PixelBuffer;
use imagegene::rendering::{Codec, FontLibrary};
use imagegene::services::{Pipeline, PipelineReport, Recipe};
use tempfile::TempDir;

/// Temporary directory plus a codec and pipeline that never touch system fonts
pub struct TestWorkspace {
    dir: TempDir,
    pub codec: Codec,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            codec: Codec::default(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file inside the workspace
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Encode `buffer` into the workspace; format follows the extension
    pub fn write_image(&self, name: &str, buffer: &PixelBuffer) -> PathBuf {
        let path = self.path(name);
        self.codec
            .encode(buffer, &path)
            .unwrap_or_else(|e| panic!("Failed to write {name}: {e}"));
        path
    }

    pub fn read_image(&self, name: &str) -> PixelBuffer {
        self.codec
            .decode(self.path(name))
            .unwrap_or_else(|e| panic!("Failed to read {name}: {e}"))
    }

    pub fn write_text(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Font config pointing at the (empty) workspace, system fonts off
    pub fn offline_config(&self) -> AppConfig {
        AppConfig {
            fonts: FontConfig {
                directory: self.path("fonts"),
                system_fonts: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Pipeline resolving relative paths against the workspace
    pub fn pipeline(&self) -> Pipeline {
        let config = self.offline_config();
        Pipeline::with_services(
            Codec::new(&config.output),
            FontLibrary::new(config.fonts.clone()),
        )
        .with_base_dir(self.root())
    }

    /// Parse and run a recipe written in YAML
    pub fn run_recipe(&self, yaml: &str) -> (PixelBuffer, PipelineReport) {
        let recipe = Recipe::parse(yaml).expect("Invalid recipe");
        self.pipeline().run(&recipe).expect("Recipe failed")
    }
}
