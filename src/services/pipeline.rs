//! YAML recipes: one input image, an ordered list of steps, one output.
//!
//! ```yaml
//! input: photo.png
//! output: out/photo-dithered.png
//! steps:
//!   - op: grayscale-luminance
//!   - op: convolve
//!     kernel: gaussian
//!     boundary: border
//!   - op: save
//!     path: out/blurred.png
//!   - op: floyd-steinberg
//! ```
//!
//! Relative paths are resolved against the pipeline's base directory
//! (the recipe's directory when run through [`Pipeline::run_file`]).
//!
//! A step the buffer cannot take (for example grayscale on a one-channel
//! image, or a message too large to hide) is logged and skipped. Steps
//! that need a resource that cannot be loaded abort the run.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use raster_ops::{
    stego, BoundaryPolicy, Kernel, OpError, PixelBuffer, TextColor, DEFAULT_THRESHOLD,
};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::models::{AppConfig, FontFamily};
use crate::rendering::{Codec, FontLibrary, FontSource, DEFAULT_FONT_SIZE};

/// A parsed recipe file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    /// Image to start from
    pub input: PathBuf,

    /// Where to write the final buffer, if anywhere
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn parse(content: &str) -> Result<Self, PipelineError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

/// One operation applied to the working buffer.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    GrayscaleAverage,
    GrayscaleLuminance,
    ColorMask {
        r: u32,
        g: u32,
        b: u32,
    },
    FlipHorizontal,
    FlipVertical,
    Crop {
        #[serde(default)]
        x: usize,
        #[serde(default)]
        y: usize,
        width: usize,
        height: usize,
    },
    Convolve {
        kernel: KernelSpec,
        #[serde(default)]
        boundary: Boundary,
        /// Single channel to convolve; all color channels when absent
        #[serde(default)]
        channel: Option<usize>,
    },
    Threshold {
        #[serde(default = "default_threshold")]
        level: u8,
    },
    DitherRandom {
        #[serde(default)]
        seed: Option<u64>,
    },
    FloydSteinberg,
    Overlay {
        image: PathBuf,
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
        /// Blend with alpha instead of copying bytes
        #[serde(default)]
        alpha: bool,
    },
    Text {
        text: String,
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
        #[serde(default)]
        family: Option<FontFamily>,
        /// Font file; takes precedence over `family`
        #[serde(default)]
        font_file: Option<PathBuf>,
        #[serde(default = "default_font_size")]
        size: f32,
        /// RGBA
        #[serde(default = "default_text_color")]
        color: [u8; 4],
    },
    Diff {
        image: PathBuf,
        #[serde(default)]
        scale: Option<u8>,
    },
    Hide {
        message: String,
    },
    Reveal,
    Save {
        path: PathBuf,
    },
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_text_color() -> [u8; 4] {
    [255, 255, 255, 255]
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::GrayscaleAverage => "grayscale-average",
            Step::GrayscaleLuminance => "grayscale-luminance",
            Step::ColorMask { .. } => "color-mask",
            Step::FlipHorizontal => "flip-horizontal",
            Step::FlipVertical => "flip-vertical",
            Step::Crop { .. } => "crop",
            Step::Convolve { .. } => "convolve",
            Step::Threshold { .. } => "threshold",
            Step::DitherRandom { .. } => "dither-random",
            Step::FloydSteinberg => "floyd-steinberg",
            Step::Overlay { .. } => "overlay",
            Step::Text { .. } => "text",
            Step::Diff { .. } => "diff",
            Step::Hide { .. } => "hide",
            Step::Reveal => "reveal",
            Step::Save { .. } => "save",
        }
    }
}

/// Kernel by preset name or explicit weights
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum KernelSpec {
    Preset(KernelPreset),
    Custom {
        width: usize,
        height: usize,
        weights: Vec<f64>,
        /// `[row, col]`; centered when absent
        #[serde(default)]
        anchor: Option<(usize, usize)>,
    },
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum KernelPreset {
    BoxBlur,
    Gaussian,
    Sharpen,
    Outline,
}

impl KernelSpec {
    pub fn build(&self) -> Result<Kernel, OpError> {
        match self {
            KernelSpec::Preset(KernelPreset::BoxBlur) => Kernel::box_blur(3),
            KernelSpec::Preset(KernelPreset::Gaussian) => Ok(Kernel::gaussian_3x3()),
            KernelSpec::Preset(KernelPreset::Sharpen) => Ok(Kernel::sharpen()),
            KernelSpec::Preset(KernelPreset::Outline) => Ok(Kernel::outline()),
            KernelSpec::Custom {
                width,
                height,
                weights,
                anchor: Some(anchor),
            } => Kernel::new(*width, *height, weights.clone(), *anchor),
            KernelSpec::Custom {
                width,
                height,
                weights,
                anchor: None,
            } => Kernel::centered(*width, *height, weights.clone()),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Boundary {
    #[default]
    Zero,
    Border,
}

impl From<Boundary> for BoundaryPolicy {
    fn from(boundary: Boundary) -> Self {
        match boundary {
            Boundary::Zero => BoundaryPolicy::ClampToZero,
            Boundary::Border => BoundaryPolicy::ClampToBorder,
        }
    }
}

/// A step that was skipped because the buffer could not take it
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStep {
    pub index: usize,
    pub op: &'static str,
    pub error: OpError,
}

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub applied: usize,
    pub skipped: Vec<SkippedStep>,
    /// Characters a text step could not draw
    pub missing_glyphs: Vec<char>,
    /// Messages recovered by `reveal` steps, lossily decoded as UTF-8
    pub revealed: Vec<String>,
    /// Files written by `save` steps and the final output
    pub written: Vec<PathBuf>,
}

/// Runs recipes against the codec and font library.
pub struct Pipeline {
    codec: Codec,
    fonts: FontLibrary,
    base_dir: PathBuf,
}

impl Pipeline {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_services(Codec::new(&config.output), FontLibrary::new(config.fonts.clone()))
    }

    pub fn with_services(codec: Codec, fonts: FontLibrary) -> Self {
        Self {
            codec,
            fonts,
            base_dir: PathBuf::new(),
        }
    }

    /// Resolve relative recipe paths against `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Load a recipe file and run it relative to the file's directory.
    pub fn run_file(
        self,
        path: impl AsRef<Path>,
    ) -> Result<(PixelBuffer, PipelineReport), PipelineError> {
        let path = path.as_ref();
        let recipe = Recipe::from_file(path)?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        self.with_base_dir(base).run(&recipe)
    }

    /// Decode the input, apply every step and write the output if one is set.
    pub fn run(&self, recipe: &Recipe) -> Result<(PixelBuffer, PipelineReport), PipelineError> {
        let mut buffer = self.codec.decode(self.resolve(&recipe.input))?;
        tracing::info!(
            input = %recipe.input.display(),
            steps = recipe.steps.len(),
            "Running recipe"
        );

        let mut report = self.apply(&mut buffer, &recipe.steps)?;

        if let Some(output) = &recipe.output {
            let path = self.resolve(output);
            self.codec.encode(&buffer, &path)?;
            report.written.push(path);
        }

        Ok((buffer, report))
    }

    /// Apply `steps` in order to an existing buffer.
    pub fn apply(
        &self,
        buffer: &mut PixelBuffer,
        steps: &[Step],
    ) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport::default();

        for (index, step) in steps.iter().enumerate() {
            match self.apply_step(buffer, index, step, &mut report)? {
                Ok(()) => {
                    report.applied += 1;
                    tracing::debug!(index, op = step.name(), "Applied step");
                }
                Err(error) => {
                    tracing::warn!(index, op = step.name(), %error, "Skipping step");
                    report.skipped.push(SkippedStep {
                        index,
                        op: step.name(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    /// Outer error aborts the run; inner error skips the step.
    fn apply_step(
        &self,
        buffer: &mut PixelBuffer,
        index: usize,
        step: &Step,
        report: &mut PipelineReport,
    ) -> Result<Result<(), OpError>, PipelineError> {
        let outcome = match step {
            Step::GrayscaleAverage => raster_ops::grayscale_average(buffer),
            Step::GrayscaleLuminance => raster_ops::grayscale_luminance(buffer),
            Step::ColorMask { r, g, b } => raster_ops::color_mask(buffer, *r, *g, *b),
            Step::FlipHorizontal => {
                raster_ops::flip_horizontal(buffer);
                Ok(())
            }
            Step::FlipVertical => {
                raster_ops::flip_vertical(buffer);
                Ok(())
            }
            Step::Crop {
                x,
                y,
                width,
                height,
            } => {
                raster_ops::crop(buffer, *x, *y, *width, *height);
                Ok(())
            }
            Step::Convolve {
                kernel,
                boundary,
                channel,
            } => {
                let kernel = kernel.build().map_err(|e| PipelineError::InvalidStep {
                    index,
                    op: step.name(),
                    reason: e.to_string(),
                })?;
                let policy = BoundaryPolicy::from(*boundary);
                match channel {
                    Some(channel) => raster_ops::convolve(buffer, *channel, &kernel, policy),
                    None => raster_ops::convolve_color_channels(buffer, &kernel, policy),
                }
            }
            Step::Threshold { level } => {
                raster_ops::threshold(buffer, *level);
                Ok(())
            }
            Step::DitherRandom { seed } => {
                match seed {
                    Some(seed) => {
                        raster_ops::random_with_rng(buffer, &mut StdRng::seed_from_u64(*seed))
                    }
                    None => raster_ops::random(buffer),
                }
                Ok(())
            }
            Step::FloydSteinberg => {
                raster_ops::floyd_steinberg(buffer);
                Ok(())
            }
            Step::Overlay { image, x, y, alpha } => {
                let source = self.codec.decode(self.resolve(image))?;
                if *alpha {
                    raster_ops::overlay_with_alpha(buffer, &source, *x, *y);
                } else {
                    raster_ops::overlay(buffer, &source, *x, *y);
                }
                Ok(())
            }
            Step::Text {
                text,
                x,
                y,
                family,
                font_file,
                size,
                color,
            } => {
                let source = match (font_file, family) {
                    (Some(file), _) => FontSource::File(self.resolve(file)),
                    (None, Some(family)) => FontSource::Family(*family),
                    (None, None) => FontSource::default(),
                };
                let face = self.fonts.load_face(&source, *size)?;
                let [r, g, b, a] = *color;
                let drawn =
                    raster_ops::overlay_text(buffer, text, &face, *x, *y, TextColor::new(r, g, b, a));
                report.missing_glyphs.extend(drawn.missing);
                Ok(())
            }
            Step::Diff { image, scale } => {
                let other = self.codec.decode(self.resolve(image))?;
                match scale {
                    Some(scale) => {
                        let factor = raster_ops::diffmap_with_scale(buffer, &other, *scale);
                        tracing::debug!(factor, "Diffmap scaled");
                    }
                    None => raster_ops::diffmap(buffer, &other),
                }
                Ok(())
            }
            Step::Hide { message } => stego::encode(buffer, message.as_bytes()),
            Step::Reveal => stego::decode(buffer).map(|bytes| {
                let message = String::from_utf8_lossy(&bytes).into_owned();
                tracing::info!(index, bytes = bytes.len(), "Revealed message");
                report.revealed.push(message);
            }),
            Step::Save { path } => {
                let path = self.resolve(path);
                self.codec.encode(buffer, &path)?;
                report.written.push(path);
                Ok(())
            }
        };

        Ok(outcome)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
