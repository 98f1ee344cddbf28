//! Glyph rasterization for text overlays.
//!
//! Outlines come from `ttf-parser` and are filled with `tiny-skia`; the
//! alpha plane of the filled pixmap is the glyph's coverage bitmap.

use crate::error::FontError;
use crate::models::{FontConfig, FontFamily};
use raster_ops::{GlyphBitmap, GlyphSource, MissingGlyph};
use std::path::{Path, PathBuf};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// Size used when a caller does not pick one, in pixels per em
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Where a face comes from: a built-in family or an explicit font file
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    Family(FontFamily),
    File(PathBuf),
}

impl Default for FontSource {
    fn default() -> Self {
        FontSource::Family(FontFamily::Regular)
    }
}

/// Resolves [`FontSource`]s to loaded faces.
///
/// Family files are looked up in the configured font directory first. If
/// the file is missing and system fonts are enabled, the system font
/// database is queried for the configured fallback family with the
/// family's weight and style.
pub struct FontLibrary {
    config: FontConfig,
    system: Option<fontdb::Database>,
}

impl FontLibrary {
    pub fn new(config: FontConfig) -> Self {
        let system = config.system_fonts.then(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::info!(font_count = db.len(), "Loaded system fonts");
            db
        });

        Self { config, system }
    }

    pub fn config(&self) -> &FontConfig {
        &self.config
    }

    /// Load a face at `size` pixels per em
    pub fn load_face(&self, source: &FontSource, size: f32) -> Result<FontFace, FontError> {
        match source {
            FontSource::File(path) => FontFace::from_file(path, size),
            FontSource::Family(family) => self.load_family(*family, size),
        }
    }

    fn load_family(&self, family: FontFamily, size: f32) -> Result<FontFace, FontError> {
        let path = self.config.file_for(family);
        if path.is_file() {
            return FontFace::from_file(&path, size);
        }
        tracing::debug!(%family, path = %path.display(), "Font file not found, trying system fonts");

        let db = self
            .system
            .as_ref()
            .ok_or_else(|| FontError::NotFound(path.display().to_string()))?;

        let (weight, style) = query_attributes(family);
        let families = [
            fontdb::Family::Name(&self.config.fallback_family),
            fontdb::Family::SansSerif,
        ];
        let query = fontdb::Query {
            families: &families,
            weight,
            stretch: fontdb::Stretch::Normal,
            style,
        };

        let not_found = || FontError::NotFound(format!("{} {}", self.config.fallback_family, family));
        let id = db.query(&query).ok_or_else(not_found)?;
        let name = db
            .face(id)
            .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| self.config.fallback_family.clone());
        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(not_found)?;

        tracing::info!(%family, font = %name, "Using system font");
        FontFace::from_data(data, index, size, name)
    }
}

fn query_attributes(family: FontFamily) -> (fontdb::Weight, fontdb::Style) {
    let weight = match family {
        FontFamily::Regular | FontFamily::Italic => fontdb::Weight::NORMAL,
        FontFamily::Bold | FontFamily::BoldItalic => fontdb::Weight::BOLD,
        FontFamily::Black => fontdb::Weight::BLACK,
    };
    let style = if family.is_italic() {
        fontdb::Style::Italic
    } else {
        fontdb::Style::Normal
    };
    (weight, style)
}

/// A parsed font file at a given pixel size.
#[derive(Clone)]
pub struct FontFace {
    data: Vec<u8>,
    index: u32,
    size: f32,
    name: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("size", &self.size)
            .finish()
    }
}

impl FontFace {
    pub fn from_file(path: impl AsRef<Path>, size: f32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let face = Self::from_data(data, 0, size, name)?;
        tracing::debug!(path = %path.display(), size, "Loaded font file");
        Ok(face)
    }

    /// Wrap raw font data, checking that face `index` parses.
    pub fn from_data(data: Vec<u8>, index: u32, size: f32, name: String) -> Result<Self, FontError> {
        check_size(size)?;
        let face = ttf_parser::Face::parse(&data, index)
            .map_err(|e| FontError::Parse(format!("{name}: {e}")))?;
        if face.units_per_em() == 0 {
            return Err(FontError::Parse(format!("{name}: zero units per em")));
        }

        Ok(Self {
            data,
            index,
            size,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Change the pixel size used by later rasterization
    pub fn set_size(&mut self, size: f32) -> Result<(), FontError> {
        check_size(size)?;
        self.size = size;
        Ok(())
    }
}

fn check_size(size: f32) -> Result<(), FontError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(FontError::InvalidSize(size))
    }
}

impl GlyphSource for FontFace {
    fn rasterize(&self, codepoint: char) -> Result<GlyphBitmap, MissingGlyph> {
        let missing = MissingGlyph { codepoint };
        // Parsing only reads table offsets; the data was validated on load
        let face = ttf_parser::Face::parse(&self.data, self.index).map_err(|_| missing)?;
        let glyph = face.glyph_index(codepoint).ok_or(missing)?;

        let scale = self.size / face.units_per_em() as f32;
        let advance = face
            .glyph_hor_advance(glyph)
            .map_or(0, |a| (a as f32 * scale).round() as i32);

        let Some(bbox) = face.glyph_bounding_box(glyph) else {
            // Blank glyph such as a space
            return Ok(GlyphBitmap {
                advance,
                ..Default::default()
            });
        };

        let left = (bbox.x_min as f32 * scale).floor();
        let right = (bbox.x_max as f32 * scale).ceil();
        let top = (bbox.y_max as f32 * scale).ceil();
        let bottom = (bbox.y_min as f32 * scale).floor();
        let width = (right - left).max(0.0) as usize;
        let height = (top - bottom).max(0.0) as usize;

        let mut sink = OutlineSink {
            builder: PathBuilder::new(),
            scale,
            left,
            top,
        };
        face.outline_glyph(glyph, &mut sink);

        Ok(GlyphBitmap {
            width,
            height,
            offset_x: left as i32,
            offset_y: -(top as i32),
            advance,
            coverage: fill_coverage(sink.builder, width, height),
        })
    }
}

/// Fill `builder`'s path into a `width x height` alpha plane.
fn fill_coverage(builder: PathBuilder, width: usize, height: usize) -> Vec<u8> {
    let blank = vec![0u8; width * height];
    let (Some(path), Some(mut pixmap)) = (builder.finish(), Pixmap::new(width as u32, height as u32))
    else {
        return blank;
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = true;
    pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);

    pixmap.pixels().iter().map(|px| px.alpha()).collect()
}

/// Feeds font-unit outlines into a pixel-space path with y pointing down.
struct OutlineSink {
    builder: PathBuilder,
    scale: f32,
    left: f32,
    top: f32,
}

impl OutlineSink {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale - self.left, self.top - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
