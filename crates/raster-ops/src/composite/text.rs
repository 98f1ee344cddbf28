//! Blending rasterized glyphs onto a buffer.

use crate::buffer::PixelBuffer;
use crate::error::MissingGlyph;

use super::{blend_over, visible_span};

/// Coverage bitmap for one character, as produced by a font rasterizer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBitmap {
    /// Bitmap width in pixels
    pub width: usize,
    /// Bitmap height in pixels
    pub height: usize,
    /// Horizontal offset of the bitmap's left edge from the pen position
    pub offset_x: i32,
    /// Vertical offset of the bitmap's top edge from the baseline (downward)
    pub offset_y: i32,
    /// Horizontal pen advance after this glyph
    pub advance: i32,
    /// Row-major intensity, one byte per pixel; 0 is fully transparent
    pub coverage: Vec<u8>,
}

/// Anything that can turn a character into a [`GlyphBitmap`].
pub trait GlyphSource {
    /// Rasterize `codepoint` at the source's current size.
    fn rasterize(&self, codepoint: char) -> Result<GlyphBitmap, MissingGlyph>;
}

/// Fill color for text, with a global alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: u8,
}

impl TextColor {
    pub const fn new(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self { r, g, b, alpha }
    }

    fn bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha]
    }
}

impl Default for TextColor {
    /// Opaque white
    fn default() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

/// Outcome of [`overlay_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReport {
    /// Number of glyphs blended
    pub drawn: usize,
    /// Characters the glyph source could not provide, in text order
    pub missing: Vec<char>,
    /// Pen x position after the last glyph
    pub pen_x: i32,
}

/// Draw `text` with its baseline origin at `(x, y)`.
///
/// Text is processed one byte at a time; each byte is handed to `glyphs` as
/// the character with that value, so multi-byte UTF-8 sequences draw as
/// several Latin-1 characters. A byte the source cannot rasterize is
/// logged, recorded in the report and skipped without moving the pen; so
/// is a bitmap whose coverage length is not `width * height`.
///
/// Each glyph pixel with non-zero coverage blends `color` over the
/// destination with source alpha `coverage/255 * alpha/255`, using the
/// same "over" rule as [`overlay_with_alpha`](super::overlay_with_alpha).
pub fn overlay_text<G: GlyphSource + ?Sized>(
    dest: &mut PixelBuffer,
    text: &str,
    glyphs: &G,
    x: i32,
    y: i32,
    color: TextColor,
) -> TextReport {
    let mut report = TextReport {
        pen_x: x,
        ..Default::default()
    };
    let rgba = color.bytes();
    let color_alpha = color.alpha as f32 / 255.0;
    let has_alpha = dest.has_alpha();

    for byte in text.bytes() {
        let codepoint = char::from(byte);
        let glyph = match glyphs.rasterize(codepoint) {
            Ok(glyph) => glyph,
            Err(err) => {
                tracing::warn!(%err, "Skipping character");
                report.missing.push(codepoint);
                continue;
            }
        };
        let expected = glyph.width.checked_mul(glyph.height);
        if expected != Some(glyph.coverage.len()) {
            tracing::warn!(
                ?codepoint,
                width = glyph.width,
                height = glyph.height,
                coverage = glyph.coverage.len(),
                "Glyph coverage does not match its size, skipping"
            );
            report.missing.push(codepoint);
            continue;
        }

        let origin_x = report.pen_x as i64 + glyph.offset_x as i64;
        let origin_y = y as i64 + glyph.offset_y as i64;
        let cols = visible_span(origin_x, glyph.width, dest.width());

        for sy in visible_span(origin_y, glyph.height, dest.height()) {
            let dy = (origin_y + sy as i64) as usize;
            for sx in cols.clone() {
                let coverage = glyph.coverage[sy * glyph.width + sx];
                if coverage == 0 {
                    continue;
                }
                let dx = (origin_x + sx as i64) as usize;
                let src_alpha = coverage as f32 / 255.0 * color_alpha;
                let color_channel = |c: usize| rgba[c];
                blend_over(
                    dest.pixel_mut(dx, dy),
                    has_alpha,
                    src_alpha,
                    color_channel,
                    color_channel,
                );
            }
        }

        report.drawn += 1;
        report.pen_x += glyph.advance;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Solid 2x3 block for uppercase letters, nothing else.
    struct BlockFont {
        coverage: u8,
    }

    impl GlyphSource for BlockFont {
        fn rasterize(&self, codepoint: char) -> Result<GlyphBitmap, MissingGlyph> {
            if !codepoint.is_ascii_uppercase() {
                return Err(MissingGlyph { codepoint });
            }
            Ok(GlyphBitmap {
                width: 2,
                height: 3,
                offset_x: 0,
                offset_y: -3,
                advance: 3,
                coverage: vec![self.coverage; 6],
            })
        }
    }

    fn ink(buf: &PixelBuffer) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                if buf.pixel(x, y)[0] != 0 {
                    hits.push((x, y));
                }
            }
        }
        hits
    }

    #[test]
    fn test_draws_and_advances() {
        let mut buf = PixelBuffer::new(8, 4, 3).unwrap();
        let report = overlay_text(
            &mut buf,
            "AB",
            &BlockFont { coverage: 255 },
            1,
            3,
            TextColor::default(),
        );
        assert_eq!(report.drawn, 2);
        assert!(report.missing.is_empty());
        assert_eq!(report.pen_x, 7);
        // Glyph rows 0..3 land on y = 0..3, columns 1-2 and 4-5
        let expected: Vec<(usize, usize)> = (0..3)
            .flat_map(|y| [(1, y), (2, y), (4, y), (5, y)])
            .collect();
        let mut hits = ink(&buf);
        hits.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(hits, expected);
        assert_eq!(buf.pixel(1, 0), &[255, 255, 255]);
    }

    #[test]
    fn test_missing_glyph_skipped_without_advance() {
        let mut buf = PixelBuffer::new(10, 4, 1).unwrap();
        let report = overlay_text(
            &mut buf,
            "a?B",
            &BlockFont { coverage: 255 },
            0,
            3,
            TextColor::default(),
        );
        assert_eq!(report.drawn, 1);
        assert_eq!(report.missing, vec!['a', '?']);
        assert_eq!(report.pen_x, 3);
        // B drawn at the original pen position
        assert_eq!(buf.pixel(0, 0), &[255]);
    }

    #[test]
    fn test_partial_coverage_blends() {
        let mut buf = PixelBuffer::new(2, 3, 3).unwrap();
        overlay_text(
            &mut buf,
            "A",
            &BlockFont { coverage: 128 },
            0,
            3,
            TextColor::new(255, 0, 0, 255),
        );
        // sa ~ 0.5 over opaque black: red ~ 128, green/blue stay 0
        let px = buf.pixel(0, 0);
        assert!((127..=128).contains(&px[0]), "red {}", px[0]);
        assert_eq!(&px[1..], &[0, 0]);
    }

    #[test]
    fn test_color_alpha_scales_coverage() {
        let mut buf = PixelBuffer::from_raw(2, 3, 4, vec![0, 0, 0, 255].repeat(6)).unwrap();
        overlay_text(
            &mut buf,
            "A",
            &BlockFont { coverage: 255 },
            0,
            3,
            TextColor::new(255, 255, 255, 0),
        );
        // Zero color alpha leaves the destination color untouched
        assert_eq!(&buf.pixel(1, 1)[..3], &[0, 0, 0]);
    }

    #[test]
    fn test_clips_off_image() {
        let mut buf = PixelBuffer::new(3, 3, 1).unwrap();
        let report = overlay_text(
            &mut buf,
            "A",
            &BlockFont { coverage: 255 },
            -1,
            1,
            TextColor::default(),
        );
        assert_eq!(report.drawn, 1);
        // Only glyph column 1, glyph row 2 is on-canvas at (0, 0)
        assert_eq!(ink(&buf), vec![(0, 0)]);
    }

    /// Claims 2x2 but carries a single coverage byte.
    struct TruncatedFont;

    impl GlyphSource for TruncatedFont {
        fn rasterize(&self, codepoint: char) -> Result<GlyphBitmap, MissingGlyph> {
            if codepoint == 'B' {
                return BlockFont { coverage: 255 }.rasterize(codepoint);
            }
            Ok(GlyphBitmap {
                width: 2,
                height: 2,
                offset_y: -2,
                advance: 3,
                coverage: vec![255],
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_malformed_coverage_is_skipped() {
        let mut buf = PixelBuffer::new(6, 3, 1).unwrap();
        let report = overlay_text(&mut buf, "xB", &TruncatedFont, 0, 3, TextColor::default());
        assert_eq!(report.drawn, 1);
        assert_eq!(report.missing, vec!['x']);
        assert_eq!(report.pen_x, 3);
        assert_eq!(buf.pixel(0, 0), &[255]);
    }
}
