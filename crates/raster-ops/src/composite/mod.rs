//! Compositing one image onto another.
//!
//! All overlays place the source's top-left corner at `(x, y)` in the
//! destination; either coordinate may be negative. Source pixels that land
//! outside the destination are skipped.
//!
//! # Over compositing
//!
//! [`overlay_with_alpha`] and [`overlay_text`] share the "over" rule with
//! alphas in 0..=1:
//!
//! ```text
//! out_a = src_a + dst_a * (1 - src_a)
//! out_c = (src_c * src_a + dst_c * dst_a * (1 - src_a)) / out_a
//! ```
//!
//! Two shortcuts apply first: when both alphas exceed 0.99 the source is
//! copied as-is, and when `out_a < 0.01` the pixel is cleared to zero.

mod diffmap;
mod text;

pub use diffmap::{diffmap, diffmap_with_scale};
pub use text::{overlay_text, GlyphBitmap, GlyphSource, TextColor, TextReport};

use crate::buffer::PixelBuffer;

/// Alpha above which a pixel counts as fully opaque.
const OPAQUE: f32 = 0.99;

/// Output alpha below which a pixel counts as fully transparent.
const TRANSPARENT: f32 = 0.01;

/// Opaque copy of `source` onto `dest` at `(x, y)`.
///
/// Copies `dest.channels()` bytes per pixel straight from the source's
/// interleaved data. When the source has fewer channels than the
/// destination those bytes run into the following source pixel (stopping
/// at the end of the source buffer), exactly as a raw byte copy would.
pub fn overlay(dest: &mut PixelBuffer, source: &PixelBuffer, x: i32, y: i32) {
    let dest_channels = dest.channels();
    let src_data = source.data();

    for (dx, dy, sx, sy) in placements(dest, source, x, y) {
        let src_off = source.offset(sx, sy);
        let dst_off = dest.offset(dx, dy);
        let n = dest_channels.min(src_data.len() - src_off);
        dest.data_mut()[dst_off..dst_off + n].copy_from_slice(&src_data[src_off..src_off + n]);
    }
}

/// Alpha-aware "over" composite of `source` onto `dest` at `(x, y)`.
///
/// Channel 3 is alpha on either side when present; a side without a fourth
/// channel is treated as opaque. When the source has fewer channels than
/// the destination and both pixels are opaque, the source's first channel
/// is copied into every destination channel. Blended pixels use the
/// matching source channel, falling back to the first one for channels the
/// source lacks.
pub fn overlay_with_alpha(dest: &mut PixelBuffer, source: &PixelBuffer, x: i32, y: i32) {
    let narrow = source.channels() < dest.channels();
    let has_alpha = dest.has_alpha();

    for (dx, dy, sx, sy) in placements(dest, source, x, y) {
        let src_px = source.pixel(sx, sy);
        let src_alpha = if source.has_alpha() {
            src_px[3] as f32 / 255.0
        } else {
            1.0
        };
        let copy_channel = |c: usize| if narrow { src_px[0] } else { src_px[c] };
        let blend_channel = |c: usize| src_px.get(c).copied().unwrap_or(src_px[0]);

        blend_over(
            dest.pixel_mut(dx, dy),
            has_alpha,
            src_alpha,
            copy_channel,
            blend_channel,
        );
    }
}

/// Blend one source color over one destination pixel in place.
///
/// `copy_channel(c)` yields the value written to destination channel `c`
/// when both sides are opaque; `blend_channel(c)` is the source color
/// mixed in otherwise.
pub(crate) fn blend_over(
    dst: &mut [u8],
    dst_has_alpha: bool,
    src_alpha: f32,
    copy_channel: impl Fn(usize) -> u8,
    blend_channel: impl Fn(usize) -> u8,
) {
    let dst_alpha = if dst_has_alpha {
        dst[3] as f32 / 255.0
    } else {
        1.0
    };

    if src_alpha > OPAQUE && dst_alpha > OPAQUE {
        for (c, value) in dst.iter_mut().enumerate() {
            *value = copy_channel(c);
        }
        return;
    }

    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha < TRANSPARENT {
        dst.fill(0);
        return;
    }

    for (c, value) in dst.iter_mut().enumerate() {
        let src = blend_channel(c) as f32 / 255.0;
        let cur = *value as f32 / 255.0;
        let mixed = (src * src_alpha + cur * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        *value = to_byte(mixed * 255.0);
    }
    if dst_has_alpha {
        dst[3] = to_byte(out_alpha * 255.0);
    }
}

/// Saturate to 0..=255 and truncate.
#[inline]
fn to_byte(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Pairs of `(dest_x, dest_y, src_x, src_y)` for every source pixel that
/// lands inside `dest` when the source origin is placed at `(x, y)`.
fn placements(
    dest: &PixelBuffer,
    source: &PixelBuffer,
    x: i32,
    y: i32,
) -> impl Iterator<Item = (usize, usize, usize, usize)> {
    let (x, y) = (x as i64, y as i64);
    let sx_range = visible_span(x, source.width(), dest.width());
    let sy_range = visible_span(y, source.height(), dest.height());

    sy_range.flat_map(move |sy| {
        sx_range
            .clone()
            .map(move |sx| ((sx as i64 + x) as usize, (sy as i64 + y) as usize, sx, sy))
    })
}

/// Source indices `s` in `0..len` with `origin + s` inside `0..limit`.
pub(crate) fn visible_span(origin: i64, len: usize, limit: usize) -> std::ops::Range<usize> {
    let start = (-origin).clamp(0, len as i64) as usize;
    let end = (limit as i64 - origin).clamp(0, len as i64) as usize;
    start..end.max(start)
}
