//! Error diffusion kernel definitions.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`: the neighbour at `(x + dx, y + dy)`
/// receives `error * weight / divisor`. Entries only point at pixels that
/// the left-to-right, top-to-bottom scan has not visited yet.
#[derive(Debug, Clone, Copy)]
pub struct DiffusionKernel {
    /// (dx, dy, weight) entries for error diffusion.
    pub entries: &'static [(isize, isize, i32)],

    /// Total divisor for normalizing weights.
    pub divisor: i32,
}

impl DiffusionKernel {
    /// True when every neighbour of `(x, y)` lies inside a `width x height` image.
    pub fn fits(&self, x: usize, y: usize, width: usize, height: usize) -> bool {
        self.entries.iter().all(|&(dx, dy, _)| {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height
        })
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: DiffusionKernel = DiffusionKernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floyd_steinberg_full_propagation() {
        let sum: i32 = FLOYD_STEINBERG.entries.iter().map(|(_, _, w)| w).sum();
        assert_eq!(sum, FLOYD_STEINBERG.divisor);
    }

    #[test]
    fn test_fits_excludes_edges() {
        // 3x2 image: only (1, 0) has all four forward neighbours
        assert!(FLOYD_STEINBERG.fits(1, 0, 3, 2));
        assert!(!FLOYD_STEINBERG.fits(0, 0, 3, 2), "left column");
        assert!(!FLOYD_STEINBERG.fits(2, 0, 3, 2), "right column");
        assert!(!FLOYD_STEINBERG.fits(1, 1, 3, 2), "bottom row");
    }
}
