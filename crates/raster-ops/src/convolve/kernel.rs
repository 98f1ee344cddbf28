//! Convolution kernel definitions.
//!
//! A [`Kernel`] is a row-major grid of weights with an anchor cell that
//! lines up with the output pixel. The anchor does not have to be the
//! center: a 1x3 kernel anchored at column 0 only looks in one direction.

use crate::error::OpError;

/// A 2D convolution kernel.
///
/// Construction checks that the weights fill the grid and that the anchor
/// lies inside it, so every `Kernel` can be applied without further
/// validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Vec<f64>,
    anchor_row: usize,
    anchor_col: usize,
}

impl Kernel {
    /// Build a kernel from row-major weights and an explicit `(row, col)` anchor.
    pub fn new(
        width: usize,
        height: usize,
        weights: Vec<f64>,
        anchor: (usize, usize),
    ) -> Result<Self, OpError> {
        let expected = width * height;
        if weights.len() != expected {
            return Err(OpError::KernelShape {
                expected,
                actual: weights.len(),
            });
        }
        let (anchor_row, anchor_col) = anchor;
        if anchor_row >= height || anchor_col >= width {
            return Err(OpError::KernelAnchor {
                row: anchor_row,
                col: anchor_col,
            });
        }
        Ok(Self {
            width,
            height,
            weights,
            anchor_row,
            anchor_col,
        })
    }

    /// Build a kernel anchored at its center cell (rounded toward top-left).
    pub fn centered(width: usize, height: usize, weights: Vec<f64>) -> Result<Self, OpError> {
        Self::new(
            width,
            height,
            weights,
            (height.saturating_sub(1) / 2, width.saturating_sub(1) / 2),
        )
    }

    /// Kernel width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Kernel height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Anchor cell as `(row, col)`
    #[inline]
    pub fn anchor(&self) -> (usize, usize) {
        (self.anchor_row, self.anchor_col)
    }

    /// Weight at `(row, col)`
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[row * self.width + col]
    }

    /// Row-major weights
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Square averaging kernel of side `size`, centered.
    ///
    /// ```text
    ///    1   1   1
    ///    1   1   1   / 9
    ///    1   1   1
    /// ```
    pub fn box_blur(size: usize) -> Result<Self, OpError> {
        let cells = size * size;
        let weight = if cells == 0 { 0.0 } else { 1.0 / cells as f64 };
        Self::centered(size, size, vec![weight; cells])
    }

    /// 3x3 binomial approximation of a Gaussian.
    ///
    /// ```text
    ///    1   2   1
    ///    2   4   2   / 16
    ///    1   2   1
    /// ```
    pub fn gaussian_3x3() -> Self {
        let weights = [1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0]
            .iter()
            .map(|w| w / 16.0)
            .collect();
        Self {
            width: 3,
            height: 3,
            weights,
            anchor_row: 1,
            anchor_col: 1,
        }
    }

    /// 3x3 sharpen kernel (weights sum to 1).
    ///
    /// ```text
    ///    0  -1   0
    ///   -1   5  -1
    ///    0  -1   0
    /// ```
    pub fn sharpen() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0],
            anchor_row: 1,
            anchor_col: 1,
        }
    }

    /// 3x3 outline (Laplacian) kernel (weights sum to 0).
    ///
    /// ```text
    ///   -1  -1  -1
    ///   -1   8  -1
    ///   -1  -1  -1
    /// ```
    pub fn outline() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
            anchor_row: 1,
            anchor_col: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_wrong_weight_count() {
        let err = Kernel::new(3, 3, vec![1.0; 8], (1, 1)).unwrap_err();
        assert_eq!(
            err,
            OpError::KernelShape {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn test_rejects_anchor_outside() {
        let err = Kernel::new(2, 1, vec![1.0, 1.0], (1, 0)).unwrap_err();
        assert_eq!(err, OpError::KernelAnchor { row: 1, col: 0 });
    }

    #[test]
    fn test_centered_anchor() {
        let k = Kernel::centered(5, 3, vec![0.0; 15]).unwrap();
        assert_eq!(k.anchor(), (1, 2));
        let k = Kernel::centered(4, 4, vec![0.0; 16]).unwrap();
        assert_eq!(k.anchor(), (1, 1));
    }

    #[test]
    fn test_presets_normalized() {
        let sum = |k: &Kernel| k.weights().iter().sum::<f64>();
        assert!((sum(&Kernel::box_blur(3).unwrap()) - 1.0).abs() < 1e-12);
        assert!((sum(&Kernel::gaussian_3x3()) - 1.0).abs() < 1e-12);
        assert!((sum(&Kernel::sharpen()) - 1.0).abs() < 1e-12);
        assert!(sum(&Kernel::outline()).abs() < 1e-12);
    }

    #[test]
    fn test_weight_lookup_is_row_major() {
        let k = Kernel::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (0, 0)).unwrap();
        assert_eq!(k.weight(1, 0), 4.0);
        assert_eq!(k.weight(0, 2), 3.0);
    }
}
