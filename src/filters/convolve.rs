//! 3x3 convolution with edge-clamped borders.
//!
//! Shared by the sharpen and blur filters. Every output pixel is written,
//! border included: neighbor coordinates that fall outside the image are
//! clamped to the nearest row/column (edge replication), the same addressing
//! the separable blurs use.
//!
//! Reads only the input, so rows can be computed independently; they are
//! distributed across the rayon pool.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::{clamp_u8, color_channels};
use crate::error::DehazeError;

/// A 3x3 kernel, indexed `[dy + 1][dx + 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3(pub [[f64; 3]; 3]);

impl Kernel3x3 {
    pub const IDENTITY: Kernel3x3 = Kernel3x3([[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]);

    /// Uniform 1/9 averaging kernel.
    pub const BOX: Kernel3x3 = Kernel3x3([[1.0 / 9.0; 3]; 3]);

    /// Fixed high-pass sharpening kernel, weights sum to 1.
    pub const HIGH_PASS: Kernel3x3 = Kernel3x3([[-1.0, -1.0, -1.0], [-1.0, 9.0, -1.0], [-1.0, -1.0, -1.0]]);

    /// Cross-shaped sharpening kernel:
    ///
    /// ```text
    ///   0    -a/4    0
    /// -a/4   1+a   -a/4
    ///   0    -a/4    0
    /// ```
    pub fn laplacian(amount: f64) -> Self {
        let e = -amount / 4.0;
        Kernel3x3([[0.0, e, 0.0], [e, 1.0 + amount, e], [0.0, e, 0.0]])
    }

    /// `original + amount * (original - box)` folded into a single kernel.
    pub fn unsharp(amount: f64) -> Self {
        let e = -amount / 9.0;
        Kernel3x3([[e, e, e], [e, 1.0 + amount + e, e], [e, e, e]])
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().flatten().sum()
    }
}

/// Convolve color channels with a 3x3 kernel (u8 version).
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `kernel` - Weights applied to the 3x3 neighborhood
///
/// # Returns
/// Filtered image with same channel count; alpha copied unchanged
pub fn convolve_3x3_u8(input: ArrayView3<u8>, kernel: &Kernel3x3) -> Result<Array3<u8>, DehazeError> {
    let (height, width, channels) = input.dim();
    if height == 0 || width == 0 || channels == 0 {
        return Ok(input.to_owned());
    }

    let color_channels = color_channels(channels);
    let max_x = width as isize - 1;
    let max_y = height as isize - 1;

    let mut output_flat = vec![0u8; height * width * channels];
    output_flat
        .par_chunks_mut(width * channels)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                for c in 0..color_channels {
                    let mut sum = 0.0f64;
                    for (ky, weights) in kernel.0.iter().enumerate() {
                        let sy = (y as isize + ky as isize - 1).clamp(0, max_y) as usize;
                        for (kx, &w) in weights.iter().enumerate() {
                            if w == 0.0 {
                                continue;
                            }
                            let sx = (x as isize + kx as isize - 1).clamp(0, max_x) as usize;
                            sum += input[[sy, sx, c]] as f64 * w;
                        }
                    }
                    row[x * channels + c] = clamp_u8(sum);
                }
                if channels == 4 {
                    row[x * channels + 3] = input[[y, x, 3]];
                }
            }
        });

    Array3::from_shape_vec((height, width, channels), output_flat)
        .map_err(|e| DehazeError::invalid_buffer(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(height: usize, width: usize) -> Array3<u8> {
        Array3::from_shape_fn((height, width, 4), |(y, x, c)| {
            if c == 3 {
                ((x * 31 + y * 7) % 256) as u8
            } else {
                ((x * 23 + y * 41 + c * 11) % 256) as u8
            }
        })
    }

    #[test]
    fn test_kernel_sums() {
        assert!((Kernel3x3::BOX.sum() - 1.0).abs() < 1e-6);
        assert!((Kernel3x3::HIGH_PASS.sum() - 1.0).abs() < 1e-6);
        assert!((Kernel3x3::laplacian(0.05).sum() - 1.0).abs() < 1e-6);
        assert!((Kernel3x3::unsharp(0.7).sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_identity_kernel() {
        let img = gradient(5, 6);

        let result = convolve_3x3_u8(img.view(), &Kernel3x3::IDENTITY).unwrap();

        assert_eq!(result, img);
    }

    #[test]
    fn test_uniform_unchanged_including_border() {
        let img = Array3::from_shape_fn((4, 7, 4), |(_, _, c)| [30u8, 150, 220, 255][c]);

        for kernel in [
            Kernel3x3::BOX,
            Kernel3x3::HIGH_PASS,
            Kernel3x3::laplacian(0.5),
            Kernel3x3::unsharp(2.0),
        ] {
            let result = convolve_3x3_u8(img.view(), &kernel).unwrap();
            assert_eq!(result, img, "kernel {kernel:?}");
        }
    }

    #[test]
    fn test_alpha_preserved() {
        let img = gradient(6, 5);

        let result = convolve_3x3_u8(img.view(), &Kernel3x3::HIGH_PASS).unwrap();

        for y in 0..6 {
            for x in 0..5 {
                assert_eq!(result[[y, x, 3]], img[[y, x, 3]]);
            }
        }
    }

    #[test]
    fn test_edge_clamp_corner() {
        // 2x2 single channel: corner (0,0) sees itself 4x, right 2x, below 2x, diagonal 1x
        let mut img = Array3::<u8>::zeros((2, 2, 1));
        img[[0, 0, 0]] = 90;
        img[[0, 1, 0]] = 0;
        img[[1, 0, 0]] = 0;
        img[[1, 1, 0]] = 0;

        let result = convolve_3x3_u8(img.view(), &Kernel3x3::BOX).unwrap();

        // 4 * 90 / 9 = 40
        assert_eq!(result[[0, 0, 0]], 40);
        // (1,1) sees (0,0) once: 10
        assert_eq!(result[[1, 1, 0]], 10);
    }

    #[test]
    fn test_single_pixel_image() {
        let img = Array3::from_shape_fn((1, 1, 4), |(_, _, c)| [10u8, 20, 30, 40][c]);

        let result = convolve_3x3_u8(img.view(), &Kernel3x3::HIGH_PASS).unwrap();

        assert_eq!(result, img);
    }

    #[test]
    fn test_degenerate_shapes_pass_through() {
        let empty = Array3::<u8>::zeros((0, 3, 4));
        let no_channels = Array3::<u8>::zeros((2, 2, 0));

        let result = convolve_3x3_u8(empty.view(), &Kernel3x3::BOX).unwrap();
        assert_eq!(result.dim(), (0, 3, 4));
        let result = convolve_3x3_u8(no_channels.view(), &Kernel3x3::HIGH_PASS).unwrap();
        assert_eq!(result.dim(), (2, 2, 0));
    }

    #[test]
    fn test_rgb_input() {
        let img = Array3::from_shape_fn((3, 3, 3), |(y, x, _)| if y == 1 && x == 1 { 90 } else { 0 });

        let result = convolve_3x3_u8(img.view(), &Kernel3x3::BOX).unwrap();

        assert_eq!(result.dim(), (3, 3, 3));
        assert_eq!(result[[1, 1, 2]], 10);
        assert_eq!(result[[0, 0, 0]], 10);
    }
}
