use harris_core::Image;
use rayon::prelude::*;

use crate::error::DetectResult;
use crate::kernel::{Kernel, SeparableKernel};

/// Filtering over planar images, one row of one channel per rayon task.
///
/// Kernels are applied correlation-style (not flipped): the weight at
/// `(kx, ky)` multiplies the sample at `(x + kx - ax, y + ky - ay)`.
/// Reads outside the image are clamped to the nearest edge pixel.
pub struct Convolution;

impl Convolution {
    /// Direct 2D convolution, every channel independently
    pub fn convolve(img: &Image, kernel: &Kernel) -> DetectResult<Image> {
        let (w, h) = (img.width(), img.height());
        let (ax, ay) = kernel.anchor();
        let (kw, kh) = (kernel.width(), kernel.height());
        log::trace!("convolve {}x{}x{} with {}x{} kernel", w, h, img.channels(), kw, kh);

        let mut out = vec![0.0f32; img.data().len()];
        out.par_chunks_mut(w).enumerate().for_each(|(row, dst)| {
            let (c, y) = (row / h, row % h);
            for (x, d) in dst.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for ky in 0..kh {
                    let sy = (y + ky) as isize - ay as isize;
                    for kx in 0..kw {
                        let sx = (x + kx) as isize - ax as isize;
                        acc += kernel.weight(kx, ky) * img.get_clamped(sx, sy, c);
                    }
                }
                *d = acc;
            }
        });

        Ok(Image::from_vec(w, h, img.channels(), out)?)
    }

    /// Horizontal pass with `kernel.row()` followed by a vertical pass with
    /// `kernel.col()`
    pub fn convolve_separable(img: &Image, kernel: &SeparableKernel) -> DetectResult<Image> {
        log::trace!(
            "separable convolve {}x{}x{} with {}+{} taps",
            img.width(),
            img.height(),
            img.channels(),
            kernel.row().len(),
            kernel.col().len()
        );
        let horizontal = Self::convolve_rows(img, kernel.row())?;
        Self::convolve_cols(&horizontal, kernel.col())
    }

    fn convolve_rows(img: &Image, taps: &[f32]) -> DetectResult<Image> {
        let (w, h) = (img.width(), img.height());
        let half = (taps.len() / 2) as isize;
        let src = img.data();

        let mut out = vec![0.0f32; src.len()];
        out.par_chunks_mut(w).enumerate().for_each(|(row, dst)| {
            let line = &src[row * w..(row + 1) * w];
            for (x, d) in dst.iter_mut().enumerate() {
                *d = taps
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        let sx = (x as isize + i as isize - half).clamp(0, w as isize - 1);
                        t * line[sx as usize]
                    })
                    .sum();
            }
        });

        debug_assert_eq!(out.len(), w * h * img.channels());
        Ok(Image::from_vec(w, h, img.channels(), out)?)
    }

    fn convolve_cols(img: &Image, taps: &[f32]) -> DetectResult<Image> {
        let (w, h) = (img.width(), img.height());
        let half = (taps.len() / 2) as isize;

        let mut out = vec![0.0f32; img.data().len()];
        out.par_chunks_mut(w).enumerate().for_each(|(row, dst)| {
            let (c, y) = (row / h, row % h);
            for (x, d) in dst.iter_mut().enumerate() {
                *d = taps
                    .iter()
                    .enumerate()
                    .map(|(i, t)| t * img.get_clamped(x as isize, y as isize + i as isize - half, c))
                    .sum();
            }
        });

        Ok(Image::from_vec(w, h, img.channels(), out)?)
    }

    /// Separable Gaussian blur; `sigma <= 0` returns the input unchanged
    pub fn gaussian_blur(img: &Image, sigma: f32) -> DetectResult<Image> {
        if sigma <= 0.0 {
            return Ok(img.clone());
        }
        let kernel = SeparableKernel::gaussian(sigma)?;
        Self::convolve_separable(img, &kernel)
    }
}
