//! Turns a density field into something an image encoder will take.
//!
//! The grid is scanned once for its extremes, the maximum is boosted or
//! attenuated by `max_factor`, and every cell is rescaled linearly onto
//! `0..=255`.  By default the result is inverted, so a heavily visited
//! pixel is dark on a light background.

use image::{GrayImage, RgbImage};

use crate::error::{self, Result};
use crate::histogram::HistogramGrid;
use crate::palette::Palette;

/// Which end of the byte range dense regions are drawn at.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Dense regions dark, empty regions white.
    Inverted,
    /// Dense regions bright, empty regions black.
    Direct,
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::Inverted
    }
}

/// Linear min/max rescaling of a `HistogramGrid`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Normalizer {
    max_factor: f64,
    polarity: Polarity,
}

impl Default for Normalizer {
    fn default() -> Self {
        Normalizer {
            max_factor: 1.0,
            polarity: Polarity::Inverted,
        }
    }
}

impl Normalizer {
    /// Constructor.  `max_factor` multiplies the observed maximum
    /// before scaling; values below one brighten sparse regions.
    pub fn new(max_factor: f64, polarity: Polarity) -> Result<Self> {
        Ok(Normalizer {
            max_factor: error::finite("max_factor", max_factor)?,
            polarity,
        })
    }

    /// The boost applied to the maximum.
    pub fn max_factor(&self) -> f64 {
        self.max_factor
    }

    /// The output polarity.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Rescales the grid.  A grid whose boosted maximum equals its
    /// minimum has no contrast to stretch, and comes out all zero.
    pub fn normalize(&self, grid: &HistogramGrid) -> IntensityGrid {
        let (min, max) = grid.min_max();
        let scaled_max = max * self.max_factor;
        let span = scaled_max - min;
        let k = 255.0 / span;

        let pixels = if span == 0.0 || !k.is_finite() {
            vec![0u8; grid.len()]
        } else {
            grid.cells()
                .iter()
                .map(|&cell| {
                    let v = num::clamp((cell - min) * k, 0.0, 255.0) as u8;
                    match self.polarity {
                        Polarity::Inverted => 255 - v,
                        Polarity::Direct => v,
                    }
                })
                .collect()
        };

        tracing::debug!(
            min,
            max,
            scaled_max,
            degenerate = (span == 0.0),
            "normalized histogram"
        );

        IntensityGrid {
            width: grid.width(),
            height: grid.height(),
            pixels,
        }
    }
}

/// An 8-bit single-channel image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityGrid {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl IntensityGrid {
    /// Wraps a buffer that has already been filled.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != error::dimensions(width, height)? {
            return Err(crate::error::RenderError::InvalidDimensions { width, height });
        }
        Ok(IntensityGrid {
            width,
            height,
            pixels,
        })
    }

    /// Width of the image.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the image.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The intensities, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Intensity at a column and row.
    pub fn get(&self, left: usize, top: usize) -> Option<u8> {
        if left < self.width && top < self.height {
            Some(self.pixels[top * self.width + left])
        } else {
            None
        }
    }

    /// As a graymap.
    pub fn to_gray_image(&self) -> GrayImage {
        let (width, height) = (self.width as u32, self.height as u32);
        GrayImage::from_fn(width, height, |x, y| {
            image::Luma([self.pixels[(y * width + x) as usize]])
        })
    }

    /// Each intensity used as an index into a palette.
    pub fn to_rgb_image(&self, palette: &Palette) -> RgbImage {
        let (width, height) = (self.width as u32, self.height as u32);
        RgbImage::from_fn(width, height, |x, y| {
            image::Rgb(palette.color(self.pixels[(y * width + x) as usize]))
        })
    }
}
