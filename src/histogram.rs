//! The density field a trajectory leaves behind.
//!
//! A `HistogramGrid` is a row-major plane of non-negative accumulators.
//! Each cell saturates at the grid's cap, so a handful of heavily
//! visited pixels cannot flatten the contrast of everything else when
//! the grid is normalized.

use itertools::{Itertools, MinMaxResult};

use crate::error::{self, RenderError, Result};
use crate::geometry::Pixel;

/// A width×height plane of bounded accumulators.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramGrid {
    width: usize,
    height: usize,
    cap: f64,
    cells: Vec<f64>,
}

impl HistogramGrid {
    /// A zero-filled grid whose cells never saturate.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        HistogramGrid::with_cap(width, height, std::f64::INFINITY)
    }

    /// A zero-filled grid whose cells saturate at `cap`.
    pub fn with_cap(width: usize, height: usize, cap: f64) -> Result<Self> {
        let len = error::dimensions(width, height)?;
        if cap.is_nan() || cap <= 0.0 {
            return Err(RenderError::InvalidCap { cap });
        }
        Ok(HistogramGrid {
            width,
            height,
            cap,
            cells: vec![0.0; len],
        })
    }

    /// Width of the grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The saturation limit of every cell.
    pub fn cap(&self) -> f64 {
        self.cap
    }

    /// The total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Describes that the grid has no cells.  Construction forbids
    /// this, but the method keeps `len` company.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The accumulators, row-major.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// One row of accumulators, if the row is on the grid.
    pub fn row(&self, top: usize) -> Option<&[f64]> {
        if top < self.height {
            let start = top * self.width;
            Some(&self.cells[start..start + self.width])
        } else {
            None
        }
    }

    /// The accumulator under a pixel, if the pixel is on the grid.
    pub fn get(&self, pixel: Pixel) -> Option<f64> {
        self.offset(pixel).map(|offset| self.cells[offset])
    }

    fn offset(&self, pixel: Pixel) -> Option<usize> {
        if pixel.0 < self.width && pixel.1 < self.height {
            Some(pixel.1 * self.width + pixel.0)
        } else {
            None
        }
    }

    /// Records one visit at a linear offset.  Returns false, and
    /// changes nothing, if the offset is off the grid.
    #[inline]
    pub fn deposit_offset(&mut self, offset: usize) -> bool {
        match self.cells.get_mut(offset) {
            Some(cell) => {
                if *cell < self.cap {
                    *cell = (*cell + 1.0).min(self.cap);
                }
                true
            }
            None => false,
        }
    }

    /// Records one visit at a pixel.
    #[inline]
    pub fn deposit(&mut self, pixel: Pixel) -> bool {
        match self.offset(pixel) {
            Some(offset) => self.deposit_offset(offset),
            None => false,
        }
    }

    /// Adds a signed amount to a pixel, keeping the cell in `[0, cap]`.
    /// Negative amounts erase.  Non-finite amounts are ignored.
    pub fn add(&mut self, pixel: Pixel, amount: f64) -> bool {
        if !amount.is_finite() {
            return false;
        }
        let cap = self.cap;
        match self.offset(pixel) {
            Some(offset) => {
                let cell = &mut self.cells[offset];
                *cell = num::clamp(*cell + amount, 0.0, cap);
                true
            }
            None => false,
        }
    }

    /// Scans the grid once for its smallest and largest accumulators.
    pub fn min_max(&self) -> (f64, f64) {
        match self.cells.iter().cloned().minmax() {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(min, max) => (min, max),
        }
    }

    /// How many cells were visited at all.
    pub fn nonzero_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0.0).count()
    }

    /// The sum of all accumulators.
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Zeroes every cell, for reuse by another pass.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = 0.0;
        }
    }
}
