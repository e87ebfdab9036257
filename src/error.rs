// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Every way a render can be refused.  All of these are raised while a
//! renderer is being configured; once an iteration loop has started,
//! nothing in it can fail.

use failure::Fail;

/// Configuration errors reported before any iteration begins.
#[derive(Debug, Fail, PartialEq)]
pub enum RenderError {
    /// A grid, canvas, or image with no area, or too large to hold.
    #[fail(
        display = "Invalid dimensions {}x{}: the surface is empty or too large",
        width, height
    )]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// An iterated function system with nothing in it.
    #[fail(display = "The transform list is empty")]
    EmptyTransformList,

    /// A selection weight that is negative, NaN, or infinite.
    #[fail(display = "Transform {} has an invalid weight {}", index, weight)]
    InvalidWeight {
        /// Position of the offending transform.
        index: usize,
        /// The weight as given.
        weight: f64,
    },

    /// Weights that do not add up to one.
    #[fail(display = "Transform weights sum to {}, expected 1.0", sum)]
    WeightSum {
        /// The observed sum.
        sum: f64,
    },

    /// A transient at least as long as the whole pass.
    #[fail(
        display = "Settle-down count {} must be smaller than the iteration count {}",
        settle_down, iterations
    )]
    SettleDownTooLarge {
        /// Requested settle-down count.
        settle_down: usize,
        /// Requested iteration count.
        iterations: usize,
    },

    /// A numeric parameter outside its domain.
    #[fail(display = "Parameter {} has an invalid value {}", name, value)]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The value as given.
        value: f64,
    },

    /// A saturation cap that is not a positive number.
    #[fail(display = "Accumulator cap must be positive, got {}", cap)]
    InvalidCap {
        /// The cap as given.
        cap: f64,
    },

    /// A line of a palette file that is not three bytes.
    #[fail(display = "Palette line {}: {}", line, reason)]
    Palette {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Reading a palette or writing an image failed.
    #[fail(display = "I/O error: {}", _0)]
    Io(String),

    /// The image encoder refused the buffer.
    #[fail(display = "Could not encode image: {}", _0)]
    Encode(String),

    /// A batch worker thread panicked.
    #[fail(display = "A render worker died: {}", _0)]
    Worker(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err.to_string())
    }
}

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Rejects a parameter that is NaN or infinite.
pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RenderError::InvalidParameter { name, value })
    }
}

// No buffer may hold more elements than an f64 slice can address.
const MAX_ELEMENTS: usize = isize::max_value() as usize / 8;

/// Rejects a zero-area surface, or one too large to allocate, and
/// returns how many elements it holds at `channels` per pixel.
pub(crate) fn surface(width: usize, height: usize, channels: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|cells| cells.checked_mul(channels))
        .filter(|&len| len <= MAX_ELEMENTS)
        .ok_or(RenderError::InvalidDimensions { width, height })
}

/// Rejects a surface `surface` would, and returns its cell count.
pub(crate) fn dimensions(width: usize, height: usize) -> Result<usize> {
    surface(width, height, 1)
}

/// Rejects a transient that would swallow the whole pass.
pub(crate) fn settle_down(settle_down: usize, iterations: usize) -> Result<()> {
    if settle_down >= iterations {
        Err(RenderError::SettleDownTooLarge {
            settle_down,
            iterations,
        })
    } else {
        Ok(())
    }
}
