//! Ordered lists of RGB colours, indexed by intensity.
//!
//! Palettes are stored as text, one colour per line, each line three
//! small integers separated by whitespace: `R G B`.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{RenderError, Result};

/// An ordered list of RGB triplets.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Palette {
    /// Wraps a list of colours.  The list must not be empty.
    pub fn new(colors: Vec<[u8; 3]>) -> Result<Self> {
        if colors.is_empty() {
            return Err(RenderError::Palette {
                line: 0,
                reason: "palette has no colours".to_string(),
            });
        }
        Ok(Palette { colors })
    }

    /// The identity ramp: index `i` is the grey `(i, i, i)`.
    pub fn grayscale() -> Self {
        Palette {
            colors: (0..=255u8).map(|i| [i, i, i]).collect(),
        }
    }

    /// Reads a palette file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        fs::read_to_string(path)?.parse()
    }

    /// Number of colours.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; construction refuses empty palettes.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The colour for an intensity.  Short palettes wrap around.
    pub fn color(&self, index: u8) -> [u8; 3] {
        self.colors[(index as usize) % self.colors.len()]
    }
}

fn parse_component(field: &str, line: usize) -> Result<u8> {
    u8::from_str(field).map_err(|_| RenderError::Palette {
        line,
        reason: format!("'{}' is not a colour component in 0..=255", field),
    })
}

impl FromStr for Palette {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        let mut colors = vec![];
        for (index, text) in s.lines().enumerate() {
            let line = index + 1;
            let fields: Vec<&str> = text.split_whitespace().collect();
            match fields.len() {
                0 => continue,
                3 => colors.push([
                    parse_component(fields[0], line)?,
                    parse_component(fields[1], line)?,
                    parse_component(fields[2], line)?,
                ]),
                n => {
                    return Err(RenderError::Palette {
                        line,
                        reason: format!("expected 3 components, found {}", n),
                    })
                }
            }
        }
        Palette::new(colors)
    }
}
