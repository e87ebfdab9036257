//! The families of 2D recurrences chaosplot knows how to draw.
//!
//! Every family is a pure function from the current point and a handful
//! of constants to the next point.  They are kept as variants of one
//! enum so a renderer can hold "some map" by value, copy it to another
//! thread, and print it, without boxing closures.

use num::Complex;

use crate::error::{self, RenderError, Result};
use crate::geometry::Point2;
use crate::ifs::AffineTransform;

/// Sign used by Hopalong and Threeply: one for positive, zero otherwise.
#[inline]
fn step(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Sign used by Quadruptwo: one for positive, minus one otherwise.
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        -1.0
    }
}

#[inline]
fn gumowski(x: f64, mu: f64) -> f64 {
    x * mu + 2.0 * x * x * (1.0 - mu) / (1.0 + x * x)
}

/// A deterministic map of the plane onto itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MapFunction {
    /// `x' = sin(a·y) + c·cos(a·x)`, `y' = sin(b·x) + d·cos(b·y)`
    #[allow(missing_docs)]
    Pickover { a: f64, b: f64, c: f64, d: f64 },
    /// `x' = sin(b·y) − c·sin(b·x)`, `y' = sin(a·x) − d·sin(a·y)`
    #[allow(missing_docs)]
    FractalDream { a: f64, b: f64, c: f64, d: f64 },
    /// `x' = cos(b·y) + c·sin(b·x)`, `y' = cos(a·x) + d·sin(a·y)`
    #[allow(missing_docs)]
    JasonRampe1 { a: f64, b: f64, c: f64, d: f64 },
    /// `x' = cos(b·y) + c·cos(b·x)`, `y' = cos(a·x) + d·cos(a·y)`
    #[allow(missing_docs)]
    JasonRampe2 { a: f64, b: f64, c: f64, d: f64 },
    /// `x' = d·sin(a·x) − sin(b·y)`, `y' = c·cos(a·x) + cos(b·y)`
    #[allow(missing_docs)]
    Svensson { a: f64, b: f64, c: f64, d: f64 },
    /// `x' = sin(a·y) − cos(b·x)`, `y' = sin(c·x) − cos(d·y)`
    #[allow(missing_docs)]
    DeJong { a: f64, b: f64, c: f64, d: f64 },
    /// `x' = sin(x·y/b)·y + cos(a·x − y)`, `y' = x + sin(y)/b`
    #[allow(missing_docs)]
    Bedhead { a: f64, b: f64 },
    /// `x' = y − step(x)·√|b·x − c|`, `y' = a − x`
    #[allow(missing_docs)]
    Hopalong { a: f64, b: f64, c: f64 },
    /// `x' = y − step(x)·|sin(x)·cos(b) + c − x·sin(a+b+c)|`, `y' = a − x`
    #[allow(missing_docs)]
    Threeply { a: f64, b: f64, c: f64 },
    /// `x' = y − sign(x)·sin(ln|b·x − c|)·atan(ln²|c·x − b|)`, `y' = a − x`
    #[allow(missing_docs)]
    Quadruptwo { a: f64, b: f64, c: f64 },
    /// Gumowski-Mira, with `g(x) = μ·x + 2x²(1−μ)/(1+x²)`:
    /// `x' = a·y·(1 − b·y²) + y + g(x)`, `y' = −x + g(x')`
    #[allow(missing_docs)]
    GumowskiMira { a: f64, b: f64, mu: f64 },
    /// Field and Golubitsky's symmetric icon of the given degree.
    #[allow(missing_docs)]
    SymmetricIcon {
        lambda: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
        omega: f64,
        degree: u32,
    },
    /// A single affine transform.
    Affine(AffineTransform),
}

impl MapFunction {
    /// A short name for the family.
    pub fn name(&self) -> &'static str {
        match self {
            MapFunction::Pickover { .. } => "pickover",
            MapFunction::FractalDream { .. } => "fractal-dream",
            MapFunction::JasonRampe1 { .. } => "jason-rampe-1",
            MapFunction::JasonRampe2 { .. } => "jason-rampe-2",
            MapFunction::Svensson { .. } => "svensson",
            MapFunction::DeJong { .. } => "de-jong",
            MapFunction::Bedhead { .. } => "bedhead",
            MapFunction::Hopalong { .. } => "hopalong",
            MapFunction::Threeply { .. } => "threeply",
            MapFunction::Quadruptwo { .. } => "quadruptwo",
            MapFunction::GumowskiMira { .. } => "gumowski-mira",
            MapFunction::SymmetricIcon { .. } => "symmetric-icon",
            MapFunction::Affine(_) => "affine",
        }
    }

    /// The point each family traditionally starts from.
    pub fn default_seed(&self) -> Point2 {
        match self {
            MapFunction::Pickover { .. }
            | MapFunction::FractalDream { .. }
            | MapFunction::JasonRampe1 { .. }
            | MapFunction::JasonRampe2 { .. }
            | MapFunction::Svensson { .. }
            | MapFunction::Threeply { .. } => Point2::new(0.1, 0.0),
            MapFunction::GumowskiMira { .. } => Point2::new(0.0, 0.1),
            MapFunction::SymmetricIcon { .. } => Point2::new(0.01, 0.01),
            MapFunction::Affine(_) => Point2::new(1.0, 1.0),
            _ => Point2::new(0.0, 0.0),
        }
    }

    /// Checks the constants before any iteration.
    pub fn validate(&self) -> Result<()> {
        match *self {
            MapFunction::Pickover { a, b, c, d }
            | MapFunction::FractalDream { a, b, c, d }
            | MapFunction::JasonRampe1 { a, b, c, d }
            | MapFunction::JasonRampe2 { a, b, c, d }
            | MapFunction::Svensson { a, b, c, d }
            | MapFunction::DeJong { a, b, c, d } => {
                error::finite("a", a)?;
                error::finite("b", b)?;
                error::finite("c", c)?;
                error::finite("d", d)?;
            }
            MapFunction::Bedhead { a, b } => {
                error::finite("a", a)?;
                if error::finite("b", b)? == 0.0 {
                    return Err(RenderError::InvalidParameter { name: "b", value: b });
                }
            }
            MapFunction::Hopalong { a, b, c }
            | MapFunction::Threeply { a, b, c }
            | MapFunction::Quadruptwo { a, b, c } => {
                error::finite("a", a)?;
                error::finite("b", b)?;
                error::finite("c", c)?;
            }
            MapFunction::GumowskiMira { a, b, mu } => {
                error::finite("a", a)?;
                error::finite("b", b)?;
                error::finite("mu", mu)?;
            }
            MapFunction::SymmetricIcon {
                lambda,
                alpha,
                beta,
                gamma,
                omega,
                degree,
            } => {
                error::finite("lambda", lambda)?;
                error::finite("alpha", alpha)?;
                error::finite("beta", beta)?;
                error::finite("gamma", gamma)?;
                error::finite("omega", omega)?;
                if degree < 2 {
                    return Err(RenderError::InvalidParameter {
                        name: "degree",
                        value: f64::from(degree),
                    });
                }
            }
            MapFunction::Affine(t) => t.validate(0)?,
        }
        Ok(())
    }

    /// Computes the point after `p`.
    #[inline]
    pub fn apply(&self, p: Point2) -> Point2 {
        let (x, y) = (p.x, p.y);
        match *self {
            MapFunction::Pickover { a, b, c, d } => Point2::new(
                (a * y).sin() + c * (a * x).cos(),
                (b * x).sin() + d * (b * y).cos(),
            ),
            MapFunction::FractalDream { a, b, c, d } => Point2::new(
                (b * y).sin() - c * (b * x).sin(),
                (a * x).sin() - d * (a * y).sin(),
            ),
            MapFunction::JasonRampe1 { a, b, c, d } => Point2::new(
                (b * y).cos() + c * (b * x).sin(),
                (a * x).cos() + d * (a * y).sin(),
            ),
            MapFunction::JasonRampe2 { a, b, c, d } => Point2::new(
                (b * y).cos() + c * (b * x).cos(),
                (a * x).cos() + d * (a * y).cos(),
            ),
            MapFunction::Svensson { a, b, c, d } => Point2::new(
                d * (x * a).sin() - (y * b).sin(),
                c * (x * a).cos() + (y * b).cos(),
            ),
            MapFunction::DeJong { a, b, c, d } => Point2::new(
                (a * y).sin() - (b * x).cos(),
                (c * x).sin() - (d * y).cos(),
            ),
            MapFunction::Bedhead { a, b } => Point2::new(
                (x * y / b).sin() * y + (a * x - y).cos(),
                x + y.sin() / b,
            ),
            MapFunction::Hopalong { a, b, c } => {
                Point2::new(y - step(x) * (b * x - c).abs().sqrt(), a - x)
            }
            MapFunction::Threeply { a, b, c } => Point2::new(
                y - step(x) * (x.sin() * b.cos() + c - x * (a + b + c).sin()).abs(),
                a - x,
            ),
            MapFunction::Quadruptwo { a, b, c } => {
                let outer = (b * x - c).abs().ln().sin();
                let inner = (c * x - b).abs().ln();
                Point2::new(y - sign(x) * outer * (inner * inner).atan(), a - x)
            }
            MapFunction::GumowskiMira { a, b, mu } => {
                let xn = a * y * (1.0 - b * y * y) + y + gumowski(x, mu);
                Point2::new(xn, -x + gumowski(xn, mu))
            }
            MapFunction::SymmetricIcon {
                lambda,
                alpha,
                beta,
                gamma,
                omega,
                degree,
            } => {
                let z = Complex::new(x, y);
                // z^(degree - 1), built by repeated multiplication.
                let mut w = z;
                for _ in 2..degree {
                    w = w * z;
                }
                let zn = x * w.re - y * w.im;
                let p = lambda + alpha * z.norm_sqr() + beta * zn;
                Point2::new(
                    p * x + gamma * w.re - omega * y,
                    p * y - gamma * w.im + omega * x,
                )
            }
            MapFunction::Affine(t) => t.apply(p),
        }
    }
}
