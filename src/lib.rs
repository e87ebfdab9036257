#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Strange attractor renderer
//!
//! A strange attractor is the set a chaotic system keeps coming back
//! to.  Start a point anywhere nearby, apply the system's rule over and
//! over, and after a short transient the point never leaves the
//! attractor, yet never repeats either.  Plot where it goes, counting
//! visits per pixel rather than merely marking them, and the density of
//! those visits draws the attractor's shape, shaded by how much time
//! the orbit spends in each region.
//!
//! chaosplot draws three kinds of system this way:
//!
//! * deterministic maps of the plane (Pickover, de Jong, Bedhead,
//!   Hopalong, symmetric icons and friends), in `maps` and `map_iter`;
//! * iterated function systems, drawn with the chaos game, in `ifs`;
//! * continuous flows such as the Lorenz system, integrated with Euler
//!   steps, in `flow`.
//!
//! Maps and IFSs accumulate into a `HistogramGrid`, which a
//! `Normalizer` rescales into an 8-bit `IntensityGrid`.  Flows can take
//! the same road, or draw straight onto a `Canvas` with saturating
//! byte arithmetic for cheap interactive redraws.  An `ImageSink`
//! persists the results.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate rand;
extern crate tracing;

pub mod batch;
pub mod catalog;
pub mod error;
pub mod flow;
pub mod geometry;
pub mod histogram;
pub mod ifs;
pub mod map_iter;
pub mod maps;
pub mod normalize;
pub mod palette;
pub mod pattern;
pub mod sink;

pub use batch::{render_all, RenderJob};
pub use error::{RenderError, Result};
pub use flow::{Canvas, DrawMode, FlowCanvas, FlowIntegrator, FlowParameters, FlowSystem};
pub use geometry::{Axis, Pixel, PlaneMapper, Point2, Point3, Projection, Viewport};
pub use histogram::HistogramGrid;
pub use ifs::{AffineTransform, IfsIterator, IfsSystem};
pub use map_iter::{DivergencePolicy, MapIterator, PassStats};
pub use maps::MapFunction;
pub use normalize::{IntensityGrid, Normalizer, Polarity};
pub use palette::Palette;
pub use pattern::{render_pattern, FieldFunction};
pub use sink::{ImageSink, MemorySink, PngSink};
