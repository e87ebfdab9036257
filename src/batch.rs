// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Renders many independent images at once.
//!
//! A single orbit cannot be split across threads: every point depends
//! on the one before it.  Distinct parameter sets are another matter.
//! Each job here owns its iterator, its grid, its normalizer, and (for
//! the chaos game) its own seeded generator, so a pool of workers can
//! pull jobs off a shared queue and run them to completion without
//! touching each other's state.  Results come back in job order no
//! matter which worker finished first.

use std::ops::Range;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{RenderError, Result};
use crate::histogram::HistogramGrid;
use crate::ifs::IfsIterator;
use crate::map_iter::MapIterator;
use crate::normalize::{IntensityGrid, Normalizer};

type JobQueue = Arc<Mutex<Range<usize>>>;

/// What a job iterates.
#[derive(Clone, Debug)]
pub enum JobKind {
    /// A deterministic map.
    Map(MapIterator),
    /// A chaos game, with the seed for its private generator.
    Ifs(IfsIterator, u64),
}

/// One image to render.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Identifies the image to the sink.
    pub name: String,
    /// The iterator.
    pub kind: JobKind,
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Per-cell cap, if any.
    pub cap: Option<f64>,
    /// How the grid becomes an image.
    pub normalizer: Normalizer,
}

impl RenderJob {
    /// A map job with no cap and the default normalizer.
    pub fn map<S: Into<String>>(
        name: S,
        iterator: MapIterator,
        width: usize,
        height: usize,
    ) -> Self {
        RenderJob {
            name: name.into(),
            kind: JobKind::Map(iterator),
            width,
            height,
            cap: None,
            normalizer: Normalizer::default(),
        }
    }

    /// A chaos-game job whose generator is seeded with `seed`.
    pub fn ifs<S: Into<String>>(
        name: S,
        iterator: IfsIterator,
        seed: u64,
        width: usize,
        height: usize,
    ) -> Self {
        RenderJob {
            name: name.into(),
            kind: JobKind::Ifs(iterator, seed),
            width,
            height,
            cap: None,
            normalizer: Normalizer::default(),
        }
    }

    /// Caps every cell of the grid.
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Replaces the normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Runs the job on the current thread.
    pub fn render(&self) -> Result<IntensityGrid> {
        let mut grid = match self.cap {
            Some(cap) => HistogramGrid::with_cap(self.width, self.height, cap)?,
            None => HistogramGrid::new(self.width, self.height)?,
        };
        match self.kind {
            JobKind::Map(ref iterator) => iterator.render(&mut grid)?,
            JobKind::Ifs(ref iterator, seed) => {
                iterator.render(&mut StdRng::seed_from_u64(seed), &mut grid)?
            }
        };
        Ok(self.normalizer.normalize(&grid))
    }
}

/// Renders every job with up to `threads` workers.  The outer error is
/// reserved for a worker dying; each job's own failure is reported in
/// its slot.
pub fn render_all(jobs: &[RenderJob], threads: usize) -> Result<Vec<Result<IntensityGrid>>> {
    let threads = threads.max(1).min(jobs.len().max(1));
    tracing::info!(jobs = jobs.len(), threads, "rendering batch");

    if threads == 1 {
        return Ok(jobs.iter().map(RenderJob::render).collect());
    }

    let queue: JobQueue = Arc::new(Mutex::new(0..jobs.len()));
    let finished = crossbeam::scope(|spawner| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let queue = queue.clone();
                spawner.spawn(move |_| {
                    let mut done = vec![];
                    loop {
                        let next = match queue.lock() {
                            Ok(mut range) => range.next(),
                            Err(_) => None,
                        };
                        match next {
                            Some(index) => {
                                let job = &jobs[index];
                                tracing::debug!(name = %job.name, "job started");
                                done.push((index, job.render()));
                            }
                            None => break,
                        }
                    }
                    done
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Vec<_>>()
    })
    .map_err(|_| RenderError::Worker("scope panicked".to_string()))?;

    let mut slots: Vec<Option<Result<IntensityGrid>>> = jobs.iter().map(|_| None).collect();
    for worker in finished {
        let done = worker.map_err(|_| RenderError::Worker("worker panicked".to_string()))?;
        for (index, result) in done {
            slots[index] = Some(result);
        }
    }
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| RenderError::Worker(format!("job {} was never run", index)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn jobs() -> Vec<RenderJob> {
        let mut jobs = vec![];
        for name in &["pickover", "svensson", "de-jong-2"] {
            let preset = catalog::find_map(name).unwrap();
            jobs.push(
                RenderJob::map(*name, preset.iterator(20_000).unwrap(), 160, 120)
                    .with_normalizer(preset.normalizer().unwrap()),
            );
        }
        for (i, name) in ["fern", "binary"].iter().enumerate() {
            let preset = catalog::find_ifs(name).unwrap();
            jobs.push(
                RenderJob::ifs(*name, preset.iterator(20_000).unwrap(), i as u64, 128, 128)
                    .with_cap(catalog::IFS_CAP),
            );
        }
        jobs
    }

    #[test]
    fn threaded_results_match_sequential_ones() {
        let jobs = jobs();
        let sequential = render_all(&jobs, 1).unwrap();
        let threaded = render_all(&jobs, 3).unwrap();
        assert_eq!(sequential.len(), jobs.len());
        for ((job, a), b) in jobs.iter().zip(sequential).zip(threaded) {
            let (a, b) = (a.unwrap(), b.unwrap());
            assert_eq!(a.width(), job.width);
            assert_eq!(a, b, "{} differs between runs", job.name);
        }
    }

    #[test]
    fn failures_stay_in_their_slot() {
        let mut jobs = jobs();
        jobs[1].width = 0;
        let results = render_all(&jobs, 2).unwrap();
        assert!(results[0].is_ok());
        assert_eq!(
            results[1],
            Err(RenderError::InvalidDimensions {
                width: 0,
                height: 120
            })
        );
        assert!(results[2].is_ok());
    }

    #[test]
    fn an_empty_batch_is_fine() {
        assert!(render_all(&[], 4).unwrap().is_empty());
    }
}
