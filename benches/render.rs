#[macro_use]
extern crate criterion;
extern crate chaosplot;
extern crate rand;

use chaosplot::catalog;
use chaosplot::{HistogramGrid, Normalizer};
use criterion::Criterion;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn pickover(c: &mut Criterion) {
    let preset = catalog::find_map("pickover").unwrap();
    let it = preset.iterator(100_000).unwrap();
    c.bench_function("pickover 100k", move |b| {
        b.iter(|| {
            let mut grid = HistogramGrid::new(preset.width, preset.height).unwrap();
            it.render(&mut grid).unwrap()
        })
    });
}

fn fern(c: &mut Criterion) {
    let it = catalog::find_ifs("fern").unwrap().iterator(100_000).unwrap();
    c.bench_function("fern 100k", move |b| {
        b.iter(|| {
            let mut grid = HistogramGrid::with_cap(512, 512, catalog::IFS_CAP).unwrap();
            it.render(&mut StdRng::seed_from_u64(0), &mut grid).unwrap()
        })
    });
}

fn lorenz(c: &mut Criterion) {
    let mut view = catalog::find_flow("lorenz").unwrap().canvas().unwrap();
    c.bench_function("lorenz redraw", move |b| b.iter(|| view.redraw()));
}

fn normalize(c: &mut Criterion) {
    let mut grid = HistogramGrid::new(800, 600).unwrap();
    catalog::find_map("de-jong-2")
        .unwrap()
        .iterator(200_000)
        .unwrap()
        .render(&mut grid)
        .unwrap();
    let normalizer = Normalizer::default();
    c.bench_function("normalize 800x600", move |b| {
        b.iter(|| normalizer.normalize(&grid))
    });
}

criterion_group!(benches, pickover, fern, lorenz, normalize);
criterion_main!(benches);
