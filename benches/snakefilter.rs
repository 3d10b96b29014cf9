use criterion::{criterion_group, criterion_main, Criterion};
use snakefilter::{BinaryMask, FilterConfig, Footprint, ImageRepo, SnakeCandidate, SnakeFilter};
use std::hint::black_box;

fn make_content(width: usize, height: usize) -> BinaryMask {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(u8::from(value > 40));
        }
    }
    BinaryMask::new(data, width, height).unwrap()
}

fn disc(x: usize, y: usize, diameter: usize) -> Footprint {
    let r = diameter as f64 / 2.0;
    Footprint::from_fn(x, y, diameter, diameter, |lx, ly| {
        let dx = lx as f64 + 0.5 - r;
        let dy = ly as f64 + 0.5 - r;
        dx * dx + dy * dy <= r * r
    })
    .unwrap()
}

fn make_candidates(content: &BinaryMask, count: usize) -> Vec<SnakeCandidate> {
    let width = content.width();
    let height = content.height();
    (0..count)
        .map(|i| {
            let diameter = 20 + (i * 7) % 24;
            let x = (i * 37) % (width - diameter);
            let y = (i * 53) % (height - diameter);
            let rank = ((i * 31) % 97) as f64;
            SnakeCandidate::from_footprint(rank, disc(x, y, diameter), content.view(), i % 5)
                .unwrap()
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let content = make_content(512, 512);
    let candidates = make_candidates(&content, 600);
    let repo = ImageRepo::unmasked(content).unwrap();
    let filter = SnakeFilter::new(FilterConfig {
        avg_cell_diameter: 30.0,
        ..FilterConfig::default()
    })
    .unwrap();

    c.bench_function("filter_600_discs_512", |b| {
        b.iter(|| {
            let out = filter
                .filter(black_box(&repo), black_box(&candidates))
                .unwrap();
            black_box(out.accepted.len())
        })
    });

    #[cfg(feature = "rayon")]
    c.bench_function("filter_par_600_discs_512", |b| {
        b.iter(|| {
            let out = filter
                .filter_par(black_box(&repo), black_box(&candidates))
                .unwrap();
            black_box(out.accepted.len())
        })
    });
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
