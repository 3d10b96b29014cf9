#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snakefilter::{BinaryMask, FilterConfig, Footprint, ImageRepo, SnakeCandidate, MAX_RANK};

pub fn permissive_config() -> FilterConfig {
    FilterConfig {
        min_avg_inner_darkness: 0.1,
        max_area: 100.0,
        min_area: 0.0,
        max_overlap: 0.3,
        max_free_border: 1.0,
        avg_cell_diameter: 10.0,
        star_points: 16,
    }
}

pub fn full_mask(width: usize, height: usize) -> BinaryMask {
    BinaryMask::filled(width, height, 1).unwrap()
}

pub fn rect_snake(rank: f64, x: usize, y: usize, width: usize, height: usize) -> SnakeCandidate {
    let footprint = Footprint::from_rect(x, y, width, height).unwrap();
    SnakeCandidate::new(rank, (width * height) as f64, 1.0, 0, footprint)
}

pub fn disc_footprint(x: usize, y: usize, diameter: usize) -> Footprint {
    let r = diameter as f64 / 2.0;
    Footprint::from_fn(x, y, diameter, diameter, |lx, ly| {
        let dx = lx as f64 + 0.5 - r;
        let dy = ly as f64 + 0.5 - r;
        dx * dx + dy * dy <= r * r
    })
    .unwrap()
}

pub struct Scene {
    pub repo: ImageRepo,
    pub mask: BinaryMask,
    pub candidates: Vec<SnakeCandidate>,
}

/// Random image with a masked-out band, noisy cell content, and overlapping discs.
pub fn random_scene(seed: u64, width: usize, height: usize, count: usize) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);

    let band_x = rng.random_range(0..width / 2);
    let band_w = rng.random_range(1..=width / 4);
    let mut mask_data = vec![1u8; width * height];
    for y in 0..height {
        for x in band_x..(band_x + band_w).min(width) {
            mask_data[y * width + x] = 0;
        }
    }
    let mask = BinaryMask::new(mask_data, width, height).unwrap();

    let content_data: Vec<u8> = (0..width * height)
        .map(|_| u8::from(rng.random_bool(0.85)))
        .collect();
    let content = BinaryMask::new(content_data, width, height).unwrap();

    let mut candidates = Vec::with_capacity(count);
    for _ in 0..count {
        let diameter = rng.random_range(4..=12);
        let x = rng.random_range(0..=width - diameter);
        let y = rng.random_range(0..=height - diameter);
        let footprint = disc_footprint(x, y, diameter);
        // Small rank set so ties are common.
        let rank = if rng.random_bool(0.05) {
            MAX_RANK
        } else {
            rng.random_range(0..8) as f64
        };
        let free_border = rng.random_range(0..12);
        let snake = SnakeCandidate::from_footprint(rank, footprint, content.view(), free_border)
            .unwrap();
        candidates.push(snake);
    }

    let repo = ImageRepo::new(mask.clone(), content).unwrap();
    Scene {
        repo,
        mask,
        candidates,
    }
}
