//! SnakeFilter selects a non-overlapping set of cell contours from ranked candidates.
//!
//! Candidate contours ("snakes") are visited in ascending rank order and
//! checked against a quality gate; each accepted contour claims the pixels it
//! encloses that no better contour has claimed yet, so the result doubles as
//! a per-pixel segmentation. Optional features add parallel metric
//! precompute (`rayon`), mask loading via the `image` crate (`image-io`) and
//! `tracing` diagnostics.

pub mod context;
pub mod contour;
pub mod gate;
pub mod image;
pub mod lowlevel;
pub mod ownership;
pub mod select;
mod trace;
pub mod util;

pub use context::{ImageContext, ImageRepo};
pub use contour::{Footprint, SnakeCandidate, SnakeMetrics, AREA_EPSILON, MAX_RANK};
pub use gate::{FilterConfig, QualityGate, Rejection, Verdict};
pub use image::{BinaryMask, ImageView, OwnedImage};
pub use ownership::OwnershipMap;
pub use select::{AcceptedSnake, FilterOutcome, FilterReport, RejectedSnake, SnakeFilter};
pub use util::{SnakeFilterError, SnakeFilterResult};

#[cfg(feature = "image-io")]
pub use image::io;
