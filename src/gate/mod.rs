//! Quality gate: threshold checks on a candidate's scalar metrics.
//!
//! Checks run in a fixed order and the first failure wins:
//! rank sentinel, inner darkness, maximum area, minimum area, free border.
//! Area bounds are multipliers of the disc area of the average cell diameter;
//! the free-border bound is a fraction of the star point count.

mod rejection;

pub use rejection::{Rejection, Verdict};

use crate::contour::{SnakeCandidate, SnakeMetrics, MAX_RANK};
use crate::util::math::circle_area;
use crate::util::{SnakeFilterError, SnakeFilterResult};

/// Thresholds for accepting a candidate contour.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterConfig {
    /// Minimum fraction of enclosed pixels inside the cell-content region.
    pub min_avg_inner_darkness: f64,
    /// Maximum area as a multiple of the average cell disc area.
    pub max_area: f64,
    /// Minimum area as a multiple of the average cell disc area.
    pub min_area: f64,
    /// Maximum fraction of a candidate's area already claimed, in `[0, 1]`.
    pub max_overlap: f64,
    /// Maximum contiguous free border as a fraction of `star_points`.
    pub max_free_border: f64,
    /// Expected cell diameter in pixels.
    pub avg_cell_diameter: f64,
    /// Number of boundary points per star contour.
    pub star_points: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_avg_inner_darkness: 0.1,
            max_area: 2.0,
            min_area: 0.07,
            max_overlap: 0.3,
            max_free_border: 0.4,
            avg_cell_diameter: 35.0,
            star_points: 36,
        }
    }
}

impl FilterConfig {
    /// Validates configuration values.
    pub fn validate(&self) -> SnakeFilterResult<()> {
        if !self.min_avg_inner_darkness.is_finite() {
            return Err(invalid("min_avg_inner_darkness", "must be finite"));
        }
        if !self.max_area.is_finite() || self.max_area < 0.0 {
            return Err(invalid("max_area", "must be finite and >= 0"));
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(invalid("min_area", "must be finite and >= 0"));
        }
        if self.min_area > self.max_area {
            return Err(invalid("min_area", "must not exceed max_area"));
        }
        if !(0.0..=1.0).contains(&self.max_overlap) {
            return Err(invalid("max_overlap", "must be within [0, 1]"));
        }
        if !self.max_free_border.is_finite() || self.max_free_border < 0.0 {
            return Err(invalid("max_free_border", "must be finite and >= 0"));
        }
        if !self.avg_cell_diameter.is_finite() || self.avg_cell_diameter <= 0.0 {
            return Err(invalid("avg_cell_diameter", "must be finite and > 0"));
        }
        if self.star_points == 0 {
            return Err(invalid("star_points", "must be > 0"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> SnakeFilterError {
    SnakeFilterError::InvalidConfig { field, reason }
}

/// Precomputed pixel-space thresholds derived from a [`FilterConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QualityGate {
    min_avg_inner_darkness: f64,
    max_area_px: f64,
    min_area_px: f64,
    max_free_border_pts: f64,
    max_overlap: f64,
}

impl QualityGate {
    /// Derives pixel-space thresholds from `cfg`.
    pub fn new(cfg: &FilterConfig) -> Self {
        let cell_area = circle_area(cfg.avg_cell_diameter);
        Self {
            min_avg_inner_darkness: cfg.min_avg_inner_darkness,
            max_area_px: cfg.max_area * cell_area,
            min_area_px: cfg.min_area * cell_area,
            max_free_border_pts: cfg.star_points as f64 * cfg.max_free_border,
            max_overlap: cfg.max_overlap,
        }
    }

    /// Largest accepted area in pixels.
    pub fn max_area_px(&self) -> f64 {
        self.max_area_px
    }

    /// Smallest accepted area in pixels.
    pub fn min_area_px(&self) -> f64 {
        self.min_area_px
    }

    /// Longest accepted contiguous free border in points.
    pub fn max_free_border_pts(&self) -> f64 {
        self.max_free_border_pts
    }

    /// Largest accepted fraction of already-claimed footprint.
    pub fn max_overlap(&self) -> f64 {
        self.max_overlap
    }

    /// Runs every check, starting with the rank sentinel.
    pub fn evaluate(&self, rank: f64, metrics: &SnakeMetrics) -> Verdict {
        if rank.is_nan() || rank >= MAX_RANK {
            return Verdict::Reject(Rejection::RankTooHigh { rank });
        }
        self.evaluate_metrics(metrics)
    }

    /// Runs the darkness, area and free-border checks.
    ///
    /// Used on overlap-adjusted metrics, where the rank was already checked.
    pub fn evaluate_metrics(&self, metrics: &SnakeMetrics) -> Verdict {
        if metrics.avg_inner_darkness < self.min_avg_inner_darkness {
            return Verdict::Reject(Rejection::DarknessTooLow {
                darkness: metrics.avg_inner_darkness,
                min: self.min_avg_inner_darkness,
            });
        }
        if metrics.area > self.max_area_px {
            return Verdict::Reject(Rejection::AreaTooBig {
                area: metrics.area,
                max: self.max_area_px,
            });
        }
        if metrics.area < self.min_area_px {
            return Verdict::Reject(Rejection::AreaTooSmall {
                area: metrics.area,
                min: self.min_area_px,
            });
        }
        if metrics.max_contiguous_free_border as f64 > self.max_free_border_pts {
            return Verdict::Reject(Rejection::FreeBorderTooLong {
                free_border: metrics.max_contiguous_free_border,
                max: self.max_free_border_pts,
            });
        }
        Verdict::Accept
    }

    /// Sanity check of a candidate's raw metrics, without overlap handling.
    pub fn is_discarded(&self, snake: &SnakeCandidate) -> bool {
        !self.evaluate(snake.rank, &snake.metrics()).is_accept()
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterConfig, QualityGate, Rejection, Verdict};
    use crate::contour::{SnakeMetrics, MAX_RANK};

    fn permissive() -> FilterConfig {
        FilterConfig {
            min_avg_inner_darkness: 0.2,
            max_area: 4.0,
            min_area: 0.01,
            max_overlap: 0.3,
            max_free_border: 0.5,
            avg_cell_diameter: 10.0,
            star_points: 10,
        }
    }

    fn metrics(area: f64, darkness: f64, free_border: usize) -> SnakeMetrics {
        SnakeMetrics {
            area,
            avg_inner_darkness: darkness,
            max_contiguous_free_border: free_border,
        }
    }

    #[test]
    fn thresholds_scale_with_cell_disc() {
        let gate = QualityGate::new(&permissive());
        let disc = 100.0 * std::f64::consts::PI / 4.0;
        assert!((gate.max_area_px() - 4.0 * disc).abs() < 1e-9);
        assert!((gate.min_area_px() - 0.01 * disc).abs() < 1e-9);
        assert!((gate.max_free_border_pts() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn accepts_plausible_metrics() {
        let gate = QualityGate::new(&permissive());
        assert_eq!(gate.evaluate(1.0, &metrics(50.0, 0.8, 2)), Verdict::Accept);
    }

    #[test]
    fn first_failure_wins() {
        let gate = QualityGate::new(&permissive());
        // Darkness fails before the area check is reached.
        let verdict = gate.evaluate(1.0, &metrics(1e6, 0.1, 100));
        assert!(matches!(
            verdict,
            Verdict::Reject(Rejection::DarknessTooLow { .. })
        ));
        let verdict = gate.evaluate(MAX_RANK, &metrics(1e6, 0.1, 100));
        assert!(matches!(
            verdict,
            Verdict::Reject(Rejection::RankTooHigh { .. })
        ));
    }

    #[test]
    fn each_bound_rejects() {
        let gate = QualityGate::new(&permissive());
        assert!(matches!(
            gate.evaluate_metrics(&metrics(1000.0, 0.9, 0)),
            Verdict::Reject(Rejection::AreaTooBig { .. })
        ));
        assert!(matches!(
            gate.evaluate_metrics(&metrics(0.5, 0.9, 0)),
            Verdict::Reject(Rejection::AreaTooSmall { .. })
        ));
        assert!(matches!(
            gate.evaluate_metrics(&metrics(50.0, 0.9, 6)),
            Verdict::Reject(Rejection::FreeBorderTooLong { .. })
        ));
        // Equal to the bound is still accepted.
        assert_eq!(gate.evaluate_metrics(&metrics(50.0, 0.9, 5)), Verdict::Accept);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(FilterConfig::default().validate().is_ok());
        let bad_overlap = FilterConfig {
            max_overlap: 1.5,
            ..FilterConfig::default()
        };
        assert!(bad_overlap.validate().is_err());
        let swapped = FilterConfig {
            min_area: 3.0,
            max_area: 1.0,
            ..FilterConfig::default()
        };
        assert!(swapped.validate().is_err());
        let no_points = FilterConfig {
            star_points: 0,
            ..FilterConfig::default()
        };
        assert!(no_points.validate().is_err());
    }
}
