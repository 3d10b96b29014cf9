//! Records produced by a filter pass.

use crate::contour::SnakeCandidate;
use crate::gate::Rejection;
use crate::ownership::OwnershipMap;

/// A candidate that passed the filter, with its post-trim metrics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceptedSnake {
    /// Position of the candidate in the input slice.
    pub index: usize,
    /// Label of the candidate's pixels in the ownership map (1-based).
    pub label: i32,
    /// Candidate rank.
    pub rank: f64,
    /// Vacant pixel count at acceptance (plus the area epsilon).
    pub area: f64,
    /// Fraction of the vacant pixels inside the cell-content region.
    pub avg_inner_darkness: f64,
    /// Longest unsupported boundary run, unchanged by trimming.
    pub max_contiguous_free_border: usize,
    /// Area the candidate arrived with.
    pub original_area: f64,
}

impl AcceptedSnake {
    /// True when part of the footprint was already claimed.
    pub fn was_trimmed(&self) -> bool {
        self.area < self.original_area
    }
}

/// A candidate that was evaluated and turned down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RejectedSnake {
    /// Position of the candidate in the input slice.
    pub index: usize,
    /// Candidate rank.
    pub rank: f64,
    /// First failed check.
    pub reason: Rejection,
}

/// Accepted and rejected records of a pass, without the map.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterReport {
    /// Accepted candidates in acceptance order.
    pub accepted: Vec<AcceptedSnake>,
    /// Rejected candidates in evaluation order.
    pub rejected: Vec<RejectedSnake>,
    /// Input index of the sentinel-ranked candidate that ended the pass.
    pub stopped_at: Option<usize>,
}

/// Full result of a filter pass.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterOutcome {
    /// Accepted candidates in acceptance order.
    pub accepted: Vec<AcceptedSnake>,
    /// Rejected candidates in evaluation order.
    pub rejected: Vec<RejectedSnake>,
    /// Input index of the sentinel-ranked candidate that ended the pass.
    ///
    /// Candidates ordered after it were never evaluated and appear in neither list.
    pub stopped_at: Option<usize>,
    /// Finalized ownership map.
    pub segmentation: OwnershipMap,
}

impl FilterOutcome {
    /// Splits into the per-candidate report and the ownership map.
    pub fn split(self) -> (FilterReport, OwnershipMap) {
        (
            FilterReport {
                accepted: self.accepted,
                rejected: self.rejected,
                stopped_at: self.stopped_at,
            },
            self.segmentation,
        )
    }

    /// Input indices of the accepted candidates, in acceptance order.
    pub fn accepted_indices(&self) -> Vec<usize> {
        self.accepted.iter().map(|a| a.index).collect()
    }

    /// Clones of the accepted candidates carrying their post-trim metrics.
    ///
    /// `candidates` must be the slice the pass ran on.
    pub fn accepted_candidates(&self, candidates: &[SnakeCandidate]) -> Vec<SnakeCandidate> {
        self.accepted
            .iter()
            .filter_map(|a| {
                let mut snake = candidates.get(a.index)?.clone();
                snake.area = a.area;
                snake.avg_inner_darkness = a.avg_inner_darkness;
                Some(snake)
            })
            .collect()
    }

    /// Writes post-trim area and darkness back into the accepted candidates.
    pub fn apply_metrics(&self, candidates: &mut [SnakeCandidate]) {
        for a in &self.accepted {
            if let Some(snake) = candidates.get_mut(a.index) {
                snake.area = a.area;
                snake.avg_inner_darkness = a.avg_inner_darkness;
            }
        }
    }
}
