//! Greedy, priority-ordered selection of non-overlapping contours.
//!
//! Candidates are visited once in ascending rank order (ties keep input
//! order). Each candidate is measured against the pixels already claimed by
//! better-ranked accepted contours: too much overlap rejects it outright,
//! otherwise its footprint is trimmed to the vacant pixels, its area and inner
//! darkness are recomputed on that remainder, and the quality gate decides.
//! Accepted candidates claim their vacant pixels immediately; no decision is
//! revisited. The first candidate carrying the sentinel rank ends the pass.

mod outcome;
#[cfg(feature = "rayon")]
mod rayon;

pub use outcome::{AcceptedSnake, FilterOutcome, FilterReport, RejectedSnake};

use crate::context::ImageContext;
use crate::contour::{SnakeCandidate, SnakeMetrics, AREA_EPSILON};
use crate::gate::{FilterConfig, QualityGate, Rejection, Verdict};
use crate::image::ImageView;
use crate::ownership::enforce::finalize_with_mask;
use crate::ownership::{FootprintTally, OwnershipMap};
use crate::trace::{trace_debug, trace_info, trace_span};
use crate::util::math::fraction;
use crate::util::{SnakeFilterError, SnakeFilterResult};

/// Filters candidate contours into a non-overlapping segmentation.
#[derive(Clone, Debug)]
pub struct SnakeFilter {
    cfg: FilterConfig,
    gate: QualityGate,
}

impl SnakeFilter {
    /// Validates `cfg` and precomputes the gate thresholds.
    pub fn new(cfg: FilterConfig) -> SnakeFilterResult<Self> {
        cfg.validate()?;
        let gate = QualityGate::new(&cfg);
        Ok(Self { cfg, gate })
    }

    /// Configuration the filter was built with.
    pub fn config(&self) -> &FilterConfig {
        &self.cfg
    }

    /// Quality gate derived from the configuration.
    pub fn gate(&self) -> &QualityGate {
        &self.gate
    }

    /// Checks a candidate's raw metrics without considering overlap.
    pub fn is_single_snake_discarded(&self, snake: &SnakeCandidate) -> bool {
        self.gate.is_discarded(snake)
    }

    /// Runs one greedy pass over `candidates`.
    ///
    /// `candidates` are not modified; post-trim metrics are reported in the
    /// returned [`FilterOutcome`].
    pub fn filter<C>(
        &self,
        ctx: &C,
        candidates: &[SnakeCandidate],
    ) -> SnakeFilterResult<FilterOutcome>
    where
        C: ImageContext + ?Sized,
    {
        let map = prepare(ctx, candidates)?;
        self.run_pass(ctx, candidates, map, None)
    }

    /// Runs [`SnakeFilter::filter`] and stores the segmentation in `ctx`.
    pub fn filter_into<C>(
        &self,
        ctx: &mut C,
        candidates: &[SnakeCandidate],
    ) -> SnakeFilterResult<FilterReport>
    where
        C: ImageContext + ?Sized,
    {
        let (report, segmentation) = self.filter(&*ctx, candidates)?.split();
        ctx.set_segmentation(segmentation);
        Ok(report)
    }

    /// Sequential commit pass shared by the serial and parallel entry points.
    ///
    /// `snapshot` holds tallies measured against the freshly seeded map, one
    /// per input candidate. A snapshot tally is reused only when no accepted
    /// footprint's bounding box touches the candidate's, in which case the
    /// map under the candidate is still in its seeded state.
    fn run_pass<C>(
        &self,
        ctx: &C,
        candidates: &[SnakeCandidate],
        mut map: OwnershipMap,
        snapshot: Option<&[FootprintTally]>,
    ) -> SnakeFilterResult<FilterOutcome>
    where
        C: ImageContext + ?Sized,
    {
        let _span = trace_span!("snake_filter", candidates = candidates.len()).entered();

        let content = ctx.cell_content_mask();
        let mut accepted: Vec<AcceptedSnake> = Vec::new();
        let mut rejected: Vec<RejectedSnake> = Vec::new();
        let mut stopped_at = None;

        for index in priority_order(candidates) {
            let snake = &candidates[index];

            if snake.has_sentinel_rank() {
                record_rejection(
                    &mut rejected,
                    index,
                    snake,
                    Rejection::RankTooHigh { rank: snake.rank },
                );
                stopped_at = Some(index);
                break;
            }

            let tally = match snapshot {
                Some(tallies)
                    if !accepted.iter().any(|a| {
                        candidates[a.index]
                            .footprint
                            .bbox_intersects(&snake.footprint)
                    }) =>
                {
                    tallies[index]
                }
                _ => map.tally(&snake.footprint, content)?,
            };

            match self.judge(snake, tally) {
                Ok(metrics) => {
                    let label = map.claim_vacant(&snake.footprint);
                    trace_debug!(
                        "snake_accepted",
                        index = index,
                        label = label,
                        area = metrics.area
                    );
                    accepted.push(AcceptedSnake {
                        index,
                        label,
                        rank: snake.rank,
                        area: metrics.area,
                        avg_inner_darkness: metrics.avg_inner_darkness,
                        max_contiguous_free_border: metrics.max_contiguous_free_border,
                        original_area: snake.area,
                    });
                }
                Err(rejection) => record_rejection(&mut rejected, index, snake, rejection),
            }
        }

        finalize_with_mask(&mut map, ctx.mask())?;
        trace_info!(
            "snake_filter_done",
            accepted = accepted.len(),
            rejected = rejected.len()
        );

        Ok(FilterOutcome {
            accepted,
            rejected,
            stopped_at,
            segmentation: map,
        })
    }

    /// Applies the overlap limit, then gates the metrics of the vacant remainder.
    fn judge(&self, snake: &SnakeCandidate, tally: FootprintTally) -> Result<SnakeMetrics, Rejection> {
        let overlap = fraction(tally.claimed, snake.area.max(AREA_EPSILON));
        if overlap > self.gate.max_overlap() {
            return Err(Rejection::TooMuchOverlap {
                overlap,
                max: self.gate.max_overlap(),
            });
        }

        let area = tally.vacant as f64 + AREA_EPSILON;
        let metrics = SnakeMetrics {
            area,
            avg_inner_darkness: fraction(tally.vacant_dark, area),
            max_contiguous_free_border: snake.max_contiguous_free_border,
        };
        match self.gate.evaluate_metrics(&metrics) {
            Verdict::Accept => Ok(metrics),
            Verdict::Reject(rejection) => Err(rejection),
        }
    }
}

fn record_rejection(
    rejected: &mut Vec<RejectedSnake>,
    index: usize,
    snake: &SnakeCandidate,
    reason: Rejection,
) {
    trace_debug!(
        "snake_discarded",
        index = index,
        reason = reason.reason(),
        rank = snake.rank
    );
    rejected.push(RejectedSnake {
        index,
        rank: snake.rank,
        reason,
    });
}

/// Validates inputs and seeds a fresh ownership map.
fn prepare<C>(ctx: &C, candidates: &[SnakeCandidate]) -> SnakeFilterResult<OwnershipMap>
where
    C: ImageContext + ?Sized,
{
    let mask = ctx.mask();
    let content: ImageView<'_, u8> = ctx.cell_content_mask();
    if mask.dims() != content.dims() {
        return Err(SnakeFilterError::DimensionMismatch {
            expected: mask.dims(),
            got: content.dims(),
            context: "cell-content mask",
        });
    }
    let map = OwnershipMap::from_mask(mask)?;
    for (index, snake) in candidates.iter().enumerate() {
        map.check_footprint(index, &snake.footprint)?;
    }
    Ok(map)
}

/// Input indices sorted by ascending rank; equal ranks keep input order.
///
/// NaN ranks sort last, together with the sentinel. `-0.0` and `0.0` tie.
fn priority_order(candidates: &[SnakeCandidate]) -> Vec<usize> {
    let key = |rank: f64| if rank.is_nan() { f64::INFINITY } else { rank + 0.0 };
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| key(candidates[a].rank).total_cmp(&key(candidates[b].rank)));
    order
}

#[cfg(test)]
mod tests {
    use super::{priority_order, SnakeFilter};
    use crate::context::ImageRepo;
    use crate::contour::{Footprint, SnakeCandidate, MAX_RANK};
    use crate::gate::{FilterConfig, Rejection};
    use crate::image::BinaryMask;

    fn snake(rank: f64, x: usize, y: usize, w: usize, h: usize) -> SnakeCandidate {
        let fp = Footprint::from_rect(x, y, w, h).unwrap();
        SnakeCandidate::new(rank, (w * h) as f64, 1.0, 0, fp)
    }

    fn loose() -> FilterConfig {
        FilterConfig {
            min_avg_inner_darkness: 0.5,
            max_area: 100.0,
            min_area: 0.0,
            max_overlap: 0.3,
            max_free_border: 1.0,
            avg_cell_diameter: 4.0,
            star_points: 8,
        }
    }

    fn repo(width: usize, height: usize) -> ImageRepo {
        ImageRepo::unmasked(BinaryMask::filled(width, height, 1).unwrap()).unwrap()
    }

    #[test]
    fn priority_order_is_stable_and_pushes_nan_last() {
        let snakes = vec![
            snake(2.0, 0, 0, 1, 1),
            snake(f64::NAN, 0, 0, 1, 1),
            snake(1.0, 0, 0, 1, 1),
            snake(2.0, 0, 0, 1, 1),
        ];
        assert_eq!(priority_order(&snakes), vec![2, 0, 3, 1]);
    }

    #[test]
    fn signed_zero_ranks_tie() {
        let snakes = vec![
            snake(0.0, 0, 0, 1, 1),
            snake(-0.0, 0, 0, 1, 1),
            snake(-1.0, 0, 0, 1, 1),
        ];
        assert_eq!(priority_order(&snakes), vec![2, 0, 1]);
    }

    #[test]
    fn zero_area_candidate_still_faces_overlap_limit() {
        let filter = SnakeFilter::new(loose()).unwrap();
        let mut degenerate = snake(2.0, 0, 0, 2, 2);
        degenerate.area = 0.0;
        let snakes = vec![snake(1.0, 0, 0, 2, 2), degenerate];
        let out = filter.filter(&repo(4, 4), &snakes).unwrap();
        assert_eq!(out.accepted_indices(), vec![0]);
        assert!(matches!(
            out.rejected[0].reason,
            Rejection::TooMuchOverlap { .. }
        ));
    }

    #[test]
    fn sentinel_stops_the_pass() {
        let filter = SnakeFilter::new(loose()).unwrap();
        let snakes = vec![
            snake(1.0, 0, 0, 2, 2),
            snake(MAX_RANK, 4, 4, 2, 2),
            snake(MAX_RANK + 1.0, 8, 8, 2, 2),
        ];
        let out = filter.filter(&repo(12, 12), &snakes).unwrap();
        assert_eq!(out.accepted.len(), 1);
        assert_eq!(out.stopped_at, Some(1));
        assert_eq!(out.rejected.len(), 1);
        assert!(matches!(
            out.rejected[0].reason,
            Rejection::RankTooHigh { .. }
        ));
    }

    #[test]
    fn nan_rank_acts_as_sentinel() {
        let filter = SnakeFilter::new(loose()).unwrap();
        let snakes = vec![snake(f64::NAN, 0, 0, 2, 2), snake(3.0, 4, 4, 2, 2)];
        let out = filter.filter(&repo(8, 8), &snakes).unwrap();
        assert_eq!(out.accepted_indices(), vec![1]);
        assert_eq!(out.stopped_at, Some(0));
    }

    #[test]
    fn overlap_is_measured_against_original_area() {
        let filter = SnakeFilter::new(loose()).unwrap();
        // Second snake: 2 of 8 pixels taken -> 0.25 overlap, trimmed to 6.
        let snakes = vec![snake(1.0, 0, 0, 2, 2), snake(2.0, 1, 0, 2, 4)];
        let out = filter.filter(&repo(6, 6), &snakes).unwrap();
        assert_eq!(out.accepted.len(), 2);
        let trimmed = &out.accepted[1];
        assert_eq!(trimmed.label, 2);
        assert!((trimmed.area - 6.0).abs() < 1e-6);
        assert!((trimmed.original_area - 8.0).abs() < 1e-6);
        assert_eq!(out.segmentation.claimed_count(2), 6);
    }

    #[test]
    fn out_of_bounds_footprint_is_an_error() {
        let filter = SnakeFilter::new(loose()).unwrap();
        let snakes = vec![snake(1.0, 5, 5, 2, 2)];
        assert!(filter.filter(&repo(6, 6), &snakes).is_err());
    }

    #[test]
    fn filter_into_stores_segmentation() {
        let filter = SnakeFilter::new(loose()).unwrap();
        let mut ctx = repo(4, 4);
        let report = filter
            .filter_into(&mut ctx, &[snake(0.5, 0, 0, 2, 2)])
            .unwrap();
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(ctx.segmentation().map(|s| s.claimed_count(1)), Some(4));
    }
}
