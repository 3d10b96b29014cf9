//! Rayon-parallel metric precompute (feature-gated).
//!
//! Footprint tallies are measured in parallel against the freshly seeded
//! map, then the usual sequential pass commits claims in priority order and
//! re-measures any candidate whose neighbourhood was touched by an earlier
//! acceptance. The result is identical to [`SnakeFilter::filter`].

use crate::context::ImageContext;
use crate::contour::SnakeCandidate;
use crate::ownership::FootprintTally;
use crate::select::{prepare, FilterOutcome, SnakeFilter};
use crate::trace::trace_span;
use crate::util::SnakeFilterResult;
use rayon::prelude::*;

impl SnakeFilter {
    /// Parallel variant of [`SnakeFilter::filter`].
    pub fn filter_par<C>(
        &self,
        ctx: &C,
        candidates: &[SnakeCandidate],
    ) -> SnakeFilterResult<FilterOutcome>
    where
        C: ImageContext + ?Sized,
    {
        let map = prepare(ctx, candidates)?;
        let content = ctx.cell_content_mask();

        let tallies: Vec<FootprintTally> = {
            let _span = trace_span!("snake_tally_par", candidates = candidates.len()).entered();
            let snapshot = &map;
            candidates
                .par_iter()
                .map(|snake| snapshot.tally(&snake.footprint, content))
                .collect::<SnakeFilterResult<_>>()?
        };

        self.run_pass(ctx, candidates, map, Some(&tallies))
    }
}
