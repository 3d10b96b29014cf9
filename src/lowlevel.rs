//! Low-level building blocks for custom filtering pipelines.
//!
//! These expose the ownership map, its mask enforcement and the quality gate
//! separately from the high-level [`crate::SnakeFilter`]. Most users should
//! prefer `SnakeFilter::filter`.

pub use crate::gate::{QualityGate, Rejection, Verdict};
pub use crate::ownership::enforce::{finalize_with_mask, seed_exclusions};
pub use crate::ownership::{FootprintTally, OwnershipMap, EXCLUDED, UNCLAIMED};
