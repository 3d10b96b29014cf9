//! Rejection reasons and gate verdicts.

use std::fmt;

/// Why a candidate was not accepted.
///
/// Rejections are ordinary outcomes, reported for diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rejection {
    /// Rank is at or above the invalid sentinel.
    RankTooHigh { rank: f64 },
    /// Too large a share of the footprint was already claimed.
    TooMuchOverlap { overlap: f64, max: f64 },
    /// Not enough of the footprint lies inside the cell-content region.
    DarknessTooLow { darkness: f64, min: f64 },
    /// Area exceeds the configured maximum.
    AreaTooBig { area: f64, max: f64 },
    /// Area is below the configured minimum.
    AreaTooSmall { area: f64, min: f64 },
    /// Longest unsupported boundary run is too long.
    FreeBorderTooLong { free_border: usize, max: f64 },
}

impl Rejection {
    /// Short human-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::RankTooHigh { .. } => "too high rank",
            Rejection::TooMuchOverlap { .. } => "too much overlapping",
            Rejection::DarknessTooLow { .. } => "too low inner darkness",
            Rejection::AreaTooBig { .. } => "too big area",
            Rejection::AreaTooSmall { .. } => "too small area",
            Rejection::FreeBorderTooLong { .. } => "too long contiguous free border",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Rejection::RankTooHigh { rank } => write!(f, "{}: {rank}", self.reason()),
            Rejection::TooMuchOverlap { overlap, max } => {
                write!(f, "{}: {overlap:.3} over {max}", self.reason())
            }
            Rejection::DarknessTooLow { darkness, min } => {
                write!(f, "{}: {darkness:.3} under {min}", self.reason())
            }
            Rejection::AreaTooBig { area, max } => {
                write!(f, "{}: {area:.1} over {max:.1}", self.reason())
            }
            Rejection::AreaTooSmall { area, min } => {
                write!(f, "{}: {area:.1} under {min:.1}", self.reason())
            }
            Rejection::FreeBorderTooLong { free_border, max } => {
                write!(f, "{}: {free_border} over {max}", self.reason())
            }
        }
    }
}

/// Outcome of a quality-gate evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    /// True for [`Verdict::Accept`].
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

#[cfg(test)]
mod tests {
    use super::Rejection;

    #[test]
    fn display_includes_reason_and_value() {
        let text = Rejection::FreeBorderTooLong {
            free_border: 7,
            max: 4.0,
        }
        .to_string();
        assert_eq!(text, "too long contiguous free border: 7 over 4");
    }
}
