//! Numeric bound resolution
//!
//! A field may declare both an inclusive and an exclusive bound on the same
//! side (`ge` next to `gt`, `le` next to `lt`). The resolver collapses each
//! pair into one effective bound instead of rejecting the pair as a
//! conflict:
//! - lower side: the larger value wins, inclusive only when the winner is
//!   `ge`; on an exact tie `gt` wins (exclusive)
//! - upper side: the smaller value wins, inclusive only when the winner is
//!   `le`; on an exact tie `lt` wins (exclusive)
//!
//! A bound of `0` is a real bound, not an absent one. Error messages render
//! the resolved interval so operators see one rule per side.

use std::fmt;

/// One effective bound, tagged inclusive or exclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }

    /// Whether `candidate` satisfies this bound when used as a lower limit
    fn admits_from_below(&self, candidate: f64) -> bool {
        if self.inclusive {
            candidate >= self.value
        } else {
            candidate > self.value
        }
    }

    /// Whether `candidate` satisfies this bound when used as an upper limit
    fn admits_from_above(&self, candidate: f64) -> bool {
        if self.inclusive {
            candidate <= self.value
        } else {
            candidate < self.value
        }
    }
}

/// The resolved range: at most one effective bound per side
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedRange {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl ResolvedRange {
    /// Collapse the four raw declarations into one bound per side.
    pub fn resolve(gt: Option<f64>, ge: Option<f64>, lt: Option<f64>, le: Option<f64>) -> Self {
        let lower = match (ge, gt) {
            (Some(ge), Some(gt)) => {
                // Larger wins; exclusive wins an exact tie.
                if ge > gt {
                    Some(Bound::inclusive(ge))
                } else {
                    Some(Bound::exclusive(gt))
                }
            }
            (Some(ge), None) => Some(Bound::inclusive(ge)),
            (None, Some(gt)) => Some(Bound::exclusive(gt)),
            (None, None) => None,
        };

        let upper = match (le, lt) {
            (Some(le), Some(lt)) => {
                // Smaller wins; exclusive wins an exact tie.
                if le < lt {
                    Some(Bound::inclusive(le))
                } else {
                    Some(Bound::exclusive(lt))
                }
            }
            (Some(le), None) => Some(Bound::inclusive(le)),
            (None, Some(lt)) => Some(Bound::exclusive(lt)),
            (None, None) => None,
        };

        Self { lower, upper }
    }

    /// Whether neither side carries a bound
    pub fn is_unconstrained(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }

    /// Whether `candidate` satisfies every present side.
    ///
    /// Both sides must hold when both are present (closed/open interval
    /// semantics).
    pub fn contains(&self, candidate: f64) -> bool {
        if let Some(lower) = self.lower {
            if !lower.admits_from_below(candidate) {
                return false;
            }
        }
        if let Some(upper) = self.upper {
            if !upper.admits_from_above(candidate) {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for ResolvedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => {
                let open = if lower.inclusive { '[' } else { '(' };
                let close = if upper.inclusive { ']' } else { ')' };
                write!(f, "{}{}, {}{}", open, lower.value, upper.value, close)
            }
            (Some(lower), None) => {
                let op = if lower.inclusive { ">=" } else { ">" };
                write!(f, "{} {}", op, lower.value)
            }
            (None, Some(upper)) => {
                let op = if upper.inclusive { "<=" } else { "<" };
                write!(f, "{} {}", op, upper.value)
            }
            (None, None) => write!(f, "unbounded"),
        }
    }
}
