use serde::{Deserialize, Serialize};

use super::location_fix::LocationFix;

/// Start and finish of a recorded run, taken from the first and last fix of a
/// non-empty path. No routing between the two is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub start: LocationFix,
    pub end: LocationFix,
}

impl RouteSummary {
    pub fn new(start: LocationFix, end: LocationFix) -> Self {
        Self { start, end }
    }
}
