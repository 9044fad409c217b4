use std::time::Duration;

/// How eagerly a source should produce fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    HighAccuracy,
    BalancedPowerAccuracy,
    LowPower,
    Passive,
}

/// Tuning for fix delivery. Defaults follow a run closely: high accuracy, one
/// fix per second, nothing held back longer than a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRequest {
    pub priority: Priority,
    pub interval: Duration,
    pub max_update_delay: Duration,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            priority: Priority::HighAccuracy,
            interval: Duration::from_secs(1),
            max_update_delay: Duration::from_secs(1),
        }
    }
}

impl LocationRequest {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }
}
