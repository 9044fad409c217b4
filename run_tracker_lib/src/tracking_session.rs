use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bounding_region::BoundingRegion;
use super::location_fix::LocationFix;
use super::route_summary::RouteSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingStatus {
    Idle,
    Tracking,
    Stopped,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingStatus::Idle => write!(f, "idle"),
            TrackingStatus::Tracking => write!(f, "tracking"),
            TrackingStatus::Stopped => write!(f, "stopped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The operation is not legal in the session's current status.
    InvalidStateTransition {
        operation: &'static str,
        status: TrackingStatus,
    },
    /// `stop` was called before any fix was recorded.
    EmptyPath,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidStateTransition { operation, status } => {
                write!(f, "cannot {} while the session is {}", operation, status)
            }
            SessionError::EmptyPath => write!(f, "no fixes were recorded in this session"),
        }
    }
}

impl std::error::Error for SessionError {}

/// One tracked run. All mutation goes through `start`, `record_fix`, `stop`
/// and `reset`; everything else is read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSession {
    status: TrackingStatus,
    path: Vec<LocationFix>,
    bounding_region: BoundingRegion,
    started_at: Option<DateTime<Utc>>,
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingSession {
    pub fn new() -> Self {
        Self {
            status: TrackingStatus::Idle,
            path: Vec::new(),
            bounding_region: BoundingRegion::new(),
            started_at: None,
        }
    }

    /// Idle -> Tracking. Clears anything left over from a previous run.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.status != TrackingStatus::Idle {
            return Err(SessionError::InvalidStateTransition {
                operation: "start",
                status: self.status,
            });
        }
        self.path.clear();
        self.bounding_region.clear();
        self.started_at = Some(Utc::now());
        self.status = TrackingStatus::Tracking;
        Ok(())
    }

    /// Append a fix to the live path and grow the bounding region around it.
    pub fn record_fix(&mut self, fix: LocationFix) -> Result<(), SessionError> {
        if self.status != TrackingStatus::Tracking {
            return Err(SessionError::InvalidStateTransition {
                operation: "record a fix",
                status: self.status,
            });
        }
        self.bounding_region.include(fix.position.into());
        self.path.push(fix);
        Ok(())
    }

    /// Tracking -> Stopped. The session freezes either way; a summary only
    /// exists if at least one fix was recorded.
    pub fn stop(&mut self) -> Result<RouteSummary, SessionError> {
        if self.status != TrackingStatus::Tracking {
            return Err(SessionError::InvalidStateTransition {
                operation: "stop",
                status: self.status,
            });
        }
        self.status = TrackingStatus::Stopped;
        match (self.path.first(), self.path.last()) {
            (Some(start), Some(end)) => Ok(RouteSummary::new(*start, *end)),
            _ => Err(SessionError::EmptyPath),
        }
    }

    /// Back to Idle from any status, dropping the recorded run.
    pub fn reset(&mut self) {
        self.path.clear();
        self.bounding_region.clear();
        self.started_at = None;
        self.status = TrackingStatus::Idle;
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn path(&self) -> &[LocationFix] {
        &self.path
    }

    pub fn bounding_region(&self) -> &BoundingRegion {
        &self.bounding_region
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }
}
