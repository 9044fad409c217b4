use core::fmt;

use run_tracker_lib::tracking_session::SessionError;

pub mod buffer;
pub mod gpx_util;
pub mod location_request;
pub mod location_source;
mod session_manager;

pub use session_manager::*;

#[derive(Debug)]
pub enum TrackManagerError {
    Session(SessionError),
    Buffer(String),
    Gpx(String),
}

impl fmt::Display for TrackManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackManagerError::Session(err) => write!(f, "{}", err),
            TrackManagerError::Buffer(msg) => write!(f, "Buffer error: {}", msg),
            TrackManagerError::Gpx(msg) => write!(f, "GPX error: {}", msg),
        }
    }
}

impl std::error::Error for TrackManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackManagerError::Session(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SessionError> for TrackManagerError {
    fn from(err: SessionError) -> Self {
        TrackManagerError::Session(err)
    }
}
