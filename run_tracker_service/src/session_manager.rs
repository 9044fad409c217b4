use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use run_tracker_lib::{
    bounding_region::BoundingRegion,
    location_fix::LocationFix,
    route_summary::RouteSummary,
    tracking_session::{TrackingSession, TrackingStatus},
};
use tokio::sync::{Mutex, broadcast};

use crate::{TrackManagerError, buffer::FixBuffer};

struct SessionState {
    session: TrackingSession,
    buffer: Option<FixBuffer>,
    recovered: Vec<LocationFix>,
}

/// The public interface for driving the live tracking session.
///
/// All four mutating operations go through the same mutex, so a location
/// source and a caller stopping the run can never interleave mid-operation.
#[derive(Clone)]
pub struct SessionManager {
    state: Arc<Mutex<SessionState>>,
    live_updates: broadcast::Sender<LocationFix>,
    data_dir: PathBuf,
}

impl SessionManager {
    /// Open the data directory and report any fixes left behind by a run that
    /// never got a clean stop.
    pub async fn start(data_dir: impl Into<PathBuf>) -> Result<Self, TrackManagerError> {
        let data_dir = data_dir.into();
        if !data_dir.exists() {
            tokio::fs::create_dir_all(&data_dir).await
                .map_err(|_| TrackManagerError::Buffer(format!("Failed to create data directory: {:?}", data_dir)))?;
        }

        let recovered = FixBuffer::recover(&data_dir).await?.unwrap_or_default();
        if !recovered.is_empty() {
            tracing::warn!("Recovered {} buffered fixes from an unfinished run", recovered.len());
        }

        let (live_updates, _) = broadcast::channel(100);

        Ok(SessionManager {
            state: Arc::new(Mutex::new(SessionState {
                session: TrackingSession::new(),
                buffer: None,
                recovered,
            })),
            live_updates,
            data_dir,
        })
    }

    pub async fn start_tracking(&self) -> Result<(), TrackManagerError> {
        let mut state = self.state.lock().await;
        state.session.start()?;

        match FixBuffer::create(&self.data_dir).await {
            Ok(buffer) => state.buffer = Some(buffer),
            Err(err) => {
                state.session.reset();
                return Err(err);
            }
        }

        tracing::info!("Tracking started");
        Ok(())
    }

    pub async fn record_fix(&self, fix: LocationFix) -> Result<(), TrackManagerError> {
        let mut state = self.state.lock().await;
        state.session.record_fix(fix)?;

        if let Some(buffer) = state.buffer.as_mut() {
            buffer.append(&fix).await?;
        }

        // No subscribers is fine.
        let _ = self.live_updates.send(fix);

        tracing::trace!("Recorded fix at {}, {}", fix.latitude(), fix.longitude());
        Ok(())
    }

    /// Stop the run and derive its summary. The buffer file is removed either
    /// way; an empty run stops without a summary.
    pub async fn stop_tracking(&self) -> Result<RouteSummary, TrackManagerError> {
        let mut state = self.state.lock().await;
        let result = state.session.stop();

        if let Some(buffer) = state.buffer.take() {
            buffer.close().await?;
        }

        let summary = result?;
        tracing::info!("Tracking stopped with {} fixes", state.session.path().len());
        Ok(summary)
    }

    /// Discard the current run and return to idle, whatever the status.
    pub async fn reset(&self) -> Result<(), TrackManagerError> {
        let mut state = self.state.lock().await;
        state.session.reset();

        if let Some(buffer) = state.buffer.take() {
            buffer.close().await?;
        }

        tracing::info!("Session reset");
        Ok(())
    }

    pub async fn status(&self) -> TrackingStatus {
        self.state.lock().await.session.status()
    }

    pub async fn path(&self) -> Vec<LocationFix> {
        self.state.lock().await.session.path().to_vec()
    }

    pub async fn bounding_region(&self) -> BoundingRegion {
        *self.state.lock().await.session.bounding_region()
    }

    pub async fn started_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.session.started_at()
    }

    /// Fixes salvaged from the buffer file of a crashed run, if any.
    pub async fn recovered_fixes(&self) -> Vec<LocationFix> {
        self.state.lock().await.recovered.clone()
    }

    /// Live feed of fixes as they are recorded.
    pub fn subscribe(&self) -> broadcast::Receiver<LocationFix> {
        self.live_updates.subscribe()
    }
}

#[tokio::test]
async fn start_record_stop() {
    let dir = std::env::temp_dir().join(format!("run_tracker_manager_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let manager = SessionManager::start(&dir).await.unwrap();
    manager.start_tracking().await.unwrap();
    manager
        .record_fix(LocationFix::new(
            geo_types::Point::new(10.2, 56.1),
            chrono::DateTime::from_timestamp(0, 0).unwrap(),
        ))
        .await
        .unwrap();
    let summary = manager.stop_tracking().await.unwrap();
    assert_eq!(summary.start, summary.end);
    assert_eq!(manager.status().await, TrackingStatus::Stopped);
}
