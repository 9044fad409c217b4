use std::path::{Path, PathBuf};

use run_tracker_lib::location_fix::LocationFix;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::TrackManagerError;

pub const BUFFER_FILE_NAME: &str = "live_session.buf";

/// Append-only on-disk log of the live session's fixes, so a restarted process
/// can pick up a run that never got a clean stop.
pub struct FixBuffer {
    file: File,
    path: PathBuf,
}

impl FixBuffer {
    /// Create a fresh buffer file, truncating any leftover one.
    pub async fn create(dir: &Path) -> Result<Self, TrackManagerError> {
        let path = dir.join(BUFFER_FILE_NAME);
        let file = File::create(&path).await
            .map_err(|_| TrackManagerError::Buffer(format!("Failed to create buffer file: {:?}", path)))?;

        Ok(FixBuffer { file, path })
    }

    /// Append one fix. Flushed per fix so a crash loses at most the write in
    /// flight.
    pub async fn append(&mut self, fix: &LocationFix) -> Result<(), TrackManagerError> {
        let fix_bytes = bincode::serialize(fix)
            .map_err(|_| TrackManagerError::Buffer("Failed to serialize fix".to_string()))?;

        self.file.write_all(&fix_bytes).await
            .map_err(|_| TrackManagerError::Buffer("Failed to write fix to buffer file".to_string()))?;
        self.file.flush().await
            .map_err(|_| TrackManagerError::Buffer("Failed to flush buffer file".to_string()))?;

        Ok(())
    }

    /// Remove the buffer file after a clean stop.
    pub async fn close(self) -> Result<(), TrackManagerError> {
        drop(self.file);
        tokio::fs::remove_file(&self.path).await
            .map_err(|_| TrackManagerError::Buffer(format!("Failed to remove buffer file: {:?}", self.path)))?;

        Ok(())
    }

    /// Read back whatever a previous process managed to write, if anything.
    pub async fn recover(dir: &Path) -> Result<Option<Vec<LocationFix>>, TrackManagerError> {
        let path = dir.join(BUFFER_FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }

        let fix_bytes = tokio::fs::read(&path).await
            .map_err(|_| TrackManagerError::Buffer(format!("Failed to read buffer file: {:?}", path)))?;

        let mut cursor = std::io::Cursor::new(fix_bytes);
        let mut fixes = Vec::new();
        while let Ok(fix) = bincode::deserialize_from(&mut cursor) {
            fixes.push(fix);
        }

        Ok(Some(fixes))
    }
}
