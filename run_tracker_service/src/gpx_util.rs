use std::str::FromStr;

use chrono::{DateTime, Utc};
use gpx::{Gpx, GpxVersion, Metadata, Track, TrackSegment, Waypoint};
use run_tracker_lib::location_fix::LocationFix;
use time::OffsetDateTime;

use crate::TrackManagerError;

/// Read every track point of a GPX file as a location fix, in file order.
pub fn read_gpx(path: &str) -> Result<Vec<LocationFix>, TrackManagerError> {
    let file = std::fs::File::open(path)
        .map_err(|_| TrackManagerError::Gpx(format!("Failed to open {}", path)))?;
    let reader = std::io::BufReader::new(file);
    let gpx = gpx::read(reader)
        .map_err(|err| TrackManagerError::Gpx(format!("Failed to parse {}: {}", path, err)))?;

    let mut fixes = Vec::new();
    for track in gpx.tracks {
        for segment in track.segments {
            for point in segment.points {
                let time = point.time
                    .ok_or_else(|| TrackManagerError::Gpx(format!("Track point without timestamp in {}", path)))?;
                let formatted = time.format()
                    .map_err(|_| TrackManagerError::Gpx(format!("Unformattable timestamp in {}", path)))?;
                let timestamp = DateTime::from_str(&formatted)
                    .map_err(|_| TrackManagerError::Gpx(format!("Unparsable timestamp in {}", path)))?;

                fixes.push(LocationFix::new(point.point(), timestamp));
            }
        }
    }

    Ok(fixes)
}

/// Write a recorded path as a single-track GPX file.
pub fn write_gpx(
    path: &str,
    name: &str,
    started_at: Option<DateTime<Utc>>,
    fixes: &[LocationFix],
) -> Result<(), TrackManagerError> {
    let mut segment = TrackSegment::new();
    for fix in fixes {
        let mut waypoint = Waypoint::new(fix.position);
        waypoint.time = Some(to_gpx_time(fix.timestamp)?);
        segment.points.push(waypoint);
    }

    let mut track = Track::new();
    track.name = Some(name.to_string());
    track.segments.push(segment);

    let mut metadata = Metadata::default();
    metadata.name = Some(name.to_string());
    if let Some(started_at) = started_at {
        metadata.time = Some(to_gpx_time(started_at)?);
    }

    let mut gpx: Gpx = Default::default();
    gpx.version = GpxVersion::Gpx11;
    gpx.creator = Some("run_tracker".to_string());
    gpx.metadata = Some(metadata);
    gpx.tracks = vec![track];

    let file = std::fs::File::create(path)
        .map_err(|_| TrackManagerError::Gpx(format!("Failed to create {}", path)))?;
    let writer = std::io::BufWriter::new(file);
    gpx::write(&gpx, writer)
        .map_err(|err| TrackManagerError::Gpx(format!("Failed to write {}: {}", path, err)))?;

    Ok(())
}

/// Whole-second conversion; fixes arrive at second cadence anyway.
fn to_gpx_time(timestamp: DateTime<Utc>) -> Result<gpx::Time, TrackManagerError> {
    OffsetDateTime::from_unix_timestamp(timestamp.timestamp())
        .map(gpx::Time::from)
        .map_err(|_| TrackManagerError::Gpx(format!("Timestamp out of range: {}", timestamp)))
}
