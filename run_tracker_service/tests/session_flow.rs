//! End-to-end tests: a session driven through the manager, crash recovery
//! from the buffer file, and a GPX round trip.

use std::path::PathBuf;

use chrono::DateTime;
use geo_types::Point;
use run_tracker_lib::{
    location_fix::LocationFix,
    tracking_session::{SessionError, TrackingStatus},
};
use run_tracker_service::{
    SessionManager, TrackManagerError, gpx_util,
    location_request::LocationRequest,
    location_source::{GpxLocationSource, run_location_updates, SimulatedLocationSource},
};

/// Fresh per-test directory; wiped up front so reruns are deterministic.
fn temp_data_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("run_tracker_{}_{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn fix(lat: f64, lon: f64, secs: i64) -> LocationFix {
    LocationFix::new(
        Point::new(lon, lat),
        DateTime::from_timestamp(secs, 0).unwrap(),
    )
}

#[tokio::test]
async fn simulated_run_produces_a_bracketing_summary() {
    let manager = SessionManager::start(temp_data_dir("simulated")).await.unwrap();
    manager.start_tracking().await.unwrap();

    let mut source = SimulatedLocationSource::unpaced(
        Point::new(10.2039, 56.1629),
        25,
        LocationRequest::default(),
    );
    let delivered = run_location_updates(&manager, &mut source).await.unwrap();
    assert_eq!(delivered, 25);

    let summary = manager.stop_tracking().await.unwrap();
    let path = manager.path().await;
    assert_eq!(path.len(), 25);
    assert_eq!(summary.start, path[0]);
    assert_eq!(summary.end, path[24]);

    let region = manager.bounding_region().await;
    for fix in &path {
        assert!(region.contains(fix.position.into()));
    }
    assert_eq!(manager.status().await, TrackingStatus::Stopped);
}

#[tokio::test]
async fn stopping_an_empty_run_reports_empty_path() {
    let manager = SessionManager::start(temp_data_dir("empty")).await.unwrap();
    manager.start_tracking().await.unwrap();

    let err = manager.stop_tracking().await.unwrap_err();
    assert!(matches!(
        err,
        TrackManagerError::Session(SessionError::EmptyPath)
    ));
    assert_eq!(manager.status().await, TrackingStatus::Stopped);
}

#[tokio::test]
async fn pump_stops_cleanly_once_the_session_is_stopped() {
    let manager = SessionManager::start(temp_data_dir("pump")).await.unwrap();
    manager.start_tracking().await.unwrap();
    manager.record_fix(fix(56.16, 10.20, 0)).await.unwrap();
    manager.stop_tracking().await.unwrap();

    // The source still has fixes, but the session is frozen.
    let mut source = SimulatedLocationSource::unpaced(
        Point::new(10.2, 56.1),
        10,
        LocationRequest::default(),
    );
    let delivered = run_location_updates(&manager, &mut source).await.unwrap();
    assert_eq!(delivered, 0);
    assert_eq!(manager.path().await.len(), 1);
}

#[tokio::test]
async fn live_updates_reach_subscribers_in_order() {
    let manager = SessionManager::start(temp_data_dir("live")).await.unwrap();
    let mut updates = manager.subscribe();

    manager.start_tracking().await.unwrap();
    manager.record_fix(fix(1.0, 1.0, 0)).await.unwrap();
    manager.record_fix(fix(2.0, 2.0, 1)).await.unwrap();

    assert_eq!(updates.recv().await.unwrap(), fix(1.0, 1.0, 0));
    assert_eq!(updates.recv().await.unwrap(), fix(2.0, 2.0, 1));
}

#[tokio::test]
async fn buffered_fixes_survive_a_crash() {
    let dir = temp_data_dir("crash");

    let crashed = SessionManager::start(&dir).await.unwrap();
    crashed.start_tracking().await.unwrap();
    crashed.record_fix(fix(56.16, 10.20, 0)).await.unwrap();
    crashed.record_fix(fix(56.17, 10.21, 1)).await.unwrap();
    crashed.record_fix(fix(56.18, 10.22, 2)).await.unwrap();
    // No stop: the process dies here.
    drop(crashed);

    let restarted = SessionManager::start(&dir).await.unwrap();
    assert_eq!(
        restarted.recovered_fixes().await,
        vec![
            fix(56.16, 10.20, 0),
            fix(56.17, 10.21, 1),
            fix(56.18, 10.22, 2),
        ]
    );
    // The restarted manager begins idle regardless of what it salvaged.
    assert_eq!(restarted.status().await, TrackingStatus::Idle);
}

#[tokio::test]
async fn clean_stop_removes_the_buffer() {
    let dir = temp_data_dir("clean_stop");

    let manager = SessionManager::start(&dir).await.unwrap();
    manager.start_tracking().await.unwrap();
    manager.record_fix(fix(56.16, 10.20, 0)).await.unwrap();
    manager.stop_tracking().await.unwrap();
    drop(manager);

    let restarted = SessionManager::start(&dir).await.unwrap();
    assert!(restarted.recovered_fixes().await.is_empty());
}

#[tokio::test]
async fn gpx_round_trip_through_a_replayed_session() {
    let dir = temp_data_dir("gpx");
    std::fs::create_dir_all(&dir).unwrap();
    let gpx_path = dir.join("run.gpx");
    let gpx_path = gpx_path.to_str().unwrap();

    let recorded = vec![
        fix(56.1629, 10.2039, 1_700_000_000),
        fix(56.1631, 10.2041, 1_700_000_001),
        fix(56.1634, 10.2040, 1_700_000_002),
    ];
    gpx_util::write_gpx(gpx_path, "Morning run", Some(recorded[0].timestamp), &recorded).unwrap();

    let read_back = gpx_util::read_gpx(gpx_path).unwrap();
    assert_eq!(read_back, recorded);

    // Replaying the file through a session brackets it like the live run did.
    let manager = SessionManager::start(&dir).await.unwrap();
    manager.start_tracking().await.unwrap();
    let mut source = GpxLocationSource::open(gpx_path).unwrap();
    let delivered = run_location_updates(&manager, &mut source).await.unwrap();
    assert_eq!(delivered, 3);

    let summary = manager.stop_tracking().await.unwrap();
    assert_eq!(summary.start, recorded[0]);
    assert_eq!(summary.end, recorded[2]);
}
