use chrono::Utc;
use geo_types::Point;
use rand::Rng;
use run_tracker_lib::{location_fix::LocationFix, tracking_session::SessionError};

use crate::{
    SessionManager, TrackManagerError,
    location_request::{LocationRequest, Priority},
};

/// Anything that can produce location fixes in observation order.
#[allow(async_fn_in_trait)]
pub trait LocationSource {
    /// The next fix, or `None` once the source is exhausted.
    async fn next_fix(&mut self) -> Option<LocationFix>;
}

/// Forward fixes from a source into the manager until the source runs dry or
/// the session stops accepting them. Returns the number of fixes delivered.
pub async fn run_location_updates<S: LocationSource>(
    manager: &SessionManager,
    source: &mut S,
) -> Result<usize, TrackManagerError> {
    let mut delivered = 0;
    while let Some(fix) = source.next_fix().await {
        match manager.record_fix(fix).await {
            Ok(()) => delivered += 1,
            Err(TrackManagerError::Session(SessionError::InvalidStateTransition { .. })) => {
                tracing::debug!("Session no longer tracking, location updates stopped");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(delivered)
}

/// Random-walk source for demos and tests. Wanders around a starting
/// coordinate, paced by the request interval; coarser priorities wander more.
pub struct SimulatedLocationSource {
    request: LocationRequest,
    position: Point,
    remaining: usize,
    paced: bool,
}

impl SimulatedLocationSource {
    pub fn new(start: Point, steps: usize, request: LocationRequest) -> Self {
        Self {
            request,
            position: start,
            remaining: steps,
            paced: true,
        }
    }

    /// The same walk without the interval sleeps.
    pub fn unpaced(start: Point, steps: usize, request: LocationRequest) -> Self {
        Self {
            paced: false,
            ..Self::new(start, steps, request)
        }
    }

    /// One interval, plus however much of the allowed update delay this
    /// delivery happens to lag.
    fn delivery_delay(&self) -> std::time::Duration {
        let mut delay = self.request.interval;
        let headroom = self.request.max_update_delay.saturating_sub(self.request.interval);
        if !headroom.is_zero() {
            delay += headroom.mul_f64(rand::rng().random_range(0.0..1.0));
        }
        delay
    }

    fn step_size(&self) -> f64 {
        // Degrees per step, metres-scale at the default interval.
        match self.request.priority {
            Priority::HighAccuracy => 0.00005,
            Priority::BalancedPowerAccuracy => 0.0002,
            Priority::LowPower => 0.001,
            Priority::Passive => 0.002,
        }
    }
}

impl LocationSource for SimulatedLocationSource {
    async fn next_fix(&mut self) -> Option<LocationFix> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if self.paced {
            tokio::time::sleep(self.delivery_delay()).await;
        }

        let step = self.step_size();
        let mut rng = rand::rng();
        self.position = Point::new(
            self.position.x() + rng.random_range(-step..=step),
            self.position.y() + rng.random_range(-step..=step),
        );

        Some(LocationFix::new(self.position, Utc::now()))
    }
}

/// Replays the points of a GPX track as if they were live fixes.
pub struct GpxLocationSource {
    fixes: std::vec::IntoIter<LocationFix>,
}

impl GpxLocationSource {
    pub fn open(path: &str) -> Result<Self, TrackManagerError> {
        let fixes = crate::gpx_util::read_gpx(path)?;
        Ok(Self {
            fixes: fixes.into_iter(),
        })
    }
}

impl LocationSource for GpxLocationSource {
    async fn next_fix(&mut self) -> Option<LocationFix> {
        self.fixes.next()
    }
}
