pub mod bounding_region;
pub mod location_fix;
pub mod route_summary;
pub mod tracking_session;
