pub mod geofence;
pub mod location;
pub mod period;
pub mod record;
