pub mod backup;
pub mod geofence;
pub mod log;
pub mod marking;
pub mod ports;
pub mod schedule;
pub mod stats;
pub mod watch;
