use serde::Serialize;

/// A registered attendance location.
///
/// At most one area is active at any time; activating one deactivates the
/// others (enforced on write, see db::geofence).
#[derive(Debug, Clone, Serialize)]
pub struct GeofenceArea {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
    pub active: bool,
    pub created_at: String, // ISO8601
    pub updated_at: String, // ISO8601
}
