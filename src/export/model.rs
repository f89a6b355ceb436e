use crate::models::record::AttendanceRecord;
use serde::Serialize;

/// Flat row for export. Field order matches the CSV column contract:
/// date, period, period_label, check_in, check_out, status,
/// location_verified, distance_m, latitude, longitude, accuracy_m.
#[derive(Serialize, Clone, Debug)]
pub struct RecordExport {
    pub date: String,
    pub period: String,
    pub period_label: String,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
    pub location_verified: bool,
    pub distance_m: String,
    pub latitude: String,
    pub longitude: String,
    pub accuracy_m: String,
}

pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "date",
        "period",
        "period_label",
        "check_in",
        "check_out",
        "status",
        "location_verified",
        "distance_m",
        "latitude",
        "longitude",
        "accuracy_m",
    ]
}

fn opt_f64(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl RecordExport {
    pub fn from_record(r: &AttendanceRecord) -> Self {
        Self {
            date: r.date_str(),
            period: r.period_number.map(|n| n.to_string()).unwrap_or_default(),
            period_label: r.period_label.clone(),
            check_in: r
                .check_in_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            check_out: r
                .check_out_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            status: r.status.as_str().to_string(),
            location_verified: r.location_verified,
            distance_m: opt_f64(r.distance_m),
            latitude: opt_f64(r.latitude),
            longitude: opt_f64(r.longitude),
            accuracy_m: opt_f64(r.accuracy_m),
        }
    }

    pub(crate) fn to_row(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.period.clone(),
            self.period_label.clone(),
            self.check_in.clone(),
            self.check_out.clone(),
            self.status.clone(),
            self.location_verified.to_string(),
            self.distance_m.clone(),
            self.latitude.clone(),
            self.longitude.clone(),
            self.accuracy_m.clone(),
        ]
    }
}
