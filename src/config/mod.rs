use crate::errors::{AppError, AppResult};
use crate::models::period::{ClassPeriod, Timetable};
use crate::utils::time::parse_time;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// One timetable slot as written in the YAML config.
/// Times are "HH:MM" strings; `period` is absent for breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSpec {
    #[serde(default)]
    pub period: Option<u32>,
    pub label: String,
    pub start: String,
    pub end: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    pub student_id: String,
    #[serde(default = "default_max_accuracy")]
    pub max_accuracy_m: f64,
    #[serde(default = "default_max_speed")]
    pub max_speed_mps: f64,
    #[serde(default = "default_periods")]
    pub periods: Vec<PeriodSpec>,
}

fn default_max_accuracy() -> f64 {
    100.0
}

fn default_max_speed() -> f64 {
    50.0 // 180 km/h; anything faster between two fixes smells of spoofing
}

/// The compiled-in school day: seven numbered periods plus a morning
/// break and lunch, both attendance-free.
fn default_periods() -> Vec<PeriodSpec> {
    let slot = |period: Option<u32>, label: &str, start: &str, end: &str, active: bool| {
        PeriodSpec {
            period,
            label: label.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            active,
        }
    };

    vec![
        slot(Some(1), "Period 1", "08:00", "08:45", true),
        slot(Some(2), "Period 2", "08:45", "09:30", true),
        slot(None, "Morning Break", "09:30", "09:45", false),
        slot(Some(3), "Period 3", "09:45", "10:30", true),
        slot(Some(4), "Period 4", "10:30", "11:15", true),
        slot(None, "Lunch", "11:15", "12:00", false),
        slot(Some(5), "Period 5", "12:00", "12:45", true),
        slot(Some(6), "Period 6", "12:45", "13:30", true),
        slot(Some(7), "Period 7", "13:30", "14:15", true),
    ]
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            student_id: "student-001".to_string(),
            max_accuracy_m: default_max_accuracy(),
            max_speed_mps: default_max_speed(),
            periods: default_periods(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rollcall")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".rollcall")
        } else {
            PathBuf::from(".rollcall")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rollcall.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rollcall.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
                Err(_) => Config::default(),
            }
        } else {
            Config::default()
        }
    }

    /// Parse the configured period specs into a validated timetable.
    pub fn timetable(&self) -> AppResult<Timetable> {
        let mut periods = Vec::with_capacity(self.periods.len());

        for spec in &self.periods {
            let start = parse_time(&spec.start)
                .ok_or_else(|| AppError::InvalidTime(spec.start.clone()))?;
            let end =
                parse_time(&spec.end).ok_or_else(|| AppError::InvalidTime(spec.end.clone()))?;

            periods.push(ClassPeriod::new(
                spec.period,
                &spec.label,
                start,
                end,
                spec.active,
            ));
        }

        Timetable::new(periods)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file (skipped in test mode)
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(format!("serialize config: {e}")))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(())
    }

    /// Sanity-check the loaded config; returns a list of findings.
    pub fn check(&self) -> Vec<String> {
        let mut findings = Vec::new();

        if self.student_id.trim().is_empty() {
            findings.push("student_id is empty".to_string());
        }
        if self.max_accuracy_m <= 0.0 {
            findings.push("max_accuracy_m must be positive".to_string());
        }
        if self.max_speed_mps <= 0.0 {
            findings.push("max_speed_mps must be positive".to_string());
        }
        if let Err(e) = self.timetable() {
            findings.push(format!("timetable: {}", e));
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timetable_is_valid() {
        let cfg = Config::default();
        let tt = cfg.timetable().expect("default timetable must validate");
        assert_eq!(tt.active_period_count(), 7);
    }

    #[test]
    fn overlapping_periods_are_rejected() {
        let mut cfg = Config::default();
        cfg.periods[1].start = "08:30".to_string();
        assert!(cfg.timetable().is_err());
    }
}
