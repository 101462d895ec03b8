//! Fan speed and temperature from the hwmon and thermal classes.

use std::path::{Path, PathBuf};

use crate::collector::procfs::parse_counter;
use crate::collector::traits::{FileSystem, read_dir_sorted, read_source};
use crate::model::SensorReadings;

/// Reads the first fan and the first thermal zone found.
pub struct SensorCollector<F: FileSystem> {
    fs: F,
    hwmon_path: PathBuf,
    thermal_path: PathBuf,
}

impl<F: FileSystem> SensorCollector<F> {
    pub fn new(fs: F, sys_path: &Path) -> Self {
        let class = sys_path.join("class");
        Self {
            fs,
            hwmon_path: class.join("hwmon"),
            thermal_path: class.join("thermal"),
        }
    }

    pub fn collect(&self) -> SensorReadings {
        SensorReadings {
            fan_rpm: self.fan_rpm(),
            temperature_celsius: self.temperature(),
        }
    }

    /// First readable `fan*_input` under `hwmon*`, in RPM; 0 if none.
    pub fn fan_rpm(&self) -> u64 {
        for hwmon in read_dir_sorted(&self.fs, &self.hwmon_path) {
            for file in read_dir_sorted(&self.fs, &hwmon) {
                let is_fan_input = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("fan") && n.ends_with("_input"));
                if !is_fan_input {
                    continue;
                }
                if let Some(rpm) =
                    read_source(&self.fs, &file).and_then(|c| parse_counter(&c).ok())
                {
                    return rpm;
                }
            }
        }
        0
    }

    /// First readable `thermal_zone*/temp`, in degrees Celsius; 0.0 if none.
    pub fn temperature(&self) -> f64 {
        read_dir_sorted(&self.fs, &self.thermal_path)
            .iter()
            .filter(|zone| {
                zone.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("thermal_zone"))
            })
            .find_map(|zone| {
                let raw = read_source(&self.fs, &zone.join("temp"))?;
                raw.trim().parse::<i64>().ok()
            })
            .map(|millidegrees| millidegrees as f64 / 1000.0)
            .unwrap_or(0.0)
    }
}
