//! Local resource readings. Everything here blocks (CPU sampling sleeps for
//! the sysinfo update interval), so callers run it off the async workers.

use std::fs;
use std::path::{Path, PathBuf};

use sysinfo::{Disks, System};

use crate::models::{Resource, ResourceQuery};

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn get_system_info(query: &ResourceQuery) -> String {
    match query {
        ResourceQuery::Missing => "No resource was queried.".to_string(),
        ResourceQuery::Unsupported(name) => {
            log::debug!("Unsupported system resource requested: {}", name);
            "This system information is not supported yet.".to_string()
        }
        ResourceQuery::Supported(resource) => read_resource(*resource),
    }
}

fn read_resource(resource: Resource) -> String {
    match resource {
        Resource::Battery => match read_battery(Path::new(POWER_SUPPLY_DIR)) {
            Some(battery) => battery_report(&battery),
            None => "Battery information is unavailable.".to_string(),
        },
        Resource::Cpu => {
            let mut sys = System::new();
            sys.refresh_cpu_usage();
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
            sys.refresh_cpu_usage();
            cpu_report(sys.global_cpu_usage())
        }
        Resource::Memory => {
            let mut sys = System::new();
            sys.refresh_memory();
            memory_report(sys.total_memory(), sys.available_memory())
        }
        Resource::Storage => {
            let disks = Disks::new_with_refreshed_list();
            let primary = disks
                .iter()
                .find(|d| d.mount_point() == Path::new("/"))
                .or_else(|| disks.iter().next());
            match primary {
                Some(disk) => storage_report(
                    &disk.mount_point().display().to_string(),
                    disk.total_space(),
                    disk.available_space(),
                ),
                None => "I could not access disk information.".to_string(),
            }
        }
        Resource::Uptime => uptime_report(System::uptime()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryReading {
    pub percent: u8,
    pub charging: bool,
}

/// First `BAT*` supply under `dir`, if any exposes a readable capacity.
pub fn read_battery(dir: &Path) -> Option<BatteryReading> {
    let mut batteries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("BAT"))
        .map(|entry| entry.path())
        .collect();
    batteries.sort();

    batteries.into_iter().find_map(|path| {
        let percent = fs::read_to_string(path.join("capacity"))
            .ok()?
            .trim()
            .parse::<u8>()
            .ok()?;
        let status = fs::read_to_string(path.join("status")).unwrap_or_default();
        let charging = matches!(status.trim(), "Charging" | "Full");
        Some(BatteryReading { percent, charging })
    })
}

pub fn battery_report(battery: &BatteryReading) -> String {
    if battery.charging {
        format!("Battery is {}% and currently charging.", battery.percent)
    } else {
        format!("Battery is {}%.", battery.percent)
    }
}

pub fn cpu_report(usage: f32) -> String {
    format!("Current CPU usage is {:.1}%.", usage)
}

pub fn memory_report(total_bytes: u64, available_bytes: u64) -> String {
    format!(
        "Out of {:.1} gigabytes, {:.1} gigabytes of RAM is currently free.",
        total_bytes as f64 / GIB,
        available_bytes as f64 / GIB
    )
}

pub fn storage_report(mount: &str, total_bytes: u64, available_bytes: u64) -> String {
    format!(
        "Drive {} has {:.1} GB of free space out of a total {:.1} GB.",
        mount,
        available_bytes as f64 / GIB,
        total_bytes as f64 / GIB
    )
}

pub fn uptime_report(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours == 0 {
        format!("The system has been running for {} minutes.", minutes)
    } else {
        format!(
            "The system has been running for {} hours and {} minutes.",
            hours, minutes
        )
    }
}
