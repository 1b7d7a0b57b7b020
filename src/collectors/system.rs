use crate::collectors::HostSnapshot;
use crate::virt::HostInspector;
use chrono::Local;
use std::time::Duration;
use sysinfo::{CpuExt, DiskExt, NetworkExt, NetworksExt, System, SystemExt};

/// Window between the two CPU refreshes; the usage figure is the average
/// over this interval rather than a since-boot number.
const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

pub async fn collect_host(system: &mut System, inspector: &dyn HostInspector) -> HostSnapshot {
    system.refresh_cpu();
    tokio::time::sleep(CPU_SAMPLE_WINDOW).await;
    system.refresh_cpu();
    system.refresh_memory();
    system.refresh_disks_list();
    system.refresh_disks();
    system.refresh_networks_list();
    system.refresh_networks();

    let cpu_usage_percent = if system.cpus().is_empty() {
        0.0
    } else {
        let sum: f32 = system.cpus().iter().map(|c| c.cpu_usage()).sum();
        (sum / system.cpus().len() as f32) as f64
    };

    let memory_total_bytes = system.total_memory();
    let memory_used_bytes = system.used_memory();

    let (disk_used_bytes, disk_total_bytes) = root_disk_usage(system);

    let mut net_rx_bytes_total = 0_u64;
    let mut net_tx_bytes_total = 0_u64;
    for (_iface, data) in system.networks().iter() {
        net_rx_bytes_total += data.total_received();
        net_tx_bytes_total += data.total_transmitted();
    }

    HostSnapshot {
        host_name: system.host_name().unwrap_or_default(),
        os_pretty_name: os_pretty_name(system, inspector),
        uptime_seconds: system.uptime(),
        cpu_usage_percent,
        memory_used_bytes,
        memory_total_bytes,
        memory_used_percent: percent(memory_used_bytes, memory_total_bytes),
        disk_used_bytes,
        disk_total_bytes,
        disk_used_percent: percent(disk_used_bytes, disk_total_bytes),
        net_rx_bytes_total,
        net_tx_bytes_total,
        virtualization: String::new(),
        private_ipv4: String::new(),
        generated_at: Local::now(),
    }
}

/// Usage of the root filesystem. Platforms without a "/" mount fall back
/// to the first listed disk; no disks at all degrades to zeros.
fn root_disk_usage(system: &System) -> (u64, u64) {
    let disks = system.disks();
    let root = disks
        .iter()
        .find(|d| d.mount_point().as_os_str() == "/")
        .or_else(|| disks.first());
    match root {
        Some(d) => {
            let total = d.total_space();
            (total.saturating_sub(d.available_space()), total)
        }
        None => (0, 0),
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total > 0 {
        (used as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// PRETTY_NAME from /etc/os-release, falling back to sysinfo's long OS
/// version string where the file is absent (non-Linux hosts).
fn os_pretty_name(system: &System, inspector: &dyn HostInspector) -> String {
    inspector
        .read_file("/etc/os-release")
        .and_then(|text| parse_pretty_name(&text))
        .or_else(|| system.long_os_version().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| "Unknown".to_string())
}

fn parse_pretty_name(os_release: &str) -> Option<String> {
    os_release.lines().find_map(|line| {
        line.trim()
            .strip_prefix("PRETTY_NAME=")
            .map(|value| value.trim_matches('"').to_string())
    })
}
