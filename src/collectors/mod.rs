pub mod system;

use chrono::{DateTime, Local};

/// Point-in-time capture of host state. Metric fields are best-effort: a
/// source that cannot be read leaves its zero/empty value in place. The
/// virtualization label and private address are filled in by the caller
/// from their own resolvers.
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub host_name: String,
    pub os_pretty_name: String,
    pub uptime_seconds: u64,
    pub cpu_usage_percent: f64,
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
    pub memory_used_percent: f64,
    pub disk_used_bytes: u64,
    pub disk_total_bytes: u64,
    pub disk_used_percent: f64,
    pub net_rx_bytes_total: u64,
    pub net_tx_bytes_total: u64,
    pub virtualization: String,
    pub private_ipv4: String,
    pub generated_at: DateTime<Local>,
}
