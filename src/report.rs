use crate::collectors::HostSnapshot;
use crate::config::Config;
use std::fmt::Write;
use std::time::Duration;

const WARN_ICON: &str = "⚠️";
const OK_ICON: &str = "✅";

/// Render a snapshot into the DingTalk markdown report. Pure function,
/// deterministic for a given snapshot and config.
pub fn render(snapshot: &HostSnapshot, cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## 🖥️ {}  \n", cfg.title);
    let _ = writeln!(out, "- 🏷️ **主机名**: {}  ", snapshot.host_name);
    let _ = writeln!(out, "- 🌐 **内网IP**: {}  ", snapshot.private_ipv4);
    let _ = writeln!(
        out,
        "- 🕒 **推送时间**: {}  ",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(label) = cfg.report_time_label() {
        let _ = writeln!(out, "- ⏰ **计划时刻**: {label}  ");
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "- {} **CPU**: {:.1}%  ",
        status_icon(snapshot.cpu_usage_percent, cfg.cpu_threshold),
        snapshot.cpu_usage_percent
    );
    let _ = writeln!(
        out,
        "- {} **内存**: {} / {} ({:.1}%)  ",
        status_icon(snapshot.memory_used_percent, cfg.mem_threshold),
        human_bytes(snapshot.memory_used_bytes),
        human_bytes(snapshot.memory_total_bytes),
        snapshot.memory_used_percent
    );
    let _ = writeln!(
        out,
        "- {} **磁盘**: {} / {} ({:.1}%)  ",
        status_icon(snapshot.disk_used_percent, cfg.disk_threshold),
        human_bytes(snapshot.disk_used_bytes),
        human_bytes(snapshot.disk_total_bytes),
        snapshot.disk_used_percent
    );
    let _ = writeln!(
        out,
        "- 📊 **网络**: ↓{:.2} GB  ↑{:.2} GB  ",
        gigabytes(snapshot.net_rx_bytes_total),
        gigabytes(snapshot.net_tx_bytes_total)
    );
    out.push_str("\n---\n");
    let _ = writeln!(
        out,
        "- 🖥️ **系统**: {} ({})  ",
        snapshot.os_pretty_name, snapshot.virtualization
    );
    let _ = writeln!(
        out,
        "- ⏱️ **运行**: {}  ",
        humantime::format_duration(Duration::from_secs(snapshot.uptime_seconds))
    );
    out
}

/// Warning strictly above the threshold; a gauge sitting exactly on the
/// threshold is still ok.
fn status_icon(value: f64, threshold: u32) -> &'static str {
    if value > threshold as f64 {
        WARN_ICON
    } else {
        OK_ICON
    }
}

/// Binary-unit humanizer: whole bytes below 1 KiB, otherwise one decimal
/// with the unit letter picked by repeated division by 1024.
pub fn human_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0_usize;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, b"KMGTPE"[exp] as char)
}

fn gigabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0 / 1024.0
}
