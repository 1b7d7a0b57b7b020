use std::fs;
use std::process::Command;

/// Narrow view of the host used by the detection probes, so the chain is
/// testable without real files or binaries. Unreadable sources map to
/// `None` and count as a probe miss, never an error.
pub trait HostInspector {
    fn read_file(&self, path: &str) -> Option<String>;
    fn run_helper(&self, program: &str) -> Option<String>;
}

pub struct SystemInspector;

impl HostInspector for SystemInspector {
    fn read_file(&self, path: &str) -> Option<String> {
        fs::read_to_string(path).ok()
    }

    fn run_helper(&self, program: &str) -> Option<String> {
        let output = Command::new(program).output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Classify the execution environment. Ordered probe chain, first positive
/// match wins; the order is a contract (helper tool outranks cgroup,
/// cgroup outranks kernel release, kernel release outranks DMI).
pub fn detect(inspector: &dyn HostInspector) -> String {
    if let Some(output) = inspector.run_helper("systemd-detect-virt") {
        let value = output.trim();
        if !value.is_empty() && value != "none" {
            return value.to_string();
        }
    }

    if let Some(cgroup) = inspector.read_file("/proc/1/cgroup") {
        if cgroup.contains("docker") || cgroup.contains("lxc") {
            return "container".to_string();
        }
    }

    if let Some(release) = inspector.read_file("/proc/sys/kernel/osrelease") {
        if release.to_lowercase().contains("microsoft") {
            return "wsl".to_string();
        }
    }

    if let Some(product) = inspector.read_file("/sys/class/dmi/id/product_name") {
        let name = product.trim().to_lowercase();
        if name.contains("kvm") || name.contains("qemu") {
            return "kvm".to_string();
        }
        if name.contains("vmware") {
            return "vmware".to_string();
        }
        if name.contains("virtualbox") {
            return "virtualbox".to_string();
        }
        if name.contains("microsoft corporation") {
            return "hyperv".to_string();
        }
    }

    "physical".to_string()
}
