use thiserror::Error;

/// Runtime configuration, read once from the environment at startup and
/// passed by reference everywhere else.
#[derive(Debug, Clone)]
pub struct Config {
    pub webhook: String,
    pub secret: Option<String>,
    pub report_time: String,
    pub cpu_threshold: u32,
    pub mem_threshold: u32,
    pub disk_threshold: u32,
    pub title: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {name} has invalid value '{value}': expected an integer percent")]
    InvalidInt { name: &'static str, value: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Lookup is injected so tests never touch the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let webhook = lookup("DING_WEBHOOK")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DING_WEBHOOK"))?;
        let secret = lookup("DING_SECRET").filter(|v| !v.trim().is_empty());
        let report_time = lookup("REPORT_TIME").unwrap_or_else(default_report_time);
        let title = lookup("CUSTOM_TITLE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(default_title);

        Ok(Self {
            webhook,
            secret,
            report_time,
            cpu_threshold: parse_threshold(&lookup, "CPU_THRESHOLD")?,
            mem_threshold: parse_threshold(&lookup, "MEM_THRESHOLD")?,
            disk_threshold: parse_threshold(&lookup, "DISK_THRESHOLD")?,
            title,
        })
    }

    /// The scheduled-time line is cosmetic and hidden unless configured.
    pub fn report_time_label(&self) -> Option<&str> {
        let label = self.report_time.trim();
        if label.is_empty() || label == "-" {
            None
        } else {
            Some(label)
        }
    }
}

fn parse_threshold(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<u32, ConfigError> {
    match lookup(name) {
        None => Ok(default_threshold()),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(default_threshold());
            }
            let parsed = trimmed.parse();
            parsed.map_err(|_| ConfigError::InvalidInt { name, value: raw })
        }
    }
}

const fn default_threshold() -> u32 {
    80
}

fn default_report_time() -> String {
    "-".to_string()
}

fn default_title() -> String {
    "服务器状态日报".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_webhook_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DING_WEBHOOK")));
    }

    #[test]
    fn defaults_applied() {
        let cfg =
            Config::from_lookup(lookup_from(&[("DING_WEBHOOK", "https://example.com/robot?x=1")]))
                .unwrap();
        assert_eq!(cfg.cpu_threshold, 80);
        assert_eq!(cfg.mem_threshold, 80);
        assert_eq!(cfg.disk_threshold, 80);
        assert_eq!(cfg.title, "服务器状态日报");
        assert!(cfg.secret.is_none());
        assert!(cfg.report_time_label().is_none());
    }

    #[test]
    fn thresholds_parse_and_reject_garbage() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("DING_WEBHOOK", "https://example.com/robot?x=1"),
            ("CPU_THRESHOLD", "95"),
        ]))
        .unwrap();
        assert_eq!(cfg.cpu_threshold, 95);

        let err = Config::from_lookup(lookup_from(&[
            ("DING_WEBHOOK", "https://example.com/robot?x=1"),
            ("DISK_THRESHOLD", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInt { name: "DISK_THRESHOLD", .. }));
    }

    #[test]
    fn report_time_sentinel_hides_label() {
        let base = [("DING_WEBHOOK", "https://example.com/robot?x=1")];
        for (value, expected) in [("-", None), ("", None), ("08:00", Some("08:00"))] {
            let mut pairs = base.to_vec();
            pairs.push(("REPORT_TIME", value));
            let cfg = Config::from_lookup(lookup_from(&pairs)).unwrap();
            assert_eq!(cfg.report_time_label(), expected);
        }
    }
}
