use std::path::PathBuf;
use std::time::Duration;

use ticket_printer::{PrintResult, PrinterProfile, PrinterTarget};

/// Application configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | PRINTER | POS-80 | Printer target: driver name, IP[:port], tcp://host:port or device path |
/// | PRINTER_PROFILE | NT-80-V-UL | Printer capability profile |
/// | PRINT_TIMEOUT_MS | 5000 | Network connect/write timeout |
/// | PRINT_RETRIES | 0 | Extra attempts after a failed send |
/// | PRINT_RETRY_DELAY_MS | 1000 | Delay before the first retry (doubles after each) |
/// | PREVIEW_DIR | <tmp>/receipt_preview | Where previews are written |
/// | LOG_LEVEL | info | Log level |
/// | LOG_JSON | false | JSON console logs |
/// | LOG_DIR | (unset) | Daily rotating log files |
///
/// # Example
///
/// ```ignore
/// PRINTER=192.168.1.50 PRINT_RETRIES=2 task-receipt print --sample 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Printer target, parsed by [`Config::target`]
    pub printer: String,
    /// Profile name, resolved by [`Config::profile`]
    pub profile: String,
    pub timeout_ms: u64,
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub preview_dir: PathBuf,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<PathBuf>,
}

pub const DEFAULT_PRINTER: &str = "POS-80";
pub const DEFAULT_PROFILE: &str = "NT-80-V-UL";

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Self {
            printer: non_empty("PRINTER").unwrap_or_else(|| DEFAULT_PRINTER.into()),
            profile: non_empty("PRINTER_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.into()),
            timeout_ms: non_empty("PRINT_TIMEOUT_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(5000),
            retries: non_empty("PRINT_RETRIES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0),
            retry_delay_ms: non_empty("PRINT_RETRY_DELAY_MS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1000),
            preview_dir: non_empty("PREVIEW_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("receipt_preview")),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: non_empty("LOG_JSON")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from),
        }
    }

    /// Override printer and profile, e.g. from command line flags
    pub fn with_overrides(mut self, printer: Option<String>, profile: Option<String>) -> Self {
        if let Some(printer) = printer {
            self.printer = printer;
        }
        if let Some(profile) = profile {
            self.profile = profile;
        }
        self
    }

    pub fn target(&self) -> PrintResult<PrinterTarget> {
        self.printer.parse()
    }

    pub fn printer_profile(&self) -> PrintResult<PrinterProfile> {
        PrinterProfile::lookup(&self.profile)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.printer, "POS-80");
        assert_eq!(c.profile, "NT-80-V-UL");
        assert_eq!(c.timeout(), Duration::from_secs(5));
        assert_eq!(c.retries, 0);
        assert_eq!(c.retry_delay(), Duration::from_secs(1));
        assert!(c.preview_dir.ends_with("receipt_preview"));
        assert_eq!(c.log_level, "info");
        assert!(!c.log_json);
        assert!(c.log_dir.is_none());

        assert_eq!(
            c.target().unwrap(),
            PrinterTarget::Windows {
                name: "POS-80".into()
            }
        );
        assert_eq!(c.printer_profile().unwrap().dots, 576);
    }

    #[test]
    fn test_env_values() {
        let c = config(&[
            ("PRINTER", "192.168.1.50"),
            ("PRINTER_PROFILE", "58mm"),
            ("PRINT_TIMEOUT_MS", "250"),
            ("PRINT_RETRIES", "3"),
            ("LOG_JSON", "TRUE"),
            ("LOG_DIR", "/var/log/receipts"),
        ]);

        assert_eq!(
            c.target().unwrap(),
            PrinterTarget::Network {
                host: "192.168.1.50".into(),
                port: 9100
            }
        );
        assert_eq!(c.printer_profile().unwrap().columns, 32);
        assert_eq!(c.timeout(), Duration::from_millis(250));
        assert_eq!(c.retries, 3);
        assert!(c.log_json);
        assert_eq!(c.log_dir, Some(PathBuf::from("/var/log/receipts")));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let c = config(&[
            ("PRINTER", "   "),
            ("PRINT_RETRIES", "many"),
            ("LOG_JSON", "maybe"),
        ]);
        assert_eq!(c.printer, "POS-80");
        assert_eq!(c.retries, 0);
        assert!(!c.log_json);
    }

    #[test]
    fn test_overrides() {
        let c = Config::default().with_overrides(Some("tcp://printer.local:9101".into()), None);
        assert_eq!(c.printer, "tcp://printer.local:9101");
        assert_eq!(c.profile, "NT-80-V-UL");

        let c = c.with_overrides(None, Some("nope".into()));
        assert!(c.printer_profile().is_err());
    }
}
