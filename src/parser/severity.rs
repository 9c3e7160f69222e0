//! Numeric priority decoding (PRI = facility * 8 + severity).

use serde::Serialize;

/// The eight standard syslog severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

impl Severity {
    /// Lowercase form used in the `log_level` column and the API.
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Emergency => "emergency",
            Severity::Alert => "alert",
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Map a 3-bit severity code to a level. Any other value degrades to
    /// `Info`, the single default for unknown severity everywhere.
    pub const fn from_code(code: u8) -> Self {
        match code & 0x07 {
            0 => Severity::Emergency,
            1 => Severity::Alert,
            2 => Severity::Critical,
            3 => Severity::Error,
            4 => Severity::Warning,
            5 => Severity::Notice,
            6 => Severity::Info,
            7 => Severity::Debug,
            _ => Severity::Info,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a priority value into its severity level and 5-bit facility code.
pub fn decode_priority(priority: u16) -> (Severity, u8) {
    let severity = Severity::from_code((priority & 0x07) as u8);
    let facility = ((priority >> 3) & 0x1f) as u8;
    (severity, facility)
}
