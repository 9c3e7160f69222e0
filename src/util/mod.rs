//! Utility functions: tracing, HTML escape, identity sanitizing.

use regex::Regex;
use std::sync::LazyLock;
use tracing_subscriber::{EnvFilter, fmt};

/// Identity every device row falls back to when a message yields nothing
/// usable as a hostname.
pub const FALLBACK_IDENTITY: &str = "unknown-device";

/// Initialize pretty CLI logging.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .pretty()
    .init();
}

/// Minimal HTML escaping for text display.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

/// Outcome of classifying a claimed device identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostnameClass {
  /// Dotted-quad IPv4 literal.
  ValidIp(String),
  /// RFC-1123 style hostname.
  ValidHostname(String),
  /// Kept as-is, but the caller should treat it as provisional.
  Unverified(String),
  /// Parsing artifact (e.g. a bare number); replace with [`FALLBACK_IDENTITY`].
  Invalid,
}

static RE_HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)*$")
    .unwrap()
});

/// Classify a candidate identity extracted from a message or transport
/// address. Bare numeric strings are a common artifact of misparsed
/// messages, not genuine identities, so they are rejected outright.
pub fn classify_hostname(candidate: &str) -> HostnameClass {
  let candidate = candidate.trim();
  if candidate.is_empty() {
    return HostnameClass::Invalid;
  }
  if candidate.parse::<std::net::Ipv4Addr>().is_ok() {
    return HostnameClass::ValidIp(candidate.to_string());
  }
  if candidate.chars().all(|c| c.is_ascii_digit()) {
    return HostnameClass::Invalid;
  }
  if RE_HOSTNAME.is_match(candidate) {
    return HostnameClass::ValidHostname(candidate.to_string());
  }
  HostnameClass::Unverified(candidate.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ipv4_literals_pass() {
    assert_eq!(
      classify_hostname("192.168.1.100"),
      HostnameClass::ValidIp("192.168.1.100".into())
    );
    assert_eq!(
      classify_hostname("10.0.0.1"),
      HostnameClass::ValidIp("10.0.0.1".into())
    );
  }

  #[test]
  fn hostnames_pass() {
    assert_eq!(
      classify_hostname("my-host.local"),
      HostnameClass::ValidHostname("my-host.local".into())
    );
    assert_eq!(
      classify_hostname("testhost"),
      HostnameClass::ValidHostname("testhost".into())
    );
  }

  #[test]
  fn bare_numbers_are_artifacts() {
    assert_eq!(classify_hostname("23"), HostnameClass::Invalid);
    assert_eq!(classify_hostname("1234567"), HostnameClass::Invalid);
    assert_eq!(classify_hostname(""), HostnameClass::Invalid);
  }

  #[test]
  fn oddballs_are_kept_but_flagged() {
    assert_eq!(
      classify_hostname("host_with_underscores"),
      HostnameClass::Unverified("host_with_underscores".into())
    );
    assert_eq!(
      classify_hostname("fe80::1"),
      HostnameClass::Unverified("fe80::1".into())
    );
  }
}
