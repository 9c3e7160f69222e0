//! Multi-format syslog message parsing.
//!
//! Real-world producers violate both RFC 3164 and RFC 5424 routinely:
//! missing priority, missing year, truncated timestamps, process names with
//! path separators. No single grammar covers that space, so parsing is an
//! ordered chain of recognizers, most specific first, with an unconditional
//! fallback. `parse_message` therefore never fails; worst case the whole
//! input becomes the message body with the current timestamp and `info`
//! severity.

pub mod severity;
pub mod timestamp;

pub use severity::{decode_priority, Severity};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Canonical parsed form of one inbound message.
///
/// `raw_message` and `timestamp` are always populated; every other field
/// degrades to `None`/default instead of failing the parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMessage {
    pub timestamp: DateTime<Utc>,
    pub hostname: Option<String>,
    pub program: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub raw_message: String,
    pub structured_data: Map<String, Value>,
}

type Recognizer = fn(&str, DateTime<Utc>) -> Option<ParsedMessage>;

/// Recognizers in precedence order. The first whole-message match wins;
/// inputs nothing here claims fall through to [`fallback`].
const CHAIN: &[Recognizer] = &[rfc5424, rfc3164, enhanced, no_priority];

/// Parse a raw syslog message, never failing.
pub fn parse_message(raw: &str) -> ParsedMessage {
    parse_message_at(raw, Utc::now())
}

/// Like [`parse_message`] with an explicit processing instant, so that
/// year/date inference is deterministic under test.
pub fn parse_message_at(raw: &str, now: DateTime<Utc>) -> ParsedMessage {
    // Datagrams often arrive with a trailing newline; match without it but
    // keep `raw_message` verbatim.
    let line = raw.trim_end_matches(['\r', '\n']);
    let mut parsed = CHAIN
        .iter()
        .find_map(|recognize| recognize(line, now))
        .unwrap_or_else(|| fallback(line, now));
    parsed.raw_message = raw.to_string();
    parsed
}

// RFC 5424: <PRI>1 TIMESTAMP HOST APP PROCID MSGID SD [MSG]
static RE_RFC5424: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<(?P<pri>\d{1,3})>1 (?P<ts>\S+) (?P<host>\S+) (?P<app>\S+) (?P<procid>\S+) (?P<msgid>\S+) (?P<sd>-|(?:\[[^\]]*\])+)(?: (?P<msg>.*))?$",
    )
    .unwrap()
});

// RFC 3164: <PRI>Mmm dd HH:MM:SS HOST [PROC[PID]:] MSG
static RE_RFC3164: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<(?P<pri>\d{1,3})>(?P<ts>\w{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+(?P<host>[^\s:\[\]]+)\s+(?:(?P<proc>[^\s:\[\]]+)(?:\[(?P<pid>\d+)\])?:\s*)?(?P<msg>.*)$",
    )
    .unwrap()
});

// Legacy net: priority optional, timestamp either full BSD or a truncated
// time-only fragment ("H: MM:SS" included), hostname optional, process
// clause required. Overlaps RFC 3164 on purpose; chain order decides.
static RE_ENHANCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:<(?P<pri>\d{1,3})>)?(?P<ts>(?:\w{3}\s+\d{1,2}\s+)?\d{1,2}:\s?\d{2}:\d{2})\s+(?:(?P<host>[^\s:\[\]]+)\s+)?(?P<proc>[^\s:\[\]]+)(?:\[(?P<pid>\d+)\])?:\s*(?P<msg>.*)$",
    )
    .unwrap()
});

// RFC 3164 shape without the <PRI> prefix.
static RE_NO_PRIORITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<ts>\w{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+(?P<host>[^\s:\[\]]+)\s+(?:(?P<proc>[^\s:\[\]]+)(?:\[(?P<pid>\d+)\])?:\s*)?(?P<msg>.*)$",
    )
    .unwrap()
});

fn rfc5424(line: &str, now: DateTime<Utc>) -> Option<ParsedMessage> {
    let caps = RE_RFC5424.captures(line)?;
    let pri: u16 = caps["pri"].parse().ok()?;
    let (severity, facility) = decode_priority(pri);

    let mut sd = Map::new();
    sd.insert("priority".into(), pri.into());
    sd.insert("facility".into(), facility.into());
    sd.insert("severity_code".into(), (pri & 0x07).into());
    if let Some(procid) = nilable(&caps["procid"]) {
        sd.insert("procid".into(), procid.into());
    }
    if let Some(msgid) = nilable(&caps["msgid"]) {
        sd.insert("msgid".into(), msgid.into());
    }
    // Structured-data segments are kept verbatim, not deep-parsed.
    if let Some(blob) = nilable(&caps["sd"]) {
        sd.insert("sd".into(), blob.into());
    }

    Some(ParsedMessage {
        timestamp: timestamp::normalize(&caps["ts"], now),
        hostname: nilable(&caps["host"]).map(str::to_string),
        program: nilable(&caps["app"]).map(str::to_string),
        severity,
        message: caps.name("msg").map(|m| m.as_str()).unwrap_or("").to_string(),
        raw_message: line.to_string(),
        structured_data: sd,
    })
}

fn rfc3164(line: &str, now: DateTime<Utc>) -> Option<ParsedMessage> {
    let caps = RE_RFC3164.captures(line)?;
    let pri: u16 = caps["pri"].parse().ok()?;
    let (severity, facility) = decode_priority(pri);

    let mut sd = Map::new();
    sd.insert("priority".into(), pri.into());
    sd.insert("facility".into(), facility.into());
    sd.insert("severity_code".into(), (pri & 0x07).into());
    if let Some(pid) = caps.name("pid").and_then(|p| p.as_str().parse::<i64>().ok()) {
        sd.insert("pid".into(), pid.into());
    }

    Some(ParsedMessage {
        timestamp: timestamp::normalize(&caps["ts"], now),
        hostname: Some(caps["host"].to_string()),
        program: caps.name("proc").map(|p| p.as_str().to_string()),
        severity,
        message: caps["msg"].to_string(),
        raw_message: line.to_string(),
        structured_data: sd,
    })
}

fn enhanced(line: &str, now: DateTime<Utc>) -> Option<ParsedMessage> {
    let caps = RE_ENHANCED.captures(line)?;

    let mut sd = Map::new();
    let severity = match caps.name("pri").and_then(|p| p.as_str().parse::<u16>().ok()) {
        Some(pri) => {
            let (severity, facility) = decode_priority(pri);
            sd.insert("priority".into(), pri.into());
            sd.insert("facility".into(), facility.into());
            sd.insert("severity_code".into(), (pri & 0x07).into());
            severity
        }
        None => Severity::Info,
    };
    if let Some(pid) = caps.name("pid").and_then(|p| p.as_str().parse::<i64>().ok()) {
        sd.insert("pid".into(), pid.into());
    }

    Some(ParsedMessage {
        timestamp: timestamp::normalize(&caps["ts"], now),
        hostname: caps.name("host").map(|h| h.as_str().to_string()),
        program: Some(caps["proc"].to_string()),
        severity,
        message: caps["msg"].to_string(),
        raw_message: line.to_string(),
        structured_data: sd,
    })
}

fn no_priority(line: &str, now: DateTime<Utc>) -> Option<ParsedMessage> {
    let caps = RE_NO_PRIORITY.captures(line)?;

    let mut sd = Map::new();
    if let Some(pid) = caps.name("pid").and_then(|p| p.as_str().parse::<i64>().ok()) {
        sd.insert("pid".into(), pid.into());
    }

    Some(ParsedMessage {
        timestamp: timestamp::normalize(&caps["ts"], now),
        hostname: Some(caps["host"].to_string()),
        program: caps.name("proc").map(|p| p.as_str().to_string()),
        severity: Severity::Info,
        message: caps["msg"].to_string(),
        raw_message: line.to_string(),
        structured_data: sd,
    })
}

fn fallback(line: &str, now: DateTime<Utc>) -> ParsedMessage {
    ParsedMessage {
        timestamp: now,
        hostname: None,
        program: None,
        severity: Severity::Info,
        message: line.to_string(),
        raw_message: line.to_string(),
        structured_data: Map::new(),
    }
}

/// RFC 5424 NILVALUE handling: `-` means absent.
fn nilable(field: &str) -> Option<&str> {
    if field == "-" { None } else { Some(field) }
}
