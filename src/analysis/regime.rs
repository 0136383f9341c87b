//! Logging regimes and timestamp normalization.
//!
//! Cooja simulations prefix every line with the virtual time and the mote
//! ID; testbed runs go through the testbed's Python logger, which adds a
//! bracketed wall-clock time, a log level and the serial-port process tag.
//! Each regime supplies its line header, its regime-specific markers and the
//! rule that turns the captured time token into a number.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::log_parser::{LogPatterns, SIMULATED_PATTERNS, TESTBED_PATTERNS};
use super::types::LogTime;

/// Which log format governs the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingRegime {
    /// Cooja simulation, virtual-time timestamps
    Simulated,
    /// Testbed experiment, wall-clock timestamps
    RealWorld,
}

impl LoggingRegime {
    /// Strategy implementing this regime
    pub fn strategy(self) -> &'static dyn Regime {
        match self {
            LoggingRegime::Simulated => &Simulated,
            LoggingRegime::RealWorld => &RealWorld,
        }
    }
}

impl std::fmt::Display for LoggingRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingRegime::Simulated => write!(f, "Cooja simulation"),
            LoggingRegime::RealWorld => write!(f, "Testbed experiment"),
        }
    }
}

/// Timestamp token that does not fit the regime's grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {regime} timestamp '{token}'")]
pub struct TimestampError {
    pub regime: &'static str,
    pub token: String,
}

/// Per-regime line grammar and timestamp conversion.
pub trait Regime: Send + Sync {
    /// Header every record pattern starts with. Must define the named
    /// groups `time` and `self_id`.
    fn record_header(&self) -> &'static str;

    /// Node boot marker, with `hi` and `lo` address groups.
    fn boot_marker(&self) -> &'static str;

    /// Energest marker, with `cnt`, `cpu`, `lpm`, `tx`, `rx` groups.
    fn energest_marker(&self) -> &'static str;

    /// Compiled pattern table for this regime
    fn patterns(&self) -> &'static LogPatterns;

    /// Convert a captured time token into a comparable number.
    fn normalize(&self, token: &str) -> Result<LogTime, TimestampError>;
}

/// Cooja logs: `<time>\tID:<id>\t<message>`
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulated;

impl Regime for Simulated {
    fn record_header(&self) -> &'static str {
        r"^(?P<time>\d+).*ID:(?P<self_id>\d+).*"
    }

    fn boot_marker(&self) -> &'static str {
        r"Rime started with address (?P<hi>\d+)\.(?P<lo>\d+)"
    }

    fn energest_marker(&self) -> &'static str {
        r"Energest: (?P<cnt>\d+) (?P<cpu>\d+) (?P<lpm>\d+) (?P<tx>\d+) (?P<rx>\d+)"
    }

    fn patterns(&self) -> &'static LogPatterns {
        &SIMULATED_PATTERNS
    }

    /// Virtual time is kept as logged, no unit conversion.
    fn normalize(&self, token: &str) -> Result<LogTime, TimestampError> {
        token.trim().parse::<f64>().map_err(|_| TimestampError {
            regime: "simulated",
            token: token.to_string(),
        })
    }
}

/// Testbed logs:
/// `[2019-03-20 10:15:02,123] INFO:firefly.7: 7.firefly < b'<message>'`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealWorld;

/// Wall-clock format once the `,` fraction separator is swapped for `.`
const WALL_CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl Regime for RealWorld {
    fn record_header(&self) -> &'static str {
        r"^\[(?P<time>[^\]]+)\] [A-Z]+:firefly\.(?P<self_id>\d+): \d+\.firefly < b.*"
    }

    fn boot_marker(&self) -> &'static str {
        r"'Rime configured with address (?P<hi>\d+)\.(?P<lo>\d+)'"
    }

    fn energest_marker(&self) -> &'static str {
        r"'Energest: (?P<cnt>\d+) (?P<cpu>\d+) (?P<lpm>\d+) (?P<tx>\d+) (?P<rx>\d+)'"
    }

    fn patterns(&self) -> &'static LogPatterns {
        &TESTBED_PATTERNS
    }

    /// `YYYY-MM-DD HH:MM:SS,ffffff` to seconds since the epoch, read as UTC.
    fn normalize(&self, token: &str) -> Result<LogTime, TimestampError> {
        let err = || TimestampError {
            regime: "real-world",
            token: token.to_string(),
        };

        let (whole, fraction) = token.split_once(',').ok_or_else(err)?;
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let dt = NaiveDateTime::parse_from_str(&format!("{whole}.{fraction}"), WALL_CLOCK_FORMAT)
            .map_err(|_| err())?
            .and_utc();
        Ok(dt.timestamp() as f64 + dt.timestamp_subsec_nanos() as f64 / 1e9)
    }
}
