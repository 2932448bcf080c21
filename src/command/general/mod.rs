//! ### General and control commands

pub mod types;

use core::fmt::Write;

use super::{AtCmd, CommandBuf};
use types::{Echo, TerminationErrorMode};

/// Command echo E
///
/// Controls whether the modem echoes characters received from the host. Echo
/// has to be off, otherwise every response starts with the command text.
#[derive(Debug, Clone)]
pub struct SetEcho {
    pub enabled: Echo,
}

impl AtCmd for SetEcho {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "ATE{}", self.enabled as u8)
    }
}

/// Report mobile termination error +CMEE
///
/// Selects how errors are reported. In verbose mode failures come back as
/// `+CME ERROR: <text>`.
#[derive(Debug, Clone)]
pub struct SetReportMobileTerminationError {
    pub n: TerminationErrorMode,
}

impl AtCmd for SetReportMobileTerminationError {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+CMEE={}", self.n as u8)
    }
}

/// Signal quality +CSQ
///
/// Answers `+CSQ: <rssi>,<ber>`, rssi in 0..=31 or 99 when not detectable.
#[derive(Debug, Clone)]
pub struct GetSignalQuality;

impl AtCmd for GetSignalQuality {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+CSQ")
    }
}

/// Get local timestamp +CLTS
///
/// Enables synchronisation of the real time clock from the network.
#[derive(Debug, Clone)]
pub struct SetLocalTimestamp {
    pub enabled: bool,
}

impl AtCmd for SetLocalTimestamp {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+CLTS={}", u8::from(self.enabled))
    }
}

/// Clock +CCLK
///
/// Answers `+CCLK: "yy/MM/dd,hh:mm:ss±zz"`.
#[derive(Debug, Clone)]
pub struct GetClock;

impl AtCmd for GetClock {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+CCLK?")
    }
}
