//! ### GNSS commands

use core::fmt::Write;

use super::{AtCmd, CommandBuf};

/// GNSS power control +CGNSPWR
#[derive(Debug, Clone)]
pub struct SetGnssPower {
    pub on: bool,
}

impl AtCmd for SetGnssPower {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+CGNSPWR={}", u8::from(self.on))
    }
}

/// GNSS navigation information +CGNSINF
///
/// Answers `+CGNSINF: <run>,<fix>,<utc>,<lat>,<lon>,...`.
#[derive(Debug, Clone)]
pub struct GetGnssInfo;

impl AtCmd for GetGnssInfo {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+CGNSINF")
    }
}
