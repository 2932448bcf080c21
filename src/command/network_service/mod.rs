//! ### Network service commands

use core::fmt::Write;

use super::{AtCmd, CommandBuf};

/// Network registration +CREG
///
/// The read command answers `+CREG: <n>,<stat>[,<lac>,<ci>]`. Only `<stat>`
/// is inspected, see [`RegistrationStatus`](crate::RegistrationStatus).
#[derive(Debug, Clone)]
pub struct GetNetworkRegistrationStatus;

impl AtCmd for GetNetworkRegistrationStatus {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+CREG?")
    }
}
