//! ### Packet switched data commands
//!
//! The SIM700x application network (`+CNACT`) is the PDP context used by the
//! modem's internal IP stack, and therefore by MQTT. It has to be active
//! before any `+SM*` command can reach the broker.

use core::fmt::Write;

use super::{AtCmd, CommandBuf};

/// APP network active +CNACT
///
/// Activates the application network on `apn`. The command answers `OK`
/// immediately; the activation result is only visible through
/// [`GetAppNetworkActive`].
#[derive(Debug, Clone)]
pub struct SetAppNetworkActive<'a> {
    pub apn: &'a str,
}

impl AtCmd for SetAppNetworkActive<'_> {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+CNACT=1,\"{}\"", self.apn)
    }
}

/// APP network active +CNACT
///
/// Answers `+CNACT: <status>,"<ip>"`, status `1` once the context is up.
#[derive(Debug, Clone)]
pub struct GetAppNetworkActive;

impl AtCmd for GetAppNetworkActive {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+CNACT?")
    }
}
