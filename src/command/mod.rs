//! AT Commands for the SIMCom SIM700x module family
//!
//! Every command renders itself into a bounded [`CommandBuf`]. Responses are
//! not parsed into types here; callers inspect the [`Response`](crate::Response)
//! lines they care about.

pub mod general;
pub mod gnss;
pub mod http;
pub mod mqtt;
pub mod network_service;
pub mod psn;
pub mod sms;

use embassy_time::Duration;
use heapless::String;

use crate::error::Error;

/// Maximum length of a rendered command line
pub const COMMAND_CAPACITY: usize = 256;

pub type CommandBuf = String<COMMAND_CAPACITY>;

/// How long a transaction may wait for its final result code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Only a terminal token ends the transaction. Callers have to bound the
    /// number of such calls themselves.
    Infinite,
    After(Duration),
}

impl Timeout {
    pub const fn millis(ms: u64) -> Self {
        Self::After(Duration::from_millis(ms))
    }

    pub(crate) fn expired(&self, elapsed: Duration) -> bool {
        match self {
            Self::Infinite => false,
            Self::After(timeout) => elapsed > *timeout,
        }
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::millis(1000)
    }
}

/// A command that can be sent through [`AtTx`](crate::AtTx)
pub trait AtCmd {
    /// Timeout used by a plain transaction
    const TIMEOUT: Timeout = Timeout::millis(1000);

    /// Whether the command is terminated with a line break. Payload transfers
    /// that follow a prompt are written raw.
    const NEWLINE: bool = true;

    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result;

    fn render(&self) -> Result<CommandBuf, Error> {
        let mut buf = CommandBuf::new();
        self.write(&mut buf)?;
        Ok(buf)
    }
}

/// Liveness check
#[derive(Debug, Clone)]
pub struct AT;

impl AtCmd for AT {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.push_str("AT").map_err(|_| core::fmt::Error)
    }
}

#[cfg(test)]
pub(crate) fn rendered<C: AtCmd>(cmd: &C) -> std::string::String {
    std::string::String::from(cmd.render().unwrap().as_str())
}
