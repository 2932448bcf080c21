//! ### Short message service commands

use core::fmt::Write;

use super::{AtCmd, CommandBuf, Timeout};

/// Terminates a message body in text mode
pub const CTRL_Z: char = '\x1A';

/// Select SMS message format +CMGF
#[derive(Debug, Clone)]
pub struct SetMessageFormat {
    pub text_mode: bool,
}

impl AtCmd for SetMessageFormat {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+CMGF={}", u8::from(self.text_mode))
    }
}

/// Send SMS message +CMGS
///
/// Header of a message. The modem answers with a `>` prompt and waits for a
/// [`MessageBody`].
#[derive(Debug, Clone)]
pub struct SendMessage<'a> {
    pub number: &'a str,
}

impl AtCmd for SendMessage<'_> {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+CMGS=\"{}\"", self.number)
    }
}

/// Message text followed by Ctrl-Z
#[derive(Debug, Clone)]
pub struct MessageBody<'a> {
    pub text: &'a str,
}

impl AtCmd for MessageBody<'_> {
    // Delivery to the SMSC takes a while before `+CMGS: <mr>` comes back
    const TIMEOUT: Timeout = Timeout::millis(60_000);
    const NEWLINE: bool = false;

    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str(self.text)?;
        buf.write_char(CTRL_Z)
    }
}
