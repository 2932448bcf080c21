//! ### HTTP application commands
//!
//! HTTP runs on the bearer profile configured with `+SAPBR`, which is
//! separate from the `+CNACT` application network used by MQTT.

pub mod types;

use core::fmt::Write;

use super::{AtCmd, CommandBuf};
use types::{BearerAction, HttpMethod};

/// Bearer profile identifier used for HTTP
pub const BEARER_PROFILE: u8 = 1;

/// Bearer settings +SAPBR=3
#[derive(Debug, Clone)]
pub struct SetBearerApn<'a> {
    pub apn: &'a str,
}

impl AtCmd for SetBearerApn<'_> {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(
            buf,
            "AT+SAPBR={},{},\"APN\",\"{}\"",
            BearerAction::Configure as u8,
            BEARER_PROFILE,
            self.apn
        )
    }
}

/// Bearer action +SAPBR
#[derive(Debug, Clone)]
pub struct SetBearerAction {
    pub action: BearerAction,
}

impl AtCmd for SetBearerAction {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+SAPBR={},{}", self.action as u8, BEARER_PROFILE)
    }
}

/// Initialize HTTP service +HTTPINIT
#[derive(Debug, Clone)]
pub struct HttpInit;

impl AtCmd for HttpInit {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+HTTPINIT")
    }
}

/// Terminate HTTP service +HTTPTERM
#[derive(Debug, Clone)]
pub struct HttpTerm;

impl AtCmd for HttpTerm {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+HTTPTERM")
    }
}

/// Set HTTP URL parameter +HTTPPARA="URL"
#[derive(Debug, Clone)]
pub struct SetHttpUrl<'a> {
    pub url: &'a str,
}

impl AtCmd for SetHttpUrl<'_> {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+HTTPPARA=\"URL\",\"{}\"", self.url)
    }
}

/// Input HTTP data +HTTPDATA
///
/// The modem answers `DOWNLOAD` and then reads `len` raw bytes within
/// `max_time_ms`.
#[derive(Debug, Clone)]
pub struct HttpData {
    pub len: usize,
    pub max_time_ms: u32,
}

impl AtCmd for HttpData {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+HTTPDATA={},{}", self.len, self.max_time_ms)
    }
}

/// HTTP method action +HTTPACTION
#[derive(Debug, Clone)]
pub struct HttpAction {
    pub method: HttpMethod,
}

impl AtCmd for HttpAction {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+HTTPACTION={}", self.method as u8)
    }
}
