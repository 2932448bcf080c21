//! ### MQTT application commands
//!
//! The modem keeps one MQTT session. Its parameters are set one by one with
//! `+SMCONF` before `+SMCONN` opens it.

pub mod types;

use core::fmt::Write;

use super::{AtCmd, CommandBuf, Timeout};
use types::{MqttParam, QoS};

/// Set MQTT parameter +SMCONF
#[derive(Debug, Clone)]
pub struct SetMqttConfig<'a> {
    pub param: MqttParam<'a>,
}

impl AtCmd for SetMqttConfig<'_> {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        match self.param {
            MqttParam::Url { url, port } => {
                write!(buf, "AT+SMCONF=\"URL\",\"{}\",\"{}\"", url, port)
            }
            MqttParam::ClientId(id) => write!(buf, "AT+SMCONF=\"CLIENTID\",\"{}\"", id),
            MqttParam::Username(user) => write!(buf, "AT+SMCONF=\"USERNAME\",\"{}\"", user),
            MqttParam::Password(pass) => write!(buf, "AT+SMCONF=\"PASSWORD\",\"{}\"", pass),
        }
    }
}

/// MQTT connection +SMCONN
#[derive(Debug, Clone)]
pub struct MqttConnect;

impl AtCmd for MqttConnect {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+SMCONN")
    }
}

/// MQTT disconnection +SMDISC
#[derive(Debug, Clone)]
pub struct MqttDisconnect;

impl AtCmd for MqttDisconnect {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+SMDISC")
    }
}

/// MQTT connection status +SMSTATE
///
/// Answers `+SMSTATE: <status>`, `0` meaning disconnected.
#[derive(Debug, Clone)]
pub struct GetMqttState;

impl AtCmd for GetMqttState {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        buf.write_str("AT+SMSTATE?")
    }
}

/// Send packet +SMPUB
///
/// Header of a publish. The modem answers with a `>` prompt and then expects
/// exactly `len` raw payload bytes.
#[derive(Debug, Clone)]
pub struct MqttPublish<'a> {
    pub topic: &'a str,
    pub len: usize,
    pub qos: QoS,
    pub retain: bool,
}

impl AtCmd for MqttPublish<'_> {
    const TIMEOUT: Timeout = Timeout::millis(100);

    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(
            buf,
            "AT+SMPUB=\"{}\",{},{},{}",
            self.topic,
            self.len,
            self.qos as u8,
            u8::from(self.retain)
        )
    }
}

/// Subscribe packet +SMSUB
#[derive(Debug, Clone)]
pub struct MqttSubscribe<'a> {
    pub topic: &'a str,
    pub qos: QoS,
}

impl AtCmd for MqttSubscribe<'_> {
    fn write(&self, buf: &mut CommandBuf) -> core::fmt::Result {
        write!(buf, "AT+SMSUB=\"{}\",{}", self.topic, self.qos as u8)
    }
}
