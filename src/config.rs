use crate::poll::Deadline;

/// Default number of additional attempts of the acknowledgement retry loop
pub const DEFAULT_ACK_RETRIES: u8 = 5;

/// MQTT broker endpoint and credentials, written to the modem with `+SMCONF`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Broker<'a> {
    pub url: &'a str,
    pub port: u16,
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> Broker<'a> {
    #[must_use]
    pub fn new(url: &'a str, port: u16, client_id: &'a str) -> Self {
        Self {
            url,
            port,
            client_id,
            username: "",
            password: "",
        }
    }

    #[must_use]
    pub fn with_credentials(self, username: &'a str, password: &'a str) -> Self {
        Self {
            username,
            password,
            ..self
        }
    }
}

/// Session configuration.
///
/// Owned by [`Device`](crate::Device) and read by every session operation.
/// Swapping it with [`Device::set_config`](crate::Device::set_config) starts a
/// new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config<'a> {
    pub(crate) apn: &'a str,
    pub(crate) broker: Broker<'a>,
    /// Carried for the application's UART setup, never sent to the modem
    pub(crate) baud_rate: u32,
    pub(crate) diagnostics: bool,
    pub(crate) poll_deadline: Deadline,
    pub(crate) ack_retries: u8,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            apn: "",
            broker: Broker::default(),
            baud_rate: 115_200_u32,
            diagnostics: false,
            poll_deadline: Deadline::Never,
            ack_retries: DEFAULT_ACK_RETRIES,
        }
    }
}

impl<'a> Config<'a> {
    #[must_use]
    pub fn new(apn: &'a str) -> Self {
        Self {
            apn,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_broker(self, broker: Broker<'a>) -> Self {
        Self { broker, ..self }
    }

    /// Record the UART baud rate.
    ///
    /// The driver does not configure the serial port or send `+IPR`. The
    /// application reads the value back with [`Config::baud_rate_value`] when
    /// it sets up the UART it hands to the transport.
    #[must_use]
    pub fn baud_rate<B: Into<u32>>(self, baud_rate: B) -> Self {
        Self {
            baud_rate: baud_rate.into(),
            ..self
        }
    }

    /// Mirror every command and its response to the diagnostic channel
    #[must_use]
    pub fn with_diagnostics(self) -> Self {
        Self {
            diagnostics: true,
            ..self
        }
    }

    /// Bound the attach and GNSS poll loops. By default they never give up.
    #[must_use]
    pub fn with_poll_deadline(self, deadline: Deadline) -> Self {
        Self {
            poll_deadline: deadline,
            ..self
        }
    }

    #[must_use]
    pub fn with_ack_retries(self, retries: u8) -> Self {
        Self {
            ack_retries: retries,
            ..self
        }
    }

    pub fn apn(&self) -> &str {
        self.apn
    }

    pub fn broker(&self) -> &Broker<'a> {
        &self.broker
    }

    /// Baud rate the application should configure its UART with. Defaults to
    /// 115200.
    pub fn baud_rate_value(&self) -> u32 {
        self.baud_rate
    }
}
