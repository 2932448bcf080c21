use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::{
    at_tx::AtTx,
    command::{
        general::{
            types::{Echo, TerminationErrorMode},
            GetClock, SetEcho, SetLocalTimestamp, SetReportMobileTerminationError,
        },
        Timeout, AT,
    },
    config::Config,
    error::Error,
    module_timing,
    response::Response,
    services::mqtt::subscriptions::Subscriptions,
    state::SessionState,
    traits::Transport,
};

/// A SIM700x modem session.
///
/// Owns the transaction engine, the session configuration and the
/// subscription table. Every operation borrows the device mutably, so at most
/// one command is ever outstanding.
pub struct Device<'a, T, D> {
    pub(crate) at: AtTx<T, D>,
    pub(crate) config: Config<'a>,
    pub(crate) subscriptions: Subscriptions<'a>,
    pub(crate) state: SessionState,
}

impl<'a, T, D> Device<'a, T, D>
where
    T: Transport,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D, config: Config<'a>) -> Self {
        let mut at = AtTx::new(transport, delay);
        at.set_diagnostics(config.diagnostics);
        Self {
            at,
            config,
            subscriptions: Subscriptions::new(),
            state: SessionState::Disconnected,
        }
    }

    /// Replace the session configuration.
    ///
    /// The modem keeps running, but everything built on the old configuration
    /// has to be established again.
    pub fn set_config(&mut self, config: Config<'a>) {
        self.at.set_diagnostics(config.diagnostics);
        self.config = config;
        self.state = SessionState::Disconnected;
    }

    pub fn config(&self) -> &Config<'a> {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Wait for the modem to answer, then switch off echo and enable verbose
    /// error reports.
    pub fn init(&mut self) -> Result<(), Error> {
        let deadline = self.config.poll_deadline;
        let timeout = Timeout::After(module_timing::command_timeout());
        self.at.poll_until(deadline, Duration::from_ticks(0), |at| {
            Ok(at.send_with_timeout(&AT, timeout)?.is_ok().then_some(()))
        })?;

        let echo = self.at.send(&SetEcho { enabled: Echo::Off })?;
        if !echo.is_ok() {
            warn!("Failed to disable command echo");
        }
        let cmee = self.at.send(&SetReportMobileTerminationError {
            n: TerminationErrorMode::Verbose,
        })?;
        if !cmee.is_ok() {
            warn!("Failed to enable verbose error reports");
        }

        info!("Modem ready");
        Ok(())
    }

    /// Send an arbitrary command line and return whatever came back
    pub fn send_at(&mut self, command: &str, timeout: Timeout) -> Result<Response, Error> {
        self.at.transact(command, timeout, true, Duration::from_ticks(0))
    }

    /// Network time as reported by `+CCLK`, e.g. `24/03/01,12:30:00+04`
    pub fn date_time(&mut self) -> Result<Option<String<32>>, Error> {
        self.at.send(&SetLocalTimestamp { enabled: true })?;
        let response = self.at.send(&GetClock)?;

        Ok(response
            .info_line("+CCLK:")
            .and_then(|body| body.split('"').nth(1))
            .and_then(|stamp| String::try_from(stamp).ok()))
    }

    /// Total time the driver has spent waiting on the modem
    pub fn uptime(&self) -> Duration {
        self.at.uptime()
    }

    pub fn release(self) -> (T, D) {
        self.at.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::Deadline;
    use crate::test_helpers::{MockDelay, MockSerial, SimClock};

    type TestDevice = Device<'static, MockSerial, MockDelay>;

    fn device(config: Config<'static>) -> (TestDevice, MockSerial, SimClock) {
        let clock = SimClock::default();
        let serial = MockSerial::new(&clock);
        let device = Device::new(serial.clone(), MockDelay::new(&clock), config);
        (device, serial, clock)
    }

    #[test]
    fn init_waits_for_modem() {
        let (mut device, serial, clock) = device(Config::new("internet"));
        serial
            .on_seq("AT", &["", "", "\r\nOK\r\n"])
            .on("ATE0", "\r\nOK\r\n")
            .on("AT+CMEE=2", "\r\nOK\r\n");

        device.init().unwrap();

        assert_eq!(serial.sent(), ["AT", "AT", "AT", "ATE0", "AT+CMEE=2"]);
        assert_eq!(clock.now_ms(), 2 * 1001);
    }

    #[test]
    fn baud_rate_stays_with_the_application() {
        let (mut device, serial, _clock) = device(Config::new("internet").baud_rate(9_600_u32));
        serial.on("AT", "\r\nOK\r\n");

        device.init().unwrap();

        assert_eq!(serial.count("AT+IPR"), 0);
        assert_eq!(device.config().baud_rate_value(), 9_600);
    }

    #[test]
    fn init_respects_deadline() {
        let (mut device, serial, _clock) = device(
            Config::new("internet").with_poll_deadline(Deadline::After(Duration::from_secs(5))),
        );

        assert_eq!(device.init(), Err(Error::Exceeded));
        assert_eq!(serial.count("AT"), 5);
    }

    #[test]
    fn date_time_extracts_quoted_stamp() {
        let (mut device, serial, _clock) = device(Config::new("internet"));
        serial
            .on("AT+CLTS=1", "\r\nOK\r\n")
            .on("AT+CCLK?", "\r\n+CCLK: \"24/03/01,12:30:00+04\"\r\n\r\nOK\r\n");

        assert_eq!(
            device.date_time().unwrap().as_deref(),
            Some("24/03/01,12:30:00+04")
        );
    }

    #[test]
    fn date_time_without_clock_line() {
        let (mut device, serial, _clock) = device(Config::new("internet"));
        serial.on("AT+C", "\r\nERROR\r\n");

        assert_eq!(device.date_time().unwrap(), None);
    }

    #[test]
    fn send_at_passes_through() {
        let (mut device, serial, _clock) = device(Config::new("internet"));
        serial.on("AT+CGMR", "\r\nRevision:1351B03SIM7000G\r\n\r\nOK\r\n");

        let response = device.send_at("AT+CGMR", Timeout::millis(500)).unwrap();

        assert!(response.is_ok());
        assert!(response.contains("SIM7000G"));
    }

    #[test]
    fn new_config_starts_new_session() {
        let (mut device, serial, _clock) = device(Config::new("internet"));
        serial.on("AT", "\r\nOK\r\n");
        device.state = SessionState::BrokerConnected;

        device.set_config(Config::new("iot").with_diagnostics());
        device.send_at("AT", Timeout::millis(10)).unwrap();

        assert_eq!(device.state(), SessionState::Disconnected);
        assert_eq!(device.config().apn(), "iot");
        assert!(serial.diagnostics().starts_with("Command: AT"));
    }
}
