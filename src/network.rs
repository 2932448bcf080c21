//! Network registration and application PDP context.

use embedded_hal::delay::DelayNs;

use crate::{
    at_tx::AtTx,
    client::Device,
    command::{
        general::GetSignalQuality,
        network_service::GetNetworkRegistrationStatus,
        psn::{GetAppNetworkActive, SetAppNetworkActive},
        AtCmd, Timeout,
    },
    error::Error,
    module_timing::{self, CONTEXT_REACTIVATION_POLLS},
    registration::{self, RegistrationStatus},
    state::SessionState,
    traits::Transport,
};

impl<T, D> Device<'_, T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Register with the network and bring up the application PDP context.
    ///
    /// Both waits are unbounded unless the configuration sets a poll deadline.
    pub fn attach_network(&mut self) -> Result<(), Error> {
        let deadline = self.config.poll_deadline;
        let apn = self.config.apn;

        let status = self.at.poll_until(
            deadline,
            module_timing::registration_poll_interval(),
            |at| Ok(query_registration(at)?.filter(RegistrationStatus::is_registered)),
        )?;
        debug!("Registered: {:?}", status);

        self.at.send(&SetAppNetworkActive { apn })?;
        self.at.pause(module_timing::context_poll_interval());

        let mut polls = 0u8;
        self.at
            .poll_until(deadline, module_timing::context_poll_interval(), |at| {
                if polls >= CONTEXT_REACTIVATION_POLLS {
                    debug!("PDP context still down, activating again");
                    at.send(&SetAppNetworkActive { apn })?;
                    polls = 0;
                }
                polls += 1;
                let active = context_active(at, GetAppNetworkActive::TIMEOUT)?;
                Ok(active.then_some(()))
            })?;

        info!("Network attached");
        self.state = SessionState::NetworkAttached;
        Ok(())
    }

    /// Current registration status, `None` when the modem gave no `+CREG` line
    pub fn registration_status(&mut self) -> Result<Option<RegistrationStatus>, Error> {
        query_registration(&mut self.at)
    }

    /// Signal strength as a level in 1..=5, `None` when it is not known
    pub fn signal_quality(&mut self) -> Result<Option<u8>, Error> {
        let response = self.at.send(&GetSignalQuality)?;
        Ok(response.info_line("+CSQ:").and_then(registration::signal_level))
    }
}

pub(crate) fn query_registration<T, D>(
    at: &mut AtTx<T, D>,
) -> Result<Option<RegistrationStatus>, Error>
where
    T: Transport,
    D: DelayNs,
{
    let response = at.send(&GetNetworkRegistrationStatus)?;
    Ok(response
        .info_line("+CREG:")
        .and_then(RegistrationStatus::from_creg))
}

/// Whether `+CNACT?` reports the application context as active
pub(crate) fn context_active<T, D>(at: &mut AtTx<T, D>, timeout: Timeout) -> Result<bool, Error>
where
    T: Transport,
    D: DelayNs,
{
    let response = at.send_with_timeout(&GetAppNetworkActive, timeout)?;
    Ok(response
        .info_line("+CNACT:")
        .and_then(|body| body.split(',').next())
        .is_some_and(|status| status.trim() == "1"))
}

#[cfg(test)]
mod tests {
    use embassy_time::Duration;

    use crate::config::Config;
    use crate::poll::Deadline;
    use crate::test_helpers::{MockDelay, MockSerial, SimClock};
    use crate::{Device, Error, RegistrationStatus, SessionState};

    const CONTEXT_DOWN: &str = "\r\n+CNACT: 0,\"0.0.0.0\"\r\n\r\nOK\r\n";
    const CONTEXT_UP: &str = "\r\n+CNACT: 1,\"10.64.12.7\"\r\n\r\nOK\r\n";

    type TestDevice = Device<'static, MockSerial, MockDelay>;

    fn device(config: Config<'static>) -> (TestDevice, MockSerial) {
        let clock = SimClock::default();
        let serial = MockSerial::new(&clock);
        let device = Device::new(serial.clone(), MockDelay::new(&clock), config);
        (device, serial)
    }

    #[test]
    fn attach_waits_for_registration_and_context() {
        let (mut device, serial) = device(Config::new("internet"));
        serial
            .on_seq(
                "AT+CREG?",
                &["\r\n+CREG: 0,2\r\n\r\nOK\r\n", "\r\n+CREG: 0,5\r\n\r\nOK\r\n"],
            )
            .on("AT+CNACT=", "\r\nOK\r\n")
            .on_seq("AT+CNACT?", &[CONTEXT_DOWN, CONTEXT_UP]);

        device.attach_network().unwrap();

        assert_eq!(
            serial.sent(),
            [
                "AT+CREG?",
                "AT+CREG?",
                "AT+CNACT=1,\"internet\"",
                "AT+CNACT?",
                "AT+CNACT?",
            ]
        );
        assert_eq!(device.state(), SessionState::NetworkAttached);
    }

    #[test]
    fn attach_reactivates_stuck_context() {
        let (mut device, serial) = device(Config::new("internet"));
        let mut replies = [CONTEXT_DOWN; 10];
        replies[9] = CONTEXT_UP;
        serial
            .on("AT+CREG?", "\r\n+CREG: 0,1\r\n\r\nOK\r\n")
            .on("AT+CNACT=", "\r\nOK\r\n")
            .on_seq("AT+CNACT?", &replies);

        device.attach_network().unwrap();

        assert_eq!(serial.count("AT+CNACT?"), 10);
        assert_eq!(serial.count("AT+CNACT=1"), 2);
        let sent = serial.sent();
        let reactivation = sent.iter().rposition(|c| c.starts_with("AT+CNACT=1")).unwrap();
        assert_eq!(
            sent[..reactivation]
                .iter()
                .filter(|c| *c == "AT+CNACT?")
                .count(),
            8
        );
    }

    #[test]
    fn attach_deadline_is_opt_in() {
        let (mut device, serial) = device(
            Config::new("internet").with_poll_deadline(Deadline::After(Duration::from_secs(3))),
        );
        serial.on("AT+CREG?", "\r\n+CREG: 0,2\r\n\r\nOK\r\n");

        assert_eq!(device.attach_network(), Err(Error::Exceeded));
        assert_eq!(serial.count("AT+CNACT"), 0);
        assert_eq!(device.state(), SessionState::Disconnected);
    }

    #[test]
    fn registration_and_signal_queries() {
        let (mut device, serial) = device(Config::new("internet"));
        serial
            .on("AT+CREG?", "\r\n+CREG: 0,5\r\n\r\nOK\r\n")
            .on_seq(
                "AT+CSQ",
                &["\r\n+CSQ: 15,0\r\n\r\nOK\r\n", "\r\n+CSQ: 99,99\r\n\r\nOK\r\n"],
            );

        assert_eq!(
            device.registration_status().unwrap(),
            Some(RegistrationStatus::Roaming)
        );
        assert_eq!(device.signal_quality().unwrap(), Some(3));
        assert_eq!(device.signal_quality().unwrap(), None);
    }
}
