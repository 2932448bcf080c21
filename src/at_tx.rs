use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::{
    command::{AtCmd, Timeout},
    error::Error,
    module_timing,
    response::Response,
    traits::Transport,
};

/// Bytes pulled from the transport per read
const READ_CHUNK: usize = 64;

/// Command/response transactions over a [`Transport`].
///
/// Exactly one command is outstanding at a time. All waiting goes through the
/// delay provider, and the time spent there is the transaction clock: timeouts
/// and poll deadlines are measured against [`AtTx::uptime`].
pub struct AtTx<T, D> {
    transport: T,
    delay: D,
    uptime: Duration,
    diagnostics: bool,
}

impl<T, D> AtTx<T, D>
where
    T: Transport,
    D: DelayNs,
{
    pub fn new(transport: T, delay: D) -> Self {
        Self {
            transport,
            delay,
            uptime: Duration::from_ticks(0),
            diagnostics: false,
        }
    }

    /// Mirror each command and its response to the transport's diagnostic
    /// channel
    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
    }

    /// Total time spent waiting since creation
    pub fn uptime(&self) -> Duration {
        self.uptime
    }

    pub fn pause(&mut self, duration: Duration) {
        if duration.as_ticks() == 0 {
            return;
        }
        self.delay
            .delay_us(u32::try_from(duration.as_micros()).unwrap_or(u32::MAX));
        self.uptime += duration;
    }

    /// Write `command` and accumulate the reply.
    ///
    /// Returns as soon as the accumulated text contains `OK` or `ERROR`, or
    /// once `timeout` has elapsed. A timed out response is returned as is,
    /// possibly empty or incomplete; it is up to the caller to inspect it.
    pub fn transact(
        &mut self,
        command: &str,
        timeout: Timeout,
        newline: bool,
        settle: Duration,
    ) -> Result<Response, Error> {
        if newline {
            self.transport.write_line(command)?;
        } else {
            self.transport.write_raw(command)?;
        }
        self.pause(settle);

        let start = self.uptime;
        let mut response = Response::new();
        let mut chunk = [0u8; READ_CHUNK];

        while !timeout.expired(self.uptime - start) {
            let n = self.transport.read_available(&mut chunk)?;
            if n > 0 {
                response.extend(&chunk[..n])?;
                if response.has_terminal_token() {
                    break;
                }
            }
            self.pause(module_timing::poll_interval());
        }

        trace!("{:?} -> {:?}", command, response.as_str());
        if self.diagnostics {
            for part in ["Command: ", command, "\r\nResponse: ", response.as_str(), "\r\n"] {
                if let Err(e) = self.transport.write_diagnostic(part) {
                    warn!("Diagnostic write failed: {:?}", e);
                    break;
                }
            }
        }

        Ok(response)
    }

    /// Send a typed command with its own timeout
    pub fn send<C: AtCmd>(&mut self, cmd: &C) -> Result<Response, Error> {
        self.send_with_timeout(cmd, C::TIMEOUT)
    }

    pub fn send_with_timeout<C: AtCmd>(
        &mut self,
        cmd: &C,
        timeout: Timeout,
    ) -> Result<Response, Error> {
        let command = cmd.render()?;
        self.transact(&command, timeout, C::NEWLINE, Duration::from_ticks(0))
    }

    /// Repeat `cmd` until the modem acknowledges it with `OK`.
    ///
    /// Every attempt waits for a final result code without timeout. After a
    /// failed attempt `n` (counting from zero) the loop backs off `100 * n` ms.
    /// Gives up with `Ok(false)` after `retries` additional attempts.
    pub fn send_until_ack<C: AtCmd>(&mut self, cmd: &C, retries: u8) -> Result<bool, Error> {
        let command = cmd.render()?;

        for attempt in 0..=retries {
            let response =
                self.transact(&command, Timeout::Infinite, C::NEWLINE, Duration::from_ticks(0))?;
            if response.is_ok() {
                return Ok(true);
            }
            debug!("{:?} not acknowledged (attempt {})", command.as_str(), attempt);
            self.pause(module_timing::ack_backoff_step() * u32::from(attempt));
        }

        warn!(
            "{:?} not acknowledged after {} attempts",
            command.as_str(),
            u16::from(retries) + 1
        );
        Ok(false)
    }

    /// Read whatever the modem has sent without issuing a command
    pub fn drain(&mut self) -> Result<Response, Error> {
        let mut response = Response::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = self.transport.read_available(&mut chunk)?;
            if n == 0 {
                return Ok(response);
            }
            response.extend(&chunk[..n])?;
        }
    }

    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}
