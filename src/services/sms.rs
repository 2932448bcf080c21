use embedded_hal::delay::DelayNs;

use crate::{
    client::Device,
    command::sms::{MessageBody, SendMessage, SetMessageFormat},
    error::Error,
    traits::Transport,
};

impl<T, D> Device<'_, T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Send a text message to `number`, given in international format, e.g.
    /// `+48333222111`.
    ///
    /// Returns whether the modem confirmed the submission.
    pub fn send_sms(&mut self, number: &str, text: &str) -> Result<bool, Error> {
        self.at.send(&SetMessageFormat { text_mode: true })?;
        self.at.send(&SendMessage { number })?;
        let response = self.at.send(&MessageBody { text })?;

        if !response.is_ok() {
            warn!("SMS to {:?} not confirmed", number);
        }
        Ok(response.is_ok())
    }
}
