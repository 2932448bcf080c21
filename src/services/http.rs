//! HTTP client over the `+SAPBR` bearer.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::{
    client::Device,
    command::{
        http::{
            types::{BearerAction, HttpMethod},
            HttpAction, HttpData, HttpInit, HttpTerm, SetBearerAction, SetBearerApn, SetHttpUrl,
        },
        Timeout,
    },
    error::Error,
    module_timing,
    traits::Transport,
};

impl<T, D> Device<'_, T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Open the HTTP bearer on the configured APN and start the HTTP service.
    ///
    /// A service left running by an earlier session is terminated and started
    /// again. Returns whether the service is up.
    pub fn http_init(&mut self) -> Result<bool, Error> {
        let apn = self.config.apn;
        let retries = self.config.ack_retries;

        self.at.send_until_ack(&SetBearerApn { apn }, retries)?;
        self.at.send_until_ack(
            &SetBearerAction {
                action: BearerAction::Open,
            },
            retries,
        )?;
        self.at.send_until_ack(
            &SetBearerAction {
                action: BearerAction::Query,
            },
            retries,
        )?;

        if self.at.send_until_ack(&HttpInit, retries)? {
            return Ok(true);
        }
        debug!("HTTP service already running, restarting it");
        self.at.send_until_ack(&HttpTerm, retries)?;
        self.at.send_until_ack(&HttpInit, retries)
    }

    /// POST `data` to `url`. Returns whether the request was accepted.
    pub fn http_post(&mut self, url: &str, data: &str) -> Result<bool, Error> {
        let retries = self.config.ack_retries;
        let max_time = module_timing::http_data_timeout();

        self.at.send_until_ack(&SetHttpUrl { url }, retries)?;
        self.at.send(&HttpData {
            len: data.len(),
            max_time_ms: u32::try_from(max_time.as_millis()).unwrap_or(u32::MAX),
        })?;
        self.at.pause(module_timing::payload_prompt_wait());
        self.at.transact(
            data,
            Timeout::After(max_time),
            false,
            Duration::from_ticks(0),
        )?;

        self.at.send_until_ack(
            &HttpAction {
                method: HttpMethod::Post,
            },
            retries,
        )
    }
}
