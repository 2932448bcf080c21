//! GNSS receiver power and position fix.

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::{
    client::Device,
    command::gnss::{GetGnssInfo, SetGnssPower},
    error::{Error, GenericError},
    module_timing,
    traits::Transport,
};

/// Capacity of a single coordinate field
pub const COORDINATE_CAPACITY: usize = 16;

/// `<GNSS run status>,<fix status>` of a valid fix
const FIX_PREFIX: &str = "1,1";

/// Latitude and longitude in decimal degrees, as reported by the modem
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GnssPosition {
    pub latitude: String<COORDINATE_CAPACITY>,
    pub longitude: String<COORDINATE_CAPACITY>,
}

impl core::fmt::Display for GnssPosition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl GnssPosition {
    /// Parse the body of a `+CGNSINF` line, `None` without a fix
    fn from_info(body: &str) -> Result<Option<Self>, Error> {
        if !body.starts_with(FIX_PREFIX) {
            return Ok(None);
        }
        let mut fields = body.split(',').skip(3);
        let (Some(latitude), Some(longitude)) = (fields.next(), fields.next()) else {
            return Ok(None);
        };
        Ok(Some(Self {
            latitude: coordinate(latitude)?,
            longitude: coordinate(longitude)?,
        }))
    }
}

fn coordinate(field: &str) -> Result<String<COORDINATE_CAPACITY>, Error> {
    String::try_from(field.trim()).map_err(|_| Error::Generic(GenericError::Format))
}

impl<T, D> Device<'_, T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Power up the GNSS receiver. Returns whether the modem acknowledged.
    pub fn gnss_init(&mut self) -> Result<bool, Error> {
        let retries = self.config.ack_retries;
        self.at.send_until_ack(&SetGnssPower { on: true }, retries)
    }

    /// Wait for a position fix.
    ///
    /// Polls `+CGNSINF` until the receiver reports a fix. This never gives up
    /// unless the configuration sets a poll deadline.
    pub fn gnss_position(&mut self) -> Result<GnssPosition, Error> {
        let deadline = self.config.poll_deadline;
        let position = self
            .at
            .poll_until(deadline, module_timing::gnss_poll_interval(), |at| {
                let response = at.send(&GetGnssInfo)?;
                match response.info_line("+CGNSINF:") {
                    Some(body) => GnssPosition::from_info(body),
                    None => Ok(None),
                }
            })?;

        debug!("GNSS fix at {}", position);
        Ok(position)
    }
}
