//! Repeat a check until it yields a value.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::{at_tx::AtTx, error::Error, traits::Transport};

/// Upper bound on the time a poll loop may spend waiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Deadline {
    /// Poll until the check succeeds, however long it takes
    #[default]
    Never,
    After(Duration),
}

impl Deadline {
    pub(crate) fn exceeded(&self, elapsed: Duration) -> bool {
        match self {
            Self::Never => false,
            Self::After(limit) => elapsed >= *limit,
        }
    }
}

impl<T, D> AtTx<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Run `check` every `interval` until it returns `Some`.
    ///
    /// Time spent inside the check counts towards the deadline. Errors from
    /// the check end the loop right away.
    pub fn poll_until<R, F>(
        &mut self,
        deadline: Deadline,
        interval: Duration,
        mut check: F,
    ) -> Result<R, Error>
    where
        F: FnMut(&mut Self) -> Result<Option<R>, Error>,
    {
        let start = self.uptime();
        loop {
            if let Some(value) = check(self)? {
                return Ok(value);
            }
            if deadline.exceeded(self.uptime() - start) {
                warn!("poll loop exceeded its deadline");
                return Err(Error::Exceeded);
            }
            self.pause(interval);
        }
    }
}
