#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GenericError {
    /// A command or argument did not fit the bounded command buffer
    Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // Serial link errors
    Io(embedded_io::ErrorKind),
    /// The response did not fit in the accumulation buffer
    Overflow,

    // Session errors
    /// A poll loop ran past its configured deadline
    Exceeded,
    SubscriptionTableFull,

    // Generic shared errors, e.g. from `core::`
    Generic(GenericError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Io(e) => defmt::write!(f, "Io({:?})", e),
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::Exceeded => defmt::write!(f, "Exceeded"),
            Self::SubscriptionTableFull => defmt::write!(f, "SubscriptionTableFull"),
            Self::Generic(e) => defmt::write!(f, "Generic({:?})", e),
        }
    }
}

impl From<embedded_io::ErrorKind> for Error {
    fn from(e: embedded_io::ErrorKind) -> Self {
        Self::Io(e)
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::Generic(GenericError::Format)
    }
}
