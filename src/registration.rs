//! Network registration and signal strength as reported by `+CREG` and `+CSQ`.

/// 3GPP registration status, the `<stat>` field of `+CREG`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStatus {
    NotRegistered,
    Home,
    Searching,
    Denied,
    Unknown,
    Roaming,
    /// Any status code outside 0..=5, e.g. the SMS-only variants
    Other(u8),
}

impl From<u8> for RegistrationStatus {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::NotRegistered,
            1 => Self::Home,
            2 => Self::Searching,
            3 => Self::Denied,
            4 => Self::Unknown,
            5 => Self::Roaming,
            n => Self::Other(n),
        }
    }
}

impl RegistrationStatus {
    /// The raw status code
    pub fn code(&self) -> u8 {
        match self {
            Self::NotRegistered => 0,
            Self::Home => 1,
            Self::Searching => 2,
            Self::Denied => 3,
            Self::Unknown => 4,
            Self::Roaming => 5,
            Self::Other(n) => *n,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Home | Self::Roaming)
    }

    /// Parse the body of a `+CREG: <n>,<stat>[,...]` line
    pub(crate) fn from_creg(body: &str) -> Option<Self> {
        body.split(',')
            .nth(1)
            .and_then(|stat| stat.trim().parse::<u8>().ok())
            .map(Self::from)
    }
}

/// Raw `+CSQ` RSSI value meaning "not known or not detectable"
const RSSI_UNKNOWN: u8 = 99;

/// Highest valid raw `+CSQ` RSSI value
const RSSI_MAX: u8 = 31;

/// Map the body of a `+CSQ: <rssi>,<ber>` line to a signal level in 1..=5.
///
/// The level is `1 + rssi * 4 / 31`, rounded to the nearest integer.
pub(crate) fn signal_level(body: &str) -> Option<u8> {
    let rssi = body.split(',').next()?.trim().parse::<u8>().ok()?;
    if rssi == RSSI_UNKNOWN || rssi > RSSI_MAX {
        return None;
    }
    let rssi = u16::from(rssi);
    // round(rssi * 4 / 31) == floor((rssi * 8 + 31) / 62)
    u8::try_from((rssi * 8 + 31) / 62 + 1).ok()
}
