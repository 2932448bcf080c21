//! Argument types used by MQTT commands

/// MQTT delivery guarantee
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QoS {
    AtMostOnce = 0,
    #[default]
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// One `+SMCONF` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MqttParam<'a> {
    Url { url: &'a str, port: u16 },
    ClientId(&'a str),
    Username(&'a str),
    Password(&'a str),
}
