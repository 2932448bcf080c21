//! Argument types used by HTTP and bearer commands

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BearerAction {
    Close = 0,
    Open = 1,
    Query = 2,
    Configure = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HttpMethod {
    Get = 0,
    Post = 1,
    Head = 2,
}
