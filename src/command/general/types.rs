//! Argument types used by general commands

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Echo {
    Off = 0,
    On = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TerminationErrorMode {
    /// Plain `ERROR`
    Disabled = 0,
    /// `+CME ERROR: <err>` with numeric codes
    Enabled = 1,
    /// `+CME ERROR: <err>` with verbose text
    Verbose = 2,
}
