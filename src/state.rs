/// Coarse session progress, kept for diagnostics.
///
/// Operations never trust this value. Every stage is re-checked with a query
/// command before it is relied upon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    #[default]
    Disconnected,
    /// Registered and the application PDP context is active
    NetworkAttached,
    BrokerConnected,
    /// A publish is in flight
    Publishing,
}

impl SessionState {
    pub fn is_attached(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}
