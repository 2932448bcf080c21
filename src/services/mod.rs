//! Modem application services built on the transaction engine.

pub mod http;
pub mod location;
pub mod mqtt;
pub mod sms;
