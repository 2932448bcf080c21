#![cfg_attr(not(test), no_std)]

//! # SIM700x cellular
//!
//! Blocking driver for SIMCom SIM700x modems, talking AT commands over a
//! half-duplex serial link. It can be used both on `no_std` and `std`
//! platforms.
//!
//! The driver is built from three layers:
//!
//! - a transaction engine ([`AtTx`]) that writes one command and accumulates
//!   the reply until a final result code shows up or the timeout elapses,
//! - an acknowledgement retry loop on top of it, used for every configuration
//!   command,
//! - a [`Device`] that sequences transactions into network attach, MQTT broker
//!   connect and publish, and dispatches subscription push frames.
//!
//! ## Example
//!
//! ```ignore
//! let config = Config::new("internet")
//!     .with_broker(Broker::new("broker.example.com", 1883, "node-1"));
//!
//! let mut device = Device::new(SerialTransport::new(uart), delay, config);
//! device.init()?;
//! device.attach_network()?;
//! device.connect_broker()?;
//!
//! match device.publish("sensors/temp", "21.5", QoS::AtLeastOnce, false)? {
//!     PublishOutcome::Delivered { .. } => {}
//!     PublishOutcome::Abandoned { repairs } => warn!("gave up after {} repairs", repairs),
//! }
//! ```
//!
//! Subscription deliveries arrive unsolicited. Call [`Device::handle_push`]
//! whenever the UART receives a `+` byte.

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod at_tx;
mod client;
pub mod command;
pub mod config;
pub mod error;
mod module_timing;
mod network;
pub mod poll;
pub mod registration;
pub mod response;
pub mod services;
pub mod state;
pub mod traits;

#[cfg(test)]
mod test_helpers;

pub use at_tx::AtTx;
pub use client::Device;
pub use command::Timeout;
pub use config::{Broker, Config};
pub use error::Error;
pub use poll::Deadline;
pub use registration::RegistrationStatus;
pub use response::Response;
pub use services::location::GnssPosition;
pub use services::mqtt::{types::QoS, PublishOutcome};
pub use state::SessionState;
pub use traits::{NoDiagnostics, SerialTransport, Transport};

// Re-export the time and delay types used in the public API
pub use embassy_time::Duration;
pub use embedded_hal::delay::DelayNs;
