//! MQTT session on top of the application network: broker connect, publish
//! with session repair, and topic subscriptions.

pub mod subscriptions;

pub use crate::command::mqtt::types;

use core::fmt::Write as _;

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::{
    client::Device,
    command::{
        mqtt::{
            types::{MqttParam, QoS},
            GetMqttState, MqttConnect, MqttDisconnect, MqttPublish, MqttSubscribe,
            SetMqttConfig,
        },
        Timeout,
    },
    error::Error,
    module_timing::{self, PUBLISH_REPAIR_ATTEMPTS},
    network,
    response::Response,
    state::SessionState,
    traits::Transport,
};
use subscriptions::Handler;

/// Retry budget of the first broker connect attempt
const CONNECT_RETRIES: u8 = 2;

/// Topic Live Objects reads device data from
pub const LIVE_OBJECTS_TOPIC: &str = "dev/data";

/// Maximum size of a Live Objects message
pub const LIVE_OBJECTS_CAPACITY: usize = 512;

/// Result of a publish that did not hit a transport fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PublishOutcome {
    /// The modem accepted the payload after `repairs` session repairs
    Delivered { repairs: u8 },
    /// Every repair cycle was used up and the payload was still rejected
    Abandoned { repairs: u8 },
}

impl PublishOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn repairs(&self) -> u8 {
        match self {
            Self::Delivered { repairs } | Self::Abandoned { repairs } => *repairs,
        }
    }
}

/// Whether a payload response shows a broken session
fn rejected(response: &Response) -> bool {
    response.is_error() || response.has_status("SMSTATE: 0")
}

impl<'a, T, D> Device<'a, T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Configure the broker and open the MQTT session.
    ///
    /// Returns whether the broker acknowledged the connection.
    pub fn connect_broker(&mut self) -> Result<bool, Error> {
        let broker = self.config.broker.clone();
        let retries = self.config.ack_retries;

        for param in [
            MqttParam::Url {
                url: broker.url,
                port: broker.port,
            },
            MqttParam::ClientId(broker.client_id),
            MqttParam::Username(broker.username),
            MqttParam::Password(broker.password),
        ] {
            if !self.at.send_until_ack(&SetMqttConfig { param }, retries)? {
                warn!("Broker parameter not accepted: {:?}", param);
            }
        }

        let mut connected = self.at.send_until_ack(&MqttConnect, CONNECT_RETRIES)?;
        if !connected {
            debug!("Dropping stale MQTT session");
            self.at.send(&MqttDisconnect)?;
            connected = self.at.send_until_ack(&MqttConnect, retries)?;
        }

        if connected {
            info!("Connected to broker {}:{}", broker.url, broker.port);
            self.state = SessionState::BrokerConnected;
        } else {
            error!("Broker connection failed");
        }
        Ok(connected)
    }

    /// Publish `payload` to `topic`, repairing the session when the modem
    /// rejects it.
    ///
    /// A rejected payload triggers up to six check-and-repair cycles, each
    /// followed by a resubmission. Running out of cycles is reported as
    /// [`PublishOutcome::Abandoned`], not as an error.
    pub fn publish(
        &mut self,
        topic: &str,
        payload: &str,
        qos: QoS,
        retain: bool,
    ) -> Result<PublishOutcome, Error> {
        self.state = SessionState::Publishing;
        let outcome = self.publish_with_repair(topic, payload, qos, retain);
        self.state = match outcome {
            Ok(PublishOutcome::Delivered { .. }) => SessionState::BrokerConnected,
            _ => SessionState::Disconnected,
        };
        outcome
    }

    fn publish_with_repair(
        &mut self,
        topic: &str,
        payload: &str,
        qos: QoS,
        retain: bool,
    ) -> Result<PublishOutcome, Error> {
        let header = MqttPublish {
            topic,
            len: payload.len(),
            qos,
            retain,
        };

        let mut response =
            self.submit(&header, payload, module_timing::publish_payload_timeout())?;
        let mut repairs = 0;
        while rejected(&response) {
            if repairs >= PUBLISH_REPAIR_ATTEMPTS {
                error!("Publish to {:?} abandoned after {} repairs", topic, repairs);
                return Ok(PublishOutcome::Abandoned { repairs });
            }
            repairs += 1;
            warn!("Publish to {:?} rejected, repairing session ({})", topic, repairs);

            self.repair_session()?;
            response = self.submit(
                &header,
                payload,
                module_timing::publish_retry_payload_timeout(),
            )?;
        }

        Ok(PublishOutcome::Delivered { repairs })
    }

    /// Send the `+SMPUB` header, then the raw payload
    fn submit(
        &mut self,
        header: &MqttPublish<'_>,
        payload: &str,
        payload_timeout: Duration,
    ) -> Result<Response, Error> {
        self.at.send(header)?;
        self.at.pause(module_timing::payload_prompt_wait());
        self.at.transact(
            payload,
            Timeout::After(payload_timeout),
            false,
            Duration::from_ticks(0),
        )
    }

    /// Check the PDP context and the broker session and fix whichever is down
    fn repair_session(&mut self) -> Result<(), Error> {
        let context_up = network::context_active(&mut self.at, Timeout::Infinite)?;
        let broker = self.at.send_with_timeout(&GetMqttState, Timeout::Infinite)?;
        let retries = self.config.ack_retries;

        if !context_up {
            warn!("PDP context lost, attaching again");
            self.attach_network()?;
            self.at.send_until_ack(&MqttConnect, retries)?;
        } else if broker.has_status("SMSTATE: 0") {
            warn!("Broker session lost, reconnecting");
            self.at.send(&MqttDisconnect)?;
            self.at.send_until_ack(&MqttConnect, retries)?;
        }
        Ok(())
    }

    /// Publish a Live Objects data message to `dev/data`.
    ///
    /// `data` values are keyed by their index:
    /// `{ "s":"<stream>", "v": { "timestamp":"<ts>","0":"<d0>"} }`.
    pub fn publish_live_object(
        &mut self,
        stream: &str,
        timestamp: &str,
        data: &[&str],
    ) -> Result<PublishOutcome, Error> {
        let mut message: String<LIVE_OBJECTS_CAPACITY> = String::new();
        write!(
            message,
            "{{ \"s\":\"{}\", \"v\": {{ \"timestamp\":\"{}\"",
            stream, timestamp
        )?;
        for (i, value) in data.iter().enumerate() {
            write!(message, ",\"{}\":\"{}\"", i, value)?;
        }
        message.push_str("} }").map_err(|_| core::fmt::Error)?;

        self.publish(LIVE_OBJECTS_TOPIC, &message, QoS::default(), false)
    }

    /// Subscribe to `topic` and route its deliveries to `handler`.
    ///
    /// The topic is kept even if the modem does not acknowledge the
    /// subscription; the return value tells whether it did.
    pub fn subscribe(&mut self, topic: &str, handler: Handler<'a>) -> Result<bool, Error> {
        let entry = self.subscriptions.reserve(topic)?;
        let response = self.at.send(&MqttSubscribe {
            topic,
            qos: QoS::AtLeastOnce,
        })?;
        self.subscriptions.push(entry, handler)?;
        Ok(response.is_ok())
    }

    /// Read a push frame and hand it to the matching subscriptions.
    ///
    /// Call whenever the serial channel receives a `+` byte. Returns the
    /// number of handlers invoked.
    pub fn handle_push(&mut self) -> Result<usize, Error> {
        self.at.pause(module_timing::push_frame_wait());
        let frame = self.at.drain()?;
        Ok(self.subscriptions.dispatch(frame.as_str()))
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.subscriptions.contains(topic)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
