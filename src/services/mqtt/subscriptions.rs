//! Topic table and dispatch of `+SMSUB` push frames.

use heapless::{String, Vec};

use crate::error::{Error, GenericError};

/// Maximum number of topics that can be subscribed at once
pub const MAX_SUBSCRIPTIONS: usize = 8;

/// Maximum length of a subscribed topic
pub const TOPIC_CAPACITY: usize = 128;

/// Invoked with `(topic, payload)` for every delivery matching its topic
pub type Handler<'a> = &'a mut dyn FnMut(&str, &str);

/// Marker of a subscription delivery frame
const PUSH_STATUS: &str = "SMSUB:";

/// Separator between the quoted topic and the quoted payload
const FIELD_SEPARATOR: &str = "\",\"";

/// Trailing `"` and line break after the payload
const PAYLOAD_SUFFIX_CHARS: usize = 3;

struct Subscription<'a> {
    topic: String<TOPIC_CAPACITY>,
    handler: Handler<'a>,
}

/// Subscribed topics in insertion order
pub struct Subscriptions<'a> {
    entries: Vec<Subscription<'a>, MAX_SUBSCRIPTIONS>,
}

impl Default for Subscriptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Subscriptions<'a> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.entries.iter().any(|s| s.topic == topic)
    }

    /// Check that `topic` can be added, before anything is sent to the modem
    pub(crate) fn reserve(&self, topic: &str) -> Result<String<TOPIC_CAPACITY>, Error> {
        if self.entries.is_full() {
            return Err(Error::SubscriptionTableFull);
        }
        String::try_from(topic).map_err(|_| Error::Generic(GenericError::Format))
    }

    pub(crate) fn push(
        &mut self,
        topic: String<TOPIC_CAPACITY>,
        handler: Handler<'a>,
    ) -> Result<(), Error> {
        self.entries
            .push(Subscription { topic, handler })
            .map_err(|_| Error::SubscriptionTableFull)
    }

    /// Hand a push frame to every subscription whose topic occurs in it.
    ///
    /// Everything before the first `+` is ignored. Returns the number of
    /// handlers invoked.
    pub fn dispatch(&mut self, frame: &str) -> usize {
        let Some(start) = frame.find('+') else {
            return 0;
        };
        let frame = &frame[start..];
        if !frame.contains(PUSH_STATUS) {
            return 0;
        }
        let Some(payload) = payload(frame) else {
            warn!("Push frame without payload field");
            return 0;
        };

        let mut calls = 0;
        for entry in self.entries.iter_mut() {
            if frame.contains(entry.topic.as_str()) {
                trace!("Delivering to {:?}", entry.topic.as_str());
                (entry.handler)(entry.topic.as_str(), payload);
                calls += 1;
            }
        }
        calls
    }
}

/// Text after the first `","`, without the trailing `"\r\n`
fn payload(frame: &str) -> Option<&str> {
    let field = frame.split(FIELD_SEPARATOR).nth(1)?;
    let end = field
        .char_indices()
        .rev()
        .nth(PAYLOAD_SUFFIX_CHARS - 1)
        .map_or(0, |(i, _)| i);
    Some(&field[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    type Seen = RefCell<std::vec::Vec<(std::string::String, std::string::String)>>;

    fn recorder(seen: &Seen) -> impl FnMut(&str, &str) + '_ {
        move |topic, payload| {
            seen.borrow_mut()
                .push((topic.to_string(), payload.to_string()))
        }
    }

    fn add<'a>(subs: &mut Subscriptions<'a>, topic: &str, handler: Handler<'a>) {
        let topic = subs.reserve(topic).unwrap();
        subs.push(topic, handler).unwrap();
    }

    #[test]
    fn every_matching_topic_is_notified() {
        let seen = Seen::default();
        let mut on_parent = recorder(&seen);
        let mut on_child = recorder(&seen);
        let mut on_other = recorder(&seen);

        let mut subs = Subscriptions::new();
        add(&mut subs, "a/b", &mut on_parent);
        add(&mut subs, "a/b/c", &mut on_child);
        add(&mut subs, "x/y", &mut on_other);

        let calls = subs.dispatch("\r\n+SMSUB: \"a/b/c\",\"21.5\"\r\n");

        assert_eq!(calls, 2);
        assert_eq!(
            *seen.borrow(),
            [
                ("a/b".to_string(), "21.5".to_string()),
                ("a/b/c".to_string(), "21.5".to_string()),
            ]
        );
    }

    #[test]
    fn other_push_frames_are_ignored() {
        let seen = Seen::default();
        let mut handler = recorder(&seen);
        let mut subs = Subscriptions::new();
        add(&mut subs, "a/b", &mut handler);

        assert_eq!(subs.dispatch("+SMSTATE: 0\r\n"), 0);
        assert_eq!(subs.dispatch("SMSUB: \"a/b\",\"1\"\r\n"), 0);
        assert_eq!(subs.dispatch("+SMSUB: \"a/b\"\r\n"), 0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn payload_keeps_inner_text() {
        assert_eq!(payload("+SMSUB: \"t\",\"on\"\r\n"), Some("on"));
        assert_eq!(payload("+SMSUB: \"t\",\"\"\r\n"), Some(""));
        assert_eq!(payload("+SMSUB: \"t\",\"a\""), Some(""));
        assert_eq!(payload("+SMSUB: \"t\",\"zażółć\"\r\n"), Some("zażółć"));
        assert_eq!(payload("+SMSUB: \"t\""), None);
    }

    #[test]
    fn table_is_bounded() {
        let mut handlers: std::vec::Vec<_> = (0..MAX_SUBSCRIPTIONS)
            .map(|_| |_: &str, _: &str| {})
            .collect();
        let mut subs = Subscriptions::new();
        for handler in handlers.iter_mut() {
            add(&mut subs, "t", handler);
        }

        assert_eq!(subs.len(), MAX_SUBSCRIPTIONS);
        assert_eq!(subs.reserve("u").err(), Some(Error::SubscriptionTableFull));
    }

    #[test]
    fn oversized_topic_is_rejected() {
        let subs = Subscriptions::new();
        let topic = "t".repeat(TOPIC_CAPACITY + 1);

        assert_eq!(
            subs.reserve(&topic).err(),
            Some(Error::Generic(GenericError::Format))
        );
    }
}
