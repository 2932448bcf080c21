//! Scripted serial link and simulated clock shared by the unit tests.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
    string::String,
    vec::Vec,
};

use embedded_hal::delay::DelayNs;

use crate::{error::Error, traits::Transport};

/// Simulated time after which a test is considered stuck in a poll loop
const RUNAWAY_NS: u64 = 3_600 * 1_000_000_000;

#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u64>>);

impl SimClock {
    pub fn now_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }

    fn now_ns(&self) -> u64 {
        self.0.get()
    }

    fn advance_ns(&self, ns: u64) {
        self.0.set(self.0.get() + ns);
    }
}

/// Delay provider that only moves the simulated clock forward
pub struct MockDelay {
    clock: SimClock,
}

impl MockDelay {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.clock.advance_ns(u64::from(us) * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.advance_ns(u64::from(ms) * 1_000_000);
    }
}

/// One scripted reply: byte segments, each released `ms` after the command
/// was written
type Reply = Vec<(u64, Vec<u8>)>;

struct Rule {
    prefix: String,
    replies: VecDeque<Reply>,
}

#[derive(Default)]
struct Inner {
    clock: SimClock,
    rules: Vec<Rule>,
    pending: VecDeque<(u64, Vec<u8>)>,
    sent: Vec<(String, bool)>,
    diagnostics: String,
    broken_diagnostics: bool,
}

/// Scripted [`Transport`].
///
/// Every written command is matched against the rule with the longest
/// matching prefix. A rule's replies are consumed in order and the last one
/// repeats forever. Commands without a rule get no reply at all.
#[derive(Clone, Default)]
pub struct MockSerial(Rc<RefCell<Inner>>);

impl MockSerial {
    pub fn new(clock: &SimClock) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            clock: clock.clone(),
            ..Inner::default()
        })))
    }

    /// Answer every command starting with `prefix` with `reply`
    pub fn on(&self, prefix: &str, reply: &str) -> &Self {
        self.on_seq(prefix, &[reply])
    }

    /// Answer consecutive commands starting with `prefix` with `replies`
    pub fn on_seq(&self, prefix: &str, replies: &[&str]) -> &Self {
        let replies = replies
            .iter()
            .map(|r| std::vec![(0, r.as_bytes().to_vec())])
            .collect();
        self.push_rule(prefix, replies);
        self
    }

    /// Answer commands starting with `prefix` with segments released over time
    pub fn on_timed(&self, prefix: &str, segments: &[(u64, &str)]) -> &Self {
        let reply = segments
            .iter()
            .map(|(ms, text)| (*ms, text.as_bytes().to_vec()))
            .collect();
        self.push_rule(prefix, VecDeque::from(std::vec![reply]));
        self
    }

    /// Answer every command starting with `prefix` with raw bytes
    pub fn on_bytes(&self, prefix: &str, reply: &[u8]) -> &Self {
        self.push_rule(prefix, VecDeque::from(std::vec![std::vec![(0, reply.to_vec())]]));
        self
    }

    /// Make every diagnostic write fail
    pub fn break_diagnostics(&self) {
        self.0.borrow_mut().broken_diagnostics = true;
    }

    fn push_rule(&self, prefix: &str, replies: VecDeque<Reply>) {
        let mut inner = self.0.borrow_mut();
        inner.rules.retain(|r| r.prefix != prefix);
        inner.rules.push(Rule {
            prefix: String::from(prefix),
            replies,
        });
    }

    /// Make unsolicited bytes available right away
    pub fn inject(&self, text: &str) {
        let mut inner = self.0.borrow_mut();
        let now = inner.clock.now_ns();
        inner.pending.push_back((now, text.as_bytes().to_vec()));
    }

    /// Everything written to the modem, in order, without line terminators
    pub fn sent(&self) -> Vec<String> {
        self.0.borrow().sent.iter().map(|(s, _)| s.clone()).collect()
    }

    /// Line termination flag of every write, in order
    pub fn newlines(&self) -> Vec<bool> {
        self.0.borrow().sent.iter().map(|(_, nl)| *nl).collect()
    }

    /// Number of writes starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.0
            .borrow()
            .sent
            .iter()
            .filter(|(s, _)| s.starts_with(prefix))
            .count()
    }

    pub fn diagnostics(&self) -> String {
        self.0.borrow().diagnostics.clone()
    }

    fn record(&self, text: &str, newline: bool) {
        let mut inner = self.0.borrow_mut();
        let now = inner.clock.now_ns();
        inner.sent.push((String::from(text), newline));

        let reply = inner
            .rules
            .iter_mut()
            .filter(|r| text.starts_with(r.prefix.as_str()))
            .max_by_key(|r| r.prefix.len())
            .and_then(|rule| {
                if rule.replies.len() > 1 {
                    rule.replies.pop_front()
                } else {
                    rule.replies.front().cloned()
                }
            });

        for (ms, segment) in reply.unwrap_or_default() {
            inner
                .pending
                .push_back((now + ms * 1_000_000, segment));
        }
    }
}

impl Transport for MockSerial {
    fn write_line(&mut self, text: &str) -> Result<(), Error> {
        self.record(text, true);
        Ok(())
    }

    fn write_raw(&mut self, text: &str) -> Result<(), Error> {
        self.record(text, false);
        Ok(())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut inner = self.0.borrow_mut();
        let now = inner.clock.now_ns();
        assert!(now < RUNAWAY_NS, "mock serial: simulated clock ran away");

        let mut n = 0;
        while n < buf.len() {
            let Some((due, bytes)) = inner.pending.front_mut() else {
                break;
            };
            if *due > now {
                break;
            }
            let take = bytes.len().min(buf.len() - n);
            buf[n..n + take].copy_from_slice(&bytes[..take]);
            bytes.drain(..take);
            n += take;
            if bytes.is_empty() {
                inner.pending.pop_front();
            }
        }
        Ok(n)
    }

    fn write_diagnostic(&mut self, text: &str) -> Result<(), Error> {
        let mut inner = self.0.borrow_mut();
        if inner.broken_diagnostics {
            return Err(Error::Io(embedded_io::ErrorKind::Other));
        }
        inner.diagnostics.push_str(text);
        Ok(())
    }
}
