//! Raw command responses and the line tokenizer used to classify them.

use heapless::Vec;

use crate::error::Error;

/// Maximum number of bytes accumulated for a single response
pub const RESPONSE_CAPACITY: usize = 512;

/// Final result code of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultCode {
    Ok,
    /// `ERROR`, `+CME ERROR: ..` or `+CMS ERROR: ..`
    Error,
}

/// Everything the modem sent back for one command.
///
/// The text is kept as received, minus byte sequences that are not valid
/// UTF-8 (line noise). Classification goes through
/// [`Response::result`], which only looks at whole lines, so a token inside a
/// quoted payload does not count as a result code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    raw: Vec<u8, RESPONSE_CAPACITY>,
    /// Bytes before this index are valid UTF-8
    checked: usize,
}

impl Response {
    pub const fn new() -> Self {
        Self {
            raw: Vec::new(),
            checked: 0,
        }
    }

    pub(crate) fn extend(&mut self, chunk: &[u8]) -> Result<(), Error> {
        self.raw
            .extend_from_slice(chunk)
            .map_err(|_| Error::Overflow)?;
        self.drop_invalid();
        Ok(())
    }

    /// Remove invalid sequences from the unchecked tail. A sequence cut short
    /// by the end of the buffer stays until the next chunk completes it.
    fn drop_invalid(&mut self) {
        loop {
            match core::str::from_utf8(&self.raw[self.checked..]) {
                Ok(_) => {
                    self.checked = self.raw.len();
                    return;
                }
                Err(e) => {
                    let at = self.checked + e.valid_up_to();
                    self.checked = at;
                    let Some(len) = e.error_len() else {
                        return;
                    };
                    trace!("Dropping {} invalid byte(s)", len);
                    let end = self.raw.len();
                    self.raw.copy_within(at + len..end, at);
                    self.raw.truncate(end - len);
                }
            }
        }
    }

    /// The accumulated text, without a trailing incomplete sequence
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.raw) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&self.raw[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.as_str().contains(pattern)
    }

    /// Raw substring check used to stop accumulating
    pub(crate) fn has_terminal_token(&self) -> bool {
        self.raw.windows(2).any(|w| w == b"OK") || self.raw.windows(5).any(|w| w == b"ERROR")
    }

    /// Non-empty lines with surrounding whitespace removed
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.as_str()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// The first well-formed final result line, if any
    pub fn result(&self) -> Option<ResultCode> {
        self.lines().find_map(|line| match line {
            "OK" => Some(ResultCode::Ok),
            "ERROR" => Some(ResultCode::Error),
            l if l.starts_with("+CME ERROR") || l.starts_with("+CMS ERROR") => {
                Some(ResultCode::Error)
            }
            _ => None,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.result() == Some(ResultCode::Ok)
    }

    pub fn is_error(&self) -> bool {
        self.result() == Some(ResultCode::Error)
    }

    /// Body of the first information line starting with `prefix`, e.g.
    /// `info_line("+CSQ:")` yields `"15,0"` for `+CSQ: 15,0`
    pub fn info_line(&self, prefix: &str) -> Option<&str> {
        self.lines()
            .find_map(|line| line.strip_prefix(prefix))
            .map(str::trim_start)
    }

    /// Whether any line reports `status`, with or without the leading `+`
    pub fn has_status(&self, status: &str) -> bool {
        self.lines()
            .any(|line| line.trim_start_matches('+').starts_with(status))
    }
}
