use embedded_io::{Error as _, ErrorType, Read, ReadReady, Write};

use crate::error::Error;

/// Byte level access to the modem's serial channel.
///
/// All methods are non-blocking from the driver's point of view: `read_available`
/// must return `Ok(0)` when nothing has been received yet.
pub trait Transport {
    /// Write `text` followed by a line break
    fn write_line(&mut self, text: &str) -> Result<(), Error>;

    /// Write `text` as is
    fn write_raw(&mut self, text: &str) -> Result<(), Error>;

    /// Copy whatever has been received so far into `buf`
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Write `text` to the diagnostic channel, if there is one
    fn write_diagnostic(&mut self, _text: &str) -> Result<(), Error> {
        Ok(())
    }
}

/// Diagnostic sink that drops everything
pub struct NoDiagnostics;

impl ErrorType for NoDiagnostics {
    type Error = core::convert::Infallible;
}

impl Write for NoDiagnostics {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// [`Transport`] over a blocking `embedded-io` UART.
///
/// The optional diagnostic writer takes the place of redirecting the serial
/// port to a debug console: every byte written there stays off the modem link.
pub struct SerialTransport<U, L = NoDiagnostics> {
    uart: U,
    diagnostic: Option<L>,
}

impl<U> SerialTransport<U, NoDiagnostics>
where
    U: Read + Write + ReadReady,
{
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            diagnostic: None,
        }
    }
}

impl<U, L> SerialTransport<U, L>
where
    U: Read + Write + ReadReady,
    L: Write,
{
    pub fn with_diagnostic(uart: U, diagnostic: L) -> Self {
        Self {
            uart,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn release(self) -> (U, Option<L>) {
        (self.uart, self.diagnostic)
    }
}

impl<U, L> Transport for SerialTransport<U, L>
where
    U: Read + Write + ReadReady,
    L: Write,
{
    fn write_line(&mut self, text: &str) -> Result<(), Error> {
        self.write_raw(text)?;
        self.write_raw("\r\n")
    }

    fn write_raw(&mut self, text: &str) -> Result<(), Error> {
        self.uart
            .write_all(text.as_bytes())
            .map_err(|e| Error::Io(e.kind()))?;
        self.uart.flush().map_err(|e| Error::Io(e.kind()))
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if !self.uart.read_ready().map_err(|e| Error::Io(e.kind()))? {
            return Ok(0);
        }
        self.uart.read(buf).map_err(|e| Error::Io(e.kind()))
    }

    fn write_diagnostic(&mut self, text: &str) -> Result<(), Error> {
        if let Some(diagnostic) = self.diagnostic.as_mut() {
            diagnostic
                .write_all(text.as_bytes())
                .map_err(|e| Error::Io(e.kind()))?;
        }
        Ok(())
    }
}
