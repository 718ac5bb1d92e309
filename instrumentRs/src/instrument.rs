//! This module provides the main implementation for the Instrument Interface trait.
//!
//! It can be called with any type that implements [`std::io::Read`] and [`std::io::Write`],
//! such as a [`std::net::TcpStream`] or a boxed `serialport::SerialPort`.

use std::{
    io::ErrorKind,
    time::{Duration, Instant},
};

use log::debug;
use thiserror::Error;

use crate::InstrumentInterface;

/// Size of the chunks that are requested from the port in one read call.
const CHUNK_SIZE: usize = 64;

/// A general instrument interface that can be built with any interface that implements
/// [`std::io::Read`] and [`std::io::Write`].
///
/// Reading stops when the byte budget is filled, when the port reports a timeout or end of data,
/// or when the total time spent reading exceeds the timeout of this instrument.
///
/// The deadline is checked before every read of the port. A port read that starts just before
/// the deadline can still block for the port's own timeout, so a budgeted read takes at most the
/// instrument timeout plus one port timeout. Ports opened with [`crate::SerialInterface`] use the
/// same timeout for both, which bounds a read at twice the timeout.
///
/// # Example
///
/// ```no_run
/// use std::{net::TcpStream, time::Duration};
///
/// use instrumentrs::{Instrument, InstrumentInterface};
///
/// let my_interface = TcpStream::connect("192.168.10.1:8000").unwrap();
/// let mut inst_interface = Instrument::new(my_interface, Duration::from_secs(1));
/// inst_interface.write("\r").unwrap();
/// let screen = inst_interface.read_text(1000).unwrap();
/// ```
pub struct Instrument<P: std::io::Read + std::io::Write> {
    port: P,
    timeout: Duration,
}

impl<P: std::io::Read + std::io::Write> Instrument<P> {
    /// Create a new instance of [`Instrument`] with a given port and read timeout.
    pub fn new(port: P, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    /// Consume the instrument and hand back the port.
    pub fn into_inner(self) -> P {
        self.port
    }
}

impl<P: std::io::Read + std::io::Write> InstrumentInterface for Instrument<P> {
    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError> {
        self.port.write_all(data)?;
        self.port.flush()?;
        debug!("Wrote {data:?}");
        Ok(())
    }

    fn read_budget(&mut self, budget: usize) -> Result<Vec<u8>, InstrumentError> {
        let mut response = Vec::with_capacity(budget);
        let mut chunk = [0u8; CHUNK_SIZE];

        let tic = Instant::now();
        while response.len() < budget && tic.elapsed() < self.timeout {
            let want = (budget - response.len()).min(CHUNK_SIZE);
            match self.port.read(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => response.extend_from_slice(&chunk[..n]),
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    break;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        debug!(
            "Read {} of {budget} bytes in {:?}",
            response.len(),
            tic.elapsed()
        );
        Ok(response)
    }

    fn get_timeout(&self) -> Duration {
        self.timeout
    }
}

/// The error enum for all instruments.
///
/// For any command sending or querying, your instrument should return either an empty result or a
/// result with the query where this Error is the alternative. [`InstrumentError`] makes it easy to
/// propagate all the sending commands, querying errors forward with the `?` operator such that
/// errors propagate nicely. If this is not possible, it is considered a bug and should be
/// reported.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InstrumentError {
    /// A given integer value is out of the specified range. The error contains the value that was
    /// sent, the minimum value that is allowed, and the maximum value that is allowed.
    #[error("Integer value {value} is out of range. Allowed range is [{min}, {max}]")]
    IntValueOutOfRange {
        /// The value that is out of range.
        value: i64,
        /// The minimum value that is allowed.
        min: i64,
        /// The maximum value that is allowed.
        max: i64,
    },
    /// Error when reading from/writing to an interface. See [`std::io::Error`] for more details.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Instrument response could not be parsed becuase it was unexpected by the driver. This error
    /// contains the response that was received from the instrument.
    #[error("Response from instrument could not be parsed. {0}")]
    ResponseParseError(String),
    #[cfg(feature = "serial")]
    /// Serial port errors can occur when opening a serial interface. See the [`serialport::Error`]
    /// documentation for more information.
    #[error(transparent)]
    Serialport(#[from] serialport::Error),
    /// The instrument sent nothing at all within the timeout. The error contains the timeout that
    /// was exceeded.
    #[error(
        "Timeout occured while waiting for a response from the instrument. Timeout was set to {0:?}."
    )]
    Timeout(Duration),
}
