//! This module provides the implementation for an instrument controlled via a serial port.
//!
//! It includes shortcuts that open a blocking [`serialport::SerialPort`] and wrap it into an
//! [`Instrument`].

use std::time::Duration;

use log::debug;
use serialport::{SerialPort, SerialPortBuilder};

use crate::{Instrument, InstrumentError};

/// Shortcuts to open a blocking serial port as an [`Instrument`].
#[derive(Debug)]
pub struct SerialInterface {}

impl SerialInterface {
    /// Try to open a serial port with the given name and baud rate.
    ///
    /// All other settings are the [`serialport`] defaults (8 data bits, no parity, one stop bit,
    /// no flow control). The read timeout is set to three seconds.
    ///
    /// # Arguments
    /// * `port` - The name of the serial port, e.g., `"/dev/ttyUSB0"` or `"COM3"`.
    /// * `baud` - The baud rate.
    pub fn simple(
        port: &str,
        baud: u32,
    ) -> Result<Instrument<Box<dyn SerialPort>>, InstrumentError> {
        let spb = serialport::new(port, baud).timeout(Duration::from_secs(3));
        Self::full(spb)
    }

    /// Try to open a serial port from a fully configured [`SerialPortBuilder`].
    ///
    /// The read timeout of the returned [`Instrument`] is taken from the builder.
    ///
    /// # Arguments
    /// * `spb` - A `SerialPortBuilder` to configure the serial port. See
    ///   [`serialport::SerialPortBuilder`] and the [`serialport::new`] function for more details.
    pub fn full(
        spb: SerialPortBuilder,
    ) -> Result<Instrument<Box<dyn SerialPort>>, InstrumentError> {
        let port = spb.open()?;
        let timeout = port.timeout();
        debug!(
            "Opened serial port {:?} at {:?} baud",
            port.name(),
            port.baud_rate().ok()
        );
        Ok(Instrument::new(port, timeout))
    }
}
