//! Provide a serial interface for the MC1000A.

use std::time::Duration;

use instrumentrs::{Instrument, InstrumentError, SerialInterface};
use serialport::{SerialPort, SerialPortBuilder};

/// Baud rate of the MC1000A's RS-232 port.
pub const BAUD_RATE: u32 = 19200;

/// Read timeout for every status screen.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// A SerialInterface for the MC1000A.
///
/// Builds an InstrumentRs serial interface with the baud rate and the read timeout the
/// MC1000A driver expects. Data bits, parity, stop bits, and flow control are left at the
/// [`serialport`] defaults (8N1, no flow control), which is what the instrument uses.
#[derive(Debug)]
pub struct SerialInterfaceMc1000a {}

impl SerialInterfaceMc1000a {
    /// Try to create an Instrument interface with the MC1000A serial configuration.
    ///
    /// This is analog to the `simple` method of the `SerialInterface` struct in `InstrumentRs`,
    /// however, it sets the baud rate to 19200 and the read timeout to one second.
    ///
    /// Arguments:
    /// * `port` - The name of the serial port, e.g., `"/dev/ttyUSB0"` or `"COM3"`.
    pub fn simple(port: &str) -> Result<Instrument<Box<dyn SerialPort>>, InstrumentError> {
        SerialInterface::full(Self::builder(port))
    }

    /// Get the serial port builder with the MC1000A settings, in case your adapter needs further
    /// adjustments before opening it with [`SerialInterface::full`].
    ///
    /// Arguments:
    /// * `port` - The name of the serial port.
    pub fn builder(port: &str) -> SerialPortBuilder {
        serialport::new(port, BAUD_RATE).timeout(READ_TIMEOUT)
    }
}
