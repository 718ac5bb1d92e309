//! InstrumentRs: Talk to your (scientific) equipment from with Rust
//!
//! The InstrumentRs library provides standardized interfaces to talk to scientific equipment via
//! various different ports. To do so, it provides an [`InstrumentInterface`] trait and its
//! implementations. Furthermore, we also provide an [`InstrumentError`] error type that instrument
//! drivers should return.
//!
//! This flavor of the library is geared towards instruments that do not speak a line based
//! protocol, but instead present a terminal screen: the host types keystrokes, the instrument
//! redraws its screen, and the driver reads whatever arrives within a byte budget and a timeout.
//! Many of these instruments cannot absorb a whole command at once, which is why the
//! [`InstrumentInterface::write_paced`] primitive sends one character at a time with a pause
//! after each one. The pause itself goes through a [`Sleeper`], such that tests can record the
//! pacing instead of actually waiting.
//!
//! # Currently implemented interfaces are:
//! - Serial (blocking) using the [`serialport`] crate, enabled with the `serial` feature.
//! - Any type that implements [`std::io::Read`] and [`std::io::Write`] via [`Instrument`].
//! - A scripted [`LoopbackInterface`] to test your instrument driver.
//!
//! # Logging
//!
//! InstrumentRs emits records through the [`log`] facade: every write and read is logged on the
//! `debug` level, pauses on the `trace` level. No logger is installed by the library itself.
//!
//! # License
//!
//! Licensed under either of
//!
//! - Apache License, Version 2.0 ([LICENSE-APACHE](http://www.apache.org/licenses/LICENSE-2.0))
//! - MIT license ([LICENSE-MIT](http://opensource.org/licenses/MIT))
//!
//! at your option.
//!
//! # Contribution
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![warn(missing_docs)]

mod instrument;
mod loopback;
mod pacing;
#[cfg(feature = "serial")]
mod serial;

pub use instrument::{Instrument, InstrumentError};
pub use loopback::LoopbackInterface;
pub use pacing::{RecordingSleeper, Sleeper, ThreadSleeper};
#[cfg(feature = "serial")]
pub use serial::SerialInterface;

use std::time::Duration;

use log::{debug, trace, warn};

/// The `InstrumentInterface` trait defines the interface for controlling instruments.
///
/// Implementors only have to provide a way to write raw bytes and a way to read whatever the
/// instrument sends back within a byte budget. Text handling and paced writing are provided on
/// top of these two methods.
pub trait InstrumentInterface {
    /// Write raw bytes to the instrument and flush the interface.
    ///
    /// # Arguments:
    /// - `data` - The bytes to write.
    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError>;

    /// Read from the instrument until `budget` bytes have been received or the timeout elapsed.
    ///
    /// A timeout is not an error: whatever was received up to then is returned, which might be
    /// nothing at all.
    ///
    /// # Arguments:
    /// - `budget` - Maximum number of bytes to read.
    fn read_budget(&mut self, budget: usize) -> Result<Vec<u8>, InstrumentError>;

    /// Get the read timeout of the interface.
    ///
    /// The default implementation returns three seconds.
    fn get_timeout(&self) -> Duration {
        Duration::from_secs(3)
    }

    /// Write a string slice to the instrument as is, without any terminator.
    fn write(&mut self, data: &str) -> Result<(), InstrumentError> {
        self.write_raw(data.as_bytes())
    }

    /// Read up to `budget` bytes and decode them as text.
    ///
    /// Invalid UTF-8 sequences are replaced by `U+FFFD` and reported as a warning.
    fn read_text(&mut self, budget: usize) -> Result<String, InstrumentError> {
        let bytes = self.read_budget(budget)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!("Received invalid UTF-8 data: {:?}", err.as_bytes());
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            }
        }
    }

    /// Write a string one character at a time, pausing after every character.
    ///
    /// Every character goes out as its own write and is followed by `pause` on the given
    /// `sleeper`. Sending `"I2\r"` therefore results in `I`, pause, `2`, pause, `\r`, pause.
    ///
    /// # Arguments:
    /// - `data` - The characters to send.
    /// - `pause` - Pause after each character.
    /// - `sleeper` - The clock that performs the pause.
    fn write_paced(
        &mut self,
        data: &str,
        pause: Duration,
        sleeper: &mut dyn Sleeper,
    ) -> Result<(), InstrumentError> {
        debug!("Paced write of {data:?} with {pause:?} between characters");
        let mut buf = [0u8; 4];
        for ch in data.chars() {
            self.write_raw(ch.encode_utf8(&mut buf).as_bytes())?;
            trace!("Pausing {pause:?} after {ch:?}");
            sleeper.sleep(pause);
        }
        Ok(())
    }
}
