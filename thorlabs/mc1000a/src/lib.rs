//! A rust driver for the Thorlabs MC1000A optical chopper.
//!
//! The MC1000A is controlled via its RS-232 terminal: the host sends keystrokes and the
//! instrument redraws a status screen. This driver sends those keystrokes and scrapes the
//! rotation state and the chopping rate from the screen.
//!
//! Note that the chopping rate is the rate at which the slits of the chopper wheel pass the
//! beam, in Hz. It is not the rotation rate of the motor axle.
//!
//! # Example
//!
//! This example shows the usage of the MC1000A driver with a serial connection.
//!
//! ```no_run
//! use thorlabs_mc1000a::Mc1000a;
//!
//! let mut chopper = Mc1000a::open("/dev/ttyUSB0", false).unwrap();
//!
//! chopper.set_spin_rate(250).unwrap();
//! chopper.start_spin().unwrap();
//! println!("Chopping at {} Hz", chopper.get_spin_rate().unwrap());
//!
//! chopper.stop_spin().unwrap();
//! chopper.close();
//!```
//!
//! # Single writer
//!
//! The instrument has exactly one terminal and every query is a write followed by a read of the
//! screen. An interleaved write from somebody else ends up in the middle of that exchange. All
//! methods therefore take `&mut self`. To share a chopper between threads, put it into a
//! [`std::sync::Mutex`] and keep the guard for as long as an exchange must not be interrupted.
//! `start_spin` and `stop_spin` check the state and then toggle it: with the guard held, no
//! other thread can get in between. Somebody pressing the buttons on the front panel still can.

#![deny(warnings, missing_docs)]

mod interface;
mod observer;
pub mod screen;
mod simulator;

pub use interface::{BAUD_RATE, READ_TIMEOUT, SerialInterfaceMc1000a};
pub use observer::{LogObserver, StdoutObserver, TerminalObserver};
pub use screen::SpinState;
pub use simulator::{Mc1000aSimulator, render_screen};

use std::time::Duration;

use instrumentrs::{Instrument, InstrumentError, InstrumentInterface, Sleeper, ThreadSleeper};
use log::debug;
use measurements::Frequency;
use serialport::SerialPort;

/// Maximum number of bytes read for one status screen.
pub const READ_BUDGET: usize = 1000;

/// Default pause between two characters sent to the instrument.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(500);

/// Lowest chopping rate in Hz that can be set.
pub const MIN_SPIN_RATE: u32 = 20;

/// Highest chopping rate in Hz that can be set.
pub const MAX_SPIN_RATE: u32 = 1000;

/// A rust driver for the MC1000A.
///
/// The driver owns its interface. Dropping the driver or calling [`Mc1000a::close`] closes it.
///
/// # Example
///
/// Any interface that implements [`InstrumentInterface`] can be used, for example the
/// [`Mc1000aSimulator`]:
///
/// ```
/// use std::time::Duration;
/// use thorlabs_mc1000a::{Mc1000a, Mc1000aSimulator};
///
/// let mut chopper = Mc1000a::new(Mc1000aSimulator::new(false, 100), false);
/// chopper.set_pause_time(Duration::ZERO);
///
/// chopper.set_spin_rate(400).unwrap();
/// chopper.start_spin().unwrap();
///
/// assert!(chopper.is_spinning().unwrap());
/// assert_eq!(chopper.get_spin_rate().unwrap(), 400);
/// ```
pub struct Mc1000a<T: InstrumentInterface> {
    interface: T,
    verbose: bool,
    pause_time: Duration,
    sleeper: Box<dyn Sleeper + Send>,
    observer: Box<dyn TerminalObserver + Send>,
}

impl Mc1000a<Instrument<Box<dyn SerialPort>>> {
    /// Open the MC1000A on the given serial port.
    ///
    /// The port is opened with 19200 baud and a read timeout of one second. Fails with
    /// [`InstrumentError::Serialport`] if the port cannot be opened.
    ///
    /// # Arguments
    /// * `port` - The name of the serial port, e.g., `"/dev/ttyUSB0"` or `"COM3"`.
    /// * `verbose` - Echo every status screen to the terminal observer.
    pub fn open(port: &str, verbose: bool) -> Result<Self, InstrumentError> {
        let interface = SerialInterfaceMc1000a::simple(port)?;
        Ok(Self::new(interface, verbose))
    }
}

impl<T: InstrumentInterface> Mc1000a<T> {
    /// Create a new MC1000A instance with the given instrument interface.
    ///
    /// Status screens are echoed to a [`LogObserver`] if `verbose` is set. Pauses between
    /// characters are [`DEFAULT_PAUSE`] long and actually block the thread.
    ///
    /// # Arguments
    /// * `interface` - An instrument interface that implements the [`InstrumentInterface`] trait.
    /// * `verbose` - Echo every status screen to the terminal observer.
    pub fn new(interface: T, verbose: bool) -> Self {
        Mc1000a {
            interface,
            verbose,
            pause_time: DEFAULT_PAUSE,
            sleeper: Box::new(ThreadSleeper),
            observer: Box::new(LogObserver),
        }
    }

    /// Close the connection to the instrument.
    pub fn close(self) {
        debug!("Closing MC1000A interface");
    }

    /// Hand back the interface without closing it.
    pub fn into_interface(self) -> T {
        self.interface
    }

    /// Are status screens echoed to the observer?
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Turn echoing of status screens on or off.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Get the pause between two characters sent to the instrument.
    pub fn get_pause_time(&self) -> Duration {
        self.pause_time
    }

    /// Set the pause between two characters sent to the instrument.
    ///
    /// The instrument cannot take in a whole command at once. Shorter pauses than the default
    /// may work, but are not guaranteed to.
    pub fn set_pause_time(&mut self, pause_time: Duration) {
        self.pause_time = pause_time;
    }

    /// Replace the clock that performs the pauses, e.g., with a
    /// [`instrumentrs::RecordingSleeper`] in tests.
    pub fn set_sleeper<S: Sleeper + Send + 'static>(&mut self, sleeper: S) {
        self.sleeper = Box::new(sleeper);
    }

    /// Replace the observer that receives echoed status screens.
    pub fn set_observer<O: TerminalObserver + Send + 'static>(&mut self, observer: O) {
        self.observer = Box::new(observer);
    }

    /// Request the status screen and return it as is.
    ///
    /// The screen is echoed to the observer if verbose.
    pub fn query_status(&mut self) -> Result<String, InstrumentError> {
        self.interface.write("\r")?;
        self.read_screen()
    }

    /// Request the status screen and hand it to the observer, regardless of verbosity.
    pub fn print_terminal(&mut self) -> Result<(), InstrumentError> {
        self.interface.write("\r")?;
        let screen = self.interface.read_text(READ_BUDGET)?;
        self.observer.observe(&screen);
        Ok(())
    }

    /// Toggle the rotation of the chopper wheel.
    ///
    /// The resulting state is not checked.
    pub fn toggle_spin(&mut self) -> Result<(), InstrumentError> {
        self.interface.write("R")?;
        self.read_screen()?;
        Ok(())
    }

    /// Start the chopper wheel if it is not spinning yet. Does nothing otherwise.
    pub fn start_spin(&mut self) -> Result<(), InstrumentError> {
        if !self.is_spinning()? {
            self.toggle_spin()?;
        }
        Ok(())
    }

    /// Stop the chopper wheel if it is spinning. Does nothing otherwise.
    pub fn stop_spin(&mut self) -> Result<(), InstrumentError> {
        if self.is_spinning()? {
            self.toggle_spin()?;
        }
        Ok(())
    }

    /// Is the chopper wheel spinning?
    pub fn is_spinning(&mut self) -> Result<bool, InstrumentError> {
        Ok(self.get_spin_state()? == SpinState::Spinning)
    }

    /// Get the rotation state of the chopper wheel.
    pub fn get_spin_state(&mut self) -> Result<SpinState, InstrumentError> {
        let screen = self.query_parsable_status()?;
        screen::parse_spin_state(&screen)
    }

    /// Get the chopping rate in Hz.
    ///
    /// This is the rate of the chopper wheel slits passing the beam, not the rotation rate of
    /// the motor axle.
    pub fn get_spin_rate(&mut self) -> Result<u32, InstrumentError> {
        let screen = self.query_parsable_status()?;
        screen::parse_spin_rate(&screen)
    }

    /// Get the chopping rate as a frequency.
    ///
    /// Same as [`Mc1000a::get_spin_rate`], i.e., the rate of the wheel slits.
    pub fn get_chopping_frequency(&mut self) -> Result<Frequency, InstrumentError> {
        Ok(Frequency::from_hertz(f64::from(self.get_spin_rate()?)))
    }

    /// Set the chopping rate in Hz.
    ///
    /// The rate is typed in like on the keypad: `I`, then the digits, then `\r`, pausing after
    /// every character. Nothing is sent if the rate is out of range.
    ///
    /// # Arguments
    /// * `value` - Chopping rate of the wheel slits in Hz, between [`MIN_SPIN_RATE`] and
    ///   [`MAX_SPIN_RATE`].
    pub fn set_spin_rate(&mut self, value: u32) -> Result<(), InstrumentError> {
        if !(MIN_SPIN_RATE..=MAX_SPIN_RATE).contains(&value) {
            return Err(InstrumentError::IntValueOutOfRange {
                value: i64::from(value),
                min: i64::from(MIN_SPIN_RATE),
                max: i64::from(MAX_SPIN_RATE),
            });
        }
        let cmd = format!("I{value}\r");
        self.interface
            .write_paced(&cmd, self.pause_time, self.sleeper.as_mut())?;
        self.read_screen()?;
        Ok(())
    }

    /// Write a message to the instrument character by character.
    ///
    /// Every character is preceded by a pause and one more pause follows the last one. No
    /// validation happens. If verbose, the resulting status screen is echoed.
    ///
    /// # Arguments
    /// * `message` - Keystrokes to send.
    pub fn write_raw(&mut self, message: &str) -> Result<(), InstrumentError> {
        self.sleeper.sleep(self.pause_time);
        self.interface
            .write_paced(message, self.pause_time, self.sleeper.as_mut())?;
        if self.verbose {
            self.query_status()?;
        }
        Ok(())
    }

    /// Read one status screen and echo it if verbose.
    fn read_screen(&mut self) -> Result<String, InstrumentError> {
        let screen = self.interface.read_text(READ_BUDGET)?;
        debug!("Received status screen with {} bytes", screen.len());
        if self.verbose {
            self.observer.observe(&screen);
        }
        Ok(screen)
    }

    /// Request the status screen for parsing. A screen that never arrived is a timeout.
    fn query_parsable_status(&mut self) -> Result<String, InstrumentError> {
        let screen = self.query_status()?;
        if screen.is_empty() {
            return Err(InstrumentError::Timeout(self.interface.get_timeout()));
        }
        Ok(screen)
    }
}
