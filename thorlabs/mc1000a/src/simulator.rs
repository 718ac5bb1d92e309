//! A simulated MC1000A to test code that drives a chopper without having one at hand.

use instrumentrs::{InstrumentError, InstrumentInterface};

use crate::{MAX_SPIN_RATE, MIN_SPIN_RATE};

/// Render the status screen of an MC1000A with the given state.
///
/// The rotation state sits on the 10th and the chopping rate on the 7th line from the end, both
/// followed by one padding character, which is where [`crate::screen`] expects them.
pub fn render_screen(spinning: bool, rate: u32) -> String {
    let enable = if spinning { " On" } else { "Off" };
    [
        "THORLABS MC1000A Optical Chopper".to_string(),
        "--------------------------------".to_string(),
        "Blade:              MC1F10 ".to_string(),
        "Reference:             Int ".to_string(),
        format!("Enable:                {enable} "),
        "Ref Out:            Target ".to_string(),
        "Ext Freq (Hz):          0 ".to_string(),
        format!("Int Freq (Hz):       {rate:>4} "),
        "Harmonic N:             1 ".to_string(),
        "Subharmonic D:          1 ".to_string(),
        "Phase (deg):            0 ".to_string(),
        "--------------------------------".to_string(),
        "R: Run/Stop   I: Int Freq ".to_string(),
        "> ".to_string(),
    ]
    .join("\r\n")
}

/// Where the simulated keypad currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Idle,
    Frequency(String),
}

/// A simulated MC1000A that implements [`InstrumentInterface`].
///
/// The simulator understands the keystrokes the driver uses:
/// - `\r` redraws the screen,
/// - `R` toggles the rotation and redraws the screen,
/// - `I`, followed by digits and `\r`, sets the internal frequency. Values outside of the
///   allowed range are ignored, just like on the front panel.
///
/// Every keystroke makes a redrawn screen available for the next read. Reading without a pending
/// screen returns nothing, which is what a timed out read looks like. All writes are recorded and
/// can be inspected with [`Mc1000aSimulator::writes`].
#[derive(Debug, Clone)]
pub struct Mc1000aSimulator {
    spinning: bool,
    rate: u32,
    entry: Entry,
    redraw: bool,
    writes: Vec<Vec<u8>>,
}

impl Default for Mc1000aSimulator {
    fn default() -> Self {
        Self::new(false, 100)
    }
}

impl Mc1000aSimulator {
    /// Create a simulator with a given rotation state and chopping rate in Hz.
    pub fn new(spinning: bool, rate: u32) -> Self {
        Self {
            spinning,
            rate,
            entry: Entry::Idle,
            redraw: false,
            writes: Vec::new(),
        }
    }

    /// Is the simulated wheel spinning?
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// The simulated chopping rate in Hz.
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// All writes the simulator received, one entry per write call.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// All written bytes, concatenated.
    pub fn written_bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }

    fn keystroke(&mut self, key: u8) {
        self.redraw = true;
        let entry = std::mem::replace(&mut self.entry, Entry::Idle);
        match (entry, key) {
            (Entry::Idle, b'R') => self.spinning = !self.spinning,
            (Entry::Idle, b'I') => self.entry = Entry::Frequency(String::new()),
            (Entry::Frequency(mut digits), key) if key.is_ascii_digit() => {
                digits.push(char::from(key));
                self.entry = Entry::Frequency(digits);
            }
            (Entry::Frequency(digits), b'\r') => {
                if let Ok(rate) = digits.parse::<u32>() {
                    if (MIN_SPIN_RATE..=MAX_SPIN_RATE).contains(&rate) {
                        self.rate = rate;
                    }
                }
            }
            _ => {}
        }
    }
}

impl InstrumentInterface for Mc1000aSimulator {
    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError> {
        self.writes.push(data.to_vec());
        for key in data {
            self.keystroke(*key);
        }
        Ok(())
    }

    fn read_budget(&mut self, budget: usize) -> Result<Vec<u8>, InstrumentError> {
        if !self.redraw {
            return Ok(Vec::new());
        }
        self.redraw = false;
        let mut screen = render_screen(self.spinning, self.rate).into_bytes();
        screen.truncate(budget);
        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{SpinState, parse_spin_rate, parse_spin_state};

    #[test]
    fn test_rendered_screen_parses() {
        for (spinning, rate, state) in [
            (true, 20, SpinState::Spinning),
            (false, 250, SpinState::Stopped),
            (true, 1000, SpinState::Spinning),
        ] {
            let screen = render_screen(spinning, rate);
            assert_eq!(parse_spin_state(&screen).unwrap(), state);
            assert_eq!(parse_spin_rate(&screen).unwrap(), rate);
        }
    }

    #[test]
    fn test_keystrokes() {
        let mut sim = Mc1000aSimulator::default();
        sim.write("R").unwrap();
        assert!(sim.is_spinning());

        sim.write("I500\r").unwrap();
        assert_eq!(sim.rate(), 500);

        // out of range values are ignored
        sim.write("I5\r").unwrap();
        assert_eq!(sim.rate(), 500);

        // R while entering a frequency aborts the entry without toggling
        sim.write("I3R").unwrap();
        assert!(sim.is_spinning());
        assert_eq!(sim.rate(), 500);
    }

    #[test]
    fn test_read_only_after_keystroke() {
        let mut sim = Mc1000aSimulator::default();
        assert!(sim.read_budget(1000).unwrap().is_empty());

        sim.write("\r").unwrap();
        assert_eq!(
            sim.read_text(1000).unwrap(),
            render_screen(false, 100)
        );
        assert!(sim.read_budget(1000).unwrap().is_empty());
    }
}
