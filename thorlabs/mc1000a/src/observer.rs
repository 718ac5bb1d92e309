//! Observers that get to see the raw terminal screen of the MC1000A.

use log::info;

/// Receives every raw status screen that the driver echoes.
///
/// Any closure that takes a `&str` is an observer, which makes it easy to collect screens in a
/// test or to forward them to your own user interface.
pub trait TerminalObserver {
    /// Called with the raw, decoded screen text.
    fn observe(&mut self, screen: &str);
}

impl<F: FnMut(&str)> TerminalObserver for F {
    fn observe(&mut self, screen: &str) {
        self(screen)
    }
}

/// Default observer: logs the screen on the `info` level with the target
/// `thorlabs_mc1000a::terminal`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl TerminalObserver for LogObserver {
    fn observe(&mut self, screen: &str) {
        info!(target: "thorlabs_mc1000a::terminal", "{screen}");
    }
}

/// Prints the screen to stdout, just like looking at the instrument's terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutObserver;

impl TerminalObserver for StdoutObserver {
    fn observe(&mut self, screen: &str) {
        println!("{screen}");
    }
}
