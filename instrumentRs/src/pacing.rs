//! Clocks used to pace writes to slow instruments.

use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

/// Something that can pause the current caller for a given duration.
///
/// [`ThreadSleeper`] actually blocks the thread, [`RecordingSleeper`] only writes down what it
/// was asked to do, which is what you want in tests.
pub trait Sleeper {
    /// Pause for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// A [`Sleeper`] that blocks the current thread using [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// A [`Sleeper`] that never blocks, but records every requested pause.
///
/// Clones share the same record, so you can hand one clone to your driver and keep another one
/// in your test to inspect the pauses afterwards.
///
/// ```
/// use std::time::Duration;
/// use instrumentrs::{RecordingSleeper, Sleeper};
///
/// let recorder = RecordingSleeper::new();
/// let mut sleeper = recorder.clone();
/// sleeper.sleep(Duration::from_millis(500));
///
/// assert_eq!(recorder.naps(), vec![Duration::from_millis(500)]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    naps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create a new recorder without any pauses.
    pub fn new() -> Self {
        Self::default()
    }

    /// All pauses recorded so far, in order.
    pub fn naps(&self) -> Vec<Duration> {
        self.naps
            .lock()
            .expect("Mutex should not be poisoned")
            .clone()
    }

    /// Sum of all pauses recorded so far.
    pub fn total(&self) -> Duration {
        self.naps().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.naps
            .lock()
            .expect("Mutex should not be poisoned")
            .push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sleeper_shares_record() {
        let recorder = RecordingSleeper::new();
        let mut sleeper = recorder.clone();
        sleeper.sleep(Duration::from_millis(1));
        sleeper.sleep(Duration::from_millis(2));

        assert_eq!(
            recorder.naps(),
            vec![Duration::from_millis(1), Duration::from_millis(2)]
        );
        assert_eq!(recorder.total(), Duration::from_millis(3));
    }

    #[test]
    fn test_thread_sleeper_zero() {
        ThreadSleeper.sleep(Duration::ZERO);
    }
}
