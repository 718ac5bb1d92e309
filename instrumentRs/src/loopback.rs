//! The loopback module provides an instrument simulator for testing purposes.
//!
//! The [`LoopbackInterface`] is scripted: you tell it which writes the host is expected to
//! perform and which chunks of bytes the instrument sends back. Paced writes go out one
//! character at a time, so every character is one expected write.

use std::{collections::VecDeque, thread};

use crate::{InstrumentError, InstrumentInterface};

/// A self-incrementing index structure that by default starts at 0 and increments whenever `next`
/// is called.
#[derive(Debug, Default)]
struct IncrIndex {
    index: usize,
}

impl IncrIndex {
    fn next(&mut self) -> usize {
        let current = self.index;
        self.index += 1;
        current
    }
}

/// An interface that allows you to simply write tests for your instrument driver.
///
/// Every call to [`InstrumentInterface::write_raw`] must match the next entry of `from_host`
/// exactly, otherwise the interface panics. Every call to [`InstrumentInterface::read_budget`]
/// hands out the next entry of `from_inst`. If a read budget is smaller than the entry, the
/// remaining bytes stay buffered for the following read, like they would in a serial port.
/// An empty entry simulates a read that timed out.
///
/// When the interface is dropped, it panics if any scripted write or response was not used.
///
/// # Example
///
/// ```
/// use instrumentrs::{InstrumentInterface, LoopbackInterface};
///
/// let mut lbk = LoopbackInterface::new(vec!["\r"], vec!["Screen\r\n"]);
/// lbk.write("\r").unwrap();
/// assert_eq!(lbk.read_text(1000).unwrap(), "Screen\r\n");
/// ```
pub struct LoopbackInterface {
    from_host: Vec<Vec<u8>>,
    from_inst: Vec<Vec<u8>>,
    from_host_index: IncrIndex,
    from_inst_index: IncrIndex,
    curr_bytes: VecDeque<u8>,
}

impl LoopbackInterface {
    /// Create a new loopback instrument with given commands to and from instrument.
    ///
    /// # Arguments:
    /// * `from_host` - Expected writes from host to instrument, one entry per write call.
    /// * `from_inst` - Responses from instrument to host, one entry per read call.
    pub fn new<H, I>(from_host: Vec<H>, from_inst: Vec<I>) -> Self
    where
        H: AsRef<[u8]>,
        I: AsRef<[u8]>,
    {
        LoopbackInterface {
            from_host: from_host.iter().map(|c| c.as_ref().to_vec()).collect(),
            from_inst: from_inst.iter().map(|c| c.as_ref().to_vec()).collect(),
            from_host_index: IncrIndex::default(),
            from_inst_index: IncrIndex::default(),
            curr_bytes: VecDeque::new(),
        }
    }

    /// This command panics if not all commands in the [`LoopbackInterface`] have been used.
    ///
    /// It is automatically called when the [`LoopbackInterface`] is dropped, but you can also call
    /// it manually to ensure that all commands have been used.
    pub fn finalize(&mut self) {
        let from_host_leftover = self.from_host.get(self.from_host_index.next());
        let from_inst_leftover = self.from_inst.get(self.from_inst_index.next());
        if let Some(fil) = from_host_leftover {
            panic!(
                "Leftover expected commands found from host to instrument: {:?}",
                String::from_utf8_lossy(fil)
            );
        }
        if let Some(fil) = from_inst_leftover {
            panic!(
                "Leftover expected commands found from instrument to host: {:?}",
                String::from_utf8_lossy(fil)
            );
        }
        if !self.curr_bytes.is_empty() {
            panic!(
                "Leftover bytes from instrument to host were never read: {:?}",
                self.curr_bytes
            );
        }
    }

    /// Get the next command bytes from host to instrument, or panic.
    fn get_next_from_host(&mut self) -> &[u8] {
        self.from_host
            .get(self.from_host_index.next())
            .expect("No more commands were expected from host to instrument.")
    }

    /// Get the next response from instrument to host, or panic.
    fn get_next_from_inst(&mut self) -> &[u8] {
        self.from_inst
            .get(self.from_inst_index.next())
            .expect("No more responses were expected from instrument to host.")
    }
}

impl InstrumentInterface for LoopbackInterface {
    fn write_raw(&mut self, data: &[u8]) -> Result<(), InstrumentError> {
        let exp = self.get_next_from_host();
        assert_eq!(
            exp,
            data,
            "Expected write {:?}, got {:?}",
            String::from_utf8_lossy(exp),
            String::from_utf8_lossy(data)
        );
        Ok(())
    }

    fn read_budget(&mut self, budget: usize) -> Result<Vec<u8>, InstrumentError> {
        if self.curr_bytes.is_empty() {
            self.curr_bytes = self.get_next_from_inst().iter().copied().collect();
        }
        let take = budget.min(self.curr_bytes.len());
        Ok(self.curr_bytes.drain(..take).collect())
    }
}

impl Drop for LoopbackInterface {
    fn drop(&mut self) {
        if !thread::panicking() {
            self.finalize();
        }
    }
}
