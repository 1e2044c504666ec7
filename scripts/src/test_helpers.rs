//! Helpers shared by the unit tests

use std::{
    io,
    sync::{Arc, Mutex},
};

use tracing::{subscriber::DefaultGuard, Level};

/// Log output captured in memory
#[derive(Clone, Default)]
pub struct LogBuffer {
    /// The formatted log lines
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    /// Capture the events at `level` and above emitted on this thread until the guard drops
    pub fn capture(&self, level: Level) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(level)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// The number of captured lines containing `needle`
    pub fn count(&self, needle: &str) -> usize {
        let logs = String::from_utf8(self.bytes.lock().unwrap().clone()).unwrap();
        logs.lines().filter(|line| line.contains(needle)).count()
    }
}
