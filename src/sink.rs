//! # Sink — Serialized Output for Accepted Pairs
//!
//! All workers share one append-only text destination. Each worker hands over
//! its whole buffer exactly once; the block is rendered outside the lock and
//! written under it, so blocks never interleave. The order between blocks is
//! whatever order workers acquire the lock in.
//!
//! Record format: one `"<p1>, <p2>"` line per pair, no header or footer.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::worker::TwinPair;

pub struct ResultSink<W: Write + Send> {
    out: Mutex<W>,
}

impl ResultSink<File> {
    /// Create (or truncate) the output file.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(ResultSink::new(file))
    }
}

impl<W: Write + Send> ResultSink<W> {
    pub fn new(out: W) -> Self {
        ResultSink {
            out: Mutex::new(out),
        }
    }

    /// Write one worker's buffered pairs as a single contiguous block.
    ///
    /// Empty buffers are a no-op and never take the lock.
    pub fn append_block(&self, pairs: &[TwinPair]) -> Result<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        let block = render_block(pairs);

        let mut out = self.out.lock().map_err(|_| SearchError::SinkPoisoned)?;
        out.write_all(block.as_bytes())?;
        out.flush()?;
        debug!(pairs = pairs.len(), bytes = block.len(), "flushed block");
        Ok(())
    }

    /// Recover the underlying writer (tests and in-memory sinks).
    pub fn into_inner(self) -> Result<W> {
        self.out.into_inner().map_err(|_| SearchError::SinkPoisoned)
    }
}

fn render_block(pairs: &[TwinPair]) -> String {
    let mut block = String::new();
    for pair in pairs {
        block.push_str(&pair.to_string());
        block.push('\n');
    }
    block
}
