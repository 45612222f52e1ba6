//! Byte sanitizer and line reassembler
//!
//! Instrumented device programs print through shared buffers, so the logs
//! regularly contain interleaved binary garbage and partial multi-byte
//! sequences. Every byte at or above 0x80 is dropped; the remaining ASCII
//! bytes are stitched back into `\n`-terminated lines independent of how
//! the input was chunked.

use crate::error::LineError;
use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read};

/// Default read chunk size in bytes
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

const LINE_FEED: u8 = b'\n';

/// Counters kept while reassembling lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    pub bytes_read: u64,
    pub bytes_dropped: u64,
    /// Bytes left in the buffer at end of input (no trailing line feed)
    pub unterminated_bytes: u64,
}

/// Incremental line assembler fed with arbitrary chunks
#[derive(Debug, Default)]
pub struct LineReassembler {
    buffer: Vec<u8>,
    stats: SanitizeStats,
}

impl LineReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, calling `on_line` for each completed line.
    ///
    /// The line passed on excludes the terminating line feed.
    pub fn feed<F>(&mut self, chunk: &[u8], mut on_line: F)
    where
        F: FnMut(Result<&str, LineError>),
    {
        self.stats.bytes_read += chunk.len() as u64;

        for &byte in chunk {
            if !byte.is_ascii() {
                self.stats.bytes_dropped += 1;
                continue;
            }

            if byte == LINE_FEED {
                on_line(std::str::from_utf8(&self.buffer).map_err(LineError::from));
                self.buffer.clear();
            } else {
                self.buffer.push(byte);
            }
        }
    }

    /// Finish the stream; an unterminated final line is discarded
    pub fn finish(mut self) -> SanitizeStats {
        self.stats.unterminated_bytes = self.buffer.len() as u64;
        self.stats
    }

    pub fn stats(&self) -> &SanitizeStats {
        &self.stats
    }
}

/// Iterator over sanitized lines of a reader
///
/// Yields `Ok(Ok(line))` for each completed line, `Ok(Err(_))` for a line
/// that could not be decoded, and `Err(_)` when the reader fails.
pub struct SanitizedLines<R> {
    reader: R,
    chunk: Vec<u8>,
    assembler: Option<LineReassembler>,
    pending: VecDeque<Result<String, LineError>>,
    finished_stats: Option<SanitizeStats>,
}

impl<R: Read> SanitizedLines<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0; chunk_size.max(1)],
            assembler: Some(LineReassembler::new()),
            pending: VecDeque::new(),
            finished_stats: None,
        }
    }

    /// Counters so far; final once the iterator has returned `None`
    pub fn stats(&self) -> SanitizeStats {
        match (&self.finished_stats, &self.assembler) {
            (Some(stats), _) => *stats,
            (None, Some(assembler)) => *assembler.stats(),
            (None, None) => SanitizeStats::default(),
        }
    }

    fn fill(&mut self) -> io::Result<bool> {
        let Some(assembler) = self.assembler.as_mut() else {
            return Ok(false);
        };

        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    if let Some(assembler) = self.assembler.take() {
                        let stats = assembler.finish();
                        if stats.unterminated_bytes > 0 {
                            tracing::debug!(
                                bytes = stats.unterminated_bytes,
                                "discarding unterminated final line"
                            );
                        }
                        self.finished_stats = Some(stats);
                    }
                    return Ok(false);
                }
                Ok(n) => {
                    let pending = &mut self.pending;
                    assembler.feed(&self.chunk[..n], |line| {
                        pending.push_back(line.map(str::to_owned));
                    });
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for SanitizedLines<R> {
    type Item = io::Result<Result<String, LineError>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }

            match self.fill() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => {
                    // Reader failures are not retried
                    self.assembler = None;
                    return Some(Err(e));
                }
            }
        }
    }
}
