//! Boundary-transparent line segmentation over a chunked byte stream
//!
//! [`LineSegmenter`] turns the chunk sequence of a [`ChunkSource`] into a
//! lazy sequence of logical lines. A line is normally a borrowed view into
//! the current chunk; when a line straddles a chunk boundary the segmenter
//! re-seeks so the line restarts a fresh chunk, and only when a line is
//! longer than a whole chunk does it spill into an owned buffer.
//!
//! The emitted line sequence is independent of the chosen block size,
//! including block sizes smaller than the longest line. A final chunk that
//! does not end in a newline raises the non-fatal corrupt-input condition;
//! the trailing partial line is dropped, never emitted.

use crate::io::ChunkSource;
use crate::types::ScanStats;
use tracing::{debug, warn};

/// Operational cap on logical line length; longer lines are truncated
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Restartable scanner producing logical lines from chunked input
///
/// # Example
///
/// ```no_run
/// use subcell::io::{ChunkSource, IoStrategy, LineSegmenter};
///
/// # fn main() -> subcell::Result<()> {
/// let source = ChunkSource::open("uniprot_sprot.dat", 14, IoStrategy::Auto)?;
/// let mut lines = LineSegmenter::new(source);
/// while let Some(line) = lines.next_line() {
///     // line is one logical line, without its terminator
/// }
/// let stats = lines.stats();
/// # Ok(())
/// # }
/// ```
pub struct LineSegmenter {
    source: ChunkSource,
    /// Offset of the current line within the current chunk
    line_begin: usize,
    max_line_len: usize,
    /// Accumulator for lines longer than a whole chunk
    spill: Vec<u8>,
    primed: bool,
    finished: bool,
    lines: u64,
    longest: usize,
    truncated: u64,
    corrupt: bool,
    io_error: Option<String>,
}

impl LineSegmenter {
    /// Wrap a chunk source with the default line-length cap
    pub fn new(source: ChunkSource) -> Self {
        Self::with_max_line_len(source, DEFAULT_MAX_LINE_LEN)
    }

    /// Wrap a chunk source with an explicit line-length cap
    pub fn with_max_line_len(source: ChunkSource, max_line_len: usize) -> Self {
        assert!(max_line_len > 0, "line cap must be non-zero");
        Self {
            source,
            line_begin: 0,
            max_line_len,
            spill: Vec::new(),
            primed: false,
            finished: false,
            lines: 0,
            longest: 0,
            truncated: 0,
            corrupt: false,
            io_error: None,
        }
    }

    /// The next logical line, without its terminator
    ///
    /// Returns `None` at end of input (the drain signal); afterwards
    /// [`stats`](Self::stats) reports what the scan encountered. The
    /// returned slice is only valid until the next call.
    pub fn next_line(&mut self) -> Option<&[u8]> {
        if self.finished {
            return None;
        }
        self.spill.clear();
        loop {
            if !self.primed {
                if !self.fetch(false) {
                    return None;
                }
                self.primed = true;
                self.line_begin = 0;
            }

            let chunk_len = self.source.chunk_len();
            if self.line_begin >= chunk_len {
                // Previous line ended exactly at the chunk boundary.
                if !self.fetch(false) {
                    return None;
                }
                self.line_begin = 0;
                continue;
            }

            let begin = self.line_begin;
            let budget = self.max_line_len - self.spill.len();
            let window_end = chunk_len.min(begin + budget);
            let chunk = self.source.chunk();

            if let Some(rel) = chunk[begin..window_end].iter().position(|&b| b == b'\n') {
                let end = begin + rel;
                self.line_begin = end + 1;
                self.lines += 1;
                if self.spill.is_empty() {
                    self.longest = self.longest.max(end - begin);
                    return Some(&self.source.chunk()[begin..end]);
                }
                self.spill.extend_from_slice(&self.source.chunk()[begin..end]);
                self.longest = self.longest.max(self.spill.len());
                return Some(&self.spill);
            }

            if begin + budget <= chunk_len {
                // The cap was reached before a terminator: force-truncate
                // and resume scanning right after the capped point.
                let end = begin + budget;
                self.line_begin = end;
                self.lines += 1;
                self.truncated += 1;
                warn!(cap = self.max_line_len, "line exceeds cap, truncating");
                if self.spill.is_empty() {
                    self.longest = self.longest.max(budget);
                    return Some(&self.source.chunk()[begin..end]);
                }
                self.spill.extend_from_slice(&self.source.chunk()[begin..end]);
                self.longest = self.longest.max(self.spill.len());
                return Some(&self.spill);
            }

            if chunk_len < self.source.blocksize() {
                // Short chunk means end of input; the unterminated tail is
                // dropped and the input flagged corrupt.
                self.corrupt = true;
                self.finished = true;
                warn!("input ends without a line terminator");
                return None;
            }

            if begin > 0 {
                // The line straddles the chunk boundary: rewind so its true
                // start becomes offset zero of a fresh chunk.
                let line_abs = self.source.chunk_offset() + begin as u64;
                debug!(offset = line_abs, "line wraps chunk boundary, re-seeking");
                self.source.seek(line_abs);
                if !self.fetch(true) {
                    return None;
                }
                self.line_begin = 0;
                continue;
            }

            // The line fills the whole chunk: spill it and keep appending
            // sequential chunks until a terminator or the cap.
            self.spill.extend_from_slice(&self.source.chunk()[..chunk_len]);
            if !self.fetch(true) {
                return None;
            }
            self.line_begin = 0;
        }
    }

    /// Pull the next chunk; returns false when scanning must stop
    ///
    /// `mid_line` marks that an unterminated line is pending, in which case
    /// running out of bytes is the corrupt-input condition.
    fn fetch(&mut self, mid_line: bool) -> bool {
        match self.source.read_next_chunk() {
            Ok(chunk) if chunk.is_empty() => {
                if mid_line {
                    self.corrupt = true;
                    warn!("input ends without a line terminator");
                }
                self.finished = true;
                false
            }
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "read failed, ending scan early");
                self.io_error = Some(e.to_string());
                self.finished = true;
                false
            }
        }
    }

    /// Line-level scan statistics gathered so far
    ///
    /// Record-level fields are filled in by the classifier.
    pub fn stats(&self) -> ScanStats {
        ScanStats {
            lines: self.lines,
            max_line_len: self.longest,
            truncated_lines: self.truncated,
            corrupt_input: self.corrupt,
            io_error: self.io_error.clone(),
            ..ScanStats::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read, Seek, SeekFrom};

    /// Reader that delivers bytes normally up to `fail_at`, then errors
    struct FailingReader {
        inner: Cursor<Vec<u8>>,
        fail_at: u64,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.inner.position() >= self.fail_at {
                return Err(io::Error::new(io::ErrorKind::Other, "simulated read failure"));
            }
            let cap = ((self.fail_at - self.inner.position()) as usize).min(buf.len());
            self.inner.read(&mut buf[..cap])
        }
    }

    impl Seek for FailingReader {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    fn segmenter(data: &[u8], blocksize: usize) -> LineSegmenter {
        LineSegmenter::new(ChunkSource::from_reader(Cursor::new(data.to_vec()), blocksize))
    }

    fn collect(seg: &mut LineSegmenter) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(line) = seg.next_line() {
            out.push(line.to_vec());
        }
        out
    }

    #[test]
    fn splits_terminated_lines() {
        let mut seg = segmenter(b"alpha\nbeta\ngamma\n", 64);
        assert_eq!(collect(&mut seg), vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]);
        let stats = seg.stats();
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.max_line_len, 5);
        assert!(!stats.corrupt_input);
    }

    #[test]
    fn empty_input_is_clean() {
        let mut seg = segmenter(b"", 16);
        assert!(collect(&mut seg).is_empty());
        assert!(!seg.stats().corrupt_input);
    }

    #[test]
    fn empty_lines_are_preserved() {
        let mut seg = segmenter(b"\n\nx\n", 16);
        assert_eq!(collect(&mut seg), vec![b"".to_vec(), b"".to_vec(), b"x".to_vec()]);
    }

    #[test]
    fn line_straddling_boundary_is_delivered_intact() {
        // blocksize 8 splits "longline" off its terminator
        let mut seg = segmenter(b"abc\nlongline\nz\n", 8);
        assert_eq!(
            collect(&mut seg),
            vec![b"abc".to_vec(), b"longline".to_vec(), b"z".to_vec()]
        );
    }

    #[test]
    fn line_longer_than_blocksize_spills() {
        let mut seg = segmenter(b"0123456789abcdef\nok\n", 4);
        assert_eq!(
            collect(&mut seg),
            vec![b"0123456789abcdef".to_vec(), b"ok".to_vec()]
        );
        assert!(!seg.stats().corrupt_input);
    }

    #[test]
    fn terminator_as_last_buffer_byte() {
        // newline lands exactly on the chunk boundary
        let mut seg = segmenter(b"abcdefg\nhij\n", 8);
        assert_eq!(collect(&mut seg), vec![b"abcdefg".to_vec(), b"hij".to_vec()]);
    }

    #[test]
    fn missing_final_terminator_is_corrupt() {
        let mut seg = segmenter(b"good\npartial", 64);
        assert_eq!(collect(&mut seg), vec![b"good".to_vec()]);
        assert!(seg.stats().corrupt_input);
    }

    #[test]
    fn missing_terminator_at_exact_block_multiple_is_corrupt() {
        // 8 bytes of data, blocksize 4: the short-read branch never fires,
        // the empty follow-up read must still flag corruption.
        let mut seg = segmenter(b"ab\ncdefg", 4);
        assert_eq!(collect(&mut seg), vec![b"ab".to_vec()]);
        assert!(seg.stats().corrupt_input);
    }

    #[test]
    fn overlong_line_is_truncated_not_fatal() {
        let mut seg = LineSegmenter::with_max_line_len(
            ChunkSource::from_reader(Cursor::new(b"0123456789\nok\n".to_vec()), 64),
            4,
        );
        let lines = collect(&mut seg);
        assert_eq!(lines[0], b"0123".to_vec());
        // the remainder of the capped line is rescanned as its own line
        assert_eq!(lines[1], b"456789".to_vec());
        assert_eq!(lines[2], b"ok".to_vec());
        let stats = seg.stats();
        assert_eq!(stats.truncated_lines, 1);
        assert!(!stats.corrupt_input);
    }

    #[test]
    fn read_failure_ends_scan_with_recorded_error() {
        // the second line dies mid-read; the first must still come out
        let reader = FailingReader {
            inner: Cursor::new(b"alpha\nbeta\n".to_vec()),
            fail_at: 8,
        };
        let mut seg = LineSegmenter::new(ChunkSource::from_reader(reader, 4));
        assert_eq!(collect(&mut seg), vec![b"alpha".to_vec()]);
        let stats = seg.stats();
        assert!(stats.io_error.is_some());
        assert!(!stats.corrupt_input);
        assert_eq!(stats.lines, 1);
    }

    #[test]
    fn chunk_size_independence_on_fixed_input() {
        let data = b"ID   TEST\nOS   Homo sapiens\nCC   -!- SUBCELLULAR LOCATION: Nucleus.\n//\n";
        let reference = collect(&mut segmenter(data, data.len() + 1));
        for blocksize in 1..=data.len() + 1 {
            let mut seg = segmenter(data, blocksize);
            assert_eq!(collect(&mut seg), reference, "blocksize {blocksize}");
            assert!(!seg.stats().corrupt_input, "blocksize {blocksize}");
        }
    }
}
