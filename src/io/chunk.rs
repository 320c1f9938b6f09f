//! Chunked input with a single reusable buffer
//!
//! [`ChunkSource`] owns the open input and hands out one chunk at a time,
//! tracking the absolute offset of the most recent read. The line segmenter
//! uses [`ChunkSource::seek`] to rewind when a line straddles two chunks.
//!
//! Two I/O strategies are supported: buffered positional reads into an owned
//! buffer, and a memory-mapped view where each chunk is a slice of the map.
//! Both produce identical chunk sequences; [`IoStrategy::Auto`] picks the
//! map for large files, where page-cache prefetching pays off.

use crate::error::{Result, SubcellError};
use crate::io::{MAX_BLOCK_EXP, MIN_BLOCK_EXP};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// File size above which [`IoStrategy::Auto`] selects memory mapping (50 MB)
pub const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024;

/// How the input bytes are brought into memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoStrategy {
    /// Choose by file size: mmap at or above [`MMAP_THRESHOLD`], reads below
    #[default]
    Auto,
    /// Positional reads into a reusable owned buffer
    Read,
    /// Memory-mapped input; chunks are slices of the map
    Mmap,
}

impl IoStrategy {
    /// Name used in the report footer
    pub fn name(&self) -> &'static str {
        match self {
            IoStrategy::Auto => "auto",
            IoStrategy::Read => "read",
            IoStrategy::Mmap => "mmap",
        }
    }
}

trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

enum Backend {
    Read {
        inner: Box<dyn ReadSeek>,
        buf: Vec<u8>,
        filled: usize,
    },
    Mmap {
        map: Mmap,
        chunk_start: usize,
        chunk_end: usize,
    },
}

/// Chunked reader over a single input stream
///
/// Reads up to `blocksize` bytes per call into a buffer that is reused
/// across reads; only the final chunk of the input may be short. Downstream
/// code must not retain a chunk across calls.
pub struct ChunkSource {
    backend: Backend,
    blocksize: usize,
    /// Absolute offset of the next read
    offset: u64,
    /// Absolute offset of the most recent chunk
    chunk_offset: u64,
}

impl ChunkSource {
    /// Open a file with the given block-size exponent and I/O strategy
    ///
    /// The exponent must lie in [`MIN_BLOCK_EXP`]`..=`[`MAX_BLOCK_EXP`];
    /// anything else is a startup error, not a scan condition.
    pub fn open<P: AsRef<Path>>(path: P, block_exp: u32, strategy: IoStrategy) -> Result<Self> {
        if !(MIN_BLOCK_EXP..=MAX_BLOCK_EXP).contains(&block_exp) {
            return Err(SubcellError::BlockSizeExponent(block_exp));
        }
        let blocksize = 1usize << block_exp;
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        let use_mmap = match strategy {
            IoStrategy::Read => false,
            IoStrategy::Mmap => len > 0,
            IoStrategy::Auto => len >= MMAP_THRESHOLD,
        };

        let backend = if use_mmap {
            // Safety: the map is read-only and private to this process run.
            let map = unsafe { Mmap::map(&file)? };
            Backend::Mmap {
                map,
                chunk_start: 0,
                chunk_end: 0,
            }
        } else {
            Backend::Read {
                inner: Box::new(file),
                buf: vec![0u8; blocksize],
                filled: 0,
            }
        };

        Ok(Self {
            backend,
            blocksize,
            offset: 0,
            chunk_offset: 0,
        })
    }

    /// Build a source over any seekable reader with a raw block size
    ///
    /// Used by tests and benchmarks to exercise block sizes outside the
    /// operational exponent range, down to a single byte.
    pub fn from_reader<R: Read + Seek + 'static>(reader: R, blocksize: usize) -> Self {
        assert!(blocksize > 0, "blocksize must be non-zero");
        Self {
            backend: Backend::Read {
                inner: Box::new(reader),
                buf: vec![0u8; blocksize],
                filled: 0,
            },
            blocksize,
            offset: 0,
            chunk_offset: 0,
        }
    }

    /// The configured chunk size in bytes
    pub fn blocksize(&self) -> usize {
        self.blocksize
    }

    /// The resolved strategy actually in use (never [`IoStrategy::Auto`])
    pub fn strategy(&self) -> IoStrategy {
        match self.backend {
            Backend::Read { .. } => IoStrategy::Read,
            Backend::Mmap { .. } => IoStrategy::Mmap,
        }
    }

    /// Absolute file offset of the most recent chunk
    pub fn chunk_offset(&self) -> u64 {
        self.chunk_offset
    }

    /// Length of the most recent chunk
    pub fn chunk_len(&self) -> usize {
        match &self.backend {
            Backend::Read { filled, .. } => *filled,
            Backend::Mmap {
                chunk_start,
                chunk_end,
                ..
            } => chunk_end - chunk_start,
        }
    }

    /// The most recent chunk
    pub fn chunk(&self) -> &[u8] {
        match &self.backend {
            Backend::Read { buf, filled, .. } => &buf[..*filled],
            Backend::Mmap {
                map,
                chunk_start,
                chunk_end,
            } => &map[*chunk_start..*chunk_end],
        }
    }

    /// Position the next read at an absolute offset
    pub fn seek(&mut self, absolute_offset: u64) {
        self.offset = absolute_offset;
    }

    /// Read the next chunk at the current offset, replacing the previous one
    ///
    /// Returns the filled prefix of the buffer; an empty slice means end of
    /// input. Only the final chunk of the input is ever shorter than the
    /// block size.
    pub fn read_next_chunk(&mut self) -> io::Result<&[u8]> {
        self.chunk_offset = self.offset;
        match &mut self.backend {
            Backend::Read { inner, buf, filled } => {
                inner.seek(SeekFrom::Start(self.offset))?;
                let mut n = 0;
                while n < buf.len() {
                    match inner.read(&mut buf[n..]) {
                        Ok(0) => break,
                        Ok(m) => n += m,
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e),
                    }
                }
                *filled = n;
                self.offset += n as u64;
                Ok(&buf[..n])
            }
            Backend::Mmap {
                map,
                chunk_start,
                chunk_end,
            } => {
                let start = (self.offset as usize).min(map.len());
                let end = (start + self.blocksize).min(map.len());
                *chunk_start = start;
                *chunk_end = end;
                self.offset = end as u64;
                Ok(&map[start..end])
            }
        }
    }
}
