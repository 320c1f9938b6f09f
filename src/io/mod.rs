//! I/O module: chunked reads and boundary-transparent line segmentation
//!
//! The input is consumed in fixed-size chunks through a single reusable
//! buffer ([`ChunkSource`]), and [`LineSegmenter`] reconstructs logical
//! lines on top of that stream, re-seeking when a line straddles a chunk
//! boundary. Memory stays constant regardless of input size.

mod chunk;
mod segment;

pub use chunk::{ChunkSource, IoStrategy, MMAP_THRESHOLD};
pub use segment::{LineSegmenter, DEFAULT_MAX_LINE_LEN};

/// Smallest accepted block-size exponent (4 KiB chunks)
pub const MIN_BLOCK_EXP: u32 = 12;

/// Largest accepted block-size exponent (256 MiB chunks)
pub const MAX_BLOCK_EXP: u32 = 28;

/// Default block-size exponent (16 KiB chunks)
pub const DEFAULT_BLOCK_EXP: u32 = 14;
