//! subcell: subcellular-compartment census of UniProtKB flat-file dumps
//!
//! # Overview
//!
//! subcell scans a UniProt-style knowledgebase text dump in one sequential
//! pass and tallies, per protein record, the subcellular compartment(s) the
//! evidence points at (membrane, cytoplasmic, extracellular, nuclear), with
//! population subsets for human proteins and for brain and muscle tissue.
//!
//! ## Key Properties
//!
//! - **Constant memory**: one reusable chunk buffer regardless of input size
//! - **Chunk-size independence**: the line sequence is identical for any
//!   block size, including blocks smaller than the longest line
//! - **Best effort**: corrupt or truncated input never aborts a scan; the
//!   report carries the warnings instead
//!
//! ## Quick Start
//!
//! ```no_run
//! use subcell::{run_census, CategoryTaxonomy, ChunkSource, IoStrategy, LineSegmenter};
//! use subcell::types::Population;
//!
//! # fn main() -> subcell::Result<()> {
//! let taxonomy = CategoryTaxonomy::compile()?;
//! let source = ChunkSource::open("uniprot_sprot.dat", 14, IoStrategy::Auto)?;
//! let census = run_census(LineSegmenter::new(source), &taxonomy);
//!
//! let human = census.tallies.compartment_summary(Population::Human);
//! println!("human membrane proteins: {}", human.membrane);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`io`]: chunked reads and boundary-transparent line segmentation
//! - [`taxonomy`]: the fixed pattern panels and their rule indices
//! - [`classify`]: the per-record evidence state machine
//! - [`tally`]: the counter bank and compartment resolution
//! - [`report`]: end-of-run summary text

#![warn(missing_docs)]

pub mod classify;
pub mod error;
pub mod io;
pub mod report;
pub mod tally;
pub mod taxonomy;
pub mod types;

pub use classify::{run_census, Census, Evidence, RecordClassifier};
pub use error::{Result, SubcellError};
pub use io::{ChunkSource, IoStrategy, LineSegmenter};
pub use tally::{PopulationCounts, TallyBank};
pub use taxonomy::CategoryTaxonomy;
pub use types::{Compartment, CompartmentSummary, Population, ScanStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
