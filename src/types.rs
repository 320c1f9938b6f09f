//! Common types used throughout subcell

/// A reporting subset of the scanned records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Population {
    /// Every record in the input
    All,
    /// Records whose `OS` line names Homo sapiens
    Human,
    /// Records with a `TISSUE=Brain` reference comment
    Brain,
    /// Records with a `TISSUE=Muscle` reference comment
    Muscle,
}

impl Population {
    /// All populations, in report order
    pub const ALL: [Population; 4] = [
        Population::All,
        Population::Human,
        Population::Brain,
        Population::Muscle,
    ];

    /// Lowercase name used in report headings
    pub fn name(&self) -> &'static str {
        match self {
            Population::All => "total",
            Population::Human => "human",
            Population::Brain => "brain",
            Population::Muscle => "muscle",
        }
    }
}

/// One of the four derived subcellular compartments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compartment {
    /// Membrane-bound (transmembrane, intramembrane, lipid-anchored,
    /// or membrane/cell-surface located)
    Membrane,
    /// Cytoplasmic or cytosolic
    Cytoplasmic,
    /// Secreted or otherwise extracellular
    Extracellular,
    /// Nuclear
    Nuclear,
}

impl Compartment {
    /// All compartments, in report order
    pub const ALL: [Compartment; 4] = [
        Compartment::Nuclear,
        Compartment::Cytoplasmic,
        Compartment::Membrane,
        Compartment::Extracellular,
    ];

    /// Lowercase name used in report lines
    pub fn name(&self) -> &'static str {
        match self {
            Compartment::Membrane => "membrane",
            Compartment::Cytoplasmic => "cytoplasmic",
            Compartment::Extracellular => "extracellular",
            Compartment::Nuclear => "nuclear",
        }
    }
}

/// The four compartment totals for one population
///
/// This is the sole contract exposed to downstream consumers that render
/// the census graphically; everything else in the report is text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompartmentSummary {
    /// Nuclear protein count
    pub nuclear: u64,
    /// Cytoplasmic protein count
    pub cytoplasmic: u64,
    /// Membrane protein count (after the signal-peptide correction)
    pub membrane: u64,
    /// Extracellular protein count
    pub extracellular: u64,
}

/// Best-effort conditions and size statistics accumulated over one scan
///
/// None of these abort a run; they are folded into the final report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Total logical lines delivered
    pub lines: u64,
    /// Length in bytes of the longest line delivered (truncated lines
    /// count at the cap)
    pub max_line_len: usize,
    /// Lines force-truncated at the operational cap
    pub truncated_lines: u64,
    /// Lines of the longest record
    pub max_record_lines: u64,
    /// Characters of the longest record
    pub max_record_chars: u64,
    /// The input ended without a final line terminator
    pub corrupt_input: bool,
    /// The scan stopped early on an I/O error (report is partial)
    pub io_error: Option<String>,
    /// A record was still open when the input ended; it was not tallied
    pub dropped_partial_record: bool,
}

impl ScanStats {
    /// True when the report should carry a warning section
    pub fn has_warnings(&self) -> bool {
        self.corrupt_input
            || self.io_error.is_some()
            || self.dropped_partial_record
            || self.truncated_lines > 0
    }
}
