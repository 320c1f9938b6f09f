//! Stateful record classification over the line stream
//!
//! [`RecordClassifier`] consumes one logical line at a time, accumulates
//! per-record [`Evidence`], and folds it into the [`TallyBank`] when the
//! `//` end-of-record marker arrives. Dispatch is on the two-character
//! line tag at the start of each line; tags are mutually exclusive
//! prefixes in the knowledgebase format, so at most one arm fires.
//!
//! Keyword recognition inside `OS`, `FT`, `CC`, and `DR` lines is anchored
//! at fixed columns of the format but always bounds-checked: a line too
//! short for the keyword simply matches nothing.

use crate::io::LineSegmenter;
use crate::tally::TallyBank;
use crate::taxonomy::CategoryTaxonomy;
use crate::types::ScanStats;
use tracing::{debug, trace};

/// End-of-record marker tag
const TAG_END_OF_RECORD: &[u8; 2] = b"//";

/// Column where the species name starts on an `OS` line
const OS_SPECIES_COLUMN: usize = 5;
const HUMAN_SPECIES_FRAGMENT: &[u8] = b"Homo sapiens";

/// Column where the feature key starts on an `FT` line
const FT_KEY_COLUMN: usize = 5;

/// Column where the comment topic marker starts on a `CC` line
const CC_MARKER_COLUMN: usize = 5;
const CC_SUBCELLULAR_MARKER: &[u8] = b"-!- SUBCELLULAR LOCATION";
const CC_TOPIC_MARKER: &[u8] = b"-!-";
const CC_BLOCK_MARKER: &[u8] = b"---";

/// Column where the database abbreviation starts on a `DR` line
const DR_DATABASE_COLUMN: usize = 5;
const DR_GO_DATABASE: &[u8] = b"GO";

/// Per-record evidence flags, reset at every record boundary
///
/// The flag vectors are sized from the same taxonomy that drives matching,
/// so label and flag stay in lockstep by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evidence {
    /// `FT TRANSMEM` seen
    pub transmem: bool,
    /// `FT INTRAMEM` seen
    pub intramem: bool,
    /// `FT LIPID` seen
    pub lipid: bool,
    /// `FT SIGNAL` seen
    pub signal: bool,
    /// `FT DNA_BIND` seen
    pub dna_bind: bool,
    /// `OS` line named Homo sapiens
    pub human: bool,
    /// Brain tissue referenced (sticky for the record)
    pub brain: bool,
    /// Muscle tissue referenced (sticky for the record)
    pub muscle: bool,
    /// A `-!- SUBCELLULAR LOCATION` comment block was entered
    pub has_scl: bool,
    /// At least one recognized Gene Ontology cross-reference
    pub has_go: bool,
    /// No positive evidence recorded yet (defaults true)
    pub unclassified: bool,
    /// Per-pattern subcellular-location hits
    pub subcellular: Vec<bool>,
    /// Per-pattern primary Gene Ontology hits
    pub go: Vec<bool>,
    /// Per-pattern minor Gene Ontology hits
    pub go_minor: Vec<bool>,
    /// Currently inside the subcellular-location comment block
    in_scl_block: bool,
    /// Lines seen in the current record (including the terminator line)
    lines: u64,
    /// Characters seen in the current record
    chars: u64,
}

impl Evidence {
    /// Fresh evidence sized to the taxonomy's panels
    pub fn new(taxonomy: &CategoryTaxonomy) -> Self {
        Self {
            transmem: false,
            intramem: false,
            lipid: false,
            signal: false,
            dna_bind: false,
            human: false,
            brain: false,
            muscle: false,
            has_scl: false,
            has_go: false,
            unclassified: true,
            subcellular: vec![false; taxonomy.subcellular.len()],
            go: vec![false; taxonomy.go.len()],
            go_minor: vec![false; taxonomy.go_minor.len()],
            in_scl_block: false,
            lines: 0,
            chars: 0,
        }
    }

    fn reset(&mut self) {
        self.transmem = false;
        self.intramem = false;
        self.lipid = false;
        self.signal = false;
        self.dna_bind = false;
        self.human = false;
        self.brain = false;
        self.muscle = false;
        self.has_scl = false;
        self.has_go = false;
        self.unclassified = true;
        self.subcellular.fill(false);
        self.go.fill(false);
        self.go_minor.fill(false);
        self.in_scl_block = false;
        self.lines = 0;
        self.chars = 0;
    }
}

/// Classifies the line stream record by record
pub struct RecordClassifier<'t> {
    taxonomy: &'t CategoryTaxonomy,
    evidence: Evidence,
    tallies: TallyBank,
    records: u64,
    max_record_lines: u64,
    max_record_chars: u64,
}

impl<'t> RecordClassifier<'t> {
    /// Create a classifier over a compiled taxonomy
    pub fn new(taxonomy: &'t CategoryTaxonomy) -> Self {
        Self {
            taxonomy,
            evidence: Evidence::new(taxonomy),
            tallies: TallyBank::new(taxonomy),
            records: 0,
            max_record_lines: 0,
            max_record_chars: 0,
        }
    }

    /// Consume one logical line
    pub fn ingest(&mut self, line: &[u8]) {
        self.evidence.lines += 1;
        self.evidence.chars += line.len() as u64;

        let Some(tag) = line.get(0..2) else {
            return;
        };
        if tag == TAG_END_OF_RECORD {
            self.end_record();
            return;
        }
        match tag {
            b"OS" => self.organism_species(line),
            b"RC" => self.reference_comment(line),
            b"FT" => self.feature_table(line),
            b"CC" => self.comment(line),
            b"DR" => self.cross_reference(line),
            _ => {}
        }
        if self.evidence.unclassified {
            self.tallies.remainder_lines += 1;
            trace!(line = %String::from_utf8_lossy(line), "remainder sink");
        }
    }

    fn organism_species(&mut self, line: &[u8]) {
        let end = OS_SPECIES_COLUMN + HUMAN_SPECIES_FRAGMENT.len();
        if line.get(OS_SPECIES_COLUMN..end) == Some(HUMAN_SPECIES_FRAGMENT) {
            self.evidence.human = true;
        }
    }

    fn reference_comment(&mut self, line: &[u8]) {
        if self.taxonomy.is_brain_tissue(line) {
            self.evidence.brain = true;
        }
        if self.taxonomy.is_muscle_tissue(line) {
            self.evidence.muscle = true;
        }
    }

    fn feature_table(&mut self, line: &[u8]) {
        let key_matches = |keyword: &[u8]| {
            line.get(FT_KEY_COLUMN..FT_KEY_COLUMN + keyword.len()) == Some(keyword)
        };
        let mut hit = true;
        if key_matches(b"TRANSMEM") {
            self.evidence.transmem = true;
        } else if key_matches(b"INTRAMEM") {
            self.evidence.intramem = true;
        } else if key_matches(b"LIPID") {
            self.evidence.lipid = true;
        } else if key_matches(b"SIGNAL") {
            self.evidence.signal = true;
        } else if key_matches(b"DNA_BIND") {
            self.evidence.dna_bind = true;
        } else {
            hit = false;
        }
        if hit {
            self.evidence.unclassified = false;
        }
    }

    fn comment(&mut self, line: &[u8]) {
        let marker_end = CC_MARKER_COLUMN + CC_SUBCELLULAR_MARKER.len();
        if line.get(CC_MARKER_COLUMN..marker_end) == Some(CC_SUBCELLULAR_MARKER) {
            self.evidence.has_scl = true;
            self.evidence.in_scl_block = true;
        } else {
            let topic = line.get(CC_MARKER_COLUMN..CC_MARKER_COLUMN + CC_TOPIC_MARKER.len());
            if topic == Some(CC_TOPIC_MARKER) || topic == Some(CC_BLOCK_MARKER) {
                self.evidence.in_scl_block = false;
            }
        }
        if self.evidence.in_scl_block
            && self
                .taxonomy
                .subcellular
                .mark_matches(line, &mut self.evidence.subcellular)
        {
            self.evidence.unclassified = false;
        }
    }

    fn cross_reference(&mut self, line: &[u8]) {
        let db_end = DR_DATABASE_COLUMN + DR_GO_DATABASE.len();
        if line.get(DR_DATABASE_COLUMN..db_end) != Some(DR_GO_DATABASE) {
            return;
        }
        let primary = self.taxonomy.go.mark_matches(line, &mut self.evidence.go);
        let minor = self
            .taxonomy
            .go_minor
            .mark_matches(line, &mut self.evidence.go_minor);
        if primary || minor {
            self.evidence.has_go = true;
            self.evidence.unclassified = false;
        } else {
            self.tallies.unclassified_go_lines += 1;
            trace!(line = %String::from_utf8_lossy(line), "unclassified GO sink");
        }
    }

    fn end_record(&mut self) {
        self.tallies.fold(&self.evidence);
        self.records += 1;
        self.max_record_lines = self.max_record_lines.max(self.evidence.lines);
        self.max_record_chars = self.max_record_chars.max(self.evidence.chars);
        self.evidence.reset();
    }

    /// Finish the scan: merge record statistics and freeze the tallies
    ///
    /// A record still open at the drain is dropped, never folded, and
    /// flagged on the stats.
    pub fn finish(mut self, stats: &mut ScanStats) -> TallyBank {
        if self.evidence.lines > 0 {
            debug!(
                lines = self.evidence.lines,
                "input ended inside a record; dropping partial record"
            );
            stats.dropped_partial_record = true;
        }
        stats.max_record_lines = self.max_record_lines;
        stats.max_record_chars = self.max_record_chars;
        self.tallies.finalize();
        self.tallies
    }
}

/// Result of one full scan: the frozen tallies and the scan conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Census {
    /// Finalized counter bank
    pub tallies: TallyBank,
    /// Line and record statistics, warnings included
    pub stats: ScanStats,
}

/// Drive a segmenter to exhaustion through a classifier
///
/// This is the whole pipeline: chunks to lines to evidence to tallies.
/// I/O failures mid-scan end the scan early; the census is still produced
/// over the data seen and flagged incomplete on its stats.
pub fn run_census(mut segmenter: LineSegmenter, taxonomy: &CategoryTaxonomy) -> Census {
    let mut classifier = RecordClassifier::new(taxonomy);
    while let Some(line) = segmenter.next_line() {
        classifier.ingest(line);
    }
    let mut stats = segmenter.stats();
    let tallies = classifier.finish(&mut stats);
    debug!(
        lines = stats.lines,
        corrupt = stats.corrupt_input,
        "scan complete"
    );
    Census { tallies, stats }
}
