//! Counter sets folded once per record, read once at end of run
//!
//! [`TallyBank`] keeps one [`PopulationCounts`] per reporting population
//! (all, human, brain, muscle). Counters only ever increase during the
//! scan; [`TallyBank::finalize`] applies the single post-scan correction
//! and freezes the bank.

use crate::classify::Evidence;
use crate::taxonomy::{
    CategoryTaxonomy, GO_CYTOPLASM, GO_CYTOSOL, GO_DNA_BIND, GO_ECM, GO_EXTRACELLULAR, GO_NUCLEUS,
    SCL_CELL_MEMBRANE, SCL_CELL_SURFACE, SCL_CYTOPLASM, SCL_CYTOSOL, SCL_EXTRACELLULAR,
    SCL_MEMBRANE, SCL_NUCLEUS, SCL_SECRETED, SCL_SOLUBLE, SCL_TELOMERE,
};
use crate::types::{CompartmentSummary, Population};

/// Compartment membership resolved from one record's evidence
///
/// Buckets are not mutually exclusive; a record can sit in several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompartmentFlags {
    /// Membrane-bound by feature or location evidence
    pub membrane: bool,
    /// Cytoplasmic by location or GO evidence
    pub cytoplasmic: bool,
    /// Extracellular by signal peptide, location, or GO evidence
    pub extracellular: bool,
    /// Nuclear by location or GO evidence
    pub nuclear: bool,
}

/// Resolve the four compartment buckets from accumulated evidence
///
/// A pure function of the flags; independent of the order lines were seen.
pub fn resolve_compartments(ev: &Evidence) -> CompartmentFlags {
    CompartmentFlags {
        membrane: ev.transmem
            || ev.intramem
            || ev.lipid
            || ev.subcellular[SCL_CELL_SURFACE]
            || ev.subcellular[SCL_CELL_MEMBRANE]
            || ev.subcellular[SCL_MEMBRANE],
        cytoplasmic: ev.subcellular[SCL_CYTOPLASM]
            || ev.subcellular[SCL_CYTOSOL]
            || ev.subcellular[SCL_SOLUBLE]
            || ev.go[GO_CYTOSOL]
            || ev.go[GO_CYTOPLASM],
        extracellular: ev.signal
            || ev.subcellular[SCL_EXTRACELLULAR]
            || ev.subcellular[SCL_SECRETED]
            || ev.go[GO_EXTRACELLULAR]
            || ev.go[GO_ECM],
        nuclear: ev.subcellular[SCL_NUCLEUS]
            || ev.subcellular[SCL_TELOMERE]
            || ev.go[GO_NUCLEUS]
            || ev.go[GO_DNA_BIND],
    }
}

/// Accumulated counts for one population
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationCounts {
    /// Records folded into this population
    pub records: u64,
    /// Records with an `FT TRANSMEM` feature
    pub transmem: u64,
    /// Records with an `FT INTRAMEM` feature
    pub intramem: u64,
    /// Records with an `FT LIPID` feature (covalent lipid binding)
    pub lipid: u64,
    /// Records with both intramembrane and transmembrane features
    pub intra_and_trans: u64,
    /// Records with an `FT SIGNAL` signal peptide
    pub signal: u64,
    /// Records with both a signal peptide and a transmembrane feature
    pub signal_and_transmem: u64,
    /// Records with an `FT DNA_BIND` feature
    pub dna_bind: u64,
    /// Records with at least one recognized `DR GO` annotation
    pub has_go: u64,
    /// Per-label subcellular-location counts
    pub subcellular: Vec<u64>,
    /// Per-label primary Gene Ontology counts
    pub go: Vec<u64>,
    /// Per-label minor Gene Ontology counts
    pub go_minor: Vec<u64>,
    /// Records with no subcellular-location comment block at all
    pub no_subcellular: u64,
    /// Records with a location block but no positive evidence anywhere
    pub remainder: u64,
    /// Derived membrane compartment (corrected in `finalize`)
    pub membrane: u64,
    /// Derived cytoplasmic compartment
    pub cytoplasmic: u64,
    /// Derived extracellular compartment
    pub extracellular: u64,
    /// Derived nuclear compartment
    pub nuclear: u64,
}

impl PopulationCounts {
    fn new(taxonomy: &CategoryTaxonomy) -> Self {
        Self {
            records: 0,
            transmem: 0,
            intramem: 0,
            lipid: 0,
            intra_and_trans: 0,
            signal: 0,
            signal_and_transmem: 0,
            dna_bind: 0,
            has_go: 0,
            subcellular: vec![0; taxonomy.subcellular.len()],
            go: vec![0; taxonomy.go.len()],
            go_minor: vec![0; taxonomy.go_minor.len()],
            no_subcellular: 0,
            remainder: 0,
            membrane: 0,
            cytoplasmic: 0,
            extracellular: 0,
            nuclear: 0,
        }
    }

    fn fold(&mut self, ev: &Evidence, comp: CompartmentFlags) {
        self.records += 1;
        if ev.transmem {
            self.transmem += 1;
        }
        if ev.intramem {
            self.intramem += 1;
        }
        if ev.lipid {
            self.lipid += 1;
        }
        if ev.intramem && ev.transmem {
            self.intra_and_trans += 1;
        }
        if ev.signal {
            self.signal += 1;
        }
        if ev.signal && ev.transmem {
            self.signal_and_transmem += 1;
        }
        if ev.dna_bind {
            self.dna_bind += 1;
        }
        if ev.has_go {
            self.has_go += 1;
        }
        for (count, &hit) in self.subcellular.iter_mut().zip(&ev.subcellular) {
            if hit {
                *count += 1;
            }
        }
        for (count, &hit) in self.go.iter_mut().zip(&ev.go) {
            if hit {
                *count += 1;
            }
        }
        for (count, &hit) in self.go_minor.iter_mut().zip(&ev.go_minor) {
            if hit {
                *count += 1;
            }
        }
        // A record without the location block is counted as unannotated and
        // excluded from the remainder, matching the published numbers.
        if !ev.has_scl {
            self.no_subcellular += 1;
        } else if ev.unclassified {
            self.remainder += 1;
        }
        if comp.membrane {
            self.membrane += 1;
        }
        if comp.cytoplasmic {
            self.cytoplasmic += 1;
        }
        if comp.extracellular {
            self.extracellular += 1;
        }
        if comp.nuclear {
            self.nuclear += 1;
        }
    }
}

/// The full counter bank: one counter set per population
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyBank {
    all: PopulationCounts,
    human: PopulationCounts,
    brain: PopulationCounts,
    muscle: PopulationCounts,
    /// Lines of still-unclassified records routed to the remainder sink
    pub remainder_lines: u64,
    /// `DR GO` lines matching neither Gene Ontology panel
    pub unclassified_go_lines: u64,
    finalized: bool,
}

impl TallyBank {
    /// Create a zeroed bank sized to the taxonomy's panels
    pub fn new(taxonomy: &CategoryTaxonomy) -> Self {
        Self {
            all: PopulationCounts::new(taxonomy),
            human: PopulationCounts::new(taxonomy),
            brain: PopulationCounts::new(taxonomy),
            muscle: PopulationCounts::new(taxonomy),
            remainder_lines: 0,
            unclassified_go_lines: 0,
            finalized: false,
        }
    }

    /// Fold one completed record's evidence into the bank
    ///
    /// Every record lands in the `all` population; human, brain, and muscle
    /// are conditional on the record's species and tissue evidence.
    pub fn fold(&mut self, ev: &Evidence) {
        debug_assert!(!self.finalized, "fold after finalize");
        let comp = resolve_compartments(ev);
        self.all.fold(ev, comp);
        if ev.human {
            self.human.fold(ev, comp);
        }
        if ev.brain {
            self.brain.fold(ev, comp);
        }
        if ev.muscle {
            self.muscle.fold(ev, comp);
        }
    }

    /// Apply the post-scan signal-peptide membrane correction and freeze
    ///
    /// Records counted as membrane solely via a signal-peptide overlap are
    /// corrected by a single global subtraction of the signal count from
    /// the membrane total, for the all and human populations only. This is
    /// the documented historical behavior, not a per-record rule.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.all.membrane = self.all.membrane.saturating_sub(self.all.signal);
        self.human.membrane = self.human.membrane.saturating_sub(self.human.signal);
        self.finalized = true;
    }

    /// Counters for one population
    pub fn population(&self, population: Population) -> &PopulationCounts {
        match population {
            Population::All => &self.all,
            Population::Human => &self.human,
            Population::Brain => &self.brain,
            Population::Muscle => &self.muscle,
        }
    }

    /// The four compartment totals for one population
    ///
    /// This is the whole contract exposed to chart-rendering consumers.
    pub fn compartment_summary(&self, population: Population) -> CompartmentSummary {
        let counts = self.population(population);
        CompartmentSummary {
            nuclear: counts.nuclear,
            cytoplasmic: counts.cytoplasmic,
            membrane: counts.membrane,
            extracellular: counts.extracellular,
        }
    }
}
