//! Fixed pattern taxonomy for subcellular-location classification
//!
//! Three pattern families drive the census: free-text subcellular-location
//! patterns run inside `CC -!- SUBCELLULAR LOCATION` blocks, primary Gene
//! Ontology codes and minor Gene Ontology codes run against `DR GO` lines,
//! plus two tissue patterns for `RC` reference comments. Every pattern is
//! compiled once at startup; a compile failure aborts before any scanning.
//!
//! The compartment-resolution rules refer to specific panel positions; the
//! named index constants below are kept in lockstep with the tables and
//! asserted in tests.

use crate::error::{Result, SubcellError};
use regex::bytes::Regex;

/// Number of subcellular-location patterns
pub const REGEX_COUNT: usize = 45;

/// Number of primary Gene Ontology patterns
pub const GO_COUNT: usize = 9;

/// Number of minor Gene Ontology patterns
pub const GO_MINOR_COUNT: usize = 4;

const SUBCELLULAR_PATTERNS: [(&str, &str); REGEX_COUNT] = [
    ("[Cc]ell [Mm]embrane", "Cell Membrane"),
    ("[mM]embrane", "Membrane"),
    ("[cC]ytoplasm", "Cytoplasm"),
    ("[cC]ytosol", "Cytosol"),
    ("[Ee]xtracellular", "Extracellular"),
    ("[Ss]ecreted", "Secreted"),
    ("[Nn]ucleus", "Nucleus"),
    ("[Mm]itochondrion", "Mitochondrion"),
    ("[Ee]ndoplasmic reticulum lumen", "Endoplasmic reticulum lumen"),
    ("[Cc]ell junction", "Cell junction"),
    ("[Pp]eriplasm", "Periplasm"),
    ("[Vv]acuole", "Vacuole"),
    ("[Pp]lastid", "Plastid"),
    ("[Cc]apsid", "Capsid"),
    ("[Ee]ndoplasmic reticulum", "Endoplasmic reticulum"),
    ("[Ee]ndosome", "Endosome"),
    ("[Ll]ysosome", "Lysosome"),
    ("[Vv]irion", "Virion"),
    ("[Cc]entromere", "Centromere"),
    ("[Pp]eroxisome", "Peroxisome"),
    ("[Gg]olgi", "Golgi"),
    ("[Cc]ell [Ss]urface", "Cell Surface"),
    ("[Gg]lyoxysome", "Glyoxysome"),
    ("[Gg]lyocosome", "Glyocosome"),
    ("[Zz]ona pellucida", "Zona pellucida"),
    ("[Kk]inetochore", "Kinetochore"),
    ("[Ss]pore", "Spore"),
    ("[Bb]acterial", "Bacterial"),
    ("[Ff]imbrium", "Fimbrium"),
    ("[Mm]elanosome", "Melanosome"),
    ("[Tt]elomere", "Telomere"),
    ("[Pp]odosome", "Podosome"),
    ("[Cc]ilium", "Cilium"),
    ("[Tt]richocyst", "Trichocyst"),
    ("[Hh]ydrogenosome", "Hydrogenosome"),
    ("[Ss]arcoplasmic [Rr]eticulum", "Sarcoplasmic Reticulum"),
    ("[Aa]xon", "Axon"),
    ("[Mm]icrosome", "Microsome"),
    ("[Aa]ngiotensin", "Angiotensin"),
    ("[Cc]hlorosome", "Chlorosome"),
    ("[tT]hylakoid", "Thylakoid"),
    ("[Ss]oluble", "Soluble"),
    ("[bB]ud", "Bud"),
    ("[Ff]lagellum", "Flagellum"),
    ("[Vv]iral", "Viral"),
];

const GO_PATTERNS: [(&str, &str); GO_COUNT] = [
    ("GO:0005634", "Nucleus"),
    ("GO:0007165", "Signal Transduction"),
    ("GO:0005737", "Cytoplasm"),
    ("GO:0005576", "Extracellular"),
    ("GO:0016021", "Integral to Membrane"),
    ("GO:0031012", "Extracellular Matrix"),
    ("GO:0005886", "Plasma Membrane"),
    ("GO:0005829", "Cytosol"),
    ("GO:0003677", "DNA binding"),
];

const GO_MINOR_PATTERNS: [(&str, &str); GO_MINOR_COUNT] = [
    ("GO:0009103", "lipopolysaccharide biosynthetic process"),
    ("GO:0030573", "Bile Aid Catabolic Process"),
    ("GO:0055114", "Oxidation Reduction"),
    ("GO:0033644", "Host Cell Membrane"),
];

const BRAIN_PATTERN: &str = "TISSUE=Brain";
const MUSCLE_PATTERN: &str = "TISSUE=Muscle";

/// Subcellular panel position of "Cell Membrane" (membrane rule)
pub const SCL_CELL_MEMBRANE: usize = 0;
/// Subcellular panel position of "Membrane" (membrane rule)
pub const SCL_MEMBRANE: usize = 1;
/// Subcellular panel position of "Cytoplasm" (cytoplasmic rule)
pub const SCL_CYTOPLASM: usize = 2;
/// Subcellular panel position of "Cytosol" (cytoplasmic rule)
pub const SCL_CYTOSOL: usize = 3;
/// Subcellular panel position of "Extracellular" (extracellular rule)
pub const SCL_EXTRACELLULAR: usize = 4;
/// Subcellular panel position of "Secreted" (extracellular rule)
pub const SCL_SECRETED: usize = 5;
/// Subcellular panel position of "Nucleus" (nuclear rule)
pub const SCL_NUCLEUS: usize = 6;
/// Subcellular panel position of "Cell Surface" (membrane rule)
pub const SCL_CELL_SURFACE: usize = 21;
/// Subcellular panel position of "Telomere" (nuclear rule)
pub const SCL_TELOMERE: usize = 30;
/// Subcellular panel position of "Soluble" (cytoplasmic rule)
pub const SCL_SOLUBLE: usize = 41;

/// Primary GO panel position of GO:0005634 Nucleus (nuclear rule)
pub const GO_NUCLEUS: usize = 0;
/// Primary GO panel position of GO:0005737 Cytoplasm (cytoplasmic rule)
pub const GO_CYTOPLASM: usize = 2;
/// Primary GO panel position of GO:0005576 Extracellular (extracellular rule)
pub const GO_EXTRACELLULAR: usize = 3;
/// Primary GO panel position of GO:0031012 Extracellular Matrix (extracellular rule)
pub const GO_ECM: usize = 5;
/// Primary GO panel position of GO:0005829 Cytosol (cytoplasmic rule)
pub const GO_CYTOSOL: usize = 7;
/// Primary GO panel position of GO:0003677 DNA binding (nuclear rule)
pub const GO_DNA_BIND: usize = 8;

/// One compiled pattern family with its display labels
pub struct PatternPanel {
    patterns: Vec<Regex>,
    labels: Vec<&'static str>,
}

impl PatternPanel {
    fn compile(table: &[(&'static str, &'static str)]) -> Result<Self> {
        let mut patterns = Vec::with_capacity(table.len());
        let mut labels = Vec::with_capacity(table.len());
        for (raw, label) in table {
            let re = Regex::new(raw).map_err(|source| SubcellError::Pattern {
                pattern: (*raw).to_string(),
                source,
            })?;
            patterns.push(re);
            labels.push(*label);
        }
        Ok(Self { patterns, labels })
    }

    /// Number of patterns in the panel
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when the panel holds no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Display label of the pattern at `index`
    pub fn label(&self, index: usize) -> &'static str {
        self.labels[index]
    }

    /// OR the panel's matches against `line` into `flags`
    ///
    /// `flags` must have the panel's length. Returns true when at least one
    /// pattern matched.
    pub fn mark_matches(&self, line: &[u8], flags: &mut [bool]) -> bool {
        debug_assert_eq!(flags.len(), self.patterns.len());
        let mut any = false;
        for (i, re) in self.patterns.iter().enumerate() {
            if re.is_match(line) {
                flags[i] = true;
                any = true;
            }
        }
        any
    }
}

/// The full compiled taxonomy: three panels plus the tissue patterns
pub struct CategoryTaxonomy {
    /// Free-text subcellular-location panel (`CC` blocks)
    pub subcellular: PatternPanel,
    /// Primary Gene Ontology panel (`DR GO` lines)
    pub go: PatternPanel,
    /// Minor Gene Ontology panel (`DR GO` lines)
    pub go_minor: PatternPanel,
    brain: Regex,
    muscle: Regex,
}

impl CategoryTaxonomy {
    /// Compile every pattern; any failure is startup-fatal
    pub fn compile() -> Result<Self> {
        let tissue = |raw: &str| {
            Regex::new(raw).map_err(|source| SubcellError::Pattern {
                pattern: raw.to_string(),
                source,
            })
        };
        Ok(Self {
            subcellular: PatternPanel::compile(&SUBCELLULAR_PATTERNS)?,
            go: PatternPanel::compile(&GO_PATTERNS)?,
            go_minor: PatternPanel::compile(&GO_MINOR_PATTERNS)?,
            brain: tissue(BRAIN_PATTERN)?,
            muscle: tissue(MUSCLE_PATTERN)?,
        })
    }

    /// Does the line carry a brain-tissue reference?
    pub fn is_brain_tissue(&self, line: &[u8]) -> bool {
        self.brain.is_match(line)
    }

    /// Does the line carry a muscle-tissue reference?
    pub fn is_muscle_tissue(&self, line: &[u8]) -> bool {
        self.muscle.is_match(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        let tax = CategoryTaxonomy::compile().unwrap();
        assert_eq!(tax.subcellular.len(), REGEX_COUNT);
        assert_eq!(tax.go.len(), GO_COUNT);
        assert_eq!(tax.go_minor.len(), GO_MINOR_COUNT);
    }

    #[test]
    fn rule_indices_match_labels() {
        let tax = CategoryTaxonomy::compile().unwrap();
        assert_eq!(tax.subcellular.label(SCL_CELL_MEMBRANE), "Cell Membrane");
        assert_eq!(tax.subcellular.label(SCL_MEMBRANE), "Membrane");
        assert_eq!(tax.subcellular.label(SCL_CYTOPLASM), "Cytoplasm");
        assert_eq!(tax.subcellular.label(SCL_CYTOSOL), "Cytosol");
        assert_eq!(tax.subcellular.label(SCL_EXTRACELLULAR), "Extracellular");
        assert_eq!(tax.subcellular.label(SCL_SECRETED), "Secreted");
        assert_eq!(tax.subcellular.label(SCL_NUCLEUS), "Nucleus");
        assert_eq!(tax.subcellular.label(SCL_CELL_SURFACE), "Cell Surface");
        assert_eq!(tax.subcellular.label(SCL_TELOMERE), "Telomere");
        assert_eq!(tax.subcellular.label(SCL_SOLUBLE), "Soluble");
        assert_eq!(tax.go.label(GO_NUCLEUS), "Nucleus");
        assert_eq!(tax.go.label(GO_CYTOPLASM), "Cytoplasm");
        assert_eq!(tax.go.label(GO_EXTRACELLULAR), "Extracellular");
        assert_eq!(tax.go.label(GO_ECM), "Extracellular Matrix");
        assert_eq!(tax.go.label(GO_CYTOSOL), "Cytosol");
        assert_eq!(tax.go.label(GO_DNA_BIND), "DNA binding");
    }

    #[test]
    fn case_variants_match() {
        let tax = CategoryTaxonomy::compile().unwrap();
        let mut flags = vec![false; tax.subcellular.len()];
        assert!(tax
            .subcellular
            .mark_matches(b"CC       cell membrane; single-pass.", &mut flags));
        assert!(flags[SCL_CELL_MEMBRANE]);
        assert!(flags[SCL_MEMBRANE]);
    }

    #[test]
    fn go_codes_match_as_substrings() {
        let tax = CategoryTaxonomy::compile().unwrap();
        let mut flags = vec![false; tax.go.len()];
        assert!(tax
            .go
            .mark_matches(b"DR   GO; GO:0005634; C:nucleus; IEA:UniProtKB-SubCell.", &mut flags));
        assert!(flags[GO_NUCLEUS]);
        assert!(!flags[GO_CYTOSOL]);
    }

    #[test]
    fn tissue_patterns() {
        let tax = CategoryTaxonomy::compile().unwrap();
        assert!(tax.is_brain_tissue(b"RC   TISSUE=Brain;"));
        assert!(tax.is_muscle_tissue(b"RC   TISSUE=Muscle, and Heart;"));
        assert!(!tax.is_brain_tissue(b"RC   TISSUE=Liver;"));
    }

    #[test]
    fn mark_matches_ors_into_existing_flags() {
        let tax = CategoryTaxonomy::compile().unwrap();
        let mut flags = vec![false; tax.subcellular.len()];
        tax.subcellular.mark_matches(b"Nucleus", &mut flags);
        tax.subcellular.mark_matches(b"Cytoplasm", &mut flags);
        assert!(flags[SCL_NUCLEUS]);
        assert!(flags[SCL_CYTOPLASM]);
    }
}
