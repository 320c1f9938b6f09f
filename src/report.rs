//! End-of-run textual report
//!
//! Renders the frozen [`TallyBank`] and [`ScanStats`] into the summary
//! text: a full section for the human population, a full section for all
//! records, compartment sections for the brain and muscle tissues, scan
//! statistics, and any warnings. Field order follows the historical tool
//! so existing downstream scripts keep working.

use crate::classify::Census;
use crate::tally::PopulationCounts;
use crate::taxonomy::CategoryTaxonomy;
use crate::types::Population;
use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

const SEPARATOR: &str = "----------------------------------------";

/// Render the full end-of-run report
pub fn render(
    census: &Census,
    taxonomy: &CategoryTaxonomy,
    input: &Path,
    blocksize: usize,
    strategy: &str,
    elapsed: Duration,
) -> String {
    let mut out = String::new();
    let stats = &census.stats;

    let _ = writeln!(out, "{SEPARATOR}");
    let _ = writeln!(out, "processing {}", input.display());
    let _ = writeln!(out, "the I/O strategy is {strategy}");
    let _ = writeln!(out, "The longest line has {} characters", stats.max_line_len);
    let _ = writeln!(out, "There are a total of {} lines", stats.lines);

    let _ = writeln!(out, "--------HUMAN PROTEINS--------------------");
    population_section(
        &mut out,
        "human",
        census.tallies.population(Population::Human),
        taxonomy,
    );
    let _ = writeln!(out, "{SEPARATOR}");

    let all = census.tallies.population(Population::All);
    let _ = writeln!(out, "There are {} total proteins", all.records);
    population_section(&mut out, "total", all, taxonomy);
    let _ = writeln!(out, "{SEPARATOR}");

    for population in [Population::Brain, Population::Muscle] {
        let counts = census.tallies.population(population);
        let name = population.name();
        let _ = writeln!(out, "total {name} proteins: {}", counts.records);
        let _ = writeln!(out, "{name} nuclear proteins: {}", counts.nuclear);
        let _ = writeln!(out, "{name} cytoplasmic proteins: {}", counts.cytoplasmic);
        let _ = writeln!(out, "{name} membrane proteins: {}", counts.membrane);
        let _ = writeln!(out, "{name} extracellular proteins: {}", counts.extracellular);
        let _ = writeln!(out, "{SEPARATOR}");
    }

    let _ = writeln!(
        out,
        "The protein with the most lines has {} lines",
        stats.max_record_lines
    );
    let _ = writeln!(out, "BLOCKSIZE IS {blocksize}");
    let _ = writeln!(out, "it took {} to run.", format_duration(elapsed));
    let _ = writeln!(out, "{SEPARATOR}");

    if stats.has_warnings() {
        if stats.corrupt_input {
            let _ = writeln!(out, "WARNING: input ended without a line terminator (corrupt input)");
        }
        if stats.dropped_partial_record {
            let _ = writeln!(out, "WARNING: dropped partial record at end of input");
        }
        if stats.truncated_lines > 0 {
            let _ = writeln!(
                out,
                "WARNING: {} line(s) exceeded the length cap and were truncated",
                stats.truncated_lines
            );
        }
        if let Some(err) = &stats.io_error {
            let _ = writeln!(out, "WARNING: scan incomplete, read failed: {err}");
        }
        let _ = writeln!(out, "{SEPARATOR}");
    }

    out
}

fn population_section(
    out: &mut String,
    name: &str,
    counts: &PopulationCounts,
    taxonomy: &CategoryTaxonomy,
) {
    if name == "human" {
        let _ = writeln!(out, "human proteins: {}", counts.records);
    }
    let _ = writeln!(out, "{name} FT TRANSMEM proteins: {}", counts.transmem);
    let _ = writeln!(out, "{name} FT INTRAMEM proteins: {}", counts.intramem);
    let _ = writeln!(
        out,
        "{name} proteins with covalent lipid binding (FT LIPID): {}",
        counts.lipid
    );
    let _ = writeln!(
        out,
        "{name} proteins both intra- & trans- membrane: {}",
        counts.intra_and_trans
    );
    let _ = writeln!(
        out,
        "{name} FT SIGNAL signal peptide containing proteins: {}",
        counts.signal
    );
    let _ = writeln!(
        out,
        "{name} proteins with both signal sequence and transmembrane: {}",
        counts.signal_and_transmem
    );
    let _ = writeln!(out, "{name} proteins with DNA_BIND: {}", counts.dna_bind);

    for (i, count) in counts.subcellular.iter().enumerate() {
        let _ = writeln!(
            out,
            "{i}: {name} proteins with CC SUBCELLULAR LOCATION \"{}\": {count}",
            taxonomy.subcellular.label(i)
        );
    }
    for (i, count) in counts.go.iter().enumerate() {
        let _ = writeln!(
            out,
            "{i}: {name} proteins with Gene Ontology \"{}\": {count}",
            taxonomy.go.label(i)
        );
    }
    for (i, count) in counts.go_minor.iter().enumerate() {
        let _ = writeln!(
            out,
            "{i}: {name} proteins with minor Gene Ontology \"{}\": {count}",
            taxonomy.go_minor.label(i)
        );
    }

    let _ = writeln!(
        out,
        "{name} proteins with no CC SUBCELLULAR LOCATION annotation: {}",
        counts.no_subcellular
    );
    let _ = writeln!(out, "{name} total membrane proteins: {}", counts.membrane);
    let _ = writeln!(out, "{name} cytoplasmic proteins: {}", counts.cytoplasmic);
    let _ = writeln!(out, "{name} extracellular proteins: {}", counts.extracellular);
    let _ = writeln!(out, "{name} nuclear proteins: {}", counts.nuclear);
    let _ = writeln!(out, "REMAINDER {name} proteins: {}", counts.remainder);
}

/// Humanize a duration at nanosecond to second granularity
pub fn format_duration(elapsed: Duration) -> String {
    let nanos = elapsed.as_nanos();
    if nanos < 1_000 {
        format!("{nanos} nsec")
    } else if nanos < 1_000_000 {
        format!("{:.3} usec", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.3} msec", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.3} sec", elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{run_census, Census};
    use crate::io::{ChunkSource, LineSegmenter};
    use std::io::Cursor;

    fn census_of(data: &[u8], taxonomy: &CategoryTaxonomy) -> Census {
        let source = ChunkSource::from_reader(Cursor::new(data.to_vec()), 64);
        run_census(LineSegmenter::new(source), taxonomy)
    }

    #[test]
    fn report_contains_all_sections() {
        let taxonomy = CategoryTaxonomy::compile().unwrap();
        let data = b"OS   Homo sapiens (Human).\nFT   TRANSMEM        35..58\n//\n";
        let census = census_of(data, &taxonomy);
        let text = render(
            &census,
            &taxonomy,
            Path::new("test.dat"),
            16384,
            "read",
            Duration::from_millis(12),
        );
        assert!(text.contains("processing test.dat"));
        assert!(text.contains("human proteins: 1"));
        assert!(text.contains("There are 1 total proteins"));
        assert!(text.contains("human FT TRANSMEM proteins: 1"));
        assert!(text.contains("total brain proteins: 0"));
        assert!(text.contains("BLOCKSIZE IS 16384"));
        assert!(!text.contains("WARNING"));
    }

    #[test]
    fn corrupt_input_warning_appears() {
        let taxonomy = CategoryTaxonomy::compile().unwrap();
        let data = b"OS   Homo sapiens (Human).\nFT   TRANSMEM"; // no final newline
        let census = census_of(data, &taxonomy);
        let text = render(
            &census,
            &taxonomy,
            Path::new("broken.dat"),
            16384,
            "read",
            Duration::from_millis(1),
        );
        assert!(text.contains("WARNING: input ended without a line terminator"));
        assert!(text.contains("WARNING: dropped partial record"));
    }

    #[test]
    fn duration_ladder() {
        assert_eq!(format_duration(Duration::from_nanos(512)), "512 nsec");
        assert_eq!(format_duration(Duration::from_micros(3)), "3.000 usec");
        assert_eq!(format_duration(Duration::from_millis(250)), "250.000 msec");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.000 sec");
    }
}
