//! Plain-text rendering of search results

use std::io::{self, Write};

use crate::search::{ContextLine, ExactReport, FuzzyReport};

fn write_line(out: &mut impl Write, line: &ContextLine) -> io::Result<()> {
    let marker = if line.is_hit { '>' } else { ' ' };
    writeln!(out, "{} {:>4}: {}", marker, line.number, line.text)
}

pub fn write_exact_report(out: &mut impl Write, report: &ExactReport) -> io::Result<()> {
    for file in &report.files {
        writeln!(out, "{}", file.path.display())?;
        for (i, block) in file.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(out, "--")?;
            }
            for line in &block.lines {
                write_line(out, line)?;
            }
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Found matches in {} of {} files",
        report.files.len(),
        report.files_scanned
    )
}

pub fn write_fuzzy_report(out: &mut impl Write, report: &FuzzyReport) -> io::Result<()> {
    for found in &report.matches {
        writeln!(
            out,
            "{}:{} (score {})",
            found.path.display(),
            found.line_number,
            found.score
        )?;
        for line in &found.lines {
            write_line(out, line)?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Showing {} fuzzy matches across {} files",
        report.matches.len(),
        report.files_scanned
    )
}
