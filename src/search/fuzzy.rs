//! Fuzzy line ranking across exported transcripts

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::path::{Path, PathBuf};

use crate::search::discover::discover_markdown_files;
use crate::search::ContextLine;
use crate::Result;

pub const HIGHLIGHT_OPEN: char = '[';
pub const HIGHLIGHT_CLOSE: char = ']';

/// Results kept in memory before pruning, as a multiple of the limit
const PRUNE_FACTOR: usize = 10;
const MIN_PRUNE_THRESHOLD: usize = 1000;

#[derive(Debug, Clone)]
pub struct FuzzyOptions {
    pub limit: usize,
    pub min_score: i64,
    pub context: usize,
    pub case_sensitive: bool,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            limit: 20,
            min_score: i64::MIN,
            context: 2,
            case_sensitive: false,
        }
    }
}

/// One scored line with its surrounding context.
///
/// The matched line appears in `lines` as the hit, with highlight markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Path relative to the search root
    pub path: PathBuf,
    pub line_number: usize,
    pub score: i64,
    pub lines: Vec<ContextLine>,
}

#[derive(Debug, Clone)]
pub struct FuzzyReport {
    pub matches: Vec<FuzzyMatch>,
    pub files_scanned: usize,
}

/// Accumulates matches and keeps memory bounded
struct TopMatches {
    matches: Vec<FuzzyMatch>,
    limit: usize,
    threshold: usize,
}

impl TopMatches {
    fn new(limit: usize) -> Self {
        Self {
            matches: Vec::new(),
            limit,
            threshold: limit.saturating_mul(PRUNE_FACTOR).max(MIN_PRUNE_THRESHOLD),
        }
    }

    fn push(&mut self, candidate: FuzzyMatch) {
        self.matches.push(candidate);
        if self.matches.len() > self.threshold {
            self.prune();
        }
    }

    // sort_by is stable, so equal scores keep encounter order
    fn prune(&mut self) {
        self.matches.sort_by(|a, b| b.score.cmp(&a.score));
        self.matches.truncate(self.limit);
    }

    fn finish(mut self) -> Vec<FuzzyMatch> {
        self.prune();
        self.matches
    }
}

/// Score every non-blank line under `root` against `query`
pub fn fuzzy_search(root: &Path, query: &str, options: &FuzzyOptions) -> Result<FuzzyReport> {
    let files = discover_markdown_files(root)?;
    let query = query.trim();

    if query.is_empty() || options.limit == 0 {
        return Ok(FuzzyReport {
            matches: Vec::new(),
            files_scanned: files.len(),
        });
    }

    let matcher = if options.case_sensitive {
        SkimMatcherV2::default().respect_case()
    } else {
        SkimMatcherV2::default().ignore_case()
    };

    let mut top = TopMatches::new(options.limit);
    for path in &files {
        let content = std::fs::read_to_string(path)?;
        let lines: Vec<&str> = content.lines().collect();
        let relative = path.strip_prefix(root).unwrap_or(path);

        for candidate in score_lines(&matcher, relative, &lines, query, options) {
            top.push(candidate);
        }
    }

    Ok(FuzzyReport {
        matches: top.finish(),
        files_scanned: files.len(),
    })
}

fn score_lines(
    matcher: &SkimMatcherV2,
    path: &Path,
    lines: &[&str],
    query: &str,
    options: &FuzzyOptions,
) -> Vec<FuzzyMatch> {
    let mut found = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((score, indices)) = matcher.fuzzy_indices(line, query) else {
            continue;
        };
        if score < options.min_score {
            continue;
        }

        let start = index.saturating_sub(options.context);
        let end = (index + options.context).min(lines.len() - 1);
        let window = (start..=end)
            .map(|i| {
                if i == index {
                    ContextLine::hit(i + 1, highlight(line, &indices))
                } else {
                    ContextLine::context(i + 1, lines[i].to_string())
                }
            })
            .collect();

        found.push(FuzzyMatch {
            path: path.to_path_buf(),
            line_number: index + 1,
            score,
            lines: window,
        });
    }

    found
}

/// Wrap each run of matched characters in highlight markers.
///
/// `indices` are character positions, ascending.
pub fn highlight(line: &str, indices: &[usize]) -> String {
    let mut output = String::with_capacity(line.len() + indices.len() * 2);
    let mut in_run = false;

    for (position, ch) in line.chars().enumerate() {
        let matched = indices.binary_search(&position).is_ok();
        if matched && !in_run {
            output.push(HIGHLIGHT_OPEN);
        } else if !matched && in_run {
            output.push(HIGHLIGHT_CLOSE);
        }
        in_run = matched;
        output.push(ch);
    }

    if in_run {
        output.push(HIGHLIGHT_CLOSE);
    }

    output
}
