//! Substring search with merged context blocks

use std::collections::VecDeque;
use std::convert::Infallible;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::search::discover::discover_markdown_files;
use crate::search::ContextLine;
use crate::Result;

#[derive(Debug, Clone)]
pub struct ExactOptions {
    pub case_sensitive: bool,
    pub context: usize,
}

/// Contiguous lines around one or more hits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchBlock {
    pub lines: Vec<ContextLine>,
}

impl MatchBlock {
    pub fn start(&self) -> usize {
        self.lines.first().map(|l| l.number).unwrap_or(0)
    }

    pub fn end(&self) -> usize {
        self.lines.last().map(|l| l.number).unwrap_or(0)
    }

    pub fn hits(&self) -> impl Iterator<Item = &ContextLine> {
        self.lines.iter().filter(|l| l.is_hit)
    }
}

#[derive(Debug, Clone)]
pub struct FileMatches {
    /// Path relative to the search root
    pub path: PathBuf,
    pub blocks: Vec<MatchBlock>,
}

#[derive(Debug, Clone)]
pub struct ExactReport {
    pub files: Vec<FileMatches>,
    pub files_scanned: usize,
}

/// Case-aware substring test. An empty query matches nothing.
pub struct LineMatcher {
    needle: String,
    case_sensitive: bool,
}

impl LineMatcher {
    pub fn new(query: &str, case_sensitive: bool) -> Self {
        let needle = if case_sensitive {
            query.to_string()
        } else {
            query.to_lowercase()
        };
        Self {
            needle,
            case_sensitive,
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        if self.needle.is_empty() {
            return false;
        }
        if self.case_sensitive {
            line.contains(&self.needle)
        } else {
            line.to_lowercase().contains(&self.needle)
        }
    }
}

/// Group hits into blocks with `context` lines on either side.
///
/// A block stays open while a new hit lands inside its trailing context, so
/// overlapping windows merge. Lines already emitted in an earlier block are
/// never repeated.
pub fn scan_lines<I>(lines: I, matcher: &LineMatcher, context: usize) -> Vec<MatchBlock>
where
    I: IntoIterator<Item = String>,
{
    let lines = lines.into_iter().map(Ok::<_, Infallible>);
    match try_scan_lines(lines, matcher, context) {
        Ok(blocks) => blocks,
        Err(never) => match never {},
    }
}

/// Like [`scan_lines`] over fallible lines, stopping at the first error
pub fn try_scan_lines<I, E>(
    lines: I,
    matcher: &LineMatcher,
    context: usize,
) -> std::result::Result<Vec<MatchBlock>, E>
where
    I: IntoIterator<Item = std::result::Result<String, E>>,
{
    let mut blocks = Vec::new();
    let mut before: VecDeque<ContextLine> = VecDeque::with_capacity(context);
    let mut open: Option<MatchBlock> = None;
    let mut pending_after = 0usize;
    let mut last_emitted = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let number = index + 1;
        let text = line?;

        if matcher.is_match(&text) {
            let block = open.get_or_insert_with(|| MatchBlock {
                lines: before
                    .iter()
                    .filter(|l| l.number > last_emitted)
                    .cloned()
                    .collect(),
            });
            block.lines.push(ContextLine::hit(number, text.clone()));
            pending_after = context;
        } else if pending_after > 0 {
            if let Some(block) = open.as_mut() {
                block.lines.push(ContextLine::context(number, text.clone()));
            }
            pending_after -= 1;
        } else if let Some(block) = open.take() {
            last_emitted = block.end();
            blocks.push(block);
        }

        if context > 0 {
            if before.len() == context {
                before.pop_front();
            }
            before.push_back(ContextLine::context(number, text));
        }
    }

    if let Some(block) = open {
        blocks.push(block);
    }

    Ok(blocks)
}

pub fn search_file(path: &Path, matcher: &LineMatcher, context: usize) -> Result<Vec<MatchBlock>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(try_scan_lines(reader.lines(), matcher, context)?)
}

/// Scan every Markdown file under `root` for `query`
pub fn exact_search(root: &Path, query: &str, options: &ExactOptions) -> Result<ExactReport> {
    let files = discover_markdown_files(root)?;
    let matcher = LineMatcher::new(query, options.case_sensitive);

    let mut matches = Vec::new();
    for path in &files {
        let blocks = search_file(path, &matcher, options.context)?;
        if blocks.is_empty() {
            continue;
        }
        tracing::debug!("{} blocks in {}", blocks.len(), path.display());
        matches.push(FileMatches {
            path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
            blocks,
        });
    }

    Ok(ExactReport {
        files: matches,
        files_scanned: files.len(),
    })
}
