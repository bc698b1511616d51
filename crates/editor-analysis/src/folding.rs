//! Code folding
//!
//! Detects foldable regions from the text of a [`TextBuffer`] and keeps the folded /
//! expanded state of each region, keyed by the line the region starts on.
//!
//! A line can start a fold in three ways:
//!
//! - its trimmed text ends with `{` (brace fold),
//! - it is a declaration whose opening brace follows within a few non-empty lines (the fold
//!   then starts on the brace line),
//! - the next non-blank line is indented deeper (indentation fold).
//!
//! A region stores the *last hidden line*. For brace folds that is the line before the
//! closing brace, so the closer stays visible; indentation folds hide the whole block.
//!
//! Fold state is only changed by explicit calls. Edits made to the text behind the engine's
//! back do not move regions; see [`FoldingEngine::apply_line_delta`] and
//! [`FoldingEngine::refresh`] for keeping them in place.

use crate::line_index::TextBuffer;
use crate::pairing::is_word_char;
use crate::scanner::{CharClass, ContextScanner};
use editor_analysis_lang::LanguageConfig;
use std::collections::BTreeMap;

/// Qualifiers that may follow the parameter list of a function signature.
const TRAILING_QUALIFIERS: &[&str] = &["const", "override", "final", "noexcept", "mutable"];

/// How a region was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldKind {
    /// Delimited by `{` ... `}`.
    Brace,
    /// Delimited by indentation.
    Indent,
}

/// Fold region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    /// Line that stays visible and carries the fold marker.
    pub start_line: usize,
    /// Last line hidden when folded (inclusive).
    pub end_line: usize,
    /// Whether folded
    pub folded: bool,
    /// How the region was detected.
    pub kind: FoldKind,
}

impl FoldRegion {
    /// Returns `true` if this region is folded and hides `line`.
    pub fn hides(&self, line: usize) -> bool {
        self.folded && self.start_line < line && line <= self.end_line
    }

    /// Number of lines hidden while folded.
    pub fn hidden_len(&self) -> usize {
        self.end_line.saturating_sub(self.start_line)
    }
}

/// Fold detection and fold state for one document.
#[derive(Debug, Clone, Default)]
pub struct FoldingEngine {
    config: LanguageConfig,
    regions: BTreeMap<usize, FoldRegion>,
}

impl FoldingEngine {
    /// Create an engine with no folded regions.
    pub fn new(config: LanguageConfig) -> Self {
        Self {
            config,
            regions: BTreeMap::new(),
        }
    }

    /// Indentation level of `text`, `None` for blank lines.
    pub fn indent_level(&self, text: &str) -> Option<usize> {
        if text.trim().is_empty() {
            return None;
        }
        let tab_width = self.config.folding.tab_width.max(1);
        let columns: usize = text
            .chars()
            .take_while(|ch| ch.is_whitespace())
            .map(|ch| if ch == '\t' { tab_width } else { 1 })
            .sum();
        Some(columns / tab_width)
    }

    fn level_of<B: TextBuffer + ?Sized>(&self, buf: &B, line: usize) -> Option<usize> {
        buf.line_text(line)
            .and_then(|text| self.indent_level(&text))
    }

    fn is_declaration(&self, trimmed: &str) -> bool {
        if trimmed.is_empty() || trimmed.contains(';') {
            return false;
        }

        let keyword = trimmed
            .split(|ch: char| !is_word_char(ch))
            .filter(|word| !word.is_empty())
            .take(4)
            .any(|word| self.config.folding.is_declaration_keyword(word));
        if keyword {
            return true;
        }

        let mut signature = trimmed;
        while let Some(rest) = TRAILING_QUALIFIERS
            .iter()
            .find_map(|qualifier| signature.strip_suffix(qualifier))
        {
            signature = rest.trim_end();
        }
        signature.contains('(') && signature.ends_with(')')
    }

    /// Line holding the opening brace for a fold that starts at `line`, if it is a brace
    /// fold.
    fn brace_line<B: TextBuffer + ?Sized>(&self, buf: &B, line: usize) -> Option<usize> {
        let text = buf.line_text(line)?;
        let trimmed = text.trim();
        if trimmed.ends_with('{') {
            return Some(line);
        }
        if !self.is_declaration(trimmed) {
            return None;
        }

        let mut seen = 0;
        let mut next = line + 1;
        while seen < self.config.folding.declaration_lookahead && next < buf.line_count() {
            let text = buf.line_text(next)?;
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                seen += 1;
                if trimmed.ends_with('{') {
                    return Some(next);
                }
                if trimmed.ends_with(';') || trimmed.ends_with('}') {
                    return None;
                }
            }
            next += 1;
        }
        None
    }

    fn indent_foldable<B: TextBuffer + ?Sized>(&self, buf: &B, line: usize) -> bool {
        let Some(level) = self.level_of(buf, line) else {
            return false;
        };
        if level == 0 && !self.config.folding.fold_top_level_indent {
            return false;
        }
        (line + 1..buf.line_count())
            .find_map(|next| self.level_of(buf, next))
            .is_some_and(|next_level| next_level > level)
    }

    /// Returns `true` if a fold can start at (or, for declarations, be anchored from) `line`.
    pub fn is_foldable<B: TextBuffer + ?Sized>(&self, buf: &B, line: usize) -> bool {
        self.fold_start(buf, line).is_some()
    }

    /// The line a fold requested at `line` is keyed by: the brace line for declarations
    /// whose brace sits on a later line, `line` itself otherwise.
    pub fn fold_start<B: TextBuffer + ?Sized>(&self, buf: &B, line: usize) -> Option<usize> {
        if line >= buf.line_count() {
            return None;
        }
        if let Some(brace) = self.brace_line(buf, line) {
            return Some(brace);
        }
        self.indent_foldable(buf, line).then_some(line)
    }

    /// Last line of the fold starting at `start_line`.
    ///
    /// For brace folds this is the line of the matching `}`; for indentation folds the line
    /// before indentation returns to the start level. If the document ends first, the last
    /// line. Lines that cannot start a fold return themselves.
    pub fn compute_fold_end<B: TextBuffer + ?Sized>(&self, buf: &B, start_line: usize) -> usize {
        let last = buf.line_count().saturating_sub(1);
        if start_line > last {
            return last;
        }
        if let Some(brace) = self.brace_line(buf, start_line) {
            return self.brace_fold_end(buf, brace).0;
        }
        if self.indent_foldable(buf, start_line) {
            return self.indent_fold_end(buf, start_line);
        }
        start_line
    }

    /// Closing line of the brace block opened on `brace_line`, and whether it was closed.
    fn brace_fold_end<B: TextBuffer + ?Sized>(&self, buf: &B, brace_line: usize) -> (usize, bool) {
        let count = buf.line_count();
        let mut scanner = ContextScanner::new(&self.config);
        let mut depth = 0usize;

        for line in brace_line..count {
            let Some(text) = buf.line_text(line) else {
                break;
            };
            for (byte, ch) in text.char_indices() {
                if scanner.feed(ch, &text[byte..]) != CharClass::Code {
                    continue;
                }
                match ch {
                    '{' => depth += 1,
                    // Closers before the first opener (`} else {`) belong to another block.
                    '}' if depth > 0 => {
                        depth -= 1;
                        if depth == 0 && line > brace_line {
                            return (line, true);
                        }
                    }
                    _ => {}
                }
            }
            if depth == 0 {
                // The trailing `{` was inside a string or comment.
                return (line, true);
            }
            scanner.feed('\n', "\n");
        }

        (count.saturating_sub(1), false)
    }

    fn indent_fold_end<B: TextBuffer + ?Sized>(&self, buf: &B, start_line: usize) -> usize {
        let count = buf.line_count();
        let Some(level) = self.level_of(buf, start_line) else {
            return start_line;
        };
        for line in start_line + 1..count {
            if self.level_of(buf, line).is_some_and(|l| l <= level) {
                return line - 1;
            }
        }
        count.saturating_sub(1)
    }

    /// The (expanded) region a fold request at `line` refers to.
    pub fn region_at<B: TextBuffer + ?Sized>(&self, buf: &B, line: usize) -> Option<FoldRegion> {
        if line >= buf.line_count() {
            return None;
        }
        if let Some(brace) = self.brace_line(buf, line) {
            let (end, closed) = self.brace_fold_end(buf, brace);
            let end_line = if closed {
                end.saturating_sub(1).max(brace)
            } else {
                end
            };
            return Some(FoldRegion {
                start_line: brace,
                end_line,
                folded: false,
                kind: FoldKind::Brace,
            });
        }
        if self.indent_foldable(buf, line) {
            return Some(FoldRegion {
                start_line: line,
                end_line: self.indent_fold_end(buf, line),
                folded: false,
                kind: FoldKind::Indent,
            });
        }
        None
    }

    /// Returns `true` if the region keyed by `line` is folded.
    pub fn is_folded(&self, line: usize) -> bool {
        self.regions.get(&line).is_some_and(|region| region.folded)
    }

    /// Fold or unfold the region requested at `line`. Returns the region's start line, or
    /// `None` if nothing can be folded there.
    pub fn set_folded<B: TextBuffer + ?Sized>(
        &mut self,
        buf: &B,
        line: usize,
        folded: bool,
    ) -> Option<usize> {
        let mut region = self.region_at(buf, line)?;
        region.folded = folded;
        let start = region.start_line;
        log::debug!(
            "{} lines {}..={} ({:?})",
            if folded { "fold" } else { "unfold" },
            start,
            region.end_line,
            region.kind
        );
        self.regions.insert(start, region);
        Some(start)
    }

    /// Flip the fold state of the region requested at `line` and recompute its end.
    pub fn toggle_fold<B: TextBuffer + ?Sized>(&mut self, buf: &B, line: usize) -> Option<usize> {
        let start = self.fold_start(buf, line)?;
        let folded = !self.is_folded(start);
        self.set_folded(buf, line, folded)
    }

    /// Fold every foldable region.
    pub fn fold_all<B: TextBuffer + ?Sized>(&mut self, buf: &B) {
        for line in 0..buf.line_count() {
            if self.is_folded(line) {
                continue;
            }
            if let Some(mut region) = self.region_at(buf, line) {
                region.folded = true;
                self.regions.insert(region.start_line, region);
            }
        }
        log::debug!("fold all: {} regions folded", self.regions.len());
    }

    /// Unfold everything and forget all regions.
    pub fn unfold_all(&mut self) {
        self.regions.clear();
    }

    /// Returns `true` unless a folded region hides `line`.
    pub fn is_line_visible(&self, line: usize) -> bool {
        !self
            .regions
            .range(..line)
            .any(|(_, region)| region.hides(line))
    }

    /// Hidden lines as sorted, disjoint, inclusive ranges.
    pub fn hidden_ranges(&self) -> Vec<(usize, usize)> {
        let mut merged: Vec<(usize, usize)> = Vec::new();
        for region in self.regions.values() {
            if !region.folded || region.end_line <= region.start_line {
                continue;
            }
            let (start, end) = (region.start_line + 1, region.end_line);
            match merged.last_mut() {
                Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        merged
    }

    /// Total number of hidden lines.
    pub fn hidden_line_count(&self) -> usize {
        self.hidden_ranges()
            .iter()
            .map(|(start, end)| end - start + 1)
            .sum()
    }

    /// Visible lines among `0..total_lines`.
    pub fn visible_lines(&self, total_lines: usize) -> Vec<usize> {
        let hidden = self.hidden_ranges();
        let mut ranges = hidden.iter().peekable();
        (0..total_lines)
            .filter(|&line| {
                while ranges.next_if(|(_, end)| *end < line).is_some() {}
                !ranges
                    .peek()
                    .is_some_and(|(start, end)| *start <= line && line <= *end)
            })
            .collect()
    }

    /// Row of `line` on screen, or `None` if it is hidden.
    pub fn logical_to_visual(&self, line: usize) -> Option<usize> {
        let mut hidden_before = 0;
        for (start, end) in self.hidden_ranges() {
            if line < start {
                break;
            }
            if line <= end {
                return None;
            }
            hidden_before += end - start + 1;
        }
        Some(line - hidden_before)
    }

    /// Logical line shown on screen row `row`.
    pub fn visual_to_logical(&self, row: usize) -> usize {
        let mut logical = row;
        for (start, end) in self.hidden_ranges() {
            if start > logical {
                break;
            }
            logical += end - start + 1;
        }
        logical
    }

    /// All known regions (folded or not), ordered by start line.
    pub fn regions(&self) -> impl Iterator<Item = &FoldRegion> {
        self.regions.values()
    }

    /// Lines on which [`FoldingEngine::is_foldable`] holds.
    pub fn foldable_lines<B: TextBuffer + ?Sized>(&self, buf: &B) -> Vec<usize> {
        (0..buf.line_count())
            .filter(|&line| self.is_foldable(buf, line))
            .collect()
    }

    /// Shift regions for an edit that changed the number of lines.
    ///
    /// - `edit_line` is the first line whose start moved (pre-edit numbering).
    /// - `line_delta` is the net change in line count.
    ///
    /// Regions starting at or after `edit_line` move; regions spanning it grow or shrink.
    /// When lines were removed, regions starting on one of the `-line_delta` lines from
    /// `edit_line` on lost their start line and are dropped.
    pub fn apply_line_delta(&mut self, edit_line: usize, line_delta: isize) {
        if line_delta == 0 || self.regions.is_empty() {
            return;
        }

        let removed = edit_line..edit_line.saturating_add(line_delta.unsigned_abs());
        let shift = |line: usize| line.saturating_add_signed(line_delta);
        for (_, mut region) in std::mem::take(&mut self.regions) {
            if line_delta < 0 && removed.contains(&region.start_line) {
                log::debug!("dropping fold at removed line {}", region.start_line);
                continue;
            }
            if edit_line <= region.start_line {
                region.start_line = shift(region.start_line);
                region.end_line = shift(region.end_line);
            } else if edit_line <= region.end_line {
                region.end_line = shift(region.end_line).max(region.start_line);
            }
            self.regions.entry(region.start_line).or_insert(region);
        }
    }

    /// Drop regions past the end of a document with `line_count` lines and clamp the rest.
    pub fn clamp_to_line_count(&mut self, line_count: usize) {
        let last = line_count.saturating_sub(1);
        self.regions.retain(|&start, _| start <= last);
        for region in self.regions.values_mut() {
            region.end_line = region.end_line.min(last);
        }
    }

    /// Recompute the end of every known region against `buf`, dropping regions whose start
    /// line no longer starts a fold. Fold state is kept.
    pub fn refresh<B: TextBuffer + ?Sized>(&mut self, buf: &B) {
        let old = std::mem::take(&mut self.regions);
        for (start, region) in old {
            match self.region_at(buf, start) {
                Some(mut fresh) if fresh.start_line == start => {
                    fresh.folded = region.folded;
                    self.regions.insert(start, fresh);
                }
                _ => log::debug!("dropping stale fold at line {start}"),
            }
        }
    }
}
