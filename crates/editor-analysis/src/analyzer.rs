//! Per-document analysis facade
//!
//! [`DocumentAnalyzer`] owns the text of one open document together with its bracket index
//! and fold state, keeps them consistent across edits, and notifies subscribers after every
//! mutation.
//!
//! # Example
//!
//! ```rust
//! use editor_analysis::{DocumentAnalyzer, LanguageConfig};
//!
//! let mut analyzer = DocumentAnalyzer::new("fn main() {\n    body();\n}\n", LanguageConfig::rust());
//!
//! analyzer.subscribe(|change| {
//!     println!("{} -> {}: {:?}", change.old_version, change.new_version, change.kind);
//! });
//!
//! let pair = analyzer.match_at_cursor(10).unwrap();
//! assert_eq!(pair.close_pos, Some(24));
//!
//! analyzer.toggle_fold(0).unwrap();
//! assert!(!analyzer.is_line_visible(1));
//! assert_eq!(analyzer.version(), 1);
//! ```

use crate::bracket_index::{BracketIndex, BracketPair};
use crate::bracket_pairing::{BracketPairing, TypedBracket};
use crate::error::AnalysisError;
use crate::folding::{FoldRegion, FoldingEngine};
use crate::line_index::LineIndex;
use crate::pairing::TypedCharAction;
use crate::palette::{self, Color};
use crate::quote_pairing::{QuotePairing, TypedChar};
use editor_analysis_lang::LanguageConfig;
use std::ops::Range;

/// Analyzer behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Rebuild the bracket index after every text change. When off, call
    /// [`DocumentAnalyzer::rebuild_brackets`] before querying brackets.
    pub rebuild_on_change: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            rebuild_on_change: true,
        }
    }
}

/// What changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisChangeKind {
    /// The whole text was replaced.
    TextReplaced,
    /// An edit was applied.
    TextEdited {
        /// Line the edit started on.
        line: usize,
        /// Net change in line count.
        line_delta: isize,
    },
    /// The bracket index was rebuilt explicitly.
    BracketsRebuilt,
    /// Fold state changed.
    FoldingChanged,
}

/// Change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisChange {
    /// Change type
    pub kind: AnalysisChangeKind,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
}

/// Change callback function type
pub type AnalysisChangeCallback = Box<dyn FnMut(&AnalysisChange) + Send>;

/// Analysis state for one open document.
///
/// Mutations go through the analyzer so that the bracket index and the fold state follow
/// the text:
///
/// - [`apply_edit`](Self::apply_edit) shifts folds below the edit and re-validates them,
/// - [`set_text`](Self::set_text) keeps fold keys as they are (clamped to the new length),
/// - each mutation increments the version and calls every subscriber once.
pub struct DocumentAnalyzer {
    config: LanguageConfig,
    options: AnalyzerOptions,
    buffer: LineIndex,
    brackets: BracketIndex,
    quotes: QuotePairing,
    bracket_pairing: BracketPairing,
    folding: FoldingEngine,
    version: u64,
    brackets_stale: bool,
    callbacks: Vec<AnalysisChangeCallback>,
}

impl DocumentAnalyzer {
    /// Analyze `text` with default options.
    pub fn new(text: &str, config: LanguageConfig) -> Self {
        Self::with_options(text, config, AnalyzerOptions::default())
    }

    /// Analyze `text`.
    pub fn with_options(text: &str, config: LanguageConfig, options: AnalyzerOptions) -> Self {
        let mut analyzer = Self {
            brackets: BracketIndex::new(config.clone()),
            quotes: QuotePairing::new(config.clone()),
            bracket_pairing: BracketPairing::new(config.clone()),
            folding: FoldingEngine::new(config.clone()),
            config,
            options,
            buffer: LineIndex::from_text(text),
            version: 0,
            brackets_stale: true,
            callbacks: Vec::new(),
        };
        analyzer.rebuild_brackets_quietly();
        analyzer
    }

    /// Language configuration.
    pub fn config(&self) -> &LanguageConfig {
        &self.config
    }

    /// Current options.
    pub fn options(&self) -> AnalyzerOptions {
        self.options
    }

    /// Document text.
    pub fn text(&self) -> String {
        self.buffer.get_text()
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// The underlying text buffer.
    pub fn buffer(&self) -> &LineIndex {
        &self.buffer
    }

    /// Character offset of a line/column position.
    pub fn offset_at(&self, line: usize, column: usize) -> Result<usize, AnalysisError> {
        self.buffer.checked_offset(line, column)
    }

    /// Line/column position of a character offset.
    pub fn position_at(&self, offset: usize) -> Result<(usize, usize), AnalysisError> {
        self.buffer.checked_position(offset)
    }

    /// The bracket index. Stale after edits while `rebuild_on_change` is off.
    pub fn brackets(&self) -> &BracketIndex {
        &self.brackets
    }

    /// Whether text changed since the bracket index was last rebuilt.
    pub fn brackets_stale(&self) -> bool {
        self.brackets_stale
    }

    /// The fold engine.
    pub fn folding(&self) -> &FoldingEngine {
        &self.folding
    }

    /// Replace the whole text.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = LineIndex::from_text(text);
        self.brackets_stale = true;
        self.folding.clamp_to_line_count(self.buffer.line_count());
        self.after_text_change();
        self.mark_modified(AnalysisChangeKind::TextReplaced);
    }

    /// Replace `removed_len` characters at `offset` with `inserted`.
    pub fn apply_edit(
        &mut self,
        offset: usize,
        removed_len: usize,
        inserted: &str,
    ) -> Result<(), AnalysisError> {
        let end = offset.saturating_add(removed_len);
        if end > self.buffer.char_count() {
            return Err(AnalysisError::InvalidRange { start: offset, end });
        }

        let (line, column) = self.buffer.char_offset_to_position(offset);
        let removed_lines = self.buffer.newlines_in(offset, end);
        let inserted_lines = inserted.matches('\n').count();
        let line_delta = inserted_lines as isize - removed_lines as isize;

        self.buffer.delete(offset, removed_len);
        self.buffer.insert(offset, inserted);
        self.brackets_stale = true;

        if line_delta != 0 {
            // Text before the cursor stays on `line`; everything after it moves.
            let edit_line = if column == 0 { line } else { line + 1 };
            self.folding.apply_line_delta(edit_line, line_delta);
        }
        self.folding.clamp_to_line_count(self.buffer.line_count());
        self.folding.refresh(&self.buffer);

        self.after_text_change();
        self.mark_modified(AnalysisChangeKind::TextEdited { line, line_delta });
        Ok(())
    }

    fn after_text_change(&mut self) {
        if self.options.rebuild_on_change {
            self.rebuild_brackets_quietly();
        }
    }

    fn rebuild_brackets_quietly(&mut self) {
        self.brackets.rebuild(&self.buffer.get_text());
        self.brackets_stale = false;
    }

    /// Rebuild the bracket index from the current text.
    pub fn rebuild_brackets(&mut self) {
        self.rebuild_brackets_quietly();
        self.mark_modified(AnalysisChangeKind::BracketsRebuilt);
    }

    /// The matched pair to highlight for a cursor at `offset`: a delimiter right after the
    /// cursor wins over one right before it.
    pub fn match_at_cursor(&self, offset: usize) -> Option<&BracketPair> {
        self.brackets.match_near_cursor(offset)
    }

    /// Rainbow color of a pair.
    pub fn bracket_color(&self, pair: &BracketPair) -> Color {
        palette::color_for_level(pair.level)
    }

    /// Decide what typing `ch` at `offset` should do. With a selection, `offset` is ignored
    /// and the selection (half-open character range) is used instead.
    pub fn type_char(
        &self,
        offset: usize,
        ch: char,
        selection: Option<Range<usize>>,
    ) -> Result<TypedCharAction, AnalysisError> {
        let char_count = self.buffer.char_count();
        let range = match selection {
            Some(range) => {
                if range.start > range.end || range.end > char_count {
                    return Err(AnalysisError::InvalidRange {
                        start: range.start,
                        end: range.end,
                    });
                }
                range
            }
            None => {
                self.buffer.checked_position(offset)?;
                offset..offset
            }
        };
        let selected = self.buffer.slice(range.start, range.end);

        if self.config.is_quote(ch) {
            let (_, start_column) = self.buffer.char_offset_to_position(range.start);
            let (end_line, _) = self.buffer.char_offset_to_position(range.end);
            let line_start = range.start - start_column;
            let line_end = self.buffer.position_to_char_offset(end_line, usize::MAX);

            let prefix = self.buffer.slice(line_start, range.start);
            let suffix = self.buffer.slice(range.end, line_end);
            let typed = TypedChar::new(ch, &prefix, &suffix)
                .with_selection(&selected)
                .in_markdown(self.config.markdown);
            return Ok(TypedCharAction::Quote(
                self.quotes.handle_typed_quote(&typed),
            ));
        }

        if self.config.is_open_bracket(ch) || self.config.is_close_bracket(ch) {
            let before = self.buffer.slice(0, range.start);
            let typed = TypedBracket::new(ch, &before, self.buffer.char_at(range.end))
                .with_selection(&selected);
            return Ok(TypedCharAction::Bracket(
                self.bracket_pairing.handle_typed_bracket(&typed),
            ));
        }

        Ok(TypedCharAction::Plain)
    }

    fn check_line(&self, line: usize) -> Result<(), AnalysisError> {
        if line >= self.buffer.line_count() {
            return Err(AnalysisError::InvalidLine(line));
        }
        Ok(())
    }

    /// Returns `true` if a fold can be toggled at `line`.
    pub fn is_foldable(&self, line: usize) -> bool {
        self.folding.is_foldable(&self.buffer, line)
    }

    /// Toggle the fold requested at `line`. Returns the fold's start line, `None` if the line
    /// is not foldable.
    pub fn toggle_fold(&mut self, line: usize) -> Result<Option<usize>, AnalysisError> {
        self.check_line(line)?;
        let start = self.folding.toggle_fold(&self.buffer, line);
        if start.is_some() {
            self.mark_modified(AnalysisChangeKind::FoldingChanged);
        }
        Ok(start)
    }

    /// Fold or unfold the region requested at `line`.
    pub fn set_folded(
        &mut self,
        line: usize,
        folded: bool,
    ) -> Result<Option<usize>, AnalysisError> {
        self.check_line(line)?;
        let start = self.folding.set_folded(&self.buffer, line, folded);
        if start.is_some() {
            self.mark_modified(AnalysisChangeKind::FoldingChanged);
        }
        Ok(start)
    }

    /// Fold every foldable region.
    pub fn fold_all(&mut self) {
        self.folding.fold_all(&self.buffer);
        self.mark_modified(AnalysisChangeKind::FoldingChanged);
    }

    /// Expand everything.
    pub fn unfold_all(&mut self) {
        self.folding.unfold_all();
        self.mark_modified(AnalysisChangeKind::FoldingChanged);
    }

    /// Returns `true` unless a folded region hides `line`.
    pub fn is_line_visible(&self, line: usize) -> bool {
        self.folding.is_line_visible(line)
    }

    /// All visible lines, in order.
    pub fn visible_lines(&self) -> Vec<usize> {
        self.folding.visible_lines(self.buffer.line_count())
    }

    /// Screen row of `line`, `None` if hidden or past the end.
    pub fn logical_to_visual(&self, line: usize) -> Option<usize> {
        if line >= self.buffer.line_count() {
            return None;
        }
        self.folding.logical_to_visual(line)
    }

    /// Logical line shown on screen row `row`, `None` past the last visible line.
    pub fn visual_to_logical(&self, row: usize) -> Option<usize> {
        let line = self.folding.visual_to_logical(row);
        (line < self.buffer.line_count()).then_some(line)
    }

    /// Known fold regions, ordered by start line.
    pub fn fold_regions(&self) -> Vec<FoldRegion> {
        self.folding.regions().cloned().collect()
    }

    /// Subscribe to change notifications.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&AnalysisChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Current version; starts at 0 and increments on every mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if anything changed since `version`.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    fn mark_modified(&mut self, kind: AnalysisChangeKind) {
        let old_version = self.version;
        self.version += 1;
        let change = AnalysisChange {
            kind,
            old_version,
            new_version: self.version,
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }
}
