#![warn(missing_docs)]
//! Editor Analysis - Headless In-Document Analysis for Code Editors
//!
//! # Overview
//!
//! `editor-analysis` computes the structural information an editor surface needs while a
//! document is being edited: which brackets match, what a typed quote or bracket should
//! insert, and which line ranges can be folded. It never renders anything; the host passes
//! text, cursor offsets and typed characters and gets decisions and structures back.
//!
//! All positions are character offsets (Unicode scalar values). Lines are zero-based.
//!
//! # Core Features
//!
//! - **Bracket Matching**: AVL tree of bracket pairs, O(log n) lookup by either delimiter
//! - **Rainbow Brackets**: nesting level per pair, six-color palette
//! - **Auto-Pairing**: quote and bracket decisions that respect strings and comments
//! - **Code Folding**: brace, declaration and indentation folds with visibility mapping
//! - **State Tracking**: version number and change notifications per document
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  DocumentAnalyzer (edits, versions, notify) │  ← Public API
//! ├──────────────┬──────────────┬───────────────┤
//! │ BracketIndex │ Quote/Bracket│ FoldingEngine │  ← Analyses
//! │  (AVL tree)  │   Pairing    │               │
//! ├──────────────┴──────────────┴───────────────┤
//! │  ContextScanner (code / comment / string)   │  ← Shared classification
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer / LineIndex (Rope-based)        │  ← Line Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Matching brackets
//!
//! ```rust
//! use editor_analysis::{BracketIndex, LanguageConfig};
//!
//! let mut index = BracketIndex::new(LanguageConfig::default());
//! index.rebuild("a(b[c]d)e");
//!
//! let outer = index.find_match(1).unwrap();
//! assert_eq!(outer.close_pos, Some(7));
//! assert_eq!(index.find_match(3).unwrap().level, 1);
//! ```
//!
//! ## Deciding what a keystroke inserts
//!
//! ```rust
//! use editor_analysis::{LanguageConfig, QuoteAction, QuotePairing, TypedChar};
//!
//! let pairing = QuotePairing::new(LanguageConfig::default());
//! let action = pairing.handle_typed_quote(&TypedChar::new('\'', "don", "t"));
//! assert_eq!(action, QuoteAction::InsertSingle);
//! ```
//!
//! ## Folding
//!
//! ```rust
//! use editor_analysis::{FoldingEngine, LanguageConfig};
//!
//! let lines: &[&str] = &["void f() {", "    int x;", "}"];
//! let mut folding = FoldingEngine::new(LanguageConfig::default());
//!
//! folding.toggle_fold(lines, 0);
//! assert!(!folding.is_line_visible(1));
//! assert!(folding.is_line_visible(2));
//! ```
//!
//! # Module Description
//!
//! - [`scanner`] - code / comment / string classification shared by every analysis
//! - [`bracket_index`] - AVL tree of bracket pairs
//! - [`quote_pairing`] - typed quote decisions
//! - [`bracket_pairing`] - typed bracket decisions
//! - [`pairing`] - edits produced by the pairing decisions
//! - [`folding`] - fold detection, fold state and visibility
//! - [`line_index`] - text buffer trait and Rope based line index
//! - [`analyzer`] - per-document facade
//! - [`palette`] - rainbow bracket colors
//!
//! # Logging
//!
//! The crate logs through the `log` facade (`debug` for rebuilds and fold changes, `trace`
//! for individual brackets). It never installs a logger.

pub mod analyzer;
pub mod bracket_index;
pub mod bracket_pairing;
pub mod error;
pub mod folding;
pub mod line_index;
pub mod pairing;
pub mod palette;
pub mod quote_pairing;
pub mod scanner;

pub use analyzer::{
    AnalysisChange, AnalysisChangeCallback, AnalysisChangeKind, AnalyzerOptions, DocumentAnalyzer,
};
pub use bracket_index::{BracketIndex, BracketPair};
pub use bracket_pairing::{BracketAction, BracketPairing, TypedBracket};
pub use editor_analysis_lang::{EscapeMode, FoldingConfig, LanguageConfig, LanguageConfigError};
pub use error::AnalysisError;
pub use folding::{FoldKind, FoldRegion, FoldingEngine};
pub use line_index::{LineIndex, TextBuffer};
pub use pairing::{Insertion, TypedCharAction};
pub use palette::{BRACKET_PALETTE, Color};
pub use quote_pairing::{QuoteAction, QuotePairing, TypedChar};
pub use scanner::{CharClass, ContextScanner, ScanContext};
