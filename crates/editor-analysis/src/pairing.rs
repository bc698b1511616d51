//! Shared pieces of the quote and bracket pairing logic.

use crate::bracket_pairing::BracketAction;
use crate::quote_pairing::QuoteAction;
use std::ops::Range;

/// A concrete edit for a typed character.
///
/// `text` replaces the selection (or is inserted at the cursor when nothing is selected).
/// Offsets are in characters, relative to where `text` starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// Text to insert.
    pub text: String,
    /// Cursor offset after the edit.
    pub cursor: usize,
    /// Range to select after the edit, if any.
    pub select: Option<Range<usize>>,
}

impl Insertion {
    /// Plain text, cursor after it.
    pub fn text(text: String) -> Self {
        let cursor = text.chars().count();
        Self {
            text,
            cursor,
            select: None,
        }
    }

    /// `open` + `close` with the cursor between them.
    pub fn pair(open: char, close: char) -> Self {
        Self {
            text: format!("{open}{close}"),
            cursor: 1,
            select: None,
        }
    }

    /// `open` + `selection` + `close`, keeping the wrapped text selected.
    pub fn wrap(open: char, selection: &str, close: char) -> Self {
        let len = selection.chars().count();
        Self {
            text: format!("{open}{selection}{close}"),
            cursor: len + 2,
            select: Some(1..1 + len),
        }
    }

    /// Insert nothing and step over the next character.
    pub fn skip() -> Self {
        Self {
            text: String::new(),
            cursor: 1,
            select: None,
        }
    }
}

/// The decision for any typed character, as returned by
/// [`DocumentAnalyzer::type_char`](crate::DocumentAnalyzer::type_char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedCharAction {
    /// The character is a configured quote.
    Quote(QuoteAction),
    /// The character is a configured bracket.
    Bracket(BracketAction),
    /// Neither; insert it as typed.
    Plain,
}

impl TypedCharAction {
    /// The edit for this action, or `None` when the host should insert the character
    /// itself (plain characters and rejected brackets).
    pub fn insertion(self, ch: char, selection: &str) -> Option<Insertion> {
        match self {
            TypedCharAction::Quote(action) => Some(action.insertion(ch, selection)),
            TypedCharAction::Bracket(action) => action.insertion(ch, selection),
            TypedCharAction::Plain => None,
        }
    }
}

/// Letters, digits and `_`.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
