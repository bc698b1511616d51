//! Auto-pairing decisions for typed bracket characters.

use crate::pairing::Insertion;
use crate::scanner;
use editor_analysis_lang::LanguageConfig;

/// A bracket typed at a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedBracket<'a> {
    /// The typed character.
    pub ch: char,
    /// Document text before the cursor (or selection start); used to find the context.
    pub text_before_cursor: &'a str,
    /// Selected text, empty when nothing is selected.
    pub selection: &'a str,
    /// The character right after the cursor (or selection end).
    pub after: Option<char>,
}

impl<'a> TypedBracket<'a> {
    /// A typed bracket without selection.
    pub fn new(ch: char, text_before_cursor: &'a str, after: Option<char>) -> Self {
        Self {
            ch,
            text_before_cursor,
            selection: "",
            after,
        }
    }

    /// Set the selected text.
    pub fn with_selection(mut self, selection: &'a str) -> Self {
        self.selection = selection;
        self
    }
}

/// What to do with a typed bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketAction {
    /// The cursor is in a string or comment; pairing does not apply.
    Reject,
    /// Surround the selection with `open` and `close`.
    WrapSelection {
        /// Opening bracket.
        open: char,
        /// Closing bracket.
        close: char,
    },
    /// Insert `open` and `close` with the cursor between them.
    InsertPair {
        /// Opening bracket.
        open: char,
        /// Closing bracket.
        close: char,
    },
    /// Move the cursor over the identical closing bracket that is already there.
    SkipOverExistingClose,
    /// Insert just the typed character.
    InsertSingle,
}

impl BracketAction {
    /// The edit for this action, `None` for [`BracketAction::Reject`].
    pub fn insertion(self, ch: char, selection: &str) -> Option<Insertion> {
        match self {
            BracketAction::Reject => None,
            BracketAction::WrapSelection { open, close } => {
                Some(Insertion::wrap(open, selection, close))
            }
            BracketAction::InsertPair { open, close } => Some(Insertion::pair(open, close)),
            BracketAction::SkipOverExistingClose => Some(Insertion::skip()),
            BracketAction::InsertSingle => Some(Insertion::text(ch.to_string())),
        }
    }
}

/// Bracket auto-pairing logic.
#[derive(Debug, Clone, Default)]
pub struct BracketPairing {
    config: LanguageConfig,
}

impl BracketPairing {
    /// Create the pairing logic for a language.
    pub fn new(config: LanguageConfig) -> Self {
        Self { config }
    }

    /// Decide how to handle a typed bracket.
    pub fn handle_typed_bracket(&self, typed: &TypedBracket<'_>) -> BracketAction {
        let ch = typed.ch;
        let closes = self.config.is_close_bracket(ch);
        let Some((open, close)) = self
            .config
            .close_for(ch)
            .map(|close| (ch, close))
            .or_else(|| self.config.open_for(ch).map(|open| (open, ch)))
        else {
            return BracketAction::InsertSingle;
        };

        let context = scanner::context_at(
            &self.config,
            typed.text_before_cursor,
            typed.text_before_cursor.chars().count(),
        );
        if context.is_literal() {
            return BracketAction::Reject;
        }

        if closes {
            if typed.selection.is_empty() && typed.after == Some(ch) {
                return BracketAction::SkipOverExistingClose;
            }
            if !typed.selection.is_empty() {
                return BracketAction::WrapSelection { open, close };
            }
            return BracketAction::InsertSingle;
        }

        if !typed.selection.is_empty() {
            return BracketAction::WrapSelection { open, close };
        }
        if typed.after.is_some_and(char::is_alphanumeric) {
            return BracketAction::InsertSingle;
        }
        if self.config.auto_closes(open) {
            BracketAction::InsertPair { open, close }
        } else {
            BracketAction::InsertSingle
        }
    }
}
