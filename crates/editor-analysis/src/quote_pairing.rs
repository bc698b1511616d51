//! Auto-pairing decisions for typed quote characters.
//!
//! The decision only depends on the text of the current line around the cursor, the
//! selection and whether the document is Markdown. It is recomputed for every keystroke.

use crate::pairing::{Insertion, is_word_char};
use crate::scanner::{ContextScanner, ScanContext};
use editor_analysis_lang::LanguageConfig;

/// A character typed at a cursor, with the surrounding line already split at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedChar<'a> {
    /// The typed character.
    pub ch: char,
    /// Line text from the line start up to the cursor (or selection start).
    pub line_prefix: &'a str,
    /// Line text from the cursor (or selection end) to the line end.
    pub line_suffix: &'a str,
    /// Selected text, empty when nothing is selected.
    pub selection: &'a str,
    /// Whether the document is Markdown.
    pub markdown: bool,
}

impl<'a> TypedChar<'a> {
    /// A typed character without selection, outside Markdown.
    pub fn new(ch: char, line_prefix: &'a str, line_suffix: &'a str) -> Self {
        Self {
            ch,
            line_prefix,
            line_suffix,
            selection: "",
            markdown: false,
        }
    }

    /// Set the selected text.
    pub fn with_selection(mut self, selection: &'a str) -> Self {
        self.selection = selection;
        self
    }

    /// Mark the context as Markdown (or not).
    pub fn in_markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }

    /// The character right before the cursor.
    pub fn before_char(&self) -> Option<char> {
        self.line_prefix.chars().next_back()
    }

    /// The character right after the cursor.
    pub fn after_char(&self) -> Option<char> {
        self.line_suffix.chars().next()
    }
}

/// What to do with a typed quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteAction {
    /// Insert just the typed quote.
    InsertSingle,
    /// Insert the quote twice and put the cursor between them.
    InsertPair,
    /// Surround the selection with the quote.
    WrapSelection,
    /// Move the cursor over the closing quote that is already there.
    SkipOverExistingClose,
    /// Insert a fenced code block and put the cursor inside it.
    InsertFencedBlock,
}

impl QuoteAction {
    /// The edit for this action when `quote` was typed over `selection`.
    pub fn insertion(self, quote: char, selection: &str) -> Insertion {
        match self {
            QuoteAction::InsertSingle => Insertion::text(quote.to_string()),
            QuoteAction::InsertPair => Insertion::pair(quote, quote),
            QuoteAction::WrapSelection => Insertion::wrap(quote, selection, quote),
            QuoteAction::SkipOverExistingClose => Insertion::skip(),
            QuoteAction::InsertFencedBlock => Insertion {
                text: "```\n\n```".to_string(),
                cursor: 4,
                select: None,
            },
        }
    }
}

/// Quote auto-pairing state machine.
#[derive(Debug, Clone, Default)]
pub struct QuotePairing {
    config: LanguageConfig,
}

impl QuotePairing {
    /// Create the pairing logic for a language.
    pub fn new(config: LanguageConfig) -> Self {
        Self { config }
    }

    /// Decide how to handle a typed quote.
    pub fn handle_typed_quote(&self, typed: &TypedChar<'_>) -> QuoteAction {
        let ch = typed.ch;
        if !self.config.is_quote(ch) {
            return QuoteAction::InsertSingle;
        }

        if typed.markdown
            && ch == '`'
            && typed.line_prefix.trim().is_empty()
            && !typed.line_prefix.contains("``")
            && !typed.line_suffix.contains("``")
        {
            return QuoteAction::InsertFencedBlock;
        }

        if typed.after_char() == Some(ch) && self.inside_string_of(typed.line_prefix, ch) {
            return QuoteAction::SkipOverExistingClose;
        }

        if !typed.selection.is_empty() {
            return QuoteAction::WrapSelection;
        }

        if self.may_auto_close(typed) {
            QuoteAction::InsertPair
        } else {
            QuoteAction::InsertSingle
        }
    }

    /// The string context at the end of `line_prefix`.
    fn prefix_context(&self, line_prefix: &str) -> ScanContext {
        let mut scanner = ContextScanner::strings_only(&self.config);
        scanner.feed_str(line_prefix);
        scanner.context()
    }

    /// Whether the end of `line_prefix` is inside a string opened by `quote`.
    fn inside_string_of(&self, line_prefix: &str, quote: char) -> bool {
        self.prefix_context(line_prefix) == ScanContext::Str { quote }
    }

    fn may_auto_close(&self, typed: &TypedChar<'_>) -> bool {
        let before = typed.before_char();

        if before == Some('\\') {
            return false;
        }
        // Apostrophes in words ("don't") and right after them ("users'").
        if before.is_some_and(is_word_char) {
            return false;
        }
        // An unbalanced quote earlier on the line, of any kind, means the cursor sits in a
        // string: the typed quote is either its closer or plain text.
        !matches!(
            self.prefix_context(typed.line_prefix),
            ScanContext::Str { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(ch: char, prefix: &str, suffix: &str) -> QuoteAction {
        QuotePairing::default().handle_typed_quote(&TypedChar::new(ch, prefix, suffix))
    }

    #[test]
    fn test_pair_on_empty_line() {
        assert_eq!(decide('"', "", ""), QuoteAction::InsertPair);
    }

    #[test]
    fn test_skip_existing_close() {
        assert_eq!(
            decide('"', "let s = \"abc", "\";"),
            QuoteAction::SkipOverExistingClose
        );
    }

    #[test]
    fn test_no_skip_outside_string() {
        // `"` follows but the cursor is not inside a string of `"`.
        assert_eq!(decide('"', "x = ", "\""), QuoteAction::InsertPair);
    }

    #[test]
    fn test_apostrophe_in_word() {
        assert_eq!(decide('\'', "don", "t"), QuoteAction::InsertSingle);
        assert_eq!(decide('\'', "users", ""), QuoteAction::InsertSingle);
    }

    #[test]
    fn test_after_backslash() {
        assert_eq!(decide('"', "\"a\\", ""), QuoteAction::InsertSingle);
    }

    #[test]
    fn test_closing_quote_not_paired() {
        assert_eq!(decide('"', "print(\"abc ", ""), QuoteAction::InsertSingle);
    }

    #[test]
    fn test_other_quote_inside_string_not_paired() {
        assert_eq!(decide('"', "x = 'it ", ""), QuoteAction::InsertSingle);
        assert_eq!(decide('\'', "s = \"it ", "\""), QuoteAction::InsertSingle);
        // Both strings are closed again.
        assert_eq!(decide('"', "a('x', \"y\") + ", ""), QuoteAction::InsertPair);
    }

    #[test]
    fn test_wrap_selection() {
        let pairing = QuotePairing::default();
        let typed = TypedChar::new('\'', "x = ", "").with_selection("word");
        let action = pairing.handle_typed_quote(&typed);
        assert_eq!(action, QuoteAction::WrapSelection);
        let edit = action.insertion('\'', "word");
        assert_eq!(edit.text, "'word'");
        assert_eq!(edit.select, Some(1..5));
    }

    #[test]
    fn test_fenced_block_in_markdown() {
        let pairing = QuotePairing::new(LanguageConfig::markdown());
        let typed = TypedChar::new('`', "  ", "").in_markdown(true);
        assert_eq!(
            pairing.handle_typed_quote(&typed),
            QuoteAction::InsertFencedBlock
        );

        let inline = TypedChar::new('`', "see ", "").in_markdown(true);
        assert_eq!(pairing.handle_typed_quote(&inline), QuoteAction::InsertPair);
    }

    #[test]
    fn test_not_a_quote() {
        let pairing = QuotePairing::new(LanguageConfig::rust());
        let typed = TypedChar::new('\'', "", "");
        assert_eq!(
            pairing.handle_typed_quote(&typed),
            QuoteAction::InsertSingle
        );
    }
}
