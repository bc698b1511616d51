//! Code / comment / string classification.
//!
//! Every analysis in this crate agrees on one rule set for deciding whether a character is
//! structurally significant: a left-to-right scan that tracks three mutually exclusive
//! contexts (code, line comment, string literal). Brackets and quotes only count in code.

use editor_analysis_lang::{EscapeMode, LanguageConfig};

/// The context the scanner is in *between* two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanContext {
    /// Normal code.
    Code,
    /// Inside a line comment (until the next `\n`).
    LineComment,
    /// Inside a string literal opened by `quote`.
    Str {
        /// The quote character that opened the literal.
        quote: char,
    },
}

impl ScanContext {
    /// Returns `true` for string or comment context.
    pub fn is_literal(self) -> bool {
        !matches!(self, ScanContext::Code)
    }
}

/// Classification of a single scanned character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// A character in code context (brackets here are structural).
    Code,
    /// The quote that opened a string literal.
    StringOpen,
    /// The quote that closed a string literal.
    StringClose,
    /// Any other character inside a string literal.
    StringContent,
    /// A character of a line comment, including the comment token itself.
    Comment,
}

/// Incremental context scanner. Feed it characters left to right.
#[derive(Debug, Clone)]
pub struct ContextScanner<'a> {
    config: &'a LanguageConfig,
    comments: bool,
    context: ScanContext,
    backslash_run: usize,
}

impl<'a> ContextScanner<'a> {
    /// Create a scanner in code context.
    pub fn new(config: &'a LanguageConfig) -> Self {
        Self {
            config,
            comments: true,
            context: ScanContext::Code,
            backslash_run: 0,
        }
    }

    /// Create a scanner that only tracks string literals and never enters comment context.
    pub fn strings_only(config: &'a LanguageConfig) -> Self {
        Self {
            comments: false,
            ..Self::new(config)
        }
    }

    /// Current context (the context the next character will be read in).
    pub fn context(&self) -> ScanContext {
        self.context
    }

    /// Whether a quote read next would be escaped.
    pub fn next_is_escaped(&self) -> bool {
        match self.config.escape {
            EscapeMode::SingleBackslash => self.backslash_run > 0,
            EscapeMode::BackslashParity => self.backslash_run % 2 == 1,
        }
    }

    /// Classify `ch` and advance. `rest` is the text starting at `ch`; it is only used to
    /// recognize multi-character comment tokens.
    pub fn feed(&mut self, ch: char, rest: &str) -> CharClass {
        let escaped = self.next_is_escaped();

        let class = match self.context {
            ScanContext::LineComment => {
                if ch == '\n' {
                    self.context = ScanContext::Code;
                }
                CharClass::Comment
            }
            ScanContext::Str { quote } => {
                if ch == quote && !escaped {
                    self.context = ScanContext::Code;
                    CharClass::StringClose
                } else {
                    if ch == '\n' && !self.config.multiline_strings {
                        self.context = ScanContext::Code;
                    }
                    CharClass::StringContent
                }
            }
            ScanContext::Code => {
                if self.comments
                    && self
                        .config
                        .line_comment_token()
                        .is_some_and(|token| rest.starts_with(token))
                {
                    self.context = ScanContext::LineComment;
                    CharClass::Comment
                } else if self.config.is_quote(ch) && !escaped {
                    self.context = ScanContext::Str { quote: ch };
                    CharClass::StringOpen
                } else {
                    CharClass::Code
                }
            }
        };

        if ch == '\\' {
            self.backslash_run += 1;
        } else {
            self.backslash_run = 0;
        }

        class
    }

    /// Feed a whole chunk of text.
    pub fn feed_str(&mut self, text: &str) {
        for (byte, ch) in text.char_indices() {
            self.feed(ch, &text[byte..]);
        }
    }
}

/// Classify every character of `text`, in order.
pub fn classify<'t>(
    config: &'t LanguageConfig,
    text: &'t str,
) -> impl Iterator<Item = (char, CharClass)> + 't {
    let mut scanner = ContextScanner::new(config);
    text.char_indices()
        .map(move |(byte, ch)| (ch, scanner.feed(ch, &text[byte..])))
}

/// Context at character offset `offset` of `text` (clamped to the text length).
pub fn context_at(config: &LanguageConfig, text: &str, offset: usize) -> ScanContext {
    let mut scanner = ContextScanner::new(config);
    scanner.feed_str(char_prefix(text, offset));
    scanner.context()
}

/// The first `chars` characters of `text`.
pub(crate) fn char_prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
