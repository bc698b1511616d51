#![warn(missing_docs)]
//! `editor-analysis-lang` - data-driven language configuration for `editor-analysis`.
//!
//! This crate intentionally stays lightweight: it only describes *which* characters a
//! language treats as brackets, quotes and comment starters, and how folding should
//! measure indentation. The analysis engine reads these settings; hosts can build them
//! with the presets below or load them from JSON settings files.
//!
//! ```rust
//! use editor_analysis_lang::LanguageConfig;
//!
//! let config = LanguageConfig::from_json(r##"{ "line_comment": "#", "quotes": ["\""] }"##).unwrap();
//! assert_eq!(config.line_comment_token(), Some("#"));
//! assert!(config.is_quote('"'));
//! assert!(!config.is_quote('\''));
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Bracket pairs recognized by default: `{}`, `[]`, `()`, `<>`.
pub const DEFAULT_BRACKETS: &[(char, char)] = &[('{', '}'), ('[', ']'), ('(', ')'), ('<', '>')];

/// Opening brackets that auto-close by default: every opener of [`DEFAULT_BRACKETS`].
pub const DEFAULT_AUTO_CLOSE: &[char] = &['{', '[', '(', '<'];

/// Quote characters recognized by default. Each one is paired with itself.
pub const DEFAULT_QUOTES: &[char] = &['"', '\'', '`'];

/// Keywords that introduce a declaration whose opening brace may sit on a later line.
pub const DEFAULT_DECLARATION_KEYWORDS: &[&str] = &[
    "class",
    "struct",
    "enum",
    "union",
    "interface",
    "trait",
    "impl",
    "fn",
    "func",
    "function",
    "namespace",
    "mod",
    "record",
    "protocol",
    "extension",
];

/// Errors produced while loading or validating a [`LanguageConfig`].
#[derive(Debug, Error)]
pub enum LanguageConfigError {
    #[error("invalid language config JSON: {0}")]
    /// The JSON document could not be parsed.
    Json(#[from] serde_json::Error),

    #[error("bracket pair uses the same character for open and close: '{0}'")]
    /// A bracket pair such as `('|', '|')` was configured; use `quotes` for those.
    InvalidBracketPair(char),

    #[error("delimiter '{0}' is configured more than once")]
    /// A character appears in more than one bracket/quote slot.
    DuplicateDelimiter(char),

    #[error("auto-close bracket '{0}' is not a configured opening bracket")]
    /// An entry of `auto_close_brackets` is not the opening side of a bracket pair.
    UnknownAutoCloseBracket(char),

    #[error("line comment token must not be empty")]
    /// `line_comment` was set to an empty string.
    EmptyCommentToken,

    #[error("tab width must be at least 1")]
    /// `folding.tab_width` was zero.
    InvalidTabWidth,
}

/// How a backslash in front of a quote is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapeMode {
    /// A quote is escaped when the character right before it is `\`.
    ///
    /// `"\\"` is therefore read as an unterminated string, which matches how many
    /// lightweight editors behave.
    #[default]
    SingleBackslash,
    /// A quote is escaped when it is preceded by an odd-length run of backslashes.
    BackslashParity,
}

/// Folding knobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FoldingConfig {
    /// Columns per indentation level. A tab also counts as this many columns.
    pub tab_width: usize,
    /// How many non-empty lines after a declaration may hold its opening brace.
    pub declaration_lookahead: usize,
    /// Allow indentation folds that start on an unindented line.
    pub fold_top_level_indent: bool,
    /// First words that mark a line as a declaration.
    pub declaration_keywords: Vec<String>,
}

impl Default for FoldingConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            declaration_lookahead: 3,
            fold_top_level_indent: false,
            declaration_keywords: DEFAULT_DECLARATION_KEYWORDS
                .iter()
                .map(|kw| kw.to_string())
                .collect(),
        }
    }
}

impl FoldingConfig {
    /// Returns `true` if `word` is one of the configured declaration keywords.
    pub fn is_declaration_keyword(&self, word: &str) -> bool {
        self.declaration_keywords.iter().any(|kw| kw == word)
    }
}

/// Delimiter, comment and folding configuration for one language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Line comment token (e.g. `//`, `#`). `None` disables comment detection.
    pub line_comment: Option<String>,
    /// Bracket pairs `(open, close)` tracked by the bracket index.
    pub brackets: Vec<(char, char)>,
    /// Opening brackets that get their closing counterpart inserted automatically.
    pub auto_close_brackets: Vec<char>,
    /// Quote characters; each opens and closes a string literal.
    pub quotes: Vec<char>,
    /// Backslash escape interpretation.
    pub escape: EscapeMode,
    /// Whether a string literal may span lines. When `false` a newline ends it.
    pub multiline_strings: bool,
    /// Record string literal quotes in the bracket index as pairs.
    pub index_quote_pairs: bool,
    /// Markdown behaviour (fenced code block insertion on backtick).
    pub markdown: bool,
    /// Folding settings.
    pub folding: FoldingConfig,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::c_like()
    }
}

impl LanguageConfig {
    /// C-family defaults: `//` comments, all four bracket pairs, `"` `'` `` ` `` quotes.
    pub fn c_like() -> Self {
        Self {
            line_comment: Some("//".to_string()),
            brackets: DEFAULT_BRACKETS.to_vec(),
            auto_close_brackets: DEFAULT_AUTO_CLOSE.to_vec(),
            quotes: DEFAULT_QUOTES.to_vec(),
            escape: EscapeMode::SingleBackslash,
            multiline_strings: true,
            index_quote_pairs: false,
            markdown: false,
            folding: FoldingConfig::default(),
        }
    }

    /// Rust: `'` is left out of the quote set since lifetimes would open strings.
    pub fn rust() -> Self {
        Self {
            quotes: vec!['"'],
            ..Self::c_like()
        }
    }

    /// Python: `#` comments, no angle brackets, indentation folds from column zero.
    pub fn python() -> Self {
        Self {
            line_comment: Some("#".to_string()),
            brackets: vec![('{', '}'), ('[', ']'), ('(', ')')],
            auto_close_brackets: vec!['{', '[', '('],
            quotes: vec!['"', '\''],
            folding: FoldingConfig {
                fold_top_level_indent: true,
                ..FoldingConfig::default()
            },
            ..Self::c_like()
        }
    }

    /// Markdown: only backticks delimit code spans, no comments, fenced blocks on backtick.
    pub fn markdown() -> Self {
        Self {
            line_comment: None,
            brackets: vec![('{', '}'), ('[', ']'), ('(', ')')],
            auto_close_brackets: vec!['{', '[', '('],
            quotes: vec!['`'],
            markdown: true,
            ..Self::c_like()
        }
    }

    /// Parse a config from JSON. Missing fields fall back to [`LanguageConfig::c_like`].
    pub fn from_json(json: &str) -> Result<Self, LanguageConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!(
            "loaded language config: {} bracket pairs, {} quotes, comment {:?}",
            config.brackets.len(),
            config.quotes.len(),
            config.line_comment
        );
        Ok(config)
    }

    /// Check the config for contradictions.
    pub fn validate(&self) -> Result<(), LanguageConfigError> {
        if self.line_comment.as_deref().is_some_and(str::is_empty) {
            return Err(LanguageConfigError::EmptyCommentToken);
        }
        if self.folding.tab_width == 0 {
            return Err(LanguageConfigError::InvalidTabWidth);
        }

        let mut seen: Vec<char> = Vec::new();
        let mut claim = |ch: char| {
            if seen.contains(&ch) {
                Err(LanguageConfigError::DuplicateDelimiter(ch))
            } else {
                seen.push(ch);
                Ok(())
            }
        };
        for &(open, close) in &self.brackets {
            if open == close {
                return Err(LanguageConfigError::InvalidBracketPair(open));
            }
            claim(open)?;
            claim(close)?;
        }
        for &quote in &self.quotes {
            claim(quote)?;
        }

        if let Some(&ch) = self
            .auto_close_brackets
            .iter()
            .find(|&&ch| !self.is_open_bracket(ch))
        {
            return Err(LanguageConfigError::UnknownAutoCloseBracket(ch));
        }
        Ok(())
    }

    /// The line comment token, if one is configured and non-empty.
    pub fn line_comment_token(&self) -> Option<&str> {
        self.line_comment.as_deref().filter(|token| !token.is_empty())
    }

    /// Returns `true` if `ch` is a configured quote character.
    pub fn is_quote(&self, ch: char) -> bool {
        self.quotes.contains(&ch)
    }

    /// Returns `true` if `ch` opens a configured bracket pair.
    pub fn is_open_bracket(&self, ch: char) -> bool {
        self.brackets.iter().any(|&(open, _)| open == ch)
    }

    /// Returns `true` if `ch` closes a configured bracket pair.
    pub fn is_close_bracket(&self, ch: char) -> bool {
        self.brackets.iter().any(|&(_, close)| close == ch)
    }

    /// Closing counterpart of an opening bracket.
    pub fn close_for(&self, open: char) -> Option<char> {
        self.brackets
            .iter()
            .find(|&&(o, _)| o == open)
            .map(|&(_, close)| close)
    }

    /// Opening counterpart of a closing bracket.
    pub fn open_for(&self, close: char) -> Option<char> {
        self.brackets
            .iter()
            .find(|&&(_, c)| c == close)
            .map(|&(open, _)| open)
    }

    /// Returns `true` if typing `open` should insert its closing bracket too.
    pub fn auto_closes(&self, open: char) -> bool {
        self.auto_close_brackets.contains(&open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [
            LanguageConfig::c_like(),
            LanguageConfig::rust(),
            LanguageConfig::python(),
            LanguageConfig::markdown(),
        ] {
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_bracket_lookup() {
        let config = LanguageConfig::c_like();
        assert_eq!(config.close_for('('), Some(')'));
        assert_eq!(config.open_for('>'), Some('<'));
        assert_eq!(config.close_for('"'), None);
        assert!(config.auto_closes('{'));
        assert!(config.auto_closes('<'));
        assert!(!LanguageConfig::python().auto_closes('<'));
    }

    #[test]
    fn test_duplicate_delimiter_rejected() {
        let config = LanguageConfig {
            quotes: vec!['"', '('],
            ..LanguageConfig::c_like()
        };
        assert!(matches!(
            config.validate(),
            Err(LanguageConfigError::DuplicateDelimiter('('))
        ));
    }

    #[test]
    fn test_symmetric_bracket_rejected() {
        let config = LanguageConfig {
            brackets: vec![('|', '|')],
            auto_close_brackets: Vec::new(),
            ..LanguageConfig::c_like()
        };
        assert!(matches!(
            config.validate(),
            Err(LanguageConfigError::InvalidBracketPair('|'))
        ));
    }

    #[test]
    fn test_empty_comment_token() {
        let config = LanguageConfig {
            line_comment: Some(String::new()),
            ..LanguageConfig::c_like()
        };
        assert!(matches!(
            config.validate(),
            Err(LanguageConfigError::EmptyCommentToken)
        ));
        assert_eq!(config.line_comment_token(), None);
    }
}
