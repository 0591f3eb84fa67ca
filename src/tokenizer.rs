//! Splitting raw document text into [`Token`]s.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::TextEnvError;

/// Runs of digits, runs of letters (with their combining marks), and any other single
/// non-whitespace character each form one token.
pub const DEFAULT_TOKEN_PATTERN: &str = r"[0-9]+|[\p{L}\p{M}]+|[^\s\p{L}\p{M}0-9]";

/// A token is a contiguous character range of a document. Offsets are in unicode points, the end is non-inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Token {
    begin: usize,
    end: usize,
}

impl Token {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Length in unicode points
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// Regular-expression based tokenizer: every non-overlapping match of the pattern is a token,
/// everything in between is discarded.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_TOKEN_PATTERN).expect("default token pattern must compile"),
        }
    }
}

impl Tokenizer {
    /// Instantiates a tokenizer from a custom token pattern
    pub fn with_pattern(pattern: &str) -> Result<Self, TextEnvError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| TextEnvError::RegexError(e, "Tokenizer::with_pattern()"))?;
        Ok(Self { pattern })
    }

    /// Instantiates the tokenizer the configuration asks for
    pub fn from_config(config: &Config) -> Result<Self, TextEnvError> {
        match config.token_pattern() {
            Some(pattern) => Self::with_pattern(pattern),
            None => Ok(Self::default()),
        }
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Tokenizes the text, returns tokens in text order with unicode point offsets
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        //byte and char cursors advance together so the text is walked only once
        let mut bytepos = 0;
        let mut charpos = 0;
        for m in self.pattern.find_iter(text) {
            if m.start() == m.end() {
                continue;
            }
            charpos += text[bytepos..m.start()].chars().count();
            let begin = charpos;
            charpos += m.as_str().chars().count();
            bytepos = m.end();
            tokens.push(Token::new(begin, charpos));
        }
        tokens
    }
}
