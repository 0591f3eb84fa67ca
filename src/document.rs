/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`Document`] type: one tokenized text in a [`crate::TextBase`].

use std::sync::Arc;


use crate::error::TextEnvError;
use crate::text::Text;
use crate::tokenizer::Token;
use crate::types::*;

/// A document is the text of one loaded file (or line), along with its tokenization.
/// It is immutable once loaded, apart from its group id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Public identifier, unique within the text base
    pub(crate) id: Arc<str>,

    pub(crate) text: String,

    /// Length of the text in unicode points
    pub(crate) textlen: usize,

    /// Tokens in text order
    pub(crate) tokens: Vec<Token>,

    /// Group used by group-aware partitioning
    pub(crate) group: Option<String>,

    /// SHA-1 checksum of the text, if text validation is enabled
    pub(crate) checksum: Option<String>,

    pub(crate) intid: Option<DocumentHandle>,
}

impl<'slf> Text<'slf, 'slf> for Document {
    fn text(&'slf self) -> &'slf str {
        self.text.as_str()
    }

    fn textlen(&'slf self) -> usize {
        self.textlen
    }
}

impl Document {
    pub(crate) fn new(id: Arc<str>, text: String, tokens: Vec<Token>) -> Self {
        let textlen = text.chars().count();
        Self {
            id,
            text,
            textlen,
            tokens,
            group: None,
            checksum: None,
            intid: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn id_arc(&self) -> &Arc<str> {
        &self.id
    }

    pub fn handle(&self) -> Option<DocumentHandle> {
        self.intid
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens in this document
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// Returns the text of a single token
    pub fn token_text(&self, index: usize) -> Result<&str, TextEnvError> {
        let token = self.tokens.get(index).ok_or_else(|| {
            TextEnvError::NotFound(format!("{}#{}", self.id, index), "Document::token_text()")
        })?;
        self.text_by_chars(token.begin(), token.end())
    }

    /// Resolves a character range to the smallest token range covering it, as `(start, length)`.
    /// A range that covers no token at all (empty, or entirely whitespace) resolves to the zero-length range at the next token.
    pub(crate) fn token_range_by_chars(
        &self,
        char_start: usize,
        char_end: usize,
    ) -> Result<(usize, usize), TextEnvError> {
        if char_start > char_end || char_end > self.textlen {
            return Err(TextEnvError::OutOfRange(
                char_start,
                char_end,
                self.textlen,
                "Document::token_range_by_chars()",
            ));
        }
        let start = self.tokens.partition_point(|t| t.end() <= char_start);
        if char_start == char_end {
            return Ok((start, 0));
        }
        let end = self.tokens.partition_point(|t| t.begin() < char_end);
        Ok((start, end.saturating_sub(start)))
    }

    /// Character range covered by a token range. The range covering all tokens covers the whole text.
    pub(crate) fn char_range_of(&self, start: usize, length: usize) -> (usize, usize) {
        if start == 0 && length == self.tokens.len() {
            (0, self.textlen)
        } else if length == 0 {
            let pos = self
                .tokens
                .get(start)
                .map(|t| t.begin())
                .unwrap_or(self.textlen);
            (pos, pos)
        } else {
            (
                self.tokens[start].begin(),
                self.tokens[start + length - 1].end(),
            )
        }
    }
}
