/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`Span`] value type, its fat-pointer counterpart [`ResultSpan`],
//! and [`TokenRef`] which addresses a single token.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;


use crate::document::Document;
use crate::error::TextEnvError;
use crate::text::Text;
use crate::textbase::TextBase;
use crate::tokenizer::Token;
use crate::types::*;

/// A span addresses a contiguous range of tokens in exactly one document: `(document, start, length)`.
/// A span of length 0 is a valid insertion point.
///
/// Spans hold no text; they are obtained from a [`TextBase`] (see [`TextBase::span()`]) and
/// resolved back against it (see [`TextBase::resolve()`]) to access text and character offsets.
/// Spans are ordered by document id, then start, then length. Equality and ordering only consider those three fields.
#[derive(Debug, Clone)]
pub struct Span {
    /// Key of the text base that produced this span
    pub(crate) base: BaseKey,
    pub(crate) document: Arc<str>,
    pub(crate) start: usize,
    pub(crate) length: usize,
}

impl Span {
    pub(crate) fn new(base: BaseKey, document: Arc<str>, start: usize, length: usize) -> Self {
        Self {
            base,
            document,
            start,
            length,
        }
    }

    /// Identifier of the document this span belongs to
    pub fn document_id(&self) -> &str {
        &self.document
    }

    /// Index of the first token
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of tokens
    pub fn length(&self) -> usize {
        self.length
    }

    /// Index one past the last token
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Key of the text base this span was obtained from
    pub fn base_key(&self) -> BaseKey {
        self.base
    }

    /// Is the other span fully inside this one? Both must be in the same document.
    pub fn contains(&self, other: &Span) -> bool {
        self.document == other.document && self.start <= other.start && other.end() <= self.end()
    }

    /// Do the spans share at least one token? Zero-length spans overlap nothing.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.document == other.document
            && self.start < other.end()
            && other.start < self.end()
    }

    /// References the token at the given index relative to the start of this span
    pub fn token_ref(&self, index: usize) -> Result<TokenRef, TextEnvError> {
        if index >= self.length {
            return Err(TextEnvError::OutOfRange(
                index,
                index.saturating_add(1),
                self.length,
                "Span::token_ref()",
            ));
        }
        Ok(TokenRef::new(
            self.base,
            self.document.clone(),
            self.start + index,
        ))
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.length == other.length && self.document == other.document
    }
}

impl Eq for Span {}

impl Hash for Span {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.hash(state);
        self.start.hash(state);
        self.length.hash(state);
    }
}

impl Ord for Span {
    fn cmp(&self, other: &Self) -> Ordering {
        self.document
            .cmp(&other.document)
            .then(self.start.cmp(&other.start))
            .then(self.length.cmp(&other.length))
    }
}

impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}+{}]", self.document, self.start, self.length)
    }
}

/// Addresses one token of a document, token properties are attached to it.
#[derive(Debug, Clone)]
pub struct TokenRef {
    pub(crate) base: BaseKey,
    pub(crate) document: Arc<str>,
    pub(crate) index: usize,
}

impl TokenRef {
    pub(crate) fn new(base: BaseKey, document: Arc<str>, index: usize) -> Self {
        Self {
            base,
            document,
            index,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document
    }

    /// Index of the token in the document
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn base_key(&self) -> BaseKey {
        self.base
    }
}

impl PartialEq for TokenRef {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.document == other.document
    }
}

impl Eq for TokenRef {}

impl Hash for TokenRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.hash(state);
        self.index.hash(state);
    }
}

impl Ord for TokenRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.document
            .cmp(&other.document)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for TokenRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document, self.index)
    }
}

/// This is a smart pointer that encapsulates a [`Span`] along with references to the [`TextBase`]
/// and [`Document`] it resolves against. It gives access to text and character offsets, and
/// it dereferences to the [`Span`] itself.
///
/// It is valid as long as the text base is borrowed.
#[derive(Debug, Clone)]
pub struct ResultSpan<'a> {
    span: Span,
    textbase: &'a TextBase,
    document: &'a Document,
}

impl<'a> Deref for ResultSpan<'a> {
    type Target = Span;
    fn deref(&self) -> &Self::Target {
        &self.span
    }
}

impl<'a> PartialEq for ResultSpan<'a> {
    fn eq(&self, other: &Self) -> bool {
        self.span == other.span
    }
}

impl<'a> Eq for ResultSpan<'a> {}

impl<'a> PartialOrd for ResultSpan<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.span.cmp(&other.span))
    }
}

impl<'a> Ord for ResultSpan<'a> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.span.cmp(&other.span)
    }
}

impl<'a> ResultSpan<'a> {
    pub(crate) fn new(span: Span, textbase: &'a TextBase, document: &'a Document) -> Self {
        Self {
            span,
            textbase,
            document,
        }
    }

    pub fn as_span(&self) -> &Span {
        &self.span
    }

    pub fn into_span(self) -> Span {
        self.span
    }

    pub fn textbase(&self) -> &'a TextBase {
        self.textbase
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    /// Character range `(begin, end)` in unicode points, end non-inclusive.
    /// The whole-document span always covers the entire text.
    pub fn char_range(&self) -> (usize, usize) {
        self.document
            .char_range_of(self.span.start, self.span.length)
    }

    /// The text covered by this span
    pub fn text(&self) -> &'a str {
        let (begin, end) = self.char_range();
        // offsets are derived from the document's own tokens
        self.document.text_by_chars(begin, end).unwrap_or("")
    }

    /// The tokens covered by this span
    pub fn tokens(&self) -> &'a [Token] {
        &self.document.tokens()[self.span.start..self.span.end()]
    }

    /// References the token at the given index relative to the start of this span
    pub fn token(&self, index: usize) -> Result<TokenRef, TextEnvError> {
        self.span.token_ref(index)
    }

    /// Iterates over references to all tokens in this span
    pub fn token_refs(&self) -> impl Iterator<Item = TokenRef> + '_ {
        (self.span.start..self.span.end())
            .map(|index| TokenRef::new(self.span.base, self.span.document.clone(), index))
    }

    /// Returns a sub-span in token offsets relative to the start of this span.
    /// Fails with [`TextEnvError::OutOfRange`] if it would exceed this span.
    pub fn sub_span(
        &self,
        relative_start: usize,
        relative_length: usize,
    ) -> Result<ResultSpan<'a>, TextEnvError> {
        if relative_start
            .checked_add(relative_length)
            .map_or(true, |end| end > self.span.length)
        {
            return Err(TextEnvError::OutOfRange(
                relative_start,
                relative_start.saturating_add(relative_length),
                self.span.length,
                "ResultSpan::sub_span()",
            ));
        }
        Ok(self.derive(self.span.start + relative_start, relative_length))
    }

    /// Returns a sub-span by character offsets relative to the first character of this span,
    /// snapped outward to whole tokens. Fails with [`TextEnvError::OutOfRange`] outside of the span's text.
    pub fn char_sub_span(
        &self,
        relative_char_start: usize,
        relative_char_end: usize,
    ) -> Result<ResultSpan<'a>, TextEnvError> {
        let (begin, end) = self.char_range();
        if relative_char_start > relative_char_end || relative_char_end > end - begin {
            return Err(TextEnvError::OutOfRange(
                relative_char_start,
                relative_char_end,
                end - begin,
                "ResultSpan::char_sub_span()",
            ));
        }
        let (start, length) = self
            .document
            .token_range_by_chars(begin + relative_char_start, begin + relative_char_end)?;
        if start < self.span.start || start + length > self.span.end() {
            return Err(TextEnvError::OutOfRange(
                start,
                start + length,
                self.span.end(),
                "ResultSpan::char_sub_span(): snapped range leaves the span",
            ));
        }
        Ok(self.derive(start, length))
    }

    /// Is this the span covering the whole document?
    pub fn is_whole_document(&self) -> bool {
        self.span.start == 0 && self.span.length == self.document.token_count()
    }

    fn derive(&self, start: usize, length: usize) -> ResultSpan<'a> {
        ResultSpan::new(
            Span::new(self.span.base, self.span.document.clone(), start, length),
            self.textbase,
            self.document,
        )
    }
}

impl<'a> fmt::Display for ResultSpan<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.span, self.text())
    }
}
