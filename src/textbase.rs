/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`TextBase`], the store of tokenized documents.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use nanoid::nanoid;

use crate::config::Config;
use crate::document::Document;
use crate::error::TextEnvError;
use crate::span::{ResultSpan, Span, TokenRef};
use crate::tokenizer::{Token, Tokenizer};
use crate::types::*;

/// Issues identity keys for text bases, so spans of one base are recognized as foreign by another
static BASEKEY_COUNTER: AtomicU32 = AtomicU32::new(1);

fn next_basekey() -> BaseKey {
    BaseKey(BASEKEY_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// A text base holds tokenized documents, keyed by a unique document identifier and kept in insertion order.
/// Documents can not be removed; use a [`crate::SubTextBase`] to work on a subset.
#[derive(Debug)]
pub struct TextBase {
    /// Public identifier for the text base as a whole
    id: Option<String>,

    key: BaseKey,

    documents: Vec<Document>,

    /// Maps document identifiers to their position
    idmap: HashMap<Arc<str>, DocumentHandle>,

    tokenizer: Tokenizer,

    config: Config,
}

impl Default for TextBase {
    fn default() -> Self {
        Self {
            id: None,
            key: next_basekey(),
            documents: Vec::new(),
            idmap: HashMap::new(),
            tokenizer: Tokenizer::default(),
            config: Config::default(),
        }
    }
}

impl TextBase {
    /// Creates a new empty text base, the tokenizer is determined by the configuration.
    pub fn new(config: Config) -> Result<Self, TextEnvError> {
        let tokenizer = Tokenizer::from_config(&config)?;
        let id = if config.generate_ids() {
            Some(format!("!{}", nanoid!()))
        } else {
            None
        };
        debug(&config, || {
            format!(
                "TextBase::new: id={:?} token_pattern={}",
                id,
                tokenizer.pattern()
            )
        });
        Ok(Self {
            id,
            key: next_basekey(),
            documents: Vec::new(),
            idmap: HashMap::new(),
            tokenizer,
            config,
        })
    }

    /// Builder pattern to set the public identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Identity key of this text base, carried by every span it produces
    pub fn key(&self) -> BaseKey {
        self.key
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration. The tokenizer is fixed at construction and is not affected.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Tokenizes the text and adds it as a new document.
    /// Fails with [`TextEnvError::DuplicateDocumentId`] if the identifier is already in use.
    pub fn load_document(
        &mut self,
        id: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<&Document, TextEnvError> {
        let text: String = text.into();
        let tokens = self.tokenizer.tokenize(&text);
        let handle = self.insert_document(id.into(), text, tokens)?;
        Ok(&self.documents[handle.as_usize()])
    }

    /// Adds a document with a known tokenization (used when deserialising)
    pub(crate) fn insert_document(
        &mut self,
        id: String,
        text: String,
        tokens: Vec<Token>,
    ) -> Result<DocumentHandle, TextEnvError> {
        if self.idmap.contains_key(id.as_str()) {
            return Err(TextEnvError::DuplicateDocumentId(
                id,
                "TextBase::load_document()",
            ));
        }
        let id: Arc<str> = Arc::from(id);
        let mut document = Document::new(id.clone(), text, tokens);
        let handle = DocumentHandle::new(self.documents.len());
        document.intid = Some(handle);
        #[cfg(feature = "textvalidation")]
        if self.config.textvalidation() {
            document.checksum = Some(crate::textvalidation::text_checksum(&document.text));
        }
        debug(&self.config, || {
            format!(
                "TextBase::insert_document: id={} handle={:?} tokens={} chars={}",
                id,
                handle,
                document.token_count(),
                document.textlen
            )
        });
        self.idmap.insert(id, handle);
        self.documents.push(document);
        Ok(handle)
    }

    /// Restores a previously computed checksum (used when deserialising)
    pub(crate) fn set_checksum(&mut self, handle: DocumentHandle, checksum: Option<String>) {
        if let Some(document) = self.documents.get_mut(handle.as_usize()) {
            document.checksum = checksum;
        }
    }

    /// Returns the document with the given identifier, [`TextEnvError::NotFound`] if absent.
    pub fn document(&self, id: &str) -> Result<&Document, TextEnvError> {
        let handle = self.resolve_id(id)?;
        Ok(&self.documents[handle.as_usize()])
    }

    /// Returns the document by handle
    pub fn get(&self, handle: DocumentHandle) -> Result<&Document, TextEnvError> {
        self.documents.get(handle.as_usize()).ok_or_else(|| {
            TextEnvError::NotFound(format!("{:?}", handle), "TextBase::get()")
        })
    }

    /// Resolves a document identifier to a handle
    pub fn resolve_id(&self, id: &str) -> Result<DocumentHandle, TextEnvError> {
        self.idmap
            .get(id)
            .copied()
            .ok_or_else(|| TextEnvError::NotFound(id.to_string(), "TextBase::resolve_id()"))
    }

    pub fn has_document(&self, id: &str) -> bool {
        self.idmap.contains_key(id)
    }

    /// Document identifiers in insertion order
    pub fn document_ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|document| document.id())
    }

    /// Documents in insertion order
    pub fn documents(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Assigns a document to a group; groups only influence partitioning
    pub fn set_group_id(
        &mut self,
        id: &str,
        group: impl Into<String>,
    ) -> Result<(), TextEnvError> {
        let handle = self.resolve_id(id)?;
        self.documents[handle.as_usize()].group = Some(group.into());
        Ok(())
    }

    pub fn group_id(&self, id: &str) -> Option<&str> {
        self.document(id).ok().and_then(|document| document.group())
    }

    /// Returns the span covering the whole document
    pub fn document_span(&self, id: &str) -> Result<ResultSpan<'_>, TextEnvError> {
        let document = self.document(id)?;
        Ok(self.wrap(document, 0, document.token_count()))
    }

    /// Returns the span of `length` tokens starting at token `start`.
    /// Fails with [`TextEnvError::OutOfRange`] if it exceeds the document.
    pub fn span(
        &self,
        id: &str,
        start: usize,
        length: usize,
    ) -> Result<ResultSpan<'_>, TextEnvError> {
        let document = self.document(id)?;
        if start
            .checked_add(length)
            .map_or(true, |end| end > document.token_count())
        {
            return Err(TextEnvError::OutOfRange(
                start,
                start.saturating_add(length),
                document.token_count(),
                "TextBase::span()",
            ));
        }
        Ok(self.wrap(document, start, length))
    }

    /// Returns the smallest span covering the character range `[char_start, char_end)`.
    /// A range covering no token resolves to the zero-length span at the next token.
    pub fn span_by_chars(
        &self,
        id: &str,
        char_start: usize,
        char_end: usize,
    ) -> Result<ResultSpan<'_>, TextEnvError> {
        let document = self.document(id)?;
        let (start, length) = document.token_range_by_chars(char_start, char_end)?;
        Ok(self.wrap(document, start, length))
    }

    /// Resolves a span against this text base, giving access to its text.
    /// Fails with [`TextEnvError::ForeignSpan`] if the span was produced by another text base.
    pub fn resolve(&self, span: &Span) -> Result<ResultSpan<'_>, TextEnvError> {
        let document = self.check_span(span)?;
        Ok(ResultSpan::new(span.clone(), self, document))
    }

    /// Returns a reference to a token
    pub fn token(&self, id: &str, index: usize) -> Result<TokenRef, TextEnvError> {
        let document = self.document(id)?;
        if index >= document.token_count() {
            return Err(TextEnvError::OutOfRange(
                index,
                index.saturating_add(1),
                document.token_count(),
                "TextBase::token()",
            ));
        }
        Ok(TokenRef::new(self.key, document.id_arc().clone(), index))
    }

    /// Verifies a span belongs to this text base and lies within its document
    pub(crate) fn check_span(&self, span: &Span) -> Result<&Document, TextEnvError> {
        if span.base != self.key {
            return Err(TextEnvError::ForeignSpan("TextBase::check_span()"));
        }
        let document = self.document(span.document_id())?;
        if span.end() > document.token_count() {
            return Err(TextEnvError::OutOfRange(
                span.start(),
                span.end(),
                document.token_count(),
                "TextBase::check_span()",
            ));
        }
        Ok(document)
    }

    /// Verifies a token reference belongs to this text base and exists
    pub(crate) fn check_token(&self, token: &TokenRef) -> Result<&Document, TextEnvError> {
        if token.base != self.key {
            return Err(TextEnvError::ForeignSpan("TextBase::check_token()"));
        }
        let document = self.document(token.document_id())?;
        if token.index >= document.token_count() {
            return Err(TextEnvError::OutOfRange(
                token.index,
                token.index.saturating_add(1),
                document.token_count(),
                "TextBase::check_token()",
            ));
        }
        Ok(document)
    }

    /// Builds a span for an id that is known to exist (used when restoring serialised spans)
    pub(crate) fn span_unchecked(&self, document: &Document, start: usize, length: usize) -> Span {
        Span::new(self.key, document.id_arc().clone(), start, length)
    }

    fn wrap<'a>(&'a self, document: &'a Document, start: usize, length: usize) -> ResultSpan<'a> {
        ResultSpan::new(
            self.span_unchecked(document, start, length),
            self,
            document,
        )
    }
}
