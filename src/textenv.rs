/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module defines the three capability levels over annotation environments:
//!
//! * [`TextEnv`] - read-only access to types, properties and closure flags.
//! * [`MonotonicTextEnv`] - read access plus append-only writes. Nothing can be removed or re-opened through it,
//!   this is the handle given to annotators.
//! * [`MutableTextEnv`] - full read/write access, including removal.
//!
//! All three are implemented by the concrete store [`crate::TextLabels`]; the views in
//! [`crate::SubTextLabels`] and [`crate::NestedTextLabels`] implement the levels they permit.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sealed::sealed;

use crate::closure::ClosureState;
use crate::error::TextEnvError;
use crate::span::{ResultSpan, Span, TokenRef};
use crate::textbase::TextBase;
use crate::types::*;

/// What a property is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'t> {
    Span(&'t Span),
    Token(&'t TokenRef),
}

impl<'t> From<&'t Span> for Target<'t> {
    fn from(span: &'t Span) -> Self {
        Self::Span(span)
    }
}

impl<'t> From<&'t TokenRef> for Target<'t> {
    fn from(token: &'t TokenRef) -> Self {
        Self::Token(token)
    }
}

impl<'t, 'a> From<&'t ResultSpan<'a>> for Target<'t> {
    fn from(span: &'t ResultSpan<'a>) -> Self {
        Self::Span(span.as_span())
    }
}

impl<'t> Target<'t> {
    pub fn document_id(&self) -> &str {
        match self {
            Self::Span(span) => span.document_id(),
            Self::Token(token) => token.document_id(),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Span(span) => span.to_string(),
            Self::Token(token) => token.to_string(),
        }
    }
}

/// Read-only capability over an annotation environment.
/// This trait is sealed and object-safe; consumers typically hold a `&dyn TextEnv`.
#[sealed(pub(crate))]
pub trait TextEnv {
    /// The text base this environment is bound to
    fn textbase(&self) -> &TextBase;

    /// Is the document part of this environment? Views may expose only a subset of the text base.
    fn contains_document(&self, id: &str) -> bool;

    /// Identifiers of the documents in this environment, in text base (or view) order
    fn document_ids(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Is the span an instance of the type?
    /// A span from another text base is never an instance, even if it names a document with the same id.
    fn has_type(&self, span: &Span, tp: &str) -> bool;

    /// All instances of the type, sorted by span order
    fn instances(&self, tp: &str) -> Vec<Span>;

    /// All instances of the type in one document, sorted by span order.
    /// Fails with [`TextEnvError::NotFound`] if the document is not in this environment.
    fn instances_in(&self, tp: &str, document: &str) -> Result<Vec<Span>, TextEnvError>;

    /// All known type names, sorted
    fn types(&self) -> Vec<&str>;

    /// Is this a known type name?
    fn is_type(&self, tp: &str) -> bool;

    /// Value of the property on the span. Spans from another text base have no properties here.
    fn span_property(&self, span: &Span, key: &str) -> Option<&str>;

    /// Value of the property on the token. Tokens from another text base have no properties here.
    fn token_property(&self, token: &TokenRef, key: &str) -> Option<&str>;

    /// All property names set on any span, sorted
    fn span_property_names(&self) -> Vec<&str>;

    /// All property names set on any token, sorted
    fn token_property_names(&self) -> Vec<&str>;

    /// Closure state of the type in the document
    fn closure(&self, tp: &str, document: &str) -> ClosureState;

    /// Documents in which the type is closed, in environment order
    fn closed_documents(&self, tp: &str) -> Vec<&str>;

    /// Has an annotator with this name been run against this environment?
    fn is_annotated_by(&self, name: &str) -> bool {
        self.annotated_at(name).is_some()
    }

    /// When the annotator with this name was recorded
    fn annotated_at(&self, name: &str) -> Option<DateTime<Utc>>;

    fn is_closed(&self, tp: &str, document: &str) -> bool {
        self.closure(tp, document) == ClosureState::Closed
    }

    /// Resolves a span against the underlying text base, restricted to the documents of this environment
    fn resolve(&self, span: &Span) -> Result<ResultSpan<'_>, TextEnvError> {
        if !self.contains_document(span.document_id()) {
            return Err(TextEnvError::NotFound(
                span.document_id().to_string(),
                "TextEnv::resolve(): document not in this environment",
            ));
        }
        self.textbase().resolve(span)
    }

    /// Every span of the document (any start, any length including 0) that is not an instance of the type.
    /// Only valid when the type is closed in the document, fails with [`TextEnvError::IncompleteAnnotation`] otherwise.
    fn not_instances(&self, tp: &str, document: &str) -> Result<NegativeSpans, TextEnvError> {
        let positives = self.instances_in(tp, document)?;
        if !self.is_closed(tp, document) {
            return Err(TextEnvError::IncompleteAnnotation(
                tp.to_string(),
                document.to_string(),
                "TextEnv::not_instances()",
            ));
        }
        let doc = self.textbase().document(document)?;
        Ok(NegativeSpans::new(
            self.textbase().key(),
            doc.id_arc().clone(),
            doc.token_count(),
            positives,
        ))
    }
}

/// Append-only capability: everything that holds through this handle keeps holding.
/// Removal and re-opening closures are not part of this interface.
#[sealed(pub(crate))]
pub trait MonotonicTextEnv: TextEnv {
    /// Makes the span an instance of the type. Adding an existing instance is a no-op.
    fn add_to_type(&mut self, span: &Span, tp: &str) -> Result<(), TextEnvError>;

    /// Sets a property on a span or token. Setting the value it already has is a no-op,
    /// a different existing value fails with [`TextEnvError::PropertyConflict`].
    fn set_property(&mut self, target: Target<'_>, key: &str, value: &str)
        -> Result<(), TextEnvError>;

    /// Closes the type in the document (Open to Closed only)
    fn close_type(&mut self, tp: &str, document: &str) -> Result<(), TextEnvError>;

    /// Records that an annotator with this name has been run, timestamped now
    fn set_annotated_by(&mut self, name: &str) -> Result<(), TextEnvError>;

    fn set_span_property(&mut self, span: &Span, key: &str, value: &str) -> Result<(), TextEnvError> {
        self.set_property(Target::Span(span), key, value)
    }

    fn set_token_property(
        &mut self,
        token: &TokenRef,
        key: &str,
        value: &str,
    ) -> Result<(), TextEnvError> {
        self.set_property(Target::Token(token), key, value)
    }
}

/// Full read/write capability.
///
/// [`MonotonicTextEnv::set_property`] keeps its behaviour here: a different existing value still
/// fails with [`TextEnvError::PropertyConflict`]. Use [`MutableTextEnv::overwrite_property`] to
/// replace a value.
#[sealed(pub(crate))]
pub trait MutableTextEnv: MonotonicTextEnv {
    /// Removes the span from the type, returns whether it was an instance
    fn remove_from_type(&mut self, span: &Span, tp: &str) -> Result<bool, TextEnvError>;

    /// Sets a property, replacing any existing value. Returns the previous value.
    fn overwrite_property(
        &mut self,
        target: Target<'_>,
        key: &str,
        value: &str,
    ) -> Result<Option<String>, TextEnvError>;

    /// Removes a property, returns the previous value
    fn remove_property(&mut self, target: Target<'_>, key: &str)
        -> Result<Option<String>, TextEnvError>;

    /// Sets the closure flag of the type in the document, in either direction
    fn set_closure(&mut self, tp: &str, document: &str, closed: bool) -> Result<(), TextEnvError>;
}

/// Iterator over all spans of a document that are not an instance of a given type.
/// Produced by [`TextEnv::not_instances()`]; it holds no borrow on the environment.
/// Spans are produced ordered by start, then length.
#[derive(Debug, Clone)]
pub struct NegativeSpans {
    base: BaseKey,
    document: Arc<str>,
    token_count: usize,
    positives: HashSet<(usize, usize)>,
    start: usize,
    length: usize,
}

impl NegativeSpans {
    pub(crate) fn new(
        base: BaseKey,
        document: Arc<str>,
        token_count: usize,
        positives: Vec<Span>,
    ) -> Self {
        Self {
            base,
            document,
            token_count,
            positives: positives
                .into_iter()
                .map(|span| (span.start(), span.length()))
                .collect(),
            start: 0,
            length: 0,
        }
    }

    /// The document the spans belong to
    pub fn document_id(&self) -> &str {
        &self.document
    }
}

impl Iterator for NegativeSpans {
    type Item = Span;

    fn next(&mut self) -> Option<Self::Item> {
        while self.start <= self.token_count {
            let (start, length) = (self.start, self.length);
            if self.start + self.length < self.token_count {
                self.length += 1;
            } else {
                self.start += 1;
                self.length = 0;
            }
            if !self.positives.contains(&(start, length)) {
                return Some(Span::new(self.base, self.document.clone(), start, length));
            }
        }
        None
    }
}
