/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains [`NestedTextLabels`], a layered view that shadows selected types and
//! properties of a read-only parent environment with a local, append-only store.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use sealed::sealed;

use crate::closure::ClosureState;
use crate::error::TextEnvError;
use crate::span::{Span, TokenRef};
use crate::textbase::TextBase;
use crate::textenv::*;
use crate::textlabels::Annotations;
use crate::types::*;

/// A layered environment over a read-only parent.
///
/// Queries for the declared shadowed types and properties are answered from a local store,
/// which starts out empty and only grows; all other queries fall through to the parent.
/// The parent is never mutated, so predictions written under a shadowed name are never visible through it.
/// Writes for names that are not shadowed fail with [`TextEnvError::NotShadowed`].
///
/// Example:
///
/// ```
/// # use textenv::*;
/// # fn main() -> Result<(), TextEnvError> {
/// let mut textbase = TextBase::new(Config::default())?;
/// textbase.load_document("doc1", "Hello world")?;
/// let labels = TextLabels::new(&textbase);
/// let mut nested = NestedTextLabels::new(&labels).with_shadowed_type("prediction")?;
/// let span = textbase.span("doc1", 0, 1)?;
/// nested.add_to_type(&span, "prediction")?;
/// assert!(nested.has_type(&span, "prediction"));
/// assert!(!labels.has_type(&span, "prediction"));
/// # Ok(())
/// # }
/// ```
pub struct NestedTextLabels<'a> {
    parent: &'a dyn TextEnv,
    local: Annotations,
    shadowed_types: BTreeSet<String>,
    shadowed_properties: BTreeSet<String>,
}

impl<'a> NestedTextLabels<'a> {
    /// Creates a layered view that shadows nothing yet
    pub fn new(parent: &'a dyn TextEnv) -> Self {
        Self {
            parent,
            local: Annotations::default(),
            shadowed_types: BTreeSet::new(),
            shadowed_properties: BTreeSet::new(),
        }
    }

    /// Builder pattern to declare a shadowed type
    pub fn with_shadowed_type(mut self, tp: &str) -> Result<Self, TextEnvError> {
        validate_name(tp, "NestedTextLabels::with_shadowed_type()")?;
        self.shadowed_types.insert(tp.to_string());
        Ok(self)
    }

    /// Builder pattern to declare a shadowed property (for both spans and tokens)
    pub fn with_shadowed_property(mut self, key: &str) -> Result<Self, TextEnvError> {
        validate_name(key, "NestedTextLabels::with_shadowed_property()")?;
        self.shadowed_properties.insert(key.to_string());
        Ok(self)
    }

    pub fn shadows_type(&self, tp: &str) -> bool {
        self.shadowed_types.contains(tp)
    }

    pub fn shadows_property(&self, key: &str) -> bool {
        self.shadowed_properties.contains(key)
    }

    pub fn parent(&self) -> &'a dyn TextEnv {
        self.parent
    }

    /// The local layer: everything written through this view
    pub fn local(&self) -> &Annotations {
        &self.local
    }

    pub fn into_local(self) -> Annotations {
        self.local
    }

    fn check_type(&self, tp: &str, contextmsg: &'static str) -> Result<(), TextEnvError> {
        if self.shadows_type(tp) {
            Ok(())
        } else {
            Err(TextEnvError::NotShadowed(tp.to_string(), contextmsg))
        }
    }

    fn check_document(&self, id: &str, contextmsg: &'static str) -> Result<(), TextEnvError> {
        if self.parent.contains_document(id) {
            Ok(())
        } else {
            Err(TextEnvError::NotFound(id.to_string(), contextmsg))
        }
    }
}

#[sealed]
impl<'a> TextEnv for NestedTextLabels<'a> {
    fn textbase(&self) -> &TextBase {
        self.parent.textbase()
    }

    fn contains_document(&self, id: &str) -> bool {
        self.parent.contains_document(id)
    }

    fn document_ids(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        self.parent.document_ids()
    }

    fn has_type(&self, span: &Span, tp: &str) -> bool {
        if self.shadows_type(tp) {
            span.base_key() == self.textbase().key() && self.local.has_instance(tp, span)
        } else {
            self.parent.has_type(span, tp)
        }
    }

    fn instances(&self, tp: &str) -> Vec<Span> {
        if self.shadows_type(tp) {
            self.local.instances(tp).cloned().collect()
        } else {
            self.parent.instances(tp)
        }
    }

    fn instances_in(&self, tp: &str, document: &str) -> Result<Vec<Span>, TextEnvError> {
        if self.shadows_type(tp) {
            self.check_document(document, "NestedTextLabels::instances_in()")?;
            let document = self.textbase().document(document)?;
            Ok(self
                .local
                .instances_in(tp, self.textbase().key(), document.id_arc())
                .cloned()
                .collect())
        } else {
            self.parent.instances_in(tp, document)
        }
    }

    fn types(&self) -> Vec<&str> {
        let mut types: BTreeSet<&str> = self
            .parent
            .types()
            .into_iter()
            .filter(|tp| !self.shadows_type(tp))
            .collect();
        types.extend(self.local.types());
        types.into_iter().collect()
    }

    fn is_type(&self, tp: &str) -> bool {
        if self.shadows_type(tp) {
            self.local.is_type(tp)
        } else {
            self.parent.is_type(tp)
        }
    }

    fn span_property(&self, span: &Span, key: &str) -> Option<&str> {
        if self.shadows_property(key) {
            if span.base_key() != self.textbase().key() {
                return None;
            }
            self.local.span_property(span, key)
        } else {
            self.parent.span_property(span, key)
        }
    }

    fn token_property(&self, token: &TokenRef, key: &str) -> Option<&str> {
        if self.shadows_property(key) {
            if token.base_key() != self.textbase().key() {
                return None;
            }
            self.local.token_property(token, key)
        } else {
            self.parent.token_property(token, key)
        }
    }

    fn span_property_names(&self) -> Vec<&str> {
        let mut names: BTreeSet<&str> = self
            .parent
            .span_property_names()
            .into_iter()
            .filter(|key| !self.shadows_property(key))
            .collect();
        names.extend(self.local.span_property_names());
        names.into_iter().collect()
    }

    fn token_property_names(&self) -> Vec<&str> {
        let mut names: BTreeSet<&str> = self
            .parent
            .token_property_names()
            .into_iter()
            .filter(|key| !self.shadows_property(key))
            .collect();
        names.extend(self.local.token_property_names());
        names.into_iter().collect()
    }

    fn closure(&self, tp: &str, document: &str) -> ClosureState {
        if self.shadows_type(tp) {
            self.local.is_closed(tp, document).into()
        } else {
            self.parent.closure(tp, document)
        }
    }

    fn closed_documents(&self, tp: &str) -> Vec<&str> {
        if self.shadows_type(tp) {
            self.parent
                .document_ids()
                .filter(|document| self.local.is_closed(tp, document))
                .collect()
        } else {
            self.parent.closed_documents(tp)
        }
    }

    fn annotated_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.local
            .annotated_at(name)
            .or_else(|| self.parent.annotated_at(name))
    }
}

#[sealed]
impl<'a> MonotonicTextEnv for NestedTextLabels<'a> {
    fn add_to_type(&mut self, span: &Span, tp: &str) -> Result<(), TextEnvError> {
        self.check_type(tp, "NestedTextLabels::add_to_type()")?;
        self.check_document(span.document_id(), "NestedTextLabels::add_to_type()")?;
        self.parent.textbase().check_span(span)?;
        self.local.insert_instance(tp, span.clone());
        Ok(())
    }

    fn set_property(
        &mut self,
        target: Target<'_>,
        key: &str,
        value: &str,
    ) -> Result<(), TextEnvError> {
        if !self.shadows_property(key) {
            return Err(TextEnvError::NotShadowed(
                key.to_string(),
                "NestedTextLabels::set_property()",
            ));
        }
        self.check_document(target.document_id(), "NestedTextLabels::set_property()")?;
        match target {
            Target::Span(span) => self.parent.textbase().check_span(span).map(|_| ())?,
            Target::Token(token) => self.parent.textbase().check_token(token).map(|_| ())?,
        }
        self.local.insert_property_monotonic(target, key, value)
    }

    fn close_type(&mut self, tp: &str, document: &str) -> Result<(), TextEnvError> {
        self.check_type(tp, "NestedTextLabels::close_type()")?;
        self.check_document(document, "NestedTextLabels::close_type()")?;
        let document = self.parent.textbase().document(document)?;
        self.local.close(tp, document.id_arc().clone());
        Ok(())
    }

    fn set_annotated_by(&mut self, name: &str) -> Result<(), TextEnvError> {
        validate_name(name, "NestedTextLabels::set_annotated_by()")?;
        self.local.set_annotated_by(name, Utc::now());
        Ok(())
    }
}
