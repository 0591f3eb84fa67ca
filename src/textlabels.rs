/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains [`Annotations`], the owned annotation data, and [`TextLabels`],
//! the concrete annotation environment that binds such data to a [`TextBase`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sealed::sealed;

use crate::closure::ClosureState;
use crate::error::TextEnvError;
use crate::span::{Span, TokenRef};
use crate::textbase::TextBase;
use crate::textenv::*;
use crate::types::*;

/// Owned annotation data: type sets, properties, closure flags and annotator provenance.
/// It is not bound to a text base by itself; spans carry the key of the text base they belong to.
/// Bind it with [`TextLabels::with_annotations()`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// type name -> instances
    pub(crate) types: BTreeMap<String, BTreeSet<Span>>,

    /// property name -> (span -> value)
    pub(crate) span_properties: BTreeMap<String, BTreeMap<Span, String>>,

    /// property name -> (token -> value)
    pub(crate) token_properties: BTreeMap<String, BTreeMap<TokenRef, String>>,

    /// type name -> documents in which it is closed
    pub(crate) closures: BTreeMap<String, BTreeSet<Arc<str>>>,

    /// annotator name -> when it was run
    pub(crate) annotated_by: BTreeMap<String, DateTime<Utc>>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.span_properties.is_empty()
            && self.token_properties.is_empty()
            && self.closures.is_empty()
            && self.annotated_by.is_empty()
    }

    /// Number of (type, span) instances
    pub fn instance_count(&self) -> usize {
        self.types.values().map(|spans| spans.len()).sum()
    }

    pub(crate) fn declare_type(&mut self, tp: &str) {
        if !self.types.contains_key(tp) {
            self.types.insert(tp.to_string(), BTreeSet::new());
        }
    }

    pub(crate) fn insert_instance(&mut self, tp: &str, span: Span) -> bool {
        self.declare_type(tp);
        self.types
            .get_mut(tp)
            .map(|spans| spans.insert(span))
            .unwrap_or(false)
    }

    pub(crate) fn remove_instance(&mut self, tp: &str, span: &Span) -> bool {
        self.types
            .get_mut(tp)
            .map(|spans| spans.remove(span))
            .unwrap_or(false)
    }

    pub(crate) fn has_instance(&self, tp: &str, span: &Span) -> bool {
        self.types
            .get(tp)
            .map(|spans| spans.contains(span))
            .unwrap_or(false)
    }

    pub(crate) fn instances(&self, tp: &str) -> impl Iterator<Item = &Span> {
        self.types.get(tp).into_iter().flat_map(|spans| spans.iter())
    }

    /// Instances of one document, these are contiguous in span order
    pub(crate) fn instances_in<'a>(
        &'a self,
        tp: &str,
        base: BaseKey,
        document: &'a Arc<str>,
    ) -> impl Iterator<Item = &'a Span> + 'a {
        let lowerbound = Span::new(base, document.clone(), 0, 0);
        self.types
            .get(tp)
            .into_iter()
            .flat_map(move |spans| spans.range(lowerbound.clone()..))
            .take_while(move |span| span.document == *document)
    }

    pub(crate) fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|tp| tp.as_str())
    }

    pub(crate) fn is_type(&self, tp: &str) -> bool {
        self.types.contains_key(tp)
    }

    pub(crate) fn span_property(&self, span: &Span, key: &str) -> Option<&str> {
        self.span_properties
            .get(key)
            .and_then(|values| values.get(span))
            .map(|value| value.as_str())
    }

    pub(crate) fn token_property(&self, token: &TokenRef, key: &str) -> Option<&str> {
        self.token_properties
            .get(key)
            .and_then(|values| values.get(token))
            .map(|value| value.as_str())
    }

    pub(crate) fn property(&self, target: Target<'_>, key: &str) -> Option<&str> {
        match target {
            Target::Span(span) => self.span_property(span, key),
            Target::Token(token) => self.token_property(token, key),
        }
    }

    /// Sets a property, returns the previous value
    pub(crate) fn insert_property(
        &mut self,
        target: Target<'_>,
        key: &str,
        value: &str,
    ) -> Option<String> {
        match target {
            Target::Span(span) => self
                .span_properties
                .entry(key.to_string())
                .or_default()
                .insert(span.clone(), value.to_string()),
            Target::Token(token) => self
                .token_properties
                .entry(key.to_string())
                .or_default()
                .insert(token.clone(), value.to_string()),
        }
    }

    pub(crate) fn remove_property(&mut self, target: Target<'_>, key: &str) -> Option<String> {
        match target {
            Target::Span(span) => self
                .span_properties
                .get_mut(key)
                .and_then(|values| values.remove(span)),
            Target::Token(token) => self
                .token_properties
                .get_mut(key)
                .and_then(|values| values.remove(token)),
        }
    }

    /// Sets a property unless a different value is present, in which case [`TextEnvError::PropertyConflict`] is returned
    pub(crate) fn insert_property_monotonic(
        &mut self,
        target: Target<'_>,
        key: &str,
        value: &str,
    ) -> Result<(), TextEnvError> {
        match self.property(target, key) {
            Some(existing) if existing == value => Ok(()),
            Some(_) => Err(TextEnvError::PropertyConflict(
                key.to_string(),
                target.describe(),
                "MonotonicTextEnv::set_property()",
            )),
            None => {
                self.insert_property(target, key, value);
                Ok(())
            }
        }
    }

    pub(crate) fn span_property_names(&self) -> impl Iterator<Item = &str> {
        self.span_properties
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, _)| key.as_str())
    }

    pub(crate) fn token_property_names(&self) -> impl Iterator<Item = &str> {
        self.token_properties
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, _)| key.as_str())
    }

    pub(crate) fn is_closed(&self, tp: &str, document: &str) -> bool {
        self.closures
            .get(tp)
            .map(|documents| documents.contains(document))
            .unwrap_or(false)
    }

    pub(crate) fn close(&mut self, tp: &str, document: Arc<str>) {
        self.declare_type(tp);
        self.closures
            .entry(tp.to_string())
            .or_default()
            .insert(document);
    }

    pub(crate) fn open(&mut self, tp: &str, document: &str) {
        if let Some(documents) = self.closures.get_mut(tp) {
            documents.remove(document);
        }
    }

    pub(crate) fn annotated_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.annotated_by.get(name).copied()
    }

    pub(crate) fn set_annotated_by(&mut self, name: &str, timestamp: DateTime<Utc>) {
        self.annotated_by.insert(name.to_string(), timestamp);
    }

    /// Checks that every span and token in this data belongs to the text base and is within bounds
    pub(crate) fn validate_against(&self, textbase: &TextBase) -> Result<(), TextEnvError> {
        for spans in self.types.values() {
            for span in spans.iter() {
                textbase.check_span(span)?;
            }
        }
        for values in self.span_properties.values() {
            for span in values.keys() {
                textbase.check_span(span)?;
            }
        }
        for values in self.token_properties.values() {
            for token in values.keys() {
                textbase.check_token(token)?;
            }
        }
        for documents in self.closures.values() {
            for document in documents.iter() {
                textbase.document(document)?;
            }
        }
        Ok(())
    }
}

/// The concrete annotation environment: annotation data bound to exactly one [`TextBase`], which it borrows.
/// It implements all three capability levels ([`TextEnv`], [`MonotonicTextEnv`], [`MutableTextEnv`]).
#[derive(Debug)]
pub struct TextLabels<'base> {
    base: &'base TextBase,
    data: Annotations,
}

impl<'base> TextLabels<'base> {
    /// Creates a new empty environment over the text base
    pub fn new(base: &'base TextBase) -> Self {
        Self {
            base,
            data: Annotations::default(),
        }
    }

    /// Binds existing annotation data to a text base.
    /// Fails with [`TextEnvError::ForeignSpan`] if the data holds spans of another text base.
    pub fn with_annotations(
        base: &'base TextBase,
        data: Annotations,
    ) -> Result<Self, TextEnvError> {
        data.validate_against(base)?;
        Ok(Self { base, data })
    }

    /// Binds data that is known to belong to the text base
    pub(crate) fn bind(base: &'base TextBase, data: Annotations) -> Self {
        Self { base, data }
    }

    pub fn annotations(&self) -> &Annotations {
        &self.data
    }

    /// Releases the annotation data, ending the borrow of the text base
    pub fn into_annotations(self) -> Annotations {
        self.data
    }

    /// Number of (type, span) instances
    pub fn instance_count(&self) -> usize {
        self.data.instance_count()
    }

    fn check_target(&self, target: Target<'_>) -> Result<(), TextEnvError> {
        match target {
            Target::Span(span) => self.base.check_span(span).map(|_| ()),
            Target::Token(token) => self.base.check_token(token).map(|_| ()),
        }
    }
}

#[sealed]
impl<'base> TextEnv for TextLabels<'base> {
    fn textbase(&self) -> &TextBase {
        self.base
    }

    fn contains_document(&self, id: &str) -> bool {
        self.base.has_document(id)
    }

    fn document_ids(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.base.document_ids())
    }

    fn has_type(&self, span: &Span, tp: &str) -> bool {
        span.base_key() == self.base.key() && self.data.has_instance(tp, span)
    }

    fn instances(&self, tp: &str) -> Vec<Span> {
        self.data.instances(tp).cloned().collect()
    }

    fn instances_in(&self, tp: &str, document: &str) -> Result<Vec<Span>, TextEnvError> {
        let document = self.base.document(document)?;
        Ok(self
            .data
            .instances_in(tp, self.base.key(), document.id_arc())
            .cloned()
            .collect())
    }

    fn types(&self) -> Vec<&str> {
        self.data.types().collect()
    }

    fn is_type(&self, tp: &str) -> bool {
        self.data.is_type(tp)
    }

    fn span_property(&self, span: &Span, key: &str) -> Option<&str> {
        if span.base_key() != self.base.key() {
            return None;
        }
        self.data.span_property(span, key)
    }

    fn token_property(&self, token: &TokenRef, key: &str) -> Option<&str> {
        if token.base_key() != self.base.key() {
            return None;
        }
        self.data.token_property(token, key)
    }

    fn span_property_names(&self) -> Vec<&str> {
        self.data.span_property_names().collect()
    }

    fn token_property_names(&self) -> Vec<&str> {
        self.data.token_property_names().collect()
    }

    fn closure(&self, tp: &str, document: &str) -> ClosureState {
        self.data.is_closed(tp, document).into()
    }

    fn closed_documents(&self, tp: &str) -> Vec<&str> {
        self.base
            .document_ids()
            .filter(|document| self.data.is_closed(tp, document))
            .collect()
    }

    fn annotated_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.data.annotated_at(name)
    }
}

#[sealed]
impl<'base> MonotonicTextEnv for TextLabels<'base> {
    fn add_to_type(&mut self, span: &Span, tp: &str) -> Result<(), TextEnvError> {
        validate_name(tp, "TextLabels::add_to_type()")?;
        self.base.check_span(span)?;
        self.data.insert_instance(tp, span.clone());
        Ok(())
    }

    fn set_property(
        &mut self,
        target: Target<'_>,
        key: &str,
        value: &str,
    ) -> Result<(), TextEnvError> {
        validate_name(key, "TextLabels::set_property()")?;
        self.check_target(target)?;
        self.data.insert_property_monotonic(target, key, value)
    }

    fn close_type(&mut self, tp: &str, document: &str) -> Result<(), TextEnvError> {
        validate_name(tp, "TextLabels::close_type()")?;
        let document = self.base.document(document)?;
        self.data.close(tp, document.id_arc().clone());
        Ok(())
    }

    fn set_annotated_by(&mut self, name: &str) -> Result<(), TextEnvError> {
        validate_name(name, "TextLabels::set_annotated_by()")?;
        debug(self.base.config(), || {
            format!("TextLabels::set_annotated_by: {}", name)
        });
        self.data.set_annotated_by(name, Utc::now());
        Ok(())
    }
}

#[sealed]
impl<'base> MutableTextEnv for TextLabels<'base> {
    fn remove_from_type(&mut self, span: &Span, tp: &str) -> Result<bool, TextEnvError> {
        self.base.check_span(span)?;
        Ok(self.data.remove_instance(tp, span))
    }

    fn overwrite_property(
        &mut self,
        target: Target<'_>,
        key: &str,
        value: &str,
    ) -> Result<Option<String>, TextEnvError> {
        validate_name(key, "TextLabels::overwrite_property()")?;
        self.check_target(target)?;
        Ok(self.data.insert_property(target, key, value))
    }

    fn remove_property(
        &mut self,
        target: Target<'_>,
        key: &str,
    ) -> Result<Option<String>, TextEnvError> {
        self.check_target(target)?;
        Ok(self.data.remove_property(target, key))
    }

    fn set_closure(&mut self, tp: &str, document: &str, closed: bool) -> Result<(), TextEnvError> {
        validate_name(tp, "TextLabels::set_closure()")?;
        let document = self.base.document(document)?;
        if closed {
            self.data.close(tp, document.id_arc().clone());
        } else {
            self.data.open(tp, document.id());
        }
        Ok(())
    }
}
