//! Annotators add information to an environment through the append-only [`MonotonicTextEnv`] handle.

use crate::error::TextEnvError;
use crate::span::Span;
use crate::text::Text;
use crate::textenv::{MonotonicTextEnv, TextEnv};
use crate::types::*;

/// An annotator adds types and properties to an environment. It only ever receives an append-only
/// handle, so running several annotators can never erase each other's output.
pub trait Annotator {
    /// Adds annotations to the environment
    fn annotate(&self, env: &mut dyn MonotonicTextEnv) -> Result<(), TextEnvError>;

    /// Name under which provenance is recorded
    fn name(&self) -> &str;

    /// Explains how the annotation of a span came about
    fn explain(&self, _env: &dyn TextEnv, span: &Span) -> String {
        format!("{} was annotated by {}", span, self.name())
    }

    /// Annotates the environment and records provenance
    fn run(&self, env: &mut dyn MonotonicTextEnv) -> Result<(), TextEnvError> {
        debug(env.textbase().config(), || format!("Annotator::run: {}", self.name()));
        self.annotate(env)?;
        env.set_annotated_by(self.name())
    }
}

/// Runs several annotators one after another against the same environment
pub struct SerialAnnotator {
    name: String,
    annotators: Vec<Box<dyn Annotator>>,
}

impl SerialAnnotator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotators: Vec::new(),
        }
    }

    /// Builder pattern to add an annotator, they run in the order they are added
    pub fn with_annotator(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotators.push(annotator);
        self
    }

    pub fn len(&self) -> usize {
        self.annotators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotators.is_empty()
    }
}

impl Annotator for SerialAnnotator {
    fn annotate(&self, env: &mut dyn MonotonicTextEnv) -> Result<(), TextEnvError> {
        for annotator in self.annotators.iter() {
            annotator.run(env)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn explain(&self, env: &dyn TextEnv, span: &Span) -> String {
        self.annotators
            .iter()
            .map(|annotator| annotator.explain(env, span))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A character-offset annotation produced by a [`StringAnnotator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharAnnotation {
    /// Offset in unicode points
    pub offset: usize,
    /// Length in unicode points
    pub length: usize,
    /// Type name
    pub tp: String,
}

impl CharAnnotation {
    pub fn new(offset: usize, length: usize, tp: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            tp: tp.into(),
        }
    }
}

/// An annotator that works on the raw text of each document
pub trait StringAnnotator {
    fn name(&self) -> &str;

    /// Returns annotations in character offsets of the text
    fn annotate_string(&self, text: &str) -> Vec<CharAnnotation>;
}

/// Turns a [`StringAnnotator`] into an [`Annotator`]: its character annotations are snapped to token spans
pub struct StringAnnotatorAdapter<A: StringAnnotator> {
    inner: A,
}

impl<A: StringAnnotator> StringAnnotatorAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

impl<A: StringAnnotator> Annotator for StringAnnotatorAdapter<A> {
    fn annotate(&self, env: &mut dyn MonotonicTextEnv) -> Result<(), TextEnvError> {
        let mut found: Vec<(Span, String)> = Vec::new();
        for id in env.document_ids() {
            let document = env.textbase().document(id)?;
            for annotation in self.inner.annotate_string(document.text()) {
                let span = env.textbase().span_by_chars(
                    id,
                    annotation.offset,
                    annotation.offset + annotation.length,
                )?;
                found.push((span.into_span(), annotation.tp));
            }
        }
        for (span, tp) in found.iter() {
            env.add_to_type(span, tp)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
