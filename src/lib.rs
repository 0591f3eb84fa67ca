/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! ## Introduction
//!
//! This library is a substrate for text-learning experiments: it keeps a collection of tokenized
//! documents and layers of labels on top of them.
//!
//! **What can you do with this library?**
//!
//! * Keep an immutable, tokenized [`TextBase`] of documents, addressed by token [`Span`]s.
//! * Recover text and its annotations from lightly tagged input (`<name>...</name>`) with the [`TagParser`] and [`TextBaseLoader`].
//! * Record types (sets of spans), span and token properties, and whether the annotation of a type
//!   is complete for a document (closure), in a [`TextLabels`] environment.
//! * Hand out capabilities by trait: read-only ([`TextEnv`]), add-only ([`MonotonicTextEnv`]) or
//!   fully mutable ([`MutableTextEnv`]). Annotators get the monotonic one, so they can never
//!   remove what an earlier annotator established.
//! * Work on derived views without copying: document subsets ([`SubTextBase`], [`SubTextLabels`]),
//!   layered environments with shadowed names ([`NestedTextLabels`]), and train/test partitions ([`Splitter`]).
//! * Read and write a [`Corpus`] as JSON, CBOR or (the annotation layer only) CSV.
//!
//! High-level API:
//! * [`Corpus`]
//! * [`TextBaseLoader`]
//! * [`ResultSpan`]
//! * [`TextEnv`], [`MonotonicTextEnv`], [`MutableTextEnv`]
//! * [`Annotator`]
//!
//! Low-level API:
//! * [`TextBase`]
//! * [`Document`]
//! * [`Span`]
//! * [`TokenRef`]
//! * [`Annotations`]

mod annotator;
mod closure;
mod config;
mod corpus;
mod document;
mod error;
mod file;
mod json;
mod loader;
mod nestedtextlabels;
mod span;
mod splitter;
mod subtextbase;
mod subtextlabels;
mod tagparser;
mod text;
mod textbase;
mod textenv;
mod textlabels;
mod tokenizer;
mod types;

#[cfg(feature = "csv")]
mod csv;

#[cfg(feature = "textvalidation")]
mod textvalidation;

// Our internal crate structure is not very relevant to the outside world,
// expose all structs and traits in the root namespace, and be explicit about it:

pub use annotator::{
    Annotator, CharAnnotation, SerialAnnotator, StringAnnotator, StringAnnotatorAdapter,
};
pub use closure::{ClosurePolicy, ClosureState};
pub use config::{Config, Configurable};
pub use corpus::Corpus;
#[cfg(feature = "csv")]
pub use crate::csv::Operation;
pub use document::Document;
pub use error::TextEnvError;
pub use json::{FromJson, ToJson};
pub use loader::{LoadReport, TextBaseLoader};
pub use nestedtextlabels::NestedTextLabels;
pub use span::{ResultSpan, Span, TokenRef};
pub use splitter::{CrossValSplitter, RandomSplitter, Split, Splitter};
pub use subtextbase::SubTextBase;
pub use subtextlabels::{MonotonicSubTextLabels, SubTextLabels};
pub use tagparser::{TagAnnotation, TagParser, TaggedText, DEFAULT_TAG_PATTERN};
pub use text::Text;
pub use textbase::TextBase;
pub use textenv::{MonotonicTextEnv, MutableTextEnv, NegativeSpans, Target, TextEnv};
pub use textlabels::{Annotations, TextLabels};
pub use tokenizer::{Token, Tokenizer, DEFAULT_TOKEN_PATTERN};
pub use types::*;

pub use regex::Regex;

mod tests;
