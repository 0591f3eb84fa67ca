/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`Corpus`]: a [`TextBase`] together with the [`Annotations`] on it,
//! as produced by the loaders and as (de)serialised to JSON or CBOR.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use minicbor::{Decode, Encode};
use sealed::sealed;
use serde::{Deserialize, Serialize};

use crate::config::{Config, Configurable};
use crate::error::TextEnvError;
use crate::file::*;
use crate::json::*;
use crate::span::{Span, TokenRef};
use crate::text::Text;
use crate::textbase::TextBase;
use crate::textlabels::{Annotations, TextLabels};
use crate::tokenizer::Token;
use crate::types::*;

/// Owns a text base and the annotation data bound to it.
///
/// Annotation environments borrow their text base, so the owned form is needed whenever both
/// have to travel together: loading, serialisation and handing a finished corpus around.
/// Use [`Corpus::with_labels()`] to work on it through a [`TextLabels`] environment.
#[derive(Debug)]
pub struct Corpus {
    pub(crate) textbase: TextBase,
    pub(crate) annotations: Annotations,
}

#[sealed]
impl TypeInfo for Corpus {
    fn typeinfo() -> Type {
        Type::Corpus
    }
}

impl Corpus {
    /// Creates a new empty corpus
    pub fn new(config: Config) -> Result<Self, TextEnvError> {
        Ok(Self {
            textbase: TextBase::new(config)?,
            annotations: Annotations::default(),
        })
    }

    /// Combines a text base with annotation data.
    /// Fails with [`TextEnvError::ForeignSpan`] if the data holds spans of another text base.
    pub fn from_parts(textbase: TextBase, annotations: Annotations) -> Result<Self, TextEnvError> {
        annotations.validate_against(&textbase)?;
        Ok(Self {
            textbase,
            annotations,
        })
    }

    pub fn into_parts(self) -> (TextBase, Annotations) {
        (self.textbase, self.annotations)
    }

    pub fn textbase(&self) -> &TextBase {
        &self.textbase
    }

    /// Mutable access to the text base, for instance to load more documents or assign groups
    pub fn textbase_mut(&mut self) -> &mut TextBase {
        &mut self.textbase
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Runs a function against a [`TextLabels`] environment over this corpus.
    /// Whatever the function wrote is kept in the corpus afterwards, also if it returns an error.
    pub fn with_labels<T, F>(&mut self, f: F) -> Result<T, TextEnvError>
    where
        F: FnOnce(&mut TextLabels<'_>) -> Result<T, TextEnvError>,
    {
        let annotations = std::mem::take(&mut self.annotations);
        let mut labels = TextLabels::bind(&self.textbase, annotations);
        let result = f(&mut labels);
        self.annotations = labels.into_annotations();
        result
    }

    /// Returns a read-only [`TextLabels`] environment over a copy of the annotation data
    pub fn labels(&self) -> TextLabels<'_> {
        TextLabels::bind(&self.textbase, self.annotations.clone())
    }

    /// Writes this corpus to file, in the data format the configuration asks for
    pub fn to_file(&self, filename: &str) -> Result<(), TextEnvError> {
        let config = self.textbase.config();
        debug(config, || {
            format!(
                "Corpus::to_file: filename={:?} format={}",
                filename,
                config.dataformat()
            )
        });
        match config.dataformat() {
            DataFormat::Json { .. } => self.to_json_file(filename, config),
            DataFormat::CBOR => self.to_cbor_file(filename),
            #[cfg(feature = "csv")]
            DataFormat::Csv => Err(TextEnvError::SerializationError(
                "A corpus can not be written as CSV, use Annotations::to_csv_file() for the annotation layer".to_string(),
            )),
        }
    }

    /// Reads a corpus from file, the format is derived from the extension (`.cbor` or JSON otherwise)
    pub fn from_file(filename: &str, config: Config) -> Result<Self, TextEnvError> {
        if filename.ends_with(".cbor") {
            Self::from_cbor_file(filename, config)
        } else {
            Self::from_json_file(filename, config)
        }
    }

    pub fn to_cbor_file(&self, filename: &str) -> Result<(), TextEnvError> {
        let mut writer = open_file_writer(filename, self.textbase.config())?;
        let bytes = self.to_cbor()?;
        writer
            .write_all(&bytes)
            .map_err(|e| TextEnvError::IOError(e, filename.to_string(), "Corpus::to_cbor_file()"))
    }

    pub fn from_cbor_file(filename: &str, config: Config) -> Result<Self, TextEnvError> {
        let mut reader = open_file_reader(filename, &config)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| {
            TextEnvError::IOError(e, filename.to_string(), "Corpus::from_cbor_file()")
        })?;
        Self::from_cbor(&bytes, config)
    }

    /// Serialises this corpus to CBOR
    pub fn to_cbor(&self) -> Result<Vec<u8>, TextEnvError> {
        minicbor::to_vec(CorpusRecord::from(self))
            .map_err(|e| TextEnvError::SerializationError(format!("Corpus to CBOR: {}", e)))
    }

    /// Deserialises a corpus from CBOR
    pub fn from_cbor(bytes: &[u8], config: Config) -> Result<Self, TextEnvError> {
        let record: CorpusRecord = minicbor::decode(bytes)
            .map_err(|e| TextEnvError::DeserializationError(format!("Corpus from CBOR: {}", e)))?;
        record.into_corpus(config)
    }
}

impl Configurable for Corpus {
    fn config(&self) -> &Config {
        self.textbase.config()
    }

    fn config_mut(&mut self) -> &mut Config {
        self.textbase.config_mut()
    }

    fn set_config(&mut self, config: Config) -> &mut Self {
        *self.textbase.config_mut() = config;
        self
    }
}

impl Serialize for Corpus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        CorpusRecord::from(self).serialize(serializer)
    }
}

impl ToJson for Corpus {}

impl FromJson for Corpus {
    fn from_json_file(filename: &str, config: Config) -> Result<Self, TextEnvError> {
        debug(&config, || format!("Corpus::from_json_file: {}", filename));
        let reader = open_file_reader(filename, &config)?;
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let record: CorpusRecord = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            TextEnvError::JsonError(e, filename.to_string(), "Reading corpus from file")
        })?;
        record.into_corpus(config)
    }

    fn from_json_str(string: &str, config: Config) -> Result<Self, TextEnvError> {
        let deserializer = &mut serde_json::Deserializer::from_str(string);
        let record: CorpusRecord = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            TextEnvError::JsonError(e, string.chars().take(32).collect(), "Reading corpus from string")
        })?;
        record.into_corpus(config)
    }
}

// ------------------------------ serialisation records -------------------------------------------------------------

#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub(crate) struct DocumentRecord {
    #[n(0)]
    id: String,
    #[n(1)]
    text: String,
    #[n(2)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    /// Character offsets (begin, end) of every token
    #[n(3)]
    tokens: Vec<(usize, usize)>,
    #[n(4)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub(crate) struct SpanRecord {
    #[n(0)]
    document: String,
    #[n(1)]
    start: usize,
    #[n(2)]
    length: usize,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub(crate) struct TokenRecord {
    #[n(0)]
    document: String,
    #[n(1)]
    index: usize,
}

#[derive(Serialize, Deserialize, Encode, Decode, Debug, Clone)]
pub(crate) struct CorpusRecord {
    #[serde(rename = "@type")]
    #[n(0)]
    tp: String,
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    #[n(1)]
    id: Option<String>,
    #[n(2)]
    documents: Vec<DocumentRecord>,
    #[serde(default)]
    #[n(3)]
    types: BTreeMap<String, Vec<SpanRecord>>,
    #[serde(default)]
    #[n(4)]
    span_properties: BTreeMap<String, Vec<(SpanRecord, String)>>,
    #[serde(default)]
    #[n(5)]
    token_properties: BTreeMap<String, Vec<(TokenRecord, String)>>,
    #[serde(default)]
    #[n(6)]
    closures: BTreeMap<String, Vec<String>>,
    /// annotator name -> RFC 3339 timestamp
    #[serde(default)]
    #[n(7)]
    annotated_by: BTreeMap<String, String>,
}

impl From<&Span> for SpanRecord {
    fn from(span: &Span) -> Self {
        Self {
            document: span.document_id().to_string(),
            start: span.start(),
            length: span.length(),
        }
    }
}

impl From<&TokenRef> for TokenRecord {
    fn from(token: &TokenRef) -> Self {
        Self {
            document: token.document_id().to_string(),
            index: token.index(),
        }
    }
}

impl From<&Corpus> for CorpusRecord {
    fn from(corpus: &Corpus) -> Self {
        let data = &corpus.annotations;
        Self {
            tp: Type::Corpus.to_string(),
            id: corpus.textbase.id().map(|id| id.to_string()),
            documents: corpus
                .textbase
                .documents()
                .map(|document| DocumentRecord {
                    id: document.id().to_string(),
                    text: document.text().to_string(),
                    group: document.group().map(|group| group.to_string()),
                    tokens: document
                        .tokens()
                        .iter()
                        .map(|token| (token.begin(), token.end()))
                        .collect(),
                    checksum: document.checksum().map(|checksum| checksum.to_string()),
                })
                .collect(),
            types: data
                .types
                .iter()
                .map(|(tp, spans)| (tp.clone(), spans.iter().map(SpanRecord::from).collect()))
                .collect(),
            span_properties: data
                .span_properties
                .iter()
                .map(|(key, values)| {
                    (
                        key.clone(),
                        values
                            .iter()
                            .map(|(span, value)| (SpanRecord::from(span), value.clone()))
                            .collect(),
                    )
                })
                .collect(),
            token_properties: data
                .token_properties
                .iter()
                .map(|(key, values)| {
                    (
                        key.clone(),
                        values
                            .iter()
                            .map(|(token, value)| (TokenRecord::from(token), value.clone()))
                            .collect(),
                    )
                })
                .collect(),
            closures: data
                .closures
                .iter()
                .map(|(tp, documents)| {
                    (
                        tp.clone(),
                        documents.iter().map(|document| document.to_string()).collect(),
                    )
                })
                .collect(),
            annotated_by: data
                .annotated_by
                .iter()
                .map(|(name, timestamp)| (name.clone(), timestamp.to_rfc3339()))
                .collect(),
        }
    }
}

impl SpanRecord {
    fn into_span(self, textbase: &TextBase) -> Result<Span, TextEnvError> {
        Ok(textbase
            .span(&self.document, self.start, self.length)?
            .into_span())
    }
}

impl TokenRecord {
    fn into_token(self, textbase: &TextBase) -> Result<TokenRef, TextEnvError> {
        textbase.token(&self.document, self.index)
    }
}

impl CorpusRecord {
    pub(crate) fn into_corpus(self, config: Config) -> Result<Corpus, TextEnvError> {
        if self.tp != Type::Corpus.to_string() {
            return Err(TextEnvError::DeserializationError(format!(
                "Expected @type Corpus, got {}",
                self.tp
            )));
        }
        let validate = config.textvalidation();
        let mut textbase = TextBase::new(config)?;
        if let Some(id) = self.id {
            textbase = textbase.with_id(id);
        }
        for record in self.documents {
            let textlen = record.text.chars().count();
            let mut previous_end = 0;
            let mut tokens = Vec::with_capacity(record.tokens.len());
            for (begin, end) in record.tokens {
                if begin < previous_end || begin >= end || end > textlen {
                    return Err(TextEnvError::DeserializationError(format!(
                        "Invalid token {}-{} in document {}",
                        begin, end, record.id
                    )));
                }
                previous_end = end;
                tokens.push(Token::new(begin, end));
            }
            let handle = textbase.insert_document(record.id.clone(), record.text, tokens)?;
            if let Some(group) = record.group {
                textbase.set_group_id(&record.id, group)?;
            }
            if record.checksum.is_some() {
                textbase.set_checksum(handle, record.checksum);
            }
        }

        let mut annotations = Annotations::default();
        for (tp, spans) in self.types {
            validate_name(&tp, "Corpus deserialisation")?;
            annotations.declare_type(&tp);
            for span in spans {
                annotations.insert_instance(&tp, span.into_span(&textbase)?);
            }
        }
        for (key, values) in self.span_properties {
            validate_name(&key, "Corpus deserialisation")?;
            for (span, value) in values {
                let span = span.into_span(&textbase)?;
                annotations.insert_property((&span).into(), &key, &value);
            }
        }
        for (key, values) in self.token_properties {
            validate_name(&key, "Corpus deserialisation")?;
            for (token, value) in values {
                let token = token.into_token(&textbase)?;
                annotations.insert_property((&token).into(), &key, &value);
            }
        }
        for (tp, documents) in self.closures {
            validate_name(&tp, "Corpus deserialisation")?;
            for document in documents {
                let document = textbase.document(&document)?.id_arc().clone();
                annotations.close(&tp, document);
            }
        }
        for (name, timestamp) in self.annotated_by {
            let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                .map_err(|e| {
                    TextEnvError::DeserializationError(format!(
                        "Invalid timestamp for annotator {}: {}",
                        name, e
                    ))
                })?
                .with_timezone(&Utc);
            annotations.set_annotated_by(&name, timestamp);
        }

        #[cfg(feature = "textvalidation")]
        if validate {
            textbase.validate_text(false)?;
        }
        #[cfg(not(feature = "textvalidation"))]
        let _ = validate;

        Ok(Corpus {
            textbase,
            annotations,
        })
    }
}
