//! CSV export and import of the annotation layer, as a table of operations that rebuild it.
//! The text base itself is not part of the table; it must be loaded separately.

use csv;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::TextEnvError;
use crate::file::*;
use crate::span::Span;
use crate::textbase::TextBase;
use crate::textenv::Target;
use crate::textlabels::{Annotations, TextLabels};
use crate::types::*;

/// One kind of row in the operations table
#[derive(Clone, Copy, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    AddToType,
    SetSpanProperty,
    SetTokenProperty,
    CloseType,
    AnnotatedBy,
}

#[derive(Serialize, Deserialize)]
struct OperationCsv<'a> {
    #[serde(rename = "Op")]
    op: Operation,
    /// Type, property or annotator name
    #[serde(rename = "Name")]
    name: Cow<'a, str>,
    #[serde(rename = "Document")]
    document: Option<Cow<'a, str>>,
    /// Start token (or token index for token properties)
    #[serde(rename = "Start")]
    start: Option<usize>,
    #[serde(rename = "Length")]
    length: Option<usize>,
    /// Property value or timestamp, empty for the other operations
    #[serde(rename = "Value", default)]
    value: Cow<'a, str>,
}

impl<'a> OperationCsv<'a> {
    fn span(op: Operation, name: &'a str, span: &'a Span, value: &'a str) -> Self {
        Self {
            op,
            name: Cow::Borrowed(name),
            document: Some(Cow::Borrowed(span.document_id())),
            start: Some(span.start()),
            length: Some(span.length()),
            value: Cow::Borrowed(value),
        }
    }

    fn require_document(&self) -> Result<&str, TextEnvError> {
        self.document.as_deref().ok_or_else(|| {
            TextEnvError::DeserializationError(format!(
                "CSV: {:?} row for {} lacks a document",
                self.op, self.name
            ))
        })
    }

    fn require_start(&self) -> Result<usize, TextEnvError> {
        self.start.ok_or_else(|| {
            TextEnvError::DeserializationError(format!(
                "CSV: {:?} row for {} lacks a start",
                self.op, self.name
            ))
        })
    }

    fn require_length(&self) -> Result<usize, TextEnvError> {
        self.length.ok_or_else(|| {
            TextEnvError::DeserializationError(format!(
                "CSV: {:?} row for {} lacks a length",
                self.op, self.name
            ))
        })
    }
}

fn csv_error(e: csv::Error) -> TextEnvError {
    TextEnvError::SerializationError(format!("Failure serializing CSV: {:?}", e))
}

impl Annotations {
    /// Writes the operations table to the writer
    pub fn to_csv_writer<W>(&self, writer: W) -> Result<(), TextEnvError>
    where
        W: std::io::Write,
    {
        let mut writer = csv::Writer::from_writer(writer);
        for (tp, spans) in self.types.iter() {
            for span in spans.iter() {
                writer
                    .serialize(OperationCsv::span(Operation::AddToType, tp, span, ""))
                    .map_err(csv_error)?;
            }
        }
        for (key, values) in self.span_properties.iter() {
            for (span, value) in values.iter() {
                writer
                    .serialize(OperationCsv::span(
                        Operation::SetSpanProperty,
                        key,
                        span,
                        value.as_str(),
                    ))
                    .map_err(csv_error)?;
            }
        }
        for (key, values) in self.token_properties.iter() {
            for (token, value) in values.iter() {
                writer
                    .serialize(OperationCsv {
                        op: Operation::SetTokenProperty,
                        name: Cow::Borrowed(key.as_str()),
                        document: Some(Cow::Borrowed(token.document_id())),
                        start: Some(token.index()),
                        length: None,
                        value: Cow::Borrowed(value.as_str()),
                    })
                    .map_err(csv_error)?;
            }
        }
        for (tp, documents) in self.closures.iter() {
            for document in documents.iter() {
                writer
                    .serialize(OperationCsv {
                        op: Operation::CloseType,
                        name: Cow::Borrowed(tp.as_str()),
                        document: Some(Cow::Borrowed(document.as_ref())),
                        start: None,
                        length: None,
                        value: Cow::Borrowed(""),
                    })
                    .map_err(csv_error)?;
            }
        }
        for (name, timestamp) in self.annotated_by.iter() {
            writer
                .serialize(OperationCsv {
                    op: Operation::AnnotatedBy,
                    name: Cow::Borrowed(name.as_str()),
                    document: None,
                    start: None,
                    length: None,
                    value: Cow::Owned(timestamp.to_rfc3339()),
                })
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|e| {
            TextEnvError::IOError(e, "(csv writer)".to_string(), "Annotations::to_csv_writer()")
        })
    }

    /// Writes the operations table to a file
    pub fn to_csv_file(&self, filename: &str, config: &Config) -> Result<(), TextEnvError> {
        debug(config, || format!("Annotations::to_csv_file: filename={:?}", filename));
        let writer = open_file_writer(filename, config)?;
        self.to_csv_writer(writer)
    }

    /// Returns the operations table as a string
    pub fn to_csv_string(&self) -> Result<String, TextEnvError> {
        let mut buffer: Vec<u8> = Vec::new();
        self.to_csv_writer(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            TextEnvError::SerializationError(format!("CSV output is not valid UTF-8: {}", e))
        })
    }

    /// Replays one operation against this data, spans are resolved against the text base
    fn apply_operation(
        &mut self,
        textbase: &TextBase,
        row: &OperationCsv,
    ) -> Result<(), TextEnvError> {
        validate_name(&row.name, "CSV operation")?;
        match row.op {
            Operation::AddToType => {
                let span = textbase
                    .span(
                        row.require_document()?,
                        row.require_start()?,
                        row.require_length()?,
                    )?
                    .into_span();
                self.insert_instance(&row.name, span);
            }
            Operation::SetSpanProperty => {
                let span = textbase
                    .span(
                        row.require_document()?,
                        row.require_start()?,
                        row.require_length()?,
                    )?
                    .into_span();
                self.insert_property(Target::Span(&span), &row.name, &row.value);
            }
            Operation::SetTokenProperty => {
                let token = textbase.token(row.require_document()?, row.require_start()?)?;
                self.insert_property(Target::Token(&token), &row.name, &row.value);
            }
            Operation::CloseType => {
                let document = textbase.document(row.require_document()?)?;
                self.close(&row.name, document.id_arc().clone());
            }
            Operation::AnnotatedBy => {
                let timestamp = DateTime::parse_from_rfc3339(&row.value)
                    .map_err(|e| {
                        TextEnvError::DeserializationError(format!(
                            "CSV: invalid timestamp for {}: {}",
                            row.name, e
                        ))
                    })?
                    .with_timezone(&Utc);
                self.set_annotated_by(&row.name, timestamp);
            }
        }
        Ok(())
    }
}

impl<'base> TextLabels<'base> {
    /// Builds an environment over the text base by replaying an operations table
    pub fn from_csv_reader<R>(base: &'base TextBase, reader: R) -> Result<Self, TextEnvError>
    where
        R: std::io::Read,
    {
        let mut reader = csv::Reader::from_reader(reader);
        let mut data = Annotations::default();
        for (i, row) in reader.deserialize::<OperationCsv<'static>>().enumerate() {
            let row = row.map_err(|e| {
                TextEnvError::DeserializationError(format!(
                    "Failure parsing CSV row {}: {:?}",
                    i + 1,
                    e
                ))
            })?;
            data.apply_operation(base, &row)?;
        }
        Ok(Self::bind(base, data))
    }

    /// Builds an environment over the text base from an operations table in a file
    pub fn from_csv_file(base: &'base TextBase, filename: &str) -> Result<Self, TextEnvError> {
        debug(base.config(), || {
            format!("TextLabels::from_csv_file: filename={:?}", filename)
        });
        let reader = open_file_reader(filename, base.config())?;
        Self::from_csv_reader(base, reader)
    }
}
