/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module defines the single error type used throughout the library.

use std::error::Error;
use std::fmt;
use std::io;

// ------------------------------ ERROR DEFINITIONS & IMPLEMENTATIONS -------------------------------------------------------------

#[derive(Debug)]
pub enum TextEnvError {
    /// Unknown document, type, token or file; the first parameter is the requested identifier
    NotFound(String, &'static str),

    /// A document with this identifier was already loaded
    DuplicateDocumentId(String, &'static str),

    /// Span arithmetic outside of the bounds of a document or parent span. Parameters: begin, end, bound
    OutOfRange(usize, usize, usize, &'static str),

    /// A span (or view) belonging to a different text base was passed
    ForeignSpan(&'static str),

    /// A closure query was made for a type that is not closed in the document. Parameters: type, document
    IncompleteAnnotation(String, String, &'static str),

    /// A write through a layered view for a type or property that the view does not shadow
    NotShadowed(String, &'static str),

    /// An append-only handle was asked to replace an existing property value. Parameters: property name, target
    PropertyConflict(String, String, &'static str),

    /// Mismatched or unclosed markup. Parameters: document id, line number (1-based), description
    MalformedMarkup(String, usize, String),

    /// Type and property names must be non-empty and may not contain whitespace or control characters
    InvalidName(String, &'static str),

    /// An invalid regular expression (token pattern or markup pattern)
    RegexError(regex::Error, &'static str),

    IOError(io::Error, String, &'static str),
    JsonError(
        serde_path_to_error::Error<serde_json::Error>,
        String,
        &'static str,
    ),
    SerializationError(String),
    DeserializationError(String),

    /// Text validation failed for a document
    ValidationError(String, &'static str),

    OtherError(&'static str),
}

impl From<&TextEnvError> for String {
    /// Returns the error message as a String
    fn from(error: &TextEnvError) -> String {
        match error {
            TextEnvError::NotFound(id, contextmsg) => {
                format!("NotFound: No such item: {} ({})", id, contextmsg)
            }
            TextEnvError::DuplicateDocumentId(id, contextmsg) => format!(
                "DuplicateDocumentId: Document already exists: {} ({})",
                id, contextmsg
            ),
            TextEnvError::OutOfRange(begin, end, bound, contextmsg) => format!(
                "OutOfRange: Range {}-{} exceeds bound {} ({})",
                begin, end, bound, contextmsg
            ),
            TextEnvError::ForeignSpan(contextmsg) => format!(
                "ForeignSpan: Span belongs to a different text base ({})",
                contextmsg
            ),
            TextEnvError::IncompleteAnnotation(tp, document, contextmsg) => format!(
                "IncompleteAnnotation: Type {} is not closed in document {} ({})",
                tp, document, contextmsg
            ),
            TextEnvError::NotShadowed(name, contextmsg) => format!(
                "NotShadowed: {} is not shadowed by this view, write it through the parent ({})",
                name, contextmsg
            ),
            TextEnvError::PropertyConflict(key, target, contextmsg) => format!(
                "PropertyConflict: Property {} of {} already has a different value ({})",
                key, target, contextmsg
            ),
            TextEnvError::MalformedMarkup(document, line, msg) => {
                format!("MalformedMarkup: {}@{}: {}", document, line, msg)
            }
            TextEnvError::InvalidName(name, contextmsg) => {
                format!("InvalidName: {:?} ({})", name, contextmsg)
            }
            TextEnvError::RegexError(err, contextmsg) => {
                format!("RegexError: {} ({})", err, contextmsg)
            }
            TextEnvError::IOError(err, filename, contextmsg) => {
                format!("IOError: {}: {} ({})", filename, err, contextmsg)
            }
            TextEnvError::JsonError(err, filename, contextmsg) => format!(
                "JsonError: {} at {} ({}, {})",
                err.inner(),
                err.path(),
                filename,
                contextmsg
            ),
            TextEnvError::SerializationError(msg) => format!("SerializationError: {}", msg),
            TextEnvError::DeserializationError(msg) => {
                format!("DeserializationError: {}", msg)
            }
            TextEnvError::ValidationError(id, contextmsg) => format!(
                "ValidationError: Text of document {} does not match its checksum ({})",
                id, contextmsg
            ),
            TextEnvError::OtherError(msg) => format!("OtherError: {}", msg),
        }
    }
}

impl fmt::Display for TextEnvError {
    /// Formats the error message for printing
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let errmsg: String = String::from(self);
        write!(f, "[TextEnvError] {}", errmsg)
    }
}

impl Error for TextEnvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TextEnvError::IOError(err, ..) => Some(err),
            TextEnvError::RegexError(err, ..) => Some(err),
            TextEnvError::JsonError(err, ..) => Some(err.inner()),
            _ => None,
        }
    }
}

impl From<io::Error> for TextEnvError {
    fn from(err: io::Error) -> Self {
        TextEnvError::IOError(err, String::new(), "")
    }
}

impl TextEnvError {
    /// Short name of the error category, stable across messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(..) => "NotFound",
            Self::DuplicateDocumentId(..) => "DuplicateDocumentId",
            Self::OutOfRange(..) => "OutOfRange",
            Self::ForeignSpan(..) => "ForeignSpan",
            Self::IncompleteAnnotation(..) => "IncompleteAnnotation",
            Self::NotShadowed(..) => "NotShadowed",
            Self::PropertyConflict(..) => "PropertyConflict",
            Self::MalformedMarkup(..) => "MalformedMarkup",
            Self::InvalidName(..) => "InvalidName",
            Self::RegexError(..) => "RegexError",
            Self::IOError(..) => "IOError",
            Self::JsonError(..) => "JsonError",
            Self::SerializationError(..) => "SerializationError",
            Self::DeserializationError(..) => "DeserializationError",
            Self::ValidationError(..) => "ValidationError",
            Self::OtherError(..) => "OtherError",
        }
    }
}
