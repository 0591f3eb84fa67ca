use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use crate::config::Config;
use crate::error::TextEnvError;

/// The handle trait is implemented on the handle types. They refer to an item in an arena-like store by index.
/// Types implementing this are lightweight and do not borrow anything, they can be passed and copied freely.
/// To get an actual reference to the item from a handle, call the `get()` method on the store that holds it.
/// This is a sealed trait, not implementable outside this crate.
#[sealed(pub(crate))] //<-- this ensures nobody outside this crate can implement the trait
pub trait Handle:
    Clone + Copy + core::fmt::Debug + PartialEq + Eq + PartialOrd + Ord + Hash
{
    /// Create a new handle for an internal ID. You shouldn't need to use this as handles will always be generated for you by higher-level functions.
    fn new(intid: usize) -> Self;
    /// Returns the internal index for this handle
    fn as_usize(&self) -> usize;
}

/// Refers to a [`crate::Document`] in a [`crate::TextBase`] by its position of insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentHandle(u32);

#[sealed]
impl Handle for DocumentHandle {
    fn new(intid: usize) -> Self {
        Self(intid as u32)
    }
    fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// Identifies one [`crate::TextBase`] instance. Every span carries the key of the text base that produced it,
/// which is how spans from a different base are detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseKey(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Corpus,
    Config,
}

impl Type {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Corpus => "Corpus",
            Self::Config => "Config",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[sealed(pub(crate))] //<-- this ensures nobody outside this crate can implement the trait
pub trait TypeInfo {
    fn typeinfo() -> Type;
}

/// The data format used for (de)serialisation of a [`crate::Corpus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataFormat {
    Json {
        compact: bool,
    },

    CBOR,

    /// Operations table for the annotation layer (not for the text base itself)
    #[cfg(feature = "csv")]
    Csv,
}

impl Default for DataFormat {
    fn default() -> Self {
        Self::Json { compact: false }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { .. } => write!(f, "json"),
            Self::CBOR => write!(f, "cbor"),
            #[cfg(feature = "csv")]
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl TryFrom<&str> for DataFormat {
    type Error = TextEnvError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "json" | "Json" | "JSON" => Ok(Self::Json { compact: false }),
            "json-compact" | "Json-compact" | "JSON-compact" => Ok(Self::Json { compact: true }),
            "cbor" | "CBOR" => Ok(Self::CBOR),
            #[cfg(feature = "csv")]
            "csv" | "Csv" | "CSV" => Ok(Self::Csv),
            _ => Err(TextEnvError::OtherError("Invalid value for DataFormat")),
        }
    }
}

/// Prints a debug message to standard error output, only if debug mode is enabled in the configuration.
/// The message is produced by a closure so it costs nothing when debugging is off.
pub(crate) fn debug<F>(config: &Config, message_func: F)
where
    F: FnOnce() -> String,
{
    if config.debug() {
        eprintln!("[textenv debug] {}", message_func());
    }
}

/// Checks that a type or property name is usable: non-empty, no whitespace and no control characters.
pub(crate) fn validate_name(name: &str, contextmsg: &'static str) -> Result<(), TextEnvError> {
    if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Err(TextEnvError::InvalidName(name.to_string(), contextmsg))
    } else {
        Ok(())
    }
}
