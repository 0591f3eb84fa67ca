/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`ToJson`] and [`FromJson`] traits that are used
//! in serialisation to/from JSON. The records that are actually serialised are private to the corpus module.

use crate::config::Config;
use crate::error::TextEnvError;
use crate::file::*;
use crate::types::*;

pub trait ToJson
where
    Self: TypeInfo + serde::Serialize,
{
    /// Writes a serialisation to any writer
    /// Lower-level function
    fn to_json_writer<W>(&self, writer: W, compact: bool) -> Result<(), TextEnvError>
    where
        W: std::io::Write,
    {
        match compact {
            false => serde_json::to_writer_pretty(writer, &self).map_err(|e| {
                TextEnvError::SerializationError(format!(
                    "Writing {} to file: {}",
                    Self::typeinfo(),
                    e
                ))
            }),
            true => serde_json::to_writer(writer, &self).map_err(|e| {
                TextEnvError::SerializationError(format!(
                    "Writing {} to file: {}",
                    Self::typeinfo(),
                    e
                ))
            }),
        }
    }

    /// Writes this structure to a file
    fn to_json_file(&self, filename: &str, config: &Config) -> Result<(), TextEnvError> {
        debug(config, || {
            format!("{}.to_json_file: filename={:?}", Self::typeinfo(), filename)
        });
        let compact = match config.dataformat() {
            DataFormat::Json { compact } => compact,
            _ => false,
        };
        let writer = open_file_writer(filename, config)?;
        self.to_json_writer(writer, compact)
    }

    /// Serializes this structure to one string.
    fn to_json_string(&self, config: &Config) -> Result<String, TextEnvError> {
        let compact = match config.dataformat() {
            DataFormat::Json { compact } => compact,
            _ => false,
        };
        let result = if compact {
            serde_json::to_string(&self)
        } else {
            serde_json::to_string_pretty(&self)
        };
        result.map_err(|e| {
            TextEnvError::SerializationError(format!(
                "Writing {} to string: {}",
                Self::typeinfo(),
                e
            ))
        })
    }
}

pub trait FromJson
where
    Self: TypeInfo + Sized,
{
    fn from_json_file(filename: &str, config: Config) -> Result<Self, TextEnvError>;

    fn from_json_str(string: &str, config: Config) -> Result<Self, TextEnvError>;
}
