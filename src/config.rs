use sealed::sealed;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::closure::ClosurePolicy;
use crate::error::TextEnvError;
use crate::file::*;
use crate::json::*;
use crate::types::*;

pub trait Configurable: Sized {
    //// Obtain the configuration
    fn config(&self) -> &Config;

    //// Obtain the configuration mutably
    fn config_mut(&mut self) -> &mut Config;

    ///Builder pattern to associate a configuration
    fn with_config(mut self, config: Config) -> Self {
        self.set_config(config);
        self
    }

    ///Setter to associate a configuration
    fn set_config(&mut self, config: Config) -> &mut Self;
}

/// This holds the configuration. It is not limited to configuring a single part of the model, but unifies all in a single configuration.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Debug mode
    pub(crate) debug: bool,

    /// The working directory
    pub(crate) workdir: Option<PathBuf>,

    ///generate a pseudo-random public identifier for a text base when it has none
    pub(crate) generate_ids: bool,

    /// Regular expression that matches a single token. If unset, the default tokenizer is used.
    pub(crate) token_pattern: Option<String>,

    /// Closure policy applied by loaders after ingesting tagged documents
    pub(crate) closure_policy: ClosurePolicy,

    /// Compute a checksum of every document text upon loading, so it can be validated later
    pub(crate) textvalidation: bool,

    /// Read and parse the files of a directory in parallel (installation order remains deterministic)
    pub(crate) parallel: bool,

    /// The chosen dataformat for serialisation, defaults to JSON.
    pub(crate) dataformat: DataFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            workdir: None,
            generate_ids: false,
            token_pattern: None,
            closure_policy: ClosurePolicy::CloseAllTypes,
            textvalidation: cfg!(feature = "textvalidation"),
            parallel: true,
            dataformat: DataFormat::Json { compact: false },
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable debug mode. In debug mode, verbose output will be printed to standard error output
    pub fn with_debug(mut self, value: bool) -> Self {
        self.debug = value;
        self
    }

    /// Is debug mode enabled or not?
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Sets the working directory, relative paths are resolved against it first
    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(workdir.into());
        self
    }

    ///  Return the working directory, if set
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_ref().map(|x| x.as_path())
    }

    /// Generate a public ID for a text base when it has none.
    pub fn with_generate_ids(mut self, value: bool) -> Self {
        self.generate_ids = value;
        self
    }

    /// Is generation of public IDs when missing enabled or not?
    pub fn generate_ids(&self) -> bool {
        self.generate_ids
    }

    /// Sets a regular expression matching one token, replacing the default tokenizer.
    /// Do not change this on a text base that already holds documents!
    pub fn with_token_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.token_pattern = Some(pattern.into());
        self
    }

    /// Returns the custom token pattern, if any
    pub fn token_pattern(&self) -> Option<&str> {
        self.token_pattern.as_deref()
    }

    /// Sets the closure policy used by loaders
    pub fn with_closure_policy(mut self, policy: ClosurePolicy) -> Self {
        self.closure_policy = policy;
        self
    }

    /// Returns the closure policy used by loaders
    pub fn closure_policy(&self) -> ClosurePolicy {
        self.closure_policy
    }

    /// Compute checksums of document texts upon loading?
    pub fn with_textvalidation(mut self, value: bool) -> Self {
        self.textvalidation = value;
        self
    }

    pub fn textvalidation(&self) -> bool {
        self.textvalidation
    }

    /// Parse the files of a directory in parallel?
    pub fn with_parallel(mut self, value: bool) -> Self {
        self.parallel = value;
        self
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Sets chosen dataformat for serialisation, defaults to JSON.
    pub fn with_dataformat(mut self, value: DataFormat) -> Self {
        self.dataformat = value;
        self
    }

    /// Returns the configured dataformat for serialisation.
    pub fn dataformat(&self) -> DataFormat {
        self.dataformat
    }

    /// Loads configuration from a JSON file
    pub fn from_file(filename: &str) -> Result<Self, TextEnvError> {
        let reader = open_file_reader(filename, &Config::default())?;
        let deserializer = &mut serde_json::Deserializer::from_reader(reader);
        let result: Result<Self, _> = serde_path_to_error::deserialize(deserializer);
        result.map_err(|e| {
            TextEnvError::JsonError(e, filename.to_string(), "Reading config from file")
        })
    }
}

#[sealed]
impl TypeInfo for Config {
    fn typeinfo() -> Type {
        Type::Config
    }
}

impl ToJson for Config {}
