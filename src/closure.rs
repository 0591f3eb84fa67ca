//! Closure tracking: whether all instances of a type have been recorded in a document.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TextEnvError;
use crate::textenv::MonotonicTextEnv;
use crate::types::*;

/// Closure state of one (type, document) pair.
/// When [`ClosureState::Closed`], absence of an instance of the type in the document is a true negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClosureState {
    Open,
    Closed,
}

impl Default for ClosureState {
    fn default() -> Self {
        Self::Open
    }
}

impl From<bool> for ClosureState {
    fn from(closed: bool) -> Self {
        if closed {
            Self::Closed
        } else {
            Self::Open
        }
    }
}

impl fmt::Display for ClosureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Determines which (type, document) pairs a loader closes after ingesting documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClosurePolicy {
    /// Every known type is closed in every document
    CloseAllTypes,
    /// Every known type is closed, but only in documents that carry at least one instance of any type
    CloseTypesInLabeledDocs,
    DontCloseTypes,
}

impl Default for ClosurePolicy {
    fn default() -> Self {
        Self::CloseAllTypes
    }
}

impl TryFrom<&str> for ClosurePolicy {
    type Error = TextEnvError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "all" | "CloseAllTypes" => Ok(Self::CloseAllTypes),
            "labeled" | "CloseTypesInLabeledDocs" => Ok(Self::CloseTypesInLabeledDocs),
            "none" | "DontCloseTypes" => Ok(Self::DontCloseTypes),
            _ => Err(TextEnvError::OtherError("Invalid value for ClosurePolicy")),
        }
    }
}

impl ClosurePolicy {
    /// Applies the policy to all documents of the environment
    pub fn apply(&self, env: &mut dyn MonotonicTextEnv) -> Result<(), TextEnvError> {
        if *self == Self::DontCloseTypes {
            return Ok(());
        }
        let documents: Vec<String> = env.document_ids().map(|id| id.to_string()).collect();
        for document in documents.iter() {
            self.apply_to_document(env, document)?;
        }
        Ok(())
    }

    /// Applies the policy to a single document of the environment
    pub fn apply_to_document(
        &self,
        env: &mut dyn MonotonicTextEnv,
        document: &str,
    ) -> Result<(), TextEnvError> {
        let types: Vec<String> = env.types().into_iter().map(|tp| tp.to_string()).collect();
        let close = match self {
            Self::DontCloseTypes => false,
            Self::CloseAllTypes => true,
            Self::CloseTypesInLabeledDocs => {
                let mut labeled = false;
                for tp in types.iter() {
                    if !env.instances_in(tp, document)?.is_empty() {
                        labeled = true;
                        break;
                    }
                }
                labeled
            }
        };
        if close {
            debug(env.textbase().config(), || {
                format!(
                    "ClosurePolicy::apply_to_document: {:?} closes {} type(s) in {}",
                    self,
                    types.len(),
                    document
                )
            });
            for tp in types.iter() {
                env.close_type(tp, document)?;
            }
        }
        Ok(())
    }
}
