/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module implements text validation: every document can carry a SHA-1 checksum of its text,
//! computed when it is loaded, so that a deserialised text base can be checked against it.
//!
//! This module is implemented as an extra feature and may be enabled/disabled at compile time.

use base16ct;
use sha1::{Digest, Sha1};

use crate::document::Document;
use crate::error::TextEnvError;
use crate::textbase::TextBase;
use crate::types::*;

/// Computes the SHA-1 checksum of a text, hex encoded.
/// Note that this is cryptographically insecure! (but fast)
pub(crate) fn text_checksum(text: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text);
    base16ct::lower::encode_string(&hasher.finalize())
}

impl Document {
    /// Returns (computes) the SHA-1 checksum of the text of this document
    pub fn text_checksum(&self) -> String {
        text_checksum(&self.text)
    }

    /// Tests if the text still matches the stored checksum.
    /// Returns false if there is no validation information at all!
    pub fn validate_text(&self) -> bool {
        match self.checksum.as_deref() {
            Some(checksum) => checksum == self.text_checksum(),
            None => false,
        }
    }
}

impl TextBase {
    /// Computes checksums for all documents that have none yet
    pub fn make_validation_checksums(&mut self) {
        let handles: Vec<DocumentHandle> = self
            .documents()
            .filter(|document| document.checksum().is_none())
            .filter_map(|document| document.handle())
            .collect();
        for handle in handles {
            let checksum = self.get(handle).map(|document| document.text_checksum()).ok();
            self.set_checksum(handle, checksum);
        }
    }

    /// Tests if any document has validation information
    pub fn has_validation_info(&self) -> bool {
        self.documents().any(|document| document.checksum().is_some())
    }

    /// Validates the text of all documents that carry a checksum.
    /// With `warn_for_all`, all failures are reported on standard error before the error is returned,
    /// otherwise the first failure is returned immediately.
    pub fn validate_text(&self, warn_for_all: bool) -> Result<(), TextEnvError> {
        let mut failures = 0;
        for document in self.documents() {
            if document.checksum().is_none() {
                debug(self.config(), || {
                    format!("validate_text: no checksum for {}, skipping", document.id())
                });
                continue;
            }
            if !document.validate_text() {
                failures += 1;
                if warn_for_all {
                    eprintln!("[textenv validation] Failed on {}", document.id());
                } else {
                    return Err(TextEnvError::ValidationError(
                        document.id().to_string(),
                        "TextBase::validate_text()",
                    ));
                }
            }
        }
        if failures == 0 {
            Ok(())
        } else {
            Err(TextEnvError::ValidationError(
                format!("{} document(s)", failures),
                "TextBase::validate_text()",
            ))
        }
    }
}
