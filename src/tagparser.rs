/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`TagParser`], which strips inline markup from a text and recovers
//! the tagged regions as (type, character range) annotations.
//!
//! Tags are matched with an explicit stack. A closing tag pairs with the nearest open tag of the same
//! name anywhere on the stack, not only the top one, so improperly nested markup like
//! `<a>x<b>y</a>z</b>` is accepted (`a` covers "xy", `b` covers "yz").
//! A closing tag with no open counterpart, or an open tag that is never closed, is a [`TextEnvError::MalformedMarkup`].

use regex::Regex;
use smallvec::SmallVec;

use crate::error::TextEnvError;
use crate::types::*;

/// Matches `<name>`, `</name>` and `<name attr="...">`, the name is the first capture group
pub const DEFAULT_TAG_PATTERN: &str = r"</?([^ ><]+)( [^<>]+)?>";

/// A region recovered from the markup, in unicode point offsets of the stripped text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAnnotation {
    pub begin: usize,
    pub end: usize,
    pub tp: String,
}

/// The result of parsing one tagged text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedText {
    /// The text with all tags removed, everything else is copied verbatim
    pub text: String,
    /// Recovered regions, in the order their closing tags were encountered
    pub annotations: Vec<TagAnnotation>,
}

/// An open tag: output offset, tag name and the (1-based) line it was opened on
struct OpenTag {
    offset: usize,
    name: String,
    line: usize,
}

#[derive(Debug, Clone)]
pub struct TagParser {
    pattern: Regex,
}

impl Default for TagParser {
    fn default() -> Self {
        Self {
            pattern: Regex::new(DEFAULT_TAG_PATTERN).expect("default tag pattern must compile"),
        }
    }
}

impl TagParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom tag pattern. The first capture group must yield the tag name; a match starting with `</` is a closing tag.
    pub fn with_pattern(pattern: &str) -> Result<Self, TextEnvError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| TextEnvError::RegexError(e, "TagParser::with_pattern()"))?;
        Ok(Self { pattern })
    }

    /// Parses a tagged text. The document id is only used in error messages.
    pub fn parse(&self, document: &str, raw: &str) -> Result<TaggedText, TextEnvError> {
        let mut text = String::with_capacity(raw.len());
        let mut textlen = 0;
        let mut stack: SmallVec<[OpenTag; 8]> = SmallVec::new();
        let mut annotations = Vec::new();

        for (lineindex, line) in raw.split_inclusive('\n').enumerate() {
            let lineno = lineindex + 1;
            let mut cursor = 0;
            for m in self.pattern.captures_iter(line) {
                let (Some(whole), Some(name)) = (m.get(0), m.get(1)) else {
                    continue;
                };
                let segment = &line[cursor..whole.start()];
                text.push_str(segment);
                textlen += segment.chars().count();
                cursor = whole.end();

                let name = name.as_str();
                if validate_name(name, "TagParser::parse()").is_err() {
                    return Err(TextEnvError::MalformedMarkup(
                        document.to_string(),
                        lineno,
                        format!("invalid tag name {:?}", name),
                    ));
                }
                if whole.as_str().starts_with("</") {
                    let position = stack
                        .iter()
                        .rposition(|open| open.name == name)
                        .ok_or_else(|| {
                            TextEnvError::MalformedMarkup(
                                document.to_string(),
                                lineno,
                                format!("close '{}' tag with no open", name),
                            )
                        })?;
                    let open = stack.remove(position);
                    annotations.push(TagAnnotation {
                        begin: open.offset,
                        end: textlen,
                        tp: open.name,
                    });
                } else {
                    stack.push(OpenTag {
                        offset: textlen,
                        name: name.to_string(),
                        line: lineno,
                    });
                }
            }
            let rest = &line[cursor..];
            text.push_str(rest);
            textlen += rest.chars().count();
        }

        if let Some(open) = stack.first() {
            return Err(TextEnvError::MalformedMarkup(
                document.to_string(),
                open.line,
                format!("unclosed '{}' tag", open.name),
            ));
        }
        Ok(TaggedText { text, annotations })
    }
}
