/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the subset views over annotation environments:
//! [`SubTextLabels`] (read-only) and [`MonotonicSubTextLabels`] (append-only).
//! Both restrict every query (and write) to the documents of a [`SubTextBase`].

use chrono::{DateTime, Utc};
use sealed::sealed;

use crate::closure::ClosureState;
use crate::error::TextEnvError;
use crate::span::{Span, TokenRef};
use crate::subtextbase::SubTextBase;
use crate::textbase::TextBase;
use crate::textenv::*;

/// Read-only view of an environment restricted to a subset of documents.
/// Used to expose only the training documents of a partition to a learner.
pub struct SubTextLabels<'a> {
    parent: &'a dyn TextEnv,
    subset: SubTextBase<'a>,
}

/// Append-only view of an environment restricted to a subset of documents.
/// Writes for documents outside the subset fail with [`TextEnvError::NotFound`].
pub struct MonotonicSubTextLabels<'a> {
    parent: &'a mut dyn MonotonicTextEnv,
    subset: SubTextBase<'a>,
}

/// Verifies the subset is drawn from the environment's text base and from documents the environment exposes
fn check_subset(
    textbase: &TextBase,
    contains_document: &dyn Fn(&str) -> bool,
    subset: &SubTextBase,
) -> Result<(), TextEnvError> {
    if textbase.key() != subset.parent().key() {
        return Err(TextEnvError::ForeignSpan(
            "subset view: the subset belongs to another text base",
        ));
    }
    for id in subset.document_ids() {
        if !contains_document(id) {
            return Err(TextEnvError::NotFound(
                id.to_string(),
                "subset view: document not in the parent environment",
            ));
        }
    }
    Ok(())
}

impl<'a> SubTextLabels<'a> {
    pub fn new(parent: &'a dyn TextEnv, subset: SubTextBase<'a>) -> Result<Self, TextEnvError> {
        check_subset(
            parent.textbase(),
            &|id| parent.contains_document(id),
            &subset,
        )?;
        Ok(Self { parent, subset })
    }

    pub fn subset(&self) -> &SubTextBase<'a> {
        &self.subset
    }
}

impl<'a> MonotonicSubTextLabels<'a> {
    pub fn new(
        parent: &'a mut dyn MonotonicTextEnv,
        subset: SubTextBase<'a>,
    ) -> Result<Self, TextEnvError> {
        {
            let env: &dyn MonotonicTextEnv = &*parent;
            check_subset(env.textbase(), &|id| env.contains_document(id), &subset)?;
        }
        Ok(Self { parent, subset })
    }

    pub fn subset(&self) -> &SubTextBase<'a> {
        &self.subset
    }

    fn check_document(&self, id: &str, contextmsg: &'static str) -> Result<(), TextEnvError> {
        if self.subset.contains(id) {
            Ok(())
        } else {
            Err(TextEnvError::NotFound(id.to_string(), contextmsg))
        }
    }
}

/// The read side of both subset views is identical; only the type of the parent handle differs
macro_rules! impl_subset_textenv {
    ($viewtype: ident) => {
        #[sealed]
        impl<'a> TextEnv for $viewtype<'a> {
            fn textbase(&self) -> &TextBase {
                self.parent.textbase()
            }

            fn contains_document(&self, id: &str) -> bool {
                self.subset.contains(id)
            }

            fn document_ids(&self) -> Box<dyn Iterator<Item = &str> + '_> {
                Box::new(self.subset.document_ids())
            }

            fn has_type(&self, span: &Span, tp: &str) -> bool {
                self.subset.contains(span.document_id()) && self.parent.has_type(span, tp)
            }

            fn instances(&self, tp: &str) -> Vec<Span> {
                let mut instances = Vec::new();
                for id in self.subset.document_ids() {
                    if let Ok(spans) = self.parent.instances_in(tp, id) {
                        instances.extend(spans);
                    }
                }
                //view order may differ from span order
                instances.sort();
                instances
            }

            fn instances_in(&self, tp: &str, document: &str) -> Result<Vec<Span>, TextEnvError> {
                if !self.subset.contains(document) {
                    return Err(TextEnvError::NotFound(
                        document.to_string(),
                        concat!(stringify!($viewtype), "::instances_in(): document not in this view"),
                    ));
                }
                self.parent.instances_in(tp, document)
            }

            fn types(&self) -> Vec<&str> {
                self.parent.types()
            }

            fn is_type(&self, tp: &str) -> bool {
                self.parent.is_type(tp)
            }

            fn span_property(&self, span: &Span, key: &str) -> Option<&str> {
                if self.subset.contains(span.document_id()) {
                    self.parent.span_property(span, key)
                } else {
                    None
                }
            }

            fn token_property(&self, token: &TokenRef, key: &str) -> Option<&str> {
                if self.subset.contains(token.document_id()) {
                    self.parent.token_property(token, key)
                } else {
                    None
                }
            }

            fn span_property_names(&self) -> Vec<&str> {
                self.parent.span_property_names()
            }

            fn token_property_names(&self) -> Vec<&str> {
                self.parent.token_property_names()
            }

            fn closure(&self, tp: &str, document: &str) -> ClosureState {
                if self.subset.contains(document) {
                    self.parent.closure(tp, document)
                } else {
                    ClosureState::Open
                }
            }

            fn closed_documents(&self, tp: &str) -> Vec<&str> {
                self.subset
                    .document_ids()
                    .filter(|document| self.parent.is_closed(tp, document))
                    .collect()
            }

            fn annotated_at(&self, name: &str) -> Option<DateTime<Utc>> {
                self.parent.annotated_at(name)
            }
        }
    };
}

impl_subset_textenv!(SubTextLabels);
impl_subset_textenv!(MonotonicSubTextLabels);

#[sealed]
impl<'a> MonotonicTextEnv for MonotonicSubTextLabels<'a> {
    fn add_to_type(&mut self, span: &Span, tp: &str) -> Result<(), TextEnvError> {
        self.check_document(span.document_id(), "MonotonicSubTextLabels::add_to_type()")?;
        self.parent.add_to_type(span, tp)
    }

    fn set_property(
        &mut self,
        target: Target<'_>,
        key: &str,
        value: &str,
    ) -> Result<(), TextEnvError> {
        self.check_document(target.document_id(), "MonotonicSubTextLabels::set_property()")?;
        self.parent.set_property(target, key, value)
    }

    fn close_type(&mut self, tp: &str, document: &str) -> Result<(), TextEnvError> {
        self.check_document(document, "MonotonicSubTextLabels::close_type()")?;
        self.parent.close_type(tp, document)
    }

    fn set_annotated_by(&mut self, name: &str) -> Result<(), TextEnvError> {
        self.parent.set_annotated_by(name)
    }
}
