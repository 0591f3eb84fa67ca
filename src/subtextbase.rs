//! Document-subset views over a [`TextBase`].

use std::collections::HashSet;

use crate::document::Document;
use crate::error::TextEnvError;
use crate::textbase::TextBase;
use crate::types::*;

/// A view on an explicit, ordered subset of the documents of a [`TextBase`].
/// No token data is copied; the view borrows its parent and can not outlive it.
#[derive(Debug, Clone)]
pub struct SubTextBase<'a> {
    parent: &'a TextBase,
    documents: Vec<DocumentHandle>,
    members: HashSet<DocumentHandle>,
}

impl<'a> SubTextBase<'a> {
    /// Creates the view. Fails with [`TextEnvError::NotFound`] for an identifier not in the parent.
    /// Duplicate identifiers are only included once, at their first position.
    pub fn new<'i>(
        parent: &'a TextBase,
        ids: impl IntoIterator<Item = &'i str>,
    ) -> Result<Self, TextEnvError> {
        let mut documents = Vec::new();
        let mut members = HashSet::new();
        for id in ids {
            let handle = parent.resolve_id(id)?;
            if members.insert(handle) {
                documents.push(handle);
            }
        }
        debug(parent.config(), || {
            format!("SubTextBase::new: {} document(s)", documents.len())
        });
        Ok(Self {
            parent,
            documents,
            members,
        })
    }

    /// Creates a view from handles that are known to be valid
    pub(crate) fn from_handles(parent: &'a TextBase, handles: Vec<DocumentHandle>) -> Self {
        let members = handles.iter().copied().collect();
        Self {
            parent,
            documents: handles,
            members,
        }
    }

    pub fn parent(&self) -> &'a TextBase {
        self.parent
    }

    /// Is the document part of this view?
    pub fn contains(&self, id: &str) -> bool {
        self.parent
            .resolve_id(id)
            .map(|handle| self.members.contains(&handle))
            .unwrap_or(false)
    }

    /// Returns a document, [`TextEnvError::NotFound`] if it is not part of this view
    pub fn document(&self, id: &str) -> Result<&'a Document, TextEnvError> {
        let handle = self.parent.resolve_id(id)?;
        if !self.members.contains(&handle) {
            return Err(TextEnvError::NotFound(
                id.to_string(),
                "SubTextBase::document(): document not in this view",
            ));
        }
        self.parent.get(handle)
    }

    /// Documents in view order
    pub fn documents(&self) -> impl Iterator<Item = &'a Document> + '_ {
        let parent = self.parent;
        self.documents
            .iter()
            .filter_map(move |handle| parent.get(*handle).ok())
    }

    /// Document identifiers in view order
    pub fn document_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.documents().map(|document| document.id())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns a view on the documents of the parent that are not in this view, in parent order
    pub fn complement(&self) -> SubTextBase<'a> {
        let handles = (0..self.parent.len())
            .map(DocumentHandle::new)
            .filter(|handle| !self.members.contains(handle))
            .collect();
        Self::from_handles(self.parent, handles)
    }

    /// Do the two views share no document?
    pub fn is_disjoint(&self, other: &SubTextBase) -> bool {
        self.members.is_disjoint(&other.members)
    }
}
