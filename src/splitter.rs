/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains splitters, which partition the documents of a [`TextBase`] into
//! train/test [`SubTextBase`] views for evaluation.
//!
//! Splits are deterministic for a given seed: documents (or groups) are ordered by the SHA-1 digest
//! of the seed and their identifier, so the same seed always yields the same partition.

use std::collections::HashMap;

use sha1::{Digest, Sha1};

use crate::error::TextEnvError;
use crate::subtextbase::SubTextBase;
use crate::textbase::TextBase;
use crate::types::*;

/// One train/test partition of a text base
#[derive(Debug, Clone)]
pub struct Split<'a> {
    pub train: SubTextBase<'a>,
    pub test: SubTextBase<'a>,
}

impl<'a> Split<'a> {
    fn from_test(parent: &'a TextBase, test: Vec<DocumentHandle>) -> Self {
        let mut test = test;
        test.sort();
        let test = SubTextBase::from_handles(parent, test);
        Self {
            train: test.complement(),
            test,
        }
    }
}

/// Partitions a text base into one or more train/test splits
pub trait Splitter {
    fn split<'a>(&self, textbase: &'a TextBase) -> Vec<Split<'a>>;
}

/// Orders a key by seed; stable across runs and platforms
fn shuffle_key(seed: u64, key: &str) -> Vec<u8> {
    let mut hasher = Sha1::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(key.as_bytes());
    hasher.finalize().to_vec()
}

/// Splits documents at random (but reproducibly) into a train and a test part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomSplitter {
    fraction: f64,
    seed: u64,
}

impl RandomSplitter {
    /// `fraction` is the share of documents used for training, between 0.0 and 1.0 inclusive
    pub fn new(fraction: f64, seed: u64) -> Result<Self, TextEnvError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(TextEnvError::OtherError(
                "RandomSplitter::new(): fraction must be between 0.0 and 1.0",
            ));
        }
        Ok(Self { fraction, seed })
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Splitter for RandomSplitter {
    /// Always returns exactly one split
    fn split<'a>(&self, textbase: &'a TextBase) -> Vec<Split<'a>> {
        let mut order: Vec<(DocumentHandle, Vec<u8>)> = textbase
            .documents()
            .filter_map(|document| {
                document
                    .handle()
                    .map(|handle| (handle, shuffle_key(self.seed, document.id())))
            })
            .collect();
        order.sort_by(|(_, a), (_, b)| a.cmp(b));
        let trainsize = (self.fraction * order.len() as f64).round() as usize;
        let test: Vec<DocumentHandle> = order
            .into_iter()
            .skip(trainsize)
            .map(|(handle, _)| handle)
            .collect();
        debug(textbase.config(), || {
            format!(
                "RandomSplitter: train={} test={}",
                textbase.len() - test.len(),
                test.len()
            )
        });
        vec![Split::from_test(textbase, test)]
    }
}

/// K-fold cross validation. Documents sharing a group id always end up in the same fold;
/// documents without a group form a group of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossValSplitter {
    folds: usize,
    seed: u64,
}

impl CrossValSplitter {
    /// Needs at least two folds
    pub fn new(folds: usize, seed: u64) -> Result<Self, TextEnvError> {
        if folds < 2 {
            return Err(TextEnvError::OtherError(
                "CrossValSplitter::new(): need at least two folds",
            ));
        }
        Ok(Self { folds, seed })
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Splitter for CrossValSplitter {
    /// Returns one split per fold, the test parts of all splits partition the text base
    fn split<'a>(&self, textbase: &'a TextBase) -> Vec<Split<'a>> {
        // ungrouped documents are keyed apart so an id can not collide with a group name
        let mut groups: Vec<((bool, &str), Vec<DocumentHandle>)> = Vec::new();
        let mut groupindex: HashMap<(bool, &str), usize> = HashMap::new();
        for document in textbase.documents() {
            let handle = match document.handle() {
                Some(handle) => handle,
                None => continue,
            };
            let key = match document.group() {
                Some(group) => (true, group),
                None => (false, document.id()),
            };
            match groupindex.get(&key) {
                Some(index) => groups[*index].1.push(handle),
                None => {
                    groupindex.insert(key, groups.len());
                    groups.push((key, vec![handle]));
                }
            }
        }
        groups.sort_by_cached_key(|((_, key), _)| shuffle_key(self.seed, key));

        let mut folds: Vec<Vec<DocumentHandle>> = vec![Vec::new(); self.folds];
        for (i, (_, members)) in groups.into_iter().enumerate() {
            folds[i % self.folds].extend(members);
        }
        debug(textbase.config(), || {
            format!(
                "CrossValSplitter: fold sizes {:?}",
                folds.iter().map(|fold| fold.len()).collect::<Vec<_>>()
            )
        });
        folds
            .into_iter()
            .map(|test| Split::from_test(textbase, test))
            .collect()
    }
}
