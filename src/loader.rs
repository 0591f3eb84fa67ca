/*
    TextEnv Library (tokenized text bases and annotation environments)

        Licensed under the GNU General Public License v3
*/

//! This module contains the [`TextBaseLoader`], which ingests files into a [`Corpus`]:
//! tagged files (markup stripped and recovered as annotations), one document per line,
//! whole files, and directories of either.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::{Config, Configurable};
use crate::corpus::Corpus;
use crate::error::TextEnvError;
use crate::file::*;
use crate::tagparser::{TagParser, TaggedText};
use crate::textenv::{MonotonicTextEnv, TextEnv};
use crate::types::*;

/// Outcome of loading several files. A file that fails does not abort the others.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Identifiers of the documents that were installed, in installation order
    pub loaded: Vec<String>,
    /// File (or line) and the error that prevented it from being installed
    pub failures: Vec<(String, TextEnvError)>,
}

impl LoadReport {
    /// Did everything load?
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Loads documents into a [`Corpus`].
///
/// The closure policy of the configuration is applied after tagged input is installed.
pub struct TextBaseLoader {
    config: Config,
    parser: TagParser,
    /// In line mode, the first word of each line is the document id
    first_word_is_id: bool,
    /// In line mode, the second word of each line is the group id
    second_word_is_group: bool,
}

impl Configurable for TextBaseLoader {
    fn config(&self) -> &Config {
        &self.config
    }

    fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn set_config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }
}

impl Default for TextBaseLoader {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl TextBaseLoader {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parser: TagParser::default(),
            first_word_is_id: false,
            second_word_is_group: false,
        }
    }

    /// Uses a custom tag parser
    pub fn with_tag_parser(mut self, parser: TagParser) -> Self {
        self.parser = parser;
        self
    }

    /// In line mode, take the first word of each line as the document id
    pub fn with_first_word_id(mut self, value: bool) -> Self {
        self.first_word_is_id = value;
        if !value {
            self.second_word_is_group = false;
        }
        self
    }

    /// In line mode, take the second word of each line as the group id. This implies the first word is the document id.
    pub fn with_second_word_group(mut self, value: bool) -> Self {
        self.second_word_is_group = value;
        if value {
            self.first_word_is_id = true;
        }
        self
    }

    /// Creates an empty corpus with the configuration of this loader
    pub fn new_corpus(&self) -> Result<Corpus, TextEnvError> {
        Corpus::new(self.config.clone())
    }

    /// Parses a tagged text and installs it as one document with its annotations.
    /// Malformed markup leaves the corpus untouched.
    pub fn load_tagged_str(
        &self,
        corpus: &mut Corpus,
        id: &str,
        raw: &str,
    ) -> Result<(), TextEnvError> {
        let tagged = self.parser.parse(id, raw)?;
        self.install(corpus, id, tagged)?;
        let policy = self.config.closure_policy();
        corpus.with_labels(|labels| policy.apply_to_document(labels, id))
    }

    /// Loads one tagged file, the file name is the document id. Returns the id.
    pub fn load_tagged_file(
        &self,
        corpus: &mut Corpus,
        path: impl AsRef<Path>,
    ) -> Result<String, TextEnvError> {
        let path = path.as_ref();
        let id = file_name(path)?;
        let raw = read_to_string(path, &self.config)?;
        self.load_tagged_str(corpus, &id, &raw)?;
        Ok(id)
    }

    /// Loads all tagged files of a directory, in file name order. Subdirectories and version control
    /// housekeeping entries are skipped. Files are parsed in parallel if the configuration allows it,
    /// but always installed in file name order. The closure policy is applied once all files are in.
    pub fn load_tagged_dir(
        &self,
        corpus: &mut Corpus,
        dir: impl AsRef<Path>,
    ) -> Result<LoadReport, TextEnvError> {
        let files = self.list_files(dir.as_ref())?;
        let parse = |path: &PathBuf| -> (PathBuf, Result<(String, TaggedText), TextEnvError>) {
            let result = file_name(path).and_then(|id| {
                let raw = read_to_string(path, &self.config)?;
                let tagged = self.parser.parse(&id, &raw)?;
                Ok((id, tagged))
            });
            (path.clone(), result)
        };
        let parsed: Vec<_> = if self.config.parallel() {
            files.par_iter().map(parse).collect()
        } else {
            files.iter().map(parse).collect()
        };

        let mut report = LoadReport::default();
        for (path, result) in parsed {
            match result.and_then(|(id, tagged)| self.install(corpus, &id, tagged).map(|_| id)) {
                Ok(id) => report.loaded.push(id),
                Err(err) => {
                    debug(&self.config, || {
                        format!("load_tagged_dir: rejected {:?}: {}", path, err)
                    });
                    report
                        .failures
                        .push((path.to_string_lossy().into_owned(), err));
                }
            }
        }
        let policy = self.config.closure_policy();
        corpus.with_labels(|labels| policy.apply(labels))?;
        Ok(report)
    }

    /// Loads a file with one document per line. By default the id of each document is
    /// `<filename>@line:<lineno>`, see [`Self::with_first_word_id()`] and [`Self::with_second_word_group()`].
    pub fn load_lines(
        &self,
        corpus: &mut Corpus,
        path: impl AsRef<Path>,
    ) -> Result<LoadReport, TextEnvError> {
        let path = path.as_ref();
        let filename = file_name(path)?;
        let content = read_to_string(path, &self.config)?;
        let mut report = LoadReport::default();
        for (lineindex, line) in content.lines().enumerate() {
            let lineno = lineindex + 1;
            let (id, group, text) = self.split_line(&filename, lineno, line);
            let result = corpus
                .textbase_mut()
                .load_document(id.as_str(), text)
                .map(|_| ())
                .and_then(|_| match group {
                    Some(group) => corpus.textbase_mut().set_group_id(&id, group),
                    None => Ok(()),
                });
            match result {
                Ok(()) => report.loaded.push(id),
                Err(err) => {
                    debug(&self.config, || {
                        format!("load_lines: rejected {}@line:{}: {}", filename, lineno, err)
                    });
                    report
                        .failures
                        .push((format!("{}@line:{}", filename, lineno), err));
                }
            }
        }
        Ok(report)
    }

    /// Splits a line into document id, group id and text, according to the line mode
    fn split_line<'l>(
        &self,
        filename: &str,
        lineno: usize,
        line: &'l str,
    ) -> (String, Option<String>, &'l str) {
        if !self.first_word_is_id {
            return (format!("{}@line:{}", filename, lineno), None, line);
        }
        let (id, rest) = line.split_once(' ').unwrap_or((line, ""));
        if !self.second_word_is_group {
            return (id.to_string(), None, rest);
        }
        let (group, text) = rest.split_once(' ').unwrap_or((rest, ""));
        (id.to_string(), Some(group.to_string()), text)
    }

    /// Loads a whole (untagged) file as a single document with the given id
    pub fn load_file_with_id(
        &self,
        corpus: &mut Corpus,
        path: impl AsRef<Path>,
        id: &str,
    ) -> Result<(), TextEnvError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TextEnvError::NotFound(
                path.to_string_lossy().into_owned(),
                "TextBaseLoader::load_file_with_id(): not a file",
            ));
        }
        let text = read_to_string(path, &self.config)?;
        corpus.textbase_mut().load_document(id, text)?;
        Ok(())
    }

    /// Loads a directory whose subdirectories name categories: every file in a subdirectory is one
    /// (untagged) document, and its whole-document span is an instance of the category type.
    /// The closure policy is applied afterwards.
    pub fn load_labeled_dir(
        &self,
        corpus: &mut Corpus,
        dir: impl AsRef<Path>,
    ) -> Result<LoadReport, TextEnvError> {
        let mut report = LoadReport::default();
        for category_dir in self.list_entries(dir.as_ref())? {
            if !category_dir.is_dir() {
                debug(&self.config, || {
                    format!("load_labeled_dir: skipping file {:?}", category_dir)
                });
                continue;
            }
            let category = file_name(&category_dir)?;
            if let Err(err) = validate_name(&category, "TextBaseLoader::load_labeled_dir()") {
                report
                    .failures
                    .push((category_dir.to_string_lossy().into_owned(), err));
                continue;
            }
            for path in self.list_files(&category_dir)? {
                let result = file_name(&path).and_then(|id| {
                    self.load_file_with_id(corpus, &path, &id)?;
                    corpus.with_labels(|labels| {
                        let span = labels.textbase().document_span(&id)?.into_span();
                        labels.add_to_type(&span, &category)
                    })?;
                    Ok(id)
                });
                match result {
                    Ok(id) => report.loaded.push(id),
                    Err(err) => report
                        .failures
                        .push((path.to_string_lossy().into_owned(), err)),
                }
            }
        }
        let policy = self.config.closure_policy();
        corpus.with_labels(|labels| policy.apply(labels))?;
        Ok(report)
    }

    /// Loads a directory as tagged files, or a single file as one document per line
    pub fn load_file(
        &self,
        corpus: &mut Corpus,
        path: impl AsRef<Path>,
    ) -> Result<LoadReport, TextEnvError> {
        let path = path.as_ref();
        if path.is_dir() {
            self.load_tagged_dir(corpus, path)
        } else {
            self.load_lines(corpus, path)
        }
    }

    /// Installs a parsed text: the document first, then its annotations.
    /// Only the document insertion can fail, so a failure leaves nothing behind.
    fn install(
        &self,
        corpus: &mut Corpus,
        id: &str,
        tagged: TaggedText,
    ) -> Result<(), TextEnvError> {
        corpus.textbase_mut().load_document(id, tagged.text)?;
        let count = tagged.annotations.len();
        corpus.with_labels(|labels| {
            for annotation in tagged.annotations.iter() {
                let span = labels
                    .textbase()
                    .span_by_chars(id, annotation.begin, annotation.end)?
                    .into_span();
                labels.add_to_type(&span, &annotation.tp)?;
            }
            Ok(())
        })?;
        debug(&self.config, || {
            format!("TextBaseLoader::install: {} with {} annotation(s)", id, count)
        });
        Ok(())
    }

    /// Directory entries in file name order, without housekeeping entries
    fn list_entries(&self, dir: &Path) -> Result<Vec<PathBuf>, TextEnvError> {
        let mut entries = Vec::new();
        let readdir = fs::read_dir(dir).map_err(|e| {
            TextEnvError::IOError(
                e,
                dir.to_string_lossy().into_owned(),
                "Listing directory failed",
            )
        })?;
        for entry in readdir {
            let entry = entry.map_err(|e| {
                TextEnvError::IOError(
                    e,
                    dir.to_string_lossy().into_owned(),
                    "Listing directory failed",
                )
            })?;
            let path = entry.path();
            if is_housekeeping(&entry.file_name().to_string_lossy()) {
                debug(&self.config, || format!("skipping housekeeping entry {:?}", path));
                continue;
            }
            entries.push(path);
        }
        entries.sort();
        Ok(entries)
    }

    /// Regular files of a directory in file name order, without housekeeping entries
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, TextEnvError> {
        Ok(self
            .list_entries(dir)?
            .into_iter()
            .filter(|path| {
                let isfile = path.is_file();
                if !isfile {
                    debug(&self.config, || format!("skipping subdirectory {:?}", path));
                }
                isfile
            })
            .collect())
    }
}
