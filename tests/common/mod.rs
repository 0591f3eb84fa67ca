#![allow(dead_code)]
use std::fs;
use std::path::PathBuf;

use textenv::*;

pub const TAGGED_DOC1: &str = "<person>John Smith</person> lives in <place>New York</place>.";
pub const TAGGED_DOC2: &str = "<person>Mary</person> works for <org>Acme Corp</org>.";
pub const PLAIN_DOC3: &str = "Nothing to see here.";

/// Two plain documents
pub fn setup_textbase_1() -> Result<TextBase, TextEnvError> {
    let mut textbase = TextBase::new(Config::default())?;
    textbase.load_document("doc1", "The quick brown fox jumps over the lazy dog.")?;
    textbase.load_document("doc2", "Hello world")?;
    Ok(textbase)
}

/// Three documents: two tagged ones and an unlabeled one.
/// Every type is closed in the two labeled documents, nothing is closed in the third.
///
/// doc1 tokens: John Smith lives in New York .
/// doc2 tokens: Mary works for Acme Corp .
pub fn setup_corpus_1() -> Result<Corpus, TextEnvError> {
    let loader =
        TextBaseLoader::new(Config::default().with_closure_policy(ClosurePolicy::DontCloseTypes));
    let mut corpus = loader.new_corpus()?;
    loader.load_tagged_str(&mut corpus, "doc1", TAGGED_DOC1)?;
    loader.load_tagged_str(&mut corpus, "doc2", TAGGED_DOC2)?;
    loader.load_tagged_str(&mut corpus, "doc3", PLAIN_DOC3)?;
    corpus.with_labels(|labels| ClosurePolicy::CloseTypesInLabeledDocs.apply(labels))?;
    Ok(corpus)
}

/// Creates a fresh, empty scratch directory under the system's temporary directory
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("textenv-test-{}-{}", std::process::id(), name));
    if dir.exists() {
        fs::remove_dir_all(&dir).expect("removing old scratch directory");
    }
    fs::create_dir_all(&dir).expect("creating scratch directory");
    dir
}
