mod common;
use crate::common::*;

use textenv::*;

#[test]
fn tagged_types() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let labels = corpus.labels();
    assert_eq!(labels.types(), vec!["org", "person", "place"]);
    assert!(labels.is_type("person"));
    assert!(!labels.is_type("animal"));
    assert_eq!(labels.instance_count(), 4);

    let persons = labels.instances("person");
    assert_eq!(persons.len(), 2);
    assert_eq!(persons[0].to_string(), "doc1[0+2]");
    assert_eq!(persons[1].to_string(), "doc2[0+1]");
    assert_eq!(labels.resolve(&persons[0])?.text(), "John Smith");

    let orgs = labels.instances_in("org", "doc2")?;
    assert_eq!(orgs.len(), 1);
    assert_eq!(labels.resolve(&orgs[0])?.text(), "Acme Corp");
    assert!(labels.instances_in("org", "doc1")?.is_empty());
    Ok(())
}

#[test]
fn instances_in_unknown_document() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let labels = corpus.labels();
    assert!(matches!(
        labels.instances_in("person", "doc9"),
        Err(TextEnvError::NotFound(..))
    ));
    Ok(())
}

#[test]
fn has_type() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let labels = corpus.labels();
    let place = corpus.textbase().span("doc1", 4, 2)?;
    assert!(labels.has_type(&place, "place"));
    assert!(!labels.has_type(&place, "person"));
    //one token shorter is a different span
    let shorter = corpus.textbase().span("doc1", 4, 1)?;
    assert!(!labels.has_type(&shorter, "place"));
    Ok(())
}

#[test]
fn closure_states() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let labels = corpus.labels();
    assert_eq!(labels.closure("org", "doc1"), ClosureState::Closed);
    assert_eq!(labels.closure("org", "doc3"), ClosureState::Open);
    assert!(labels.is_closed("person", "doc2"));
    assert_eq!(labels.closed_documents("place"), vec!["doc1", "doc2"]);
    //an unknown type is simply open
    assert_eq!(labels.closure("animal", "doc1"), ClosureState::Open);
    Ok(())
}

#[test]
fn not_instances_requires_closure() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let labels = corpus.labels();
    assert!(matches!(
        labels.not_instances("person", "doc3"),
        Err(TextEnvError::IncompleteAnnotation(..))
    ));
    Ok(())
}

#[test]
fn not_instances_count() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let labels = corpus.labels();
    //doc2 has 6 tokens: 28 spans when counting zero-length ones, none of them a place
    assert_eq!(labels.not_instances("place", "doc2")?.count(), 28);
    //doc1 has 7 tokens: 36 spans, one of them a person
    assert_eq!(labels.not_instances("person", "doc1")?.count(), 35);
    Ok(())
}

#[test]
fn closure_partitions_spans() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let labels = corpus.labels();
    let negatives: Vec<Span> = labels.not_instances("person", "doc1")?.collect();
    //ordered by start, then length
    let mut sorted = negatives.clone();
    sorted.sort();
    assert_eq!(negatives, sorted);
    let token_count = corpus.textbase().document("doc1")?.token_count();
    for start in 0..=token_count {
        for length in 0..=(token_count - start) {
            let span = corpus.textbase().span("doc1", start, length)?.into_span();
            let positive = labels.has_type(&span, "person");
            let negative = negatives.contains(&span);
            assert!(positive != negative, "{} must be exactly one of both", span);
        }
    }
    Ok(())
}

#[test]
fn add_to_type() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let span = corpus.textbase().span("doc2", 1, 1)?;
    labels.add_to_type(&span, "verb")?;
    assert!(labels.has_type(&span, "verb"));
    //adding again is a no-op
    labels.add_to_type(&span, "verb")?;
    assert_eq!(labels.instances("verb").len(), 1);
    Ok(())
}

#[test]
fn add_invalid_name() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let span = corpus.textbase().span("doc2", 1, 1)?;
    assert!(matches!(
        labels.add_to_type(&span, "two words"),
        Err(TextEnvError::InvalidName(..))
    ));
    assert!(matches!(
        labels.add_to_type(&span, ""),
        Err(TextEnvError::InvalidName(..))
    ));
    Ok(())
}

#[test]
fn add_foreign_span() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let othercorpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let span = othercorpus.textbase().span("doc2", 1, 1)?;
    assert!(matches!(
        labels.add_to_type(&span, "verb"),
        Err(TextEnvError::ForeignSpan(..))
    ));
    assert!(!labels.is_type("verb"));
    Ok(())
}

#[test]
fn foreign_span_reads() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let othercorpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let own = corpus.textbase().span("doc1", 0, 2)?;
    let foreign = othercorpus.textbase().span("doc1", 0, 2)?;
    //same document id and range, but another text base
    assert_eq!(&*own, &*foreign);
    assert!(labels.has_type(&own, "person"));
    assert!(!labels.has_type(&foreign, "person"));

    labels.set_span_property(&own, "gender", "male")?;
    labels.set_token_property(&own.token(0)?, "pos", "NNP")?;
    assert_eq!(labels.span_property(&foreign, "gender"), None);
    assert_eq!(labels.token_property(&foreign.token(0)?, "pos"), None);
    assert_eq!(labels.token_property(&own.token(0)?, "pos"), Some("NNP"));
    assert!(matches!(
        labels.add_to_type(&foreign, "person"),
        Err(TextEnvError::ForeignSpan(..))
    ));
    Ok(())
}

#[test]
fn span_properties_are_monotonic() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let span = corpus.textbase().span("doc1", 0, 2)?;
    labels.set_span_property(&span, "gender", "male")?;
    assert_eq!(labels.span_property(&span, "gender"), Some("male"));
    //the same value again is fine
    labels.set_span_property(&span, "gender", "male")?;
    //a different value is refused and leaves the old one in place
    assert!(matches!(
        labels.set_span_property(&span, "gender", "female"),
        Err(TextEnvError::PropertyConflict(..))
    ));
    assert_eq!(labels.span_property(&span, "gender"), Some("male"));
    assert_eq!(labels.span_property_names(), vec!["gender"]);
    Ok(())
}

#[test]
fn token_properties() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let span = corpus.textbase().span("doc1", 0, 2)?;
    let first = span.token(0)?;
    let second = span.token(1)?;
    labels.set_token_property(&first, "pos", "NNP")?;
    labels.set_property(Target::from(&second), "pos", "NNP")?;
    assert_eq!(labels.token_property(&first, "pos"), Some("NNP"));
    assert_eq!(labels.token_property(&second, "pos"), Some("NNP"));
    assert_eq!(labels.token_property(&first, "lemma"), None);
    assert_eq!(labels.token_property_names(), vec!["pos"]);
    //token and span properties live apart
    assert!(labels.span_property_names().is_empty());
    Ok(())
}

#[test]
fn close_type_unknown_document() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    assert!(matches!(
        labels.close_type("person", "doc9"),
        Err(TextEnvError::NotFound(..))
    ));
    labels.close_type("person", "doc3")?;
    assert!(labels.is_closed("person", "doc3"));
    Ok(())
}

#[test]
fn mutable_removal() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let span = corpus.textbase().span("doc1", 0, 2)?;
    assert!(labels.remove_from_type(&span, "person")?);
    assert!(!labels.has_type(&span, "person"));
    assert!(!labels.remove_from_type(&span, "person")?);

    labels.set_span_property(&span, "gender", "male")?;
    assert_eq!(
        labels.overwrite_property(Target::from(&span), "gender", "unknown")?,
        Some("male".to_string())
    );
    assert_eq!(labels.span_property(&span, "gender"), Some("unknown"));
    assert_eq!(
        labels.remove_property(Target::from(&span), "gender")?,
        Some("unknown".to_string())
    );
    assert_eq!(labels.span_property(&span, "gender"), None);

    labels.set_closure("person", "doc1", false)?;
    assert_eq!(labels.closure("person", "doc1"), ClosureState::Open);
    labels.set_closure("person", "doc1", true)?;
    assert_eq!(labels.closure("person", "doc1"), ClosureState::Closed);
    Ok(())
}

#[test]
fn corpus_with_labels_keeps_writes() -> Result<(), TextEnvError> {
    let mut corpus = setup_corpus_1()?;
    corpus.with_labels(|labels| {
        let span = labels.textbase().span("doc3", 0, 1)?.into_span();
        labels.add_to_type(&span, "sentence_start")
    })?;
    assert!(corpus.labels().is_type("sentence_start"));
    assert_eq!(corpus.annotations().instance_count(), 5);
    Ok(())
}

struct Capitalized;

impl StringAnnotator for Capitalized {
    fn name(&self) -> &str {
        "capitalized"
    }

    fn annotate_string(&self, text: &str) -> Vec<CharAnnotation> {
        let mut result = Vec::new();
        let mut offset = 0;
        for word in text.split(' ') {
            let length = word.chars().count();
            if word.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
                result.push(CharAnnotation::new(offset, length, "capitalized"));
            }
            offset += length + 1;
        }
        result
    }
}

struct Closer;

impl Annotator for Closer {
    fn annotate(&self, env: &mut dyn MonotonicTextEnv) -> Result<(), TextEnvError> {
        let documents: Vec<String> = env.document_ids().map(|id| id.to_string()).collect();
        for document in documents.iter() {
            env.close_type("capitalized", document)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "closer"
    }
}

#[test]
fn string_annotator() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let annotator = StringAnnotatorAdapter::new(Capitalized);
    annotator.run(&mut labels)?;
    assert!(labels.is_annotated_by("capitalized"));
    assert!(labels.annotated_at("capitalized").is_some());
    assert!(!labels.is_annotated_by("closer"));
    //"York." snaps to two tokens
    let texts: Vec<String> = labels
        .instances_in("capitalized", "doc1")?
        .iter()
        .map(|span| labels.resolve(span).map(|span| span.text().to_string()))
        .collect::<Result<_, _>>()?;
    assert_eq!(texts, vec!["John", "Smith", "New", "York."]);
    assert_eq!(labels.instances("capitalized").len(), 8);
    Ok(())
}

#[test]
fn serial_annotator() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let pipeline = SerialAnnotator::new("pipeline")
        .with_annotator(Box::new(StringAnnotatorAdapter::new(Capitalized)))
        .with_annotator(Box::new(Closer));
    assert_eq!(pipeline.len(), 2);
    pipeline.run(&mut labels)?;
    for name in ["capitalized", "closer", "pipeline"] {
        assert!(labels.is_annotated_by(name), "{} should be recorded", name);
    }
    assert_eq!(labels.closed_documents("capitalized"), vec!["doc1", "doc2", "doc3"]);
    let span = corpus.textbase().span("doc1", 0, 2)?;
    assert_eq!(
        pipeline.explain(&labels, &span),
        "doc1[0+2] was annotated by capitalized\ndoc1[0+2] was annotated by closer"
    );
    Ok(())
}

#[test]
fn annotators_are_monotonic() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let mut labels = corpus.labels();
    let span = corpus.textbase().span("doc1", 0, 2)?;
    labels.set_span_property(&span, "gender", "male")?;

    let mut facts: Vec<(String, Span)> = Vec::new();
    for tp in labels.types() {
        for instance in labels.instances(tp) {
            facts.push((tp.to_string(), instance));
        }
    }
    let closed: Vec<(String, String)> = labels
        .types()
        .into_iter()
        .flat_map(|tp| {
            labels
                .closed_documents(tp)
                .into_iter()
                .map(move |document| (tp.to_string(), document.to_string()))
        })
        .collect();

    SerialAnnotator::new("pipeline")
        .with_annotator(Box::new(StringAnnotatorAdapter::new(Capitalized)))
        .with_annotator(Box::new(Closer))
        .run(&mut labels)?;

    for (tp, instance) in facts.iter() {
        assert!(labels.has_type(instance, tp));
    }
    for (tp, document) in closed.iter() {
        assert!(labels.is_closed(tp, document));
    }
    assert_eq!(labels.span_property(&span, "gender"), Some("male"));
    Ok(())
}

#[test]
fn closure_policy_labeled_only() -> Result<(), TextEnvError> {
    let corpus = setup_corpus_1()?;
    let (textbase, _) = corpus.into_parts();
    let mut labels = TextLabels::new(&textbase);
    let span = textbase.span("doc1", 0, 1)?;
    labels.add_to_type(&span, "first")?;
    ClosurePolicy::CloseTypesInLabeledDocs.apply(&mut labels)?;
    assert_eq!(labels.closed_documents("first"), vec!["doc1"]);
    ClosurePolicy::CloseAllTypes.apply(&mut labels)?;
    assert_eq!(labels.closed_documents("first"), vec!["doc1", "doc2", "doc3"]);
    Ok(())
}
