mod common;
use crate::common::*;

use textenv::*;

#[test]
fn instantiation() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    assert_eq!(textbase.len(), 2);
    assert!(textbase.has_document("doc1"));
    assert!(!textbase.has_document("doc3"));
    assert_eq!(textbase.document_ids().collect::<Vec<_>>(), vec!["doc1", "doc2"]);
    Ok(())
}

#[test]
fn document_tokens() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    let document = textbase.document("doc2")?;
    assert_eq!(document.id(), "doc2");
    assert_eq!(document.text(), "Hello world");
    assert_eq!(document.token_count(), 2);
    assert_eq!(document.token_text(1)?, "world");
    assert_eq!(document.tokens()[1], Token::new(6, 11));
    Ok(())
}

#[test]
fn duplicate_document() -> Result<(), TextEnvError> {
    let mut textbase = setup_textbase_1()?;
    assert!(matches!(
        textbase.load_document("doc1", "again"),
        Err(TextEnvError::DuplicateDocumentId(..))
    ));
    //the original is untouched
    assert_eq!(textbase.len(), 2);
    assert_eq!(textbase.document("doc1")?.token_count(), 10);
    Ok(())
}

#[test]
fn unknown_document() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    assert!(matches!(
        textbase.document("nonexistent"),
        Err(TextEnvError::NotFound(..))
    ));
    assert!(matches!(
        textbase.span("nonexistent", 0, 1),
        Err(TextEnvError::NotFound(..))
    ));
    Ok(())
}

#[test]
fn span_text() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    let span = textbase.span("doc1", 1, 3)?;
    assert_eq!(span.text(), "quick brown fox");
    assert_eq!(span.char_range(), (4, 19));
    assert_eq!(span.start(), 1);
    assert_eq!(span.length(), 3);
    assert_eq!(span.end(), 4);
    assert_eq!(span.tokens().len(), 3);
    assert_eq!(span.to_string(), "doc1[1+3] \"quick brown fox\"");
    Ok(())
}

#[test]
fn span_out_of_range() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    assert!(matches!(
        textbase.span("doc2", 1, 2),
        Err(TextEnvError::OutOfRange(..))
    ));
    //zero-length span at the very end is fine
    let span = textbase.span("doc2", 2, 0)?;
    assert!(span.is_empty());
    assert_eq!(span.text(), "");
    assert_eq!(span.char_range(), (11, 11));
    Ok(())
}

#[test]
fn whole_document_span() -> Result<(), TextEnvError> {
    let mut textbase = TextBase::default();
    textbase.load_document("padded", "  Hello world!  ")?;
    let span = textbase.document_span("padded")?;
    assert!(span.is_whole_document());
    assert_eq!(span.length(), 3);
    assert_eq!(span.char_range(), (0, 16));
    assert_eq!(span.text(), "  Hello world!  ");
    Ok(())
}

#[test]
fn empty_document() -> Result<(), TextEnvError> {
    let mut textbase = TextBase::default();
    textbase.load_document("empty", "")?;
    let document = textbase.document("empty")?;
    assert_eq!(document.token_count(), 0);
    let span = textbase.document_span("empty")?;
    assert!(span.is_empty());
    assert_eq!(span.char_range(), (0, 0));
    assert_eq!(span.text(), "");
    Ok(())
}

#[test]
fn sub_span_associativity() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    let span = textbase.document_span("doc1")?;
    for (x, lx, y, ly) in [(1, 6, 2, 3), (0, 10, 4, 0), (3, 5, 0, 5), (2, 2, 1, 1)] {
        let nested = span.sub_span(x, lx)?.sub_span(y, ly)?;
        let direct = span.sub_span(x + y, ly)?;
        assert_eq!(nested, direct);
        assert_eq!(nested.text(), direct.text());
    }
    Ok(())
}

#[test]
fn sub_span_out_of_range() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    let span = textbase.span("doc1", 2, 3)?;
    assert!(matches!(
        span.sub_span(1, 3),
        Err(TextEnvError::OutOfRange(..))
    ));
    Ok(())
}

#[test]
fn span_overflow() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    assert!(matches!(
        textbase.span("doc1", usize::MAX, 1),
        Err(TextEnvError::OutOfRange(..))
    ));
    assert!(matches!(
        textbase.span("doc1", 1, usize::MAX),
        Err(TextEnvError::OutOfRange(..))
    ));
    let whole = textbase.document_span("doc1")?;
    assert!(matches!(
        whole.sub_span(usize::MAX, 2),
        Err(TextEnvError::OutOfRange(..))
    ));
    assert!(matches!(
        whole.token(usize::MAX),
        Err(TextEnvError::OutOfRange(..))
    ));
    assert!(matches!(
        textbase.token("doc1", usize::MAX),
        Err(TextEnvError::OutOfRange(..))
    ));
    Ok(())
}

#[test]
fn char_sub_span() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    //"quick brown fox"
    let span = textbase.span("doc1", 1, 3)?;
    let sub = span.char_sub_span(2, 8)?;
    assert_eq!(sub.text(), "quick brown");
    assert_eq!((sub.start(), sub.length()), (1, 2));
    assert!(matches!(
        span.char_sub_span(0, 16),
        Err(TextEnvError::OutOfRange(..))
    ));
    Ok(())
}

#[test]
fn span_by_chars_snaps_outward() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    //"ick bro"
    let span = textbase.span_by_chars("doc1", 6, 13)?;
    assert_eq!(span.text(), "quick brown");
    //whitespace between tokens resolves to a zero-length span
    let span = textbase.span_by_chars("doc1", 3, 4)?;
    assert!(span.is_empty());
    assert_eq!(span.start(), 1);
    Ok(())
}

#[test]
fn char_range_roundtrip_is_idempotent() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    for (begin, end) in [(0, 3), (5, 17), (2, 44), (40, 44), (12, 12)] {
        let span = textbase.span_by_chars("doc1", begin, end)?;
        let (b, e) = span.char_range();
        let again = textbase.span_by_chars("doc1", b, e)?;
        assert_eq!(span, again);
        assert_eq!(again.char_range(), (b, e));
    }
    Ok(())
}

#[test]
fn span_relations() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    let outer = textbase.span("doc1", 1, 5)?;
    let inner = textbase.span("doc1", 2, 2)?;
    let other = textbase.span("doc1", 5, 3)?;
    let elsewhere = textbase.span("doc2", 0, 1)?;
    assert!(outer.contains(&inner));
    assert!(!inner.contains(&outer));
    assert!(outer.overlaps(&other));
    assert!(!inner.overlaps(&other));
    assert!(!outer.overlaps(&elsewhere));
    assert!(inner < other);
    Ok(())
}

#[test]
fn token_refs() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    let span = textbase.span("doc1", 3, 2)?;
    let token = span.token(1)?;
    assert_eq!(token.document_id(), "doc1");
    assert_eq!(token.index(), 4);
    assert_eq!(token, textbase.token("doc1", 4)?);
    assert!(matches!(span.token(2), Err(TextEnvError::OutOfRange(..))));
    assert_eq!(span.token_refs().count(), 2);
    Ok(())
}

#[test]
fn foreign_span() -> Result<(), TextEnvError> {
    let textbase = setup_textbase_1()?;
    let otherbase = setup_textbase_1()?;
    let span = otherbase.span("doc1", 0, 1)?.into_span();
    assert!(matches!(
        textbase.resolve(&span),
        Err(TextEnvError::ForeignSpan(..))
    ));
    let own = textbase.span("doc1", 0, 1)?.into_span();
    assert_eq!(textbase.resolve(&own)?.text(), "The");
    Ok(())
}

#[test]
fn group_ids() -> Result<(), TextEnvError> {
    let mut textbase = setup_textbase_1()?;
    assert_eq!(textbase.group_id("doc1"), None);
    textbase.set_group_id("doc1", "animals")?;
    assert_eq!(textbase.group_id("doc1"), Some("animals"));
    assert!(matches!(
        textbase.set_group_id("doc9", "x"),
        Err(TextEnvError::NotFound(..))
    ));
    Ok(())
}

#[test]
fn custom_token_pattern() -> Result<(), TextEnvError> {
    let mut textbase = TextBase::new(Config::default().with_token_pattern(r"\S+"))?;
    textbase.load_document("doc", "Hello, world!")?;
    assert_eq!(textbase.document("doc")?.token_count(), 2);
    assert_eq!(textbase.span("doc", 0, 1)?.text(), "Hello,");
    Ok(())
}

#[test]
fn subtextbase() -> Result<(), TextEnvError> {
    let mut textbase = setup_textbase_1()?;
    textbase.load_document("doc3", "A third one.")?;
    let subset = SubTextBase::new(&textbase, ["doc3", "doc1", "doc3"])?;
    assert_eq!(subset.len(), 2);
    assert_eq!(subset.document_ids().collect::<Vec<_>>(), vec!["doc3", "doc1"]);
    assert!(subset.contains("doc1"));
    assert!(!subset.contains("doc2"));
    assert!(matches!(
        subset.document("doc2"),
        Err(TextEnvError::NotFound(..))
    ));
    let complement = subset.complement();
    assert_eq!(complement.document_ids().collect::<Vec<_>>(), vec!["doc2"]);
    assert!(subset.is_disjoint(&complement));
    assert!(matches!(
        SubTextBase::new(&textbase, ["doc1", "doc9"]),
        Err(TextEnvError::NotFound(..))
    ));
    Ok(())
}
