#[cfg(test)]
use crate::*;
#[cfg(test)]
use crate::types::validate_name;

#[test]
fn tokenize_default() {
    let tokenizer = Tokenizer::default();
    let tokens = tokenizer.tokenize("Hello, world 42!");
    assert_eq!(
        tokens,
        vec![
            Token::new(0, 5),
            Token::new(5, 6),
            Token::new(7, 12),
            Token::new(13, 15),
            Token::new(15, 16),
        ]
    );
}

#[test]
fn tokenize_unicode_offsets() {
    let tokenizer = Tokenizer::default();
    //offsets are in unicode points, not bytes
    let tokens = tokenizer.tokenize("céline à Zürich");
    assert_eq!(
        tokens,
        vec![Token::new(0, 6), Token::new(7, 8), Token::new(9, 15)]
    );
}

#[test]
fn tokenize_empty() {
    let tokenizer = Tokenizer::default();
    assert!(tokenizer.tokenize("").is_empty());
    assert!(tokenizer.tokenize("  \n\t ").is_empty());
}

#[test]
fn tokenize_custom_pattern() -> Result<(), TextEnvError> {
    let tokenizer = Tokenizer::with_pattern(r"\S+")?;
    let tokens = tokenizer.tokenize("Hello, world!");
    assert_eq!(tokens, vec![Token::new(0, 6), Token::new(7, 13)]);
    Ok(())
}

#[test]
fn tokenize_invalid_pattern() {
    assert!(matches!(
        Tokenizer::with_pattern("(unclosed"),
        Err(TextEnvError::RegexError(..))
    ));
}

#[test]
fn char_snapping() -> Result<(), TextEnvError> {
    let mut textbase = TextBase::default();
    let document = textbase.load_document("doc", "the quick fox")?;
    //tokens: the(0,3) quick(4,9) fox(10,13)
    assert_eq!(document.token_range_by_chars(0, 3)?, (0, 1));
    //partial tokens snap outward
    assert_eq!(document.token_range_by_chars(1, 5)?, (0, 2));
    //whitespace only: zero-length span at the next token
    assert_eq!(document.token_range_by_chars(3, 4)?, (1, 0));
    //empty range inside a token
    assert_eq!(document.token_range_by_chars(5, 5)?, (1, 0));
    assert_eq!(document.token_range_by_chars(13, 13)?, (3, 0));
    assert_eq!(document.token_range_by_chars(0, 13)?, (0, 3));
    assert!(matches!(
        document.token_range_by_chars(2, 14),
        Err(TextEnvError::OutOfRange(..))
    ));
    assert!(matches!(
        document.token_range_by_chars(4, 2),
        Err(TextEnvError::OutOfRange(..))
    ));
    Ok(())
}

#[test]
fn char_range_of_tokens() -> Result<(), TextEnvError> {
    let mut textbase = TextBase::default();
    let document = textbase.load_document("doc", "  padded text ")?;
    //whole document covers surrounding whitespace too
    assert_eq!(document.char_range_of(0, 2), (0, 14));
    assert_eq!(document.char_range_of(0, 1), (2, 8));
    assert_eq!(document.char_range_of(1, 0), (9, 9));
    assert_eq!(document.char_range_of(2, 0), (14, 14));
    Ok(())
}

#[test]
fn utf8_conversion() -> Result<(), TextEnvError> {
    let mut textbase = TextBase::default();
    let document = textbase.load_document("doc", "Zürich is große")?;
    assert_eq!(document.textlen(), 15);
    assert_eq!(document.utf8byte(2)?, 3);
    assert_eq!(document.utf8byte_to_charpos(8)?, 7);
    assert!(document.utf8byte_to_charpos(2).is_err());
    assert_eq!(document.text_by_chars(10, 15)?, "große");
    Ok(())
}

#[test]
fn tagparser_simple() -> Result<(), TextEnvError> {
    let parser = TagParser::default();
    let tagged = parser.parse("doc", "The <animal>fox</animal> jumps")?;
    assert_eq!(tagged.text, "The fox jumps");
    assert_eq!(
        tagged.annotations,
        vec![TagAnnotation {
            begin: 4,
            end: 7,
            tp: "animal".to_string()
        }]
    );
    Ok(())
}

#[test]
fn tagparser_nested() -> Result<(), TextEnvError> {
    let parser = TagParser::default();
    let tagged = parser.parse("doc", "<a><b>x</b>y</a>")?;
    assert_eq!(tagged.text, "xy");
    assert_eq!(tagged.annotations.len(), 2);
    assert_eq!(tagged.annotations[0].tp, "b");
    assert_eq!((tagged.annotations[0].begin, tagged.annotations[0].end), (0, 1));
    assert_eq!(tagged.annotations[1].tp, "a");
    assert_eq!((tagged.annotations[1].begin, tagged.annotations[1].end), (0, 2));
    Ok(())
}

#[test]
fn tagparser_crossing() -> Result<(), TextEnvError> {
    let parser = TagParser::default();
    let tagged = parser.parse("doc", "<a>x<b>y</a>z</b>")?;
    assert_eq!(tagged.text, "xyz");
    assert_eq!(
        tagged.annotations,
        vec![
            TagAnnotation {
                begin: 0,
                end: 2,
                tp: "a".to_string()
            },
            TagAnnotation {
                begin: 1,
                end: 3,
                tp: "b".to_string()
            },
        ]
    );
    Ok(())
}

#[test]
fn tagparser_interleaved_close() -> Result<(), TextEnvError> {
    let parser = TagParser::default();
    let tagged = parser.parse("doc", "<a><b></a></b>")?;
    assert_eq!(tagged.text, "");
    assert_eq!(
        tagged.annotations,
        vec![
            TagAnnotation {
                begin: 0,
                end: 0,
                tp: "a".to_string()
            },
            TagAnnotation {
                begin: 0,
                end: 0,
                tp: "b".to_string()
            },
        ]
    );

    //b opens inside a but closes after it, so it covers all of a
    let tagged = parser.parse("doc", "<a><b>x</a>y</b>")?;
    assert_eq!(tagged.text, "xy");
    let a = &tagged.annotations[0];
    let b = &tagged.annotations[1];
    assert_eq!((a.tp.as_str(), a.begin, a.end), ("a", 0, 1));
    assert_eq!((b.tp.as_str(), b.begin, b.end), ("b", 0, 2));
    assert!(b.begin <= a.begin && a.end <= b.end);
    Ok(())
}

#[test]
fn tagparser_attributes() -> Result<(), TextEnvError> {
    let parser = TagParser::default();
    let tagged = parser.parse("doc", r#"Go <place kind="city">Paris</place>."#)?;
    assert_eq!(tagged.text, "Go Paris.");
    assert_eq!(tagged.annotations[0].tp, "place");
    assert_eq!((tagged.annotations[0].begin, tagged.annotations[0].end), (3, 8));
    Ok(())
}

#[test]
fn tagparser_unicode_offsets() -> Result<(), TextEnvError> {
    let parser = TagParser::default();
    let tagged = parser.parse("doc", "ça <x>va</x>")?;
    assert_eq!(tagged.text, "ça va");
    assert_eq!((tagged.annotations[0].begin, tagged.annotations[0].end), (3, 5));
    Ok(())
}

#[test]
fn tagparser_multiline_keeps_newlines() -> Result<(), TextEnvError> {
    let parser = TagParser::default();
    let tagged = parser.parse("doc", "<p>one\ntwo</p>\nthree")?;
    assert_eq!(tagged.text, "one\ntwo\nthree");
    assert_eq!((tagged.annotations[0].begin, tagged.annotations[0].end), (0, 7));
    Ok(())
}

#[test]
fn tagparser_close_without_open() {
    let parser = TagParser::default();
    match parser.parse("doc", "<a></b>") {
        Err(TextEnvError::MalformedMarkup(document, line, _)) => {
            assert_eq!(document, "doc");
            assert_eq!(line, 1);
        }
        other => panic!("expected malformed markup, got {:?}", other),
    }
}

#[test]
fn tagparser_unclosed() {
    let parser = TagParser::default();
    match parser.parse("doc", "first line\n<a>text") {
        Err(TextEnvError::MalformedMarkup(_, line, msg)) => {
            assert_eq!(line, 2);
            assert!(msg.contains("'a'"));
        }
        other => panic!("expected malformed markup, got {:?}", other),
    }
}

#[test]
fn validate_names() {
    assert!(validate_name("person", "test").is_ok());
    assert!(validate_name("", "test").is_err());
    assert!(validate_name("two words", "test").is_err());
    assert!(validate_name("tab\there", "test").is_err());
}

#[test]
fn closure_policy_from_str() -> Result<(), TextEnvError> {
    assert_eq!(ClosurePolicy::try_from("all")?, ClosurePolicy::CloseAllTypes);
    assert_eq!(
        ClosurePolicy::try_from("labeled")?,
        ClosurePolicy::CloseTypesInLabeledDocs
    );
    assert_eq!(ClosurePolicy::try_from("none")?, ClosurePolicy::DontCloseTypes);
    assert!(ClosurePolicy::try_from("sometimes").is_err());
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), TextEnvError> {
    let json = r#"{
        "debug": false,
        "closure_policy": "DontCloseTypes",
        "token_pattern": "\\S+"
    }"#;
    let config: Config = serde_json::from_str(json)
        .map_err(|e| TextEnvError::DeserializationError(e.to_string()))?;
    assert_eq!(config.closure_policy(), ClosurePolicy::DontCloseTypes);
    assert_eq!(config.token_pattern(), Some(r"\S+"));
    assert!(config.parallel() == Config::default().parallel());
    Ok(())
}
