use xftmpl::{encode_slice, lookup_keyword, EncodeOptions, Error, LexErrorKind, TokenCode};

const HEADER: &[u8] = b"xof 0302txt 0032";

fn token_bytes(text: &[u8]) -> Vec<u8> {
    let input = [HEADER, &b" "[..], text].concat();
    let encoded = encode_slice(&input, &EncodeOptions::new()).unwrap();
    encoded.bytes[16..].to_vec()
}

fn lex_error(text: &[u8]) -> LexErrorKind {
    let input = [HEADER, &b" "[..], text].concat();
    match encode_slice(&input, &EncodeOptions::new()) {
        Err(Error::Lex { kind, .. }) => kind,
        other => panic!("expected lexical error for {:?}, got {:?}", text, other),
    }
}

#[test]
fn test_punctuation_codes() {
    let table: [(u8, u16); 9] = [
        (b'{', 10),
        (b'}', 11),
        (b'(', 12),
        (b')', 13),
        (b'[', 14),
        (b']', 15),
        (b'.', 18),
        (b',', 19),
        (b';', 20),
    ];
    for (byte, code) in table {
        assert_eq!(
            token_bytes(&[byte]),
            code.to_le_bytes().to_vec(),
            "punctuation {:?}",
            byte as char
        );
    }
}

#[test]
fn test_every_keyword() {
    let table: [(&str, u16); 14] = [
        ("ARRAY", 52),
        ("CHAR", 44),
        ("CSTRING", 51),
        ("DOUBLE", 43),
        ("DWORD", 41),
        ("FLOAT", 42),
        ("SDWORD", 47),
        ("STRING", 49),
        ("SWORD", 46),
        ("TEMPLATE", 31),
        ("UCHAR", 45),
        ("UNICODE", 50),
        ("VOID", 48),
        ("WORD", 40),
    ];
    for (word, code) in table {
        assert_eq!(token_bytes(word.as_bytes()), code.to_le_bytes().to_vec(), "{}", word);
        assert_eq!(
            token_bytes(word.to_lowercase().as_bytes()),
            code.to_le_bytes().to_vec(),
            "{}",
            word
        );
        assert_eq!(
            lookup_keyword(word.as_bytes()).map(TokenCode::as_u16),
            Some(code)
        );
    }
}

#[test]
fn test_keyword_prefix_is_a_name() {
    let bytes = token_bytes(b"WORDS");
    assert_eq!(&bytes[..2], &[1, 0]);
    assert_eq!(&bytes[6..], b"WORDS");
}

#[test]
fn test_underscore_starts_name() {
    let bytes = token_bytes(b"_private");
    assert_eq!(&bytes[..6], &[1, 0, 8, 0, 0, 0]);
}

#[test]
fn test_empty_string() {
    assert_eq!(token_bytes(b"\"\""), vec![2, 0, 0, 0, 0, 0]);
}

#[test]
fn test_string_keeps_whitespace_and_comment_markers() {
    let bytes = token_bytes(b"\"a // b\n#c\"");
    assert_eq!(&bytes[..6], &[2, 0, 9, 0, 0, 0]);
    assert_eq!(&bytes[6..], b"a // b\n#c");
}

#[test]
fn test_float_forms() {
    for (text, value) in [("0.25", 0.25f32), ("-1.5", -1.5), ("2.", 2.0), ("-.5", -0.5)] {
        let mut expected = vec![42, 0];
        expected.extend_from_slice(&value.to_le_bytes());
        assert_eq!(token_bytes(text.as_bytes()), expected, "{}", text);
    }
}

#[test]
fn test_number_then_name() {
    // A letter ends a number without being consumed.
    let bytes = token_bytes(b"12ab");
    let mut expected = vec![3, 0];
    expected.extend_from_slice(&12i32.to_le_bytes());
    expected.extend_from_slice(&[1, 0, 2, 0, 0, 0, b'a', b'b']);
    assert_eq!(bytes, expected);
}

#[test]
fn test_error_messages() {
    assert_eq!(lex_error(b"/ x").to_string(), "invalid single '/' comment token");
    assert_eq!(lex_error(b"#pragma").to_string(), "line too long");
    assert_eq!(lex_error(b"<1234").to_string(), "truncated GUID");
    assert_eq!(
        lex_error(b"<00000000+0000-0000-0000-000000000000>").to_string(),
        "invalid GUID '<00000000+0000-0000-0000-000000000000>'"
    );
    assert_eq!(lex_error(b"\"open").to_string(), "unterminated string");
    assert_eq!(lex_error(b"-.").to_string(), "invalid float token '-.'");
    assert_eq!(lex_error(b"-").to_string(), "invalid integer token '-'");
    assert_eq!(
        lex_error(b"!").to_string(),
        "invalid character '!' to start token"
    );
}

#[test]
fn test_comment_at_end_of_input() {
    assert!(token_bytes(b"WORD // no newline").starts_with(&[40, 0]));
    assert_eq!(token_bytes(b"WORD // no newline").len(), 2);
}

#[test]
fn test_guid_is_read_raw() {
    // The 37 bytes after '<' are taken verbatim, even if they hold a newline.
    assert!(matches!(
        lex_error(b"<00000000-0000-0000-0000-00000000000\n>"),
        LexErrorKind::InvalidGuid(_)
    ));
}
