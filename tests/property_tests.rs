//! Property-based tests for the lexical rules.
//!
//! Inputs are generated from the token grammar itself, so every case should
//! encode; the decoder checks what came out.

use proptest::prelude::*;
use xftmpl::{decode, encode_slice, lookup_keyword, EncodeOptions, Guid, Token, TokenCode};

fn encode_tokens(text: &str) -> Vec<Token> {
    let input = format!("xof 0302txt 0032\n{}", text);
    let encoded = encode_slice(input.as_bytes(), &EncodeOptions::new()).unwrap();
    decode(&encoded.bytes).unwrap().tokens
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_-]{0,40}"
}

proptest! {
    #[test]
    fn prop_integer(n in any::<i32>()) {
        prop_assert_eq!(encode_tokens(&n.to_string()), vec![Token::Integer(n)]);
    }

    #[test]
    fn prop_name_or_keyword(name in name_strategy()) {
        let expected = match lookup_keyword(name.as_bytes()) {
            Some(code) => Token::Symbol(code),
            None => Token::Name(name.clone().into_bytes()),
        };
        prop_assert_eq!(encode_tokens(&name), vec![expected]);
    }

    #[test]
    fn prop_keyword_case_insensitive(
        word in prop::sample::select(vec![
            "ARRAY", "CHAR", "CSTRING", "DOUBLE", "DWORD", "FLOAT", "SDWORD",
            "STRING", "SWORD", "TEMPLATE", "UCHAR", "UNICODE", "VOID", "WORD",
        ]),
        mask in any::<u16>(),
    ) {
        let mixed: String = word
            .chars()
            .enumerate()
            .map(|(i, c)| if mask >> (i % 16) & 1 == 1 { c.to_ascii_lowercase() } else { c })
            .collect();
        let tokens = encode_tokens(&mixed);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0], &Token::Symbol(lookup_keyword(word.as_bytes()).unwrap()));
    }

    #[test]
    fn prop_string(text in "[^\"]{0,100}") {
        let tokens = encode_tokens(&format!("\"{}\"", text));
        prop_assert_eq!(tokens, vec![Token::String(text.into_bytes())]);
    }

    #[test]
    fn prop_guid(bytes in any::<[u8; 16]>(), lower in any::<bool>()) {
        let guid = Guid::from_bytes(&bytes);
        let mut text = guid.to_string();
        if lower {
            text = text.to_lowercase();
        }
        prop_assert_eq!(encode_tokens(&text), vec![Token::Guid(guid)]);
    }

    #[test]
    fn prop_float_payload(whole in 0u32..100_000, frac in 0u32..1000) {
        let text = format!("{}.{:03}", whole, frac);
        let input = format!("xof 0302txt 0064 {}", text);
        let encoded = encode_slice(input.as_bytes(), &EncodeOptions::new()).unwrap();
        let expected: f32 = text.parse().unwrap();
        let mut tail = vec![42u8, 0];
        tail.extend_from_slice(&expected.to_le_bytes());
        prop_assert_eq!(&encoded.bytes[16..], &tail[..]);
    }

    #[test]
    fn prop_punctuation_sequence(
        seq in prop::collection::vec(prop::sample::select(b"{}[](),;.".to_vec()), 0..50),
    ) {
        let text = String::from_utf8(seq.clone()).unwrap();
        let expected: Vec<Token> = seq
            .iter()
            .map(|&b| Token::Symbol(TokenCode::punctuation(b).unwrap()))
            .collect();
        prop_assert_eq!(encode_tokens(&text), expected);
    }
}
