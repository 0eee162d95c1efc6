//! The binary token model.
//!
//! A binary X template stream is a flat sequence of tokens. Each token starts
//! with a 16-bit little-endian [`TokenCode`]; the code alone determines whether
//! a payload follows and how wide it is. There is no framing around tokens, so
//! the table below is the whole contract between encoder and decoder:
//!
//! | Token | Payload |
//! |-------|---------|
//! | [`Token::Name`], [`Token::String`] | `u32` length + raw bytes |
//! | [`Token::Integer`] | `i32` |
//! | [`Token::Float`] | `f32` (emitted with the `FLOAT` keyword code) |
//! | [`Token::Guid`] | 16-byte [`Guid`] record |
//! | [`Token::IntegerList`] | `u32` count + `u32` values |
//! | [`Token::FloatList`] | `u32` count + `f32` values |
//! | [`Token::Symbol`] | none |

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// 16-bit token codes of the binary X file dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TokenCode {
    Name = 1,
    String = 2,
    Integer = 3,
    Guid = 5,
    IntegerList = 6,
    FloatList = 7,
    OBrace = 10,
    CBrace = 11,
    OParen = 12,
    CParen = 13,
    OBracket = 14,
    CBracket = 15,
    OAngle = 16,
    CAngle = 17,
    Dot = 18,
    Comma = 19,
    Semicolon = 20,
    Template = 31,
    Word = 40,
    DWord = 41,
    Float = 42,
    Double = 43,
    Char = 44,
    UChar = 45,
    SWord = 46,
    SDWord = 47,
    Void = 48,
    Lpstr = 49,
    Unicode = 50,
    CString = 51,
    Array = 52,
}

impl TokenCode {
    /// Returns the wire value of this code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Maps a wire value back to a code.
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        use TokenCode::*;
        let code = match value {
            1 => Name,
            2 => String,
            3 => Integer,
            5 => Guid,
            6 => IntegerList,
            7 => FloatList,
            10 => OBrace,
            11 => CBrace,
            12 => OParen,
            13 => CParen,
            14 => OBracket,
            15 => CBracket,
            16 => OAngle,
            17 => CAngle,
            18 => Dot,
            19 => Comma,
            20 => Semicolon,
            31 => Template,
            40 => Word,
            41 => DWord,
            42 => Float,
            43 => Double,
            44 => Char,
            45 => UChar,
            46 => SWord,
            47 => SDWord,
            48 => Void,
            49 => Lpstr,
            50 => Unicode,
            51 => CString,
            52 => Array,
            _ => return None,
        };
        Some(code)
    }

    /// Returns the punctuation code for a single-byte token, if `byte` is one.
    #[must_use]
    pub fn punctuation(byte: u8) -> Option<Self> {
        let code = match byte {
            b'{' => TokenCode::OBrace,
            b'}' => TokenCode::CBrace,
            b'[' => TokenCode::OBracket,
            b']' => TokenCode::CBracket,
            b'(' => TokenCode::OParen,
            b')' => TokenCode::CParen,
            b',' => TokenCode::Comma,
            b';' => TokenCode::Semicolon,
            b'.' => TokenCode::Dot,
            _ => return None,
        };
        Some(code)
    }

    /// Returns true for codes that are never followed by a payload.
    #[must_use]
    pub fn is_bare(self) -> bool {
        !matches!(
            self,
            TokenCode::Name
                | TokenCode::String
                | TokenCode::Integer
                | TokenCode::Guid
                | TokenCode::IntegerList
                | TokenCode::FloatList
        )
    }
}

/// Reserved words, sorted for binary search.
static KEYWORDS: [(&str, TokenCode); 14] = [
    ("ARRAY", TokenCode::Array),
    ("CHAR", TokenCode::Char),
    ("CSTRING", TokenCode::CString),
    ("DOUBLE", TokenCode::Double),
    ("DWORD", TokenCode::DWord),
    ("FLOAT", TokenCode::Float),
    ("SDWORD", TokenCode::SDWord),
    ("STRING", TokenCode::Lpstr),
    ("SWORD", TokenCode::SWord),
    ("TEMPLATE", TokenCode::Template),
    ("UCHAR", TokenCode::UChar),
    ("UNICODE", TokenCode::Unicode),
    ("VOID", TokenCode::Void),
    ("WORD", TokenCode::Word),
];

fn compare_ignore_case(a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
        .map(u8::to_ascii_uppercase)
        .cmp(b.iter().map(u8::to_ascii_uppercase))
}

/// Looks up a reserved word, ignoring ASCII case.
///
/// Only exact matches count: `TEMPLATES` is an ordinary name.
///
/// # Examples
///
/// ```rust
/// use xftmpl::{lookup_keyword, TokenCode};
///
/// assert_eq!(lookup_keyword(b"template"), Some(TokenCode::Template));
/// assert_eq!(lookup_keyword(b"String"), Some(TokenCode::Lpstr));
/// assert_eq!(lookup_keyword(b"Mesh"), None);
/// ```
#[must_use]
pub fn lookup_keyword(name: &[u8]) -> Option<TokenCode> {
    KEYWORDS
        .binary_search_by(|(word, _)| compare_ignore_case(word.as_bytes(), name))
        .ok()
        .map(|index| KEYWORDS[index].1)
}

/// A GUID in its binary record layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    /// Size of the binary record.
    pub const SIZE: usize = 16;

    /// Length of the text form including angle brackets.
    pub const TEXT_LEN: usize = 38;

    /// Parses the bracketed text form `<XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX>`.
    ///
    /// Hex digits may be in either case. Returns `None` on any deviation from
    /// the fixed layout.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xftmpl::Guid;
    ///
    /// let guid = Guid::parse_braced(b"<3D82AB44-62DA-11CF-AB39-0020AF71E433>").unwrap();
    /// assert_eq!(guid.data1, 0x3D82_AB44);
    /// assert_eq!(guid.data4, [0xAB, 0x39, 0x00, 0x20, 0xAF, 0x71, 0xE4, 0x33]);
    /// ```
    #[must_use]
    pub fn parse_braced(text: &[u8]) -> Option<Self> {
        if text.len() != Self::TEXT_LEN || text[0] != b'<' || text[37] != b'>' {
            return None;
        }
        if [9, 14, 19, 24].iter().any(|&i| text[i] != b'-') {
            return None;
        }

        let mut data4 = [0u8; 8];
        data4[0] = hex_u8(&text[20..22])?;
        data4[1] = hex_u8(&text[22..24])?;
        for (i, byte) in data4[2..].iter_mut().enumerate() {
            let at = 25 + i * 2;
            *byte = hex_u8(&text[at..at + 2])?;
        }

        Some(Guid {
            data1: hex_value(&text[1..9])? as u32,
            data2: hex_value(&text[10..14])? as u16,
            data3: hex_value(&text[15..19])? as u16,
            data4,
        })
    }

    /// Returns the 16-byte little-endian record.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&self.data1.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.data2.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.data3.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.data4);
        bytes
    }

    /// Reads a 16-byte little-endian record.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&bytes[8..16]);
        Guid {
            data1: u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            data2: u16::from_le_bytes([bytes[4], bytes[5]]),
            data3: u16::from_le_bytes([bytes[6], bytes[7]]),
            data4,
        }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "<{:08X}-{:04X}-{:04X}-{:02X}{:02X}-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}>",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

fn hex_value(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &digit| {
        let nibble = (digit as char).to_digit(16)?;
        Some(acc << 4 | u64::from(nibble))
    })
}

fn hex_u8(digits: &[u8]) -> Option<u8> {
    hex_value(digits).map(|value| value as u8)
}

/// One token of the binary stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Token {
    Name(Vec<u8>),
    String(Vec<u8>),
    Integer(i32),
    /// A float literal; shares its code with the `FLOAT` keyword.
    Float(f32),
    Guid(Guid),
    IntegerList(Vec<u32>),
    FloatList(Vec<f32>),
    /// Punctuation and keywords, code only.
    Symbol(TokenCode),
}

impl Token {
    /// Returns the code this token is written with.
    #[must_use]
    pub fn code(&self) -> TokenCode {
        match self {
            Token::Name(_) => TokenCode::Name,
            Token::String(_) => TokenCode::String,
            Token::Integer(_) => TokenCode::Integer,
            Token::Float(_) => TokenCode::Float,
            Token::Guid(_) => TokenCode::Guid,
            Token::IntegerList(_) => TokenCode::IntegerList,
            Token::FloatList(_) => TokenCode::FloatList,
            Token::Symbol(code) => *code,
        }
    }

    /// Number of bytes this token occupies on the wire.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 + match self {
            Token::Name(bytes) | Token::String(bytes) => 4 + bytes.len(),
            Token::Integer(_) | Token::Float(_) => 4,
            Token::Guid(_) => Guid::SIZE,
            Token::IntegerList(values) => 4 + values.len() * 4,
            Token::FloatList(values) => 4 + values.len() * 4,
            Token::Symbol(_) => 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Name(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            Token::String(bytes) => write!(f, "\"{}\"", String::from_utf8_lossy(bytes)),
            Token::Integer(value) => write!(f, "{}", value),
            Token::Float(value) => write!(f, "{:?}", value),
            Token::Guid(guid) => write!(f, "{}", guid),
            Token::IntegerList(values) => write!(f, "{:?}", values),
            Token::FloatList(values) => write!(f, "{:?}", values),
            Token::Symbol(code) => write!(f, "{:?}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table_is_sorted() {
        assert!(KEYWORDS
            .windows(2)
            .all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn test_keyword_lookup_is_exact() {
        assert_eq!(lookup_keyword(b"WORD"), Some(TokenCode::Word));
        assert_eq!(lookup_keyword(b"dWoRd"), Some(TokenCode::DWord));
        assert_eq!(lookup_keyword(b"WOR"), None);
        assert_eq!(lookup_keyword(b"WORDS"), None);
        assert_eq!(lookup_keyword(b""), None);
    }

    #[test]
    fn test_code_roundtrip() {
        for value in 0..=60u16 {
            if let Some(code) = TokenCode::from_u16(value) {
                assert_eq!(code.as_u16(), value);
            }
        }
        assert_eq!(TokenCode::from_u16(4), None);
    }

    #[test]
    fn test_guid_rejects_bad_layout() {
        assert!(Guid::parse_braced(b"<00000000-0000-0000-0000-000000000000>").is_some());
        assert!(Guid::parse_braced(b"<00000000-0000-0000-0000-00000000000G>").is_none());
        assert!(Guid::parse_braced(b"<00000000-0000-0000-0000-000000000000)").is_none());
        assert!(Guid::parse_braced(b"<00000000_0000-0000-0000-000000000000>").is_none());
        assert!(Guid::parse_braced(b"<0000000-0000-0000-0000-000000000000>").is_none());
    }

    #[test]
    fn test_guid_display_roundtrip() {
        let text = b"<3d82ab43-62da-11cf-ab39-0020af71e433>";
        let guid = Guid::parse_braced(text).unwrap();
        assert_eq!(guid.to_string(), "<3D82AB43-62DA-11CF-AB39-0020AF71E433>");
        assert_eq!(Guid::from_bytes(&guid.to_bytes()), guid);
    }
}
