//! Charset encoding of license text.
//!
//! Text sources are either literal text (transcoded into the target charset)
//! or raw bytes that are taken to already be in the target charset. The
//! pseudo charset `native` selects the legacy charset shared by the target
//! languages; raw bytes are then read as UTF-8 and transcoded.

use base64::Engine as _;
use encoding_rs::Encoding;
use thiserror::Error;

use crate::i18n::Language;
use crate::license::TextEncoding;

/// Charset name that selects the target languages' own legacy charset.
pub const NATIVE_CHARSET: &str = "native";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CharsetError {
    #[error("unknown charset “{0}”")]
    UnknownCharset(String),

    #[error("the “native” charset needs at least one language")]
    NoLanguages,

    #[error("the “native” charset is ambiguous: {first} uses {first_charset} but {other} uses {other_charset}")]
    AmbiguousNative {
        first: String,
        first_charset: &'static str,
        other: String,
        other_charset: &'static str,
    },

    #[error("text cannot be represented in {0}")]
    Unmappable(String),

    #[error("invalid base64 data: {0}")]
    InvalidBase64(String),

    #[error("invalid hex data: {0}")]
    InvalidHex(String),

    #[error("data is not valid UTF-8")]
    InvalidUtf8,
}

/// Where the text to encode comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    /// File contents
    Bytes(Vec<u8>),

    /// Inline text
    Text(String),
}

/// Turns a text source into bytes in a given charset.
pub trait CharsetEncoder {
    /// `languages` are the languages the text will be shown for; used to
    /// resolve the `native` charset.
    fn encode(
        &self,
        charset: &str,
        source: TextSource,
        encoding: TextEncoding,
        languages: &[Language],
    ) -> Result<Vec<u8>, CharsetError>;
}

/// `CharsetEncoder` backed by `encoding_rs` for legacy charsets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCharsetEncoder;

impl CharsetEncoder for DefaultCharsetEncoder {
    fn encode(
        &self,
        charset: &str,
        source: TextSource,
        encoding: TextEncoding,
        languages: &[Language],
    ) -> Result<Vec<u8>, CharsetError> {
        let native = charset.trim().eq_ignore_ascii_case(NATIVE_CHARSET);
        let target = if native {
            Charset::parse(native_charset(languages)?)?
        } else {
            Charset::parse(charset)?
        };

        let raw = match (source, encoding) {
            (TextSource::Text(text), TextEncoding::Text) => return target.encode_str(&text),
            (TextSource::Bytes(bytes), TextEncoding::Text) => bytes,
            (TextSource::Text(text), encoding) => decode_binary(text.as_bytes(), encoding)?,
            (TextSource::Bytes(bytes), encoding) => decode_binary(&bytes, encoding)?,
        };

        if native {
            let text = String::from_utf8(raw).map_err(|_| CharsetError::InvalidUtf8)?;
            target.encode_str(&text)
        } else {
            Ok(raw)
        }
    }
}

/// Primary charset shared by all `languages`.
pub fn native_charset(languages: &[Language]) -> Result<&'static str, CharsetError> {
    let (first, rest) = languages.split_first().ok_or(CharsetError::NoLanguages)?;
    let charset = first.primary_charset();

    match rest.iter().find(|lang| lang.primary_charset() != charset) {
        Some(other) => Err(CharsetError::AmbiguousNative {
            first: first.to_string(),
            first_charset: charset,
            other: other.to_string(),
            other_charset: other.primary_charset(),
        }),
        None => Ok(charset),
    }
}

fn decode_binary(data: &[u8], encoding: TextEncoding) -> Result<Vec<u8>, CharsetError> {
    let trimmed: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();

    match encoding {
        TextEncoding::Text => Ok(data.to_vec()),
        TextEncoding::Base64 => base64::engine::general_purpose::STANDARD
            .decode(&trimmed)
            .map_err(|e| CharsetError::InvalidBase64(e.to_string())),
        TextEncoding::Hex => {
            hex::decode(&trimmed).map_err(|e| CharsetError::InvalidHex(e.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Charset {
    Utf8,
    Utf16Be,
    Utf16Le,
    Legacy(&'static Encoding),
}

impl Charset {
    fn parse(label: &str) -> Result<Self, CharsetError> {
        let label = label.trim();
        match label.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => return Ok(Charset::Utf8),
            "utf-16" | "utf16" | "utf-16be" => return Ok(Charset::Utf16Be),
            "utf-16le" => return Ok(Charset::Utf16Le),
            "macroman" | "mac-roman" => return Ok(Charset::Legacy(encoding_rs::MACINTOSH)),
            _ => {}
        }

        match Encoding::for_label(label.as_bytes()) {
            Some(enc) if enc == encoding_rs::UTF_8 => Ok(Charset::Utf8),
            Some(enc) if enc == encoding_rs::UTF_16BE => Ok(Charset::Utf16Be),
            Some(enc) if enc == encoding_rs::UTF_16LE => Ok(Charset::Utf16Le),
            Some(enc) if enc != encoding_rs::REPLACEMENT => Ok(Charset::Legacy(enc)),
            _ => Err(CharsetError::UnknownCharset(label.to_string())),
        }
    }

    fn encode_str(self, text: &str) -> Result<Vec<u8>, CharsetError> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Utf16Be => Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect()),
            Charset::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Charset::Legacy(enc) => {
                let (bytes, _, had_errors) = enc.encode(text);
                if had_errors {
                    return Err(CharsetError::Unmappable(enc.name().to_string()));
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(tags: &[&str]) -> Vec<Language> {
        tags.iter().map(|t| Language::from_tag(t).unwrap()).collect()
    }

    fn encode_text(charset: &str, text: &str, languages: &[Language]) -> Result<Vec<u8>, CharsetError> {
        DefaultCharsetEncoder.encode(
            charset,
            TextSource::Text(text.to_string()),
            TextEncoding::Text,
            languages,
        )
    }

    #[test]
    fn test_utf8_text_is_unchanged() {
        let bytes = encode_text("UTF-8", "Héllo", &langs(&["en"])).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "Héllo");
    }

    #[test]
    fn test_utf16_is_big_endian_without_bom() {
        let bytes = encode_text("UTF-16", "Hi", &[]).unwrap();
        assert_eq!(bytes, vec![0x00, 0x48, 0x00, 0x69]);

        let bytes = encode_text("utf-16le", "Hi", &[]).unwrap();
        assert_eq!(bytes, vec![0x48, 0x00, 0x69, 0x00]);
    }

    #[test]
    fn test_mac_roman_text() {
        let bytes = encode_text("macintosh", "é", &[]).unwrap();
        assert_eq!(bytes, vec![0x8E]);

        let bytes = encode_text("MacRoman", "é", &[]).unwrap();
        assert_eq!(bytes, vec![0x8E]);
    }

    #[test]
    fn test_native_picks_language_charset() {
        let bytes = encode_text("native", "日本", &langs(&["ja"])).unwrap();
        assert_eq!(bytes, vec![0x93, 0xFA, 0x96, 0x7B]);
    }

    #[test]
    fn test_native_rejects_mixed_charsets() {
        let result = encode_text("native", "x", &langs(&["en", "ja"]));
        match result {
            Err(CharsetError::AmbiguousNative { first, other, .. }) => {
                assert_eq!(first, "en-US");
                assert_eq!(other, "ja-JP");
            }
            other => panic!("Expected AmbiguousNative, got {:?}", other),
        }
    }

    #[test]
    fn test_native_without_languages() {
        assert_eq!(encode_text("native", "x", &[]), Err(CharsetError::NoLanguages));
    }

    #[test]
    fn test_unmappable_text() {
        let result = encode_text("macintosh", "日本", &[]);
        assert!(matches!(result, Err(CharsetError::Unmappable(_))));
    }

    #[test]
    fn test_unknown_charset() {
        let result = encode_text("klingon-8", "x", &[]);
        assert_eq!(result, Err(CharsetError::UnknownCharset("klingon-8".to_string())));
    }

    #[test]
    fn test_raw_bytes_pass_through() {
        let raw = vec![0x8E, 0xFF, 0x00];
        let bytes = DefaultCharsetEncoder
            .encode("macintosh", TextSource::Bytes(raw.clone()), TextEncoding::Text, &[])
            .unwrap();
        assert_eq!(bytes, raw);
    }

    #[test]
    fn test_raw_bytes_transcoded_for_native() {
        let bytes = DefaultCharsetEncoder
            .encode(
                "native",
                TextSource::Bytes("é".as_bytes().to_vec()),
                TextEncoding::Text,
                &langs(&["fr"]),
            )
            .unwrap();
        assert_eq!(bytes, vec![0x8E]);
    }

    #[test]
    fn test_native_requires_utf8_bytes() {
        let result = DefaultCharsetEncoder.encode(
            "native",
            TextSource::Bytes(vec![0xFF, 0xFE]),
            TextEncoding::Text,
            &langs(&["fr"]),
        );
        assert_eq!(result, Err(CharsetError::InvalidUtf8));
    }

    #[test]
    fn test_base64_text_is_decoded() {
        let bytes = DefaultCharsetEncoder
            .encode(
                "macintosh",
                TextSource::Text("jv8=\n".to_string()),
                TextEncoding::Base64,
                &[],
            )
            .unwrap();
        assert_eq!(bytes, vec![0x8E, 0xFF]);
    }

    #[test]
    fn test_hex_text_is_decoded() {
        let bytes = DefaultCharsetEncoder
            .encode(
                "macintosh",
                TextSource::Text("8e ff".to_string()),
                TextEncoding::Hex,
                &[],
            )
            .unwrap();
        assert_eq!(bytes, vec![0x8E, 0xFF]);
    }

    #[test]
    fn test_invalid_hex() {
        let result = DefaultCharsetEncoder.encode(
            "UTF-8",
            TextSource::Text("zz".to_string()),
            TextEncoding::Hex,
            &[],
        );
        assert!(matches!(result, Err(CharsetError::InvalidHex(_))));
    }
}
