//! Character-code transform for TTG text payloads.
//!
//! TTG stores every piece of text as space-separated decimal code points.
//! `<Title>` becomes `60 84 105 116 108 101 62`; the angle brackets are
//! ordinary characters in the stream (`<` is 60, `>` is 62) and mark the
//! payload as a keyword.

use std::fmt;

/// Error decoding a TTG code string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A token was not a decimal number.
    BadCode(String),
    /// A number was outside the Unicode scalar range.
    BadChar(u32),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::BadCode(token) => write!(f, "not a character code: {:?}", token),
            CodecError::BadChar(code) => write!(f, "no character for code point {}", code),
        }
    }
}

impl std::error::Error for CodecError {}

/// Encode literal text as a space-joined list of decimal code points.
pub fn encode(text: &str) -> String {
    text.chars()
        .map(|c| (c as u32).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode a space-joined list of decimal code points back to text.
///
/// Exact inverse of [`encode`].
pub fn decode(codes: &str) -> Result<String, CodecError> {
    codes.split_whitespace().map(decode_token).collect()
}

/// Decode a keyword slot payload.
///
/// The first and last tokens are the bracket codes that wrap every keyword;
/// they are dropped by position, not by value. Slices with fewer than two
/// tokens decode to the empty string.
pub fn decode_bracketed(codes: &str) -> Result<String, CodecError> {
    let tokens: Vec<&str> = codes.split_whitespace().collect();
    if tokens.len() < 2 {
        return Ok(String::new());
    }
    tokens[1..tokens.len() - 1]
        .iter()
        .copied()
        .map(decode_token)
        .collect()
}

fn decode_token(token: &str) -> Result<char, CodecError> {
    let code: u32 = token
        .parse()
        .map_err(|_| CodecError::BadCode(token.to_string()))?;
    char::from_u32(code).ok_or(CodecError::BadChar(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_to_space_joined_codes() {
        assert_eq!(encode("<Title>"), "60 84 105 116 108 101 62");
    }

    #[test]
    fn encodes_empty_text_to_empty_string() {
        assert_eq!(encode(""), "");
    }

    #[test]
    fn decodes_codes_back_to_text() {
        assert_eq!(decode("72 105").unwrap(), "Hi");
    }

    #[test]
    fn decode_rejects_non_numeric_tokens() {
        assert!(matches!(decode("72 x"), Err(CodecError::BadCode(_))));
    }

    #[test]
    fn decode_rejects_invalid_code_points() {
        // 55296 is a lone surrogate
        assert_eq!(decode("55296"), Err(CodecError::BadChar(55296)));
    }

    #[test]
    fn bracketed_decode_drops_the_wrapper_codes() {
        assert_eq!(decode_bracketed("60 84 105 116 108 101 62").unwrap(), "Title");
    }

    #[test]
    fn bracketed_decode_of_bare_wrapper_is_empty() {
        assert_eq!(decode_bracketed("60 62").unwrap(), "");
    }

    #[test]
    fn bracketed_decode_of_short_slices_is_empty() {
        assert_eq!(decode_bracketed("60").unwrap(), "");
        assert_eq!(decode_bracketed("").unwrap(), "");
    }

    #[test]
    fn bracketed_decode_is_positional_not_value_checked() {
        // first and last tokens go away even when they are not brackets
        assert_eq!(decode_bracketed("9999999999 72 105 0").unwrap(), "Hi");
    }
}
