//! Byte-order-mark detection and text encoding.

use encoding_rs::WINDOWS_1252;
use std::fmt;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// On-disk encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark.
    #[default]
    Utf8,
    /// UTF-8 with a leading `EF BB BF`.
    Utf8Bom,
    /// UTF-16 little endian with a leading `FF FE`.
    Utf16Le,
    /// UTF-16 big endian with a leading `FE FF`.
    Utf16Be,
    /// Windows-1252, used for BOM-less files that are not valid UTF-8.
    Ansi,
}

impl TextEncoding {
    /// Returns the byte-order mark written in front of the payload, if any.
    pub fn bom(self) -> &'static [u8] {
        match self {
            Self::Utf8Bom => &UTF8_BOM,
            Self::Utf16Le => &UTF16_LE_BOM,
            Self::Utf16Be => &UTF16_BE_BOM,
            Self::Utf8 | Self::Ansi => &[],
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 with BOM",
            Self::Utf16Le => "UTF-16 LE",
            Self::Utf16Be => "UTF-16 BE",
            Self::Ansi => "ANSI",
        };
        f.write_str(name)
    }
}

/// A UTF-16 payload (after its BOM) had an odd number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OddUtf16Length {
    /// The encoding announced by the BOM.
    pub encoding: TextEncoding,
}

/// Pick the encoding from a leading byte-order mark, if one is present.
pub fn detect_bom(bytes: &[u8]) -> Option<TextEncoding> {
    if bytes.starts_with(&UTF8_BOM) {
        Some(TextEncoding::Utf8Bom)
    } else if bytes.starts_with(&UTF16_LE_BOM) {
        Some(TextEncoding::Utf16Le)
    } else if bytes.starts_with(&UTF16_BE_BOM) {
        Some(TextEncoding::Utf16Be)
    } else {
        None
    }
}

/// Decode raw file contents, honoring a leading byte-order mark.
///
/// Without a BOM, valid UTF-8 is taken as [`TextEncoding::Utf8`]; anything else is decoded as
/// Windows-1252 ([`TextEncoding::Ansi`]). The same fallback applies to a UTF-8 BOM over a body
/// that is not valid UTF-8, so every byte survives a save. Unpaired UTF-16 surrogates decode
/// to U+FFFD.
pub fn decode(bytes: &[u8]) -> Result<(String, TextEncoding), OddUtf16Length> {
    match detect_bom(bytes) {
        Some(TextEncoding::Utf8Bom) => {
            let payload = &bytes[UTF8_BOM.len()..];
            match std::str::from_utf8(payload) {
                Ok(text) => Ok((text.to_string(), TextEncoding::Utf8Bom)),
                Err(err) => {
                    log::warn!("invalid UTF-8 after a UTF-8 BOM ({err}), reading it as ANSI");
                    Ok((decode_ansi(payload), TextEncoding::Ansi))
                }
            }
        }
        Some(encoding @ (TextEncoding::Utf16Le | TextEncoding::Utf16Be)) => {
            let payload = &bytes[2..];
            if payload.len() % 2 != 0 {
                return Err(OddUtf16Length { encoding });
            }
            let units: Vec<u16> = payload
                .chunks_exact(2)
                .map(|pair| match encoding {
                    TextEncoding::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
                    _ => u16::from_le_bytes([pair[0], pair[1]]),
                })
                .collect();
            Ok((String::from_utf16_lossy(&units), encoding))
        }
        _ => match std::str::from_utf8(bytes) {
            Ok(text) => Ok((text.to_string(), TextEncoding::Utf8)),
            Err(_) => Ok((decode_ansi(bytes), TextEncoding::Ansi)),
        },
    }
}

// Windows-1252 maps every byte, so this never loses input.
fn decode_ansi(bytes: &[u8]) -> String {
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}

/// Encode text for writing, including the byte-order mark of `encoding`.
///
/// Returns the encoding actually used: text that Windows-1252 cannot represent is written as
/// UTF-8 instead of being silently mangled.
pub fn encode(text: &str, encoding: TextEncoding) -> (Vec<u8>, TextEncoding) {
    match encoding {
        TextEncoding::Utf8 | TextEncoding::Utf8Bom => {
            let bom = encoding.bom();
            let mut out = Vec::with_capacity(bom.len() + text.len());
            out.extend_from_slice(bom);
            out.extend_from_slice(text.as_bytes());
            (out, encoding)
        }
        TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
            let mut out = Vec::with_capacity(2 + text.len() * 2);
            out.extend_from_slice(encoding.bom());
            for unit in text.encode_utf16() {
                let bytes = if encoding == TextEncoding::Utf16Be {
                    unit.to_be_bytes()
                } else {
                    unit.to_le_bytes()
                };
                out.extend_from_slice(&bytes);
            }
            (out, encoding)
        }
        TextEncoding::Ansi => {
            let (encoded, _, had_errors) = WINDOWS_1252.encode(text);
            if had_errors {
                log::warn!("text is not representable in Windows-1252, writing UTF-8 instead");
                return encode(text, TextEncoding::Utf8);
            }
            (encoded.into_owned(), TextEncoding::Ansi)
        }
    }
}
