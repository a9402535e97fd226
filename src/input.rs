//! Loading documents from raw bytes.

use std::borrow::Cow;
use std::path::Path;

use crate::error::Result;

/// Bytes scanned for a `<meta>` charset declaration.
const SNIFF_LEN: usize = 1024;

/// Decode an HTML document to text.
///
/// UTF-8 (with or without BOM) is tried first. Malformed UTF-8 falls back to
/// the charset declared in a leading `<meta>` tag, then to Windows-1252.
pub fn decode_document(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(label) = sniff_meta_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(label.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Read and decode a document from disk.
pub fn read_document(path: impl AsRef<Path>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_document(&bytes).into_owned())
}

/// Find the charset declared by a `<meta>` tag in the first bytes of the
/// document. Covers `<meta charset="x">` and
/// `<meta http-equiv content="text/html; charset=x">`; each tag is examined on
/// its own, and the first one declaring a charset wins.
fn sniff_meta_charset(bytes: &[u8]) -> Option<&str> {
    let mut rest = &bytes[..bytes.len().min(SNIFF_LEN)];
    while let Some(start) = find_ignore_case(rest, b"<meta") {
        let after = &rest[start + 5..];
        let end = after.iter().position(|&b| b == b'>').unwrap_or(after.len());
        if let Some(label) = meta_tag_charset(&after[..end]) {
            return Some(label);
        }
        rest = &after[end..];
    }
    None
}

/// Charset of one `<meta>` tag's attribute text. Outside `http-equiv` tags,
/// only a `charset` attribute counts, not text inside another attribute's
/// quoted value.
fn meta_tag_charset(tag: &[u8]) -> Option<&str> {
    let position = if find_ignore_case(tag, b"http-equiv").is_some() {
        find_ignore_case(tag, b"charset=")
    } else {
        unquoted_charset_attr(tag)
    }?;

    let value = &tag[position + 8..];
    let value = match value.first() {
        Some(b'"' | b'\'') => &value[1..],
        _ => value,
    };
    let end = value
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'/') || b.is_ascii_whitespace())
        .unwrap_or(value.len());

    std::str::from_utf8(&value[..end])
        .ok()
        .filter(|label| !label.is_empty())
}

/// Offset of a `charset=` attribute that is not inside a quoted value.
fn unquoted_charset_attr(tag: &[u8]) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in tag.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if matches!(b, b'"' | b'\'') => quote = Some(b),
            None if tag[i..].len() >= 8
                && tag[i..i + 8].eq_ignore_ascii_case(b"charset=")
                && (i == 0 || tag[i - 1].is_ascii_whitespace()) =>
            {
                return Some(i);
            }
            None => {}
        }
    }
    None
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let text = "<p>UTF8‽✗✓</p>";
        assert!(matches!(decode_document(text.as_bytes()), Cow::Borrowed(s) if s == text));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<p>hi</p>");
        assert_eq!(decode_document(&bytes), "<p>hi</p>");
    }

    #[test]
    fn test_meta_charset_is_honoured() {
        // 0xE9 is "И" in koi8-r but invalid UTF-8
        let mut bytes = b"<meta charset=\"koi8-r\"><p>".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</p>");
        assert_eq!(decode_document(&bytes), "<meta charset=\"koi8-r\"><p>И</p>");
    }

    #[test]
    fn test_http_equiv_charset() {
        let bytes = b"<META http-equiv=\"Content-Type\" content=\"text/html; charset=iso-8859-2\">";
        assert_eq!(sniff_meta_charset(bytes), Some("iso-8859-2"));
        assert_eq!(sniff_meta_charset(b"<p>no meta</p>"), None);
        assert_eq!(sniff_meta_charset(b"<meta charset=>"), None);
    }

    #[test]
    fn test_charset_outside_meta_tags_is_ignored() {
        let description =
            b"<meta name=\"description\" content=\"set charset=koi8-r here\"><meta charset=\"iso-8859-2\">";
        assert_eq!(sniff_meta_charset(description), Some("iso-8859-2"));

        let body_text = b"<meta name=\"viewport\"><p>use charset=koi8-r</p>";
        assert_eq!(sniff_meta_charset(body_text), None);

        let unclosed = b"<meta name=\"x\" content=\"charset=koi8-r";
        assert_eq!(sniff_meta_charset(unclosed), None);
    }

    #[test]
    fn test_windows_1252_fallback() {
        let bytes = [b'<', b'p', b'>', 0x93, b'q', 0x94, b'<', b'/', b'p', b'>'];
        assert_eq!(decode_document(&bytes), "<p>\u{201C}q\u{201D}</p>");
    }

    #[test]
    fn test_read_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("<p>caf\u{e9}</p>".as_bytes()).unwrap();
        assert_eq!(read_document(file.path()).unwrap(), "<p>café</p>");

        let missing = file.path().with_extension("missing");
        assert!(matches!(read_document(missing), Err(crate::Error::Io(_))));
    }
}
