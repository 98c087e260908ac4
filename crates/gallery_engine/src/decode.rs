use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decodes fetched page bytes into UTF-8 text for link extraction.
///
/// Charset resolution order: BOM, then the Content-Type header, then
/// chardetng detection. Decoding is lossy on purpose; a page with a few
/// mojibake characters still yields its image links.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding.decode(bytes).0.into_owned();
    }

    if let Some(label) = content_type.and_then(charset_label) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return encoding.decode(bytes).0.into_owned();
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true).decode(bytes).0.into_owned()
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        part.strip_prefix("charset=")
            .or_else(|| part.strip_prefix("Charset="))
            .or_else(|| part.strip_prefix("CHARSET="))
            .map(|v| v.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}
