use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use lilyconv_logging::lily_warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Look up an encoding by its WHATWG label, e.g. `"utf-8"` or `"latin1"`.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Decode a document file: BOM -> valid UTF-8 -> chardetng fallback.
pub fn decode_document(bytes: &[u8]) -> Result<DecodedText, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if std::str::from_utf8(bytes).is_ok() {
        return decode_with(bytes, UTF_8);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    decode_with(bytes, encoding)
}

/// Encode `text` for writing back in the encoding it was read with.
///
/// Unknown labels, and text the encoding cannot represent, are written as UTF-8.
/// UTF-16 labels also yield UTF-8, as `encoding_rs` does not encode UTF-16.
pub fn encode_document(text: &str, encoding_label: &str) -> Vec<u8> {
    let Some(encoding) = encoding_for_label(encoding_label) else {
        lily_warn!("Unknown encoding '{encoding_label}', writing UTF-8");
        return text.as_bytes().to_vec();
    };
    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors {
        lily_warn!(
            "Text cannot be represented in {}, writing UTF-8",
            used.name()
        );
        return text.as_bytes().to_vec();
    }
    bytes.into_owned()
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> Result<DecodedText, DecodeError> {
    // `decode` sniffs and strips a BOM, which may override `encoding`.
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: used.name().to_string(),
            message: "malformed byte sequence".into(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
    })
}
