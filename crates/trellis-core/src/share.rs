//! Share links.
//!
//! A document travels as base64 JSON (`{"html","css","js"}`) in one query
//! parameter. Links carry no integrity check: anything that fails to decode
//! is reported and ignored.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use url::Url;

use crate::document::Document;
use crate::error::ShareError;

/// Query parameter holding the encoded document.
pub const DEFAULT_PARAM: &str = "code";

const ENCODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_encode_padding(false),
);

const DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn encode(doc: &Document) -> String {
    // Serializing three strings cannot fail.
    let json = serde_json::to_vec(doc).unwrap_or_default();
    ENCODER.encode(json)
}

/// Decode a link payload in either base64 alphabet, padded or not.
pub fn decode(payload: &str) -> Result<Document, ShareError> {
    // Query decoding turns a literal '+' into a space.
    let normalized: String = payload
        .trim()
        .chars()
        .map(|c| match c {
            '+' | ' ' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    let bytes = DECODER.decode(normalized)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// `page_url` with the document attached, replacing any previous one.
pub fn share_url(page_url: &str, doc: &Document) -> Result<String, ShareError> {
    share_url_with(page_url, DEFAULT_PARAM, doc)
}

pub fn share_url_with(page_url: &str, param: &str, doc: &Document) -> Result<String, ShareError> {
    let mut url = Url::parse(page_url)?;
    let mut pairs = other_pairs(&url, param);
    pairs.push((param.to_string(), encode(doc)));
    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url.into())
}

/// Pull a shared document out of `page_url`.
///
/// Returns `None` when there is nothing to apply. Otherwise returns the
/// decode result together with the URL the address bar should show, which
/// no longer carries the parameter, so the link is applied once.
pub fn take_shared(page_url: &str) -> Option<(Result<Document, ShareError>, String)> {
    take_shared_with(page_url, DEFAULT_PARAM)
}

pub fn take_shared_with(
    page_url: &str,
    param: &str,
) -> Option<(Result<Document, ShareError>, String)> {
    let mut url = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(page_url, error = %e, "cannot parse page url");
            return None;
        }
    };
    let payload = url
        .query_pairs()
        .find(|(k, _)| k == param)
        .map(|(_, v)| v.into_owned())?;

    let rest = other_pairs(&url, param);
    if rest.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(rest);
    }

    Some((decode(&payload), url.into()))
}

fn other_pairs(url: &Url, param: &str) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(k, _)| k != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    fn sample() -> Document {
        Document::new("<h1>Hé</h1>", "h1{color:red}", "console.log(1 + 2 >> 1);")
    }

    #[test]
    fn test_link_applies_once() {
        let link = share_url("https://play.example/app?theme=dark#top", &sample()).unwrap();
        assert!(link.contains("code="));

        let (doc, stripped) = take_shared(&link).unwrap();
        assert_eq!(doc.unwrap(), sample());
        assert_eq!(stripped, "https://play.example/app?theme=dark#top");
        assert!(take_shared(&stripped).is_none());
    }

    #[test]
    fn test_sole_param_strips_query() {
        let link = share_url("https://play.example/", &sample()).unwrap();
        let (_, stripped) = take_shared(&link).unwrap();
        assert_eq!(stripped, "https://play.example/");
    }

    #[test]
    fn test_accepts_standard_alphabet() {
        let json = r#"{"html":"<p>??>>?</p>","css":"","js":""}"#;
        let padded = STANDARD.encode(json);
        assert!(padded.contains('/') || padded.contains('+') || padded.ends_with('='));
        assert_eq!(decode(&padded).unwrap().markup, "<p>??>>?</p>");
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let payload = STANDARD.encode(r#"{"html":"x"}"#);
        assert_eq!(decode(&payload).unwrap(), Document::new("x", "", ""));
    }

    #[test]
    fn test_corrupt_link_is_error_and_still_stripped() {
        let (doc, stripped) = take_shared("https://play.example/?code=%%%not-base64").unwrap();
        assert!(matches!(doc, Err(ShareError::Encoding(_))));
        assert_eq!(stripped, "https://play.example/");

        let payload = ENCODER.encode("[1,2,3]");
        assert!(matches!(decode(&payload), Err(ShareError::Payload(_))));
    }

    #[test]
    fn test_bad_page_url() {
        assert!(take_shared("not a url").is_none());
        assert!(matches!(
            share_url("not a url", &sample()),
            Err(ShareError::Url(_))
        ));
    }
}
